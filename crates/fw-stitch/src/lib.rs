//! fw-stitch: cross-network border stitching and graph merging.
//!
//! Near a national border the two source networks describe the same
//! physical waterways under different identifiers and slightly different
//! digitization. There is no shared key, so stitching matches bridgehead
//! nodes geometrically: project into a metric plane, find the nearest
//! primary node, accept under a tight threshold. Merging then composes
//! both networks and the accepted connections into one namespaced graph,
//! honoring externally supplied exclusion rules.

pub mod merge;
pub mod stitch;

pub use merge::{BORDER_TAG, MergeConfig, MergeStats, merge_graphs};
pub use stitch::{BorderConnection, StitchConfig, find_border_connections};
