//! fw-core: stable foundation for the fairway workspace.
//!
//! Contains:
//! - error (shared error types)
//! - ids (node identifiers across source networks)
//! - attrs (open-ended attribute values and maps, well-known keys)
//! - geom (geometry keys, geodesic lengths, metric projection)

pub mod attrs;
pub mod error;
pub mod geom;
pub mod ids;

// Re-exports: nice ergonomics for downstream crates
pub use attrs::{AttrMap, AttrValue, merge_non_null};
pub use error::{FwError, FwResult};
pub use geom::MetricProjector;
pub use ids::NodeId;
