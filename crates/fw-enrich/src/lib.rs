//! fw-enrich: attribute enrichment for waterway graphs.
//!
//! Auxiliary datasets (dimensions, navigability class, speed, depth, tidal
//! areas) are joined onto sections by one of two strategies — exact
//! geometry key or route/km interval overlap — combined into one
//! per-section attribute table, and then merged onto graph edges.

pub mod apply;
pub mod matching;
pub mod records;
pub mod table;

pub use apply::{ApplyStats, apply_section_enrichment, enrich_by_section_ref};
pub use matching::{match_by_geometry, match_by_route_km, ranges_overlap};
pub use records::{AuxRecord, SectionRefRecord};
pub use table::{EnrichmentSources, EnrichmentTable, build_section_enrichment, combine_tables};
