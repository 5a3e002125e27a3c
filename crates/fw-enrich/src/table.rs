//! Per-section enrichment table assembly.

use std::collections::BTreeMap;

use fw_core::attrs::{AttrMap, AttrValue, merge_non_null};
use fw_core::error::{FwError, FwResult};
use fw_graph::SectionRecord;
use tracing::info;

use crate::matching::{match_by_geometry, match_by_route_km};
use crate::records::AuxRecord;

/// Enrichment attributes per section id.
pub type EnrichmentTable = BTreeMap<i64, AttrMap>;

/// Columns pulled from the vessel-dimension dataset.
pub const DIMENSION_COLUMNS: &[&str] = &[
    "general_depth",
    "general_length",
    "general_width",
    "general_height",
    "pushed_depth",
    "pushed_length",
    "pushed_width",
    "coupled_depth",
    "coupled_length",
    "coupled_width",
];

/// Columns pulled from the navigability-classification dataset.
pub const CLASSIFICATION_COLUMNS: &[&str] = &["classification", "code", "description"];

/// Columns pulled from the navigation-speed dataset.
pub const SPEED_COLUMNS: &[&str] = &[
    "max_speed_up",
    "max_speed_down",
    "calibrated_speed_up",
    "calibrated_speed_down",
];

/// Columns pulled from the fairway-depth dataset.
pub const DEPTH_COLUMNS: &[&str] = &[
    "minimal_depth_lower",
    "minimal_depth_upper",
    "reference_level",
];

/// Columns pulled from the fairway-type dataset.
pub const TYPE_COLUMNS: &[&str] = &["character_type"];

const TIDAL_COLUMNS: &[&str] = &["name"];

/// Auxiliary datasets joined onto sections.
///
/// Dimensions and navigability share the section geometries and are
/// required; the route/km-referenced datasets are optional extras.
#[derive(Debug, Clone, Default)]
pub struct EnrichmentSources {
    pub dimensions: Option<Vec<AuxRecord>>,
    pub navigability: Option<Vec<AuxRecord>>,
    pub speed: Option<Vec<AuxRecord>>,
    pub depth: Option<Vec<AuxRecord>>,
    pub fairway_type: Option<Vec<AuxRecord>>,
    pub tidal_area: Option<Vec<AuxRecord>>,
}

/// Merge several per-source tables into one; sources are prefixed, so the
/// only overlap is a repeated source, where non-null values win last.
pub fn combine_tables(tables: impl IntoIterator<Item = EnrichmentTable>) -> EnrichmentTable {
    let mut combined = EnrichmentTable::new();
    for table in tables {
        for (section_id, attrs) in table {
            merge_non_null(combined.entry(section_id).or_default(), &attrs);
        }
    }
    combined
}

/// Build the full per-section enrichment table.
///
/// Geometry-keyed sources (dimensions, navigability) and route/km-keyed
/// sources (speed, depth, type, tidal area) are matched separately and
/// combined with per-source prefixes. The navigability code doubles as the
/// `waterway_class` convenience alias, and any tidal-area match collapses
/// to a single `is_tidal` flag.
pub fn build_section_enrichment(
    sections: &[SectionRecord],
    sources: &EnrichmentSources,
) -> FwResult<EnrichmentTable> {
    let dimensions = sources
        .dimensions
        .as_deref()
        .ok_or(FwError::MissingDataset { what: "dimensions" })?;
    let navigability = sources
        .navigability
        .as_deref()
        .ok_or(FwError::MissingDataset {
            what: "navigability",
        })?;

    let dim = match_by_geometry(sections, dimensions, DIMENSION_COLUMNS, "dim_");
    let mut class = match_by_geometry(sections, navigability, CLASSIFICATION_COLUMNS, "class_");
    for attrs in class.values_mut() {
        if let Some(code) = attrs.get("class_code").cloned() {
            attrs.insert("waterway_class".into(), code);
        }
    }

    let mut tables = vec![dim, class];

    if let Some(speed) = sources.speed.as_deref() {
        tables.push(match_by_route_km(sections, speed, SPEED_COLUMNS, "speed_"));
    }
    if let Some(depth) = sources.depth.as_deref() {
        tables.push(match_by_route_km(sections, depth, DEPTH_COLUMNS, "depth_"));
    }
    if let Some(fairway_type) = sources.fairway_type.as_deref() {
        tables.push(match_by_route_km(
            sections,
            fairway_type,
            TYPE_COLUMNS,
            "type_",
        ));
    }
    if let Some(tidal) = sources.tidal_area.as_deref() {
        let mut table = match_by_route_km(sections, tidal, TIDAL_COLUMNS, "tidal_");
        for attrs in table.values_mut() {
            attrs.remove("tidal_name");
            attrs.insert("is_tidal".into(), AttrValue::Bool(true));
        }
        tables.push(table);
    }

    let combined = combine_tables(tables);
    info!(sections = combined.len(), "built section enrichment table");
    Ok(combined)
}
