//! Auxiliary dataset rows.

use fw_core::attrs::AttrMap;
use geo::LineString;

/// One row of an auxiliary dataset, joined onto sections either by exact
/// geometry or by route/km overlap depending on what the source provides.
#[derive(Debug, Clone, Default)]
pub struct AuxRecord {
    pub geometry: Option<LineString<f64>>,
    pub route_id: Option<i64>,
    pub route_km_begin: Option<f64>,
    pub route_km_end: Option<f64>,
    pub attrs: AttrMap,
}

impl AuxRecord {
    /// Route/km range normalized to [min, max].
    pub fn route_range(&self) -> Option<(i64, f64, f64)> {
        let route = self.route_id?;
        let begin = self.route_km_begin?;
        let end = self.route_km_end?;
        Some((route, begin.min(end), begin.max(end)))
    }
}

/// One row of an auxiliary dataset keyed by section reference, for sources
/// that share the regional network's section codes instead of geometry.
#[derive(Debug, Clone, Default)]
pub struct SectionRefRecord {
    pub section_ref: String,
    pub attrs: AttrMap,
}
