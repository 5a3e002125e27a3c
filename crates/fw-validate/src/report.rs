//! Structured validation report.

use std::collections::{BTreeMap, BTreeSet};

use fw_core::ids::NodeId;
use serde::Serialize;

/// Verdict of a non-fatal check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckStatus {
    Pass,
    Warning,
}

impl Default for CheckStatus {
    fn default() -> Self {
        CheckStatus::Pass
    }
}

/// Node/edge footprint of one connected component.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentStat {
    pub index: usize,
    pub nodes: usize,
    pub edges: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Statistics {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub nodes_by_source: BTreeMap<String, usize>,
    pub edges_by_source: BTreeMap<String, usize>,
    pub connected_components: usize,
    pub largest_component: usize,
    /// Largest components, size-descending.
    pub components: Vec<ComponentStat>,
    pub unique_fairways: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BorderConnectionStat {
    pub a: NodeId,
    pub b: NodeId,
    pub gap_m: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BorderIntegrity {
    pub status: CheckStatus,
    pub total_connections: usize,
    pub expected_connections: usize,
    pub min_gap_m: f64,
    pub avg_gap_m: f64,
    pub max_gap_m: f64,
    pub connections: Vec<BorderConnectionStat>,
}

/// Attribute findings for one element type.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AttributeCompliance {
    /// Unmapped keys that look legacy, with occurrence counts.
    pub legacy_keys: BTreeMap<String, usize>,
    /// Canonical attributes with their missing-or-null element counts.
    pub missing_counts: BTreeMap<String, usize>,
    pub expected_attributes: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SchemaCompliance {
    pub nodes: AttributeCompliance,
    pub edges: AttributeCompliance,
}

#[derive(Debug, Clone, Serialize)]
pub struct CriticalCheck {
    pub name: String,
    pub status: CheckStatus,
    pub details: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CriticalConnections {
    pub checks: Vec<CriticalCheck>,
}

/// The full validation report handed to rendering collaborators.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub statistics: Statistics,
    pub border_integrity: BorderIntegrity,
    pub schema_compliance: SchemaCompliance,
    pub critical_connections: CriticalConnections,
}
