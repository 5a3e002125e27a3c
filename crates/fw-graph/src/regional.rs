//! Regional network builder: many per-region node and section files share
//! one schema and are concatenated into a single graph.
//!
//! Node identity is the composite of the country code and the object code.
//! The country code is taken from the location-code field rather than the
//! file name, which tolerates rows filed under a neighbouring region.

use std::collections::{HashMap, HashSet};

use fw_core::attrs::{AttrMap, AttrValue, keys};
use fw_core::geom::geodesic_length_m;
use fw_core::ids::NodeId;
use geo::{LineString, Point};
use tracing::{debug, info, warn};

use crate::components::assign_components;
use crate::graph::{Edge, Node, WaterwayGraph};

/// One row of a per-region node file.
#[derive(Debug, Clone)]
pub struct RegionalNodeRecord {
    /// Location code; the first two characters are the country code.
    pub location_code: String,
    pub object_code: String,
    /// Section this node row belongs to.
    pub section_ref: Option<String>,
    /// Location code of the twin node across an intra-network border.
    pub border_ref: Option<String>,
    pub geometry: Option<Point<f64>>,
    pub attrs: AttrMap,
    /// File the row came from; ignored for row identity.
    pub source_file: String,
}

impl RegionalNodeRecord {
    fn country_code(&self) -> String {
        self.location_code.chars().take(2).collect()
    }

    fn node_id(&self) -> NodeId {
        NodeId::new(format!("{}_{}", self.country_code(), self.object_code))
    }

    /// Row identity for de-duplication; everything but the source file.
    fn identity(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}|{}",
            self.location_code,
            self.object_code,
            self.section_ref.as_deref().unwrap_or(""),
            self.border_ref.as_deref().unwrap_or(""),
            self.geometry
                .map(|p| format!("{} {}", p.x(), p.y()))
                .unwrap_or_default(),
            serde_json::to_string(&self.attrs).unwrap_or_default(),
        )
    }
}

/// One row of a per-region section file.
#[derive(Debug, Clone)]
pub struct RegionalSectionRecord {
    pub code: String,
    pub geometry: Option<LineString<f64>>,
    pub attrs: AttrMap,
    pub source_file: String,
}

impl RegionalSectionRecord {
    fn identity(&self) -> String {
        format!(
            "{}|{}|{}",
            self.code,
            self.geometry
                .as_ref()
                .map(|l| fw_core::geom::geometry_key(l))
                .unwrap_or_default(),
            serde_json::to_string(&self.attrs).unwrap_or_default(),
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegionalGraphStats {
    pub nodes_total: usize,
    pub duplicate_nodes_dropped: usize,
    pub sections_total: usize,
    pub duplicate_sections_dropped: usize,
    pub edges_built: usize,
    /// Sections no node row references; no edge is produced for them.
    pub sections_without_nodes: usize,
    /// Sections referenced by a single node row; these become self-loops.
    pub degenerate_sections: usize,
    pub border_links: usize,
    pub components: usize,
}

/// Build the regional graph from concatenated node and section rows.
///
/// Edges take the first and last node referencing each section code, in
/// input order. The source guarantees neither endpoint count; a section
/// with one referencing row yields a self-loop and one with none yields no
/// edge, both only counted. Intra-network border links are resolved by
/// matching a node's border reference against other nodes' location codes.
/// Every node and edge is stamped with its connected-component index, and
/// every edge with usable geometry gets a geodesic length in meters.
pub fn build_regional_graph(
    nodes: &[RegionalNodeRecord],
    sections: &[RegionalSectionRecord],
) -> (WaterwayGraph, RegionalGraphStats) {
    let mut stats = RegionalGraphStats {
        nodes_total: nodes.len(),
        sections_total: sections.len(),
        ..Default::default()
    };

    // Exact-duplicate rows appear where region files overlap; identity
    // ignores the source-file column.
    let mut seen = HashSet::new();
    let kept_nodes: Vec<&RegionalNodeRecord> = nodes
        .iter()
        .filter(|row| seen.insert(row.identity()))
        .collect();
    stats.duplicate_nodes_dropped = nodes.len() - kept_nodes.len();

    let mut seen = HashSet::new();
    let kept_sections: Vec<&RegionalSectionRecord> = sections
        .iter()
        .filter(|row| seen.insert(row.identity()))
        .collect();
    stats.duplicate_sections_dropped = sections.len() - kept_sections.len();

    info!(
        nodes = kept_nodes.len(),
        duplicate_nodes = stats.duplicate_nodes_dropped,
        sections = kept_sections.len(),
        duplicate_sections = stats.duplicate_sections_dropped,
        "concatenated regional files"
    );

    let mut graph = WaterwayGraph::new();

    for row in &kept_nodes {
        let mut node = Node {
            geometry: row.geometry,
            attrs: row.attrs.clone(),
        };
        node.attrs.insert(
            keys::COUNTRY_CODE.into(),
            AttrValue::from(row.country_code()),
        );
        node.attrs.insert(
            keys::LOCATION_CODE.into(),
            AttrValue::from(row.location_code.clone()),
        );
        graph.add_node(row.node_id(), node);
    }

    // Group node rows per referenced section, preserving input order so
    // first/last endpoints are stable.
    let mut rows_by_section: HashMap<&str, Vec<&RegionalNodeRecord>> = HashMap::new();
    for &row in &kept_nodes {
        if let Some(section_ref) = row.section_ref.as_deref() {
            rows_by_section.entry(section_ref).or_default().push(row);
        }
    }

    let mut built = HashSet::new();
    for section in &kept_sections {
        if !built.insert(section.code.as_str()) {
            continue;
        }
        let Some(rows) = rows_by_section.get(section.code.as_str()) else {
            stats.sections_without_nodes += 1;
            continue;
        };
        let start = rows.first().map(|r| r.node_id());
        let end = rows.last().map(|r| r.node_id());
        let (Some(start), Some(end)) = (start, end) else {
            stats.sections_without_nodes += 1;
            continue;
        };
        if rows.len() < 2 {
            debug!(code = %section.code, "section referenced by a single node row");
            stats.degenerate_sections += 1;
        }

        let mut edge = Edge {
            geometry: section.geometry.clone(),
            attrs: section.attrs.clone(),
        };
        edge.attrs.insert(
            keys::SECTION_REF.into(),
            AttrValue::from(section.code.clone()),
        );
        graph.add_edge(start, end, edge);
        stats.edges_built += 1;
    }

    if stats.sections_without_nodes > 0 {
        debug!(
            count = stats.sections_without_nodes,
            "sections without referencing nodes produced no edge"
        );
    }

    // Intra-network border links: a flagged node names the location code of
    // its counterpart on the other side of an administrative border.
    let mut by_location: HashMap<&str, Vec<&RegionalNodeRecord>> = HashMap::new();
    for &row in &kept_nodes {
        by_location
            .entry(row.location_code.as_str())
            .or_default()
            .push(row);
    }

    for row in &kept_nodes {
        let Some(border_ref) = row.border_ref.as_deref() else {
            continue;
        };
        let Some(targets) = by_location.get(border_ref) else {
            debug!(
                node = %row.node_id(),
                border_ref,
                "border reference matches no location code"
            );
            continue;
        };
        for target in targets {
            let source = row.node_id();
            let destination = target.node_id();
            let geometry = match (row.geometry, target.geometry) {
                (Some(a), Some(b)) => {
                    Some(LineString::from(vec![(a.x(), a.y()), (b.x(), b.y())]))
                }
                _ => {
                    warn!(
                        from = %source,
                        to = %destination,
                        "border link endpoint without geometry"
                    );
                    None
                }
            };
            let mut edge = Edge {
                geometry,
                attrs: AttrMap::new(),
            };
            edge.attrs
                .insert(keys::IS_BORDER.into(), AttrValue::Bool(true));
            graph.add_edge(source, destination, edge);
            stats.border_links += 1;
        }
    }
    info!(count = stats.border_links, "resolved intra-network border links");

    // Every edge carries the flag, not only the border ones.
    for (_, edge) in graph.edges_mut() {
        edge.attrs
            .entry(keys::IS_BORDER.into())
            .or_insert(AttrValue::Bool(false));
    }

    stats.components = assign_components(&mut graph);

    let mut lengths = 0usize;
    for (key, edge) in graph.edges_mut() {
        let Some(geometry) = &edge.geometry else {
            continue;
        };
        match geodesic_length_m(geometry) {
            Some(length) => {
                edge.attrs
                    .insert(keys::LENGTH_M.into(), AttrValue::Float(length));
                lengths += 1;
            }
            None => {
                let (u, v) = key.endpoints();
                warn!(from = %u, to = %v, "skipping length of degenerate geometry");
            }
        }
    }

    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        components = stats.components,
        edge_lengths = lengths,
        "built regional graph"
    );

    (graph, stats)
}
