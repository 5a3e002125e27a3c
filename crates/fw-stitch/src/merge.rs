//! Composition of the two networks into one namespaced graph.

use std::collections::BTreeSet;

use fw_core::attrs::{AttrValue, keys};
use fw_core::error::{FwError, FwResult};
use fw_core::ids::NodeId;
use fw_graph::{Edge, WaterwayGraph, connected_components};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::stitch::BorderConnection;

/// Source tag stamped on stitched border edges.
pub const BORDER_TAG: &str = fw_core::attrs::BORDER_SOURCE;

/// Injected merge parameters.
///
/// The pruning sets are manual corrections for known duplicate or
/// erroneous geometry near borders. They are configuration, never
/// literals, which keeps the merge pure and testable against synthetic
/// fixtures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Tag and id-namespace prefix for the primary network.
    pub primary_tag: String,
    /// Tag and id-namespace prefix for the secondary network.
    pub secondary_tag: String,
    /// Country the primary network is authoritative for; secondary nodes
    /// there are dropped.
    pub home_country: String,
    /// Primary node ids to drop, with every edge touching them.
    #[serde(default)]
    pub pruned_nodes: BTreeSet<NodeId>,
    /// Primary section ids whose edges are dropped.
    #[serde(default)]
    pub pruned_sections: BTreeSet<i64>,
}

impl MergeConfig {
    pub fn from_yaml_str(text: &str) -> FwResult<Self> {
        serde_yaml::from_str(text).map_err(|e| FwError::Config(e.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub nodes: usize,
    pub edges: usize,
    pub components: usize,
    pub pruned_primary_nodes: usize,
    pub pruned_primary_edges: usize,
    pub skipped_secondary_nodes: usize,
    pub border_edges: usize,
}

/// Merge the primary and secondary graphs plus accepted border
/// connections into one graph with source-namespaced ids.
///
/// Primary elements are inserted minus the configured exclusions;
/// secondary elements minus everything in the primary's home country,
/// where the primary is authoritative. Each connection becomes one edge
/// between the matched primary node and the foreign secondary node,
/// carrying the original crossing's attributes plus merge metadata — the
/// bridgehead itself is deliberately not inserted.
pub fn merge_graphs(
    primary: &WaterwayGraph,
    secondary: &WaterwayGraph,
    connections: &[BorderConnection],
    config: &MergeConfig,
) -> (WaterwayGraph, MergeStats) {
    let mut merged = WaterwayGraph::new();
    let mut stats = MergeStats::default();

    for (id, node) in primary.nodes() {
        if config.pruned_nodes.contains(id) {
            info!(node = %id, "pruning primary node by manual correction");
            stats.pruned_primary_nodes += 1;
            continue;
        }
        let mut node = node.clone();
        node.attrs.insert(
            keys::SOURCE.into(),
            AttrValue::from(config.primary_tag.clone()),
        );
        merged.add_node(id.namespaced(&config.primary_tag), node);
    }

    for (key, edge) in primary.edges() {
        let (u, v) = key.endpoints();
        let pruned_section = edge
            .section_id()
            .is_some_and(|id| config.pruned_sections.contains(&id));
        if pruned_section {
            info!(from = %u, to = %v, "pruning primary edge by manual correction");
            stats.pruned_primary_edges += 1;
            continue;
        }
        if config.pruned_nodes.contains(u) || config.pruned_nodes.contains(v) {
            stats.pruned_primary_edges += 1;
            continue;
        }
        let mut edge = edge.clone();
        edge.attrs.insert(
            keys::SOURCE.into(),
            AttrValue::from(config.primary_tag.clone()),
        );
        merged.add_edge(
            u.namespaced(&config.primary_tag),
            v.namespaced(&config.primary_tag),
            edge,
        );
    }

    // Secondary coverage of the home country duplicates the primary
    // network and is skipped wholesale.
    for (id, node) in secondary.nodes() {
        if node.country_code() == Some(config.home_country.as_str()) {
            stats.skipped_secondary_nodes += 1;
            continue;
        }
        let mut node = node.clone();
        node.attrs.insert(
            keys::SOURCE.into(),
            AttrValue::from(config.secondary_tag.clone()),
        );
        merged.add_node(id.namespaced(&config.secondary_tag), node);
    }

    for (key, edge) in secondary.edges() {
        let (u, v) = key.endpoints();
        let home = |id: &NodeId| {
            secondary
                .node(id)
                .and_then(|n| n.country_code())
                .is_some_and(|c| c == config.home_country)
        };
        if home(u) || home(v) {
            continue;
        }
        let mut edge = edge.clone();
        edge.attrs.insert(
            keys::SOURCE.into(),
            AttrValue::from(config.secondary_tag.clone()),
        );
        merged.add_edge(
            u.namespaced(&config.secondary_tag),
            v.namespaced(&config.secondary_tag),
            edge,
        );
    }

    for connection in connections {
        let u = connection.matched_node.namespaced(&config.primary_tag);
        let v = connection.foreign_node.namespaced(&config.secondary_tag);
        debug!(from = %u, to = %v, gap_m = connection.distance_m, "adding border edge");

        let mut edge = Edge {
            geometry: None,
            attrs: connection.edge_attrs.clone(),
        };
        edge.attrs
            .insert(keys::SOURCE.into(), AttrValue::from(BORDER_TAG));
        edge.attrs.insert(
            keys::BRIDGEHEAD.into(),
            AttrValue::from(connection.bridgehead.as_str()),
        );
        edge.attrs
            .insert(keys::GAP_M.into(), AttrValue::Float(connection.distance_m));
        edge.attrs.insert(
            keys::CONNECTION_TYPE.into(),
            AttrValue::from("geometric"),
        );
        merged.add_edge(u, v, edge);
        stats.border_edges += 1;
    }

    stats.nodes = merged.node_count();
    stats.edges = merged.edge_count();
    stats.components = connected_components(&merged).len();
    info!(
        nodes = stats.nodes,
        edges = stats.edges,
        components = stats.components,
        border_edges = stats.border_edges,
        "merged graphs"
    );

    (merged, stats)
}
