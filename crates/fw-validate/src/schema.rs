//! Schema harmonization: rename legacy attribute keys to canonical names.

use fw_core::attrs::AttrMap;
use std::collections::BTreeMap;
use tracing::info;

use crate::config::SchemaMapping;
use fw_graph::WaterwayGraph;

fn rename_keys(attrs: &mut AttrMap, mapping: &BTreeMap<String, String>) -> usize {
    let mut renamed = 0;
    for (old, new) in mapping {
        if let Some(value) = attrs.remove(old) {
            // Strict rename: the canonical name wins over any existing value.
            attrs.insert(new.clone(), value);
            renamed += 1;
        }
    }
    renamed
}

/// Rename node and edge attributes per the configured old→new mapping.
///
/// Run before validation so schema-compliance counts reflect canonical
/// names; keys absent from the mapping pass through untouched.
pub fn apply_schema_mapping(graph: &mut WaterwayGraph, mapping: &SchemaMapping) {
    let mut node_renames = 0;
    for (_, node) in graph.nodes_mut() {
        node_renames += rename_keys(&mut node.attrs, &mapping.nodes);
    }

    let mut edge_renames = 0;
    for (_, edge) in graph.edges_mut() {
        edge_renames += rename_keys(&mut edge.attrs, &mapping.edges);
    }

    info!(node_renames, edge_renames, "harmonized attribute names");
}
