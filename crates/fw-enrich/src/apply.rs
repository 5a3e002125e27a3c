//! Application of enrichment tables onto graph edges.

use std::collections::HashMap;

use fw_core::attrs::merge_non_null;
use fw_core::ids::NodeId;
use fw_graph::{EdgeKey, SectionRecord, WaterwayGraph};
use tracing::info;

use crate::matching::select_prefixed;
use crate::records::SectionRefRecord;
use crate::table::EnrichmentTable;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyStats {
    pub edges_total: usize,
    pub edges_enriched: usize,
}

/// Merge a per-section enrichment table onto the edges of a graph.
///
/// Sections are keyed by their unordered endpoint pair, so the lookup
/// succeeds for either edge orientation. Only non-null values are merged;
/// an existing attribute is never blanked. Edges whose pair resolves to no
/// section — stitched border edges, for instance — stay unenriched.
pub fn apply_section_enrichment(
    graph: &mut WaterwayGraph,
    sections: &[SectionRecord],
    table: &EnrichmentTable,
) -> ApplyStats {
    let mut section_of: HashMap<EdgeKey, i64> = HashMap::new();
    for section in sections {
        if let (Some(start), Some(end)) = (section.start_junction, section.end_junction) {
            section_of.insert(
                EdgeKey::new(NodeId::from(start), NodeId::from(end)),
                section.id,
            );
        }
    }
    info!(entries = section_of.len(), "built endpoint-pair lookup");

    let mut stats = ApplyStats::default();
    for (key, edge) in graph.edges_mut() {
        stats.edges_total += 1;
        let Some(section_id) = section_of.get(key) else {
            continue;
        };
        let Some(attrs) = table.get(section_id) else {
            continue;
        };
        if !attrs.is_empty() {
            merge_non_null(&mut edge.attrs, attrs);
            stats.edges_enriched += 1;
        }
    }

    info!(
        enriched = stats.edges_enriched,
        total = stats.edges_total,
        "applied section enrichment"
    );
    stats
}

/// Join auxiliary rows onto edges via a shared section-reference code.
///
/// Used for datasets that carry the regional network's section codes
/// (sailing speed, for one) instead of shared geometry. The first row per
/// reference wins. Returns the number of edges enriched.
pub fn enrich_by_section_ref(
    graph: &mut WaterwayGraph,
    aux: &[SectionRefRecord],
    columns: &[&str],
    prefix: &str,
) -> usize {
    let mut by_ref: HashMap<&str, &SectionRefRecord> = HashMap::new();
    for row in aux {
        by_ref.entry(row.section_ref.as_str()).or_insert(row);
    }
    info!(entries = by_ref.len(), prefix, "built section-reference lookup");

    let mut enriched = 0usize;
    for (_, edge) in graph.edges_mut() {
        let Some(section_ref) = edge.section_ref().map(str::to_owned) else {
            continue;
        };
        let Some(row) = by_ref.get(section_ref.as_str()) else {
            continue;
        };
        let selected = select_prefixed(&row.attrs, columns, prefix);
        if !selected.is_empty() {
            merge_non_null(&mut edge.attrs, &selected);
            enriched += 1;
        }
    }

    info!(enriched, prefix, "applied section-reference enrichment");
    enriched
}
