//! National network builder: one undirected edge per section record.

use fw_core::attrs::{AttrMap, AttrValue, keys};
use fw_core::ids::NodeId;
use geo::{LineString, Point};
use tracing::{debug, info};

use crate::graph::{Edge, Node, WaterwayGraph};

/// One row of the section export.
#[derive(Debug, Clone)]
pub struct SectionRecord {
    pub id: i64,
    pub start_junction: Option<i64>,
    pub end_junction: Option<i64>,
    pub route_id: Option<i64>,
    pub route_km_begin: Option<f64>,
    pub route_km_end: Option<f64>,
    pub geometry: Option<LineString<f64>>,
    /// Descriptive columns carried onto the edge verbatim.
    pub attrs: AttrMap,
}

impl SectionRecord {
    /// Route/km range normalized to [min, max]; the source digitizes some
    /// sections against the route direction.
    pub fn route_range(&self) -> Option<(i64, f64, f64)> {
        let route = self.route_id?;
        let begin = self.route_km_begin?;
        let end = self.route_km_end?;
        Some((route, begin.min(end), begin.max(end)))
    }
}

/// One row of the junction export.
#[derive(Debug, Clone)]
pub struct JunctionRecord {
    pub id: i64,
    pub geometry: Option<Point<f64>>,
    pub attrs: AttrMap,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionGraphStats {
    pub sections_total: usize,
    pub sections_kept: usize,
    pub junctions_total: usize,
    pub junctions_kept: usize,
}

/// Build an undirected graph from section and junction tables.
///
/// Sections missing either endpoint id are dropped (counted); only
/// junctions referenced by a retained section are kept. Each retained
/// section becomes one edge carrying its descriptive columns and geometry;
/// a repeated endpoint pair keeps the last section written. Junction
/// columns land on the matching nodes, last write wins on conflict.
///
/// Never fails: empty inputs yield an empty graph.
pub fn build_section_graph(
    sections: &[SectionRecord],
    junctions: &[JunctionRecord],
) -> (WaterwayGraph, SectionGraphStats) {
    let mut graph = WaterwayGraph::new();
    let mut stats = SectionGraphStats {
        sections_total: sections.len(),
        junctions_total: junctions.len(),
        ..Default::default()
    };

    for section in sections {
        let (Some(start), Some(end)) = (section.start_junction, section.end_junction) else {
            debug!(section = section.id, "dropping section without junction ids");
            continue;
        };
        stats.sections_kept += 1;

        let mut edge = Edge {
            geometry: section.geometry.clone(),
            attrs: section.attrs.clone(),
        };
        edge.attrs
            .insert(keys::SECTION_ID.into(), AttrValue::Int(section.id));
        graph.add_edge(NodeId::from(start), NodeId::from(end), edge);
    }

    info!(
        total = stats.sections_total,
        kept = stats.sections_kept,
        removed = stats.sections_total - stats.sections_kept,
        "filtered sections"
    );

    for junction in junctions {
        let id = NodeId::from(junction.id);
        if !graph.contains_node(&id) {
            continue;
        }
        stats.junctions_kept += 1;
        graph.add_node(
            id,
            Node {
                geometry: junction.geometry,
                attrs: junction.attrs.clone(),
            },
        );
    }

    info!(
        total = stats.junctions_total,
        kept = stats.junctions_kept,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built section graph"
    );

    (graph, stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(id: i64, start: Option<i64>, end: Option<i64>) -> SectionRecord {
        SectionRecord {
            id,
            start_junction: start,
            end_junction: end,
            route_id: None,
            route_km_begin: None,
            route_km_end: None,
            geometry: None,
            attrs: AttrMap::new(),
        }
    }

    #[test]
    fn drops_sections_without_endpoints() {
        let sections = vec![
            section(1, Some(10), Some(11)),
            section(2, None, Some(11)),
            section(3, Some(10), None),
        ];
        let (graph, stats) = build_section_graph(&sections, &[]);

        assert_eq!(stats.sections_kept, 1);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn keeps_only_referenced_junctions() {
        let sections = vec![section(1, Some(10), Some(11))];
        let junctions = vec![
            JunctionRecord {
                id: 10,
                geometry: Some(Point::new(4.0, 52.0)),
                attrs: AttrMap::new(),
            },
            JunctionRecord {
                id: 99,
                geometry: Some(Point::new(5.0, 53.0)),
                attrs: AttrMap::new(),
            },
        ];
        let (graph, stats) = build_section_graph(&sections, &junctions);

        assert_eq!(stats.junctions_kept, 1);
        assert!(!graph.contains_node(&NodeId::from(99)));
        assert!(graph.node(&NodeId::from(10)).unwrap().geometry.is_some());
    }

    #[test]
    fn edge_carries_section_attrs() {
        let mut s = section(42, Some(1), Some(2));
        s.attrs.insert("name".into(), AttrValue::from("Lek"));
        s.geometry = Some(LineString::from(vec![(4.0, 52.0), (4.1, 52.1)]));

        let (graph, _) = build_section_graph(&[s], &[]);
        let edge = graph.edge(&NodeId::from(1), &NodeId::from(2)).unwrap();

        assert_eq!(edge.section_id(), Some(42));
        assert_eq!(edge.attrs["name"], AttrValue::from("Lek"));
        assert!(edge.geometry.is_some());
    }

    #[test]
    fn empty_input_is_fine() {
        let (graph, stats) = build_section_graph(&[], &[]);
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(stats, SectionGraphStats::default());
    }

    #[test]
    fn route_range_normalizes_direction() {
        let mut s = section(1, Some(1), Some(2));
        s.route_id = Some(7);
        s.route_km_begin = Some(12.5);
        s.route_km_end = Some(3.0);
        assert_eq!(s.route_range(), Some((7, 3.0, 12.5)));
    }
}
