//! Core graph data structures.

use std::collections::BTreeMap;

use fw_core::attrs::{AttrMap, AttrValue, keys};
use fw_core::ids::NodeId;
use geo::{LineString, Point};

/// A junction in the waterway network.
#[derive(Debug, Clone, Default)]
pub struct Node {
    pub geometry: Option<Point<f64>>,
    pub attrs: AttrMap,
}

impl Node {
    pub fn with_geometry(geometry: Point<f64>) -> Self {
        Self {
            geometry: Some(geometry),
            attrs: AttrMap::new(),
        }
    }

    /// Country code, where the source network carries one.
    pub fn country_code(&self) -> Option<&str> {
        self.attrs.get(keys::COUNTRY_CODE)?.as_str()
    }

    /// Source tag stamped at merge time.
    pub fn source(&self) -> Option<&str> {
        self.attrs.get(keys::SOURCE)?.as_str()
    }
}

/// A navigable section between two junctions.
#[derive(Debug, Clone, Default)]
pub struct Edge {
    pub geometry: Option<LineString<f64>>,
    pub attrs: AttrMap,
}

impl Edge {
    pub fn with_geometry(geometry: LineString<f64>) -> Self {
        Self {
            geometry: Some(geometry),
            attrs: AttrMap::new(),
        }
    }

    pub fn source(&self) -> Option<&str> {
        self.attrs.get(keys::SOURCE)?.as_str()
    }

    pub fn length_m(&self) -> Option<f64> {
        self.attrs.get(keys::LENGTH_M)?.as_f64()
    }

    pub fn is_border(&self) -> bool {
        self.attrs
            .get(keys::IS_BORDER)
            .and_then(AttrValue::as_bool)
            .unwrap_or(false)
    }

    /// Section code the edge was built from (regional network).
    pub fn section_ref(&self) -> Option<&str> {
        self.attrs.get(keys::SECTION_REF)?.as_str()
    }

    /// Section id the edge was built from (national network).
    pub fn section_id(&self) -> Option<i64> {
        self.attrs.get(keys::SECTION_ID)?.as_i64()
    }
}

/// Key for an undirected edge: the endpoint pair in sorted order, so a
/// lookup succeeds no matter which orientation the caller passes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    a: NodeId,
    b: NodeId,
}

impl EdgeKey {
    pub fn new(u: NodeId, v: NodeId) -> Self {
        if u <= v { Self { a: u, b: v } } else { Self { a: v, b: u } }
    }

    pub fn endpoints(&self) -> (&NodeId, &NodeId) {
        (&self.a, &self.b)
    }
}

/// An undirected attributed graph over waterway junctions and sections.
///
/// Graphs are rebuilt wholesale from a snapshot of tabular exports each
/// run; enrichment, stitching and merging are pure transforms that take
/// ownership. Node and edge maps are ordered, so iteration (and therefore
/// component numbering and every report) is deterministic.
#[derive(Debug, Clone, Default)]
pub struct WaterwayGraph {
    nodes: BTreeMap<NodeId, Node>,
    edges: BTreeMap<EdgeKey, Edge>,
}

impl WaterwayGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Insert a node, merging with any existing entry: attributes are
    /// extended last-write-wins, geometry is replaced when the new entry
    /// carries one.
    pub fn add_node(&mut self, id: NodeId, node: Node) {
        let entry = self.nodes.entry(id).or_default();
        if node.geometry.is_some() {
            entry.geometry = node.geometry;
        }
        entry.attrs.extend(node.attrs);
    }

    /// Insert an undirected edge; a repeated endpoint pair replaces the
    /// previous edge (last write wins). Endpoint nodes are created when
    /// absent so edge tables can be loaded before junction tables.
    pub fn add_edge(&mut self, u: NodeId, v: NodeId, edge: Edge) {
        self.nodes.entry(u.clone()).or_default();
        self.nodes.entry(v.clone()).or_default();
        self.edges.insert(EdgeKey::new(u, v), edge);
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Look up an edge by either endpoint ordering.
    pub fn edge(&self, u: &NodeId, v: &NodeId) -> Option<&Edge> {
        self.edges.get(&EdgeKey::new(u.clone(), v.clone()))
    }

    pub fn edge_mut(&mut self, u: &NodeId, v: &NodeId) -> Option<&mut Edge> {
        self.edges.get_mut(&EdgeKey::new(u.clone(), v.clone()))
    }

    pub fn nodes(&self) -> impl Iterator<Item = (&NodeId, &Node)> {
        self.nodes.iter()
    }

    pub fn nodes_mut(&mut self) -> impl Iterator<Item = (&NodeId, &mut Node)> {
        self.nodes.iter_mut()
    }

    pub fn edges(&self) -> impl Iterator<Item = (&EdgeKey, &Edge)> {
        self.edges.iter()
    }

    pub fn edges_mut(&mut self) -> impl Iterator<Item = (&EdgeKey, &mut Edge)> {
        self.edges.iter_mut()
    }
}
