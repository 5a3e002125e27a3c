//! Connected-component partitioning.
//!
//! Component indices are assigned by ascending minimum contained node id,
//! not by input enumeration order, so logically equal graphs built from
//! differently ordered inputs number their components identically.

use std::collections::HashMap;

use fw_core::attrs::{AttrValue, keys};
use fw_core::ids::NodeId;
use petgraph::unionfind::UnionFind;

use crate::graph::WaterwayGraph;

/// Partition the graph into connected components.
///
/// Returns one sorted node-id vector per component; components are ordered
/// by their smallest node id.
pub fn connected_components(graph: &WaterwayGraph) -> Vec<Vec<NodeId>> {
    let index: HashMap<&NodeId, usize> = graph
        .nodes()
        .enumerate()
        .map(|(i, (id, _))| (id, i))
        .collect();

    let mut uf = UnionFind::<usize>::new(index.len());
    for (key, _) in graph.edges() {
        let (u, v) = key.endpoints();
        uf.union(index[u], index[v]);
    }

    // Node iteration is ordered, so the first node of each component is
    // its minimum id and components come out in min-id order.
    let mut root_to_component: HashMap<usize, usize> = HashMap::new();
    let mut components: Vec<Vec<NodeId>> = Vec::new();
    for (id, _) in graph.nodes() {
        let root = uf.find_mut(index[id]);
        let slot = *root_to_component.entry(root).or_insert_with(|| {
            components.push(Vec::new());
            components.len() - 1
        });
        components[slot].push(id.clone());
    }
    components
}

/// Stamp every node and edge with its component index; returns the number
/// of components.
pub fn assign_components(graph: &mut WaterwayGraph) -> usize {
    let components = connected_components(graph);

    let mut component_of: HashMap<NodeId, i64> = HashMap::new();
    for (i, members) in components.iter().enumerate() {
        for id in members {
            component_of.insert(id.clone(), i as i64);
        }
    }

    for (id, node) in graph.nodes_mut() {
        node.attrs
            .insert(keys::COMPONENT.into(), AttrValue::Int(component_of[id]));
    }
    for (key, edge) in graph.edges_mut() {
        let (u, _) = key.endpoints();
        edge.attrs
            .insert(keys::COMPONENT.into(), AttrValue::Int(component_of[u]));
    }

    components.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, Node};

    fn chain(ids: &[i64]) -> WaterwayGraph {
        let mut g = WaterwayGraph::new();
        for id in ids {
            g.add_node(NodeId::from(*id), Node::default());
        }
        for pair in ids.windows(2) {
            g.add_edge(NodeId::from(pair[0]), NodeId::from(pair[1]), Edge::default());
        }
        g
    }

    #[test]
    fn two_islands() {
        let mut g = chain(&[1, 2, 3]);
        // A second, disjoint pair.
        g.add_edge(NodeId::from(10), NodeId::from(11), Edge::default());

        let components = connected_components(&g);
        assert_eq!(components.len(), 2);
        assert_eq!(components[0].len(), 3);
        assert_eq!(components[1].len(), 2);

        let n = assign_components(&mut g);
        assert_eq!(n, 2);
        assert_eq!(
            g.node(&NodeId::from(2)).unwrap().attrs[keys::COMPONENT],
            AttrValue::Int(0)
        );
        assert_eq!(
            g.node(&NodeId::from(10)).unwrap().attrs[keys::COMPONENT],
            AttrValue::Int(1)
        );
        assert_eq!(
            g.edge(&NodeId::from(10), &NodeId::from(11)).unwrap().attrs[keys::COMPONENT],
            AttrValue::Int(1)
        );
    }

    #[test]
    fn numbering_independent_of_insertion_order() {
        let mut a = WaterwayGraph::new();
        a.add_edge(NodeId::from(10), NodeId::from(11), Edge::default());
        a.add_edge(NodeId::from(1), NodeId::from(2), Edge::default());

        let mut b = WaterwayGraph::new();
        b.add_edge(NodeId::from(1), NodeId::from(2), Edge::default());
        b.add_edge(NodeId::from(10), NodeId::from(11), Edge::default());

        assert_eq!(connected_components(&a), connected_components(&b));
    }

    #[test]
    fn isolated_node_is_its_own_component() {
        let mut g = chain(&[1, 2]);
        g.add_node(NodeId::from(99), Node::default());
        assert_eq!(connected_components(&g).len(), 2);
    }
}
