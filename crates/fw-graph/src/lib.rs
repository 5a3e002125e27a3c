//! fw-graph: graph model and builders for the fairway workspace.
//!
//! Provides:
//! - Core graph data structures (Node, Edge, WaterwayGraph)
//! - Section-table builder for the national network
//! - Multi-region builder for the regional network
//! - Connected-component partitioning and stamping
//!
//! # Example
//!
//! ```
//! use fw_core::NodeId;
//! use fw_graph::{Edge, Node, WaterwayGraph};
//!
//! let mut graph = WaterwayGraph::new();
//! graph.add_node(NodeId::from(1), Node::default());
//! graph.add_node(NodeId::from(2), Node::default());
//! graph.add_edge(NodeId::from(1), NodeId::from(2), Edge::default());
//!
//! assert_eq!(graph.node_count(), 2);
//! assert_eq!(graph.edge_count(), 1);
//! ```

pub mod components;
pub mod graph;
pub mod regional;
pub mod section;

// Re-exports for ergonomics
pub use components::{assign_components, connected_components};
pub use graph::{Edge, EdgeKey, Node, WaterwayGraph};
pub use regional::{
    RegionalGraphStats, RegionalNodeRecord, RegionalSectionRecord, build_regional_graph,
};
pub use section::{JunctionRecord, SectionGraphStats, SectionRecord, build_section_graph};
