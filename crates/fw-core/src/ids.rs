use core::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a junction/node within one source network.
///
/// The two source networks use disjoint id spaces: the national export keys
/// junctions by a numeric id, the regional export by a country-prefixed
/// object code. Both fit a string payload; ids are unique within one source
/// graph, and [`NodeId::namespaced`] prefixes the source tag at merge time
/// to guarantee global uniqueness.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Prefix the id with a source tag, e.g. `NAT_22638200`.
    pub fn namespaced(&self, tag: &str) -> NodeId {
        NodeId(format!("{}_{}", tag, self.0))
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<i64> for NodeId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
