//! Injected validation configuration.

use std::collections::BTreeMap;

use fw_core::error::{FwError, FwResult};
use serde::{Deserialize, Serialize};

/// Old-name → canonical-name attribute mapping per element type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaMapping {
    #[serde(default)]
    pub nodes: BTreeMap<String, String>,
    #[serde(default)]
    pub edges: BTreeMap<String, String>,
}

/// A hand-identified border link that must exist in the merged graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriticalConnectionSpec {
    pub name: String,
    /// Fragment matched against border-edge endpoint ids.
    pub node_ref: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Known-good baseline for the number of stitched border edges.
    #[serde(default)]
    pub expected_border_connections: usize,
    #[serde(default)]
    pub schema: SchemaMapping,
    #[serde(default)]
    pub critical_connections: Vec<CriticalConnectionSpec>,
}

impl ValidationConfig {
    pub fn from_yaml_str(text: &str) -> FwResult<Self> {
        serde_yaml::from_str(text).map_err(|e| FwError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let text = "\
expected_border_connections: 14
schema:
  nodes:
    Name: name
  edges:
    RouteId: route_id
critical_connections:
  - name: Lobith crossing
    node_ref: \"22638200\"
";
        let config = ValidationConfig::from_yaml_str(text).unwrap();
        assert_eq!(config.expected_border_connections, 14);
        assert_eq!(config.schema.edges["RouteId"], "route_id");
        assert_eq!(config.critical_connections[0].node_ref, "22638200");
    }

    #[test]
    fn empty_document_is_all_defaults() {
        let config = ValidationConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config.expected_border_connections, 0);
        assert!(config.critical_connections.is_empty());
    }
}
