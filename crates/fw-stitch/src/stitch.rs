//! Geometric border stitching.

use std::collections::{BTreeMap, BTreeSet};

use fw_core::attrs::AttrMap;
use fw_core::error::{FwError, FwResult};
use fw_core::geom::MetricProjector;
use fw_core::ids::NodeId;
use fw_graph::WaterwayGraph;
use geo::line_measures::Distance;
use geo::{Euclidean, Point};
use rstar::RTree;
use rstar::primitives::GeomWithData;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Candidate cross-network link discovered by geometric matching.
#[derive(Debug, Clone)]
pub struct BorderConnection {
    /// Secondary node on the foreign side of the crossing.
    pub foreign_node: NodeId,
    pub foreign_country: String,
    /// Secondary node on the home side; the geometric anchor.
    pub bridgehead: NodeId,
    /// Nearest primary node accepted for the bridgehead.
    pub matched_node: NodeId,
    pub distance_m: f64,
    /// Attributes of the original secondary crossing edge.
    pub edge_attrs: AttrMap,
}

/// Injected stitching parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StitchConfig {
    /// Country the primary network is authoritative for.
    pub home_country: String,
    /// UTM zone of the metric plane used for distance math.
    pub utm_zone: u8,
    /// Maximum bridgehead-to-primary-node distance for a match, meters.
    #[serde(default = "default_distance_threshold")]
    pub distance_threshold_m: f64,
}

fn default_distance_threshold() -> f64 {
    100.0
}

impl StitchConfig {
    pub fn from_yaml_str(text: &str) -> FwResult<Self> {
        serde_yaml::from_str(text).map_err(|e| FwError::Config(e.to_string()))
    }
}

/// Find candidate connections between the primary and secondary networks.
///
/// Every secondary edge crossing from the home country into a neighbour
/// yields a (foreign, bridgehead) pair; each distinct bridgehead is matched
/// to the nearest primary node in the projected plane and accepted below
/// the distance threshold. Primary nodes without geometry never enter the
/// index. Several bridgeheads may resolve to the same primary node; all
/// are kept.
pub fn find_border_connections(
    primary: &WaterwayGraph,
    secondary: &WaterwayGraph,
    config: &StitchConfig,
) -> Vec<BorderConnection> {
    let projector = MetricProjector::utm_zone(config.utm_zone);

    let indexed: Vec<GeomWithData<[f64; 2], NodeId>> = primary
        .nodes()
        .filter_map(|(id, node)| {
            let p = projector.project(node.geometry?);
            Some(GeomWithData::new([p.x(), p.y()], id.clone()))
        })
        .collect();
    if indexed.is_empty() {
        warn!("primary graph has no nodes with geometry; nothing to stitch");
        return Vec::new();
    }
    let tree = RTree::bulk_load(indexed);

    // Crossing edges: home-country endpoint becomes the bridgehead.
    let mut crossings: Vec<(NodeId, NodeId, String)> = Vec::new();
    let mut bridgeheads: BTreeSet<NodeId> = BTreeSet::new();
    for (key, _) in secondary.edges() {
        let (u, v) = key.endpoints();
        let u_country = secondary.node(u).and_then(|n| n.country_code().map(str::to_owned));
        let v_country = secondary.node(v).and_then(|n| n.country_code().map(str::to_owned));
        let (Some(u_country), Some(v_country)) = (u_country, v_country) else {
            continue;
        };
        if u_country == config.home_country && v_country != config.home_country {
            crossings.push((v.clone(), u.clone(), v_country));
            bridgeheads.insert(u.clone());
        } else if v_country == config.home_country && u_country != config.home_country {
            crossings.push((u.clone(), v.clone(), u_country));
            bridgeheads.insert(v.clone());
        }
    }
    info!(
        crossings = crossings.len(),
        bridgeheads = bridgeheads.len(),
        "found cross-border edges in secondary network"
    );

    // Nearest primary node per bridgehead, under the threshold.
    let mut matches: BTreeMap<NodeId, (NodeId, f64)> = BTreeMap::new();
    for bridgehead in &bridgeheads {
        let Some(geometry) = secondary.node(bridgehead).and_then(|n| n.geometry) else {
            warn!(node = %bridgehead, "bridgehead without geometry");
            continue;
        };
        let p = projector.project(geometry);
        let Some(nearest) = tree.nearest_neighbor(&[p.x(), p.y()]) else {
            continue;
        };
        let q = nearest.geom();
        let distance = Euclidean.distance(p, Point::new(q[0], q[1]));
        if distance < config.distance_threshold_m {
            debug!(
                bridgehead = %bridgehead,
                matched = %nearest.data,
                distance_m = distance,
                "matched bridgehead"
            );
            matches.insert(bridgehead.clone(), (nearest.data.clone(), distance));
        } else {
            debug!(
                bridgehead = %bridgehead,
                distance_m = distance,
                "nearest primary node beyond threshold"
            );
        }
    }

    let mut connections = Vec::new();
    for (foreign, bridgehead, country) in crossings {
        let Some((matched, distance)) = matches.get(&bridgehead) else {
            continue;
        };
        // Edge lookup is orientation-free.
        let edge_attrs = secondary
            .edge(&foreign, &bridgehead)
            .map(|e| e.attrs.clone())
            .unwrap_or_default();
        connections.push(BorderConnection {
            foreign_node: foreign,
            foreign_country: country,
            bridgehead,
            matched_node: matched.clone(),
            distance_m: *distance,
            edge_attrs,
        });
    }

    info!(count = connections.len(), "established border connections");
    connections
}

#[cfg(test)]
mod tests {
    use super::*;
    use fw_core::attrs::{AttrValue, keys};
    use fw_graph::{Edge, Node, WaterwayGraph};

    fn node(country: &str, lon: f64, lat: f64) -> Node {
        let mut n = Node::with_geometry(Point::new(lon, lat));
        n.attrs
            .insert(keys::COUNTRY_CODE.into(), AttrValue::from(country));
        n
    }

    fn config() -> StitchConfig {
        StitchConfig {
            home_country: "NL".into(),
            utm_zone: 32,
            distance_threshold_m: 100.0,
        }
    }

    fn secondary_with_offset(offset_deg: f64) -> WaterwayGraph {
        let mut g = WaterwayGraph::new();
        g.add_node(NodeId::new("DE_1"), node("DE", 6.2, 51.9));
        g.add_node(
            NodeId::new("NL_1"),
            node("NL", 6.1 + offset_deg, 51.9 + offset_deg),
        );
        g.add_node(NodeId::new("NL_2"), node("NL", 6.0, 51.9));
        let mut crossing = Edge::default();
        crossing
            .attrs
            .insert("name".into(), AttrValue::from("Rhine crossing"));
        g.add_edge(NodeId::new("DE_1"), NodeId::new("NL_1"), crossing);
        g.add_edge(NodeId::new("NL_1"), NodeId::new("NL_2"), Edge::default());
        g
    }

    fn primary() -> WaterwayGraph {
        let mut g = WaterwayGraph::new();
        g.add_node(NodeId::from(1001), Node::with_geometry(Point::new(6.1, 51.9)));
        g.add_node(NodeId::from(1002), Node::with_geometry(Point::new(6.0, 51.9)));
        g.add_edge(NodeId::from(1001), NodeId::from(1002), Edge::default());
        g
    }

    #[test]
    fn bridgehead_within_threshold_is_matched() {
        // ~13 m offset; well under the 100 m threshold.
        let connections =
            find_border_connections(&primary(), &secondary_with_offset(0.0001), &config());

        assert_eq!(connections.len(), 1);
        let c = &connections[0];
        assert_eq!(c.foreign_node, NodeId::new("DE_1"));
        assert_eq!(c.foreign_country, "DE");
        assert_eq!(c.bridgehead, NodeId::new("NL_1"));
        assert_eq!(c.matched_node, NodeId::from(1001));
        assert!(c.distance_m > 1.0 && c.distance_m < 100.0);
        assert_eq!(c.edge_attrs["name"], AttrValue::from("Rhine crossing"));
    }

    #[test]
    fn bridgehead_beyond_threshold_is_rejected() {
        // ~700 m offset; nearest node exists but is too far.
        let connections =
            find_border_connections(&primary(), &secondary_with_offset(0.005), &config());
        assert!(connections.is_empty());
    }

    #[test]
    fn primary_nodes_without_geometry_are_excluded() {
        let mut primary = WaterwayGraph::new();
        primary.add_node(NodeId::from(1001), Node::default());

        let connections =
            find_border_connections(&primary, &secondary_with_offset(0.0001), &config());
        assert!(connections.is_empty());
    }

    #[test]
    fn config_from_yaml() {
        let config = StitchConfig::from_yaml_str(
            "home_country: NL\nutm_zone: 32\n",
        )
        .unwrap();
        assert_eq!(config.home_country, "NL");
        assert_eq!(config.distance_threshold_m, 100.0);
    }
}
