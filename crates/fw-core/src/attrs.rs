//! Open-ended attribute model for graph elements.
//!
//! Enrichment sources are heterogeneous, so nodes and edges carry a generic
//! ordered key-value map rather than a fixed record type. Typed accessors
//! exist only for the handful of fields the algorithms branch on; everything
//! else passes through untouched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single attribute value.
///
/// `Null` models an empty tabular cell; merges never let it clobber an
/// existing value (see [`merge_non_null`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl AttrValue {
    pub fn is_null(&self) -> bool {
        matches!(self, AttrValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttrValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view; ints widen to f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Float(f) => Some(*f),
            AttrValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        AttrValue::Bool(v)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Int(v)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Float(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Str(v.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::Str(v)
    }
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(AttrValue::Null, Into::into)
    }
}

/// Ordered attribute map; deterministic iteration keeps every downstream
/// report and dedup key stable.
pub type AttrMap = BTreeMap<String, AttrValue>;

/// Merge `src` into `dst`, skipping null values: a null never overwrites an
/// existing attribute, and unmatched records simply contribute nothing.
pub fn merge_non_null(dst: &mut AttrMap, src: &AttrMap) {
    for (key, value) in src {
        if !value.is_null() {
            dst.insert(key.clone(), value.clone());
        }
    }
}

/// Source tag stamped on stitched border edges.
pub const BORDER_SOURCE: &str = "BORDER";

/// Well-known attribute keys the pipeline branches on.
pub mod keys {
    /// Source tag of the network an element came from (`BORDER` on stitched edges).
    pub const SOURCE: &str = "source";
    /// ISO country code of a node.
    pub const COUNTRY_CODE: &str = "country_code";
    /// Connected-component index stamped on nodes and edges.
    pub const COMPONENT: &str = "component";
    /// Boolean flag on intra-network border link edges.
    pub const IS_BORDER: &str = "is_border";
    /// Geodesic edge length in meters.
    pub const LENGTH_M: &str = "length_m";
    /// Section id an edge was built from (national network).
    pub const SECTION_ID: &str = "section_id";
    /// Section code an edge was built from (regional network).
    pub const SECTION_REF: &str = "section_ref";
    /// Fairway the section belongs to.
    pub const FAIRWAY_ID: &str = "fairway_id";
    /// Original location code of a regional node.
    pub const LOCATION_CODE: &str = "location_code";
    /// Bridgehead node id recorded on stitched border edges.
    pub const BRIDGEHEAD: &str = "bridgehead";
    /// Geometric gap bridged by a stitched border edge, meters.
    pub const GAP_M: &str = "gap_m";
    /// How a stitched border edge was derived.
    pub const CONNECTION_TYPE: &str = "connection_type";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_skips_nulls() {
        let mut dst = AttrMap::new();
        dst.insert("depth".into(), AttrValue::Float(3.5));
        dst.insert("name".into(), AttrValue::Str("Maas".into()));

        let mut src = AttrMap::new();
        src.insert("depth".into(), AttrValue::Null);
        src.insert("width".into(), AttrValue::Float(50.0));

        merge_non_null(&mut dst, &src);

        // Null must not clobber, non-null must land.
        assert_eq!(dst["depth"], AttrValue::Float(3.5));
        assert_eq!(dst["width"], AttrValue::Float(50.0));
        assert_eq!(dst["name"], AttrValue::Str("Maas".into()));
    }

    #[test]
    fn merge_overwrites_with_non_null() {
        let mut dst = AttrMap::new();
        dst.insert("class".into(), AttrValue::Str("IV".into()));

        let mut src = AttrMap::new();
        src.insert("class".into(), AttrValue::Str("Va".into()));

        merge_non_null(&mut dst, &src);
        assert_eq!(dst["class"], AttrValue::Str("Va".into()));
    }

    #[test]
    fn option_conversion() {
        assert_eq!(AttrValue::from(None::<f64>), AttrValue::Null);
        assert_eq!(AttrValue::from(Some(2.0)), AttrValue::Float(2.0));
    }
}
