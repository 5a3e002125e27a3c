//! The two section-matching strategies.
//!
//! Both produce a per-section-id attribute table with a per-source column
//! prefix; tables from several sources are combined downstream. Unmatched
//! sections simply have no entry, which is never an error.

use std::collections::HashMap;

use fw_core::attrs::AttrMap;
use fw_core::geom::geometry_key;
use fw_graph::SectionRecord;
use tracing::info;

use crate::records::AuxRecord;
use crate::table::EnrichmentTable;

/// Copy the listed columns out of `attrs` under a prefix, skipping nulls.
pub(crate) fn select_prefixed(attrs: &AttrMap, columns: &[&str], prefix: &str) -> AttrMap {
    let mut out = AttrMap::new();
    for column in columns {
        match attrs.get(*column) {
            Some(value) if !value.is_null() => {
                out.insert(format!("{prefix}{column}"), value.clone());
            }
            _ => {}
        }
    }
    out
}

/// Join auxiliary rows onto sections by exact geometry key.
///
/// The source systems reuse literally identical geometries across related
/// tables, so the canonical textual form is the join key and no snapping
/// is needed. Auxiliary rows sharing a key are de-duplicated first-wins
/// before the join, making the result independent of row order among
/// distinct keys.
pub fn match_by_geometry(
    sections: &[SectionRecord],
    aux: &[AuxRecord],
    columns: &[&str],
    prefix: &str,
) -> EnrichmentTable {
    let mut by_key: HashMap<String, &AuxRecord> = HashMap::new();
    for row in aux {
        if let Some(geometry) = &row.geometry {
            by_key.entry(geometry_key(geometry)).or_insert(row);
        }
    }

    let mut table = EnrichmentTable::new();
    for section in sections {
        let Some(geometry) = &section.geometry else {
            continue;
        };
        if let Some(row) = by_key.get(&geometry_key(geometry)) {
            let selected = select_prefixed(&row.attrs, columns, prefix);
            if !selected.is_empty() {
                table.insert(section.id, selected);
            }
        }
    }

    info!(matched = table.len(), prefix, "matched sections by geometry");
    table
}

/// True when two already-normalized [min, max] ranges share any point.
pub fn ranges_overlap(a: (f64, f64), b: (f64, f64)) -> bool {
    !(a.1 < b.0 || b.1 < a.0)
}

/// Join auxiliary rows onto sections by route id and overlapping km range.
///
/// Both ranges are normalized to [min, max] first, tolerating sections
/// digitized against the route direction. The first overlapping row wins
/// per section. Rows are grouped by route id up front so each section only
/// scans its own route.
pub fn match_by_route_km(
    sections: &[SectionRecord],
    aux: &[AuxRecord],
    columns: &[&str],
    prefix: &str,
) -> EnrichmentTable {
    let mut by_route: HashMap<i64, Vec<(&AuxRecord, (f64, f64))>> = HashMap::new();
    for row in aux {
        if let Some((route, begin, end)) = row.route_range() {
            by_route.entry(route).or_default().push((row, (begin, end)));
        }
    }

    let mut table = EnrichmentTable::new();
    for section in sections {
        let Some((route, begin, end)) = section.route_range() else {
            continue;
        };
        let Some(rows) = by_route.get(&route) else {
            continue;
        };
        for (row, range) in rows {
            if ranges_overlap((begin, end), *range) {
                let selected = select_prefixed(&row.attrs, columns, prefix);
                if !selected.is_empty() {
                    table.insert(section.id, selected);
                }
                break;
            }
        }
    }

    info!(matched = table.len(), prefix, "matched sections by route/km");
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use fw_core::attrs::AttrValue;
    use geo::LineString;

    fn section(id: i64, route: Option<(i64, f64, f64)>) -> SectionRecord {
        SectionRecord {
            id,
            start_junction: Some(1),
            end_junction: Some(2),
            route_id: route.map(|r| r.0),
            route_km_begin: route.map(|r| r.1),
            route_km_end: route.map(|r| r.2),
            geometry: None,
            attrs: AttrMap::new(),
        }
    }

    fn aux_route(route: i64, begin: f64, end: f64, value: &str) -> AuxRecord {
        let mut attrs = AttrMap::new();
        attrs.insert("speed".into(), AttrValue::from(value));
        AuxRecord {
            route_id: Some(route),
            route_km_begin: Some(begin),
            route_km_end: Some(end),
            ..Default::default()
        }
        .with_attrs(attrs)
    }

    impl AuxRecord {
        fn with_attrs(mut self, attrs: AttrMap) -> Self {
            self.attrs = attrs;
            self
        }
    }

    #[test]
    fn overlapping_ranges_match() {
        let sections = vec![section(1, Some((7, 0.0, 5.0)))];
        let aux = vec![aux_route(7, 3.0, 8.0, "fast")];
        let table = match_by_route_km(&sections, &aux, &["speed"], "speed_");
        assert_eq!(table[&1]["speed_speed"], AttrValue::from("fast"));
    }

    #[test]
    fn disjoint_ranges_do_not_match() {
        let sections = vec![section(1, Some((7, 0.0, 5.0)))];
        let aux = vec![aux_route(7, 6.0, 8.0, "fast")];
        let table = match_by_route_km(&sections, &aux, &["speed"], "speed_");
        assert!(table.is_empty());
    }

    #[test]
    fn overlap_never_crosses_route_ids() {
        let sections = vec![section(1, Some((7, 0.0, 5.0)))];
        let aux = vec![aux_route(8, 0.0, 5.0, "fast")];
        let table = match_by_route_km(&sections, &aux, &["speed"], "speed_");
        assert!(table.is_empty());
    }

    #[test]
    fn reversed_intervals_are_normalized() {
        let sections = vec![section(1, Some((7, 5.0, 0.0)))];
        let aux = vec![aux_route(7, 8.0, 3.0, "fast")];
        let table = match_by_route_km(&sections, &aux, &["speed"], "speed_");
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn first_route_match_wins() {
        let sections = vec![section(1, Some((7, 0.0, 5.0)))];
        let aux = vec![
            aux_route(7, 4.0, 6.0, "first"),
            aux_route(7, 0.0, 2.0, "second"),
        ];
        let table = match_by_route_km(&sections, &aux, &["speed"], "speed_");
        assert_eq!(table[&1]["speed_speed"], AttrValue::from("first"));
    }

    fn geom_section(id: i64, line: &LineString<f64>) -> SectionRecord {
        let mut s = section(id, None);
        s.geometry = Some(line.clone());
        s
    }

    fn geom_aux(line: &LineString<f64>, value: &str) -> AuxRecord {
        let mut attrs = AttrMap::new();
        attrs.insert("depth".into(), AttrValue::from(value));
        AuxRecord {
            geometry: Some(line.clone()),
            attrs,
            ..Default::default()
        }
    }

    #[test]
    fn geometry_join_first_duplicate_wins_and_order_independent() {
        let line = LineString::from(vec![(4.0, 52.0), (4.1, 52.1)]);
        let other = LineString::from(vec![(5.0, 52.0), (5.1, 52.1)]);
        let sections = vec![geom_section(1, &line), geom_section(2, &other)];

        let aux = vec![
            geom_aux(&line, "one"),
            geom_aux(&line, "two"),
            geom_aux(&other, "three"),
        ];
        let table = match_by_geometry(&sections, &aux, &["depth"], "aux_");
        assert_eq!(table[&1]["aux_depth"], AttrValue::from("one"));
        assert_eq!(table[&2]["aux_depth"], AttrValue::from("three"));

        // Reordering rows with distinct keys changes nothing.
        let reordered = vec![
            geom_aux(&other, "three"),
            geom_aux(&line, "one"),
            geom_aux(&line, "two"),
        ];
        assert_eq!(table, match_by_geometry(&sections, &reordered, &["depth"], "aux_"));
    }

    #[test]
    fn null_values_are_not_copied() {
        let line = LineString::from(vec![(4.0, 52.0), (4.1, 52.1)]);
        let mut attrs = AttrMap::new();
        attrs.insert("depth".into(), AttrValue::Null);
        let aux = vec![AuxRecord {
            geometry: Some(line.clone()),
            attrs,
            ..Default::default()
        }];

        let table = match_by_geometry(&[geom_section(1, &line)], &aux, &["depth"], "aux_");
        assert!(table.is_empty());
    }
}
