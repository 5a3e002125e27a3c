//! Geometry helpers shared across the pipeline.
//!
//! Coordinates are WGS84 longitude/latitude degrees throughout; the
//! [`MetricProjector`] maps them into a transverse-Mercator (UTM zone)
//! plane when an algorithm needs Euclidean distances in meters.

use geo::line_measures::Length;
use geo::{Geodesic, LineString, Point};

/// Canonical textual key for a polyline geometry.
///
/// The source systems reuse literally identical geometries across related
/// tables, so an exact textual form is a valid join key; no snapping or
/// tolerance is applied.
pub fn geometry_key(line: &LineString<f64>) -> String {
    let mut key = String::from("LINESTRING(");
    for (i, coord) in line.coords().enumerate() {
        if i > 0 {
            key.push(',');
        }
        key.push_str(&format!("{} {}", coord.x, coord.y));
    }
    key.push(')');
    key
}

/// Geodesic (ellipsoidal) length of a polyline in meters.
///
/// Returns `None` for degenerate input (fewer than two vertices or a
/// non-finite coordinate); the caller decides whether to warn.
pub fn geodesic_length_m(line: &LineString<f64>) -> Option<f64> {
    if line.0.len() < 2 {
        return None;
    }
    if line.coords().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
        return None;
    }
    Some(Geodesic.length(line))
}

const WGS84_A: f64 = 6_378_137.0;
const WGS84_F: f64 = 1.0 / 298.257_223_563;
const SCALE_K0: f64 = 0.9996;
const FALSE_EASTING: f64 = 500_000.0;
const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// WGS84 → transverse Mercator forward projection for one UTM zone.
///
/// Border stitching needs true-distance math over node coordinates; a
/// single zone covering the study area keeps the scale error far below the
/// match threshold, so no zone switching per point is done.
#[derive(Debug, Clone, Copy)]
pub struct MetricProjector {
    /// Central meridian, radians.
    lambda0: f64,
}

impl MetricProjector {
    /// Projector for a numbered UTM zone (1..=60).
    pub fn utm_zone(zone: u8) -> Self {
        let zone = zone.clamp(1, 60) as f64;
        Self {
            lambda0: (zone * 6.0 - 183.0).to_radians(),
        }
    }

    /// Projector for the zone containing the given longitude.
    pub fn covering(lon_deg: f64) -> Self {
        let zone = (((lon_deg + 180.0) / 6.0).floor() as i32 + 1).clamp(1, 60);
        Self::utm_zone(zone as u8)
    }

    /// Project a lon/lat point to easting/northing in meters.
    pub fn project(&self, p: Point<f64>) -> Point<f64> {
        let phi = p.y().to_radians();
        let lambda = p.x().to_radians();

        let e2 = WGS84_F * (2.0 - WGS84_F);
        let ep2 = e2 / (1.0 - e2);

        let sin_phi = phi.sin();
        let cos_phi = phi.cos();

        let n = WGS84_A / (1.0 - e2 * sin_phi * sin_phi).sqrt();
        let t = (phi.tan()) * (phi.tan());
        let c = ep2 * cos_phi * cos_phi;
        let a = (lambda - self.lambda0) * cos_phi;
        let m = meridian_arc(phi);

        let a2 = a * a;
        let a3 = a2 * a;
        let a4 = a3 * a;
        let a5 = a4 * a;
        let a6 = a5 * a;

        let easting = SCALE_K0
            * n
            * (a + (1.0 - t + c) * a3 / 6.0
                + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a5 / 120.0)
            + FALSE_EASTING;

        let mut northing = SCALE_K0
            * (m + n
                * phi.tan()
                * (a2 / 2.0
                    + (5.0 - t + 9.0 * c + 4.0 * c * c) * a4 / 24.0
                    + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a6 / 720.0));
        if northing < 0.0 {
            northing += FALSE_NORTHING_SOUTH;
        }

        Point::new(easting, northing)
    }
}

/// Meridian arc length from the equator to latitude `phi` (radians).
fn meridian_arc(phi: f64) -> f64 {
    let e2 = WGS84_F * (2.0 - WGS84_F);
    let e4 = e2 * e2;
    let e6 = e4 * e2;

    WGS84_A
        * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
            - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
            + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
            - (35.0 * e6 / 3072.0) * (6.0 * phi).sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::line_measures::Distance;
    use geo::{Euclidean, Geodesic};

    #[test]
    fn geometry_key_is_exact_and_order_sensitive() {
        let a = LineString::from(vec![(4.0, 52.0), (4.1, 52.1)]);
        let b = LineString::from(vec![(4.0, 52.0), (4.1, 52.1)]);
        let c = LineString::from(vec![(4.1, 52.1), (4.0, 52.0)]);

        assert_eq!(geometry_key(&a), geometry_key(&b));
        assert_ne!(geometry_key(&a), geometry_key(&c));
        assert_eq!(geometry_key(&a), "LINESTRING(4 52,4.1 52.1)");
    }

    #[test]
    fn degenerate_lines_have_no_length() {
        assert!(geodesic_length_m(&LineString::new(vec![])).is_none());
        assert!(geodesic_length_m(&LineString::from(vec![(4.0, 52.0)])).is_none());

        let bad = LineString::from(vec![(4.0, 52.0), (f64::NAN, 52.1)]);
        assert!(geodesic_length_m(&bad).is_none());
    }

    #[test]
    fn meridian_segment_length() {
        // 0.01 degree of latitude near 52N is about 1113 m along the meridian.
        let line = LineString::from(vec![(4.0, 52.0), (4.0, 52.01)]);
        let len = geodesic_length_m(&line).unwrap();
        assert!(len > 1105.0 && len < 1120.0, "length was {len}");
    }

    #[test]
    fn projected_distance_tracks_geodesic_distance() {
        let proj = MetricProjector::covering(6.1);
        let a = Point::new(6.1, 51.9);
        let b = Point::new(6.1001, 51.9001);

        let planar = Euclidean.distance(proj.project(a), proj.project(b));
        let geodesic = Geodesic.distance(a, b);

        let rel_err = (planar - geodesic).abs() / geodesic;
        assert!(rel_err < 0.002, "relative error {rel_err}");
        // Sanity: the pair is ~13 m apart.
        assert!(geodesic > 10.0 && geodesic < 20.0);
    }

    #[test]
    fn utm_zone_selection() {
        // 6.1E lies in zone 32 (6..12 E).
        let p = MetricProjector::covering(6.1);
        let q = MetricProjector::utm_zone(32);
        assert_eq!(p.lambda0, q.lambda0);
    }
}
