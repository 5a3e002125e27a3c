//! Property tests for the route/km interval-overlap predicate.

use fw_enrich::ranges_overlap;
use proptest::prelude::*;

fn normalized(a: f64, b: f64) -> (f64, f64) {
    (a.min(b), a.max(b))
}

proptest! {
    #[test]
    fn overlap_is_symmetric(a in -100.0..100.0f64, b in -100.0..100.0f64,
                            c in -100.0..100.0f64, d in -100.0..100.0f64) {
        let x = normalized(a, b);
        let y = normalized(c, d);
        prop_assert_eq!(ranges_overlap(x, y), ranges_overlap(y, x));
    }

    #[test]
    fn direction_does_not_matter(a in -100.0..100.0f64, b in -100.0..100.0f64,
                                 c in -100.0..100.0f64, d in -100.0..100.0f64) {
        // Normalizing either operand's digitization direction first gives
        // the same verdict.
        let forward = (normalized(a, b), normalized(c, d));
        let reversed = (normalized(b, a), normalized(d, c));
        prop_assert_eq!(
            ranges_overlap(forward.0, forward.1),
            ranges_overlap(reversed.0, reversed.1)
        );
    }

    #[test]
    fn range_overlaps_itself(a in -100.0..100.0f64, b in -100.0..100.0f64) {
        let x = normalized(a, b);
        prop_assert!(ranges_overlap(x, x));
    }

    #[test]
    fn touching_endpoints_overlap(a in -100.0..100.0f64, len in 0.0..50.0f64) {
        // Shared boundary point counts as overlap.
        prop_assert!(ranges_overlap((a, a + len), (a + len, a + len + 1.0)));
    }
}
