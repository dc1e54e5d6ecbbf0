//! Scoring predicate

use crate::core::types::Point;

/// An actor scores when it lands strictly closer than this to the target
pub const SCORE_RADIUS: f64 = 50.0;

/// Whether an actor at `actor` scores against a target at `target`
pub fn evaluate_proximity(actor: Point, target: Point) -> bool {
    actor.distance(&target) < SCORE_RADIUS
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_same_point_scores() {
        assert!(evaluate_proximity(Point::ORIGIN, Point::ORIGIN));
    }

    #[test]
    fn test_exact_radius_does_not_score() {
        assert!(!evaluate_proximity(Point::new(30, 40), Point::ORIGIN));
        assert!(!evaluate_proximity(Point::new(0, 50), Point::ORIGIN));
        assert!(evaluate_proximity(Point::new(0, 49), Point::ORIGIN));
    }

    #[test]
    fn test_default_target_far_from_origin() {
        assert!(!evaluate_proximity(Point::ORIGIN, Point::new(150, 100)));
        assert!(evaluate_proximity(Point::new(120, 80), Point::new(150, 100)));
    }

    proptest! {
        #[test]
        fn prop_matches_squared_distance(
            ax in -1000i32..1000, ay in -1000i32..1000,
            tx in -1000i32..1000, ty in -1000i32..1000,
        ) {
            let dx = i64::from(ax - tx);
            let dy = i64::from(ay - ty);
            let expected = dx * dx + dy * dy < 2500;
            prop_assert_eq!(
                evaluate_proximity(Point::new(ax, ay), Point::new(tx, ty)),
                expected
            );
        }
    }
}
