//! The scoring target and its respawn rule

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::Point;

/// Horizontal respawn range, lower bound inclusive
pub const RESPAWN_X: std::ops::Range<i32> = -150..150;

/// Vertical respawn range, lower bound inclusive
pub const RESPAWN_Y: std::ops::Range<i32> = -100..100;

/// The single goal position actors try to reach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub position: Point,
}

impl Target {
    pub fn new(position: Point) -> Self {
        Self { position }
    }

    /// Jump to a fresh uniformly random spot inside the respawn box
    ///
    /// Each axis is drawn independently. Returns the new position.
    pub fn respawn(&mut self, rng: &mut impl Rng) -> Point {
        self.position = Point::new(rng.gen_range(RESPAWN_X), rng.gen_range(RESPAWN_Y));
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_respawn_is_deterministic_for_seed() {
        let mut a = Target::new(Point::ORIGIN);
        let mut b = Target::new(Point::ORIGIN);
        let mut rng_a = ChaCha8Rng::seed_from_u64(99);
        let mut rng_b = ChaCha8Rng::seed_from_u64(99);

        for _ in 0..10 {
            assert_eq!(a.respawn(&mut rng_a), b.respawn(&mut rng_b));
        }
    }

    proptest! {
        #[test]
        fn prop_respawn_stays_in_box(seed in any::<u64>()) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut target = Target::new(Point::ORIGIN);
            for _ in 0..20 {
                let p = target.respawn(&mut rng);
                prop_assert!((-150..=150).contains(&p.x));
                prop_assert!((-100..=100).contains(&p.y));
            }
        }
    }
}
