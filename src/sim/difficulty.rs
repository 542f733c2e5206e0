//! Difficulty policy table
//!
//! Each mode is a meteor-speed multiplier. The three static modes never
//! change; Progressive ramps with score and is recomputed every frame.

use serde::{Deserialize, Serialize};

/// Progressive ramp: starting scale, step per threshold, threshold, ceiling.
const PROGRESSIVE_BASE: f32 = 0.7;
const PROGRESSIVE_STEP: f32 = 0.05;
const PROGRESSIVE_INTERVAL: u64 = 500;
const PROGRESSIVE_CAP: f32 = 3.0;

/// Selected difficulty mode. Also the key under which the high score for
/// that mode is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Normal,
    Hard,
    Progressive,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Progressive,
    ];

    /// Stable storage/DOM key for this mode
    pub fn key(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
            Difficulty::Progressive => "progressive",
        }
    }

    pub fn from_key(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            "progressive" | "prog" => Some(Difficulty::Progressive),
            _ => None,
        }
    }

    /// HUD label
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Normal => "NORMAL",
            Difficulty::Hard => "HARD",
            Difficulty::Progressive => "PROG",
        }
    }

    /// Meteor speed scale at the start of a run
    pub fn base_speed_scale(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.6,
            Difficulty::Normal => 0.8,
            Difficulty::Hard => 1.0,
            Difficulty::Progressive => PROGRESSIVE_BASE,
        }
    }

    /// Meteor speed scale at the given base score. Static modes ignore the
    /// score; Progressive steps up every 500 points, capped at 3.0.
    pub fn meteor_speed_scale(&self, score: u64) -> f32 {
        match self {
            Difficulty::Progressive => {
                let ramp = (score / PROGRESSIVE_INTERVAL) as f32 * PROGRESSIVE_STEP;
                (PROGRESSIVE_BASE + ramp).min(PROGRESSIVE_CAP)
            }
            _ => self.base_speed_scale(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_static_scales() {
        assert_eq!(Difficulty::Easy.meteor_speed_scale(0), 0.6);
        assert_eq!(Difficulty::Normal.meteor_speed_scale(10_000), 0.8);
        assert_eq!(Difficulty::Hard.meteor_speed_scale(999), 1.0);
    }

    #[test]
    fn test_progressive_ramp_steps() {
        let d = Difficulty::Progressive;
        assert_eq!(d.meteor_speed_scale(0), 0.7);
        assert_eq!(d.meteor_speed_scale(499), 0.7);
        assert_eq!(d.meteor_speed_scale(500), 0.75);
        assert_eq!(d.meteor_speed_scale(999), 0.75);
        assert_eq!(d.meteor_speed_scale(1000), 0.8);
    }

    #[test]
    fn test_progressive_cap() {
        // The unclamped ramp passes 3.0 around score 23000
        let d = Difficulty::Progressive;
        assert_eq!(d.meteor_speed_scale(23_500), 3.0);
        assert_eq!(d.meteor_speed_scale(1_000_000), 3.0);
    }

    #[test]
    fn test_key_round_trip() {
        for d in Difficulty::ALL {
            assert_eq!(Difficulty::from_key(d.key()), Some(d));
        }
        assert_eq!(Difficulty::from_key("nope"), None);
    }

    proptest! {
        #[test]
        fn prop_progressive_is_monotone_and_bounded(a in 0u64..2_000_000, b in 0u64..2_000_000) {
            let d = Difficulty::Progressive;
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(d.meteor_speed_scale(lo) <= d.meteor_speed_scale(hi));
            prop_assert!(d.meteor_speed_scale(hi) <= 3.0);
            prop_assert!(d.meteor_speed_scale(lo) >= 0.7);
        }

        #[test]
        fn prop_progressive_matches_formula_before_cap(score in 0u64..22_000) {
            let expected = 0.7 + (score / 500) as f32 * 0.05;
            prop_assert!((Difficulty::Progressive.meteor_speed_scale(score) - expected).abs() < 1e-6);
        }
    }
}
