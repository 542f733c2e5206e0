//! Data-driven game balance
//!
//! Spawn rates and entity speeds live in one struct instead of being
//! scattered through the step function, so tests can pin spawn behavior
//! and rebalancing doesn't touch simulation logic.

/// Balance knobs read by the simulation step each frame.
///
/// Spawn chances are independent per-frame Bernoulli trials. That couples
/// spawn statistics to frame rate, which matches the game's original
/// feel - do not convert these to per-second rates.
#[derive(Debug, Clone)]
pub struct Tuning {
    /// Per-frame meteor spawn probability
    pub meteor_spawn_chance: f32,
    /// Per-frame item spawn probability (roughly one per 30 s at 60 fps)
    pub item_spawn_chance: f32,
    /// Meteor fall speed drawn uniformly from [min, max)
    pub meteor_speed_min: f32,
    pub meteor_speed_max: f32,
    /// Item fall speed, never scaled by difficulty or slow motion
    pub item_fall_speed: f32,
    /// Probability a spawned item is Invincible; the rest are SlowTime
    pub invincible_weight: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            meteor_spawn_chance: 0.02,
            item_spawn_chance: 0.0006,
            meteor_speed_min: 3.0,
            meteor_speed_max: 8.0,
            item_fall_speed: 1.5,
            invincible_weight: 0.25,
        }
    }
}
