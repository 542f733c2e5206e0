//! Meteor Dodge - a falling-meteor arcade game for the browser
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, spawning, collisions, scoring)
//! - `renderer`: Canvas 2D rendering (wasm only)
//! - `audio`: Web Audio sound synthesis (wasm only)
//! - `highscores`: Per-difficulty persisted high scores
//! - `settings`: Player preferences and cosmetics
//! - `tuning`: Data-driven game balance

pub mod highscores;
pub mod settings;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod renderer;

pub use settings::{Settings, Skin};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Board dimensions in CSS pixels (fixed canvas size)
    pub const BOARD_WIDTH: f32 = 480.0;
    pub const BOARD_HEIGHT: f32 = 640.0;

    /// Player ship size (square sprite)
    pub const PLAYER_SIZE: f32 = 50.0;
    /// Base horizontal speed in pixels per frame, before the user multiplier
    pub const PLAYER_BASE_SPEED: f32 = 5.0;
    /// Vertical offset of the ship above the bottom edge
    pub const PLAYER_BOTTOM_MARGIN: f32 = 80.0;
    /// Player hitbox inset on all four sides. The drawn sprite is bigger
    /// than the lethal box so near misses feel fair.
    pub const PLAYER_HITBOX_INSET: f32 = 10.0;

    /// Meteor size (square sprite, uninset hitbox)
    pub const METEOR_SIZE: f32 = 30.0;

    /// Item size (square sprite, uninset hitbox - pickups are generous)
    pub const ITEM_SIZE: f32 = 30.0;

    /// Number of background stars (recycled, never destroyed)
    pub const STAR_COUNT: usize = 100;

    /// Duration of a timed power-up effect in milliseconds
    pub const EFFECT_DURATION_MS: f64 = 5000.0;

    /// Score bonus per meteor destroyed while invincible
    pub const DESTROY_BONUS: u64 = 100;
}
