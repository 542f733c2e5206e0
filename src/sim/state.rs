//! Game state and core simulation types
//!
//! The whole world is one owned struct passed into the step function and
//! read by the renderer. No globals, so the simulation runs in tests
//! without a DOM.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::Rect;
use super::difficulty::Difficulty;
use crate::consts::*;
use crate::tuning::Tuning;

/// Session state machine. Steps 3-10 of the frame only run while Running;
/// the star field animates in every phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    #[default]
    NotStarted,
    Running,
    GameOver,
}

/// Discrete events emitted by a simulation step, consumed fire-and-forget
/// by the audio collaborator and the persistence driver. Each fires at
/// most once per occurrence and carries no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    MeteorSpawned,
    PlayerHit,
    GameOverReached,
    ItemCollected,
}

/// Timed power-up kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// Meteor collisions destroy the meteor and bank a bonus instead of
    /// ending the game
    Invincible,
    /// Meteors fall at half speed
    SlowTime,
}

/// The player's ship. Never destroyed during a session; y is fixed.
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
}

impl Player {
    fn at_start() -> Self {
        Self {
            pos: Vec2::new(
                BOARD_WIDTH / 2.0 - PLAYER_SIZE / 2.0,
                BOARD_HEIGHT - PLAYER_BOTTOM_MARGIN,
            ),
        }
    }

    /// The drawn box
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::splat(PLAYER_SIZE))
    }

    /// The lethal box, inset for forgiveness. Item pickups use the
    /// uninset `rect()` instead - that asymmetry is deliberate.
    pub fn hitbox(&self) -> Rect {
        self.rect().inset(PLAYER_HITBOX_INSET)
    }
}

/// A falling hazard
#[derive(Debug, Clone)]
pub struct Meteor {
    pub pos: Vec2,
    /// Per-instance base fall speed, multiplied by the difficulty scale
    pub speed: f32,
}

impl Meteor {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::splat(METEOR_SIZE))
    }
}

/// A falling pickup
#[derive(Debug, Clone)]
pub struct Item {
    pub pos: Vec2,
    pub kind: ItemKind,
}

impl Item {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::splat(ITEM_SIZE))
    }
}

/// Background decoration. Recycled by wrapping to the top, never removed.
#[derive(Debug, Clone)]
pub struct Star {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
}

/// Complete game state for one session.
#[derive(Debug, Clone)]
pub struct World {
    pub phase: GamePhase,
    pub player: Player,
    pub meteors: Vec<Meteor>,
    pub items: Vec<Item>,
    pub stars: Vec<Star>,

    /// Base score: +1 per Running frame. The destroy bonus is kept apart
    /// so the game-over screen can show the breakdown.
    pub score: u64,
    /// Meteors destroyed while invincible
    pub destroyed: u32,

    /// Absolute expiry timestamps in ms; 0 means never active. Always
    /// compared against "now", never counted down.
    pub invincible_until: f64,
    pub slow_until: f64,

    pub difficulty: Difficulty,
    /// Current meteor speed multiplier. Static per difficulty except in
    /// Progressive, where the step recomputes it every frame.
    pub meteor_speed_scale: f32,
    /// User-configured movement multiplier, independent of difficulty
    pub player_speed_scale: f32,

    /// Cached stored high score for the active difficulty
    pub high_score: u64,

    pub tuning: Tuning,
}

impl World {
    /// Create a fresh world in `NotStarted`. The RNG only seeds the star
    /// field; gameplay entities spawn during steps.
    pub fn new(
        difficulty: Difficulty,
        player_speed_scale: f32,
        high_score: u64,
        rng: &mut Pcg32,
    ) -> Self {
        let stars = (0..STAR_COUNT)
            .map(|_| Star {
                pos: Vec2::new(
                    rng.random::<f32>() * BOARD_WIDTH,
                    rng.random::<f32>() * BOARD_HEIGHT,
                ),
                size: rng.random::<f32>() * 2.0,
                speed: rng.random::<f32>() * 0.5 + 0.1,
            })
            .collect();

        Self {
            phase: GamePhase::NotStarted,
            player: Player::at_start(),
            meteors: Vec::new(),
            items: Vec::new(),
            stars,
            score: 0,
            destroyed: 0,
            invincible_until: 0.0,
            slow_until: 0.0,
            difficulty,
            meteor_speed_scale: difficulty.base_speed_scale(),
            player_speed_scale,
            high_score,
            tuning: Tuning::default(),
        }
    }

    /// Start or restart a run. Clears entities and counters, recenters the
    /// player, re-seeds the speed scale. The star field and the cached
    /// high score carry over.
    pub fn reset(&mut self) {
        self.phase = GamePhase::Running;
        self.score = 0;
        self.destroyed = 0;
        self.meteors.clear();
        self.items.clear();
        self.invincible_until = 0.0;
        self.slow_until = 0.0;
        self.player = Player::at_start();
        self.meteor_speed_scale = self.difficulty.base_speed_scale();
    }

    /// Switch difficulty: adopt the stored high score for the new mode and
    /// restart the run.
    pub fn set_difficulty(&mut self, difficulty: Difficulty, stored_high: u64) {
        self.difficulty = difficulty;
        self.high_score = stored_high;
        self.reset();
    }

    /// Base score plus banked destroy bonus. This is what gets displayed
    /// and compared against the high score; the base counter itself never
    /// absorbs the bonus.
    pub fn final_score(&self) -> u64 {
        self.score + self.destroyed as u64 * DESTROY_BONUS
    }

    pub fn is_invincible(&self, now_ms: f64) -> bool {
        now_ms < self.invincible_until
    }

    pub fn is_slow(&self, now_ms: f64) -> bool {
        now_ms < self.slow_until
    }
}
