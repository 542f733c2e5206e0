//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One discrete step per display frame
//! - Seeded RNG and "now" passed in explicitly
//! - Side effects returned as frame events
//! - No rendering or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod state;
pub mod step;

pub use collision::Rect;
pub use difficulty::Difficulty;
pub use state::{GameEvent, GamePhase, Item, ItemKind, Meteor, Player, Star, World};
pub use step::{FrameInput, step};
