//! Per-difficulty high score persistence
//!
//! One integer per difficulty key in LocalStorage. Scores are monotonic:
//! the driver only writes when the simulation reports a new best.
//! Anything unreadable in storage counts as zero.

use crate::sim::Difficulty;

#[allow(dead_code)]
const KEY_PREFIX: &str = "meteor_dodge_highscore_";

#[allow(dead_code)]
fn storage_key(difficulty: Difficulty) -> String {
    format!("{}{}", KEY_PREFIX, difficulty.key())
}

/// Parse a stored high score. Malformed values are treated as missing.
#[allow(dead_code)]
fn parse_stored(raw: &str) -> u64 {
    raw.trim().parse().unwrap_or(0)
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok()).flatten()
}

/// Load the stored high score for a difficulty (0 if absent or corrupt).
#[cfg(target_arch = "wasm32")]
pub fn load(difficulty: Difficulty) -> u64 {
    let Some(storage) = local_storage() else {
        return 0;
    };
    match storage.get_item(&storage_key(difficulty)) {
        Ok(Some(raw)) => parse_stored(&raw),
        _ => 0,
    }
}

/// Persist a high score for a difficulty.
#[cfg(target_arch = "wasm32")]
pub fn store(difficulty: Difficulty, score: u64) {
    let Some(storage) = local_storage() else {
        return;
    };
    if storage
        .set_item(&storage_key(difficulty), &score.to_string())
        .is_ok()
    {
        log::info!("High score saved for {}: {}", difficulty.key(), score);
    }
}

/// Native stubs
#[cfg(not(target_arch = "wasm32"))]
pub fn load(_difficulty: Difficulty) -> u64 {
    0
}

#[cfg(not(target_arch = "wasm32"))]
pub fn store(_difficulty: Difficulty, _score: u64) {
    // No-op for native
}
