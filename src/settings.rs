//! Player preferences and cosmetics
//!
//! The difficulty/speed blob is one JSON document in LocalStorage. The
//! cosmetic skin selection and its unlock flag live under their own keys
//! so they survive independently of the blob (and of each other).

use serde::{Deserialize, Serialize};

use crate::sim::Difficulty;

/// Final score that unlocks the gold ship skin
pub const GOLD_SKIN_UNLOCK_SCORE: u64 = 5000;

/// Cosmetic ship skins. Purely visual - the simulation never reads these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Skin {
    #[default]
    Classic,
    Gold,
}

impl Skin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Skin::Classic => "classic",
            Skin::Gold => "gold",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(Skin::Classic),
            "gold" => Some(Skin::Gold),
            _ => None,
        }
    }

    /// Canvas fill color for the ship body
    pub fn fill_color(&self) -> &'static str {
        match self {
            Skin::Classic => "#7fd4ff",
            Skin::Gold => "gold",
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Selected difficulty mode
    pub difficulty: Difficulty,
    /// Player movement multiplier (slider, applied every frame)
    pub player_speed_scale: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Easy,
            player_speed_scale: 0.7,
        }
    }
}

impl Settings {
    /// LocalStorage keys
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "meteor_dodge_settings";
    #[allow(dead_code)]
    const SKIN_KEY: &'static str = "meteor_dodge_skin";
    #[allow(dead_code)]
    const SKIN_UNLOCKED_KEY: &'static str = "meteor_dodge_skin_unlocked";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Load the selected skin, falling back to Classic (and to Classic if
    /// the stored skin is no longer unlocked).
    #[cfg(target_arch = "wasm32")]
    pub fn load_skin() -> Skin {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        let skin = storage
            .as_ref()
            .and_then(|s| s.get_item(Self::SKIN_KEY).ok().flatten())
            .and_then(|raw| Skin::from_str(&raw))
            .unwrap_or_default();

        if skin == Skin::Gold && !Self::skin_unlocked() {
            return Skin::Classic;
        }
        skin
    }

    #[cfg(target_arch = "wasm32")]
    pub fn save_skin(skin: Skin) {
        if let Some(storage) = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
        {
            let _ = storage.set_item(Self::SKIN_KEY, skin.as_str());
        }
    }

    /// Whether the gold skin has been unlocked on this browser.
    #[cfg(target_arch = "wasm32")]
    pub fn skin_unlocked() -> bool {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .and_then(|s| s.get_item(Self::SKIN_UNLOCKED_KEY).ok().flatten())
            .map(|raw| raw == "1" || raw == "true")
            .unwrap_or(false)
    }

    #[cfg(target_arch = "wasm32")]
    pub fn set_skin_unlocked(unlocked: bool) {
        if let Some(storage) = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
        {
            let _ = storage.set_item(Self::SKIN_UNLOCKED_KEY, if unlocked { "1" } else { "0" });
            if unlocked {
                log::info!("Gold skin unlocked");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_skin() -> Skin {
        Skin::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_skin(_skin: Skin) {}

    #[cfg(not(target_arch = "wasm32"))]
    pub fn skin_unlocked() -> bool {
        false
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn set_skin_unlocked(_unlocked: bool) {}
}
