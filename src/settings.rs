//! User settings and preferences
//!
//! Persisted in LocalStorage on the web; native builds always start from
//! defaults. Gameplay state is never persisted.

use serde::{Deserialize, Serialize};

use crate::consts::{
    FLOAT_CEILING_Y, GROUND_SURFACE_OFFSET, PLAYER_HEIGHT, VIEWPORT_HEIGHT, VIEWPORT_WIDTH,
};
use crate::sim::Viewport;

/// Session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Theme music volume (0.0 - 1.0)
    pub music_volume: f32,

    // === Display ===
    /// Canvas size in pixels
    pub viewport_width: f32,
    pub viewport_height: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.4,
            sfx_volume: 1.0,
            music_volume: 0.45,
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "ritual_runner_settings";

    /// Smallest canvas the scene layout still fits in: a standing player
    /// must never reach above the float ceiling
    const MIN_VIEWPORT: (f32, f32) = (
        320.0,
        GROUND_SURFACE_OFFSET + FLOAT_CEILING_Y + PLAYER_HEIGHT,
    );

    pub fn viewport(&self) -> Viewport {
        Viewport::new(
            self.viewport_width.max(Self::MIN_VIEWPORT.0),
            self.viewport_height.max(Self::MIN_VIEWPORT.1),
        )
    }

    /// Volumes forced into range, NaN treated as silence
    pub fn sanitized(mut self) -> Self {
        for vol in [
            &mut self.master_volume,
            &mut self.sfx_volume,
            &mut self.music_volume,
        ] {
            *vol = if vol.is_nan() { 0.0 } else { vol.clamp(0.0, 1.0) };
        }
        self
    }

    /// Parse settings, falling back to defaults on bad input
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Settings>(json) {
            Ok(settings) => settings.sanitized(),
            Err(e) => {
                log::warn!("Ignoring unreadable settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
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
            match self.to_json() {
                Ok(json) => {
                    let _ = storage.set_item(Self::STORAGE_KEY, &json);
                    log::info!("Settings saved");
                }
                Err(e) => log::warn!("Failed to encode settings: {}", e),
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_viewport_consts() {
        let viewport = Settings::default().viewport();
        assert_eq!(viewport, Viewport::default());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{"music_volume": 0.1}"#);
        assert_eq!(settings.music_volume, 0.1);
        assert_eq!(settings.viewport_width, VIEWPORT_WIDTH);
    }

    #[test]
    fn test_bad_json_falls_back() {
        assert_eq!(Settings::from_json("not json"), Settings::default());
        assert_eq!(Settings::from_json(r#"{"sfx_volume": "loud"}"#), Settings::default());
    }

    #[test]
    fn test_volumes_are_clamped() {
        let settings = Settings::from_json(r#"{"master_volume": 3.0, "sfx_volume": -1.0}"#);
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.sfx_volume, 0.0);
    }

    #[test]
    fn test_tiny_viewport_is_floored() {
        let settings = Settings {
            viewport_width: 10.0,
            viewport_height: 10.0,
            ..Default::default()
        };
        assert_eq!(
            settings.viewport(),
            Viewport::new(320.0, GROUND_SURFACE_OFFSET + FLOAT_CEILING_Y + PLAYER_HEIGHT)
        );
    }

    #[test]
    fn test_floored_viewport_keeps_player_below_float_ceiling() {
        for height in [0.0, 200.0, 240.0, 283.0] {
            let settings = Settings {
                viewport_height: height,
                ..Default::default()
            };
            let viewport = settings.viewport();
            assert!(viewport.ground_y() - PLAYER_HEIGHT >= FLOAT_CEILING_Y);
        }
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            music_volume: 0.2,
            ..Default::default()
        };
        let json = settings.to_json().expect("encode");
        assert_eq!(Settings::from_json(&json), settings);
    }
}
