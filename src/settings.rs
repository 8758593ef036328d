//! Game settings and preferences
//!
//! JSON-serialized. Persisted in LocalStorage on web, read from a file path
//! on native. Missing fields fall back to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::sim::LevelDefinition;
use crate::tuning::Tuning;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 60,
            QualityPreset::Medium => 240,
            QualityPreset::High => 1000,
        }
    }
}

/// What happens to brick damage when a level is rebuilt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LayoutPolicy {
    /// Reconstruct from the level definition, restoring every brick
    #[default]
    Rebuild,
    /// Keep destroyed and damaged bricks
    Preserve,
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Particle effects on brick destruction
    pub particles: bool,
    /// Show FPS counter
    pub show_fps: bool,
    /// Idle/demo mode: the paddle follows the ball on its own
    pub autopilot: bool,

    pub starting_lives: u32,
    /// Layout handling when the stage is resized
    pub resize_policy: LayoutPolicy,
    /// Layout handling when a life is lost
    pub life_loss_policy: LayoutPolicy,

    pub tuning: Tuning,
    /// Custom level sequence replacing the built-in one
    pub levels: Option<Vec<LevelDefinition>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            show_fps: false,
            autopilot: false,
            starting_lives: 3,
            resize_policy: LayoutPolicy::Rebuild,
            life_loss_policy: LayoutPolicy::Rebuild,
            tuning: Tuning::default(),
            levels: None,
        }
    }
}

impl Settings {
    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read settings from a JSON file
    pub fn load_from_path(path: &Path) -> Result<Self, EngineError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "brickfall_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{"starting_lives": 5, "tuning": {"max_ball_speed": 900.0}}"#).unwrap();
        assert_eq!(settings.starting_lives, 5);
        assert_eq!(settings.tuning.max_ball_speed, Some(900.0));
        assert_eq!(settings.tuning.paddle_speedup, 1.02);
        assert_eq!(settings.tuning.explosion_count, 15);
        assert_eq!(settings.resize_policy, LayoutPolicy::Rebuild);
        assert!(settings.levels.is_none());
    }

    #[test]
    fn test_custom_levels_from_json() {
        let json = r#"{
            "resize_policy": "Preserve",
            "levels": [{"name": "Tiny", "layout": ["121", ".3."]}]
        }"#;
        let settings = Settings::from_json(json).unwrap();
        assert_eq!(settings.resize_policy, LayoutPolicy::Preserve);
        let levels = settings.levels.unwrap();
        assert_eq!(levels[0].brick_count(), 4);
        assert_eq!(levels[0].ball_speed_scale, 1.0);
    }

    #[test]
    fn test_bad_json_is_error() {
        assert!(matches!(Settings::from_json("{"), Err(EngineError::Settings(_))));
    }

    #[test]
    fn test_particles_off_means_zero_cap() {
        let mut settings = Settings {
            quality: QualityPreset::High,
            ..Settings::default()
        };
        assert_eq!(settings.max_particles(), 1000);
        settings.particles = false;
        assert_eq!(settings.max_particles(), 0);
    }
}
