//! Round configuration and level presets
//!
//! The host may override defaults with a JSON blob; nothing is persisted.

use serde::{Deserialize, Serialize};

use crate::GameError;
use crate::consts::BASE_ARENA_WIDTH;

/// Difficulty levels (more decoys, smaller sprites)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Level {
    #[default]
    One,
    Two,
    Three,
    Four,
    Five,
}

impl Level {
    pub const ALL: [Level; 5] = [Level::One, Level::Two, Level::Three, Level::Four, Level::Five];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::One => "1",
            Level::Two => "2",
            Level::Three => "3",
            Level::Four => "4",
            Level::Five => "5",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "1" | "one" => Some(Level::One),
            "2" | "two" => Some(Level::Two),
            "3" | "three" => Some(Level::Three),
            "4" | "four" => Some(Level::Four),
            "5" | "five" => Some(Level::Five),
            _ => None,
        }
    }

    /// Number of decoys on screen
    pub fn num_shapes(&self) -> u32 {
        match self {
            Level::One => 50,
            Level::Two => 75,
            Level::Three => 100,
            Level::Four => 125,
            Level::Five => 150,
        }
    }

    /// Scale factor shared by target and decoys
    pub fn scale_factor(&self) -> f32 {
        match self {
            Level::One => 5.0,
            Level::Two => 4.5,
            Level::Three => 4.0,
            Level::Four => 3.5,
            Level::Five => 3.0,
        }
    }
}

/// Configuration consumed by round setup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of decoy bodies (the target is extra)
    pub num_shapes: u32,
    /// Arena width in world units
    pub boundary_size_x: f32,
    /// Arena height in world units
    pub boundary_size_y: f32,
    pub target_scale_factor: f32,
    pub non_target_scale_factor: f32,
    /// RNG seed; `None` lets the host pick one (e.g. current time)
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            num_shapes: 100,
            boundary_size_x: BASE_ARENA_WIDTH,
            boundary_size_y: BASE_ARENA_WIDTH * 0.75,
            target_scale_factor: 5.0,
            non_target_scale_factor: 5.0,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Config for a level preset, keeping the default arena
    pub fn for_level(level: Level) -> Self {
        let scale = level.scale_factor();
        Self {
            num_shapes: level.num_shapes(),
            target_scale_factor: scale,
            non_target_scale_factor: scale,
            ..Self::default()
        }
    }

    /// Config for a level named by the host (`"3"`, `"three"`)
    pub fn from_level_name(name: &str) -> Result<Self, GameError> {
        let level = Level::from_str(name)
            .ok_or_else(|| GameError::Config(format!("unknown level {name:?}")))?;
        log::info!("Level {}", level.as_str());
        Ok(Self::for_level(level))
    }

    /// Fit the arena to a viewport: fixed width, height from aspect ratio
    pub fn fit_viewport(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            let aspect = width / height;
            self.boundary_size_y = self.boundary_size_x / aspect;
        }
    }

    /// Parse a (possibly partial) JSON config and validate it
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| GameError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), GameError> {
        let positive = [
            ("boundary_size_x", self.boundary_size_x),
            ("boundary_size_y", self.boundary_size_y),
            ("target_scale_factor", self.target_scale_factor),
            ("non_target_scale_factor", self.non_target_scale_factor),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(GameError::Config(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_level_presets() {
        let cfg = GameConfig::for_level(Level::Three);
        assert_eq!(cfg.num_shapes, 100);
        assert_eq!(cfg.target_scale_factor, 4.0);
        assert_eq!(Level::from_str("five"), Some(Level::Five));
        assert_eq!(Level::from_str("six"), None);
        for level in Level::ALL {
            assert!(GameConfig::for_level(level).validate().is_ok());
            assert_eq!(Level::from_str(level.as_str()), Some(level));
        }
    }

    #[test]
    fn test_from_level_name() {
        let cfg = GameConfig::from_level_name(" Two ").unwrap();
        assert_eq!(cfg, GameConfig::for_level(Level::Two));
        assert!(matches!(
            GameConfig::from_level_name("hard"),
            Err(GameError::Config(_))
        ));
    }

    #[test]
    fn test_large_decoy_counts_are_valid() {
        let cfg = GameConfig {
            num_shapes: 1500,
            ..GameConfig::default()
        };
        assert!(cfg.validate().is_ok());
        assert!(GameConfig::from_json(r#"{"num_shapes": 100000}"#).is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let cfg = GameConfig::from_json(r#"{"num_shapes": 3, "seed": 7}"#).unwrap();
        assert_eq!(cfg.num_shapes, 3);
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.boundary_size_x, BASE_ARENA_WIDTH);
    }

    #[test]
    fn test_rejects_non_positive() {
        let err = GameConfig::from_json(r#"{"boundary_size_y": 0.0}"#).unwrap_err();
        assert!(matches!(err, GameError::Config(_)));

        let err = GameConfig::from_json("not json").unwrap_err();
        assert!(matches!(err, GameError::Config(_)));
    }

    #[test]
    fn test_fit_viewport() {
        let mut cfg = GameConfig::default();
        cfg.fit_viewport(1600.0, 800.0);
        assert_eq!(cfg.boundary_size_x, 20.0);
        assert!((cfg.boundary_size_y - 10.0).abs() < 1e-6);
    }
}
