//! Game configuration
//!
//! Every tuning value the simulation reads. Loaded from JSON; any field left
//! out falls back to the defaults in [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::LoadError;

/// Tuning parameters for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Screen ===
    pub screen_width: f32,
    pub screen_height: f32,

    // === Paddle ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_bottom_margin: f32,
    pub paddle_dead_band: f32,
    /// Extra reflection angle from a moving paddle (degrees)
    pub paddle_angle_degrees: f32,
    pub paddle_stick_speed: f32,
    pub stick_dead_zone: f32,
    pub pointer_move_threshold: f32,

    // === Ball ===
    pub ball_radius: f32,
    pub ball_speed_x: f32,
    pub ball_speed_y: f32,
    pub ball_max_vx: f32,
    pub paddle_bounce_boost: f32,
    pub bounce_damping: f32,
    pub launch_angle_min_degrees: f32,
    pub launch_angle_max_degrees: f32,
    pub ball_spawn_gap: f32,

    // === Blocks ===
    pub block_width: f32,
    pub block_height: f32,
    pub block_columns: usize,
    pub block_spacing_x: f32,
    pub block_row_y: f32,
    pub block_correct_hp: u8,

    // === Door ===
    pub door_width: f32,
    pub door_height: f32,
    pub door_y: f32,

    // === Scoring ===
    pub score_per_block: u32,
    pub combo_threshold: u32,
    pub combo_multiplier: f64,
    pub perfect_bonus_multiplier: f64,
    pub initial_lives: u32,

    // === Stages ===
    pub stage_clear_delay_secs: f32,
    pub total_stages: u32,
    pub words_per_stage_min: usize,
    pub words_per_stage_max: usize,
    pub new_words_per_stage_max: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,

            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_bottom_margin: PADDLE_BOTTOM_MARGIN,
            paddle_dead_band: PADDLE_DEAD_BAND,
            paddle_angle_degrees: PADDLE_ANGLE_DEGREES,
            paddle_stick_speed: PADDLE_STICK_SPEED,
            stick_dead_zone: STICK_DEAD_ZONE,
            pointer_move_threshold: POINTER_MOVE_THRESHOLD,

            ball_radius: BALL_RADIUS,
            ball_speed_x: BALL_SPEED_X,
            ball_speed_y: BALL_SPEED_Y,
            ball_max_vx: BALL_MAX_VX,
            paddle_bounce_boost: PADDLE_BOUNCE_BOOST,
            bounce_damping: BOUNCE_DAMPING,
            launch_angle_min_degrees: LAUNCH_ANGLE_MIN_DEGREES,
            launch_angle_max_degrees: LAUNCH_ANGLE_MAX_DEGREES,
            ball_spawn_gap: BALL_SPAWN_GAP,

            block_width: BLOCK_WIDTH,
            block_height: BLOCK_HEIGHT,
            block_columns: BLOCK_COLUMNS,
            block_spacing_x: BLOCK_SPACING_X,
            block_row_y: BLOCK_ROW_Y,
            block_correct_hp: BLOCK_CORRECT_HP,

            door_width: DOOR_WIDTH,
            door_height: DOOR_HEIGHT,
            door_y: DOOR_Y,

            score_per_block: SCORE_BLOCK_DESTROY,
            combo_threshold: COMBO_THRESHOLD,
            combo_multiplier: COMBO_MULTIPLIER,
            perfect_bonus_multiplier: PERFECT_BONUS_MULTIPLIER,
            initial_lives: INITIAL_LIVES,

            stage_clear_delay_secs: STAGE_CLEAR_DELAY_SECS,
            total_stages: TOTAL_STAGES,
            words_per_stage_min: WORDS_PER_STAGE_MIN,
            words_per_stage_max: WORDS_PER_STAGE_MAX,
            new_words_per_stage_max: NEW_WORDS_PER_STAGE_MAX,
        }
    }
}

impl GameConfig {
    /// Parse and validate a config from JSON text
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a config file
    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load a config file, falling back to defaults if it is missing or invalid
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(err) => {
                log::warn!("Using default config ({}: {err})", path.display());
                Self::default()
            }
        }
    }

    /// Reject values the simulation can't run with
    pub fn validate(&self) -> Result<(), LoadError> {
        let invalid = |field, reason| Err(LoadError::InvalidConfig { field, reason });

        if self.screen_width <= 0.0 || self.screen_height <= 0.0 {
            return invalid("screen_width", "screen dimensions must be positive");
        }
        if self.paddle_width <= 0.0 || self.paddle_width > self.screen_width {
            return invalid("paddle_width", "must be positive and fit on screen");
        }
        if self.ball_radius <= 0.0 {
            return invalid("ball_radius", "must be positive");
        }
        if !(self.bounce_damping > 0.0 && self.bounce_damping <= 1.0) {
            return invalid("bounce_damping", "must be in (0, 1]");
        }
        if self.paddle_bounce_boost < 0.0 {
            return invalid("paddle_bounce_boost", "must not be negative");
        }
        if self.launch_angle_min_degrees > self.launch_angle_max_degrees {
            return invalid("launch_angle_min_degrees", "min exceeds max");
        }
        if self.block_correct_hp == 0 {
            return invalid("block_correct_hp", "must be at least 1");
        }
        if self.combo_threshold == 0 {
            return invalid("combo_threshold", "must be at least 1");
        }
        if self.combo_multiplier < 1.0 || self.perfect_bonus_multiplier < 1.0 {
            return invalid("combo_multiplier", "multipliers must be >= 1.0");
        }
        if self.initial_lives == 0 {
            return invalid("initial_lives", "must be at least 1");
        }
        if self.total_stages == 0 {
            return invalid("total_stages", "must be at least 1");
        }
        if self.words_per_stage_min > self.words_per_stage_max {
            return invalid("words_per_stage_min", "min exceeds max");
        }
        Ok(())
    }

    /// Paddle top edge (the paddle never moves vertically)
    pub fn paddle_y(&self) -> f32 {
        self.screen_height - self.paddle_height - self.paddle_bottom_margin
    }

    /// Door left edge (centred horizontally)
    pub fn door_x(&self) -> f32 {
        (self.screen_width - self.door_width) / 2.0
    }

    /// Tangent of the paddle movement angle
    pub fn paddle_angle_tan(&self) -> f32 {
        self.paddle_angle_degrees.to_radians().tan()
    }

    /// Stage clear delay in simulation ticks
    pub fn stage_clear_ticks(&self) -> u32 {
        (self.stage_clear_delay_secs * SIM_HZ).round().max(0.0) as u32
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
    fn test_partial_json_fills_defaults() {
        let config = GameConfig::from_json(r#"{ "initial_lives": 3, "total_stages": 2 }"#)
            .expect("valid partial config");
        assert_eq!(config.initial_lives, 3);
        assert_eq!(config.total_stages, 2);
        assert_eq!(config.paddle_width, PADDLE_WIDTH);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = GameConfig::from_json(r#"{ "bounce_damping": 1.5 }"#).unwrap_err();
        assert!(matches!(
            err,
            LoadError::InvalidConfig { field: "bounce_damping", .. }
        ));

        let err = GameConfig::from_json(r#"{ "words_per_stage_min": 6 }"#).unwrap_err();
        assert!(matches!(err, LoadError::InvalidConfig { .. }));
    }

    #[test]
    fn test_malformed_json() {
        let err = GameConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = GameConfig::load("/definitely/not/here/config.json");
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_derived_values() {
        let config = GameConfig::default();
        assert_eq!(config.paddle_y(), 680.0);
        assert_eq!(config.door_x(), 460.0);
        assert_eq!(config.stage_clear_ticks(), 90);
        assert!((config.paddle_angle_tan() - 0.57735).abs() < 1e-4);
    }
}
