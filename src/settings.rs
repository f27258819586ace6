//! Match settings
//!
//! Loaded from an optional JSON file; every field falls back to its default
//! when missing.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ai::Difficulty;
use crate::consts::*;
use crate::sim::{FireEffect, MatchConfig, SideFlags};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    Medium,
    #[default]
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum fire particles alive at once
    pub fn max_fire_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 20,
            QualityPreset::Medium => 50,
            QualityPreset::High => 80,
        }
    }
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Match settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Arena ===
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Units per tick
    pub paddle_speed: f32,
    pub ball_radius: f32,

    // === Rules ===
    pub points_to_win: u8,
    /// Horizontal serve speed after a point
    pub serve_dx: f32,
    /// Vertical serve speed in human matches
    pub serve_dy: f32,
    /// Vertical serve speed in AI-vs-AI matches
    pub exhibition_serve_dy: f32,

    // === AI ===
    pub difficulty: Difficulty,

    // === Visual Effects ===
    /// Fire trail behind a fast ball
    pub fire_effect: bool,
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Online ===
    /// Ease the display toward server snapshots instead of jumping
    pub online_smoothing: bool,
    /// Fraction of the remaining distance covered per frame
    pub snapshot_blend: f32,

    /// Seed for AI error and particle randomness
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_speed: PADDLE_SPEED,
            ball_radius: BALL_RADIUS,

            points_to_win: POINTS_TO_WIN,
            serve_dx: SERVE_DX,
            serve_dy: SERVE_DY,
            exhibition_serve_dy: 1.0,

            difficulty: Difficulty::Easy,

            fire_effect: true,
            quality: QualityPreset::High,

            online_smoothing: true,
            snapshot_blend: SNAPSHOT_BLEND,

            seed: 0x5eed,
        }
    }
}

impl Settings {
    /// Parse and validate settings JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load from a JSON file
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that the arena is playable
    pub fn validate(&self) -> Result<(), SettingsError> {
        let positive = [
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
            ("paddle_width", self.paddle_width),
            ("paddle_height", self.paddle_height),
            ("paddle_speed", self.paddle_speed),
            ("ball_radius", self.ball_radius),
            ("serve_dx", self.serve_dx),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(field, format!("must be a positive number, got {value}")));
            }
        }
        for (field, value) in [("serve_dy", self.serve_dy), ("exhibition_serve_dy", self.exhibition_serve_dy)] {
            if !value.is_finite() {
                return Err(invalid(field, format!("must be finite, got {value}")));
            }
        }
        // Serves skip the speed clamp until the first collision response
        for (field, value) in [
            ("serve_dx", self.serve_dx),
            ("serve_dy", self.serve_dy),
            ("exhibition_serve_dy", self.exhibition_serve_dy),
        ] {
            if value.abs() > BALL_MAX_SPEED {
                return Err(invalid(field, format!("must not exceed {BALL_MAX_SPEED}, got {value}")));
            }
        }
        if self.paddle_height >= self.canvas_height {
            return Err(invalid("paddle_height", "must be smaller than canvas_height".into()));
        }
        if self.ball_radius * 2.0 >= self.canvas_height {
            return Err(invalid("ball_radius", "ball does not fit the canvas".into()));
        }
        if self.paddle_width * 2.0 + self.ball_radius * 2.0 >= self.canvas_width {
            return Err(invalid("paddle_width", "no room between the paddles".into()));
        }
        if self.points_to_win == 0 {
            return Err(invalid("points_to_win", "must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.snapshot_blend) {
            return Err(invalid(
                "snapshot_blend",
                format!("must be within 0..=1, got {}", self.snapshot_blend),
            ));
        }
        Ok(())
    }

    /// Geometry and rules for a match between humans (or human vs AI)
    pub fn match_config(&self) -> MatchConfig {
        MatchConfig {
            canvas_width: self.canvas_width,
            canvas_height: self.canvas_height,
            paddle_width: self.paddle_width,
            paddle_height: self.paddle_height,
            paddle_speed: self.paddle_speed,
            ball_radius: self.ball_radius,
            serve_dx: self.serve_dx,
            serve_dy: self.serve_dy,
            points_to_win: self.points_to_win,
            wait_for_start: true,
            human_sides: SideFlags::BOTH,
        }
    }

    /// AI-vs-AI matches start immediately with a steeper serve
    pub fn exhibition_config(&self) -> MatchConfig {
        MatchConfig {
            serve_dy: self.exhibition_serve_dy,
            wait_for_start: false,
            human_sides: SideFlags::default(),
            ..self.match_config()
        }
    }

    /// Effective particle cap
    pub fn max_fire_particles(&self) -> usize {
        if !self.fire_effect {
            0
        } else {
            self.quality.max_fire_particles()
        }
    }

    pub fn fire_effect_state(&self, seed: u64) -> FireEffect {
        FireEffect::with_limits(seed, self.max_fire_particles(), self.fire_effect)
    }
}

fn invalid(field: &'static str, reason: String) -> SettingsError {
    SettingsError::InvalidValue { field, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.match_config(), MatchConfig::default());
        assert_eq!(settings.exhibition_config(), MatchConfig::exhibition());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{"points_to_win": 3, "difficulty": "hard"}"#).unwrap();
        assert_eq!(settings.points_to_win, 3);
        assert_eq!(settings.difficulty, Difficulty::Hard);
        assert_eq!(settings.canvas_width, CANVAS_WIDTH);
        assert!(settings.fire_effect);
    }

    #[test]
    fn test_json_round_trip() {
        let mut settings = Settings::default();
        settings.quality = QualityPreset::Low;
        settings.seed = 42;
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_rejects_unplayable_values() {
        let err = Settings::from_json(r#"{"paddle_height": 900}"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::InvalidValue {
                field: "paddle_height",
                ..
            }
        ));

        assert!(Settings::from_json(r#"{"points_to_win": 0}"#).is_err());
        assert!(Settings::from_json(r#"{"snapshot_blend": 1.5}"#).is_err());
        assert!(Settings::from_json(r#"{"ball_radius": -1}"#).is_err());

        assert!(matches!(
            Settings::from_json(r#"{"serve_dx": 41}"#),
            Err(SettingsError::InvalidValue { field: "serve_dx", .. })
        ));
        assert!(matches!(
            Settings::from_json(r#"{"exhibition_serve_dy": -40.5}"#),
            Err(SettingsError::InvalidValue {
                field: "exhibition_serve_dy",
                ..
            })
        ));
        assert!(Settings::from_json(r#"{"serve_dx": 40, "serve_dy": -40}"#).is_ok());
        assert!(matches!(
            Settings::from_json(r#"{"difficulty": "nightmare"}"#),
            Err(SettingsError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Settings::load_from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }

    #[test]
    fn test_quality_caps_particles() {
        assert_eq!(QualityPreset::from_str("med"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::from_str("ultra"), None);
        assert_eq!(QualityPreset::High.as_str(), "High");

        let mut settings = Settings::default();
        assert_eq!(settings.max_fire_particles(), 80);
        settings.quality = QualityPreset::Low;
        assert_eq!(settings.max_fire_particles(), 20);
        settings.fire_effect = false;
        assert_eq!(settings.max_fire_particles(), 0);
        assert!(!settings.fire_effect_state(1).enabled);
    }
}
