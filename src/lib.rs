//! Pong Engine - deterministic Pong simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (sub-stepped physics, collisions, match state, fire effect)
//! - `ai`: Predictive AI opponents (exhibition and skill-tiered)
//! - `online`: Server snapshot intake, display smoothing and outbound move intents
//! - `modes`: Game modes the host drives once per frame
//! - `settings`: Data-driven match configuration

pub mod ai;
pub mod modes;
pub mod online;
pub mod settings;
pub mod sim;

pub use ai::{Difficulty, ExhibitionAi, Opponent, TieredAi};
pub use modes::{GameMode, ModeContext, ModeKind};
pub use settings::{QualityPreset, Settings, SettingsError};
pub use sim::{MatchConfig, MatchEvent, MatchPhase, MatchState, MoveIntent, PaddleInput, Side};

/// Game configuration constants
pub mod consts {
    /// Canvas dimensions
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Paddle defaults (shared by both sides)
    pub const PADDLE_WIDTH: f32 = 20.0;
    pub const PADDLE_HEIGHT: f32 = 70.0;
    /// Vertical paddle speed in units per tick
    pub const PADDLE_SPEED: f32 = 8.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    /// Horizontal serve speed after a point (sign chosen per serve)
    pub const SERVE_DX: f32 = 6.0;
    /// Vertical serve speed after a point
    pub const SERVE_DY: f32 = 0.1;

    /// Per-component velocity cap
    pub const BALL_MAX_SPEED: f32 = 40.0;
    /// Minimum |dy| right after a paddle bounce
    pub const BALL_MIN_DY: f32 = 1.0;
    /// Speed multiplier on every paddle hit
    pub const PADDLE_BOOST: f32 = 1.10;
    /// Maximum bounce angle off a paddle (30 degrees)
    pub const MAX_BOUNCE_ANGLE: f32 = std::f32::consts::FRAC_PI_6;
    /// Normalised intersect is clamped to +/- this before scaling by the bounce angle
    pub const MAX_INTERSECT: f32 = 0.7;

    /// Points needed to win a match
    pub const POINTS_TO_WIN: u8 = 5;

    /// Dead zone for AI paddle tracking
    pub const AI_TOLERANCE: f32 = 5.0;
    /// Minimum time between two skill-tiered predictions (ms)
    pub const AI_REPREDICT_MS: f64 = 1000.0;

    /// Ball speed at which the fire effect kicks in
    pub const FIRE_THRESHOLD: f32 = 15.0;
    /// Ball speed at which the flame turns blue
    pub const BLUE_FIRE_THRESHOLD: f32 = 35.0;

    /// Per-frame blend toward the latest server snapshot
    pub const SNAPSHOT_BLEND: f32 = 0.75;

    /// Host frame duration used by the headless runner (~60 Hz)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
}

/// Sign of a value as -1, 0 or 1 (unlike `f32::signum`, zero maps to zero)
#[inline]
pub fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Clamp each component of `vel` to `[-max, max]`, preserving its sign
#[inline]
pub fn clamp_components(vel: glam::Vec2, max: f32) -> glam::Vec2 {
    glam::Vec2::new(vel.x.clamp(-max, max), vel.y.clamp(-max, max))
}
