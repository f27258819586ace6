//! Predictive AI opponents
//!
//! Both opponents forward-simulate the ball to the plane of their own paddle,
//! then steer toward the result with a small dead zone. They differ in how they
//! perturb the prediction:
//! - [`ExhibitionAi`] aims a strategic part of its paddle at the ball
//! - [`TieredAi`] adds a distance-scaled error driven by [`AiProfile`]
//!
//! Opponents only read [`MatchState`]; they return a [`MoveIntent`] that the
//! mode feeds into the next tick like any other paddle input.

pub mod exhibition;
pub mod profile;
pub mod tiered;
pub mod trajectory;

pub use exhibition::ExhibitionAi;
pub use profile::{AiProfile, Difficulty, UnknownDifficulty};
pub use tiered::TieredAi;
pub use trajectory::predict_intercept_y;

use serde::{Deserialize, Serialize};

use crate::consts::AI_TOLERANCE;
use crate::sign;
use crate::sim::{MatchState, MoveIntent, Side};

/// A computer-controlled paddle
pub trait Opponent {
    /// Side this opponent plays
    fn side(&self) -> Side;

    /// Decide this frame's move. `now_ms` is the host's monotonic clock.
    fn update(&mut self, state: &MatchState, now_ms: f64) -> MoveIntent;

    /// Called once per point, after the score changed
    fn on_point_scored(&mut self, _scorer: Side) {}

    /// Ball `y` the opponent is currently steering for
    fn target_y(&self) -> f32;
}

/// Steer `aim_y` toward `target_y`, holding still inside the dead zone
#[inline]
pub fn track(target_y: f32, aim_y: f32) -> MoveIntent {
    if target_y < aim_y - AI_TOLERANCE {
        MoveIntent::Up
    } else if target_y > aim_y + AI_TOLERANCE {
        MoveIntent::Down
    } else {
        MoveIntent::None
    }
}

/// Is the ball heading toward `side`'s paddle
#[inline]
pub fn approaching(side: Side, dx: f32) -> bool {
    sign(dx) == side.toward()
}

/// Cached prediction shared by both opponents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionState {
    /// Target the paddle steers for (after any perturbation)
    pub prediction: f32,
    /// Raw simulated intercept
    pub exact_prediction: f32,
    /// Set once a prediction is made for the current trajectory
    pub locked: bool,
    /// Sign of the ball's `dx` when last observed
    last_dx_sign: Option<f32>,
}

impl PredictionState {
    pub fn centered(field_height: f32) -> Self {
        Self {
            prediction: field_height / 2.0,
            exact_prediction: field_height / 2.0,
            locked: false,
            last_dx_sign: None,
        }
    }

    /// Record the ball's horizontal direction, unlocking on a sign change.
    /// Returns true if the direction changed.
    pub fn observe_direction(&mut self, dx: f32) -> bool {
        let current = sign(dx);
        let changed = matches!(self.last_dx_sign, Some(previous) if previous != current);
        if changed {
            self.locked = false;
        }
        self.last_dx_sign = Some(current);
        changed
    }

    /// Back to centre and unlocked, keeping the direction memory
    pub fn recenter(&mut self, field_height: f32) {
        self.prediction = field_height / 2.0;
        self.exact_prediction = field_height / 2.0;
        self.locked = false;
    }
}
