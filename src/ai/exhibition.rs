//! Exhibition opponent used for AI-vs-AI matches
//!
//! Predicts once per trajectory, then positions the paddle so the ball lands
//! on the part of the face that sends it away from the other paddle.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::{Opponent, PredictionState, approaching, predict_intercept_y, track};
use crate::sim::{MatchConfig, MatchState, MoveIntent, Side};

/// Random spread added to the strategic offset, in units (total width)
const OFFSET_JITTER: f32 = 10.0;

#[derive(Debug, Clone)]
pub struct ExhibitionAi {
    side: Side,
    prediction: PredictionState,
    /// Distance from the paddle's top edge to the point aimed at the ball
    offset: f32,
    rng: Pcg32,
}

impl ExhibitionAi {
    pub fn new(side: Side, config: &MatchConfig, seed: u64) -> Self {
        Self {
            side,
            prediction: PredictionState::centered(config.canvas_height),
            offset: config.paddle_height / 2.0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn prediction(&self) -> &PredictionState {
        &self.prediction
    }

    /// x the ball centre has when it touches this side's paddle face
    fn intercept_plane(&self, config: &MatchConfig) -> f32 {
        match self.side {
            Side::Left => config.paddle_width + config.ball_radius,
            Side::Right => config.canvas_width - config.paddle_width - config.ball_radius,
        }
    }

    /// Hit low on the paddle when the opponent sits in the lower half (sending
    /// the ball up), high otherwise
    fn strategic_offset(&mut self, state: &MatchState) -> f32 {
        let config = &state.config;
        let opponent_center = state.paddle(self.side.opposite()).center_y(config);
        let impact = if opponent_center > config.canvas_height / 2.0 {
            config.paddle_height * 0.25
        } else {
            config.paddle_height * 0.75
        };
        let jitter = (self.rng.random::<f32>() - 0.5) * OFFSET_JITTER;
        (impact + jitter).clamp(0.0, config.paddle_height)
    }
}

impl Opponent for ExhibitionAi {
    fn side(&self) -> Side {
        self.side
    }

    fn update(&mut self, state: &MatchState, _now_ms: f64) -> MoveIntent {
        let config = &state.config;
        let ball = &state.ball;
        self.prediction.observe_direction(ball.vel.x);

        if approaching(self.side, ball.vel.x) {
            if !self.prediction.locked {
                let plane = self.intercept_plane(config);
                // Already past the plane: chase the ball itself
                let y = predict_intercept_y(ball, plane, config.canvas_height, ball.radius).unwrap_or(ball.pos.y);
                self.prediction.prediction = y;
                self.prediction.exact_prediction = y;
                self.offset = self.strategic_offset(state);
                self.prediction.locked = true;
            }
        } else {
            self.prediction.prediction = config.canvas_height / 2.0;
            self.offset = config.paddle_height / 2.0;
        }

        let aim = state.paddle(self.side).y + self.offset;
        track(self.prediction.prediction, aim)
    }

    fn on_point_scored(&mut self, _scorer: Side) {
        // Next serve may keep the old direction, so a stale lock must go
        self.prediction.locked = false;
    }

    fn target_y(&self) -> f32 {
        self.prediction.prediction
    }
}
