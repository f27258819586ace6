//! Skill-tiered opponent for human-vs-AI matches
//!
//! Re-predicts at most once per second and only once per ball trajectory.
//! The raw intercept is blurred by an error that grows with the ball's distance
//! from the paddle and with the profile's `ai_level`.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::{AiProfile, Difficulty, Opponent, PredictionState, approaching, predict_intercept_y, track};
use crate::consts::AI_REPREDICT_MS;
use crate::sim::{MatchConfig, MatchState, MoveIntent, Side};

/// Below this `ai_level` every prediction is nudged 15 units up or down
const ANGLED_SHOT_LEVEL: f32 = 40.0;
const ANGLED_SHOT_OFFSET: f32 = 15.0;

#[derive(Debug, Clone)]
pub struct TieredAi {
    side: Side,
    difficulty: Difficulty,
    profile: AiProfile,
    prediction: PredictionState,
    field_height: f32,
    last_prediction_ms: Option<f64>,
    prediction_count: u32,
    rng: Pcg32,
}

impl TieredAi {
    pub fn new(side: Side, difficulty: Difficulty, config: &MatchConfig, seed: u64) -> Self {
        Self {
            side,
            difficulty,
            profile: difficulty.profile(),
            prediction: PredictionState::centered(config.canvas_height),
            field_height: config.canvas_height,
            last_prediction_ms: None,
            prediction_count: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn profile(&self) -> &AiProfile {
        &self.profile
    }

    pub fn prediction(&self) -> &PredictionState {
        &self.prediction
    }

    pub fn exact_prediction(&self) -> f32 {
        self.prediction.exact_prediction
    }

    /// Number of predictions computed so far
    pub fn prediction_count(&self) -> u32 {
        self.prediction_count
    }

    fn can_repredict(&self, now_ms: f64) -> bool {
        !self.prediction.locked
            && self
                .last_prediction_ms
                .is_none_or(|last| now_ms - last >= AI_REPREDICT_MS)
    }

    /// Blur `exact` by up to `ai_level * closeness` either way.
    ///
    /// `closeness` is the ball's horizontal distance to the paddle plane as a
    /// fraction of the canvas width. The result stays inside `[0, field_height]`.
    pub fn apply_error(&mut self, exact: f32, closeness: f32) -> f32 {
        let error = (self.profile.ai_level * closeness).abs();
        let mut prediction = exact;
        if error > 0.0 {
            prediction += self.rng.random_range(-error..=error);
        }
        if self.profile.ai_level < ANGLED_SHOT_LEVEL {
            prediction += if self.rng.random_bool(0.5) {
                ANGLED_SHOT_OFFSET
            } else {
                -ANGLED_SHOT_OFFSET
            };
        }
        prediction.clamp(0.0, self.field_height)
    }

    fn predict(&mut self, state: &MatchState) {
        let config = &state.config;
        let ball = &state.ball;
        let plane = config.paddle_plane_x(self.side);

        let exact = predict_intercept_y(ball, plane, config.canvas_height, 0.0).unwrap_or(ball.pos.y);
        let closeness = (plane - ball.pos.x).abs() / config.canvas_width;

        self.prediction.exact_prediction = exact;
        self.prediction.prediction = self.apply_error(exact, closeness);
        self.prediction_count += 1;
    }
}

impl Opponent for TieredAi {
    fn side(&self) -> Side {
        self.side
    }

    fn update(&mut self, state: &MatchState, now_ms: f64) -> MoveIntent {
        let config = &state.config;
        self.prediction.observe_direction(state.ball.vel.x);

        if approaching(self.side, state.ball.vel.x) {
            if self.can_repredict(now_ms) {
                self.predict(state);
                self.last_prediction_ms = Some(now_ms);
                self.prediction.locked = true;
            }
        } else {
            self.prediction.prediction = config.canvas_height / 2.0;
            self.prediction.exact_prediction = config.canvas_height / 2.0;
        }

        let paddle_center = state.paddle(self.side).center_y(config);
        track(self.prediction.prediction, paddle_center)
    }

    fn on_point_scored(&mut self, scorer: Side) {
        self.profile.on_point_scored(self.side, scorer);
        self.prediction.recenter(self.field_height);
    }

    fn target_y(&self) -> f32 {
        self.prediction.prediction
    }
}
