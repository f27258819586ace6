//! Match state and core simulation types
//!
//! Everything the host reads once per frame lives here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::fire::FireEffect;
use crate::consts::*;

/// Which half of the court a paddle defends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Sign of `dx` for a ball travelling toward this side
    pub fn toward(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// Discrete paddle move request for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveIntent {
    Up,
    Down,
    #[default]
    None,
}

impl MoveIntent {
    pub fn is_directional(self) -> bool {
        !matches!(self, MoveIntent::None)
    }
}

/// Raw up/down key state for one paddle, as tracked by the host input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PaddleInput {
    pub up: bool,
    pub down: bool,
}

impl PaddleInput {
    pub fn new(up: bool, down: bool) -> Self {
        Self { up, down }
    }

    /// Collapse key state into a single intent. Both keys held cancel out.
    pub fn intent(&self) -> MoveIntent {
        match (self.up, self.down) {
            (true, false) => MoveIntent::Up,
            (false, true) => MoveIntent::Down,
            _ => MoveIntent::None,
        }
    }
}

impl From<MoveIntent> for PaddleInput {
    fn from(intent: MoveIntent) -> Self {
        match intent {
            MoveIntent::Up => Self::new(true, false),
            MoveIntent::Down => Self::new(false, true),
            MoveIntent::None => Self::default(),
        }
    }
}

/// One flag per side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SideFlags {
    pub left: bool,
    pub right: bool,
}

impl SideFlags {
    pub const BOTH: Self = Self { left: true, right: true };

    pub fn only(side: Side) -> Self {
        let mut flags = Self::default();
        flags.set(side);
        flags
    }

    pub fn get(&self, side: Side) -> bool {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn set(&mut self, side: Side) {
        match side {
            Side::Left => self.left = true,
            Side::Right => self.right = true,
        }
    }

    /// Every side flagged in `required` is flagged here too
    pub fn covers(&self, required: SideFlags) -> bool {
        (self.left || !required.left) && (self.right || !required.right)
    }
}

/// Geometry and rules of a match (derived from [`crate::Settings`])
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_speed: f32,
    pub ball_radius: f32,
    pub serve_dx: f32,
    pub serve_dy: f32,
    pub points_to_win: u8,
    /// Whether the match waits for its players before the first serve
    pub wait_for_start: bool,
    /// Human-controlled sides; each must press a direction to leave `Waiting`
    pub human_sides: SideFlags,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_speed: PADDLE_SPEED,
            ball_radius: BALL_RADIUS,
            serve_dx: SERVE_DX,
            serve_dy: SERVE_DY,
            points_to_win: POINTS_TO_WIN,
            wait_for_start: true,
            human_sides: SideFlags::BOTH,
        }
    }
}

impl MatchConfig {
    /// Exhibition matches start immediately and serve with a steeper dy
    pub fn exhibition() -> Self {
        Self {
            serve_dy: 1.0,
            wait_for_start: false,
            human_sides: SideFlags::default(),
            ..Self::default()
        }
    }

    /// Highest legal paddle `y` (top edge)
    #[inline]
    pub fn paddle_max_y(&self) -> f32 {
        self.canvas_height - self.paddle_height
    }

    /// Paddle `y` that centres it vertically
    #[inline]
    pub fn paddle_center_y(&self) -> f32 {
        self.canvas_height / 2.0 - self.paddle_height / 2.0
    }

    /// x of the paddle face the ball's leading edge collides with
    #[inline]
    pub fn paddle_plane_x(&self, side: Side) -> f32 {
        match side {
            Side::Left => self.paddle_width,
            Side::Right => self.canvas_width - self.paddle_width,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.canvas_width / 2.0, self.canvas_height / 2.0)
    }
}

/// The ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Displacement per tick
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self { pos, vel, radius }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Put the ball back at the centre, heading toward `toward`
    pub fn serve(&mut self, config: &MatchConfig, toward: Side) {
        self.pos = config.center();
        self.vel = Vec2::new(toward.toward() * config.serve_dx, config.serve_dy);
    }
}

/// A paddle; only its vertical position changes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    /// Top edge
    pub y: f32,
}

impl Paddle {
    pub fn new(y: f32) -> Self {
        Self { y }
    }

    pub fn centered(config: &MatchConfig) -> Self {
        Self::new(config.paddle_center_y())
    }

    #[inline]
    pub fn center_y(&self, config: &MatchConfig) -> f32 {
        self.y + config.paddle_height / 2.0
    }

    /// Move one tick in the intent's direction, staying inside the canvas
    pub fn apply(&mut self, intent: MoveIntent, config: &MatchConfig) {
        let delta = match intent {
            MoveIntent::Up => -config.paddle_speed,
            MoveIntent::Down => config.paddle_speed,
            MoveIntent::None => return,
        };
        self.y = (self.y + delta).clamp(0.0, config.paddle_max_y());
    }
}

/// Running score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    pub left: u8,
    pub right: u8,
}

impl Score {
    pub fn get(&self, side: Side) -> u8 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn increment(&mut self, side: Side) {
        match side {
            Side::Left => self.left = self.left.saturating_add(1),
            Side::Right => self.right = self.right.saturating_add(1),
        }
    }

    pub fn winner(&self, points_to_win: u8) -> Option<Side> {
        if self.left >= points_to_win {
            Some(Side::Left)
        } else if self.right >= points_to_win {
            Some(Side::Right)
        } else {
            None
        }
    }
}

/// Current phase of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Waiting for the first directional input
    Waiting,
    /// Ball in play
    Playing,
    /// Someone reached the winning score; the simulation no longer advances
    GameOver { winner: Side },
}

/// Things that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchEvent {
    Started,
    PaddleHit(Side),
    WallHit,
    PointScored { scorer: Side, score: Score },
    GameOver { winner: Side, score: Score },
}

/// Complete match state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchState {
    pub config: MatchConfig,
    pub ball: Ball,
    pub left: Paddle,
    pub right: Paddle,
    pub score: Score,
    pub phase: MatchPhase,
    /// Who won the most recent point
    pub last_scorer: Option<Side>,
    /// Sides that have signalled ready while `Waiting`
    pub ready: SideFlags,
    /// Ticks spent in `Playing`
    pub ticks: u64,
    /// Speed-driven particle effect (not gameplay-affecting)
    #[serde(skip)]
    pub fire: FireEffect,
}

impl MatchState {
    /// Create a match with the ball at centre heading left
    pub fn new(config: MatchConfig, seed: u64) -> Self {
        let phase = if config.wait_for_start {
            MatchPhase::Waiting
        } else {
            MatchPhase::Playing
        };
        let mut ball = Ball::new(Vec2::ZERO, Vec2::ZERO, config.ball_radius);
        ball.serve(&config, Side::Left);

        Self {
            config,
            ball,
            left: Paddle::centered(&config),
            right: Paddle::centered(&config),
            score: Score::default(),
            phase,
            last_scorer: None,
            ready: SideFlags::default(),
            ticks: 0,
            fire: FireEffect::new(seed),
        }
    }

    pub fn paddle(&self, side: Side) -> &Paddle {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn paddle_mut(&mut self, side: Side) -> &mut Paddle {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, MatchPhase::GameOver { .. })
    }

    pub fn winner(&self) -> Option<Side> {
        match self.phase {
            MatchPhase::GameOver { winner } => Some(winner),
            _ => None,
        }
    }

    /// Serve toward the side that conceded and recentre both paddles
    pub fn reset_for_serve(&mut self, conceded: Side) {
        self.ball.serve(&self.config, conceded);
        self.left = Paddle::centered(&self.config);
        self.right = Paddle::centered(&self.config);
    }
}
