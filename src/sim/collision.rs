//! Collision detection and response for the rectangular court
//!
//! The ball moves in sub-steps no longer than its radius, and every boundary
//! test compares the position before and after a sub-step, so a fast ball
//! cannot skip over a paddle face or a goal line.

use glam::Vec2;

use super::state::{Ball, MatchConfig, Paddle, Side};
use crate::consts::*;
use crate::{clamp_components, sign};

/// What happened while advancing the ball for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    pub left_hit: bool,
    pub right_hit: bool,
    pub wall_hit: bool,
    /// Side that scored, if the ball crossed a goal line
    pub scorer: Option<Side>,
}

/// Number of equal sub-steps for one tick of motion. Never zero.
#[inline]
pub fn substep_count(vel: Vec2, radius: f32) -> u32 {
    let longest = vel.x.abs().max(vel.y.abs());
    if !longest.is_finite() || radius <= 0.0 {
        return 1;
    }
    ((longest / radius).ceil() as u32).max(1)
}

/// Does a ball centred at `ball_y` overlap the paddle's vertical extent (edges inclusive)
#[inline]
pub fn overlaps_paddle_y(ball_y: f32, radius: f32, paddle_y: f32, paddle_height: f32) -> bool {
    ball_y + radius >= paddle_y && ball_y - radius <= paddle_y + paddle_height
}

/// Did the ball's leading edge cross `side`'s paddle face between `prev_x` and `curr_x`
#[inline]
pub fn crosses_paddle_plane(side: Side, prev_x: f32, curr_x: f32, radius: f32, config: &MatchConfig) -> bool {
    let plane = config.paddle_plane_x(side);
    match side {
        Side::Left => prev_x - radius > plane && curr_x - radius <= plane,
        Side::Right => prev_x + radius < plane && curr_x + radius >= plane,
    }
}

/// Paddle hit response.
///
/// The outgoing angle depends on where the ball struck relative to the paddle
/// centre (clamped to +/-0.7 of the half height, scaled to at most 30 degrees).
/// Every hit makes the ball 10% faster and reverses its horizontal direction.
pub fn paddle_bounce(ball: &mut Ball, paddle_y: f32, paddle_height: f32) {
    let half = paddle_height / 2.0;
    let relative_intersect = ball.pos.y - (paddle_y + half);
    let normalized = (relative_intersect / half).clamp(-MAX_INTERSECT, MAX_INTERSECT);
    let bounce_angle = normalized * MAX_BOUNCE_ANGLE;

    let speed = ball.speed() * PADDLE_BOOST;
    let direction = if ball.vel.x > 0.0 { -1.0 } else { 1.0 };
    let incoming_dy = ball.vel.y;

    let dx = direction * speed * bounce_angle.cos();
    let mut dy = speed * bounce_angle.sin();

    if dy.abs() < BALL_MIN_DY {
        // A dead-centre hit has no angle of its own: keep the incoming vertical direction
        let mut s = sign(dy);
        if s == 0.0 {
            s = if incoming_dy < 0.0 { -1.0 } else { 1.0 };
        }
        dy = s * BALL_MIN_DY;
    }

    ball.vel = Vec2::new(dx, dy);
}

/// Clamp |dx| and |dy| independently
#[inline]
pub fn limit_ball_speed(ball: &mut Ball) {
    ball.vel = clamp_components(ball.vel, BALL_MAX_SPEED);
}

/// Top/bottom wall response. Returns true if the ball touched a wall.
///
/// Position is clamped before the velocity is forced away from the wall, so a
/// ball resting exactly on the boundary never bounces twice.
pub fn wall_collision(ball: &mut Ball, canvas_height: f32) -> bool {
    let mut hit = false;
    if ball.pos.y - ball.radius < 0.0 {
        ball.pos.y = ball.radius;
        ball.vel.y = ball.vel.y.abs();
        hit = true;
    }
    if ball.pos.y + ball.radius > canvas_height {
        ball.pos.y = canvas_height - ball.radius;
        ball.vel.y = -ball.vel.y.abs();
        hit = true;
    }
    hit
}

/// Goal-line crossing between two x positions.
///
/// Each line is closed on the court side and open beyond it, so a crossing is
/// reported by exactly one sub-step.
#[inline]
pub fn goal_crossing(prev_x: f32, curr_x: f32, canvas_width: f32) -> Option<Side> {
    if prev_x >= 0.0 && curr_x < 0.0 {
        Some(Side::Right)
    } else if prev_x <= canvas_width && curr_x > canvas_width {
        Some(Side::Left)
    } else {
        None
    }
}

/// Check one paddle against the sub-step that moved the ball from `prev_x`
fn paddle_collision(ball: &mut Ball, side: Side, paddle: &Paddle, prev_x: f32, config: &MatchConfig) -> bool {
    if !crosses_paddle_plane(side, prev_x, ball.pos.x, ball.radius, config) {
        return false;
    }
    if !overlaps_paddle_y(ball.pos.y, ball.radius, paddle.y, config.paddle_height) {
        return false;
    }

    // Snap onto the face so the ball never sinks into the paddle
    ball.pos.x = match side {
        Side::Left => config.paddle_width + ball.radius,
        Side::Right => config.canvas_width - config.paddle_width - ball.radius,
    };
    paddle_bounce(ball, paddle.y, config.paddle_height);
    true
}

/// Advance the ball by one tick.
///
/// Sub-step order: move, left paddle, right paddle, speed clamp, walls, goal.
/// Each sub-step moves by the ball's *current* velocity divided by the step
/// count, so a bounce earlier in the tick is honoured by the remaining steps.
/// Sub-stepping stops at the first goal crossing.
pub fn advance_ball(ball: &mut Ball, left: &Paddle, right: &Paddle, config: &MatchConfig) -> StepOutcome {
    let mut outcome = StepOutcome::default();
    let steps = substep_count(ball.vel, ball.radius);

    for _ in 0..steps {
        let prev_x = ball.pos.x;
        ball.pos += ball.vel / steps as f32;

        if paddle_collision(ball, Side::Left, left, prev_x, config) {
            outcome.left_hit = true;
        }
        if paddle_collision(ball, Side::Right, right, prev_x, config) {
            outcome.right_hit = true;
        }
        limit_ball_speed(ball);

        if wall_collision(ball, config.canvas_height) {
            outcome.wall_hit = true;
        }

        if let Some(scorer) = goal_crossing(prev_x, ball.pos.x, config.canvas_width) {
            outcome.scorer = Some(scorer);
            break;
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MatchConfig {
        MatchConfig::default()
    }

    fn ball(x: f32, y: f32, dx: f32, dy: f32) -> Ball {
        Ball::new(Vec2::new(x, y), Vec2::new(dx, dy), BALL_RADIUS)
    }

    #[test]
    fn test_substep_count_never_zero() {
        assert_eq!(substep_count(Vec2::ZERO, 10.0), 1);
        assert_eq!(substep_count(Vec2::new(6.0, 0.1), 10.0), 1);
        assert_eq!(substep_count(Vec2::new(-25.0, 3.0), 10.0), 3);
        assert_eq!(substep_count(Vec2::new(2.0, -40.0), 10.0), 4);
        assert_eq!(substep_count(Vec2::new(f32::NAN, 1.0), 10.0), 1);
    }

    #[test]
    fn test_wall_top_forces_downward() {
        let mut b = ball(400.0, 4.0, 3.0, -5.0);
        assert!(wall_collision(&mut b, 600.0));
        assert_eq!(b.pos.y, BALL_RADIUS);
        assert_eq!(b.vel.y, 5.0);
        assert_eq!(b.vel.x, 3.0);
    }

    #[test]
    fn test_wall_bottom_forces_upward() {
        let mut b = ball(400.0, 598.0, 3.0, 5.0);
        assert!(wall_collision(&mut b, 600.0));
        assert_eq!(b.pos.y, 590.0);
        assert_eq!(b.vel.y, -5.0);
    }

    #[test]
    fn test_ball_on_wall_boundary_does_not_bounce() {
        let mut b = ball(400.0, BALL_RADIUS, 3.0, -5.0);
        assert!(!wall_collision(&mut b, 600.0));
        assert_eq!(b.vel.y, -5.0);
    }

    #[test]
    fn test_bounce_reverses_and_accelerates() {
        let paddle_y = 265.0;
        let mut b = ball(30.0, 300.0, -6.0, 0.0);
        paddle_bounce(&mut b, paddle_y, PADDLE_HEIGHT);
        assert!(b.vel.x > 0.0);
        // Centre hit: all speed goes horizontal
        assert!((b.vel.x - 6.6).abs() < 1e-4);
    }

    #[test]
    fn test_bounce_angle_follows_intersect() {
        let paddle_y = 265.0;

        // Struck near the top edge: ball leaves upward
        let mut b = ball(30.0, 268.0, -8.0, 0.0);
        paddle_bounce(&mut b, paddle_y, PADDLE_HEIGHT);
        assert!(b.vel.y < 0.0);

        // Struck near the bottom edge: ball leaves downward
        let mut b = ball(30.0, 332.0, -8.0, 0.0);
        paddle_bounce(&mut b, paddle_y, PADDLE_HEIGHT);
        assert!(b.vel.y > 0.0);
    }

    #[test]
    fn test_bounce_angle_is_capped() {
        // Far beyond the paddle edge still caps at 0.7 * 30 degrees
        let mut b = ball(30.0, 400.0, -10.0, 0.0);
        paddle_bounce(&mut b, 265.0, PADDLE_HEIGHT);
        let angle = (b.vel.y / b.vel.x.abs()).atan();
        assert!((angle - MAX_INTERSECT * MAX_BOUNCE_ANGLE).abs() < 1e-4);
    }

    #[test]
    fn test_dead_center_bounce_gets_min_dy() {
        let paddle_y = 265.0;
        let mut b = ball(30.0, 300.0, -6.0, 0.05);
        paddle_bounce(&mut b, paddle_y, PADDLE_HEIGHT);
        assert_eq!(b.vel.y, BALL_MIN_DY);

        let mut b = ball(30.0, 300.0, -6.0, -0.05);
        paddle_bounce(&mut b, paddle_y, PADDLE_HEIGHT);
        assert_eq!(b.vel.y, -BALL_MIN_DY);
    }

    #[test]
    fn test_small_angle_bounce_keeps_computed_sign() {
        // Slightly above centre: tiny negative dy is lifted to -1
        let mut b = ball(30.0, 299.0, -6.0, 0.5);
        paddle_bounce(&mut b, 265.0, PADDLE_HEIGHT);
        assert_eq!(b.vel.y, -BALL_MIN_DY);
    }

    #[test]
    fn test_limit_ball_speed() {
        let mut b = ball(0.0, 0.0, -60.0, 41.0);
        limit_ball_speed(&mut b);
        assert_eq!(b.vel, Vec2::new(-40.0, 40.0));
    }

    #[test]
    fn test_goal_crossing_is_one_sided() {
        assert_eq!(goal_crossing(2.0, -1.0, 800.0), Some(Side::Right));
        assert_eq!(goal_crossing(0.0, -0.5, 800.0), Some(Side::Right));
        assert_eq!(goal_crossing(-1.0, -3.0, 800.0), None);
        assert_eq!(goal_crossing(799.0, 801.0, 800.0), Some(Side::Left));
        assert_eq!(goal_crossing(801.0, 805.0, 800.0), None);
    }

    #[test]
    fn test_left_paddle_hit_snaps_to_face() {
        let cfg = config();
        let left = Paddle::new(265.0);
        let right = Paddle::new(265.0);
        let mut b = ball(34.0, 300.0, -6.0, 1.0);

        let outcome = advance_ball(&mut b, &left, &right, &cfg);
        assert!(outcome.left_hit);
        assert_eq!(b.pos.x, cfg.paddle_width + BALL_RADIUS);
        assert!(b.vel.x > 0.0);
    }

    #[test]
    fn test_right_paddle_hit() {
        let cfg = config();
        let left = Paddle::new(265.0);
        let right = Paddle::new(265.0);
        let mut b = ball(766.0, 300.0, 6.0, 1.0);

        let outcome = advance_ball(&mut b, &left, &right, &cfg);
        assert!(outcome.right_hit);
        assert_eq!(b.pos.x, cfg.canvas_width - cfg.paddle_width - BALL_RADIUS);
        assert!(b.vel.x < 0.0);
    }

    #[test]
    fn test_miss_when_paddle_elsewhere() {
        let cfg = config();
        let left = Paddle::new(0.0);
        let right = Paddle::new(265.0);
        let mut b = ball(34.0, 500.0, -6.0, 0.0);

        let outcome = advance_ball(&mut b, &left, &right, &cfg);
        assert!(!outcome.left_hit);
        assert!(b.vel.x < 0.0);
    }

    #[test]
    fn test_fast_ball_does_not_tunnel() {
        let cfg = config();
        let left = Paddle::new(265.0);
        let right = Paddle::new(265.0);
        // 38 units per tick is almost twice the paddle width
        let mut b = ball(60.0, 300.0, -38.0, 0.0);

        let outcome = advance_ball(&mut b, &left, &right, &cfg);
        assert!(outcome.left_hit, "fast ball should still hit the paddle");
        assert!(b.vel.x > 0.0);
        assert!(b.pos.x >= cfg.paddle_width + BALL_RADIUS);
    }

    #[test]
    fn test_goal_stops_substepping() {
        let cfg = config();
        let left = Paddle::new(0.0);
        let right = Paddle::new(0.0);
        let mut b = ball(5.0, 500.0, -30.0, 0.0);

        let outcome = advance_ball(&mut b, &left, &right, &cfg);
        assert_eq!(outcome.scorer, Some(Side::Right));
        // Stopped at the first sub-step past the line
        assert!(b.pos.x < 0.0 && b.pos.x > -10.0);
    }
}
