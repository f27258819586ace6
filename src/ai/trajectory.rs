//! Ball trajectory prediction for AI opponents

use crate::sim::Ball;

/// Hard cap on forward-simulation steps
pub const MAX_PREDICTION_STEPS: usize = 10_000;

/// Predict the ball's `y` when its centre reaches `target_x`.
///
/// Steps forward by whole `(dx, dy)` ticks, reflecting `dy` whenever the next
/// `y` would leave `[margin, field_height - margin]`. Paddles are ignored.
///
/// Returns `None` when the ball has no horizontal motion or is moving away
/// from `target_x`. A ball already past the target plane predicts its current `y`.
pub fn predict_intercept_y(ball: &Ball, target_x: f32, field_height: f32, margin: f32) -> Option<f32> {
    let dx = ball.vel.x;
    if dx == 0.0 || !dx.is_finite() {
        return None;
    }
    let toward_target = (target_x - ball.pos.x) * dx >= 0.0;
    if !toward_target {
        return None;
    }

    let mut x = ball.pos.x;
    let mut y = ball.pos.y;
    let mut dy = ball.vel.y;
    let before_target = |x: f32| if dx > 0.0 { x < target_x } else { x > target_x };

    let mut steps = 0;
    while before_target(x) && steps < MAX_PREDICTION_STEPS {
        x += dx;
        let next_y = y + dy;
        if next_y - margin < 0.0 || next_y + margin > field_height {
            dy = -dy;
        }
        y += dy;
        steps += 1;
    }

    Some(y)
}
