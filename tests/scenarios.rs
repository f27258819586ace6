//! End-to-end match scenarios

use glam::Vec2;

use pong_engine::ai::Opponent;
use pong_engine::consts::{FRAME_MS, PADDLE_HEIGHT};
use pong_engine::sim::collision::paddle_bounce;
use pong_engine::sim::{Ball, MatchConfig, MatchEvent, MatchPhase, MatchState, Paddle, Side, TickInput, tick};
use pong_engine::{Difficulty, ExhibitionAi, ModeContext, ModeKind, Settings, TieredAi};

fn playing(config: MatchConfig) -> MatchState {
    let mut state = MatchState::new(config, 2024);
    state.phase = MatchPhase::Playing;
    state
}

#[test]
fn test_ball_from_center_bounces_off_left_paddle() {
    let mut state = playing(MatchConfig::default());
    state.ball.pos = Vec2::new(400.0, 300.0);
    state.ball.vel = Vec2::new(-6.0, 1.0);
    // Paddle placed where the ball arrives
    state.left.y = 330.0;

    let mut left_hit = false;
    while state.ball.pos.x > 30.0 {
        let events = tick(&mut state, &TickInput::default());
        left_hit |= events.contains(&MatchEvent::PaddleHit(Side::Left));
        assert!(state.ticks < 200, "ball never reached the paddle");
    }

    assert!(left_hit);
    assert!(state.ball.vel.x > 0.0);
}

#[test]
fn test_easy_ai_error_at_full_distance() {
    let config = MatchConfig::default();
    let mut ai = TieredAi::new(Side::Right, Difficulty::Easy, &config, 11);
    assert_eq!(ai.profile().ai_level, 120.0);

    let exact = 300.0;
    let mut max_error = 0.0f32;
    for _ in 0..1000 {
        let prediction = ai.apply_error(exact, 1.0);
        let error = (prediction - exact).abs();
        assert!(error <= 120.0);
        assert!((0.0..=config.canvas_height).contains(&prediction));
        max_error = max_error.max(error);
    }
    assert!(max_error > 100.0);
}

#[test]
fn test_first_to_five_ends_the_match() {
    let mut state = playing(MatchConfig::default());
    state.score.left = 4;
    state.score.right = 3;
    state.right.y = 0.0;
    state.ball.pos = Vec2::new(795.0, 500.0);
    state.ball.vel = Vec2::new(8.0, 0.0);

    let events = tick(&mut state, &TickInput::default());
    assert!(events.contains(&MatchEvent::GameOver {
        winner: Side::Left,
        score: state.score,
    }));
    assert!(state.is_over());

    let ball = state.ball;
    for _ in 0..120 {
        tick(&mut state, &TickInput::default());
    }
    assert_eq!(state.ball, ball);
    assert_eq!((state.score.left, state.score.right), (5, 3));
}

#[test]
fn test_dead_center_hit_gets_minimum_dy() {
    let paddle = Paddle::new(265.0);

    for (dy, expected) in [(0.05, 1.0), (-0.05, -1.0)] {
        // Struck exactly at the paddle centre
        let mut ball = Ball::new(Vec2::new(30.0, 300.0), Vec2::new(-6.0, dy), 10.0);
        paddle_bounce(&mut ball, paddle.y, PADDLE_HEIGHT);
        assert!(ball.vel.x > 0.0);
        assert_eq!(ball.vel.y, expected);
    }
}

#[test]
fn test_prediction_lock_holds_across_ticks() {
    let mut state = playing(MatchConfig::default());
    state.ball.pos = Vec2::new(100.0, 300.0);
    state.ball.vel = Vec2::new(6.0, 2.0);
    let mut ai = TieredAi::new(Side::Right, Difficulty::Medium, &state.config, 5);

    let mut now = 0.0;
    for _ in 0..90 {
        let intent = ai.update(&state, now);
        let input = TickInput::new(Default::default(), intent.into());
        tick(&mut state, &input);
        now += FRAME_MS;
    }
    assert!(state.ball.vel.x > 0.0);
    assert_eq!(ai.prediction_count(), 1);
}

#[test]
fn test_exhibition_match_is_reproducible() {
    let play = || {
        let mut ctx = ModeContext::new(Settings::default());
        let mut mode = ModeKind::Exhibition.create(&mut ctx).unwrap_or_else(|e| panic!("{e}"));
        let mut frames = 0u32;
        while !mode.is_finished() && frames < 20_000 {
            mode.frame(frames as f64 * FRAME_MS, &TickInput::default());
            frames += 1;
        }
        (mode.score(), frames)
    };
    assert_eq!(play(), play());
}

#[test]
fn test_exhibition_ais_return_serves() {
    let mut state = MatchState::new(MatchConfig::exhibition(), 8);
    let mut left = ExhibitionAi::new(Side::Left, &state.config, 1);
    let mut right = ExhibitionAi::new(Side::Right, &state.config, 2);

    let mut hits = 0;
    for frame in 0..600 {
        let now = frame as f64 * FRAME_MS;
        let input = TickInput::new(left.update(&state, now).into(), right.update(&state, now).into());
        for event in tick(&mut state, &input) {
            match event {
                MatchEvent::PaddleHit(_) => hits += 1,
                MatchEvent::PointScored { scorer, .. } => {
                    left.on_point_scored(scorer);
                    right.on_point_scored(scorer);
                }
                _ => {}
            }
        }
    }
    assert!(hits > 0, "exhibition AIs should rally");
}
