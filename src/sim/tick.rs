//! Per-frame simulation tick
//!
//! Advances a match deterministically by one frame of input.

use super::collision::advance_ball;
use super::state::{MatchEvent, MatchPhase, MatchState, PaddleInput, Side};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: PaddleInput,
    pub right: PaddleInput,
}

impl TickInput {
    pub fn new(left: PaddleInput, right: PaddleInput) -> Self {
        Self { left, right }
    }

    pub fn for_side(&self, side: Side) -> PaddleInput {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn set(&mut self, side: Side, input: PaddleInput) {
        match side {
            Side::Left => self.left = input,
            Side::Right => self.right = input,
        }
    }
}

/// Latch every human side pressing a direction; true once all have
fn players_ready(state: &mut MatchState, input: &TickInput) -> bool {
    for side in [Side::Left, Side::Right] {
        let humans = state.config.human_sides;
        if humans.get(side) && !state.ready.get(side) && input.for_side(side).intent().is_directional() {
            log::debug!("{} player ready", side.as_str());
            state.ready.set(side);
        }
    }
    state.ready.covers(state.config.human_sides)
}

/// Advance the match by one tick and report what happened
pub fn tick(state: &mut MatchState, input: &TickInput) -> Vec<MatchEvent> {
    let mut events = Vec::new();

    match state.phase {
        MatchPhase::GameOver { .. } => return events,
        MatchPhase::Waiting => {
            if !players_ready(state, input) {
                return events;
            }
            log::info!("Match started");
            state.phase = MatchPhase::Playing;
            events.push(MatchEvent::Started);
        }
        MatchPhase::Playing => {}
    }

    state.ticks += 1;

    let config = state.config;
    state.left.apply(input.left.intent(), &config);
    state.right.apply(input.right.intent(), &config);

    let outcome = advance_ball(&mut state.ball, &state.left, &state.right, &config);
    if outcome.left_hit {
        events.push(MatchEvent::PaddleHit(Side::Left));
    }
    if outcome.right_hit {
        events.push(MatchEvent::PaddleHit(Side::Right));
    }
    if outcome.wall_hit {
        events.push(MatchEvent::WallHit);
    }

    if let Some(scorer) = outcome.scorer {
        state.score.increment(scorer);
        state.last_scorer = Some(scorer);
        events.push(MatchEvent::PointScored {
            scorer,
            score: state.score,
        });
        log::debug!(
            "Point to {}: {} - {}",
            scorer.as_str(),
            state.score.left,
            state.score.right
        );

        if let Some(winner) = state.score.winner(config.points_to_win) {
            state.phase = MatchPhase::GameOver { winner };
            state.fire.clear();
            events.push(MatchEvent::GameOver {
                winner,
                score: state.score,
            });
            log::info!(
                "Game over, {} wins {} - {}",
                winner.as_str(),
                state.score.left,
                state.score.right
            );
            return events;
        }

        state.reset_for_serve(scorer.opposite());
    }

    state.fire.update(&state.ball);

    events
}
