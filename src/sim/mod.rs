//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per host frame, no wall-clock reads
//! - Seeded RNG only
//! - No rendering, network or platform dependencies

pub mod collision;
pub mod fire;
pub mod state;
pub mod tick;

pub use collision::{StepOutcome, advance_ball, substep_count};
pub use fire::{FireEffect, FireParticle};
pub use state::{
    Ball, MatchConfig, MatchEvent, MatchPhase, MatchState, MoveIntent, Paddle, PaddleInput, Score,
    Side, SideFlags,
};
pub use tick::{TickInput, tick};
