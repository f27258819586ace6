//! Pong Engine entry point
//!
//! Headless host: loads settings, runs one game mode frame by frame and prints
//! the final score.
//!
//! ```text
//! pong-engine [settings.json] [local|exhibition|vs-ai [tier]|online]
//! ```
//!
//! Humans are stood in for by a simple ball follower. In online mode server
//! messages are read line by line from stdin and moves are written to stdout.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use pong_engine::ai::track;
use pong_engine::consts::FRAME_MS;
use pong_engine::modes::OnlineLink;
use pong_engine::{
    Difficulty, GameMode, MatchPhase, MatchState, ModeContext, ModeKind, MoveIntent, PaddleInput, Settings, Side,
};
use pong_engine::sim::{MatchEvent, TickInput};

/// Ten minutes of play at 60 Hz
const MAX_FRAMES: u64 = 60 * 60 * 10;

struct Args {
    settings_path: Option<String>,
    route: String,
    tier: Option<String>,
}

fn parse_args() -> Args {
    let mut args = Args {
        settings_path: None,
        route: "exhibition".to_string(),
        tier: None,
    };
    let mut route_seen = false;
    for arg in std::env::args().skip(1) {
        if arg.ends_with(".json") && args.settings_path.is_none() {
            args.settings_path = Some(arg);
        } else if !route_seen {
            args.route = arg;
            route_seen = true;
        } else if args.tier.is_none() {
            args.tier = Some(arg);
        }
    }
    args
}

fn load_settings(path: Option<&str>) -> Settings {
    match path {
        Some(path) => match Settings::load_from_path(path) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("{path}: {err}, using default settings");
                Settings::default()
            }
        },
        None => {
            log::info!("Using default settings");
            Settings::default()
        }
    }
}

/// Unknown tiers fall back to easy
fn resolve_difficulty(tier: Option<&str>, fallback: Difficulty) -> Difficulty {
    match tier {
        Some(tier) => tier.parse().unwrap_or_else(|err| {
            log::warn!("{err}, playing easy");
            Difficulty::Easy
        }),
        None => fallback,
    }
}

/// Stand-in for a human: keep the paddle centre on the ball
fn follow_ball(state: &MatchState, side: Side) -> PaddleInput {
    if state.phase == MatchPhase::Waiting {
        // Every human presses a key to start
        return MoveIntent::Up.into();
    }
    let paddle_center = state.paddle(side).center_y(&state.config);
    track(state.ball.pos.y, paddle_center).into()
}

/// Wire stdin/stdout to the online mode's channels
fn stdio_link() -> OnlineLink {
    let (inbound_tx, inbound) = mpsc::channel();
    let (outbound, outbound_rx) = mpsc::channel::<String>();

    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if inbound_tx.send(line).is_err() {
                break;
            }
        }
    });
    thread::spawn(move || {
        let mut stdout = io::stdout();
        for message in outbound_rx {
            if writeln!(stdout, "{message}").is_err() {
                break;
            }
        }
    });

    OnlineLink { inbound, outbound }
}

fn log_events(events: &[MatchEvent]) {
    for event in events {
        match event {
            MatchEvent::PointScored { scorer, score } => {
                log::info!("{} scores ({} - {})", scorer.as_str(), score.left, score.right)
            }
            other => log::debug!("{other:?}"),
        }
    }
}

fn run(mode: &mut dyn GameMode, kind: ModeKind) -> u64 {
    let mut frames = 0;
    while !mode.is_finished() && frames < MAX_FRAMES {
        let now_ms = frames as f64 * FRAME_MS;
        let input = match (kind, mode.state()) {
            (ModeKind::Local, Some(state)) => TickInput::new(follow_ball(state, Side::Left), follow_ball(state, Side::Right)),
            (ModeKind::VsAi(_), Some(state)) => TickInput::new(follow_ball(state, Side::Left), PaddleInput::default()),
            _ => TickInput::default(),
        };

        let report = mode.frame(now_ms, &input);
        log_events(&report.events);
        frames += 1;

        if kind == ModeKind::Online {
            thread::sleep(Duration::from_secs_f64(FRAME_MS / 1000.0));
        }
    }
    frames
}

fn main() -> ExitCode {
    env_logger::init();

    let args = parse_args();
    let settings = load_settings(args.settings_path.as_deref());
    let difficulty = resolve_difficulty(args.tier.as_deref(), settings.difficulty);

    let kind = match ModeKind::from_route(&args.route, difficulty) {
        Ok(kind) => kind,
        Err(err) => {
            eprintln!("{err}");
            eprintln!("usage: pong-engine [settings.json] [local|exhibition|vs-ai [tier]|online]");
            return ExitCode::FAILURE;
        }
    };

    let mut ctx = ModeContext::new(settings);
    if kind == ModeKind::Online {
        ctx = ctx.with_online(stdio_link());
    }

    let mut mode = match kind.create(&mut ctx) {
        Ok(mode) => mode,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    log::info!("Pong Engine starting: {}", mode.title_suffix());
    let frames = run(mode.as_mut(), kind);
    if !mode.is_finished() {
        log::warn!("Stopped after {frames} frames without a winner");
    }

    let (left, right) = mode.score();
    let winner = match mode.state().and_then(MatchState::winner) {
        Some(side) => side.as_str(),
        None if left > right => "left",
        None if right > left => "right",
        None => "none",
    };
    mode.dispose();

    println!("{} final score {left} - {right}, winner: {winner} ({frames} frames)", mode.title_suffix());
    ExitCode::SUCCESS
}
