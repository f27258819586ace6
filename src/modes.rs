//! Game modes driven by the host once per frame
//!
//! Each mode owns its match (or its online view) and whatever opponents it
//! needs. The host picks a [`ModeKind`], builds it through the factory table
//! and then only talks to the [`GameMode`] trait.

use std::sync::mpsc::{Receiver, Sender, TryRecvError};

use thiserror::Error;

use crate::ai::{Difficulty, ExhibitionAi, Opponent, TieredAi};
use crate::online::{OnlineView, outbound_moves, parse_server_message};
use crate::settings::Settings;
use crate::sim::{MatchConfig, MatchEvent, MatchState, PaddleInput, Side, SideFlags, TickInput, tick};

/// Everything a mode needs from the host
#[derive(Debug)]
pub struct ModeContext {
    pub settings: Settings,
    pub seed: u64,
    /// Server connection, consumed by the online mode
    pub online: Option<OnlineLink>,
}

impl ModeContext {
    pub fn new(settings: Settings) -> Self {
        let seed = settings.seed;
        Self {
            settings,
            seed,
            online: None,
        }
    }

    pub fn with_online(mut self, link: OnlineLink) -> Self {
        self.online = Some(link);
        self
    }

    fn match_state(&self, config: MatchConfig) -> MatchState {
        let mut state = MatchState::new(config, self.seed);
        state.fire = self.settings.fire_effect_state(self.seed);
        state
    }
}

/// Text channels to and from the match server
#[derive(Debug)]
pub struct OnlineLink {
    pub inbound: Receiver<String>,
    pub outbound: Sender<String>,
}

#[derive(Debug, Error)]
pub enum ModeError {
    #[error("online mode needs a server connection")]
    MissingOnlineLink,

    #[error("unknown mode '{0}'")]
    UnknownMode(String),
}

/// Result of one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub events: Vec<MatchEvent>,
    pub finished: bool,
}

pub trait GameMode {
    /// Appended to the window/page title
    fn title_suffix(&self) -> String;

    /// (Re)start from a fresh match
    fn init(&mut self);

    /// Advance one host frame
    fn frame(&mut self, now_ms: f64, input: &TickInput) -> FrameReport;

    /// Release anything held outside the mode
    fn dispose(&mut self) {}

    fn is_finished(&self) -> bool;

    /// Locally simulated match, if any
    fn state(&self) -> Option<&MatchState> {
        None
    }

    /// (left, right)
    fn score(&self) -> (u32, u32);
}

/// Available modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeKind {
    /// Two humans on one keyboard
    Local,
    /// Human on the left, tiered AI on the right
    VsAi(Difficulty),
    /// Two exhibition AIs
    Exhibition,
    /// Server-authoritative match
    Online,
}

type ModeFactory = fn(&mut ModeContext, ModeKind) -> Result<Box<dyn GameMode>, ModeError>;

const FACTORIES: [(&str, ModeFactory); 4] = [
    ("local", create_local),
    ("vs-ai", create_vs_ai),
    ("exhibition", create_exhibition),
    ("online", create_online),
];

fn create_local(ctx: &mut ModeContext, _kind: ModeKind) -> Result<Box<dyn GameMode>, ModeError> {
    Ok(Box::new(LocalMode::new(ctx)))
}

fn create_vs_ai(ctx: &mut ModeContext, kind: ModeKind) -> Result<Box<dyn GameMode>, ModeError> {
    let difficulty = match kind {
        ModeKind::VsAi(difficulty) => difficulty,
        _ => ctx.settings.difficulty,
    };
    Ok(Box::new(VsAiMode::new(ctx, difficulty)))
}

fn create_exhibition(ctx: &mut ModeContext, _kind: ModeKind) -> Result<Box<dyn GameMode>, ModeError> {
    Ok(Box::new(ExhibitionMode::new(ctx)))
}

fn create_online(ctx: &mut ModeContext, _kind: ModeKind) -> Result<Box<dyn GameMode>, ModeError> {
    let link = ctx.online.take().ok_or(ModeError::MissingOnlineLink)?;
    Ok(Box::new(OnlineMode::new(ctx, link)))
}

impl ModeKind {
    pub fn route(&self) -> &'static str {
        match self {
            ModeKind::Local => "local",
            ModeKind::VsAi(_) => "vs-ai",
            ModeKind::Exhibition => "exhibition",
            ModeKind::Online => "online",
        }
    }

    /// Parse a route name; `vs-ai` falls back to `default_difficulty`
    pub fn from_route(route: &str, default_difficulty: Difficulty) -> Result<Self, ModeError> {
        match route {
            "local" => Ok(ModeKind::Local),
            "vs-ai" => Ok(ModeKind::VsAi(default_difficulty)),
            "exhibition" => Ok(ModeKind::Exhibition),
            "online" => Ok(ModeKind::Online),
            other => Err(ModeError::UnknownMode(other.to_string())),
        }
    }

    /// Build the mode through the factory table and initialise it
    pub fn create(self, ctx: &mut ModeContext) -> Result<Box<dyn GameMode>, ModeError> {
        let route = self.route();
        let factory = FACTORIES
            .iter()
            .find(|(name, _)| *name == route)
            .map(|(_, factory)| *factory)
            .ok_or_else(|| ModeError::UnknownMode(route.to_string()))?;
        let mut mode = factory(ctx, self)?;
        mode.init();
        Ok(mode)
    }
}

fn score_of(state: &MatchState) -> (u32, u32) {
    (u32::from(state.score.left), u32::from(state.score.right))
}

fn frame_report(state: &MatchState, events: Vec<MatchEvent>) -> FrameReport {
    FrameReport {
        events,
        finished: state.is_over(),
    }
}

// ============================================================================
// Local
// ============================================================================

pub struct LocalMode {
    fresh: MatchState,
    state: MatchState,
}

impl LocalMode {
    pub fn new(ctx: &ModeContext) -> Self {
        let state = ctx.match_state(ctx.settings.match_config());
        Self {
            fresh: state.clone(),
            state,
        }
    }
}

impl GameMode for LocalMode {
    fn title_suffix(&self) -> String {
        "Local 1v1".to_string()
    }

    fn init(&mut self) {
        self.state = self.fresh.clone();
        log::info!("Local match ready, first to {}", self.state.config.points_to_win);
    }

    fn frame(&mut self, _now_ms: f64, input: &TickInput) -> FrameReport {
        let events = tick(&mut self.state, input);
        frame_report(&self.state, events)
    }

    fn is_finished(&self) -> bool {
        self.state.is_over()
    }

    fn state(&self) -> Option<&MatchState> {
        Some(&self.state)
    }

    fn score(&self) -> (u32, u32) {
        score_of(&self.state)
    }
}

// ============================================================================
// Human vs AI
// ============================================================================

pub struct VsAiMode {
    fresh: (MatchState, TieredAi),
    state: MatchState,
    ai: TieredAi,
}

impl VsAiMode {
    pub fn new(ctx: &ModeContext, difficulty: Difficulty) -> Self {
        let ai_side = Side::Right;
        let config = MatchConfig {
            human_sides: SideFlags::only(ai_side.opposite()),
            ..ctx.settings.match_config()
        };
        let state = ctx.match_state(config);
        let ai = TieredAi::new(ai_side, difficulty, &state.config, ctx.seed.wrapping_add(1));
        Self {
            fresh: (state.clone(), ai.clone()),
            state,
            ai,
        }
    }

    pub fn ai(&self) -> &TieredAi {
        &self.ai
    }
}

impl GameMode for VsAiMode {
    fn title_suffix(&self) -> String {
        format!("vs AI ({})", self.ai.difficulty())
    }

    fn init(&mut self) {
        let (state, ai) = self.fresh.clone();
        self.state = state;
        self.ai = ai;
        log::info!("Match vs {} AI ready", self.ai.difficulty());
    }

    fn frame(&mut self, now_ms: f64, input: &TickInput) -> FrameReport {
        let mut input = *input;
        let intent = self.ai.update(&self.state, now_ms);
        input.set(self.ai.side(), PaddleInput::from(intent));

        let events = tick(&mut self.state, &input);
        for event in &events {
            if let MatchEvent::PointScored { scorer, .. } = event {
                self.ai.on_point_scored(*scorer);
            }
        }
        frame_report(&self.state, events)
    }

    fn is_finished(&self) -> bool {
        self.state.is_over()
    }

    fn state(&self) -> Option<&MatchState> {
        Some(&self.state)
    }

    fn score(&self) -> (u32, u32) {
        score_of(&self.state)
    }
}

// ============================================================================
// AI vs AI
// ============================================================================

pub struct ExhibitionMode {
    fresh: MatchState,
    state: MatchState,
    left: ExhibitionAi,
    right: ExhibitionAi,
    seed: u64,
}

impl ExhibitionMode {
    pub fn new(ctx: &ModeContext) -> Self {
        let state = ctx.match_state(ctx.settings.exhibition_config());
        let (left, right) = Self::opponents(&state.config, ctx.seed);
        Self {
            fresh: state.clone(),
            state,
            left,
            right,
            seed: ctx.seed,
        }
    }

    fn opponents(config: &MatchConfig, seed: u64) -> (ExhibitionAi, ExhibitionAi) {
        (
            ExhibitionAi::new(Side::Left, config, seed.wrapping_add(2)),
            ExhibitionAi::new(Side::Right, config, seed.wrapping_add(3)),
        )
    }
}

impl GameMode for ExhibitionMode {
    fn title_suffix(&self) -> String {
        "AI vs AI".to_string()
    }

    fn init(&mut self) {
        self.state = self.fresh.clone();
        (self.left, self.right) = Self::opponents(&self.state.config, self.seed);
        log::info!("Exhibition match ready");
    }

    /// Human input is ignored
    fn frame(&mut self, now_ms: f64, _input: &TickInput) -> FrameReport {
        let input = TickInput::new(
            self.left.update(&self.state, now_ms).into(),
            self.right.update(&self.state, now_ms).into(),
        );

        let events = tick(&mut self.state, &input);
        for event in &events {
            if let MatchEvent::PointScored { scorer, .. } = event {
                self.left.on_point_scored(*scorer);
                self.right.on_point_scored(*scorer);
            }
        }
        frame_report(&self.state, events)
    }

    fn is_finished(&self) -> bool {
        self.state.is_over()
    }

    fn state(&self) -> Option<&MatchState> {
        Some(&self.state)
    }

    fn score(&self) -> (u32, u32) {
        score_of(&self.state)
    }
}

// ============================================================================
// Online
// ============================================================================

pub struct OnlineMode {
    view: OnlineView,
    link: Option<OnlineLink>,
    smoothing: bool,
    blend: f32,
    rejected: u64,
}

impl OnlineMode {
    pub fn new(ctx: &ModeContext, link: OnlineLink) -> Self {
        let smoothing = ctx.settings.online_smoothing;
        let blend = ctx.settings.snapshot_blend;
        Self {
            view: OnlineView::new(smoothing, blend),
            link: Some(link),
            smoothing,
            blend,
            rejected: 0,
        }
    }

    pub fn view(&self) -> &OnlineView {
        &self.view
    }

    /// Inbound messages that failed to parse or validate
    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    fn drain_inbound(&mut self) {
        let Some(link) = &self.link else {
            return;
        };
        loop {
            match link.inbound.try_recv() {
                Ok(raw) => {
                    let result = parse_server_message(&raw).and_then(|msg| self.view.handle(msg));
                    if let Err(err) = result {
                        log::warn!("Dropped server message: {err}");
                        self.rejected += 1;
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::warn!("Server connection closed");
                    self.link = None;
                    break;
                }
            }
        }
    }

    fn send_moves(&mut self, input: PaddleInput) {
        let Some(link) = &self.link else {
            return;
        };
        for message in outbound_moves(input) {
            let json = match message.to_json() {
                Ok(json) => json,
                Err(err) => {
                    log::warn!("Could not encode move: {err}");
                    continue;
                }
            };
            if link.outbound.send(json).is_err() {
                log::warn!("Server connection closed, move not sent");
                self.link = None;
                return;
            }
        }
    }
}

impl GameMode for OnlineMode {
    fn title_suffix(&self) -> String {
        "Online".to_string()
    }

    fn init(&mut self) {
        self.view = OnlineView::new(self.smoothing, self.blend);
        self.rejected = 0;
        log::info!("Online match: waiting for server");
    }

    /// Either paddle's keys steer the local player's paddle
    fn frame(&mut self, _now_ms: f64, input: &TickInput) -> FrameReport {
        self.drain_inbound();
        self.view.advance_frame();
        if !self.view.is_finished() {
            let local = PaddleInput::new(input.left.up || input.right.up, input.left.down || input.right.down);
            self.send_moves(local);
        }
        FrameReport {
            events: Vec::new(),
            finished: self.is_finished(),
        }
    }

    fn dispose(&mut self) {
        self.link = None;
        log::info!("Online match closed");
    }

    /// Over when the server says so or the connection is gone
    fn is_finished(&self) -> bool {
        self.view.is_finished() || self.link.is_none()
    }

    fn score(&self) -> (u32, u32) {
        let display = self.view.display();
        (display.left_score, display.right_score)
    }
}
