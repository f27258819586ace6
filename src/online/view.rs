//! Client-side display state for a server-authoritative match
//!
//! Positions ease toward the latest snapshot each frame. A snapshot whose
//! ball velocity flips sign (a bounce the client never simulated) is shown
//! immediately instead of being eased into.

use glam::Vec2;

use super::protocol::{ServerMessage, SnapshotError, SnapshotWire};
use crate::consts::SNAPSHOT_BLEND;
use crate::sign;

/// What the host draws
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DisplayState {
    pub ball_pos: Vec2,
    pub ball_vel: Vec2,
    pub left_y: f32,
    pub right_y: f32,
    pub left_score: u32,
    pub right_score: u32,
}

impl DisplayState {
    fn from_wire(snapshot: &SnapshotWire) -> Self {
        Self {
            ball_pos: Vec2::new(snapshot.ball.x, snapshot.ball.y),
            ball_vel: Vec2::new(snapshot.ball.dx, snapshot.ball.dy),
            left_y: snapshot.left_paddle.y,
            right_y: snapshot.right_paddle.y,
            // validated non-negative
            left_score: snapshot.left_score.clamp(0, u32::MAX as i64) as u32,
            right_score: snapshot.right_score.clamp(0, u32::MAX as i64) as u32,
        }
    }
}

/// Lobby information around the match itself
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lobby {
    pub left_player: Option<String>,
    pub right_player: Option<String>,
    pub left_ready: bool,
    pub right_ready: bool,
    /// Server asked both players to confirm they are ready
    pub waiting_ready: bool,
}

#[derive(Debug, Clone)]
pub struct OnlineView {
    display: DisplayState,
    target: Option<DisplayState>,
    snap_next: bool,
    smoothing: bool,
    blend: f32,
    lobby: Lobby,
    finished: bool,
    winner: Option<String>,
    snapshots: u64,
}

impl Default for OnlineView {
    fn default() -> Self {
        Self::new(true, SNAPSHOT_BLEND)
    }
}

impl OnlineView {
    pub fn new(smoothing: bool, blend: f32) -> Self {
        Self {
            display: DisplayState::default(),
            target: None,
            snap_next: false,
            smoothing,
            blend: blend.clamp(0.0, 1.0),
            lobby: Lobby::default(),
            finished: false,
            winner: None,
            snapshots: 0,
        }
    }

    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    pub fn lobby(&self) -> &Lobby {
        &self.lobby
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn winner(&self) -> Option<&str> {
        self.winner.as_deref()
    }

    /// Snapshots accepted so far
    pub fn snapshot_count(&self) -> u64 {
        self.snapshots
    }

    /// Route a decoded server message
    pub fn handle(&mut self, message: ServerMessage) -> Result<(), SnapshotError> {
        match message {
            ServerMessage::GameState { state } => self.apply_snapshot(&state)?,
            ServerMessage::GameOver { winner, by } => {
                log::info!("Online match over ({}), winner {:?}", by.as_deref().unwrap_or("points"), winner);
                self.finished = true;
                self.winner = winner;
            }
            ServerMessage::PlayersUpdate {
                left_player,
                right_player,
                ..
            } => {
                self.lobby.left_player = left_player;
                self.lobby.right_player = right_player;
            }
            ServerMessage::WaitReady { .. } => self.lobby.waiting_ready = true,
            ServerMessage::PlayersReady {
                left_ready,
                right_ready,
            } => {
                self.lobby.left_ready = left_ready;
                self.lobby.right_ready = right_ready;
                if left_ready && right_ready {
                    self.lobby.waiting_ready = false;
                }
            }
        }
        Ok(())
    }

    /// Store a new authoritative target. Invalid snapshots are rejected and
    /// leave the view untouched.
    pub fn apply_snapshot(&mut self, snapshot: &SnapshotWire) -> Result<(), SnapshotError> {
        snapshot.validate()?;
        let next = DisplayState::from_wire(snapshot);

        match &self.target {
            Some(previous) => {
                if flipped(previous.ball_vel.x, next.ball_vel.x) || flipped(previous.ball_vel.y, next.ball_vel.y) {
                    self.snap_next = true;
                }
            }
            None => self.snap_next = true,
        }

        self.display.left_score = next.left_score;
        self.display.right_score = next.right_score;
        if snapshot.winner.is_some() {
            self.winner = snapshot.winner.clone();
        }
        self.target = Some(next);
        self.snapshots += 1;
        Ok(())
    }

    /// Move the display one frame toward the latest snapshot
    pub fn advance_frame(&mut self) {
        let Some(target) = self.target else {
            return;
        };

        if !self.smoothing || self.snap_next {
            self.display = target;
            self.snap_next = false;
            return;
        }

        let t = self.blend;
        self.display.ball_pos = self.display.ball_pos.lerp(target.ball_pos, t);
        self.display.left_y += (target.left_y - self.display.left_y) * t;
        self.display.right_y += (target.right_y - self.display.right_y) * t;
        self.display.ball_vel = target.ball_vel;
    }
}

/// Did a velocity component reverse between two snapshots
fn flipped(before: f32, after: f32) -> bool {
    sign(before) * sign(after) < 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::online::protocol::{BallWire, PaddleWire};

    fn snapshot(x: f32, y: f32, dx: f32, dy: f32) -> SnapshotWire {
        SnapshotWire {
            ball: BallWire { x, y, dx, dy },
            left_paddle: PaddleWire { y: 100.0 },
            right_paddle: PaddleWire { y: 200.0 },
            left_score: 0,
            right_score: 0,
            winner: None,
        }
    }

    #[test]
    fn test_first_snapshot_is_shown_directly() {
        let mut view = OnlineView::default();
        view.apply_snapshot(&snapshot(400.0, 300.0, 6.0, 1.0)).unwrap();
        view.advance_frame();
        assert_eq!(view.display().ball_pos, Vec2::new(400.0, 300.0));
        assert_eq!(view.display().left_y, 100.0);
    }

    #[test]
    fn test_positions_blend_toward_target() {
        let mut view = OnlineView::default();
        view.apply_snapshot(&snapshot(0.0, 300.0, 6.0, 1.0)).unwrap();
        view.advance_frame();

        view.apply_snapshot(&snapshot(100.0, 300.0, 6.0, 1.0)).unwrap();
        view.advance_frame();
        assert!((view.display().ball_pos.x - 75.0).abs() < 1e-4);
        view.advance_frame();
        assert!((view.display().ball_pos.x - 93.75).abs() < 1e-4);
    }

    #[test]
    fn test_bounce_bypasses_smoothing() {
        let mut view = OnlineView::default();
        view.apply_snapshot(&snapshot(700.0, 300.0, 6.0, 1.0)).unwrap();
        view.advance_frame();

        // Ball bounced off the right paddle between snapshots
        view.apply_snapshot(&snapshot(760.0, 310.0, -6.6, 1.0)).unwrap();
        view.advance_frame();
        assert_eq!(view.display().ball_pos, Vec2::new(760.0, 310.0));

        // Wall bounce flips dy
        view.apply_snapshot(&snapshot(740.0, 590.0, -6.6, -1.0)).unwrap();
        view.advance_frame();
        assert_eq!(view.display().ball_pos, Vec2::new(740.0, 590.0));
    }

    #[test]
    fn test_smoothing_disabled_copies() {
        let mut view = OnlineView::new(false, SNAPSHOT_BLEND);
        view.apply_snapshot(&snapshot(0.0, 0.0, 6.0, 1.0)).unwrap();
        view.advance_frame();
        view.apply_snapshot(&snapshot(50.0, 60.0, 6.0, 1.0)).unwrap();
        view.advance_frame();
        assert_eq!(view.display().ball_pos, Vec2::new(50.0, 60.0));
    }

    #[test]
    fn test_scores_are_copied_not_blended() {
        let mut view = OnlineView::default();
        view.apply_snapshot(&snapshot(0.0, 0.0, 6.0, 1.0)).unwrap();
        let mut next = snapshot(100.0, 0.0, 6.0, 1.0);
        next.left_score = 3;
        next.right_score = 2;
        view.apply_snapshot(&next).unwrap();
        assert_eq!(view.display().left_score, 3);
        assert_eq!(view.display().right_score, 2);
    }

    #[test]
    fn test_rejected_snapshot_leaves_view_untouched() {
        let mut view = OnlineView::default();
        view.apply_snapshot(&snapshot(400.0, 300.0, 6.0, 1.0)).unwrap();
        view.advance_frame();
        let before = *view.display();

        let bad = snapshot(f32::INFINITY, 300.0, 6.0, 1.0);
        assert!(view.apply_snapshot(&bad).is_err());
        view.advance_frame();
        assert_eq!(*view.display(), before);
        assert_eq!(view.snapshot_count(), 1);
    }

    #[test]
    fn test_game_over_and_lobby_messages() {
        let mut view = OnlineView::default();
        view.handle(ServerMessage::WaitReady { message: None }).unwrap();
        assert!(view.lobby().waiting_ready);

        view.handle(ServerMessage::PlayersReady {
            left_ready: true,
            right_ready: true,
        })
        .unwrap();
        assert!(!view.lobby().waiting_ready);

        view.handle(ServerMessage::GameOver {
            winner: Some("goku".into()),
            by: Some("points".into()),
        })
        .unwrap();
        assert!(view.is_finished());
        assert_eq!(view.winner(), Some("goku"));
    }
}
