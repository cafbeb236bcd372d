//! Events emitted towards the presentation layer.
//!
//! Callback/event-stream semantics: an event fires only when the underlying
//! value actually changed, so the scoreboard can redraw on receipt without
//! diffing.

use serde::{Deserialize, Serialize};

use crate::engine::rules::types::{BallOn, Phase, PlayerSlot};

/// Why points were awarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreReason {
    /// Legal pot(s) by the striker.
    LegalPot,
    /// A nominated free ball potted as the ball on.
    FreeBall,
    /// Penalty points credited to the opponent of the fouling player.
    Foul,
}

/// State-change notification for the UI/scoreboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatchEvent {
    Score {
        player: PlayerSlot,
        delta: u32,
        reason: ScoreReason,
    },
    StateChange {
        phase: Phase,
        ball_on: BallOn,
    },
    FrameEnd {
        final_scores: [u32; 2],
    },
}

impl MatchEvent {
    pub fn is_frame_end(&self) -> bool {
        matches!(self, MatchEvent::FrameEnd { .. })
    }
}
