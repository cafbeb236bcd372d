//! Adjudication vocabulary: phases, ball-on designation, fouls, resolution.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::RulesConfig;
use crate::engine::ball::{BallColour, BallId};
use crate::engine::events::MatchEvent;
use crate::table::TableOp;

/// One of the two seats at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PlayerSlot(pub bool);

impl PlayerSlot {
    pub const ONE: Self = Self(false);
    pub const TWO: Self = Self(true);

    pub fn opponent(self) -> Self {
        Self(!self.0)
    }

    /// Index into per-player arrays (`[u32; 2]` score tables and the like).
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Where the frame is in the legal sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// A red must be struck first.
    RedRequired,
    /// A red just dropped; any colour is on.
    ColourRequired,
    /// No reds remain; colours go down in fixed order.
    FinalColours,
    /// Terminal. No further shots are accepted.
    FrameEnd,
}

/// The ball(s) the striker is legally permitted to hit first and pot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallOn {
    /// Any red on the table.
    Red,
    /// Any of the six colours.
    AnyColour,
    /// Exactly this colour.
    Colour(BallColour),
    /// Nothing is on (frame over).
    None,
}

impl BallOn {
    /// Whether `id` satisfies this designation.
    pub fn matches(self, id: BallId) -> bool {
        match self {
            BallOn::Red => id.is_red(),
            BallOn::AnyColour => id.is_colour(),
            BallOn::Colour(c) => id == BallId::Colour(c),
            BallOn::None => false,
        }
    }

    /// Point value of the ball on for foul arithmetic. `AnyColour` has no
    /// single ball to map to and contributes nothing beyond the foul floor.
    pub fn value(self, config: &RulesConfig) -> u32 {
        match self {
            BallOn::Red => config.ball_values.red,
            BallOn::AnyColour => 0,
            BallOn::Colour(c) => config.ball_values.colour_value(c),
            BallOn::None => 0,
        }
    }
}

impl fmt::Display for BallOn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BallOn::Red => f.write_str("Red"),
            BallOn::AnyColour => f.write_str("AnyColour"),
            BallOn::Colour(c) => write!(f, "{}", c),
            BallOn::None => f.write_str("None"),
        }
    }
}

/// What made a shot a foul.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FoulReason {
    CueBallPotted,
    /// First contact was not a ball on.
    WrongBallStruck(BallId),
    /// Nothing was contacted while legal targets existed.
    NoContact,
    /// A ball that was not on dropped.
    WrongBallPotted(BallId),
}

/// A foul with its adjudicated penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Foul {
    pub reason: FoulReason,
    pub penalty: u32,
    pub committed_by: PlayerSlot,
}

/// Everything the rules machine decided about one shot.
///
/// Score deltas are indexed by [`PlayerSlot::index`]. The caller applies the
/// deltas to its player records, forwards `events` to the presentation layer
/// and `table_ops` to the physics layer.
#[derive(Debug, Clone)]
pub struct ShotResolution {
    pub score_delta: [u32; 2],
    pub events: Vec<MatchEvent>,
    pub table_ops: Vec<TableOp>,
    pub next_ball_on: BallOn,
    /// Striker keeps the table for the next shot.
    pub turn_continues: bool,
    pub foul: Option<Foul>,
    /// The black went down legally as the last ball; the frame is over.
    pub frame_over: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_slot_opponent() {
        assert_eq!(PlayerSlot::ONE.opponent(), PlayerSlot::TWO);
        assert_eq!(PlayerSlot::TWO.opponent(), PlayerSlot::ONE);
        assert_eq!(PlayerSlot::ONE.index(), 0);
        assert_eq!(PlayerSlot::TWO.index(), 1);
    }

    #[test]
    fn test_ball_on_matches() {
        assert!(BallOn::Red.matches(BallId::Red(9)));
        assert!(!BallOn::Red.matches(BallId::Colour(BallColour::Blue)));
        assert!(BallOn::AnyColour.matches(BallId::Colour(BallColour::Green)));
        assert!(!BallOn::AnyColour.matches(BallId::Red(0)));
        assert!(BallOn::Colour(BallColour::Pink).matches(BallId::Colour(BallColour::Pink)));
        assert!(!BallOn::Colour(BallColour::Pink).matches(BallId::Colour(BallColour::Black)));
        assert!(!BallOn::None.matches(BallId::Red(0)));
        // The cue ball is never on.
        assert!(!BallOn::AnyColour.matches(BallId::Cue));
    }

    #[test]
    fn test_ball_on_value() {
        let cfg = RulesConfig::default();
        assert_eq!(BallOn::Red.value(&cfg), 1);
        assert_eq!(BallOn::Colour(BallColour::Black).value(&cfg), 7);
        assert_eq!(BallOn::AnyColour.value(&cfg), 0);
    }
}
