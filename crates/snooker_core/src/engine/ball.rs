//! Ball identity and colour taxonomy.
//!
//! Every ball on the table is addressed by a [`BallId`], a tagged variant
//! rather than a free-form label. This removes the class of bugs where one
//! call site compares labels with a prefix check and another with exact
//! equality.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The six colour balls, in respot-order value sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BallColour {
    Yellow,
    Green,
    Brown,
    Blue,
    Pink,
    Black,
}

impl BallColour {
    /// Fixed order the colours are cleared in during the final sequence.
    pub const ORDER: [BallColour; 6] = [
        BallColour::Yellow,
        BallColour::Green,
        BallColour::Brown,
        BallColour::Blue,
        BallColour::Pink,
        BallColour::Black,
    ];

    /// Standard point value (Yellow=2 .. Black=7).
    pub fn value(self) -> u32 {
        match self {
            BallColour::Yellow => 2,
            BallColour::Green => 3,
            BallColour::Brown => 4,
            BallColour::Blue => 5,
            BallColour::Pink => 6,
            BallColour::Black => 7,
        }
    }
}

impl fmt::Display for BallColour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BallColour::Yellow => "Yellow",
            BallColour::Green => "Green",
            BallColour::Brown => "Brown",
            BallColour::Blue => "Blue",
            BallColour::Pink => "Pink",
            BallColour::Black => "Black",
        };
        f.write_str(name)
    }
}

/// Identity of a ball on the table.
///
/// Reds carry an index so that individual reds stay addressable after the
/// rack is broken ("Red_3"); the colours and the cue ball are singletons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BallId {
    Cue,
    Red(u8),
    Colour(BallColour),
}

impl BallId {
    /// Standard point value of this ball (Red=1, colours 2..7, Cue=0).
    pub fn value(self) -> u32 {
        match self {
            BallId::Cue => 0,
            BallId::Red(_) => 1,
            BallId::Colour(c) => c.value(),
        }
    }

    pub fn is_cue(self) -> bool {
        matches!(self, BallId::Cue)
    }

    pub fn is_red(self) -> bool {
        matches!(self, BallId::Red(_))
    }

    pub fn is_colour(self) -> bool {
        matches!(self, BallId::Colour(_))
    }

    /// The colour variant, if this is a colour ball.
    pub fn colour(self) -> Option<BallColour> {
        match self {
            BallId::Colour(c) => Some(c),
            _ => None,
        }
    }
}

impl fmt::Display for BallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BallId::Cue => f.write_str("Cue"),
            BallId::Red(idx) => write!(f, "Red_{}", idx),
            BallId::Colour(c) => write!(f, "{}", c),
        }
    }
}
