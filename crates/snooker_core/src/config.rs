//! Rule and planner tunables.
//!
//! Everything the rules engine treats as a constant of the game lives here
//! rather than inline in the logic: ball values, the foul floor, the fixed
//! colour clearing order, the number of reds in the rack. Both configs are
//! plain serde structs so a frontend can ship overrides as JSON.

use serde::{Deserialize, Serialize};

use crate::engine::ball::{BallColour, BallId};

/// Point value table for every ball category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallValues {
    pub red: u32,
    pub yellow: u32,
    pub green: u32,
    pub brown: u32,
    pub blue: u32,
    pub pink: u32,
    pub black: u32,
    pub cue: u32,
}

impl Default for BallValues {
    fn default() -> Self {
        Self {
            red: 1,
            yellow: 2,
            green: 3,
            brown: 4,
            blue: 5,
            pink: 6,
            black: 7,
            cue: 0,
        }
    }
}

impl BallValues {
    pub fn colour_value(&self, colour: BallColour) -> u32 {
        match colour {
            BallColour::Yellow => self.yellow,
            BallColour::Green => self.green,
            BallColour::Brown => self.brown,
            BallColour::Blue => self.blue,
            BallColour::Pink => self.pink,
            BallColour::Black => self.black,
        }
    }

    pub fn value_of(&self, id: BallId) -> u32 {
        match id {
            BallId::Cue => self.cue,
            BallId::Red(_) => self.red,
            BallId::Colour(c) => self.colour_value(c),
        }
    }
}

/// Adjudication constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    pub ball_values: BallValues,
    /// Minimum points awarded to the opponent for any foul.
    pub foul_minimum: u32,
    /// Fixed foul value whenever the black is the ball on.
    pub black_foul_value: u32,
    /// Colour clearing order for the final sequence.
    pub colour_order: [BallColour; 6],
    /// Reds racked at the start of a frame.
    pub initial_reds: u8,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            ball_values: BallValues::default(),
            foul_minimum: 4,
            black_foul_value: 7,
            colour_order: BallColour::ORDER,
            initial_reds: 15,
        }
    }
}

/// Shot planner tunables.
///
/// Power values are percentages (0-100); distances are in table metres.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Power applied to the shortest mapped shot.
    pub power_soft: f32,
    /// Power ceiling; longer shots clamp here.
    pub power_hard: f32,
    /// Shot distance mapped to `power_soft`.
    pub distance_soft: f32,
    /// Shot distance mapped to `power_hard`.
    pub distance_hard: f32,
    /// Power the candidate scoring treats as ideal.
    pub ideal_power: f32,
    /// Upper bound of the random jitter added to each candidate score.
    pub jitter: f32,
    /// Power range for the randomized fallback shot.
    pub fallback_power_min: f32,
    pub fallback_power_max: f32,
    /// Power range for the safety shot.
    pub safety_power_min: f32,
    pub safety_power_max: f32,
    /// Maximum random offset (metres, per axis) applied to the safety aim point.
    pub safety_offset: f32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            power_soft: 30.0,
            power_hard: 90.0,
            distance_soft: 0.2,
            distance_hard: 3.0,
            ideal_power: 55.0,
            jitter: 6.0,
            fallback_power_min: 10.0,
            fallback_power_max: 50.0,
            safety_power_min: 20.0,
            safety_power_max: 40.0,
            safety_offset: 0.35,
        }
    }
}
