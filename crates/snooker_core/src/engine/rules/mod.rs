//! Match adjudication: the state machine and its vocabulary.

pub mod machine;
pub mod types;

pub use machine::MatchState;
pub use types::{BallOn, Foul, FoulReason, Phase, PlayerSlot, ShotResolution};
