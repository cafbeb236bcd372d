use thiserror::Error;

/// Failures of the adjudication/planning core.
///
/// Fouls are not errors; they are a normal branch of play with point
/// consequences. These variants cover integration mistakes: the caller
/// violated a precondition and no game state was mutated.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("frame is over; start a new frame before resolving shots")]
    FrameOver,

    #[error("balls still in motion; shot resolution requires a settled table")]
    BallsInMotion,

    #[error("geometry snapshot unavailable or stale")]
    StaleSnapshot,

    #[error("shot outcome inconsistent with table snapshot: {0}")]
    InconsistentOutcome(String),

    #[error("unknown ball in shot outcome: {0}")]
    UnknownBall(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
