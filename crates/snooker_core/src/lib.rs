//! # snooker_core - Deterministic Snooker Frame Adjudication and Planning
//!
//! This library adjudicates snooker frames and plans shots for the computer
//! player. It sits behind a physics engine: the physics side reports what a
//! shot did (a settled table snapshot plus the classified outcome) and this
//! crate answers with scores, fouls, respots and the next ball on.
//!
//! ## Features
//! - 100% deterministic (same seed + same snapshots = same frame)
//! - Full red/colour/final-colours phase progression with free-ball handling
//! - Geometry-driven shot planner with offensive, safety and fallback tiers
//! - Serde-friendly configs and events for easy integration

pub mod config;
pub mod engine;
pub mod error;
pub mod session;
pub mod table;

pub use config::{BallValues, PlannerConfig, RulesConfig};
pub use engine::ball::{BallColour, BallId};
pub use engine::events::{MatchEvent, ScoreReason};
pub use engine::geometry::trajectory_preview;
pub use engine::outcome::{classify, ShotOutcome};
pub use engine::planner::{PlannedShot, ShotKind, ShotPlanner};
pub use engine::rules::types::{BallOn, Foul, FoulReason, Phase, PlayerSlot, ShotResolution};
pub use engine::rules::MatchState;
pub use error::{CoreError, Result};
pub use session::{Player, Session};
pub use table::rack::RackLayout;
pub use table::{
    BallState, GeometryProvider, TableGeometry, TableOp, TableSnapshot,
};
