//! Decision core: outcome classification, adjudication and shot planning.

pub mod ball;
pub mod events;
pub mod geometry;
pub mod outcome;
pub mod planner;
pub mod rules;
