//! Shot Planner for the computer player.
//!
//! Given the ball on and a settled snapshot, produces an aim angle and a
//! power percentage. The planner never fails: when no legal target exists it
//! degrades to a randomized fallback, and when every pot line is blocked it
//! plays a safety towards the middle of the table. All randomness flows
//! through the injected RNG so plans replay exactly under a fixed seed.

use nalgebra::Point2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::PlannerConfig;
use crate::engine::ball::BallId;
use crate::engine::geometry::{angle_to, segment_blocked};
use crate::engine::rules::types::BallOn;
use crate::table::{BallState, TableGeometry, TableSnapshot};

/// What kind of shot the planner settled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotKind {
    /// A pot attempt down an unblocked line.
    Offensive,
    /// No clear pot; leave the cue ball somewhere unhelpful instead.
    Safety,
    /// No legal target at all. A correct state machine never produces this;
    /// the caller should log it as a state inconsistency.
    Fallback,
}

/// A fully specified shot for the physics layer to convert into an impulse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlannedShot {
    /// Aim angle in radians.
    pub angle: f32,
    /// Impulse strength as a percentage, 0-100.
    pub power: f32,
    /// Ball the shot is played at, for UI highlighting.
    pub target: Option<BallId>,
    pub kind: ShotKind,
}

/// One unblocked (target, pocket) line under consideration.
struct Candidate {
    target: BallId,
    aim: Point2<f32>,
    pot_distance: f32,
    power: f32,
    score: f32,
}

#[derive(Debug, Clone, Default)]
pub struct ShotPlanner {
    config: PlannerConfig,
}

impl ShotPlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// Produce a shot for the current ball on. Pure up to `rng`.
    pub fn plan<R: Rng>(
        &self,
        ball_on: BallOn,
        snapshot: &TableSnapshot,
        table: &TableGeometry,
        rng: &mut R,
    ) -> PlannedShot {
        let Some(cue) = snapshot.cue_ball() else {
            // No cue ball on the table; nothing sensible to aim.
            return self.fallback(rng);
        };

        let targets: Vec<&BallState> = snapshot
            .unpotted()
            .filter(|b| ball_on.matches(b.id))
            .collect();
        if targets.is_empty() {
            return self.fallback(rng);
        }

        let best = self.best_candidate(cue, &targets, snapshot, table, rng);
        match best {
            Some(c) => {
                debug!(target = %c.target, power = c.power, "offensive shot chosen");
                PlannedShot {
                    angle: angle_to(cue.position, c.aim),
                    power: c.power,
                    target: Some(c.target),
                    kind: ShotKind::Offensive,
                }
            }
            None => self.safety(cue.position, table, rng),
        }
    }

    /// Walk every legal (target, pocket) pair, keep the unblocked ones,
    /// score them and return the winner. Ties break on the shorter pot.
    fn best_candidate<R: Rng>(
        &self,
        cue: &BallState,
        targets: &[&BallState],
        snapshot: &TableSnapshot,
        table: &TableGeometry,
        rng: &mut R,
    ) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;

        for target in targets {
            // Balls that can obstruct either leg of this shot.
            let blockers: Vec<(Point2<f32>, f32)> = snapshot
                .unpotted()
                .filter(|b| b.id != target.id && !b.id.is_cue())
                .map(|b| (b.position, b.radius))
                .collect();

            // The cue ball has to reach the target in the first place.
            if segment_blocked(cue.position, target.position, blockers.iter().copied()) {
                continue;
            }

            for pocket in &table.pockets {
                if segment_blocked(
                    target.position,
                    pocket.position,
                    blockers.iter().copied(),
                ) {
                    continue;
                }

                let pot_distance = (pocket.position - target.position).norm();
                let approach = (target.position - cue.position).norm();
                let power = self.power_for(approach + pot_distance);
                // Prefer shots playable near the comfortable mid power;
                // jitter keeps the choice from being exploitable.
                let score = -(power - self.config.ideal_power).abs()
                    + sample(rng, 0.0, self.config.jitter);

                let candidate = Candidate {
                    target: target.id,
                    aim: target.position,
                    pot_distance,
                    power,
                    score,
                };
                best = match best {
                    None => Some(candidate),
                    Some(current)
                        if candidate.score > current.score
                            || (candidate.score == current.score
                                && candidate.pot_distance < current.pot_distance) =>
                    {
                        Some(candidate)
                    }
                    Some(current) => Some(current),
                };
            }
        }

        best
    }

    /// Monotonic clamped linear map from shot distance to power.
    fn power_for(&self, distance: f32) -> f32 {
        let cfg = &self.config;
        let span = (cfg.distance_hard - cfg.distance_soft).max(f32::EPSILON);
        let t = ((distance - cfg.distance_soft) / span).clamp(0.0, 1.0);
        cfg.power_soft + t * (cfg.power_hard - cfg.power_soft)
    }

    /// Tap the cue ball towards a randomized point near the table centre.
    fn safety<R: Rng>(
        &self,
        cue: Point2<f32>,
        table: &TableGeometry,
        rng: &mut R,
    ) -> PlannedShot {
        let offset = self.config.safety_offset;
        let aim = Point2::new(
            table.centre().x + sample(rng, -offset, offset),
            table.centre().y + sample(rng, -offset, offset),
        );
        debug!("no clear pot line, playing safety");
        PlannedShot {
            angle: angle_to(cue, aim),
            power: sample(rng, self.config.safety_power_min, self.config.safety_power_max),
            target: None,
            kind: ShotKind::Safety,
        }
    }

    fn fallback<R: Rng>(&self, rng: &mut R) -> PlannedShot {
        PlannedShot {
            angle: rng.gen_range(0.0..std::f32::consts::TAU),
            power: sample(
                rng,
                self.config.fallback_power_min,
                self.config.fallback_power_max,
            ),
            target: None,
            kind: ShotKind::Fallback,
        }
    }
}

/// Uniform draw that tolerates degenerate config ranges: a collapsed or
/// inverted range yields `min` instead of panicking.
fn sample<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}
