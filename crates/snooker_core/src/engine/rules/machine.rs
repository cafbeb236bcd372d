//! Match State Machine.
//!
//! The sole authority on legality, scoring and turn progression. Consumes a
//! [`ShotOutcome`] plus the settled [`TableSnapshot`] and produces a
//! [`ShotResolution`]; nothing else in the crate awards points or switches
//! the striker.
//!
//! Phase graph: `RedRequired -> ColourRequired -> RedRequired -> ... ->
//! FinalColours -> FrameEnd`. `FinalColours` is only ever entered with zero
//! reds remaining, and `FrameEnd` is terminal: further `resolve` calls
//! return an error without touching state.

use tracing::debug;

use crate::config::RulesConfig;
use crate::engine::ball::BallId;
use crate::engine::events::{MatchEvent, ScoreReason};
use crate::engine::geometry::ball_visible;
use crate::engine::outcome::ShotOutcome;
use crate::engine::rules::types::{BallOn, Foul, FoulReason, Phase, PlayerSlot, ShotResolution};
use crate::error::{CoreError, Result};
use crate::table::{TableGeometry, TableOp, TableSnapshot};

/// Live adjudication state for one frame.
#[derive(Debug, Clone)]
pub struct MatchState {
    config: RulesConfig,
    phase: Phase,
    ball_on: BallOn,
    reds_remaining: u8,
    next_colour_index: usize,
    free_ball_active: bool,
    striker: PlayerSlot,
}

impl MatchState {
    pub fn new(config: RulesConfig) -> Self {
        let reds = config.initial_reds;
        Self {
            config,
            phase: Phase::RedRequired,
            ball_on: BallOn::Red,
            reds_remaining: reds,
            next_colour_index: 0,
            free_ball_active: false,
            striker: PlayerSlot::ONE,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn ball_on(&self) -> BallOn {
        self.ball_on
    }

    pub fn reds_remaining(&self) -> u8 {
        self.reds_remaining
    }

    pub fn free_ball_active(&self) -> bool {
        self.free_ball_active
    }

    pub fn striker(&self) -> PlayerSlot {
        self.striker
    }

    pub fn frame_over(&self) -> bool {
        self.phase == Phase::FrameEnd
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    /// Adjudicate one settled shot.
    ///
    /// State is mutated only after every precondition has passed; on `Err`
    /// the machine is untouched.
    pub fn resolve(
        &mut self,
        outcome: &ShotOutcome,
        snapshot: &TableSnapshot,
        table: &TableGeometry,
    ) -> Result<ShotResolution> {
        if self.phase == Phase::FrameEnd {
            return Err(CoreError::FrameOver);
        }
        if !snapshot.all_at_rest {
            return Err(CoreError::BallsInMotion);
        }
        self.check_outcome_consistency(outcome, snapshot)?;

        if let Some((reason, offending)) = self.detect_foul(outcome, snapshot) {
            return Ok(self.resolve_foul(reason, offending, outcome, snapshot, table));
        }

        if outcome.potted.is_empty() {
            return Ok(self.resolve_miss());
        }

        Ok(self.resolve_legal_pots(outcome, table))
    }

    // ------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------

    fn check_outcome_consistency(
        &self,
        outcome: &ShotOutcome,
        snapshot: &TableSnapshot,
    ) -> Result<()> {
        let cue_listed = outcome.potted.iter().any(|id| id.is_cue());
        if cue_listed != outcome.cue_ball_potted {
            return Err(CoreError::InconsistentOutcome(
                "cue_ball_potted flag disagrees with the potted set".into(),
            ));
        }
        if outcome.first_contact == Some(BallId::Cue) {
            return Err(CoreError::InconsistentOutcome(
                "cue ball reported as its own first contact".into(),
            ));
        }
        if !outcome.potted.is_empty() && outcome.first_contact.is_none() {
            return Err(CoreError::InconsistentOutcome(
                "balls potted on a shot with no contact".into(),
            ));
        }
        for &id in &outcome.potted {
            let state = snapshot
                .ball(id)
                .ok_or_else(|| CoreError::UnknownBall(id.to_string()))?;
            if !state.potted {
                return Err(CoreError::InconsistentOutcome(format!(
                    "{} reported potted but the snapshot shows it on the table",
                    id
                )));
            }
        }
        if outcome.reds_potted() > usize::from(self.reds_remaining) {
            return Err(CoreError::InconsistentOutcome(
                "more reds potted than remain in the frame".into(),
            ));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Foul detection
    // ------------------------------------------------------------------

    /// First contact or a pot counts as the ball on, either directly or as
    /// a free ball of no greater value.
    fn counts_as_ball_on(&self, id: BallId) -> bool {
        if id.is_cue() {
            return false;
        }
        if self.ball_on.matches(id) {
            return true;
        }
        self.free_ball_active && self.config.ball_values.value_of(id) <= self.ball_on.value(&self.config)
    }

    /// Returns the foul reason and the value of the offending ball, if this
    /// shot was a foul. Reasons are ranked: a potted cue ball outranks a
    /// wrong first contact, which outranks a wrong pot.
    fn detect_foul(
        &self,
        outcome: &ShotOutcome,
        snapshot: &TableSnapshot,
    ) -> Option<(FoulReason, u32)> {
        let mut reason: Option<FoulReason> = None;
        let mut offending = 0u32;

        if outcome.cue_ball_potted {
            reason = Some(FoulReason::CueBallPotted);
        }

        match outcome.first_contact {
            Some(first) => {
                if !self.counts_as_ball_on(first) {
                    reason.get_or_insert(FoulReason::WrongBallStruck(first));
                    offending = offending.max(self.config.ball_values.value_of(first));
                }
            }
            None => {
                if self.targets_exist(snapshot) && !outcome.cue_ball_potted {
                    reason.get_or_insert(FoulReason::NoContact);
                }
            }
        }

        for &id in &outcome.potted {
            if !id.is_cue() && !self.counts_as_ball_on(id) {
                reason.get_or_insert(FoulReason::WrongBallPotted(id));
                offending = offending.max(self.config.ball_values.value_of(id));
            }
        }

        reason.map(|r| (r, offending))
    }

    fn targets_exist(&self, snapshot: &TableSnapshot) -> bool {
        snapshot.unpotted().any(|b| self.ball_on.matches(b.id))
    }

    fn foul_penalty(&self, offending: u32) -> u32 {
        use crate::engine::ball::BallColour;
        if self.ball_on == BallOn::Colour(BallColour::Black) {
            return self.config.black_foul_value;
        }
        self.config
            .foul_minimum
            .max(self.ball_on.value(&self.config))
            .max(offending)
    }

    // ------------------------------------------------------------------
    // Resolution branches
    // ------------------------------------------------------------------

    fn resolve_foul(
        &mut self,
        reason: FoulReason,
        offending: u32,
        outcome: &ShotOutcome,
        snapshot: &TableSnapshot,
        table: &TableGeometry,
    ) -> ShotResolution {
        let penalty = self.foul_penalty(offending);
        let offender = self.striker;
        let opponent = offender.opponent();
        debug!(?reason, penalty, "foul resolved");

        let mut table_ops = Vec::new();
        for &id in &outcome.potted {
            match id {
                BallId::Cue => table_ops.push(TableOp::CueBallInHand),
                // Reds never return to the table, fouled off or not.
                BallId::Red(_) => {
                    table_ops.push(TableOp::Remove { id });
                    self.reds_remaining = self.reds_remaining.saturating_sub(1);
                }
                BallId::Colour(c) => table_ops.push(TableOp::Respot {
                    id,
                    position: table.spot(c),
                }),
            }
        }

        let mut events = vec![MatchEvent::Score {
            player: opponent,
            delta: penalty,
            reason: ScoreReason::Foul,
        }];

        // A foul that takes the last red off the table would leave an
        // unsatisfiable ball on; the frame moves into the final sequence.
        if self.phase == Phase::RedRequired && self.reds_remaining == 0 {
            self.enter_final_colours();
            events.push(MatchEvent::StateChange {
                phase: self.phase,
                ball_on: self.ball_on,
            });
        }

        // The incoming player may have been left snookered on the ball on
        // by the foul; with the cue ball in hand there is nothing to sight
        // from and no free ball arises.
        self.free_ball_active = if outcome.cue_ball_potted {
            false
        } else {
            self.free_ball_situation(snapshot)
        };
        self.striker = opponent;

        let mut score_delta = [0u32; 2];
        score_delta[opponent.index()] = penalty;

        ShotResolution {
            score_delta,
            events,
            table_ops,
            next_ball_on: self.ball_on,
            turn_continues: false,
            foul: Some(Foul {
                reason,
                penalty,
                committed_by: offender,
            }),
            frame_over: false,
        }
    }

    fn resolve_miss(&mut self) -> ShotResolution {
        debug!(striker = ?self.striker, "miss, turn passes");
        // An unused free ball lapses with the turn.
        self.free_ball_active = false;
        self.striker = self.striker.opponent();
        ShotResolution {
            score_delta: [0, 0],
            events: Vec::new(),
            table_ops: Vec::new(),
            next_ball_on: self.ball_on,
            turn_continues: false,
            foul: None,
            frame_over: false,
        }
    }

    fn resolve_legal_pots(&mut self, outcome: &ShotOutcome, table: &TableGeometry) -> ShotResolution {
        let striker = self.striker;
        let mut total = 0u32;
        let mut free_ball_used = false;
        let mut table_ops = Vec::new();

        for &id in &outcome.potted {
            let credited = if self.ball_on.matches(id) {
                self.config.ball_values.value_of(id)
            } else {
                // Free ball: scores as though it were the real ball on.
                free_ball_used = true;
                self.ball_on.value(&self.config)
            };
            total += credited;

            match id {
                BallId::Cue => unreachable!("cue pot is always a foul"),
                BallId::Red(_) => {
                    self.reds_remaining -= 1;
                    table_ops.push(TableOp::Remove { id });
                }
                BallId::Colour(c) => {
                    if self.phase == Phase::FinalColours {
                        table_ops.push(TableOp::Remove { id });
                    } else {
                        // Never remove a colour from play while reds remain.
                        table_ops.push(TableOp::Respot {
                            id,
                            position: table.spot(c),
                        });
                    }
                }
            }
        }

        self.free_ball_active = false;
        let before = (self.phase, self.ball_on);
        let frame_over = self.advance_phase();
        let changed = before != (self.phase, self.ball_on);

        debug!(striker = ?striker, total, phase = ?self.phase, "legal pot scored");

        let mut events = vec![MatchEvent::Score {
            player: striker,
            delta: total,
            reason: if free_ball_used {
                ScoreReason::FreeBall
            } else {
                ScoreReason::LegalPot
            },
        }];
        if changed {
            events.push(MatchEvent::StateChange {
                phase: self.phase,
                ball_on: self.ball_on,
            });
        }

        let mut score_delta = [0u32; 2];
        score_delta[striker.index()] = total;

        ShotResolution {
            score_delta,
            events,
            table_ops,
            next_ball_on: self.ball_on,
            turn_continues: !frame_over,
            foul: None,
            frame_over,
        }
    }

    /// Phase transition, applied exactly once after a legally scored shot.
    /// Returns true when the frame just ended.
    fn advance_phase(&mut self) -> bool {
        match self.phase {
            Phase::RedRequired => {
                // Every legal pot in this phase counts as a red (a free
                // ball substitutes for one).
                if self.reds_remaining == 0 {
                    self.enter_final_colours();
                } else {
                    self.phase = Phase::ColourRequired;
                    self.ball_on = BallOn::AnyColour;
                }
                false
            }
            Phase::ColourRequired => {
                if self.reds_remaining > 0 {
                    self.phase = Phase::RedRequired;
                    self.ball_on = BallOn::Red;
                } else {
                    self.enter_final_colours();
                }
                false
            }
            Phase::FinalColours => {
                self.next_colour_index += 1;
                if self.next_colour_index >= self.config.colour_order.len() {
                    self.phase = Phase::FrameEnd;
                    self.ball_on = BallOn::None;
                    true
                } else {
                    self.ball_on = BallOn::Colour(self.config.colour_order[self.next_colour_index]);
                    false
                }
            }
            Phase::FrameEnd => unreachable!("resolve rejects shots after frame end"),
        }
    }

    fn enter_final_colours(&mut self) {
        self.phase = Phase::FinalColours;
        self.next_colour_index = 0;
        self.ball_on = BallOn::Colour(self.config.colour_order[0]);
    }

    // ------------------------------------------------------------------
    // Free ball
    // ------------------------------------------------------------------

    /// Geometric snooker check: the incoming player has a free ball iff the
    /// cue ball cannot see any surface point of any ball on.
    fn free_ball_situation(&self, snapshot: &TableSnapshot) -> bool {
        let Some(cue) = snapshot.cue_ball() else {
            return false;
        };
        let targets: Vec<_> = snapshot
            .unpotted()
            .filter(|b| self.ball_on.matches(b.id))
            .collect();
        if targets.is_empty() {
            return false;
        }
        targets.iter().all(|target| {
            let blockers: Vec<_> = snapshot
                .unpotted()
                .filter(|b| b.id != target.id && !b.id.is_cue())
                .map(|b| (b.position, b.radius))
                .collect();
            !ball_visible(
                cue.position,
                target.position,
                target.radius,
                blockers.iter().copied(),
            )
        })
    }
}
