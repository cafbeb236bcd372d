//! Match session aggregate.
//!
//! One owned value holding everything mutable about a match: both players'
//! scores and breaks, the rules machine, the planner and its RNG. The game
//! loop passes it explicitly between the physics boundary, the AI and the
//! presentation layer; there is no ambient global state anywhere in the
//! crate.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::{PlannerConfig, RulesConfig};
use crate::engine::events::MatchEvent;
use crate::engine::outcome::ShotOutcome;
use crate::engine::planner::{PlannedShot, ShotKind, ShotPlanner};
use crate::engine::rules::types::{BallOn, Phase, PlayerSlot, ShotResolution};
use crate::engine::rules::MatchState;
use crate::error::Result;
use crate::table::{TableGeometry, TableSnapshot};

/// One competitor's scoreboard entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub score: u32,
    /// Points in the current contiguous scoring run; resets when the turn
    /// changes hands.
    pub current_break: u32,
}

impl Player {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            score: 0,
            current_break: 0,
        }
    }
}

/// A full frame: players, adjudication state, planner.
///
/// Dropping and reconstructing the session (plus re-racking the table) is
/// the reset mechanism; there is no partial-reset path.
#[derive(Debug, Clone)]
pub struct Session {
    geometry: TableGeometry,
    players: [Player; 2],
    machine: MatchState,
    planner: ShotPlanner,
    rng: ChaCha8Rng,
}

impl Session {
    pub fn new(
        player_one: impl Into<String>,
        player_two: impl Into<String>,
        rules: RulesConfig,
        planner: PlannerConfig,
        geometry: TableGeometry,
        seed: u64,
    ) -> Self {
        Self {
            geometry,
            players: [Player::new(player_one), Player::new(player_two)],
            machine: MatchState::new(rules),
            planner: ShotPlanner::new(planner),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Standard table, default rules, named seats.
    pub fn standard(player_one: impl Into<String>, player_two: impl Into<String>, seed: u64) -> Self {
        Self::new(
            player_one,
            player_two,
            RulesConfig::default(),
            PlannerConfig::default(),
            TableGeometry::standard(),
            seed,
        )
    }

    pub fn geometry(&self) -> &TableGeometry {
        &self.geometry
    }

    pub fn player(&self, slot: PlayerSlot) -> &Player {
        &self.players[slot.index()]
    }

    pub fn striker_slot(&self) -> PlayerSlot {
        self.machine.striker()
    }

    pub fn striker(&self) -> &Player {
        self.player(self.machine.striker())
    }

    pub fn phase(&self) -> Phase {
        self.machine.phase()
    }

    pub fn ball_on(&self) -> BallOn {
        self.machine.ball_on()
    }

    pub fn frame_over(&self) -> bool {
        self.machine.frame_over()
    }

    pub fn scores(&self) -> [u32; 2] {
        [self.players[0].score, self.players[1].score]
    }

    /// Run one settled shot through the adjudicator and apply its verdict
    /// to the scoreboard. Appends the frame-end event (with final totals)
    /// when the shot finished the frame.
    pub fn resolve_shot(
        &mut self,
        outcome: &ShotOutcome,
        snapshot: &TableSnapshot,
    ) -> Result<ShotResolution> {
        let striker_before = self.machine.striker();
        let mut resolution = self.machine.resolve(outcome, snapshot, &self.geometry)?;

        for slot in [PlayerSlot::ONE, PlayerSlot::TWO] {
            self.players[slot.index()].score += resolution.score_delta[slot.index()];
        }
        self.players[striker_before.index()].current_break +=
            resolution.score_delta[striker_before.index()];

        // The break resets only when the table actually changes hands; the
        // pot that ends the frame keeps the finishing break intact.
        let striker_after = self.machine.striker();
        if striker_after != striker_before {
            self.players[striker_after.index()].current_break = 0;
        }
        if resolution.frame_over {
            resolution.events.push(MatchEvent::FrameEnd {
                final_scores: self.scores(),
            });
        }

        Ok(resolution)
    }

    /// Plan the computer player's next shot from the current snapshot.
    pub fn plan_shot(&mut self, snapshot: &TableSnapshot) -> PlannedShot {
        let shot = self
            .planner
            .plan(self.machine.ball_on(), snapshot, &self.geometry, &mut self.rng);
        if shot.kind == ShotKind::Fallback {
            // A correct state machine always leaves a legal target; reaching
            // this means the table and the rules state have drifted apart.
            warn!(ball_on = %self.machine.ball_on(), "planner found no legal target");
        }
        shot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ball::{BallColour, BallId};
    use crate::engine::outcome::classify;
    use crate::table::{BallState, TableOp};
    use nalgebra::Point2;

    fn snapshot_with(session: &Session, reds: u8, potted: &[BallId]) -> TableSnapshot {
        let table = session.geometry();
        let r = table.ball_radius;
        let mut balls = vec![BallState::new(BallId::Cue, table.cue_spot(), r)];
        for i in 0..reds {
            balls.push(BallState::new(
                BallId::Red(i),
                Point2::new(2.6 + 0.06 * f32::from(i), 0.4),
                r,
            ));
        }
        for colour in BallColour::ORDER {
            balls.push(BallState::new(BallId::Colour(colour), table.spot(colour), r));
        }
        for ball in &mut balls {
            if potted.contains(&ball.id) {
                ball.potted = true;
            }
        }
        TableSnapshot::new(balls, true)
    }

    #[test]
    fn test_scores_and_break_accumulate() {
        let mut session = Session::standard("Player", "AI", 1);
        let snap = snapshot_with(&session, 15, &[BallId::Red(0)]);
        session
            .resolve_shot(&classify(&[BallId::Red(0)], Some(BallId::Red(0))), &snap)
            .unwrap();
        assert_eq!(session.player(PlayerSlot::ONE).score, 1);
        assert_eq!(session.player(PlayerSlot::ONE).current_break, 1);

        let blue = BallId::Colour(BallColour::Blue);
        let snap = snapshot_with(&session, 14, &[blue]);
        session.resolve_shot(&classify(&[blue], Some(blue)), &snap).unwrap();
        assert_eq!(session.player(PlayerSlot::ONE).score, 6);
        assert_eq!(session.player(PlayerSlot::ONE).current_break, 6);
        assert_eq!(session.striker_slot(), PlayerSlot::ONE);
    }

    #[test]
    fn test_foul_credits_opponent_and_resets_break() {
        let mut session = Session::standard("Player", "AI", 1);
        // Build a small break first.
        let snap = snapshot_with(&session, 15, &[BallId::Red(0)]);
        session
            .resolve_shot(&classify(&[BallId::Red(0)], Some(BallId::Red(0))), &snap)
            .unwrap();

        // Then foul: strike a red while a colour is on.
        let snap = snapshot_with(&session, 14, &[]);
        let res = session
            .resolve_shot(&classify(&[], Some(BallId::Red(1))), &snap)
            .unwrap();
        assert!(res.foul.is_some());
        assert_eq!(session.player(PlayerSlot::TWO).score, 4);
        assert_eq!(session.striker_slot(), PlayerSlot::TWO);
        // The incoming player's break starts clean.
        assert_eq!(session.player(PlayerSlot::TWO).current_break, 0);
    }

    #[test]
    fn test_turn_change_resets_incoming_break() {
        let mut session = Session::standard("Player", "AI", 1);
        let snap = snapshot_with(&session, 15, &[]);
        session
            .resolve_shot(&classify(&[], Some(BallId::Red(0))), &snap)
            .unwrap();
        assert_eq!(session.striker_slot(), PlayerSlot::TWO);
        assert_eq!(session.striker().current_break, 0);
    }

    #[test]
    fn test_frame_end_event_carries_final_scores() {
        let mut session = Session::standard("Player", "AI", 1);
        // Jump the frame to the black.
        session.machine = machine_on_black();
        let black = BallId::Colour(BallColour::Black);
        let table = session.geometry().clone();
        let r = table.ball_radius;
        let mut balls = vec![
            BallState::new(BallId::Cue, table.cue_spot(), r),
            BallState::new(black, table.spot(BallColour::Black), r),
        ];
        balls[1].potted = true;
        let snap = TableSnapshot::new(balls, true);

        let res = session.resolve_shot(&classify(&[black], Some(black)), &snap).unwrap();
        assert!(res.frame_over);
        assert!(session.frame_over());
        let end = res.events.iter().find(|e| e.is_frame_end()).unwrap();
        assert_eq!(
            *end,
            MatchEvent::FrameEnd {
                final_scores: [7, 0]
            }
        );
        // The frame-ending pot does not pass the turn, so the finishing
        // player's break survives into the final scoreboard.
        assert_eq!(session.player(PlayerSlot::ONE).current_break, 7);
    }

    /// Drive a fresh machine to "black on" through resolve calls.
    fn machine_on_black() -> MatchState {
        let table = TableGeometry::standard();
        let r = table.ball_radius;
        let make_snap = |potted: BallId, remaining: &[BallId]| {
            let mut balls = vec![BallState::new(BallId::Cue, table.cue_spot(), r)];
            for &id in remaining {
                balls.push(BallState::new(id, Point2::new(2.0, 0.9), r));
            }
            let mut potted_state = BallState::new(potted, Point2::new(2.0, 0.9), r);
            potted_state.potted = true;
            balls.push(potted_state);
            TableSnapshot::new(balls, true)
        };

        // Single red frame keeps the scripted clearance short.
        let mut cfg = RulesConfig::default();
        cfg.initial_reds = 1;
        let mut m = MatchState::new(cfg);

        let red = BallId::Red(0);
        let colours: Vec<BallId> = BallColour::ORDER.iter().map(|&c| BallId::Colour(c)).collect();
        m.resolve(&classify(&[red], Some(red)), &make_snap(red, &colours), &table)
            .unwrap();
        for i in 0..5 {
            let id = colours[i];
            m.resolve(&classify(&[id], Some(id)), &make_snap(id, &colours[i + 1..]), &table)
                .unwrap();
        }
        m
    }

    /// Whole-frame script over the public surface: a short two-red frame,
    /// break, respot, turn change and clearance to the black.
    #[test]
    fn test_full_frame_scripted() {
        let mut rules = RulesConfig::default();
        rules.initial_reds = 2;
        let mut session = Session::new(
            "Player",
            "AI",
            rules,
            PlannerConfig::default(),
            TableGeometry::standard(),
            7,
        );

        let mut potted: Vec<BallId> = Vec::new();
        let shoot = |session: &mut Session, potted: &mut Vec<BallId>, ball: Option<BallId>, contact: BallId| {
            if let Some(b) = ball {
                potted.push(b);
            }
            let snap = snapshot_with(session, 2, potted);
            let outcome = match ball {
                Some(b) => classify(&[b], Some(b)),
                None => classify(&[], Some(contact)),
            };
            session.resolve_shot(&outcome, &snap).unwrap()
        };

        let green = BallId::Colour(BallColour::Green);
        // Player one: red, green (respotted), then a miss.
        shoot(&mut session, &mut potted, Some(BallId::Red(0)), BallId::Red(0));
        let res = shoot(&mut session, &mut potted, Some(green), green);
        assert!(res.table_ops.iter().any(|op| matches!(op, TableOp::Respot { id, .. } if *id == green)));
        potted.retain(|&id| id != green);
        shoot(&mut session, &mut potted, None, BallId::Red(1));
        assert_eq!(session.striker_slot(), PlayerSlot::TWO);
        assert_eq!(session.player(PlayerSlot::ONE).score, 4);

        // Player two: last red, then the colours in order.
        shoot(&mut session, &mut potted, Some(BallId::Red(1)), BallId::Red(1));
        assert_eq!(session.phase(), Phase::FinalColours);
        for colour in BallColour::ORDER {
            let id = BallId::Colour(colour);
            let res = shoot(&mut session, &mut potted, Some(id), id);
            if colour == BallColour::Black {
                assert!(res.frame_over);
                assert!(res.events.iter().any(|e| e.is_frame_end()));
            }
        }

        assert!(session.frame_over());
        assert_eq!(session.scores(), [4, 28]);
        assert_eq!(session.player(PlayerSlot::TWO).current_break, 28);
    }

    #[test]
    fn test_plan_shot_uses_session_rng_deterministically() {
        let mut a = Session::standard("Player", "AI", 99);
        let mut b = Session::standard("Player", "AI", 99);
        let snap = snapshot_with(&a, 15, &[]);
        assert_eq!(a.plan_shot(&snap), b.plan_shot(&snap));
    }
}
