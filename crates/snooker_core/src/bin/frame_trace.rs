// Scripted frame trace: drives a short frame through the planner and the
// rules machine with fake "always pots what it aimed at" physics behind the
// geometry-provider boundary.
// Run with: cargo run --bin frame_trace

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use snooker_core::table::rack;
use snooker_core::{
    classify, BallId, BallState, CoreError, GeometryProvider, MatchEvent, PlannerConfig,
    PlayerSlot, RackLayout, Result, RulesConfig, Session, ShotKind, TableGeometry, TableOp,
    TableSnapshot,
};

const SEED: u64 = 20_240_601;
const SHOT_CAP: usize = 60;

/// Stand-in for the rigid-body engine: holds the authoritative ball list
/// and serves settled snapshots across the provider boundary.
struct ScriptedPhysics {
    balls: Vec<BallState>,
    settled: bool,
}

impl ScriptedPhysics {
    fn pot(&mut self, id: BallId) {
        if let Some(ball) = self.balls.iter_mut().find(|b| b.id == id) {
            ball.potted = true;
        }
    }

    fn apply_ops(&mut self, ops: &[TableOp], table: &TableGeometry) {
        for op in ops {
            match *op {
                TableOp::Remove { .. } => {}
                TableOp::Respot { id, position } => {
                    if let Some(ball) = self.balls.iter_mut().find(|b| b.id == id) {
                        ball.position = position;
                        ball.potted = false;
                    }
                }
                TableOp::CueBallInHand => {
                    if let Some(ball) = self.balls.iter_mut().find(|b| b.id.is_cue()) {
                        ball.position = table.cue_spot();
                        ball.potted = false;
                    }
                }
            }
        }
    }
}

impl GeometryProvider for ScriptedPhysics {
    fn snapshot(&self) -> Result<TableSnapshot> {
        if !self.settled {
            return Err(CoreError::StaleSnapshot);
        }
        Ok(TableSnapshot::new(self.balls.clone(), true))
    }
}

fn main() {
    let table = TableGeometry::standard();
    let mut rules = RulesConfig::default();
    rules.initial_reds = 3;

    let mut session = Session::new(
        "Human",
        "Computer",
        rules,
        PlannerConfig::default(),
        table.clone(),
        SEED,
    );

    let mut rack_rng = ChaCha8Rng::seed_from_u64(SEED);
    let mut balls = rack::setup(RackLayout::Standard, &table, 3, &mut rack_rng);
    balls.push(BallState::new(
        BallId::Cue,
        table.cue_spot(),
        table.ball_radius,
    ));
    let mut physics = ScriptedPhysics {
        balls,
        settled: true,
    };

    println!("=== frame trace (seed {}) ===", SEED);

    for shot_no in 1..=SHOT_CAP {
        if session.frame_over() {
            break;
        }

        let snapshot = match physics.snapshot() {
            Ok(snap) => snap,
            Err(err) => {
                println!("  physics error: {}", err);
                return;
            }
        };
        let plan = session.plan_shot(&snapshot);
        println!(
            "shot {:>2}: {} on {} -> {:?} (angle {:+.2} rad, power {:>4.1})",
            shot_no,
            session.striker().name,
            session.ball_on(),
            plan.kind,
            plan.angle,
            plan.power,
        );

        // Fake physics: an offensive shot pots exactly its target, anything
        // else grazes a ball on and stops.
        let outcome = match (plan.kind, plan.target) {
            (ShotKind::Offensive, Some(target)) => {
                physics.pot(target);
                classify(&[target], Some(target))
            }
            _ => {
                let touched = physics
                    .balls
                    .iter()
                    .find(|b| !b.potted && session.ball_on().matches(b.id))
                    .map(|b| b.id);
                classify(&[], touched)
            }
        };

        let snapshot = match physics.snapshot() {
            Ok(snap) => snap,
            Err(err) => {
                println!("  physics error: {}", err);
                return;
            }
        };
        let resolution = match session.resolve_shot(&outcome, &snapshot) {
            Ok(res) => res,
            Err(err) => {
                println!("  adjudication error: {}", err);
                return;
            }
        };

        for event in &resolution.events {
            match event {
                MatchEvent::Score {
                    player,
                    delta,
                    reason,
                } => println!("  +{} to {:?} ({:?})", delta, player, reason),
                MatchEvent::StateChange { phase, ball_on } => {
                    println!("  now {:?}, ball on {}", phase, ball_on)
                }
                MatchEvent::FrameEnd { final_scores } => {
                    println!("  frame over {} - {}", final_scores[0], final_scores[1])
                }
            }
        }
        physics.apply_ops(&resolution.table_ops, &table);
    }

    println!("=== scoreboard ===");
    for slot in [PlayerSlot::ONE, PlayerSlot::TWO] {
        let player = session.player(slot);
        println!("{:<10} {:>3}", player.name, player.score);
    }
}
