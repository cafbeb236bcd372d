//! Table geometry, ball snapshots and the boundary to the physics engine.
//!
//! The core never integrates motion itself. It reads [`TableSnapshot`]s
//! produced by an external [`GeometryProvider`] (the rigid-body engine
//! wrapper) and hands back [`PlannedShot`](crate::engine::planner::PlannedShot)
//! impulses and respot/removal requests.

pub mod rack;

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::engine::ball::{BallColour, BallId};
use crate::error::Result;

/// A pocket opening, modelled as a circle at the cushion line.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pocket {
    pub position: Point2<f32>,
    pub radius: f32,
}

/// Axis-aligned cushion rail rectangle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CushionRect {
    pub min: Point2<f32>,
    pub max: Point2<f32>,
}

/// Static table dimensions, pocket layout and spot positions.
///
/// The playing surface is the rectangle `[0, length] x [0, width]` with the
/// baulk end at `x = 0`. Dimensions are metres.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableGeometry {
    pub length: f32,
    pub width: f32,
    pub ball_radius: f32,
    pub pockets: Vec<Pocket>,
    pub cushions: Vec<CushionRect>,
    /// X coordinate of the baulk line.
    pub baulk_x: f32,
    /// Radius of the "D" semicircle on the baulk line.
    pub d_radius: f32,
}

impl TableGeometry {
    /// Full-size table with six pockets and standard spot proportions.
    ///
    /// Ball diameter is 1/36 of the table width, pocket diameter 1.5 ball
    /// diameters, both taken from the playable-surface conventions the
    /// presentation layer uses.
    pub fn standard() -> Self {
        let length = 3.6;
        let width = 1.8;
        let ball_diameter = width / 36.0;
        let pocket_radius = ball_diameter * 1.5 / 2.0;
        let rail = 0.05;

        let pockets = [
            (0.0, 0.0),
            (length / 2.0, 0.0),
            (length, 0.0),
            (0.0, width),
            (length / 2.0, width),
            (length, width),
        ]
        .into_iter()
        .map(|(x, y)| Pocket {
            position: Point2::new(x, y),
            radius: pocket_radius,
        })
        .collect();

        // Four rails just outside the playing surface.
        let cushions = vec![
            CushionRect {
                min: Point2::new(-rail, -rail),
                max: Point2::new(length + rail, 0.0),
            },
            CushionRect {
                min: Point2::new(-rail, width),
                max: Point2::new(length + rail, width + rail),
            },
            CushionRect {
                min: Point2::new(-rail, 0.0),
                max: Point2::new(0.0, width),
            },
            CushionRect {
                min: Point2::new(length, 0.0),
                max: Point2::new(length + rail, width),
            },
        ];

        Self {
            length,
            width,
            ball_radius: ball_diameter / 2.0,
            pockets,
            cushions,
            baulk_x: length * 0.25,
            d_radius: pocket_radius * 4.0,
        }
    }

    pub fn centre(&self) -> Point2<f32> {
        Point2::new(self.length / 2.0, self.width / 2.0)
    }

    /// Fixed spot a colour is returned to when respotted.
    pub fn spot(&self, colour: BallColour) -> Point2<f32> {
        let mid_y = self.width / 2.0;
        let lateral = self.width * 0.1;
        match colour {
            BallColour::Yellow => Point2::new(self.baulk_x, mid_y + lateral),
            BallColour::Green => Point2::new(self.baulk_x, mid_y - lateral),
            BallColour::Brown => Point2::new(self.baulk_x, mid_y),
            BallColour::Blue => Point2::new(self.length / 2.0, mid_y),
            BallColour::Pink => Point2::new(self.length * 0.7, mid_y),
            BallColour::Black => Point2::new(self.length * 0.85, mid_y),
        }
    }

    /// True if `point` lies inside the "D", where the cue ball may be placed
    /// when in hand.
    pub fn in_hand_zone(&self, point: Point2<f32>) -> bool {
        let centre = Point2::new(self.baulk_x, self.width / 2.0);
        point.x <= self.baulk_x && (point - centre).norm() <= self.d_radius
    }

    /// Default in-hand cue position: inside the "D", off the centre line.
    /// The brown's spot sits dead ahead of the D's centre, so the default
    /// placement breaks from the side the way frames are actually opened.
    pub fn cue_spot(&self) -> Point2<f32> {
        Point2::new(
            self.baulk_x - self.d_radius * 0.5,
            self.width / 2.0 - self.d_radius * 0.6,
        )
    }
}

/// One ball inside a snapshot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BallState {
    pub id: BallId,
    pub value: u32,
    pub potted: bool,
    pub position: Point2<f32>,
    pub radius: f32,
}

impl BallState {
    pub fn new(id: BallId, position: Point2<f32>, radius: f32) -> Self {
        Self {
            id,
            value: id.value(),
            potted: false,
            position,
            radius,
        }
    }
}

/// Read-only view of the table after physics has settled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub balls: Vec<BallState>,
    /// Stillness predicate reported by the physics boundary: every ball's
    /// velocity is below the rest threshold.
    pub all_at_rest: bool,
}

impl TableSnapshot {
    pub fn new(balls: Vec<BallState>, all_at_rest: bool) -> Self {
        Self { balls, all_at_rest }
    }

    pub fn ball(&self, id: BallId) -> Option<&BallState> {
        self.balls.iter().find(|b| b.id == id)
    }

    pub fn cue_ball(&self) -> Option<&BallState> {
        self.ball(BallId::Cue).filter(|b| !b.potted)
    }

    pub fn unpotted(&self) -> impl Iterator<Item = &BallState> {
        self.balls.iter().filter(|b| !b.potted)
    }

    pub fn reds_on_table(&self) -> usize {
        self.unpotted().filter(|b| b.id.is_red()).count()
    }
}

/// Boundary to the external physics/geometry engine.
///
/// A provider that cannot produce a current snapshot must return
/// [`CoreError::StaleSnapshot`](crate::error::CoreError::StaleSnapshot); the
/// core treats that as a hard failure of the calling step and never
/// interpolates.
pub trait GeometryProvider {
    fn snapshot(&self) -> Result<TableSnapshot>;
}

/// Requests the core issues back to the physics layer after adjudication.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TableOp {
    /// Return a colour ball to the given spot.
    Respot { id: BallId, position: Point2<f32> },
    /// Take a ball out of active play permanently.
    Remove { id: BallId },
    /// The cue ball was potted; the incoming player places it in the "D".
    CueBallInHand,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_shape() {
        let table = TableGeometry::standard();
        assert_eq!(table.pockets.len(), 6);
        assert_eq!(table.cushions.len(), 4);
        assert!(table.length > table.width);
        assert!((table.ball_radius - 0.025).abs() < 1e-6);
    }

    #[test]
    fn test_colour_spots_inside_table() {
        let table = TableGeometry::standard();
        for colour in BallColour::ORDER {
            let spot = table.spot(colour);
            assert!(spot.x > 0.0 && spot.x < table.length, "{} x", colour);
            assert!(spot.y > 0.0 && spot.y < table.width, "{} y", colour);
        }
        // Black sits beyond pink, both beyond blue.
        assert!(table.spot(BallColour::Black).x > table.spot(BallColour::Pink).x);
        assert!(table.spot(BallColour::Pink).x > table.spot(BallColour::Blue).x);
    }

    #[test]
    fn test_in_hand_zone() {
        let table = TableGeometry::standard();
        assert!(table.in_hand_zone(table.cue_spot()));
        // Right of the baulk line is never in hand.
        assert!(!table.in_hand_zone(Point2::new(table.baulk_x + 0.01, table.width / 2.0)));
        // On the line but outside the semicircle.
        assert!(!table.in_hand_zone(Point2::new(table.baulk_x, 0.0)));
    }

    #[test]
    fn test_geometry_provider_reports_stale_snapshot() {
        use crate::error::CoreError;

        struct FixedTable {
            balls: Vec<BallState>,
            settled: bool,
        }

        impl GeometryProvider for FixedTable {
            fn snapshot(&self) -> Result<TableSnapshot> {
                if !self.settled {
                    return Err(CoreError::StaleSnapshot);
                }
                Ok(TableSnapshot::new(self.balls.clone(), true))
            }
        }

        let table = TableGeometry::standard();
        let mut provider = FixedTable {
            balls: vec![BallState::new(BallId::Cue, table.cue_spot(), table.ball_radius)],
            settled: true,
        };
        assert!(provider.snapshot().unwrap().cue_ball().is_some());

        provider.settled = false;
        assert!(matches!(
            provider.snapshot(),
            Err(CoreError::StaleSnapshot)
        ));
    }

    #[test]
    fn test_snapshot_lookups() {
        let table = TableGeometry::standard();
        let mut balls = vec![
            BallState::new(BallId::Cue, table.cue_spot(), table.ball_radius),
            BallState::new(BallId::Red(0), table.centre(), table.ball_radius),
        ];
        balls[1].potted = true;
        let snapshot = TableSnapshot::new(balls, true);
        assert!(snapshot.cue_ball().is_some());
        assert_eq!(snapshot.reds_on_table(), 0);
        assert!(snapshot.ball(BallId::Red(0)).unwrap().potted);
    }
}
