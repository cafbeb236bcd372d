//! Frame setup: rack layouts.
//!
//! Three layouts are supported, mirroring the practice modes of the game:
//! the standard frame, random reds with the colours on their spots, and
//! everything randomized. Random placement is rejection-sampled so no ball
//! overlaps another ball or sits on a pocket mouth.

use nalgebra::Point2;
use rand::Rng;

use crate::engine::ball::{BallColour, BallId};
use crate::table::{BallState, TableGeometry};

/// How the object balls are laid out at the start of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RackLayout {
    /// Triangle of reds behind the pink, colours on their spots.
    Standard,
    /// Reds scattered, colours on their spots.
    RandomReds,
    /// Reds and colours scattered.
    RandomAll,
}

/// Build the object balls for a new frame. The cue ball is not included;
/// it enters play from hand in the "D".
pub fn setup<R: Rng>(
    layout: RackLayout,
    table: &TableGeometry,
    red_count: u8,
    rng: &mut R,
) -> Vec<BallState> {
    match layout {
        RackLayout::Standard => standard_frame(table, red_count),
        RackLayout::RandomReds => {
            let mut balls = spotted_colours(table);
            scatter_reds(table, red_count, &mut balls, rng);
            balls
        }
        RackLayout::RandomAll => {
            let mut balls = Vec::new();
            scatter_reds(table, red_count, &mut balls, rng);
            for colour in BallColour::ORDER {
                let pos = random_position(table, &balls, rng);
                balls.push(BallState::new(BallId::Colour(colour), pos, table.ball_radius));
            }
            balls
        }
    }
}

/// Standard frame: colours spotted, reds in a tight triangle whose apex
/// sits just up-table of the pink spot.
pub fn standard_frame(table: &TableGeometry, red_count: u8) -> Vec<BallState> {
    let mut balls = spotted_colours(table);

    let d = table.ball_radius * 2.0;
    let gap = 0.002;
    let apex = Point2::new(
        table.spot(BallColour::Pink).x + d * 1.5,
        table.spot(BallColour::Pink).y,
    );

    let mut index = 0u8;
    'rows: for row in 0..5u32 {
        for col in 0..=row {
            if index >= red_count {
                break 'rows;
            }
            let x = apex.x + row as f32 * (d + gap);
            let y = apex.y + (col as f32 - row as f32 / 2.0) * (d + gap);
            balls.push(BallState::new(
                BallId::Red(index),
                Point2::new(x, y),
                table.ball_radius,
            ));
            index += 1;
        }
    }

    balls
}

fn spotted_colours(table: &TableGeometry) -> Vec<BallState> {
    BallColour::ORDER
        .iter()
        .map(|&c| BallState::new(BallId::Colour(c), table.spot(c), table.ball_radius))
        .collect()
}

fn scatter_reds<R: Rng>(
    table: &TableGeometry,
    red_count: u8,
    balls: &mut Vec<BallState>,
    rng: &mut R,
) {
    for index in 0..red_count {
        let pos = random_position(table, balls, rng);
        balls.push(BallState::new(BallId::Red(index), pos, table.ball_radius));
    }
}

/// Random on-table position clear of existing balls and pocket mouths.
/// Falls back to the table centre if sampling keeps colliding.
fn random_position<R: Rng>(
    table: &TableGeometry,
    placed: &[BallState],
    rng: &mut R,
) -> Point2<f32> {
    let d = table.ball_radius * 2.0;
    for _ in 0..100 {
        let candidate = Point2::new(
            rng.gen_range(d..table.length - d),
            rng.gen_range(d..table.width - d),
        );
        if !overlaps(table, placed, candidate) {
            return candidate;
        }
    }
    table.centre()
}

fn overlaps(table: &TableGeometry, placed: &[BallState], candidate: Point2<f32>) -> bool {
    let r = table.ball_radius;
    for ball in placed {
        if (ball.position - candidate).norm() < r + ball.radius {
            return true;
        }
    }
    for pocket in &table.pockets {
        if (pocket.position - candidate).norm() < r + pocket.radius {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_standard_frame_counts() {
        let table = TableGeometry::standard();
        let balls = standard_frame(&table, 15);
        assert_eq!(balls.len(), 21);
        assert_eq!(balls.iter().filter(|b| b.id.is_red()).count(), 15);
        assert_eq!(balls.iter().filter(|b| b.id.is_colour()).count(), 6);
        assert!(balls.iter().all(|b| !b.potted));
    }

    #[test]
    fn test_standard_reds_behind_pink() {
        let table = TableGeometry::standard();
        let pink_x = table.spot(BallColour::Pink).x;
        for ball in standard_frame(&table, 15) {
            if ball.id.is_red() {
                assert!(ball.position.x > pink_x);
            }
        }
    }

    #[test]
    fn test_random_layouts_do_not_overlap() {
        let table = TableGeometry::standard();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for layout in [RackLayout::RandomReds, RackLayout::RandomAll] {
            let balls = setup(layout, &table, 15, &mut rng);
            assert_eq!(balls.len(), 21);
            for (i, a) in balls.iter().enumerate() {
                for b in &balls[i + 1..] {
                    let dist = (a.position - b.position).norm();
                    assert!(
                        dist >= a.radius + b.radius - 1e-4,
                        "{} overlaps {}",
                        a.id,
                        b.id
                    );
                }
            }
        }
    }

    #[test]
    fn test_setup_is_reproducible_per_seed() {
        let table = TableGeometry::standard();
        let a = setup(
            RackLayout::RandomAll,
            &table,
            15,
            &mut ChaCha8Rng::seed_from_u64(42),
        );
        let b = setup(
            RackLayout::RandomAll,
            &table,
            15,
            &mut ChaCha8Rng::seed_from_u64(42),
        );
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.id, y.id);
            assert!((x.position - y.position).norm() < 1e-6);
        }
    }
}
