//! Sight-line geometry shared by the planner and free-ball detection.

use nalgebra::Point2;

use crate::table::TableGeometry;

/// Distance from `point` to the segment `a..b`, with the projection
/// parameter clamped to `[0, 1]`.
pub fn point_segment_distance(point: Point2<f32>, a: Point2<f32>, b: Point2<f32>) -> f32 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq < 1e-12 {
        return (point - a).norm();
    }
    let t = ((point - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    let closest = a + ab * t;
    (point - closest).norm()
}

/// True if any blocker circle `(centre, radius)` intrudes on the segment.
pub fn segment_blocked<I>(a: Point2<f32>, b: Point2<f32>, blockers: I) -> bool
where
    I: IntoIterator<Item = (Point2<f32>, f32)>,
{
    blockers
        .into_iter()
        .any(|(centre, radius)| point_segment_distance(centre, a, b) < radius)
}

/// Aim angle from `from` towards `to`, in radians.
pub fn angle_to(from: Point2<f32>, to: Point2<f32>) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Whether any straight sight line from `cue` reaches the surface of
/// `target`.
///
/// Works in angle space: the target subtends an angular interval as seen
/// from the cue, and every blocker nearer than the target casts an angular
/// shadow (the pair of tangent lines past its disc). The target is visible
/// iff the shadows do not cover its whole interval. A cone test, not a
/// fixed set of rays, so a blocker sat close to the cue ball hides only
/// the directions it actually shadows.
pub fn ball_visible<I>(
    cue: Point2<f32>,
    target: Point2<f32>,
    target_radius: f32,
    blockers: I,
) -> bool
where
    I: IntoIterator<Item = (Point2<f32>, f32)>,
{
    let to_target = target - cue;
    let dist = to_target.norm();
    if dist <= target_radius {
        return true;
    }
    let centre_angle = to_target.y.atan2(to_target.x);
    let half_width = (target_radius / dist).min(1.0).asin();

    let mut shadows: Vec<(f32, f32)> = Vec::new();
    for (centre, radius) in blockers {
        let to_blocker = centre - cue;
        let d = to_blocker.norm();
        if d <= radius {
            // Blocker overlaps the cue position; nothing is visible past it.
            return false;
        }
        // Blockers whose nearest surface lies beyond the target centre
        // cannot screen it.
        if d - radius >= dist {
            continue;
        }
        let offset = angle_diff(to_blocker.y.atan2(to_blocker.x), centre_angle);
        let spread = (radius / d).min(1.0).asin();
        shadows.push((offset - spread, offset + spread));
    }

    // Sweep the target interval `[-half_width, half_width]` against the
    // sorted shadows; any uncovered angle means a clear sight line.
    shadows.sort_by(|a, b| a.0.total_cmp(&b.0));
    let mut reach = -half_width;
    for (lo, hi) in shadows {
        if reach >= half_width {
            return false;
        }
        if lo > reach {
            return true;
        }
        reach = reach.max(hi);
    }
    reach < half_width
}

/// Signed difference `a - b` normalized to `(-PI, PI]`.
fn angle_diff(a: f32, b: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let mut d = a - b;
    while d > PI {
        d -= TAU;
    }
    while d <= -PI {
        d += TAU;
    }
    d
}

/// Straight-line cue-ball path with cushion reflections.
///
/// Returns up to `max_bounces + 1` segments of the predicted travel as a
/// polyline starting at `start`. Purely kinematic; used by the presentation
/// layer to draw the aiming guide.
pub fn trajectory_preview(
    start: Point2<f32>,
    angle: f32,
    total_length: f32,
    ball_radius: f32,
    table: &TableGeometry,
    max_bounces: usize,
) -> Vec<Point2<f32>> {
    let min_x = ball_radius;
    let max_x = table.length - ball_radius;
    let min_y = ball_radius;
    let max_y = table.width - ball_radius;

    let mut points = vec![start];
    let mut pos = start;
    let mut dir = nalgebra::Vector2::new(angle.cos(), angle.sin());
    let mut remaining = total_length;

    for _ in 0..=max_bounces {
        // Distance to the first cushion along each axis.
        let tx = if dir.x > 1e-6 {
            (max_x - pos.x) / dir.x
        } else if dir.x < -1e-6 {
            (min_x - pos.x) / dir.x
        } else {
            f32::INFINITY
        };
        let ty = if dir.y > 1e-6 {
            (max_y - pos.y) / dir.y
        } else if dir.y < -1e-6 {
            (min_y - pos.y) / dir.y
        } else {
            f32::INFINITY
        };

        let hit = tx.min(ty);
        if remaining <= hit {
            points.push(pos + dir * remaining);
            return points;
        }

        pos += dir * hit;
        points.push(pos);
        remaining -= hit;
        if tx <= ty {
            dir.x = -dir.x;
        }
        if ty <= tx {
            dir.y = -dir.y;
        }
    }

    points
}
