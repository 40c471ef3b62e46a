//! Nearest-target search and kinematic movement.

use dots_core::{Bounds, Point};
use rand::Rng;

/// Nearest candidate strictly inside `vision`.
///
/// Running-minimum scan seeded with `vision`: a candidate only wins by being
/// strictly closer than everything seen so far, so ties go to the earliest
/// candidate in iteration order.
pub fn nearest_within<I>(origin: Point, vision: f32, candidates: I) -> Option<Point>
where
    I: IntoIterator<Item = Point>,
{
    let mut best_distance = vision;
    let mut best = None;

    for candidate in candidates {
        let distance = origin.distance(&candidate);
        if distance < best_distance {
            best_distance = distance;
            best = Some(candidate);
        }
    }

    best
}

/// Position after one frame of movement.
///
/// With a target the agent covers `speed` along the straight line towards it.
/// Without one it wanders by an independent uniform offset in
/// `[-speed, speed]` per axis. The result is clamped into `bounds`.
pub fn advance<R: Rng + ?Sized>(
    position: Point,
    speed: f32,
    target: Option<Point>,
    bounds: Bounds,
    rng: &mut R,
) -> Point {
    let moved = match target {
        // Already on top of the target: no heading to follow
        Some(target) if target == position => position,
        Some(target) => {
            let angle = position.angle_to(&target);
            position.add(speed * angle.cos(), speed * angle.sin())
        }
        None => wander(position, speed, rng),
    };
    bounds.clamp(moved)
}

fn wander<R: Rng + ?Sized>(position: Point, speed: f32, rng: &mut R) -> Point {
    if speed.is_nan() || speed <= 0.0 {
        return position;
    }
    position.add(
        rng.gen_range(-speed..=speed),
        rng.gen_range(-speed..=speed),
    )
}
