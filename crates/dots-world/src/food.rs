//! Static food points.

use crate::world::random_point;
use dots_core::{Bounds, Point};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A fixed-size set of food points. Every point eaten is replaced by a new
/// one at a random position, so the length never changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FoodField {
    points: Vec<Point>,
}

impl FoodField {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Scatter `count` points uniformly over the bounds
    pub fn scatter<R: Rng + ?Sized>(count: usize, bounds: Bounds, rng: &mut R) -> Self {
        let points = (0..count).map(|_| random_point(bounds, rng)).collect();
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> + '_ {
        self.points.iter()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Eat every point strictly closer than `radius` to `center` and respawn
    /// one replacement per eaten point. Replacements are appended after the
    /// scan, so they cannot be eaten by the same call. Returns the number of
    /// points eaten.
    pub fn consume_within<R: Rng + ?Sized>(
        &mut self,
        center: Point,
        radius: f32,
        bounds: Bounds,
        rng: &mut R,
    ) -> u32 {
        let before = self.points.len();
        self.points.retain(|point| point.distance(&center) >= radius);
        let eaten = before - self.points.len();

        for _ in 0..eaten {
            self.points.push(random_point(bounds, rng));
        }

        eaten as u32
    }
}
