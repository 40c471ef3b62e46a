//! Headless drawing surface that reports frames to the log.

use dots_core::{Color, Point};
use dots_world::{Glyph, Surface};
use tracing::trace;

#[derive(Debug, Default)]
pub struct LogSurface {
    prey: usize,
    predators: usize,
    food: usize,
    other: usize,
    frames_presented: u64,
}

impl LogSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Circles drawn in the current frame
    pub fn circles(&self) -> usize {
        self.prey + self.predators + self.food + self.other
    }
}

impl Surface for LogSurface {
    fn clear(&mut self) {
        self.prey = 0;
        self.predators = 0;
        self.food = 0;
        self.other = 0;
    }

    fn draw_circle(&mut self, _center: Point, _radius: f32, color: Color) {
        match color {
            c if c == Glyph::PREY.color => self.prey += 1,
            c if c == Glyph::PREDATOR.color => self.predators += 1,
            c if c == Glyph::FOOD.color => self.food += 1,
            _ => self.other += 1,
        }
    }

    fn present(&mut self) {
        self.frames_presented += 1;
        trace!(
            frame = self.frames_presented,
            prey = self.prey,
            predators = self.predators,
            food = self.food,
            circles = self.circles(),
            "Frame presented"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_reset_per_frame() {
        let mut surface = LogSurface::new();
        surface.clear();
        Glyph::PREY.draw(&mut surface, Point::new(1.0, 1.0));
        Glyph::FOOD.draw(&mut surface, Point::new(2.0, 2.0));
        surface.draw_circle(Point::new(3.0, 3.0), 1.0, Color::BLACK);
        surface.present();

        assert_eq!(surface.circles(), 3);
        assert_eq!(surface.frames_presented(), 1);

        surface.clear();
        assert_eq!(surface.circles(), 0);
    }
}
