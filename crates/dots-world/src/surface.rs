//! Drawing surface the frame loop renders through.

use dots_core::{Color, Point, Species};

/// The only rendering capabilities the simulation needs
pub trait Surface {
    /// Start a new frame
    fn clear(&mut self);

    /// Draw a filled circle
    fn draw_circle(&mut self, center: Point, radius: f32, color: Color);

    /// Finish the frame
    fn present(&mut self) {}
}

/// How an entity is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    pub radius: f32,
    pub color: Color,
}

impl Glyph {
    pub const PREY: Glyph = Glyph { radius: 4.0, color: Color::GREEN };
    pub const PREDATOR: Glyph = Glyph { radius: 6.0, color: Color::RED };
    pub const FOOD: Glyph = Glyph { radius: 2.0, color: Color::BLUE };

    pub fn for_species(species: Species) -> Glyph {
        match species {
            Species::Prey => Glyph::PREY,
            Species::Predator => Glyph::PREDATOR,
        }
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, center: Point) {
        surface.draw_circle(center, self.radius, self.color);
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSurface;

impl Surface for NullSurface {
    fn clear(&mut self) {}

    fn draw_circle(&mut self, _center: Point, _radius: f32, _color: Color) {}
}

/// A circle as recorded by [`RecordingSurface`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f32,
    pub color: Color,
}

/// Keeps the circles of the current frame in draw order
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub circles: Vec<Circle>,
    pub frames_presented: u64,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, color: Color) -> usize {
        self.circles.iter().filter(|c| c.color == color).count()
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self) {
        self.circles.clear();
    }

    fn draw_circle(&mut self, center: Point, radius: f32, color: Color) {
        self.circles.push(Circle { center, radius, color });
    }

    fn present(&mut self) {
        self.frames_presented += 1;
    }
}
