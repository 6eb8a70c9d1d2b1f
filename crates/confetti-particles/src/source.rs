//! Emission source: the region new confetti spawn from

use crate::rand::ParticleRng;

/// A line segment (or a point, when both ends coincide) in viewport pixels.
///
/// Spawn coordinates name the top-left corner of the drawn confetto. To spawn
/// confetti off-screen, offset the source by the confetto size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConfettiSource {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl ConfettiSource {
    /// Every confetto spawns at exactly (`x`, `y`)
    pub fn point(x: f32, y: f32) -> Self {
        Self::line(x, y, x, y)
    }

    pub fn line(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn initial_x(&self, u: f32) -> f32 {
        self.x0 + (self.x1 - self.x0) * u
    }

    pub fn initial_y(&self, u: f32) -> f32 {
        self.y0 + (self.y1 - self.y0) * u
    }

    /// Spawn coordinate with an independent uniform draw per axis
    pub fn sample(&self, rng: &mut ParticleRng) -> (f32, f32) {
        let x = self.initial_x(rng.next_f32());
        let y = self.initial_y(rng.next_f32());
        (x, y)
    }
}
