//! Confetto shapes and the drawing capability they render through

use crate::curves::triangle_wave;
use crate::rand::ParticleRng;
use confetti_core::{Bitmap, Color};
use glam::{Affine2, Vec2};
use std::sync::Arc;
use std::time::Instant;

/// Fill state handed to the backend with every draw call
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Paint {
    /// Fill color for vector shapes
    pub color: Color,
    /// Overall opacity multiplier in [0, 1]
    pub alpha: f32,
    /// Tint that replaces the color of opaque bitmap pixels (source-atop)
    pub color_filter: Option<Color>,
    pub anti_alias: bool,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            alpha: 1.0,
            color_filter: None,
            anti_alias: true,
        }
    }
}

/// Rendering backend. Implementations paint into whatever the host draws on.
pub trait Surface {
    /// Draw `bitmap` mapped into surface space by `transform`
    fn draw_bitmap(&mut self, bitmap: &Bitmap, transform: Affine2, paint: &Paint);

    /// Fill a circle
    fn draw_circle(&mut self, center: Vec2, radius: f32, paint: &Paint);
}

/// Color oscillation for shimmering confetti, driven by the wall clock
/// rather than the confetto's simulated time.
#[derive(Clone, Debug)]
pub struct Shimmer {
    pub from: Color,
    pub to: Color,
    pub wavelength_ms: u64,
    phase_ms: u64,
    epoch: Instant,
}

impl Shimmer {
    pub fn new(from: Color, to: Color, wavelength_ms: u64, rng: &mut ParticleRng) -> Self {
        let phase_ms = if wavelength_ms > 0 {
            rng.next_index(wavelength_ms as usize) as u64
        } else {
            0
        };
        Self {
            from,
            to,
            wavelength_ms,
            phase_ms,
            epoch: Instant::now(),
        }
    }

    /// Tint at `wall_ms` milliseconds of wall-clock time
    pub fn color_at(&self, wall_ms: u64) -> Color {
        let t = triangle_wave(wall_ms + self.phase_ms, self.wavelength_ms);
        self.from.lerp(&self.to, t)
    }

    fn current_color(&self) -> Color {
        self.color_at(self.epoch.elapsed().as_millis() as u64)
    }
}

/// Closed set of confetto shapes
#[derive(Clone, Debug)]
pub enum ConfettoShape {
    Bitmap(Arc<Bitmap>),
    Circle { color: Color, radius: f32 },
    Shimmering { bitmap: Arc<Bitmap>, shimmer: Shimmer },
}

impl ConfettoShape {
    pub fn bitmap(bitmap: Arc<Bitmap>) -> Self {
        ConfettoShape::Bitmap(bitmap)
    }

    pub fn circle(color: Color, radius: f32) -> Self {
        ConfettoShape::Circle { color, radius }
    }

    pub fn shimmering(
        bitmap: Arc<Bitmap>,
        from: Color,
        to: Color,
        wavelength_ms: u64,
        rng: &mut ParticleRng,
    ) -> Self {
        ConfettoShape::Shimmering {
            bitmap,
            shimmer: Shimmer::new(from, to, wavelength_ms, rng),
        }
    }

    /// Width and height in pixels
    pub fn measure(&self) -> (f32, f32) {
        match self {
            ConfettoShape::Bitmap(bitmap) | ConfettoShape::Shimmering { bitmap, .. } => {
                (bitmap.width() as f32, bitmap.height() as f32)
            }
            ConfettoShape::Circle { radius, .. } => {
                let diameter = (radius * 2.0).trunc();
                (diameter, diameter)
            }
        }
    }

    /// Set up the fill state once when the confetto is configured
    pub fn configure_paint(&self, paint: &mut Paint) {
        *paint = Paint::default();
        if let ConfettoShape::Circle { color, .. } = self {
            paint.color = *color;
        }
    }

    /// Render at top-left (`x`, `y`) rotated by `rotation` degrees about the shape center.
    pub fn draw(
        &self,
        surface: &mut dyn Surface,
        transform: Affine2,
        paint: &Paint,
        x: f32,
        y: f32,
        rotation: f32,
    ) {
        match self {
            ConfettoShape::Bitmap(bitmap) => draw_rotated(surface, bitmap, transform, paint, x, y, rotation),
            ConfettoShape::Circle { radius, .. } => {
                surface.draw_circle(Vec2::new(x + radius, y + radius), *radius, paint);
            }
            ConfettoShape::Shimmering { bitmap, shimmer } => {
                let tinted = Paint {
                    color_filter: Some(shimmer.current_color()),
                    ..*paint
                };
                draw_rotated(surface, bitmap, transform, &tinted, x, y, rotation);
            }
        }
    }
}

fn draw_rotated(
    surface: &mut dyn Surface,
    bitmap: &Bitmap,
    transform: Affine2,
    paint: &Paint,
    x: f32,
    y: f32,
    rotation: f32,
) {
    let center = Vec2::new(bitmap.width() as f32 / 2.0, bitmap.height() as f32 / 2.0);
    let placed = transform
        * Affine2::from_translation(Vec2::new(x, y))
        * Affine2::from_translation(center)
        * Affine2::from_angle(rotation.to_radians())
        * Affine2::from_translation(-center);
    surface.draw_bitmap(bitmap, placed, paint);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        bitmaps: Vec<(Affine2, Paint)>,
        circles: Vec<(Vec2, f32, Paint)>,
    }

    impl Surface for Recorder {
        fn draw_bitmap(&mut self, _bitmap: &Bitmap, transform: Affine2, paint: &Paint) {
            self.bitmaps.push((transform, *paint));
        }

        fn draw_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) {
            self.circles.push((center, radius, *paint));
        }
    }

    #[test]
    fn circle_measures_diameter() {
        let shape = ConfettoShape::circle(Color::BLACK, 4.5);
        assert_eq!(shape.measure(), (9.0, 9.0));
    }

    #[test]
    fn circle_paint_uses_color() {
        let red = Color::from_hex(0xFF0000);
        let shape = ConfettoShape::circle(red, 3.0);
        let mut paint = Paint::default();
        shape.configure_paint(&mut paint);
        assert_eq!(paint.color, red);

        let mut surface = Recorder::default();
        shape.draw(&mut surface, Affine2::IDENTITY, &paint, 10.0, 20.0, 45.0);
        assert_eq!(surface.circles[0].0, Vec2::new(13.0, 23.0));
        assert_eq!(surface.circles[0].1, 3.0);
    }

    #[test]
    fn bitmap_rotates_about_center() {
        let shape = ConfettoShape::bitmap(Arc::new(Bitmap::new(10, 10)));
        let mut surface = Recorder::default();
        shape.draw(&mut surface, Affine2::IDENTITY, &Paint::default(), 100.0, 50.0, 90.0);

        let (transform, _) = surface.bitmaps[0];
        // The center stays put under rotation
        let center = transform.transform_point2(Vec2::new(5.0, 5.0));
        assert!((center - Vec2::new(105.0, 55.0)).length() < 1e-4);
        // The top-left corner swings to the top-right
        let corner = transform.transform_point2(Vec2::ZERO);
        assert!((corner - Vec2::new(110.0, 50.0)).length() < 1e-4);
    }

    #[test]
    fn shimmer_tints_between_colors() {
        let mut rng = ParticleRng::new(8);
        let (red, blue) = (Color::from_hex(0xFF0000), Color::from_hex(0x0000FF));
        let shimmer = Shimmer::new(red, blue, 1000, &mut rng);
        assert!(shimmer.phase_ms < 1000);

        let trough = (1000 - shimmer.phase_ms) % 1000;
        let peak = (trough + 500) % 1000;
        assert_eq!(shimmer.color_at(trough), red);
        assert_eq!(shimmer.color_at(trough + 1000), red);
        assert_eq!(shimmer.color_at(peak), blue);

        let middle = shimmer.color_at(trough + 250);
        assert!((middle.r - 0.5).abs() < 1e-6);
        assert!((middle.b - 0.5).abs() < 1e-6);

        let shape = ConfettoShape::Shimmering {
            bitmap: Arc::new(Bitmap::new(4, 4)),
            shimmer,
        };
        let mut surface = Recorder::default();
        shape.draw(&mut surface, Affine2::IDENTITY, &Paint::default(), 0.0, 0.0, 0.0);
        assert!(surface.bitmaps[0].1.color_filter.is_some());
    }
}
