//! Headless host: an in-memory display tree and a software surface

use confetti_core::{Bitmap, Color, ConfettiError, Result};
use confetti_particles::{Container, Paint, Surface};
use glam::{Affine2, Vec2};
use image::{Rgba, RgbaImage};
use std::path::Path;

/// Display tree with a single overlay slot. Redraw requests only set a flag
/// that the frame loop consumes.
#[derive(Debug)]
pub struct Canvas {
    width: u32,
    height: u32,
    overlay: bool,
    dirty: bool,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            overlay: false,
            dirty: false,
        }
    }

    /// Whether a redraw was requested since the last call
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

impl Container for Canvas {
    fn size(&self) -> Result<(f32, f32)> {
        Ok((self.width as f32, self.height as f32))
    }

    fn add_overlay(&mut self) -> Result<()> {
        if self.overlay {
            return Err(ConfettiError::HostError("overlay already attached".into()));
        }
        self.overlay = true;
        Ok(())
    }

    fn remove_overlay(&mut self) -> Result<()> {
        if !self.overlay {
            return Err(ConfettiError::HostError("no overlay to remove".into()));
        }
        self.overlay = false;
        self.dirty = false;
        Ok(())
    }

    fn invalidate(&mut self) -> Result<()> {
        if !self.overlay {
            return Err(ConfettiError::HostError("invalidate without an overlay".into()));
        }
        self.dirty = true;
        Ok(())
    }
}

/// CPU rasterizer over an RGBA image, blending straight-alpha source-over
pub struct ImageSurface {
    image: RgbaImage,
}

impl ImageSurface {
    pub fn new(width: u32, height: u32, background: Option<Color>) -> Self {
        let fill = background.map_or([0, 0, 0, 0], |c| c.to_rgba8());
        Self {
            image: RgbaImage::from_pixel(width, height, Rgba(fill)),
        }
    }

    pub fn save(&self, path: &Path) -> image::ImageResult<()> {
        self.image.save(path)
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.get_pixel(x, y).0
    }

    fn blend(&mut self, x: u32, y: u32, color: [f32; 3], alpha: f32) {
        if alpha <= 0.0 {
            return;
        }
        let dst = self.image.get_pixel_mut(x, y);
        let da = dst.0[3] as f32 / 255.0;
        let out_a = alpha + da * (1.0 - alpha);
        if out_a <= 0.0 {
            return;
        }
        for (channel, src) in dst.0.iter_mut().take(3).zip(color) {
            let d = *channel as f32 / 255.0;
            let c = (src * alpha + d * da * (1.0 - alpha)) / out_a;
            *channel = (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        }
        dst.0[3] = (out_a.clamp(0.0, 1.0) * 255.0).round() as u8;
    }

    /// Pixel range covering `corners`, clipped to the image
    fn clip_box(&self, corners: &[Vec2]) -> Option<(u32, u32, u32, u32)> {
        let min = corners.iter().copied().reduce(Vec2::min)?;
        let max = corners.iter().copied().reduce(Vec2::max)?;
        let (w, h) = (self.image.width() as f32, self.image.height() as f32);
        let x0 = min.x.floor().clamp(0.0, w);
        let y0 = min.y.floor().clamp(0.0, h);
        let x1 = max.x.ceil().clamp(0.0, w);
        let y1 = max.y.ceil().clamp(0.0, h);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }
}

impl Surface for ImageSurface {
    fn draw_bitmap(&mut self, bitmap: &Bitmap, transform: Affine2, paint: &Paint) {
        let (bw, bh) = (bitmap.width() as f32, bitmap.height() as f32);
        let corners = [
            transform.transform_point2(Vec2::ZERO),
            transform.transform_point2(Vec2::new(bw, 0.0)),
            transform.transform_point2(Vec2::new(0.0, bh)),
            transform.transform_point2(Vec2::new(bw, bh)),
        ];
        let Some((x0, y0, x1, y1)) = self.clip_box(&corners) else {
            return;
        };
        let inverse = transform.inverse();

        for y in y0..y1 {
            for x in x0..x1 {
                let local = inverse.transform_point2(Vec2::new(x as f32 + 0.5, y as f32 + 0.5));
                if local.x < 0.0 || local.y < 0.0 || local.x >= bw || local.y >= bh {
                    continue;
                }
                let Some([r, g, b, a]) = bitmap.pixel(local.x as u32, local.y as u32) else {
                    continue;
                };
                let src_alpha = a as f32 / 255.0;
                // Color filter replaces the color of covered pixels
                let (color, alpha) = match paint.color_filter {
                    Some(tint) => ([tint.r, tint.g, tint.b], src_alpha * tint.a),
                    None => ([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0], src_alpha),
                };
                self.blend(x, y, color, alpha * paint.alpha);
            }
        }
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) {
        let extent = Vec2::splat(radius + 1.0);
        let Some((x0, y0, x1, y1)) = self.clip_box(&[center - extent, center + extent]) else {
            return;
        };
        let color = [paint.color.r, paint.color.g, paint.color.b];
        for y in y0..y1 {
            for x in x0..x1 {
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5).distance(center);
                let coverage = if paint.anti_alias {
                    (radius - d + 0.5).clamp(0.0, 1.0)
                } else if d <= radius {
                    1.0
                } else {
                    0.0
                };
                self.blend(x, y, color, coverage * paint.color.a * paint.alpha);
            }
        }
    }
}
