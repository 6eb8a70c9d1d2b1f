//! Procedural confetti bitmaps: a circle, a square and a triangle per color

use confetti_core::{Bitmap, Color};
use std::sync::Arc;

/// Default palette when no `--colors` are given
pub const DEFAULT_PALETTE: [u32; 5] = [0xE53935, 0xFDD835, 0x43A047, 0x1E88E5, 0x8E24AA];

/// Three shapes for each color, all `size` x `size`
pub fn palette_bitmaps(colors: &[Color], size: u32) -> Vec<Arc<Bitmap>> {
    colors
        .iter()
        .flat_map(|&color| {
            [
                circle_bitmap(color, size),
                square_bitmap(color, size),
                triangle_bitmap(color, size),
            ]
        })
        .map(Arc::new)
        .collect()
}

pub fn circle_bitmap(color: Color, size: u32) -> Bitmap {
    let radius = size as f32 / 2.0;
    fill(size, color, |x, y| {
        let (dx, dy) = (x - radius, y - radius);
        dx * dx + dy * dy <= radius * radius
    })
}

pub fn square_bitmap(color: Color, size: u32) -> Bitmap {
    fill(size, color, |_, _| true)
}

/// Triangle with a corner at the origin and its far edge cut at 15° from
/// each axis, so it reads as equilateral when spun
pub fn triangle_bitmap(color: Color, size: u32) -> Bitmap {
    let s = size as f32;
    let p = 15f32.to_radians().tan() * s;
    let (a, b, c) = ((0.0, 0.0), (s, p), (p, s));
    fill(size, color, |x, y| {
        let d1 = edge(a, b, (x, y));
        let d2 = edge(b, c, (x, y));
        let d3 = edge(c, a, (x, y));
        let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
        let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
        !(has_neg && has_pos)
    })
}

fn edge(a: (f32, f32), b: (f32, f32), p: (f32, f32)) -> f32 {
    (p.0 - b.0) * (a.1 - b.1) - (a.0 - b.0) * (p.1 - b.1)
}

/// Paint every pixel whose center satisfies `inside`
fn fill(size: u32, color: Color, inside: impl Fn(f32, f32) -> bool) -> Bitmap {
    let rgba = color.to_rgba8();
    let mut bitmap = Bitmap::new(size, size);
    for y in 0..size {
        for x in 0..size {
            if inside(x as f32 + 0.5, y as f32 + 0.5) {
                bitmap.set_pixel(x, y, rgba);
            }
        }
    }
    bitmap
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opaque(bitmap: &Bitmap) -> usize {
        bitmap.pixels().chunks_exact(4).filter(|px| px[3] > 0).count()
    }

    #[test]
    fn three_shapes_per_color() {
        let colors = [Color::from_hex(0xFF0000), Color::from_hex(0x00FF00)];
        let bitmaps = palette_bitmaps(&colors, 12);
        assert_eq!(bitmaps.len(), 6);
        assert!(bitmaps.iter().all(|b| b.width() == 12 && b.height() == 12));
    }

    #[test]
    fn shape_coverage() {
        let red = Color::from_hex(0xFF0000);
        assert_eq!(opaque(&square_bitmap(red, 10)), 100);

        // pi * 5^2 is about 78.5
        let circle = opaque(&circle_bitmap(red, 10));
        assert!((70..=90).contains(&circle));
        assert_eq!(circle_bitmap(red, 10).pixel(0, 0), Some([0, 0, 0, 0]));

        let triangle = triangle_bitmap(red, 12);
        assert_eq!(triangle.pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(triangle.pixel(11, 11), Some([0, 0, 0, 0]));
        assert!(opaque(&triangle) < 144 / 2 + 12);
    }
}
