// Rasterized heart used as the draw primitive for every particle. Built once
// from the curve outline and shared read-only afterwards.

use crate::color::Color;
use crate::curve::{self, OUTLINE_STEP};
use crate::error::{ConfigError, Result};
use crate::vector::Vector;

// Curve units spanned by the sprite's width.
const CURVE_EXTENT: f64 = 350.0;

/// Largest accepted sprite edge, in pixels.
pub const MAX_SPRITE_SIZE: u32 = 1024;

#[derive(Clone, Debug)]
pub struct Sprite {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Sprite {
    pub fn heart(size: u32, color: Color) -> Result<Sprite> {
        check_size(size)?;
        let half = size as f64 / 2.0;
        let scale = size as f64 / CURVE_EXTENT;
        let outline: Vec<Vector> = curve::outline(OUTLINE_STEP)
            .into_iter()
            .map(|p| Vector::new(half + p.x * scale, half - p.y * scale))
            .collect();

        let mut sprite = Sprite {
            width: size,
            height: size,
            pixels: vec![0x00; size as usize * size as usize * 4],
        };
        sprite.fill_polygon(&outline, color);
        Ok(sprite)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Color {
        if x >= self.width || y >= self.height {
            return Color::TRANSPARENT;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        Color {
            r: self.pixels[idx],
            g: self.pixels[idx + 1],
            b: self.pixels[idx + 2],
            a: self.pixels[idx + 3],
        }
    }

    // Even-odd scanline fill sampled at pixel centers. The polygon is closed
    // implicitly from the last point back to the first.
    fn fill_polygon(&mut self, points: &[Vector], color: Color) {
        let mut crossings = Vec::new();
        for row in 0..self.height {
            let y = row as f64 + 0.5;
            crossings.clear();
            for (i, a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                if (a.y <= y && b.y > y) || (b.y <= y && a.y > y) {
                    crossings.push(a.x + (y - a.y) / (b.y - a.y) * (b.x - a.x));
                }
            }
            crossings.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

            for span in crossings.chunks_exact(2) {
                for col in 0..self.width {
                    let x = col as f64 + 0.5;
                    if x >= span[0] && x < span[1] {
                        let idx = (row as usize * self.width as usize + col as usize) * 4;
                        self.pixels[idx..idx + 4].copy_from_slice(&color.to_rgba());
                    }
                }
            }
        }
    }
}

pub(crate) fn check_size(size: u32) -> Result<()> {
    if size == 0 {
        Err(ConfigError::ZeroSpriteSize)
    } else if size > MAX_SPRITE_SIZE {
        Err(ConfigError::SpriteTooLarge(size))
    } else {
        Ok(())
    }
}
