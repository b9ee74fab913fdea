// Drawing surface the animation renders into, plus a software RGBA
// implementation whose bytes can be handed straight to canvas ImageData.

use crate::color::Color;
use crate::sprite::Sprite;

pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Draws `sprite` scaled to `size`x`size` with its top-left corner at
    /// `(x, y)`, faded by `alpha` in `[0, 1]`.
    fn draw_sprite(&mut self, sprite: &Sprite, x: f64, y: f64, size: f64, alpha: f64);

    fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixel_data: Vec<u8>,
}

impl PixelBuffer {
    /// A buffer whose byte length would not fit in `usize` comes out
    /// zero-sized, so it is skipped when drawing.
    pub fn new(width: u32, height: u32) -> PixelBuffer {
        let mut buffer = PixelBuffer {
            width: 0,
            height: 0,
            pixel_data: Vec::new(),
        };
        buffer.resize(width, height);
        buffer
    }

    /// Reallocates to the new dimensions. Contents are cleared.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == self.width && height == self.height {
            return;
        }
        let (width, height, len) = match byte_len(width, height) {
            Some(len) => (width, height, len),
            None => {
                tracing::warn!(width, height, "pixel buffer too large, rendering disabled");
                (0, 0, 0)
            }
        };
        self.width = width;
        self.height = height;
        self.pixel_data = vec![0x00; len];
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixel_data
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.get_pixel_index(x, y).map(|idx| Color {
            r: self.pixel_data[idx],
            g: self.pixel_data[idx + 1],
            b: self.pixel_data[idx + 2],
            a: self.pixel_data[idx + 3],
        })
    }

    fn get_pixel_index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && (x as u32) < self.width && y >= 0 && (y as u32) < self.height {
            Some((y as usize * self.width as usize + x as usize) * 4)
        } else {
            None
        }
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(idx) = self.get_pixel_index(x, y) {
            self.pixel_data[idx..idx + 4].copy_from_slice(&color.to_rgba());
        }
    }

    // Pixel span covered by [start, start + len), clipped to [0, limit).
    fn covered(start: f64, len: f64, limit: u32) -> (i32, i32) {
        let first = start.floor().max(0.0);
        let last = (start + len).ceil().min(limit as f64);
        (first as i32, last as i32)
    }
}

fn byte_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(4)
}

impl Surface for PixelBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let (x0, x1) = PixelBuffer::covered(x, width, self.width);
        let (y0, y1) = PixelBuffer::covered(y, height, self.height);
        for pixel_y in y0..y1 {
            for pixel_x in x0..x1 {
                self.set_pixel(pixel_x, pixel_y, Color::TRANSPARENT);
            }
        }
    }

    fn draw_sprite(&mut self, sprite: &Sprite, x: f64, y: f64, size: f64, alpha: f64) {
        if !(size > 0.0) || !(alpha > 0.0) || !x.is_finite() || !y.is_finite() {
            return;
        }
        let (x0, x1) = PixelBuffer::covered(x, size, self.width);
        let (y0, y1) = PixelBuffer::covered(y, size, self.height);
        for pixel_y in y0..y1 {
            let v = (pixel_y as f64 + 0.5 - y) / size;
            if v < 0.0 || v >= 1.0 {
                continue;
            }
            let src_y = (v * sprite.height() as f64) as u32;
            for pixel_x in x0..x1 {
                let u = (pixel_x as f64 + 0.5 - x) / size;
                if u < 0.0 || u >= 1.0 {
                    continue;
                }
                let src = sprite.pixel((u * sprite.width() as f64) as u32, src_y);
                if src.a == 0 {
                    continue;
                }
                if let Some(dst) = self.pixel(pixel_x, pixel_y) {
                    self.set_pixel(pixel_x, pixel_y, src.over(dst, alpha));
                }
            }
        }
    }
}
