// Simple color struct, created from an unsigned 32 representing RRGGBBAA
// or from a CSS-style hex string
use crate::error::ConfigError;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };

    pub fn from_u32(num: u32) -> Color {
        let r = (num >> 24) as u8;
        let g = (num >> 16) as u8;
        let b = (num >> 8) as u8;
        let a = num as u8;

        Color { r, g, b, a }
    }

    /// Parses `#RRGGBB` or `#RRGGBBAA`.
    pub fn from_hex(hex: &str) -> Result<Color, ConfigError> {
        let invalid = || ConfigError::InvalidColor(hex.to_owned());
        let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let value = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
        match digits.len() {
            6 => Ok(Color::from_u32((value << 8) | 0xff)),
            8 => Ok(Color::from_u32(value)),
            _ => Err(invalid()),
        }
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    // Source-over compositing of self, faded by `opacity`, onto `dst`.
    // Both colors are straight (non-premultiplied) alpha like canvas ImageData.
    pub fn over(self, dst: Color, opacity: f64) -> Color {
        let src_a = (self.a as f64 / 255.0) * opacity.max(0.0).min(1.0);
        if src_a <= 0.0 {
            return dst;
        }
        let dst_a = dst.a as f64 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        let channel = |s: u8, d: u8| {
            let c = (s as f64 * src_a + d as f64 * dst_a * (1.0 - src_a)) / out_a;
            c.round().max(0.0).min(255.0) as u8
        };

        Color {
            r: channel(self.r, dst.r),
            g: channel(self.g, dst.g),
            b: channel(self.b, dst.b),
            a: (out_a * 255.0).round().min(255.0) as u8,
        }
    }
}
