// Small 2D vector used for particle positions, velocities and curve points.
// Math is delegated to vecmath's array helpers.

use vecmath::{vec2_len, vec2_normalized, vec2_scale};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Vector {
        Vector { x, y }
    }

    pub fn length(&self) -> f64 {
        vec2_len(self.as_array())
    }

    /// Unit vector in the same direction. The zero vector stays zero.
    pub fn normalized(&self) -> Vector {
        if self.length() == 0.0 {
            return Vector::ZERO;
        }
        Vector::from(vec2_normalized(self.as_array()))
    }

    /// Same direction, rescaled to `length`.
    pub fn with_length(&self, length: f64) -> Vector {
        Vector::from(vec2_scale(self.normalized().as_array(), length))
    }

    pub fn scaled(&self, factor: f64) -> Vector {
        Vector::from(vec2_scale(self.as_array(), factor))
    }

    fn as_array(&self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl From<[f64; 2]> for Vector {
    fn from(v: [f64; 2]) -> Vector {
        Vector { x: v[0], y: v[1] }
    }
}
