// A single heart fragment. Particles live in pool slots and are reinitialized
// in place; they are never created or dropped individually.

use crate::sprite::Sprite;
use crate::surface::Surface;
use crate::vector::Vector;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Particle {
    pub position: Vector,
    pub velocity: Vector,
    pub acceleration: Vector,
    pub age: f64,
}

impl Particle {
    pub fn initialize(&mut self, x: f64, y: f64, dx: f64, dy: f64, pull_back_factor: f64) {
        self.position = Vector::new(x, y);
        self.velocity = Vector::new(dx, dy);
        self.acceleration = self.velocity.scaled(pull_back_factor);
        self.age = 0.0;
    }

    // Position moves with the old velocity before acceleration is applied.
    pub fn update(&mut self, dt: f64) {
        self.position.x += self.velocity.x * dt;
        self.position.y += self.velocity.y * dt;
        self.velocity.x += self.acceleration.x * dt;
        self.velocity.y += self.acceleration.y * dt;
        self.age += dt;
    }

    /// Draws the sprite centered on the particle, growing with an ease-out
    /// curve and fading linearly over `duration`.
    pub fn draw<S: Surface>(&self, surface: &mut S, sprite: &Sprite, duration: f64) {
        let life = self.age / duration;
        let size = sprite.width() as f64 * ease(life);
        let alpha = 1.0 - life;
        surface.draw_sprite(
            sprite,
            self.position.x - size / 2.0,
            self.position.y - size / 2.0,
            size,
            alpha,
        );
    }
}

/// Ease-out cubic: 0 at 0, 1 at 1, increasing in between.
pub fn ease(t: f64) -> f64 {
    let t = t - 1.0;
    t * t * t + 1.0
}
