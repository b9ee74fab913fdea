// Fixed-capacity ring buffer of particles.
//
// Active particles occupy the circular range starting at `first_active` and
// running `len` slots, so `first_free` is always `first_active + len` mod N.
// Particles share one lifetime and receive identical time steps, so they
// expire in insertion order and only the front of the range ever needs to be
// reclaimed.

use crate::config::validate_duration;
use crate::error::{ConfigError, Result};
use crate::particle::Particle;
use crate::sprite::Sprite;
use crate::surface::Surface;

pub struct ParticlePool {
    particles: Vec<Particle>,
    first_active: usize,
    len: usize,
    duration: f64,
    pull_back_factor: f64,
}

impl ParticlePool {
    pub fn new(capacity: usize, duration: f64, pull_back_factor: f64) -> Result<ParticlePool> {
        if capacity < 1 {
            return Err(ConfigError::ZeroCapacity);
        }
        validate_duration(duration)?;
        tracing::debug!(capacity, duration, "allocated particle pool");
        Ok(ParticlePool {
            particles: vec![Particle::default(); capacity],
            first_active: 0,
            len: 0,
            duration,
            pull_back_factor,
        })
    }

    pub fn capacity(&self) -> usize {
        self.particles.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn first_active(&self) -> usize {
        self.first_active
    }

    pub fn first_free(&self) -> usize {
        (self.first_active + self.len) % self.capacity()
    }

    /// Starts a particle in the next free slot. When the pool is full the
    /// oldest particle is overwritten, whether or not it has expired.
    ///
    /// Returns `true` if a live particle was evicted.
    pub fn add(&mut self, x: f64, y: f64, dx: f64, dy: f64) -> bool {
        let slot = self.first_free();
        self.particles[slot].initialize(x, y, dx, dy, self.pull_back_factor);
        if self.is_full() {
            self.first_active = (self.first_active + 1) % self.capacity();
            true
        } else {
            self.len += 1;
            false
        }
    }

    /// Integrates every active particle, then reclaims the expired ones at
    /// the front of the range.
    pub fn update(&mut self, dt: f64) {
        let (head, tail) = self.active_slices_mut();
        for particle in head.iter_mut().chain(tail.iter_mut()) {
            particle.update(dt);
        }

        while self.len > 0 && self.particles[self.first_active].age >= self.duration {
            self.first_active = (self.first_active + 1) % self.capacity();
            self.len -= 1;
        }
    }

    /// Draws active particles oldest first.
    pub fn draw<S: Surface>(&self, surface: &mut S, sprite: &Sprite) {
        for particle in self.iter() {
            particle.draw(surface, sprite, self.duration);
        }
    }

    /// Active particles in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        let (head, tail) = self.active_slices();
        head.iter().chain(tail.iter())
    }

    // The active range split where it wraps past the end of the array.
    fn active_slices(&self) -> (&[Particle], &[Particle]) {
        let end = self.first_active + self.len;
        if end <= self.capacity() {
            (&self.particles[self.first_active..end], &self.particles[..0])
        } else {
            let wrapped = end - self.capacity();
            (&self.particles[self.first_active..], &self.particles[..wrapped])
        }
    }

    fn active_slices_mut(&mut self) -> (&mut [Particle], &mut [Particle]) {
        let capacity = self.capacity();
        let end = self.first_active + self.len;
        let (front, back) = self.particles.split_at_mut(self.first_active);
        if end <= capacity {
            let (active, _) = back.split_at_mut(self.len);
            (active, &mut front[..0])
        } else {
            (back, &mut front[..end - capacity])
        }
    }
}
