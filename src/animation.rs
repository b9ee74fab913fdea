// Per-frame driver for the heart effect. Owns the pool, the sprite and the
// RNG so several independent animations can run side by side. The caller
// owns the schedule: call `tick` once per display frame until the
// `StopHandle` is triggered.

use std::cell::Cell;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::Settings;
use crate::curve::{parameter_from_unit, point_on_heart};
use crate::error::Result;
use crate::pool::ParticlePool;
use crate::sprite::Sprite;
use crate::surface::Surface;

/// Cancellation token shared between an animation and whoever schedules it.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Rc<Cell<bool>>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.set(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.get()
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrameStats {
    pub dt: f64,
    pub emitted: usize,
    pub evicted: usize,
    pub active: usize,
    /// False when the surface had zero area and rendering was skipped.
    pub drawn: bool,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Frame {
    Rendered(FrameStats),
    Stopped,
}

pub struct HeartAnimation<R = StdRng> {
    settings: Settings,
    pool: ParticlePool,
    sprite: Sprite,
    rng: R,
    emission_rate: f64,
    // Fractional emissions carried over to the next frame.
    pending: f64,
    last_time: Option<f64>,
    stop: StopHandle,
}

impl HeartAnimation<StdRng> {
    pub fn new(settings: Settings) -> Result<Self> {
        Self::with_rng(settings, StdRng::from_entropy())
    }

    pub fn seeded(settings: Settings, seed: u64) -> Result<Self> {
        Self::with_rng(settings, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> HeartAnimation<R> {
    pub fn with_rng(settings: Settings, rng: R) -> Result<Self> {
        settings.validate()?;
        let pool = ParticlePool::new(settings.capacity, settings.duration, settings.pull_back_factor)?;
        let sprite = Sprite::heart(settings.sprite_size, settings.sprite_color()?)?;
        let emission_rate = settings.emission_rate();
        Ok(HeartAnimation {
            settings,
            pool,
            sprite,
            rng,
            emission_rate,
            pending: 0.0,
            last_time: None,
            stop: StopHandle::default(),
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    pub fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn stop(&self) {
        tracing::debug!(active = self.pool.len(), "heart animation stopped");
        self.stop.stop();
    }

    pub fn is_running(&self) -> bool {
        !self.stop.is_stopped()
    }

    /// Runs one frame at wall-clock time `now` in seconds. The first frame,
    /// and any frame where the clock went backwards or is not finite,
    /// advances by zero.
    pub fn tick<S: Surface>(&mut self, now: f64, surface: &mut S) -> Frame {
        if self.stop.is_stopped() {
            return Frame::Stopped;
        }
        let dt = match self.last_time {
            Some(previous) if now.is_finite() => (now - previous).max(0.0),
            _ => 0.0,
        };
        if now.is_finite() {
            self.last_time = Some(now);
        }
        self.advance(dt, surface)
    }

    /// Runs one frame with an explicit time step: emit, integrate, render.
    /// Negative or non-finite steps advance by zero.
    pub fn advance<S: Surface>(&mut self, dt: f64, surface: &mut S) -> Frame {
        if self.stop.is_stopped() {
            return Frame::Stopped;
        }
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };

        let drawn = !surface.is_empty();
        let (mut emitted, mut evicted) = (0, 0);
        if drawn {
            let (width, height) = (surface.width() as f64, surface.height() as f64);
            surface.clear_rect(0.0, 0.0, width, height);
            let counts = self.emit(dt, width / 2.0, height / 2.0);
            emitted = counts.0;
            evicted = counts.1;
        } else {
            tracing::debug!("surface has zero area, skipping emission and draw");
        }

        self.pool.update(dt);

        if drawn {
            self.pool.draw(surface, &self.sprite);
        }

        let stats = FrameStats {
            dt,
            emitted,
            evicted,
            active: self.pool.len(),
            drawn,
        };
        tracing::trace!(dt, emitted, evicted, active = stats.active, "frame");
        Frame::Rendered(stats)
    }

    // Launches this frame's share of particles around (center_x, center_y).
    // Curve y points up while surface y points down, hence the flips.
    fn emit(&mut self, dt: f64, center_x: f64, center_y: f64) -> (usize, usize) {
        // Capped so a huge step cannot overflow the carry.
        let limit = self.pool.capacity() as f64 + 1.0;
        self.pending = (self.pending + self.emission_rate * dt).min(limit);
        let whole = self.pending.floor();
        self.pending -= whole;
        // Anything past one full pool would be evicted within this frame.
        let count = (whole as usize).min(self.pool.capacity());

        let mut evicted = 0;
        for _ in 0..count {
            let position = point_on_heart(parameter_from_unit(self.rng.gen::<f64>()));
            let direction = position.with_length(self.settings.launch_speed);
            if self.pool.add(
                center_x + position.x,
                center_y - position.y,
                direction.x,
                -direction.y,
            ) {
                evicted += 1;
            }
        }
        (count, evicted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::PixelBuffer;

    fn animation(settings: Settings) -> HeartAnimation {
        HeartAnimation::seeded(settings, 7).unwrap()
    }

    fn stats(frame: Frame) -> FrameStats {
        match frame {
            Frame::Rendered(stats) => stats,
            Frame::Stopped => panic!("animation unexpectedly stopped"),
        }
    }

    #[test]
    fn first_tick_has_zero_dt_and_emits_nothing() {
        let mut anim = animation(Settings::default());
        let mut surface = PixelBuffer::new(400, 400);
        let first = stats(anim.tick(10.0, &mut surface));
        assert_eq!(first.dt, 0.0);
        assert_eq!(first.emitted, 0);
        assert!(anim.pool().is_empty());

        let second = stats(anim.tick(10.5, &mut surface));
        assert_eq!(second.dt, 0.5);
        // 500 / 3 per second for half a second
        assert_eq!(second.emitted, 83);
    }

    #[test]
    fn clock_going_backwards_is_clamped() {
        let mut anim = animation(Settings::default());
        let mut surface = PixelBuffer::new(400, 400);
        anim.tick(5.0, &mut surface);
        let frame = stats(anim.tick(4.0, &mut surface));
        assert_eq!(frame.dt, 0.0);
        assert_eq!(stats(anim.tick(f64::NAN, &mut surface)).dt, 0.0);
        assert_eq!(stats(anim.tick(4.25, &mut surface)).dt, 0.25);
    }

    #[test]
    fn negative_step_does_not_rewind_ages() {
        let mut anim = animation(Settings::default());
        let mut surface = PixelBuffer::new(400, 400);
        anim.advance(0.5, &mut surface);
        let frame = stats(anim.advance(-0.4, &mut surface));
        assert_eq!(frame.dt, 0.0);
        assert_eq!(frame.emitted, 0);
        assert!(anim.pool().iter().all(|p| p.age == 0.5));
    }

    #[test]
    fn nan_step_does_not_stall_emission() {
        let mut anim = animation(Settings::default());
        let mut surface = PixelBuffer::new(400, 400);
        assert_eq!(stats(anim.advance(f64::NAN, &mut surface)).dt, 0.0);
        let emitted: usize = (0..120)
            .map(|_| stats(anim.advance(1.0 / 60.0, &mut surface)).emitted)
            .sum();
        assert!(emitted >= 330 && emitted <= 334, "emitted {}", emitted);
    }

    #[test]
    fn enormous_clock_jump_keeps_emitting() {
        let mut anim = animation(Settings::default());
        let mut surface = PixelBuffer::new(400, 400);
        anim.tick(0.0, &mut surface);
        let jump = stats(anim.tick(1e307, &mut surface));
        assert_eq!(jump.emitted, 500);
        assert_eq!(jump.active, 0);

        let overflow = stats(anim.advance(f64::MAX, &mut surface));
        assert_eq!(overflow.emitted, 500);

        let emitted: usize = (0..120)
            .map(|_| stats(anim.advance(1.0 / 60.0, &mut surface)).emitted)
            .sum();
        assert!(emitted >= 330 && emitted <= 334, "emitted {}", emitted);
    }

    #[test]
    fn fractional_emissions_carry_over() {
        let settings = Settings { capacity: 10, duration: 10.0, ..Settings::default() };
        let mut anim = animation(settings);
        let mut surface = PixelBuffer::new(400, 400);
        // One particle per second, stepped at a quarter second.
        let emitted: Vec<usize> = (0..8)
            .map(|_| stats(anim.advance(0.25, &mut surface)).emitted)
            .collect();
        assert_eq!(emitted, vec![0, 0, 0, 1, 0, 0, 0, 1]);
    }

    #[test]
    fn particles_launch_from_the_heart_outline() {
        let settings = Settings { launch_speed: 100.0, ..Settings::default() };
        let mut anim = animation(settings);
        let mut surface = PixelBuffer::new(400, 300);
        anim.advance(0.5, &mut surface);
        assert!(anim.pool().len() > 50);

        let mut saw_upper = false;
        for particle in anim.pool().iter() {
            let speed = particle.velocity.length();
            // one 0.5s step of pull-back at -0.75 has already been applied
            assert!((speed - 100.0 * (1.0 - 0.375)).abs() < 1e-6);

            let offset_x = particle.position.x - 200.0;
            let offset_y = particle.position.y - 150.0;
            assert!(offset_x.abs() <= 160.0 + 50.0);
            assert!(offset_y.abs() <= 145.0 + 50.0);

            // Moving straight away from the center, with screen y pointing down.
            let (vx, vy) = (particle.velocity.x, particle.velocity.y);
            let cross = offset_x * vy - offset_y * vx;
            let dot = offset_x * vx + offset_y * vy;
            let scale = speed * offset_x.hypot(offset_y);
            assert!(cross.abs() <= 1e-9 * scale);
            assert!(dot > 0.0);

            if offset_y < 0.0 {
                saw_upper = true;
                assert!(vy < 0.0);
            }
        }
        assert!(saw_upper);
    }

    #[test]
    fn zero_area_surface_still_integrates() {
        let mut anim = animation(Settings::default());
        let mut surface = PixelBuffer::new(100, 100);
        anim.advance(0.5, &mut surface);
        let before = anim.pool().len();
        assert!(before > 0);

        surface.resize(0, 0);
        let frame = stats(anim.advance(0.1, &mut surface));
        assert!(!frame.drawn);
        assert_eq!(frame.emitted, 0);
        assert_eq!(anim.pool().len(), before);
        assert!(anim.pool().iter().all(|p| (p.age - 0.6).abs() < 1e-9));
    }

    #[test]
    fn resizing_keeps_the_pool() {
        let mut anim = animation(Settings::default());
        let mut surface = PixelBuffer::new(100, 100);
        anim.advance(0.5, &mut surface);
        let before = anim.pool().len();
        surface.resize(640, 480);
        let frame = stats(anim.advance(0.0, &mut surface));
        assert_eq!(frame.active, before);
    }

    #[test]
    fn stop_handle_ends_the_loop() {
        let mut anim = animation(Settings::default());
        let handle = anim.stop_handle();
        let mut surface = PixelBuffer::new(100, 100);
        assert!(matches!(anim.tick(0.0, &mut surface), Frame::Rendered(_)));
        handle.stop();
        assert!(!anim.is_running());
        assert_eq!(anim.tick(1.0, &mut surface), Frame::Stopped);
        assert_eq!(anim.advance(1.0, &mut surface), Frame::Stopped);
    }

    #[test]
    fn huge_time_steps_emit_at_most_one_pool() {
        let settings = Settings { capacity: 20, duration: 1.0, ..Settings::default() };
        let mut anim = animation(settings);
        let mut surface = PixelBuffer::new(100, 100);
        let frame = stats(anim.advance(0.5, &mut surface));
        assert_eq!(frame.emitted, 10);
        let frame = stats(anim.advance(1000.0, &mut surface));
        assert_eq!(frame.emitted, 20);
        // Everything emitted this frame aged past the lifetime in one step.
        assert_eq!(frame.active, 0);
    }

    #[test]
    fn draws_onto_the_surface() {
        let mut anim = animation(Settings::default());
        let mut surface = PixelBuffer::new(400, 400);
        anim.advance(0.5, &mut surface);
        assert!(surface.pixels().chunks_exact(4).any(|px| px[3] > 0));
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let settings = Settings { duration: 0.0, ..Settings::default() };
        assert!(HeartAnimation::seeded(settings, 1).is_err());
    }
}
