// Randomized parameters for the decorative hearts that drift up the page
// behind the content. The host page turns each one into a CSS-animated
// element; when its animation ends it asks for a fresh one.

use rand::Rng;
use serde::Serialize;

/// Viewports narrower than this get the smaller set of hearts.
pub const NARROW_VIEWPORT: f64 = 768.0;
pub const NARROW_COUNT: usize = 8;
pub const WIDE_COUNT: usize = 15;
/// Delay between creating consecutive hearts at startup.
pub const SPAWN_INTERVAL_MS: f64 = 800.0;

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FloatingHeart {
    pub size_px: f64,
    pub left_percent: f64,
    pub duration_secs: f64,
    pub delay_secs: f64,
    pub opacity: f64,
    pub sway_px: f64,
}

impl FloatingHeart {
    pub fn sample<R: Rng>(rng: &mut R) -> FloatingHeart {
        FloatingHeart {
            size_px: rng.gen_range(10.0, 30.0),
            left_percent: rng.gen_range(0.0, 100.0),
            duration_secs: rng.gen_range(8.0, 18.0),
            delay_secs: rng.gen_range(0.0, 5.0),
            opacity: rng.gen_range(0.2, 0.6),
            sway_px: rng.gen_range(-30.0, 30.0),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledHeart {
    pub spawn_after_ms: f64,
    #[serde(flatten)]
    pub heart: FloatingHeart,
}

pub fn heart_count(viewport_width: f64) -> usize {
    if viewport_width < NARROW_VIEWPORT {
        NARROW_COUNT
    } else {
        WIDE_COUNT
    }
}

/// Initial set of hearts for a viewport, staggered by `SPAWN_INTERVAL_MS`.
pub fn schedule<R: Rng>(viewport_width: f64, rng: &mut R) -> Vec<ScheduledHeart> {
    (0..heart_count(viewport_width))
        .map(|i| ScheduledHeart {
            spawn_after_ms: i as f64 * SPAWN_INTERVAL_MS,
            heart: FloatingHeart::sample(rng),
        })
        .collect()
}
