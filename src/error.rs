//! Error types for heart-particles
//!
//! Every failure here is a configuration mistake caught before the animation
//! starts. Once running, nothing in the frame path can fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("particle capacity must be at least 1")]
    ZeroCapacity,

    #[error("particle duration must be a positive number of seconds, got {0}")]
    InvalidDuration(f64),

    #[error("launch speed must be finite, got {0}")]
    InvalidLaunchSpeed(f64),

    #[error("pull-back factor must be finite, got {0}")]
    InvalidPullBack(f64),

    #[error("sprite size must be at least 1 pixel")]
    ZeroSpriteSize,

    #[error("sprite size {0} exceeds the {max} pixel limit", max = crate::sprite::MAX_SPRITE_SIZE)]
    SpriteTooLarge(u32),

    #[error("invalid color {0:?}, expected #RRGGBB or #RRGGBBAA")]
    InvalidColor(String),

    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
