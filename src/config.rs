// Animation settings. Deserialized from JSON handed over by the host page,
// then validated before anything is allocated.

use serde::Deserialize;

use crate::color::Color;
use crate::error::{ConfigError, Result};
use crate::sprite::check_size;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct Settings {
    /// Pool size, the most particles alive at once.
    pub capacity: usize,
    /// Particle lifetime in seconds.
    pub duration: f64,
    /// Launch speed in pixels per second.
    pub launch_speed: f64,
    /// Acceleration as a multiple of launch velocity. Negative values pull
    /// particles back toward the emission center.
    pub pull_back_factor: f64,
    /// Width and height of the rasterized heart sprite, in pixels.
    pub sprite_size: u32,
    pub color: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            capacity: 500,
            duration: 3.0,
            launch_speed: 100.0,
            pull_back_factor: -0.75,
            sprite_size: 13,
            color: "#FF5CA4".to_owned(),
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Settings> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity < 1 {
            return Err(ConfigError::ZeroCapacity);
        }
        validate_duration(self.duration)?;
        if !self.launch_speed.is_finite() {
            return Err(ConfigError::InvalidLaunchSpeed(self.launch_speed));
        }
        if !self.pull_back_factor.is_finite() {
            return Err(ConfigError::InvalidPullBack(self.pull_back_factor));
        }
        check_size(self.sprite_size)?;
        self.sprite_color().map(|_| ())
    }

    pub fn sprite_color(&self) -> Result<Color> {
        Color::from_hex(&self.color)
    }

    /// Particles per second so the whole pool turns over once per `duration`.
    pub fn emission_rate(&self) -> f64 {
        self.capacity as f64 / self.duration
    }
}

pub(crate) fn validate_duration(duration: f64) -> Result<()> {
    if duration.is_finite() && duration > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidDuration(duration))
    }
}
