// Heart-shaped particle flourish for a canvas.
//
// The core (curve, pool, animation) is plain Rust and runs anywhere; the
// `canvas` module binds it to a browser 2D canvas through wasm-bindgen.

mod utils;

pub mod animation;
pub mod canvas;
pub mod color;
pub mod config;
pub mod curve;
pub mod error;
pub mod floating;
pub mod particle;
pub mod pool;
pub mod sprite;
pub mod surface;
pub mod vector;

use wasm_bindgen::prelude::*;

// Use wee_alloc for smaller binaries (optional)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

pub use animation::{Frame, FrameStats, HeartAnimation, StopHandle};
pub use canvas::{HeartCanvas, LoopHandle};
pub use color::Color;
pub use config::Settings;
pub use error::ConfigError;
pub use particle::Particle;
pub use pool::ParticlePool;
pub use sprite::Sprite;
pub use surface::{PixelBuffer, Surface};
pub use vector::Vector;

#[wasm_bindgen]
pub fn initialize() {
    utils::set_panic_hook();
}
