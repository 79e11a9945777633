//! Wormhole - a pointer-reactive canvas background animation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, node graph, shockwave, timers)
//! - `renderer`: Surface capability, scene paint pass, Canvas2D backend (wasm)
//! - `settings`: Data-driven animation tuning

pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{Config, EntityShape};
pub use sim::{FrameInput, Wormhole};

use glam::Vec2;

/// Structural animation constants
pub mod consts {
    /// Target frame duration (60 Hz); every per-frame delta scales by elapsed/target
    pub const TARGET_FRAME_MS: f32 = 1000.0 / 60.0;
    /// Virtual progress counter resolution; progress = round(virtual) / precision
    pub const ENTITY_PRECISION: f32 = 5000.0;
    /// Color ramp steps (the ramp holds steps + 1 entries)
    pub const COLOR_PRECISION: u32 = 255 * 2;
    /// Pixel-area floor for the performance-driven resolution downscale
    pub const MINIMUM_RESOLUTION: f32 = 1280.0 * 720.0;
    /// Reference min-dimension that the screen scale normalizes against
    pub const TARGET_SCREEN_SIZE: f32 = 1080.0;
    /// Footprints at or below this many pixels skip their draw call
    pub const ENTITY_MIN_DRAW_SIZE: f32 = 10.0;
}

/// Polar offset with the angle in degrees measured from the +Y axis
#[inline]
pub fn polar_offset(angle_deg: f32, radius: f32) -> Vec2 {
    let rad = angle_deg.to_radians();
    Vec2::new(rad.sin() * radius, rad.cos() * radius)
}
