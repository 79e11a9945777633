//! Animation tuning
//!
//! Startup configuration for the whole animation. Values are fixed for the
//! lifetime of a [`crate::Wormhole`]; on wasm a JSON override persisted in
//! LocalStorage replaces the defaults at startup.

use serde::{Deserialize, Serialize};

use crate::sim::color::Rgb;

/// Footprint shape drawn for each entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EntityShape {
    /// Rotated ellipse inscribed in the footprint
    #[default]
    Ellipse,
    /// Axis-aligned rectangle (rotation still drives node orbits)
    Rectangle,
}

impl EntityShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityShape::Ellipse => "Ellipse",
            EntityShape::Rectangle => "Rectangle",
        }
    }
}

/// Animation configuration
///
/// Ratios named `*_scale` or `*_distance` are fractions of the internal
/// resolution's smaller dimension unless noted otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // === Entities ===
    /// Concurrent entities cycling through the wormhole
    pub entity_count: usize,
    /// Progress change per target frame, in precision units; negative runs
    /// the cycle inward
    pub entity_speed: f32,
    pub entity_shape: EntityShape,
    /// Footprint aspect multipliers applied to the derived width/height
    pub rectangle_width: f32,
    pub rectangle_height: f32,
    /// Opacity over progress: [breakpoint, start, peak, end]
    pub opacity_curve: [f32; 4],
    /// Rotation over progress in degrees: [breakpoint, start, peak, end]
    pub rotation_curve: [f32; 4],

    // === Node graph ===
    /// Nodes spawned per entity, inclusive range
    pub node_count: [u32; 2],
    /// Degree cap per node during the connection pass
    pub node_max_connections: usize,
    /// Base node radius in pixels at the target screen size
    pub node_size: f32,
    /// Synthetic depth per unit of entity width
    pub node_z_scale: f32,
    /// Normalized distance band for drawing and scoring connections
    pub node_min_distance: f32,
    pub node_max_distance: f32,
    /// Per-node orbit distance, as a fraction of the footprint size
    pub node_distance_range: [f32; 2],
    /// Per-node size multiplier
    pub node_scale_range: [f32; 2],

    // === Shockwave ===
    /// Footprint multiplier at the center of a passing shockwave
    pub shockwave_size_multiplier: f32,
    /// Progress-space reach of the shockwave around its phase
    pub shockwave_max_distance: f32,
    /// Phase speed relative to entity speed
    pub shockwave_speed_multiplier: f32,

    // === Flairs ===
    /// Flairs spawned per entity, inclusive range
    pub flair_count: [u32; 2],
    /// Base flair radius in pixels at the target screen size
    pub flair_size: f32,
    /// Per-flair scale multiplier; also positions each flair's fade peak
    pub flair_scale_range: [f32; 2],
    pub flair_max_alpha: f32,

    // === Colors ===
    /// Entity ramp from progress 0 to 1
    pub color_ramp_start: Rgb,
    pub color_ramp_end: Rgb,
    pub background: Rgb,
    pub edge_color: Rgb,
    pub node_color: Rgb,
    pub flair_color: Rgb,
    /// Per-frame approach rate toward the ramp target; 0 snaps immediately
    pub color_smoothing: f32,

    // === Source point ===
    /// Band the source can travel inside, both axes
    pub source_travel: [f32; 2],
    /// Per-frame approach rate toward the pointer-driven target
    pub source_smoothing: f32,

    // === Cadence ===
    /// Seconds between graph reconnection passes
    pub reconnect_interval: f32,
    /// Seconds between resolution adjustments while frames run off target
    pub framerate_smoothing_interval: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            // Entities
            entity_count: 40,
            entity_speed: -0.25,
            entity_shape: EntityShape::Ellipse,
            rectangle_width: 2.0,
            rectangle_height: 1.3,
            opacity_curve: [0.5, 0.0, 0.7, 0.0],
            rotation_curve: [0.55, -90.0, 420.0, 240.0],

            // Node graph
            node_count: [2, 6],
            node_max_connections: 2,
            node_size: 18.0,
            node_z_scale: 0.15,
            node_min_distance: 0.4,
            node_max_distance: 0.55,
            node_distance_range: [0.4, 1.2],
            node_scale_range: [0.4, 1.1],

            // Shockwave
            shockwave_size_multiplier: 0.75,
            shockwave_max_distance: 0.2,
            shockwave_speed_multiplier: 20.0,

            // Flairs
            flair_count: [1, 3],
            flair_size: 26.0,
            flair_scale_range: [0.3, 0.9],
            flair_max_alpha: 0.5,

            // Colors
            color_ramp_start: Rgb::new(0x0a, 0x28, 0x46),
            color_ramp_end: Rgb::new(0xd2, 0xd2, 0xd2),
            background: Rgb::new(0xc6, 0xda, 0xe4),
            edge_color: Rgb::new(0x56, 0x6d, 0x7e),
            node_color: Rgb::new(0xaf, 0xd1, 0xe5),
            flair_color: Rgb::new(0xe8, 0xf4, 0xfb),
            color_smoothing: 0.15,

            // Source point
            source_travel: [0.3, 0.7],
            source_smoothing: 0.02,

            // Cadence
            reconnect_interval: 1.0,
            framerate_smoothing_interval: 0.5,
        }
    }
}

impl Config {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "wormhole_config";

    /// Load configuration overrides from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(config) => {
                        log::info!("Loaded config from LocalStorage");
                        return config;
                    }
                    Err(err) => {
                        log::warn!("Ignoring malformed config override: {err}");
                    }
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Save the configuration to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Config saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
