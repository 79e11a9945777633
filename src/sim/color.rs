//! Color handling: hex round-trips, channel interpolation, and the
//! precomputed progress ramp

use glam::Vec3;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ease::lerp;

/// 8-bit RGB color. Serializes as "#rrggbb" so configs read like CSS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse "#rrggbb"; the leading '#' is optional
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self { r, g, b })
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// CSS rgba() string carrying an explicit alpha
    pub fn to_css_alpha(self, alpha: f32) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, alpha)
    }

    /// Channels as 0..=255 floats, for smoothing across frames
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.r as f32, self.g as f32, self.b as f32)
    }

    /// Inverse of [`Rgb::to_vec3`]; channels are rounded to the nearest step
    pub fn from_vec3(v: Vec3) -> Self {
        Self {
            r: v.x.round() as u8,
            g: v.y.round() as u8,
            b: v.z.round() as u8,
        }
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgb::from_hex(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid hex color: {s}")))
    }
}

/// Per-channel linear interpolation, t clamped to [0, 1]
pub fn color_lerp(a: Rgb, b: Rgb, t: f32) -> Rgb {
    Rgb {
        r: lerp(a.r as f32, b.r as f32, t).round() as u8,
        g: lerp(a.g as f32, b.g as f32, t).round() as u8,
        b: lerp(a.b as f32, b.b as f32, t).round() as u8,
    }
}

/// Gradient between two colors, precomputed once so per-frame sampling is an
/// index instead of an interpolation
#[derive(Debug, Clone)]
pub struct ColorRamp {
    colors: Vec<Rgb>,
}

impl ColorRamp {
    /// Build a ramp of `steps` + 1 entries. `timing` reshapes the parameter
    /// before interpolation; pass the identity for a linear ramp.
    pub fn generate(a: Rgb, b: Rgb, steps: u32, timing: impl Fn(f32) -> f32) -> Self {
        let mut colors = Vec::with_capacity(steps as usize + 1);
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            colors.push(color_lerp(a, b, timing(t)));
        }
        Self { colors }
    }

    /// Nearest ramp entry for a ratio in [0, 1]
    pub fn sample(&self, ratio: f32) -> Rgb {
        let last = self.colors.len() - 1;
        let index = (ratio * last as f32).round().clamp(0.0, last as f32) as usize;
        self.colors[index]
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
