//! Display settings
//!
//! The game renders at a fixed logical resolution which the host scales into
//! whatever viewport it has.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{WORLD_HEIGHT, WORLD_WIDTH};

/// How the logical surface maps onto the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ScaleMode {
    /// Uniform scale so the whole surface is visible (letterboxed)
    #[default]
    Fit,
    /// Stretch to fill, ignoring aspect ratio
    Stretch,
    /// No scaling
    None,
}

impl ScaleMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScaleMode::Fit => "Fit",
            ScaleMode::Stretch => "Stretch",
            ScaleMode::None => "None",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fit" => Some(ScaleMode::Fit),
            "stretch" | "fill" => Some(ScaleMode::Stretch),
            "none" => Some(ScaleMode::None),
            _ => None,
        }
    }
}

/// Placement of the logical surface inside a viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Per-axis scale from logical to viewport pixels
    pub scale: Vec2,
    /// Top-left corner of the surface in viewport pixels
    pub offset: Vec2,
}

impl Viewport {
    /// Map a viewport point back to logical coordinates
    pub fn to_logical(&self, point: Vec2) -> Vec2 {
        (point - self.offset) / self.scale
    }
}

/// Display preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Logical surface width
    pub width: f32,
    /// Logical surface height
    pub height: f32,
    pub scale_mode: ScaleMode,
    /// Center the surface in the viewport
    pub auto_center: bool,
    /// Nearest-neighbor sampling
    pub pixel_art: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
            scale_mode: ScaleMode::Fit,
            auto_center: true,
            pixel_art: true,
        }
    }
}

impl Settings {
    /// Compute scale and offset for a viewport of the given size
    pub fn fit(&self, viewport_w: f32, viewport_h: f32) -> Viewport {
        let scale = match self.scale_mode {
            ScaleMode::Fit => {
                let s = (viewport_w / self.width).min(viewport_h / self.height);
                Vec2::splat(s)
            }
            ScaleMode::Stretch => Vec2::new(viewport_w / self.width, viewport_h / self.height),
            ScaleMode::None => Vec2::ONE,
        };

        let offset = if self.auto_center {
            let size = Vec2::new(self.width, self.height) * scale;
            (Vec2::new(viewport_w, viewport_h) - size) / 2.0
        } else {
            Vec2::ZERO
        };

        Viewport { scale, offset }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_letterboxes_wide_viewport() {
        let vp = Settings::default().fit(1600.0, 900.0);
        assert_eq!(vp.scale, Vec2::splat(1.5));
        // 800 * 1.5 = 1200 wide, centered in 1600
        assert_eq!(vp.offset, Vec2::new(200.0, 0.0));
    }

    #[test]
    fn test_fit_without_centering() {
        let settings = Settings {
            auto_center: false,
            ..Default::default()
        };
        let vp = settings.fit(400.0, 600.0);
        assert_eq!(vp.scale, Vec2::splat(0.5));
        assert_eq!(vp.offset, Vec2::ZERO);
    }

    #[test]
    fn test_to_logical_inverts_fit() {
        let vp = Settings::default().fit(1600.0, 900.0);
        let p = vp.to_logical(Vec2::new(200.0 + 600.0, 450.0));
        assert_eq!(p, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_scale_mode_parse() {
        assert_eq!(ScaleMode::from_str("FIT"), Some(ScaleMode::Fit));
        assert_eq!(ScaleMode::from_str("fill"), Some(ScaleMode::Stretch));
        assert_eq!(ScaleMode::from_str("zoom"), None);
        assert_eq!(ScaleMode::Stretch.as_str(), "Stretch");
    }
}
