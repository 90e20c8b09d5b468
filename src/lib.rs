//! Star Dash - A side-scrolling arcade runner
//!
//! Core modules:
//! - `sim`: Gameplay simulation (session controller, scene port, headless arcade world)
//! - `settings`: Display surface settings
//! - `tuning`: Data-driven game balance

pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::{ScaleMode, Settings, Viewport};
pub use tuning::{Chance, SpawnRule, SpawnTable, Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Logical world dimensions
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 600.0;

    /// Default frame duration for the headless runner (60 Hz, in ms)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Longest step the world accepts; anything beyond is dropped
    pub const MAX_STEP_MS: f64 = 100.0;
    /// Maximum physics substeps per step to prevent tunnelling
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Player spritesheet frame size
    pub const DUDE_WIDTH: f32 = 32.0;
    pub const DUDE_HEIGHT: f32 = 48.0;

    /// Platform and decoration sizes
    pub const GROUND_WIDTH: f32 = 400.0;
    pub const GROUND_HEIGHT: f32 = 32.0;
    pub const CLOUD_WIDTH: f32 = 128.0;
    pub const CLOUD_HEIGHT: f32 = 48.0;

    /// Hazards, pickups, projectiles
    pub const SPIDER_SIZE: f32 = 32.0;
    pub const STAR_WIDTH: f32 = 24.0;
    pub const STAR_HEIGHT: f32 = 22.0;
    pub const BULLET_WIDTH: f32 = 16.0;
    pub const BULLET_HEIGHT: f32 = 8.0;

    /// Ground and clouds spawn this far past the right edge
    pub const PLATFORM_SPAWN_OFFSET: f32 = 200.0;

    /// Playback rate shared by all player clips
    pub const ANIMATION_FPS: f32 = 10.0;
}

/// Centre of the logical world
#[inline]
pub fn world_center() -> Vec2 {
    Vec2::new(consts::WORLD_WIDTH / 2.0, consts::WORLD_HEIGHT / 2.0)
}
