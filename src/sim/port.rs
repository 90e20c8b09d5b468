//! Scene/physics port
//!
//! The session drives the world only through `ScenePort`. Anything that can
//! create sprites, move them, pair them for collision and run timers can host
//! the game; `ArcadeWorld` is the headless implementation used by tests and
//! the native runner.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::animation::{AnimationClip, AnimationPlayer};
use super::collision::{Aabb, Touching};
use crate::consts::*;

/// Sprite handle
pub type EntityId = u32;

/// Image a sprite is created from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Texture {
    Dude,
    Ground,
    Cloud,
    Spider,
    StarYellow,
    StarRed,
    Bullet,
}

impl Texture {
    /// Body size in logical pixels
    pub fn size(&self) -> Vec2 {
        match self {
            Texture::Dude => Vec2::new(DUDE_WIDTH, DUDE_HEIGHT),
            Texture::Ground => Vec2::new(GROUND_WIDTH, GROUND_HEIGHT),
            Texture::Cloud => Vec2::new(CLOUD_WIDTH, CLOUD_HEIGHT),
            Texture::Spider => Vec2::splat(SPIDER_SIZE),
            Texture::StarYellow | Texture::StarRed => Vec2::new(STAR_WIDTH, STAR_HEIGHT),
            Texture::Bullet => Vec2::new(BULLET_WIDTH, BULLET_HEIGHT),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Texture::Dude => "dude",
            Texture::Ground => "ground",
            Texture::Cloud => "cloud",
            Texture::Spider => "spider",
            Texture::StarYellow => "star-yellow",
            Texture::StarRed => "star-red",
            Texture::Bullet => "bullet",
        }
    }
}

/// Group handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupId(pub u32);

/// Defaults applied to every sprite created in a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupConfig {
    /// Not pushed by colliders
    pub immovable: bool,
    /// Body gravity is applied
    pub allow_gravity: bool,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            immovable: false,
            allow_gravity: true,
        }
    }
}

/// One side of a collision pairing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    Entity(EntityId),
    Group(GroupId),
}

/// What a pairing does on intersection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PairMode {
    /// Separate the bodies, stop motion into the contact, report it
    Collide,
    /// Only report it
    Overlap,
}

/// Pairing handle, returned at registration and echoed in contacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairingId(pub u32);

/// Timer handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerId(pub u32);

/// An intersection found during `step`; `a` belongs to the pairing's first target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub pairing: PairingId,
    pub a: EntityId,
    pub b: EntityId,
}

/// Everything that happened during one `step`, in order
#[derive(Debug, Clone, Default)]
pub struct StepEvents {
    /// Timers that fired (a timer appears once per elapsed period)
    pub timers: Vec<TimerId>,
    /// Contacts in pairing-registration order
    pub contacts: Vec<Contact>,
}

/// Read-only view of a sprite's animation
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationState {
    pub key: String,
    pub frame: Option<u32>,
    pub playing: bool,
}

impl AnimationState {
    pub fn from_player(player: &AnimationPlayer, clip: Option<&AnimationClip>) -> Self {
        Self {
            key: player.key.clone(),
            frame: clip.and_then(|c| player.frame(c)),
            playing: player.playing,
        }
    }
}

/// The engine surface the game session needs
pub trait ScenePort {
    /// Monotonic clock in milliseconds
    fn now(&self) -> f64;

    /// Advance the clock by `dt_ms`: fire timers, integrate bodies, run pairings
    fn step(&mut self, dt_ms: f64) -> StepEvents;

    /// Tear down every sprite, group, pairing, timer, clip and text
    fn reset(&mut self);

    // === Sprites ===

    fn add_group(&mut self, config: GroupConfig) -> GroupId;

    /// Create a sprite centred at `pos`, optionally as a group member
    fn spawn(&mut self, texture: Texture, pos: Vec2, group: Option<GroupId>) -> EntityId;

    /// Remove a sprite. Returns false if it was already gone.
    fn destroy(&mut self, id: EntityId) -> bool;

    fn exists(&self, id: EntityId) -> bool;

    fn texture(&self, id: EntityId) -> Option<Texture>;

    fn position(&self, id: EntityId) -> Option<Vec2>;

    fn bounds(&self, id: EntityId) -> Option<Aabb>;

    fn velocity(&self, id: EntityId) -> Option<Vec2>;

    fn set_velocity(&mut self, id: EntityId, vel: Vec2);

    fn set_velocity_x(&mut self, id: EntityId, vx: f32) {
        if let Some(vel) = self.velocity(id) {
            self.set_velocity(id, Vec2::new(vx, vel.y));
        }
    }

    fn set_velocity_y(&mut self, id: EntityId, vy: f32) {
        if let Some(vel) = self.velocity(id) {
            self.set_velocity(id, Vec2::new(vel.x, vy));
        }
    }

    /// Body-local gravity (px/s², downward)
    fn set_gravity_y(&mut self, id: EntityId, gravity: f32);

    /// Contact sides from the most recent step
    fn touching(&self, id: EntityId) -> Touching;

    /// Live members of a group, in creation order
    fn members(&self, group: GroupId) -> Vec<EntityId>;

    /// Number of live sprites
    fn entity_count(&self) -> usize;

    // === Collision ===

    fn add_pairing(&mut self, a: Target, b: Target, mode: PairMode) -> PairingId;

    // === Timers ===

    /// Repeating timer firing every `delay_ms`
    fn add_timer(&mut self, delay_ms: f64) -> TimerId;

    fn timer_count(&self) -> usize;

    // === Animation ===

    fn define_animation(&mut self, key: &str, clip: AnimationClip);

    fn play_animation(&mut self, id: EntityId, key: &str, ignore_if_playing: bool);

    fn animation(&self, id: EntityId) -> Option<AnimationState>;

    // === Overlay ===

    fn set_score_text(&mut self, text: &str);
}
