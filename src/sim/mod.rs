//! Gameplay simulation module
//!
//! All gameplay logic lives here and talks to the world only through
//! `ScenePort`:
//! - Fixed per-frame order (step, spawns, contacts, input, cleanup)
//! - Seeded RNG only
//! - Stable iteration order (by entity ID, pairings by registration)
//! - No rendering or platform dependencies

pub mod animation;
pub mod collision;
pub mod port;
pub mod session;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod world;

#[cfg(test)]
pub(crate) mod testing;

pub use animation::{AnimationClip, AnimationPlayer};
pub use collision::{Aabb, CollisionResult, Touching, aabb_collision};
pub use port::{
    AnimationState, Contact, EntityId, GroupConfig, GroupId, PairMode, PairingId, ScenePort,
    StepEvents, Target, Texture, TimerId,
};
pub use session::{INITIAL_GROUND, Session};
pub use spawn::{SpawnDice, SpawnKind};
pub use state::{GameEvent, PickupKind, RestartCause, SessionPhase};
pub use tick::TickInput;
pub use world::ArcadeWorld;
