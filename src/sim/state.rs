//! Session state and core gameplay types

use serde::{Deserialize, Serialize};

use super::port::{EntityId, GroupId, PairingId, TimerId};
use super::spawn::SpawnKind;

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Constructed, scene not created yet
    Loading,
    /// Active gameplay
    Running,
    /// A restart was requested this frame and is about to be applied
    Restarting,
}

/// Why a session restarted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestartCause {
    /// A spider touched the player
    EnemyContact,
    /// The player dropped below the bottom of the world
    FellOut,
}

/// Star tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    Yellow,
    Red,
}

impl PickupKind {
    pub fn points(&self) -> u32 {
        match self {
            PickupKind::Yellow => 1,
            PickupKind::Red => 3,
        }
    }
}

/// Something that happened during a tick, for HUD/audio hooks and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A spawn timer produced an entity
    Spawned { kind: SpawnKind, id: EntityId },
    /// The player fired
    Fired { id: EntityId },
    /// A projectile hit a platform
    ProjectileBlocked { projectile: EntityId },
    /// A projectile killed a spider
    EnemyKilled { enemy: EntityId, projectile: EntityId },
    /// A star was collected; `score` is the new total
    Collected { pickup: PickupKind, id: EntityId, score: u32 },
    /// The scene was torn down and created again
    Restarted { cause: RestartCause },
}

/// What to do when a pairing reports a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactRule {
    /// Resolution only (standing, walking on platforms)
    Land,
    /// Projectile hit ground: remove the projectile
    BlockProjectile,
    /// Spider touched player: restart
    KillPlayer,
    /// Projectile touched spider: remove both
    KillEnemy,
    /// Player touched a star: remove it, add points
    Collect(PickupKind),
}

/// Entity collections of one scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Groups {
    /// Ground segments and clouds
    pub ground: GroupId,
    pub projectiles: GroupId,
    pub enemies: GroupId,
    pub yellow_stars: GroupId,
    pub red_stars: GroupId,
}

impl Groups {
    /// Group a spawned entity joins
    pub fn for_spawn(&self, kind: SpawnKind) -> GroupId {
        match kind {
            // Clouds share the ground group, so they are platforms too
            SpawnKind::Ground | SpawnKind::Cloud => self.ground,
            SpawnKind::Spider => self.enemies,
            SpawnKind::YellowStar => self.yellow_stars,
            SpawnKind::RedStar => self.red_stars,
        }
    }

    pub fn all(&self) -> [GroupId; 5] {
        [
            self.ground,
            self.projectiles,
            self.enemies,
            self.yellow_stars,
            self.red_stars,
        ]
    }
}

/// Handles created by `create`, dropped on restart
#[derive(Debug, Clone)]
pub struct SceneHandles {
    pub player: EntityId,
    pub groups: Groups,
    /// Pairings in registration order with their rule
    pub rules: Vec<(PairingId, ContactRule)>,
    pub timers: Vec<(TimerId, SpawnKind)>,
}

impl SceneHandles {
    pub fn rule(&self, pairing: PairingId) -> Option<ContactRule> {
        self.rules
            .iter()
            .find(|(id, _)| *id == pairing)
            .map(|(_, rule)| *rule)
    }

    pub fn spawn_kind(&self, timer: TimerId) -> Option<SpawnKind> {
        self.timers
            .iter()
            .find(|(id, _)| *id == timer)
            .map(|(_, kind)| *kind)
    }
}
