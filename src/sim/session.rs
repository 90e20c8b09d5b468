//! Scene lifecycle
//!
//! A `Session` owns the scene port and everything the game keeps between
//! frames: score, fire cooldown and the handles `create` registered. Restart
//! goes through `ScenePort::reset`, so timers and sprites from the previous run
//! can never leak into the next one.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::animation::AnimationClip;
use super::port::{Contact, EntityId, GroupConfig, PairMode, ScenePort, Target, Texture, TimerId};
use super::spawn::{SpawnDice, SpawnKind};
use super::state::{
    ContactRule, GameEvent, Groups, PickupKind, RestartCause, SceneHandles, SessionPhase,
};
use crate::consts::*;
use crate::tuning::Tuning;
use crate::world_center;

/// Platforms present when a scene starts
pub const INITIAL_GROUND: [Vec2; 2] = [Vec2::new(400.0, 350.0), Vec2::new(700.0, 400.0)];

/// Player animation keys
pub mod anim {
    pub const LEFT: &str = "left";
    pub const TURN: &str = "turn";
    pub const RIGHT: &str = "right";
}

/// One play session
pub struct Session<P: ScenePort, D: SpawnDice = Pcg32> {
    pub(crate) port: P,
    pub(crate) dice: D,
    pub(crate) tuning: Tuning,
    pub(crate) phase: SessionPhase,
    pub(crate) score: u32,
    /// Earliest clock time the next shot is allowed
    pub(crate) next_fire_at: f64,
    pub(crate) scene: Option<SceneHandles>,
    pub(crate) pending_restart: Option<RestartCause>,
    pub(crate) restarts: u32,
}

impl<P: ScenePort> Session<P, Pcg32> {
    /// Session with a seeded RNG (same seed + same inputs = same run)
    pub fn seeded(port: P, tuning: Tuning, seed: u64) -> Self {
        Self::new(port, Pcg32::seed_from_u64(seed), tuning)
    }
}

impl<P: ScenePort, D: SpawnDice> Session<P, D> {
    pub fn new(port: P, dice: D, tuning: Tuning) -> Self {
        Self {
            port,
            dice,
            tuning,
            phase: SessionPhase::Loading,
            score: 0,
            next_fire_at: 0.0,
            scene: None,
            pending_restart: None,
            restarts: 0,
        }
    }

    /// Leave `Loading` and build the first scene
    pub fn start(&mut self) {
        if self.phase != SessionPhase::Loading {
            log::warn!("Session already started");
            return;
        }
        self.create();
        log::info!("Session started at t={}ms", self.port.now());
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn restarts(&self) -> u32 {
        self.restarts
    }

    pub fn next_fire_at(&self) -> f64 {
        self.next_fire_at
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn player(&self) -> Option<EntityId> {
        self.scene.as_ref().map(|s| s.player)
    }

    pub fn groups(&self) -> Option<Groups> {
        self.scene.as_ref().map(|s| s.groups)
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    /// Build a fresh scene: player, score, groups, pairings, clips, timers
    pub(crate) fn create(&mut self) {
        let tuning = &self.tuning;
        let port = &mut self.port;
        let drift = Vec2::new(-tuning.drift_speed(), 0.0);
        let mut rules = Vec::new();

        // Dude
        let player = port.spawn(Texture::Dude, world_center(), None);
        port.set_gravity_y(player, tuning.dude_gravity);

        // Score
        self.score = 0;
        port.set_score_text("0");

        // Ground
        let ground = port.add_group(GroupConfig {
            immovable: true,
            allow_gravity: false,
        });
        for pos in INITIAL_GROUND {
            let id = port.spawn(Texture::Ground, pos, Some(ground));
            port.set_velocity(id, drift);
        }
        let pairing = port.add_pairing(
            Target::Entity(player),
            Target::Group(ground),
            PairMode::Collide,
        );
        rules.push((pairing, ContactRule::Land));

        // Bullets
        let projectiles = port.add_group(GroupConfig {
            immovable: false,
            allow_gravity: false,
        });
        let pairing = port.add_pairing(
            Target::Group(projectiles),
            Target::Group(ground),
            PairMode::Collide,
        );
        rules.push((pairing, ContactRule::BlockProjectile));

        // Spiders
        let enemies = port.add_group(GroupConfig::default());
        let pairing = port.add_pairing(
            Target::Group(enemies),
            Target::Group(ground),
            PairMode::Collide,
        );
        rules.push((pairing, ContactRule::Land));
        let pairing = port.add_pairing(
            Target::Entity(player),
            Target::Group(enemies),
            PairMode::Overlap,
        );
        rules.push((pairing, ContactRule::KillPlayer));
        let pairing = port.add_pairing(
            Target::Group(projectiles),
            Target::Group(enemies),
            PairMode::Overlap,
        );
        rules.push((pairing, ContactRule::KillEnemy));

        // Stars
        let mut star_group = |port: &mut P, kind: PickupKind| {
            let group = port.add_group(GroupConfig::default());
            let pairing = port.add_pairing(
                Target::Group(group),
                Target::Group(ground),
                PairMode::Collide,
            );
            rules.push((pairing, ContactRule::Land));
            let pairing = port.add_pairing(
                Target::Entity(player),
                Target::Group(group),
                PairMode::Overlap,
            );
            rules.push((pairing, ContactRule::Collect(kind)));
            group
        };
        let yellow_stars = star_group(port, PickupKind::Yellow);
        let red_stars = star_group(port, PickupKind::Red);

        // Animations. The right-run clip is deliberately one-shot.
        port.define_animation(anim::LEFT, AnimationClip::range(0, 3, ANIMATION_FPS, true));
        port.define_animation(anim::TURN, AnimationClip::still(4, ANIMATION_FPS));
        port.define_animation(anim::RIGHT, AnimationClip::range(5, 9, ANIMATION_FPS, false));

        // Object generation
        let timers: Vec<(TimerId, SpawnKind)> = SpawnKind::ALL
            .iter()
            .map(|&kind| (port.add_timer(kind.rule(&tuning.spawns).period_ms), kind))
            .collect();

        self.scene = Some(SceneHandles {
            player,
            groups: Groups {
                ground,
                projectiles,
                enemies,
                yellow_stars,
                red_stars,
            },
            rules,
            timers,
        });
        self.pending_restart = None;
        self.phase = SessionPhase::Running;
    }

    /// Ask for a restart at the end of the current frame
    pub(crate) fn request_restart(&mut self, cause: RestartCause) {
        if self.pending_restart.is_none() {
            self.pending_restart = Some(cause);
            self.phase = SessionPhase::Restarting;
        }
    }

    /// Apply a pending restart. Returns true if one happened.
    pub(crate) fn apply_restart(&mut self, events: &mut Vec<GameEvent>) -> bool {
        let Some(cause) = self.pending_restart.take() else {
            return false;
        };
        log::info!(
            "Restarting ({:?}) with score {} after {} restart(s)",
            cause,
            self.score,
            self.restarts
        );
        self.port.reset();
        self.scene = None;
        self.restarts += 1;
        self.create();
        events.push(GameEvent::Restarted { cause });
        true
    }

    /// A spawn timer fired: roll, then place one entity
    pub(crate) fn on_timer(&mut self, timer: TimerId, events: &mut Vec<GameEvent>) {
        let Some(scene) = self.scene.as_ref() else {
            return;
        };
        let Some(kind) = scene.spawn_kind(timer) else {
            return;
        };
        let group = scene.groups.for_spawn(kind);

        let rule = kind.rule(&self.tuning.spawns);
        if !self.dice.roll(rule.chance) {
            return;
        }

        let pos = kind.position(&mut self.dice);
        let id = self.port.spawn(kind.texture(), pos, Some(group));
        self.port.set_velocity(id, kind.velocity(&self.tuning));
        log::debug!("Spawned {:?} #{} at ({:.0}, {:.0})", kind, id, pos.x, pos.y);
        events.push(GameEvent::Spawned { kind, id });
    }

    /// Apply the rule registered for a contact's pairing
    pub(crate) fn on_contact(&mut self, contact: Contact, events: &mut Vec<GameEvent>) {
        let Some(rule) = self.scene.as_ref().and_then(|s| s.rule(contact.pairing)) else {
            return;
        };
        // Either side removed earlier this frame
        if !self.port.exists(contact.a) || !self.port.exists(contact.b) {
            return;
        }

        match rule {
            ContactRule::Land => {}
            ContactRule::BlockProjectile => {
                self.port.destroy(contact.a);
                events.push(GameEvent::ProjectileBlocked {
                    projectile: contact.a,
                });
            }
            ContactRule::KillPlayer => {
                self.request_restart(RestartCause::EnemyContact);
            }
            ContactRule::KillEnemy => {
                self.port.destroy(contact.b);
                self.port.destroy(contact.a);
                log::debug!("Spider #{} shot by #{}", contact.b, contact.a);
                events.push(GameEvent::EnemyKilled {
                    enemy: contact.b,
                    projectile: contact.a,
                });
            }
            ContactRule::Collect(pickup) => {
                self.port.destroy(contact.b);
                self.score += pickup.points();
                self.port.set_score_text(&self.score.to_string());
                log::debug!("Collected {:?} star, score {}", pickup, self.score);
                events.push(GameEvent::Collected {
                    pickup,
                    id: contact.b,
                    score: self.score,
                });
            }
        }
    }

    /// Destroy entities that have left the world for good.
    ///
    /// Everything drifts left or falls, so anything fully past the left edge or
    /// fully below the bottom is gone. Projectiles also leave on the right.
    pub(crate) fn reclaim_offscreen(&mut self) -> usize {
        let Some(groups) = self.groups() else {
            return 0;
        };

        let mut reclaimed = 0;
        for group in groups.all() {
            for id in self.port.members(group) {
                let Some(bounds) = self.port.bounds(id) else {
                    continue;
                };
                let gone = bounds.max.x < 0.0
                    || bounds.min.y > WORLD_HEIGHT
                    || (group == groups.projectiles && bounds.min.x > WORLD_WIDTH);
                if !gone {
                    continue;
                }
                let texture = self.port.texture(id);
                if self.port.destroy(id) {
                    if let Some(texture) = texture {
                        log::trace!("Reclaimed {} #{}", texture.as_str(), id);
                    }
                    reclaimed += 1;
                }
            }
        }
        if reclaimed > 0 {
            log::trace!("Reclaimed {} off-screen entities", reclaimed);
        }
        reclaimed
    }
}
