//! Headless arcade physics
//!
//! A minimal `ScenePort` host: boxes with explicit velocity and per-body
//! gravity, semi-implicit Euler integration, minimum-axis separation for
//! colliders. Enough to run and test the game without a renderer.

use std::collections::HashMap;

use glam::Vec2;

use super::animation::{AnimationClip, AnimationPlayer};
use super::collision::{Aabb, Touching, aabb_collision, contact_sides, stop_along};
use crate::consts::{FRAME_MS, MAX_STEP_MS, MAX_SUBSTEPS};

use super::port::{
    AnimationState, Contact, EntityId, GroupConfig, GroupId, PairMode, PairingId, ScenePort,
    StepEvents, Target, Texture, TimerId,
};

/// A sprite with a physics body
#[derive(Debug, Clone)]
struct Body {
    id: EntityId,
    texture: Texture,
    group: Option<GroupId>,
    pos: Vec2,
    size: Vec2,
    vel: Vec2,
    gravity_y: f32,
    immovable: bool,
    allow_gravity: bool,
    touching: Touching,
    anim: AnimationPlayer,
}

impl Body {
    fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }
}

#[derive(Debug, Clone, Copy)]
struct Pairing {
    id: PairingId,
    a: Target,
    b: Target,
    mode: PairMode,
}

#[derive(Debug, Clone, Copy)]
struct Timer {
    id: TimerId,
    delay_ms: f64,
    elapsed_ms: f64,
}

/// Headless world implementing `ScenePort`
#[derive(Debug, Default)]
pub struct ArcadeWorld {
    now_ms: f64,
    /// Sorted by id (ids are allocated increasingly)
    bodies: Vec<Body>,
    groups: Vec<(GroupId, GroupConfig)>,
    pairings: Vec<Pairing>,
    timers: Vec<Timer>,
    clips: HashMap<String, AnimationClip>,
    score_text: String,
    // Ids are never reused, not even across reset
    next_entity: EntityId,
    next_handle: u32,
}

impl ArcadeWorld {
    pub fn new() -> Self {
        Self {
            next_entity: 1,
            next_handle: 1,
            ..Default::default()
        }
    }

    /// Current score overlay text
    pub fn score_text(&self) -> &str {
        &self.score_text
    }

    /// Registered clip, if any
    pub fn clip(&self, key: &str) -> Option<&AnimationClip> {
        self.clips.get(key)
    }

    /// Teleport a sprite (debug/testing)
    pub fn set_position(&mut self, id: EntityId, pos: Vec2) {
        if let Some(body) = self.body_mut(id) {
            body.pos = pos;
        }
    }

    /// Number of live sprites using `texture`
    pub fn count_texture(&self, texture: Texture) -> usize {
        self.bodies.iter().filter(|b| b.texture == texture).count()
    }

    /// All live sprite ids
    pub fn entity_ids(&self) -> Vec<EntityId> {
        self.bodies.iter().map(|b| b.id).collect()
    }

    fn next_handle(&mut self) -> u32 {
        let id = self.next_handle;
        self.next_handle += 1;
        id
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.bodies.binary_search_by_key(&id, |b| b.id).ok()
    }

    fn body(&self, id: EntityId) -> Option<&Body> {
        self.index_of(id).map(|i| &self.bodies[i])
    }

    fn body_mut(&mut self, id: EntityId) -> Option<&mut Body> {
        self.index_of(id).map(move |i| &mut self.bodies[i])
    }

    fn resolve_target(&self, target: Target) -> Vec<EntityId> {
        match target {
            Target::Entity(id) if self.exists(id) => vec![id],
            Target::Entity(_) => Vec::new(),
            Target::Group(group) => self.members(group),
        }
    }

    fn fire_timers(&mut self, dt_ms: f64, fired: &mut Vec<TimerId>) {
        for timer in &mut self.timers {
            timer.elapsed_ms += dt_ms;
            while timer.elapsed_ms >= timer.delay_ms {
                timer.elapsed_ms -= timer.delay_ms;
                fired.push(timer.id);
            }
        }
    }

    fn integrate(&mut self, dt_ms: f64) {
        let dt = (dt_ms / 1000.0) as f32;
        for body in &mut self.bodies {
            body.touching = Touching::none();
            if body.allow_gravity {
                body.vel.y += body.gravity_y * dt;
            }
            body.pos += body.vel * dt;

            if let Some(clip) = self.clips.get(&body.anim.key) {
                body.anim.advance(clip, dt_ms);
            }
        }
    }

    fn run_pairings(&mut self, contacts: &mut Vec<Contact>) {
        for i in 0..self.pairings.len() {
            let pairing = self.pairings[i];
            let left = self.resolve_target(pairing.a);
            let right = self.resolve_target(pairing.b);

            for &a in &left {
                for &b in &right {
                    if a == b {
                        continue;
                    }
                    let (Some(ia), Some(ib)) = (self.index_of(a), self.index_of(b)) else {
                        continue;
                    };
                    let result =
                        aabb_collision(&self.bodies[ia].bounds(), &self.bodies[ib].bounds());
                    if !result.hit {
                        continue;
                    }
                    if pairing.mode == PairMode::Collide {
                        self.separate(ia, ib, result.normal, result.penetration);
                    }
                    contacts.push(Contact {
                        pairing: pairing.id,
                        a,
                        b,
                    });
                }
            }
        }
    }

    /// Push the movable side(s) apart along `normal` (from b toward a).
    ///
    /// A body pushed off an immovable one takes on its velocity along the
    /// normal, so sprites shoved by a drifting platform keep drifting.
    fn separate(&mut self, ia: usize, ib: usize, normal: Vec2, penetration: f32) {
        let (touch_a, touch_b) = contact_sides(normal);
        let push = normal * penetration;
        let (a_fixed, a_vel) = (self.bodies[ia].immovable, self.bodies[ia].vel);
        let (b_fixed, b_vel) = (self.bodies[ib].immovable, self.bodies[ib].vel);

        let (share_a, share_b, surface_a, surface_b) = match (a_fixed, b_fixed) {
            (true, true) => (0.0, 0.0, Vec2::ZERO, Vec2::ZERO),
            (false, true) => (1.0, 0.0, b_vel, Vec2::ZERO),
            (true, false) => (0.0, 1.0, Vec2::ZERO, a_vel),
            (false, false) => {
                let mean = (a_vel + b_vel) / 2.0;
                (0.5, 0.5, mean, mean)
            }
        };

        if share_a > 0.0 {
            let a = &mut self.bodies[ia];
            a.pos += push * share_a;
            a.vel = stop_along(a.vel, normal, surface_a);
        }
        if share_b > 0.0 {
            let b = &mut self.bodies[ib];
            b.pos -= push * share_b;
            b.vel = stop_along(b.vel, -normal, surface_b);
        }

        self.bodies[ia].touching.merge(touch_a);
        self.bodies[ib].touching.merge(touch_b);
    }
}

impl ScenePort for ArcadeWorld {
    fn now(&self) -> f64 {
        self.now_ms
    }

    fn step(&mut self, dt_ms: f64) -> StepEvents {
        let mut events = StepEvents::default();
        if !(dt_ms.is_finite() && dt_ms > 0.0) {
            return events;
        }

        if dt_ms > MAX_STEP_MS {
            log::debug!("Step of {:.0}ms clamped to {:.0}ms", dt_ms, MAX_STEP_MS);
        }
        let dt_ms = dt_ms.min(MAX_STEP_MS);

        self.now_ms += dt_ms;
        self.fire_timers(dt_ms, &mut events.timers);

        let substeps = ((dt_ms / FRAME_MS).ceil() as u32).clamp(1, MAX_SUBSTEPS);
        let slice_ms = dt_ms / substeps as f64;
        let mut found = Vec::new();
        for _ in 0..substeps {
            self.integrate(slice_ms);
            self.run_pairings(&mut found);
            for contact in found.drain(..) {
                if !events.contacts.contains(&contact) {
                    events.contacts.push(contact);
                }
            }
        }
        // Pairing handles are allocated in registration order
        events.contacts.sort_by_key(|c| c.pairing.0);
        events
    }

    fn reset(&mut self) {
        self.bodies.clear();
        self.groups.clear();
        self.pairings.clear();
        self.timers.clear();
        self.clips.clear();
        self.score_text.clear();
    }

    fn add_group(&mut self, config: GroupConfig) -> GroupId {
        let id = GroupId(self.next_handle());
        self.groups.push((id, config));
        id
    }

    fn spawn(&mut self, texture: Texture, pos: Vec2, group: Option<GroupId>) -> EntityId {
        let config = group
            .and_then(|g| self.groups.iter().find(|(id, _)| *id == g))
            .map(|(_, config)| *config)
            .unwrap_or_default();

        let id = self.next_entity;
        self.next_entity += 1;
        self.bodies.push(Body {
            id,
            texture,
            group,
            pos,
            size: texture.size(),
            vel: Vec2::ZERO,
            gravity_y: 0.0,
            immovable: config.immovable,
            allow_gravity: config.allow_gravity,
            touching: Touching::none(),
            anim: AnimationPlayer::default(),
        });
        id
    }

    fn destroy(&mut self, id: EntityId) -> bool {
        match self.index_of(id) {
            Some(i) => {
                self.bodies.remove(i);
                true
            }
            None => false,
        }
    }

    fn exists(&self, id: EntityId) -> bool {
        self.index_of(id).is_some()
    }

    fn texture(&self, id: EntityId) -> Option<Texture> {
        self.body(id).map(|b| b.texture)
    }

    fn position(&self, id: EntityId) -> Option<Vec2> {
        self.body(id).map(|b| b.pos)
    }

    fn bounds(&self, id: EntityId) -> Option<Aabb> {
        self.body(id).map(Body::bounds)
    }

    fn velocity(&self, id: EntityId) -> Option<Vec2> {
        self.body(id).map(|b| b.vel)
    }

    fn set_velocity(&mut self, id: EntityId, vel: Vec2) {
        if let Some(body) = self.body_mut(id) {
            body.vel = vel;
        }
    }

    fn set_gravity_y(&mut self, id: EntityId, gravity: f32) {
        if let Some(body) = self.body_mut(id) {
            body.gravity_y = gravity;
        }
    }

    fn touching(&self, id: EntityId) -> Touching {
        self.body(id).map(|b| b.touching).unwrap_or_default()
    }

    fn members(&self, group: GroupId) -> Vec<EntityId> {
        self.bodies
            .iter()
            .filter(|b| b.group == Some(group))
            .map(|b| b.id)
            .collect()
    }

    fn entity_count(&self) -> usize {
        self.bodies.len()
    }

    fn add_pairing(&mut self, a: Target, b: Target, mode: PairMode) -> PairingId {
        let id = PairingId(self.next_handle());
        self.pairings.push(Pairing { id, a, b, mode });
        id
    }

    fn add_timer(&mut self, delay_ms: f64) -> TimerId {
        let id = TimerId(self.next_handle());
        if delay_ms > 0.0 {
            self.timers.push(Timer {
                id,
                delay_ms,
                elapsed_ms: 0.0,
            });
        } else {
            log::warn!("Ignoring timer with non-positive delay {}", delay_ms);
        }
        id
    }

    fn timer_count(&self) -> usize {
        self.timers.len()
    }

    fn define_animation(&mut self, key: &str, clip: AnimationClip) {
        if self.clips.insert(key.to_string(), clip).is_some() {
            log::warn!("Animation '{}' redefined", key);
        }
    }

    fn play_animation(&mut self, id: EntityId, key: &str, ignore_if_playing: bool) {
        if !self.clips.contains_key(key) {
            log::warn!("Animation '{}' is not defined", key);
            return;
        }
        if let Some(body) = self.body_mut(id) {
            body.anim.play(key, ignore_if_playing);
        }
    }

    fn animation(&self, id: EntityId) -> Option<AnimationState> {
        let body = self.body(id)?;
        Some(AnimationState::from_player(
            &body.anim,
            self.clips.get(&body.anim.key),
        ))
    }

    fn set_score_text(&mut self, text: &str) {
        self.score_text.clear();
        self.score_text.push_str(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 16.0;

    fn platform(world: &mut ArcadeWorld) -> (GroupId, EntityId) {
        let ground = world.add_group(GroupConfig {
            immovable: true,
            allow_gravity: false,
        });
        let id = world.spawn(Texture::Ground, Vec2::new(400.0, 350.0), Some(ground));
        (ground, id)
    }

    #[test]
    fn test_timers_fire_every_period() {
        let mut world = ArcadeWorld::new();
        let fast = world.add_timer(100.0);
        let slow = world.add_timer(250.0);

        let mut fired = Vec::new();
        for _ in 0..10 {
            fired.extend(world.step(50.0).timers);
        }
        // 500ms elapsed
        assert_eq!(fired.iter().filter(|t| **t == fast).count(), 5);
        assert_eq!(fired.iter().filter(|t| **t == slow).count(), 2);

        // A long gap is capped, so the fast timer fires once, not three times
        let events = world.step(300.0);
        assert_eq!(events.timers.iter().filter(|t| **t == fast).count(), 1);
        assert_eq!(world.now(), 500.0 + MAX_STEP_MS);
    }

    #[test]
    fn test_long_step_does_not_tunnel() {
        let mut world = ArcadeWorld::new();
        let (ground, _) = platform(&mut world);
        let dude = world.spawn(Texture::Dude, Vec2::new(400.0, 300.0), None);
        world.set_velocity(dude, Vec2::new(0.0, 600.0));
        world.set_gravity_y(dude, 800.0);
        world.add_pairing(Target::Entity(dude), Target::Group(ground), PairMode::Collide);

        // One 100ms step would carry it 60px, through the 32px slab
        let events = world.step(MAX_STEP_MS);
        assert_eq!(events.contacts.len(), 1);
        assert!(world.touching(dude).down);
        assert!(world.bounds(dude).unwrap().max.y <= 334.0 + 1e-3);
    }

    #[test]
    fn test_pushed_sprite_keeps_platform_drift() {
        let mut world = ArcadeWorld::new();
        let ground = world.add_group(GroupConfig {
            immovable: true,
            allow_gravity: false,
        });
        let stars = world.add_group(GroupConfig::default());
        let drift = Vec2::new(-75.0, 0.0);

        // Star spawned with its left edge inside the platform's right end
        let slab = world.spawn(Texture::Ground, Vec2::new(595.0, 100.0), Some(ground));
        let star = world.spawn(Texture::StarYellow, Vec2::new(800.0, 100.0), Some(stars));
        world.set_velocity(slab, drift);
        world.set_velocity(star, drift);
        world.add_pairing(Target::Group(stars), Target::Group(ground), PairMode::Collide);

        let events = world.step(DT);
        assert_eq!(events.contacts.len(), 1);
        assert!(world.touching(star).left);
        assert_eq!(world.velocity(star), Some(drift));

        let before = world.position(star).unwrap().x;
        for _ in 0..60 {
            world.step(DT);
        }
        assert!(world.position(star).unwrap().x < before - 70.0);
        assert_eq!(world.velocity(star), Some(drift));
    }

    #[test]
    fn test_gravity_and_landing() {
        let mut world = ArcadeWorld::new();
        let (ground, _) = platform(&mut world);
        let dude = world.spawn(Texture::Dude, Vec2::new(400.0, 300.0), None);
        world.set_gravity_y(dude, 800.0);
        let pairing = world.add_pairing(
            Target::Entity(dude),
            Target::Group(ground),
            PairMode::Collide,
        );

        let mut landed = false;
        for _ in 0..60 {
            let events = world.step(DT);
            if events.contacts.iter().any(|c| c.pairing == pairing && c.a == dude) {
                landed = true;
            }
        }
        assert!(landed);
        assert!(world.touching(dude).down);

        // Resting on top: bottom edge within a frame's fall of the ground top
        let bottom = world.bounds(dude).unwrap().max.y;
        assert!((bottom - 334.0).abs() < 1.0, "bottom = {}", bottom);
        assert!(world.velocity(dude).unwrap().y.abs() < 20.0);
    }

    #[test]
    fn test_immovable_group_is_not_pushed() {
        let mut world = ArcadeWorld::new();
        let (ground, slab) = platform(&mut world);
        let dude = world.spawn(Texture::Dude, Vec2::new(400.0, 312.0), None);
        world.add_pairing(Target::Entity(dude), Target::Group(ground), PairMode::Collide);

        world.step(DT);
        assert_eq!(world.position(slab), Some(Vec2::new(400.0, 350.0)));
        assert!(world.position(dude).unwrap().y < 312.0);
    }

    #[test]
    fn test_overlap_reports_without_moving() {
        let mut world = ArcadeWorld::new();
        let stars = world.add_group(GroupConfig::default());
        let dude = world.spawn(Texture::Dude, Vec2::new(100.0, 100.0), None);
        let star = world.spawn(Texture::StarYellow, Vec2::new(105.0, 100.0), Some(stars));
        world.add_pairing(Target::Entity(dude), Target::Group(stars), PairMode::Overlap);

        let events = world.step(DT);
        assert_eq!(events.contacts.len(), 1);
        assert_eq!(events.contacts[0].a, dude);
        assert_eq!(events.contacts[0].b, star);
        assert_eq!(world.position(star), Some(Vec2::new(105.0, 100.0)));
        assert!(!world.touching(dude).any());
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let mut world = ArcadeWorld::new();
        let id = world.spawn(Texture::Bullet, Vec2::ZERO, None);
        assert!(world.destroy(id));
        assert!(!world.destroy(id));
        assert!(!world.exists(id));
        assert_eq!(world.position(id), None);
        assert_eq!(world.touching(id), Touching::none());
    }

    #[test]
    fn test_group_defaults_apply() {
        let mut world = ArcadeWorld::new();
        let (_, slab) = platform(&mut world);
        world.set_gravity_y(slab, 800.0);
        world.set_velocity(slab, Vec2::new(-75.0, 0.0));
        for _ in 0..10 {
            world.step(100.0);
        }
        // No gravity for the ground group, but velocity still moves it
        let pos = world.position(slab).unwrap();
        assert!((pos - Vec2::new(325.0, 350.0)).length() < 1e-3, "pos = {}", pos);
    }

    #[test]
    fn test_reset_clears_everything_but_the_clock() {
        let mut world = ArcadeWorld::new();
        let (ground, slab) = platform(&mut world);
        world.add_timer(100.0);
        world.add_pairing(Target::Entity(slab), Target::Group(ground), PairMode::Overlap);
        world.define_animation("left", AnimationClip::range(0, 3, 10.0, true));
        world.set_score_text("12");
        world.step(DT);

        world.reset();
        assert_eq!(world.entity_count(), 0);
        assert_eq!(world.timer_count(), 0);
        assert!(world.clip("left").is_none());
        assert_eq!(world.score_text(), "");
        assert_eq!(world.now(), DT);
        assert!(world.step(500.0).timers.is_empty());

        // Fresh ids never alias old ones
        let id = world.spawn(Texture::Dude, Vec2::ZERO, None);
        assert!(id > slab);
    }

    #[test]
    fn test_animation_advances_with_step() {
        let mut world = ArcadeWorld::new();
        world.define_animation("left", AnimationClip::range(0, 3, 10.0, true));
        let dude = world.spawn(Texture::Dude, Vec2::ZERO, None);
        world.play_animation(dude, "left", true);
        for _ in 0..5 {
            world.step(50.0);
        }

        let anim = world.animation(dude).unwrap();
        assert_eq!(anim.key, "left");
        assert_eq!(anim.frame, Some(2));
        assert!(anim.playing);

        // Unknown clips are ignored
        world.play_animation(dude, "jump", false);
        assert_eq!(world.animation(dude).unwrap().key, "left");
    }
}
