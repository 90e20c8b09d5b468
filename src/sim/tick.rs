//! Per-frame update
//!
//! One call per rendered frame: advance the port, run spawn and contact rules,
//! then map input to motion in a fixed order (move, jump, climb, fire,
//! fall-out check).

use glam::Vec2;

use super::port::{EntityId, ScenePort, Texture};
use super::session::{Session, anim};
use super::spawn::SpawnDice;
use super::state::{GameEvent, RestartCause, SessionPhase};
use crate::consts::WORLD_HEIGHT;

/// Keys held this frame (level-sensed)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    /// Space
    pub fire: bool,
}

impl<P: ScenePort, D: SpawnDice> Session<P, D> {
    /// Advance the session by one frame of `dt_ms` milliseconds
    pub fn tick(&mut self, input: &TickInput, dt_ms: f64) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.phase == SessionPhase::Loading {
            log::warn!("tick() before start(), ignoring");
            return events;
        }

        let step = self.port.step(dt_ms);
        for timer in step.timers {
            self.on_timer(timer, &mut events);
        }
        for contact in step.contacts {
            self.on_contact(contact, &mut events);
        }
        if self.apply_restart(&mut events) {
            return events;
        }

        self.update(input, &mut events);
        if self.apply_restart(&mut events) {
            return events;
        }

        self.reclaim_offscreen();
        events
    }

    fn update(&mut self, input: &TickInput, events: &mut Vec<GameEvent>) {
        let Some(player) = self.player() else {
            return;
        };
        let speed = self.tuning.dude_speed;

        // Basic movement. Idle reuses the right-run clip.
        if input.left {
            self.port.set_velocity_x(player, -speed);
            self.port.play_animation(player, anim::LEFT, true);
        } else if input.right {
            self.port.set_velocity_x(player, speed);
            self.port.play_animation(player, anim::RIGHT, true);
        } else {
            self.port.set_velocity_x(player, 0.0);
            self.port.play_animation(player, anim::RIGHT, true);
        }

        let touching = self.port.touching(player);

        // Jump
        if input.up && touching.down {
            self.port.set_velocity_y(player, self.tuning.jump_velocity());
        }

        // Climb
        if input.up && touching.side() {
            self.port.set_velocity_y(player, self.tuning.climb_velocity());
        }

        // Shoot
        if input.fire {
            self.try_fire(player, events);
        }

        // Game over
        if let Some(pos) = self.port.position(player)
            && pos.y > WORLD_HEIGHT
        {
            self.request_restart(RestartCause::FellOut);
        }
    }

    fn try_fire(&mut self, player: EntityId, events: &mut Vec<GameEvent>) {
        let now = self.port.now();
        if now < self.next_fire_at {
            return;
        }
        let (Some(groups), Some(pos)) = (self.groups(), self.port.position(player)) else {
            return;
        };

        self.next_fire_at = now + self.tuning.weapon_fire_rate_ms;
        let spawn_at = pos + Vec2::new(self.tuning.projectile_offset_x, 0.0);
        let id = self
            .port
            .spawn(Texture::Bullet, spawn_at, Some(groups.projectiles));
        self.port
            .set_velocity(id, Vec2::new(self.tuning.projectile_speed(), 0.0));
        events.push(GameEvent::Fired { id });
    }
}
