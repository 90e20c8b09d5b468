//! Shared helpers for simulation tests

use super::port::{EntityId, ScenePort};
use super::session::Session;
use super::spawn::SpawnDice;
use super::state::GameEvent;
use super::tick::TickInput;
use super::world::ArcadeWorld;
use crate::consts::MAX_STEP_MS;
use crate::tuning::{Chance, Tuning};

/// Dice with a fixed answer
#[derive(Debug, Clone, Copy)]
pub struct FixedDice {
    pub spawn: bool,
    /// Where in `[lo, hi)` ranges land
    pub fraction: f32,
}

impl FixedDice {
    pub fn always() -> Self {
        Self {
            spawn: true,
            fraction: 0.5,
        }
    }

    pub fn never() -> Self {
        Self {
            spawn: false,
            fraction: 0.5,
        }
    }
}

impl SpawnDice for FixedDice {
    fn roll(&mut self, _chance: Chance) -> bool {
        self.spawn
    }

    fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.fraction
    }
}

/// Unstarted session whose timers always spawn
pub fn forced_session() -> Session<ArcadeWorld, FixedDice> {
    Session::new(ArcadeWorld::new(), FixedDice::always(), Tuning::default())
}

pub fn idle() -> TickInput {
    TickInput::default()
}

/// Tick in steps the world takes whole until `total_ms` has passed
pub fn run_for(
    session: &mut Session<ArcadeWorld, FixedDice>,
    input: &TickInput,
    total_ms: f64,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let mut left = total_ms;
    while left > 0.0 {
        let dt = left.min(MAX_STEP_MS);
        events.extend(session.tick(input, dt));
        left -= dt;
    }
    events
}

/// Let the player drop onto the first platform (30 frames, before any timer)
pub fn settle(session: &mut Session<ArcadeWorld, FixedDice>) {
    for _ in 0..30 {
        session.tick(&idle(), 16.0);
    }
    let player = session.player().expect("session started");
    assert!(session.port().touching(player).down, "player did not land");
}

/// Switch off the player's gravity so it hangs at its spawn point
pub fn float_player(session: &mut Session<ArcadeWorld, FixedDice>) -> EntityId {
    let player = session.player().expect("session started");
    session.port_mut().set_gravity_y(player, 0.0);
    player
}
