//! Data-driven game balance
//!
//! Everything the session reads for movement, firing and spawning. Loaded from
//! JSON so balance can be tweaked without a rebuild; missing fields fall back
//! to the defaults below.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Probability expressed as a ratio, e.g. 8/11
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chance {
    pub numerator: u32,
    pub denominator: u32,
}

impl Chance {
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Chance that always succeeds
    pub const ALWAYS: Chance = Chance::new(1, 1);
    /// Chance that never succeeds
    pub const NEVER: Chance = Chance::new(0, 1);

    pub fn as_f32(&self) -> f32 {
        if self.denominator == 0 {
            0.0
        } else {
            self.numerator as f32 / self.denominator as f32
        }
    }
}

/// One repeating spawn timer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnRule {
    /// Timer period in milliseconds
    pub period_ms: f64,
    /// Probability that a timer tick actually spawns
    pub chance: Chance,
}

impl SpawnRule {
    pub const fn new(period_ms: f64, chance: Chance) -> Self {
        Self { period_ms, chance }
    }
}

/// The five spawn timers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTable {
    pub ground: SpawnRule,
    pub clouds: SpawnRule,
    pub spiders: SpawnRule,
    pub yellow_stars: SpawnRule,
    pub red_stars: SpawnRule,
}

impl Default for SpawnTable {
    fn default() -> Self {
        // Platforms roll 0..=10 and spawn on <= 7; everything else is a coin flip
        let platform = Chance::new(8, 11);
        let coin = Chance::new(1, 2);
        Self {
            ground: SpawnRule::new(3000.0, platform),
            clouds: SpawnRule::new(2800.0, platform),
            spiders: SpawnRule::new(4000.0, coin),
            yellow_stars: SpawnRule::new(1500.0, coin),
            red_stars: SpawnRule::new(5000.0, coin),
        }
    }
}

impl SpawnTable {
    /// Same periods, every tick spawns (useful for tests and demos)
    pub fn always(&self) -> Self {
        let mut table = *self;
        for rule in table.rules_mut() {
            rule.chance = Chance::ALWAYS;
        }
        table
    }

    fn rules_mut(&mut self) -> [&mut SpawnRule; 5] {
        [
            &mut self.ground,
            &mut self.clouds,
            &mut self.spiders,
            &mut self.yellow_stars,
            &mut self.red_stars,
        ]
    }

    fn rules(&self) -> [(&'static str, &SpawnRule); 5] {
        [
            ("ground", &self.ground),
            ("clouds", &self.clouds),
            ("spiders", &self.spiders),
            ("yellow_stars", &self.yellow_stars),
            ("red_stars", &self.red_stars),
        ]
    }
}

/// Game balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Player gravity (px/s², downward)
    pub dude_gravity: f32,
    /// Player run speed (px/s); world drift is derived from it
    pub dude_speed: f32,
    /// Minimum time between shots (ms)
    pub weapon_fire_rate_ms: f64,
    /// Horizontal offset of a new projectile from the player centre
    pub projectile_offset_x: f32,
    /// Spawn timers
    pub spawns: SpawnTable,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            dude_gravity: 800.0,
            dude_speed: 300.0,
            weapon_fire_rate_ms: 500.0,
            projectile_offset_x: 20.0,
            spawns: SpawnTable::default(),
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the session cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.dude_gravity.is_finite() && self.dude_gravity > 0.0) {
            return Err(TuningError::Invalid("dude_gravity must be positive".into()));
        }
        if !(self.dude_speed.is_finite() && self.dude_speed > 0.0) {
            return Err(TuningError::Invalid("dude_speed must be positive".into()));
        }
        if !(self.weapon_fire_rate_ms.is_finite() && self.weapon_fire_rate_ms >= 0.0) {
            return Err(TuningError::Invalid(
                "weapon_fire_rate_ms must not be negative".into(),
            ));
        }
        for (name, rule) in self.spawns.rules() {
            if !(rule.period_ms.is_finite() && rule.period_ms > 0.0) {
                return Err(TuningError::Invalid(format!(
                    "spawns.{name}.period_ms must be positive"
                )));
            }
            if rule.chance.denominator == 0 || rule.chance.numerator > rule.chance.denominator {
                return Err(TuningError::Invalid(format!(
                    "spawns.{name}.chance must be a ratio in [0, 1]"
                )));
            }
        }
        Ok(())
    }

    /// Jump impulse (negative = up)
    pub fn jump_velocity(&self) -> f32 {
        -self.dude_gravity / 1.25
    }

    /// Climb impulse when pressed against a wall
    pub fn climb_velocity(&self) -> f32 {
        -self.dude_gravity / 2.0
    }

    /// Leftward drift of platforms, clouds, pickups and enemies
    pub fn drift_speed(&self) -> f32 {
        self.dude_speed / 4.0
    }

    /// Downward speed of enemies
    pub fn enemy_fall_speed(&self) -> f32 {
        self.dude_speed / 8.0
    }

    /// Projectile speed (rightward)
    pub fn projectile_speed(&self) -> f32 {
        self.dude_speed * 2.0
    }
}

/// Error type for tuning load
#[derive(Debug)]
pub enum TuningError {
    /// JSON could not be parsed
    Parse(String),
    /// Parsed but out of range
    Invalid(String),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(msg) => write!(f, "tuning parse error: {}", msg),
            TuningError::Invalid(msg) => write!(f, "invalid tuning: {}", msg),
        }
    }
}

impl std::error::Error for TuningError {}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Parse(e.to_string())
    }
}
