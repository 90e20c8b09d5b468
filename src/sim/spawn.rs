//! Timed spawning of platforms, clouds, spiders and stars

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::port::Texture;
use crate::consts::*;
use crate::tuning::{Chance, SpawnRule, SpawnTable, Tuning};

/// Source of spawn decisions
///
/// Sessions are generic over this so tests can force outcomes.
pub trait SpawnDice {
    /// True with the given probability
    fn roll(&mut self, chance: Chance) -> bool;

    /// Uniform sample in `[lo, hi)`; returns `lo` for an empty range
    fn range(&mut self, lo: f32, hi: f32) -> f32;
}

impl SpawnDice for Pcg32 {
    fn roll(&mut self, chance: Chance) -> bool {
        if chance.denominator == 0 || chance.numerator == 0 {
            return false;
        }
        if chance.numerator >= chance.denominator {
            return true;
        }
        self.random_ratio(chance.numerator, chance.denominator)
    }

    fn range(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            return lo;
        }
        self.random_range(lo..hi)
    }
}

/// What a spawn timer creates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnKind {
    Ground,
    Cloud,
    Spider,
    YellowStar,
    RedStar,
}

impl SpawnKind {
    /// Timer registration order
    pub const ALL: [SpawnKind; 5] = [
        SpawnKind::Ground,
        SpawnKind::Cloud,
        SpawnKind::Spider,
        SpawnKind::YellowStar,
        SpawnKind::RedStar,
    ];

    pub fn texture(&self) -> Texture {
        match self {
            SpawnKind::Ground => Texture::Ground,
            SpawnKind::Cloud => Texture::Cloud,
            SpawnKind::Spider => Texture::Spider,
            SpawnKind::YellowStar => Texture::StarYellow,
            SpawnKind::RedStar => Texture::StarRed,
        }
    }

    pub fn rule(&self, table: &SpawnTable) -> SpawnRule {
        match self {
            SpawnKind::Ground => table.ground,
            SpawnKind::Cloud => table.clouds,
            SpawnKind::Spider => table.spiders,
            SpawnKind::YellowStar => table.yellow_stars,
            SpawnKind::RedStar => table.red_stars,
        }
    }

    /// Entry point at the right edge
    ///
    /// Platforms appear well past the edge: ground in the lower half, clouds in
    /// the upper half. Spiders and stars appear on the edge at any height.
    pub fn position(&self, dice: &mut impl SpawnDice) -> Vec2 {
        match self {
            SpawnKind::Ground => Vec2::new(
                WORLD_WIDTH + PLATFORM_SPAWN_OFFSET,
                dice.range(WORLD_HEIGHT / 2.0, WORLD_HEIGHT),
            ),
            SpawnKind::Cloud => Vec2::new(
                WORLD_WIDTH + PLATFORM_SPAWN_OFFSET,
                dice.range(0.0, WORLD_HEIGHT / 2.0),
            ),
            SpawnKind::Spider | SpawnKind::YellowStar | SpawnKind::RedStar => {
                Vec2::new(WORLD_WIDTH, dice.range(0.0, WORLD_HEIGHT))
            }
        }
    }

    /// Initial velocity, assigned once at creation
    pub fn velocity(&self, tuning: &Tuning) -> Vec2 {
        let drift = -tuning.drift_speed();
        match self {
            SpawnKind::Spider => Vec2::new(drift, tuning.enemy_fall_speed()),
            _ => Vec2::new(drift, 0.0),
        }
    }
}
