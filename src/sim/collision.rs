//! Axis-aligned box collision
//!
//! Everything in the arcade world is a box. Overlap is strict: boxes that only
//! share an edge do not collide, which lets a resting body sit exactly on top
//! of a platform until gravity pushes it back in.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Box of the given size centred on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    /// Strict intersection test
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Which sides of a body are in contact this step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Touching {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Touching {
    pub fn none() -> Self {
        Self::default()
    }

    /// Touching a wall on either side
    pub fn side(&self) -> bool {
        self.left || self.right
    }

    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }

    /// Accumulate contacts from another pairing in the same step
    pub fn merge(&mut self, other: Touching) {
        self.up |= other.up;
        self.down |= other.down;
        self.left |= other.left;
        self.right |= other.right;
    }
}

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Unit axis pointing from `b` toward `a` (direction to push `a` out)
    pub normal: Vec2,
    /// Penetration depth along `normal`
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check collision between two boxes
///
/// The separating axis is the one with the smaller penetration. Ties go to
/// the vertical axis so a body landing square on a platform stands on it.
pub fn aabb_collision(a: &Aabb, b: &Aabb) -> CollisionResult {
    if !a.overlaps(b) {
        return CollisionResult::miss();
    }

    let overlap_x = a.max.x.min(b.max.x) - a.min.x.max(b.min.x);
    let overlap_y = a.max.y.min(b.max.y) - a.min.y.max(b.min.y);
    let delta = a.center() - b.center();

    if overlap_x < overlap_y {
        let dir = if delta.x < 0.0 { -1.0 } else { 1.0 };
        CollisionResult {
            hit: true,
            normal: Vec2::new(dir, 0.0),
            penetration: overlap_x,
        }
    } else {
        let dir = if delta.y < 0.0 { -1.0 } else { 1.0 };
        CollisionResult {
            hit: true,
            normal: Vec2::new(0.0, dir),
            penetration: overlap_y,
        }
    }
}

/// Touching flags for `a` and `b` given the normal from `aabb_collision`
pub fn contact_sides(normal: Vec2) -> (Touching, Touching) {
    let mut a = Touching::none();
    let mut b = Touching::none();
    if normal.y < 0.0 {
        // a sits above b
        a.down = true;
        b.up = true;
    } else if normal.y > 0.0 {
        a.up = true;
        b.down = true;
    } else if normal.x < 0.0 {
        // a is left of b
        a.right = true;
        b.left = true;
    } else if normal.x > 0.0 {
        a.left = true;
        b.right = true;
    }
    (a, b)
}

/// Remove the velocity component that drives a body into the contact.
///
/// `surface_vel` is the velocity of what it hit: a body carried by a moving
/// platform edge ends up matching the platform along `push_dir`.
pub fn stop_along(vel: Vec2, push_dir: Vec2, surface_vel: Vec2) -> Vec2 {
    let into = (vel - surface_vel).dot(push_dir);
    if into < 0.0 {
        vel - push_dir * into
    } else {
        vel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f32, y: f32, size: f32) -> Aabb {
        Aabb::from_center(Vec2::new(x, y), Vec2::splat(size))
    }

    #[test]
    fn test_edge_contact_is_not_overlap() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(10.0, 0.0, 10.0);
        assert!(!a.overlaps(&b));
        assert!(!aabb_collision(&a, &b).hit);
    }

    #[test]
    fn test_landing_resolves_vertically() {
        // Player-sized box sinking 2px into a wide platform
        let player = Aabb::from_center(Vec2::new(400.0, 312.0), Vec2::new(32.0, 48.0));
        let ground = Aabb::from_center(Vec2::new(400.0, 350.0), Vec2::new(400.0, 32.0));
        let result = aabb_collision(&player, &ground);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::new(0.0, -1.0));
        assert!((result.penetration - 2.0).abs() < 1e-4);

        let (p, g) = contact_sides(result.normal);
        assert!(p.down && !p.side());
        assert!(g.up);
    }

    #[test]
    fn test_side_hit_resolves_horizontally() {
        let a = square(0.0, 0.0, 20.0);
        let b = square(18.0, 2.0, 20.0);
        let result = aabb_collision(&a, &b);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::new(-1.0, 0.0));

        let (ta, tb) = contact_sides(result.normal);
        assert!(ta.right && tb.left);
        assert!(ta.side() && ta.any());
    }

    #[test]
    fn test_stop_along() {
        // Falling body pushed up loses its downward speed
        let vel = stop_along(Vec2::new(50.0, 200.0), Vec2::new(0.0, -1.0), Vec2::ZERO);
        assert_eq!(vel, Vec2::new(50.0, 0.0));

        // Moving away keeps its velocity
        let vel = stop_along(Vec2::new(0.0, -100.0), Vec2::new(0.0, -1.0), Vec2::ZERO);
        assert_eq!(vel, Vec2::new(0.0, -100.0));
    }

    #[test]
    fn test_stop_along_moving_surface() {
        let drift = Vec2::new(-75.0, 0.0);

        // Drifting with the platform: nothing to stop
        let vel = stop_along(drift, Vec2::new(1.0, 0.0), drift);
        assert_eq!(vel, drift);

        // Standing still in front of a leftward edge: shoved along with it
        let vel = stop_along(Vec2::ZERO, Vec2::new(-1.0, 0.0), drift);
        assert_eq!(vel, drift);

        // Faster than the platform toward its edge: slowed to its speed
        let vel = stop_along(Vec2::new(-300.0, 10.0), Vec2::new(1.0, 0.0), drift);
        assert_eq!(vel, Vec2::new(-75.0, 10.0));
    }
}
