//! Axis-aligned bounding box collision
//!
//! Everything in the lane is a rectangle, so the whole collision story is
//! AABB overlap: two boxes miss exactly when one is entirely left, right,
//! above or below the other.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in screen coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Build from a bottom-left anchor, the way lane entities are placed
    pub fn from_bottom_left(bottom_left: Vec2, size: Vec2) -> Self {
        Self {
            min: Vec2::new(bottom_left.x, bottom_left.y - size.y),
            max: Vec2::new(bottom_left.x + size.x, bottom_left.y),
        }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }
}

/// Rectangle overlap test
///
/// Touching edges do not count as overlap, so an obstacle grazing the
/// player's box boundary is still a miss.
#[inline]
pub fn aabb_overlap(a: &Aabb, b: &Aabb) -> bool {
    !(a.max.x <= b.min.x || b.max.x <= a.min.x || a.max.y <= b.min.y || b.max.y <= a.min.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(x: f32, y: f32, w: f32, h: f32) -> Aabb {
        Aabb {
            min: Vec2::new(x, y),
            max: Vec2::new(x + w, y + h),
        }
    }

    #[test]
    fn test_overlap_hit() {
        let a = boxed(0.0, 0.0, 10.0, 10.0);
        let b = boxed(5.0, 5.0, 10.0, 10.0);
        assert!(aabb_overlap(&a, &b));
        assert!(aabb_overlap(&b, &a));
    }

    #[test]
    fn test_overlap_miss_left_right() {
        let a = boxed(0.0, 0.0, 10.0, 10.0);
        let b = boxed(20.0, 0.0, 10.0, 10.0);
        assert!(!aabb_overlap(&a, &b));
        assert!(!aabb_overlap(&b, &a));
    }

    #[test]
    fn test_overlap_miss_above_below() {
        let a = boxed(0.0, 0.0, 10.0, 10.0);
        let b = boxed(0.0, 30.0, 10.0, 10.0);
        assert!(!aabb_overlap(&a, &b));
        assert!(!aabb_overlap(&b, &a));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = boxed(0.0, 0.0, 10.0, 10.0);
        let b = boxed(10.0, 0.0, 10.0, 10.0);
        assert!(!aabb_overlap(&a, &b));
    }

    #[test]
    fn test_containment_overlaps() {
        let outer = boxed(0.0, 0.0, 100.0, 100.0);
        let inner = boxed(40.0, 40.0, 10.0, 10.0);
        assert!(aabb_overlap(&outer, &inner));
        assert!(aabb_overlap(&inner, &outer));
    }

    #[test]
    fn test_from_bottom_left() {
        let b = Aabb::from_bottom_left(Vec2::new(100.0, 500.0), Vec2::new(60.0, 88.0));
        assert_eq!(b.min, Vec2::new(100.0, 412.0));
        assert_eq!(b.max, Vec2::new(160.0, 500.0));
        assert_eq!(b.width(), 60.0);
        assert_eq!(b.height(), 88.0);
    }

    #[test]
    fn test_from_center() {
        let b = Aabb::from_center(Vec2::new(50.0, 50.0), Vec2::new(20.0, 10.0));
        assert_eq!(b.min, Vec2::new(40.0, 45.0));
        assert_eq!(b.max, Vec2::new(60.0, 55.0));
    }
}
