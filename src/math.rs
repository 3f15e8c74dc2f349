//! Vector math re-exports and the axis-aligned bounding box type.
//!
//! Vector arithmetic itself (dot, cross, lerp, componentwise min/max) is an
//! external collaborator per the scope notes — `glam` already provides it,
//! so `Vec3` here is a direct re-export rather than a hand-rolled type.

pub use glam::Vec3;

use bytemuck::{Pod, Zeroable};

/// Axis-aligned bounding box. `min`/`max` hold `+inf`/`-inf` componentwise
/// when empty, so that growing an empty box by any point or box is a no-op
/// identity operation.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    #[inline]
    pub fn from_point(p: Vec3) -> Self {
        Self { min: p, max: p }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Grow to include a point.
    #[inline]
    pub fn grow_point(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Grow to include another box (no-op if `other` is empty).
    #[inline]
    pub fn grow(&mut self, other: &BoundingBox) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// `2 * (dx*dy + dx*dz + dy*dz)`. Zero for an empty box.
    #[inline]
    pub fn surface_area(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        let d = self.max - self.min;
        2.0 * (d.x * d.y + d.x * d.z + d.y * d.z)
    }

    /// `(min + max) * 0.5`. Meaningless on an empty box; callers must not
    /// rely on it before at least one `grow`/`grow_point`.
    #[inline]
    pub fn centroid(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn longest_axis(&self) -> usize {
        let d = self.max - self.min;
        if d.x >= d.y && d.x >= d.z {
            0
        } else if d.y >= d.z {
            1
        } else {
            2
        }
    }

    #[inline]
    pub fn axis(&self, i: usize) -> (f32, f32) {
        (self.min[i], self.max[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_box_grow_is_identity() {
        let mut b = BoundingBox::EMPTY;
        b.grow_point(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(b.min, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(b.max, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn surface_area_matches_formula() {
        let mut b = BoundingBox::EMPTY;
        b.grow_point(Vec3::ZERO);
        b.grow_point(Vec3::new(1.0, 2.0, 3.0));
        // dx=1 dy=2 dz=3 -> 2*(2+3+6) = 22
        assert_eq!(b.surface_area(), 22.0);
    }

    #[test]
    fn centroid_is_midpoint() {
        let mut b = BoundingBox::EMPTY;
        b.grow_point(Vec3::new(0.0, 0.0, 0.0));
        b.grow_point(Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(b.centroid(), Vec3::new(1.0, 2.0, 3.0));
    }
}
