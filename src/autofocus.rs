//! CPU-side autofocus ray cast: walks the in-memory BVH with the same
//! ray/box and ray/triangle tests a GPU tracer would use, synchronously in
//! the key/mouse-up handler (§4.6).

use crate::bvh::Node;
use crate::geom::Triangle;
use crate::math::{BoundingBox, Vec3};

/// Sentinel distance returned on a miss; callers treat it as "focus at
/// infinity" rather than an error (§9 error model).
pub const MAX_T: f32 = 1e6;

const EPSILON: f32 = 1e-12;

/// Slab-method ray/AABB test. Returns `tmin` on hit, [`MAX_T`] on miss.
pub fn ray_aabb(bounds: &BoundingBox, origin: Vec3, inv_dir: Vec3) -> f32 {
    let t1 = (bounds.min - origin) * inv_dir;
    let t2 = (bounds.max - origin) * inv_dir;
    let tmin = t1.min(t2).max_element();
    let tmax = t1.max(t2).min_element();
    if tmax >= tmin && tmax >= 0.0 {
        tmin
    } else {
        MAX_T
    }
}

/// Möller–Trumbore ray/triangle intersection. Returns the parametric
/// distance `t` on a valid hit (`t > ε`, non-parallel, non-back-face after
/// sign convention, barycentrics in range), [`MAX_T`] otherwise.
pub fn ray_triangle(verts: &[Vec3; 3], origin: Vec3, dir: Vec3) -> f32 {
    let edge1 = verts[1] - verts[0];
    let edge2 = verts[2] - verts[0];
    let pvec = dir.cross(edge2);
    let det = edge1.dot(pvec);

    if det.abs() < EPSILON {
        return MAX_T;
    }
    let inv_det = 1.0 / det;

    let tvec = origin - verts[0];
    let u = tvec.dot(pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return MAX_T;
    }

    let qvec = tvec.cross(edge1);
    let v = dir.dot(qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return MAX_T;
    }

    let t = edge2.dot(qvec) * inv_det;
    if t > EPSILON {
        t
    } else {
        MAX_T
    }
}

/// Front-to-back recursive BVH traversal, pruning a subtree whose slab
/// entry is at or beyond the current closest hit (§4.6).
pub fn closest_hit(root: &Node, triangles: &[Triangle], origin: Vec3, dir: Vec3) -> f32 {
    let inv_dir = Vec3::new(1.0 / dir.x, 1.0 / dir.y, 1.0 / dir.z);
    traverse(root, triangles, origin, dir, inv_dir, MAX_T)
}

fn traverse(node: &Node, triangles: &[Triangle], origin: Vec3, dir: Vec3, inv_dir: Vec3, closest: f32) -> f32 {
    match node {
        Node::Leaf { tri_indices, .. } => {
            let mut best = closest;
            for &idx in tri_indices {
                let t = ray_triangle(&triangles[idx].verts, origin, dir);
                if t < best {
                    best = t;
                }
            }
            best
        }
        Node::Internal { left, right, .. } => {
            let left_t = ray_aabb(&left.bounds(), origin, inv_dir);
            let right_t = ray_aabb(&right.bounds(), origin, inv_dir);

            let (near, near_t, far, far_t) = if left_t <= right_t {
                (left.as_ref(), left_t, right.as_ref(), right_t)
            } else {
                (right.as_ref(), right_t, left.as_ref(), left_t)
            };

            let mut best = closest;
            if near_t < best {
                best = traverse(near, triangles, origin, dir, inv_dir, best);
            }
            if far_t < best {
                best = traverse(far, triangles, origin, dir, inv_dir, best);
            }
            best
        }
    }
}

/// Result of an autofocus probe: the hit distance (or [`MAX_T`] on miss) and
/// the shader-side lens-feature pair `(1 − 1/d, aperture)` it implies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutofocusResult {
    pub focal_depth: f32,
    pub lens_features: [f32; 2],
}

/// Probe the scene along the camera's eye/direction and update focal depth.
/// A miss sets `focal_depth` to infinity rather than failing (§9).
pub fn autofocus(root: &Node, triangles: &[Triangle], eye: Vec3, dir: Vec3, aperture: f32) -> AutofocusResult {
    let t = closest_hit(root, triangles, eye, dir);
    if t >= MAX_T {
        AutofocusResult {
            focal_depth: f32::INFINITY,
            lens_features: [1.0, aperture],
        }
    } else {
        AutofocusResult {
            focal_depth: t,
            lens_features: [1.0 - 1.0 / t, aperture],
        }
    }
}
