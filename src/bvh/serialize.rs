//! Depth-first preorder linearization of the in-memory BVH into
//! parent-indexed records, with the bit-exact integer/float reinterpretation
//! the GPU traversal shader relies on (§3, §9).

use crate::math::Vec3;

use super::node::Node;

/// One linearized BVH node. `left`/`right` are ordinals into the output
/// array (-1 for a leaf); `tri_base` is the offset into the leaf-order
/// triangle buffer (-1 for an internal node).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SerializedBvhRecord {
    pub left: i32,
    pub right: i32,
    pub tri_base: i32,
    pub bounds_min: Vec3,
    pub bounds_max: Vec3,
}

impl SerializedBvhRecord {
    /// Reinterpret (not convert) the three integer cells as float bit
    /// patterns, matching the GPU consumer's symmetric bitcast-back.
    pub fn to_floats(&self) -> [f32; 9] {
        [
            bitcast_i32_to_f32(self.left),
            bitcast_i32_to_f32(self.right),
            bitcast_i32_to_f32(self.tri_base),
            self.bounds_min.x,
            self.bounds_min.y,
            self.bounds_min.z,
            self.bounds_max.x,
            self.bounds_max.y,
            self.bounds_max.z,
        ]
    }
}

#[inline]
pub fn bitcast_i32_to_f32(x: i32) -> f32 {
    f32::from_bits(x as u32)
}

#[inline]
pub fn bitcast_f32_to_i32(x: f32) -> i32 {
    x.to_bits() as i32
}

/// Result of serializing a BVH: the preorder record array (root at index 0)
/// and the triangle indices in leaf-visit order, suitable for reordering
/// the triangle/normal/uv/material buffers to match `tri_base` offsets.
pub struct SerializedBvh {
    pub records: Vec<SerializedBvhRecord>,
    pub leaf_tri_order: Vec<usize>,
}

pub fn serialize(root: &Node) -> SerializedBvh {
    let mut records = Vec::new();
    let mut leaf_tri_order = Vec::new();
    visit(root, &mut records, &mut leaf_tri_order);
    SerializedBvh {
        records,
        leaf_tri_order,
    }
}

fn visit(node: &Node, records: &mut Vec<SerializedBvhRecord>, leaf_tri_order: &mut Vec<usize>) -> usize {
    let ordinal = records.len();
    // Placeholder so children can be assigned ordinals first; patched below.
    records.push(SerializedBvhRecord {
        left: -1,
        right: -1,
        tri_base: -1,
        bounds_min: Vec3::ZERO,
        bounds_max: Vec3::ZERO,
    });

    match node {
        Node::Leaf { tri_indices, bounds } => {
            let base = leaf_tri_order.len() as i32;
            leaf_tri_order.extend_from_slice(tri_indices);
            records[ordinal] = SerializedBvhRecord {
                left: -1,
                right: -1,
                tri_base: base,
                bounds_min: bounds.min,
                bounds_max: bounds.max,
            };
        }
        Node::Internal { left, right, bounds, .. } => {
            let left_ordinal = visit(left, records, leaf_tri_order);
            let right_ordinal = visit(right, records, leaf_tri_order);
            records[ordinal] = SerializedBvhRecord {
                left: left_ordinal as i32,
                right: right_ordinal as i32,
                tri_base: -1,
                bounds_min: bounds.min,
                bounds_max: bounds.max,
            };
        }
    }

    ordinal
}
