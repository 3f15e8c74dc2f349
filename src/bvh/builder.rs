//! Top-down recursive BVH construction with partition-preserving index
//! lists: splitting one pre-sorted axis list costs O(k), and the other two
//! axes are re-partitioned in O(N) via bit-vector membership rather than
//! re-sorted, which is the builder's core efficiency trick (§4.2, §9).

use crate::geom::Triangle;
use crate::math::BoundingBox;

use super::node::{find_best_split, Node, LEAF_SIZE};

/// Build result: the root node and the maximum recursion depth reached.
pub struct BuildResult {
    pub root: Node,
    pub depth: usize,
}

/// Build a BVH over `triangles` using exact-sweep SAH.
///
/// Empty input yields a single leaf with an empty bounding box and no
/// triangles, rather than rejecting — callers that require non-empty
/// scenes should check `triangles.is_empty()` themselves.
#[tracing::instrument(skip_all, fields(tri_count = triangles.len()))]
pub fn build_bvh(triangles: &[Triangle]) -> BuildResult {
    let n = triangles.len();
    if n == 0 {
        return BuildResult {
            root: Node::Leaf {
                tri_indices: Vec::new(),
                bounds: BoundingBox::EMPTY,
            },
            depth: 0,
        };
    }

    let aabbs: Vec<BoundingBox> = triangles.iter().map(Triangle::aabb).collect();
    let centroids: Vec<[f32; 3]> = aabbs.iter().map(|b| b.centroid().to_array()).collect();

    let mut axis_lists: [Vec<usize>; 3] = [
        (0..n).collect(),
        (0..n).collect(),
        (0..n).collect(),
    ];
    for axis in 0..3 {
        axis_lists[axis].sort_by(|&a, &b| {
            centroids[a][axis]
                .partial_cmp(&centroids[b][axis])
                .unwrap()
        });
    }

    let (root, depth) = build_recursive(axis_lists, &aabbs, n);
    BuildResult { root, depth }
}

/// Recurse on a triple of pre-sorted, same-index-set axis lists. Returns the
/// subtree root and its depth (0 for a leaf).
fn build_recursive(
    axis_lists: [Vec<usize>; 3],
    aabbs: &[BoundingBox],
    total_n: usize,
) -> (Node, usize) {
    let n = axis_lists[0].len();

    let mut bounds = BoundingBox::EMPTY;
    for &idx in &axis_lists[0] {
        bounds.grow(&aabbs[idx]);
    }

    if n <= LEAF_SIZE {
        return (
            Node::Leaf {
                tri_indices: axis_lists.into_iter().next().unwrap(),
                bounds,
            },
            0,
        );
    }

    let best = find_best_split(&axis_lists, aabbs);
    let (left_lists, right_lists) = partition_preserving(total_n, axis_lists, best.axis, best.k);

    let (left, left_depth) = build_recursive(left_lists, aabbs, total_n);
    let (right, right_depth) = build_recursive(right_lists, aabbs, total_n);

    let node = Node::Internal {
        left: Box::new(left),
        right: Box::new(right),
        axis: best.axis,
        split_index: best.k,
        bounds,
    };
    (node, 1 + left_depth.max(right_depth))
}

/// Partition all three axis lists at `(split_axis, k)`. The split axis is
/// sliced directly; the other two are scanned once each and classified by a
/// bit-vector membership test over the split axis's left partition, which
/// preserves their relative sort order without re-sorting.
fn partition_preserving(
    total_n: usize,
    lists: [Vec<usize>; 3],
    split_axis: usize,
    k: usize,
) -> ([Vec<usize>; 3], [Vec<usize>; 3]) {
    let mut in_left = vec![false; total_n];
    for &idx in &lists[split_axis][..k] {
        in_left[idx] = true;
    }

    let mut left: [Vec<usize>; 3] = Default::default();
    let mut right: [Vec<usize>; 3] = Default::default();

    for axis in 0..3 {
        if axis == split_axis {
            left[axis] = lists[axis][..k].to_vec();
            right[axis] = lists[axis][k..].to_vec();
        } else {
            let (l, r): (Vec<usize>, Vec<usize>) =
                lists[axis].iter().partition(|&&idx| in_left[idx]);
            left[axis] = l;
            right[axis] = r;
        }
    }

    (left, right)
}
