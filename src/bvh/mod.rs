//! Bounding Volume Hierarchy: split selection, top-down construction, and
//! depth-first serialization to a GPU-traversable flat array.

pub mod builder;
pub mod node;
pub mod serialize;

pub use builder::{build_bvh, BuildResult};
pub use node::{Node, LEAF_SIZE};
pub use serialize::{bitcast_f32_to_i32, bitcast_i32_to_f32, serialize, SerializedBvh, SerializedBvhRecord};
