//! # pathtrace-compiler
//!
//! Host-side scene compiler for a GPU Monte Carlo path tracer: loads a
//! scene descriptor, builds and serializes a BVH, resolves materials, and
//! packs every GPU buffer the fragment-stage tracer reads. Also carries the
//! CPU-side autofocus ray cast and the progressive render-loop state
//! machine that drives the three per-tick draw passes.
//!
//! ## Modules
//!
//! - [`geom`] - triangles and materials
//! - [`bvh`] - SAH split selection, construction, and GPU serialization
//! - [`pack`] - flat, padded float-buffer packing for texture upload
//! - [`scene`] - scene descriptor parsing, material resolution, compiler
//! - [`autofocus`] - CPU ray/box and ray/triangle BVH traversal
//! - [`render`] - the ping-pong accumulator render loop
//! - [`gpu`] - `wgpu`-based binding adapter (behind the `gpu` feature)

pub mod autofocus;
pub mod bvh;
pub mod cli;
pub mod error;
pub mod geom;
pub mod math;
pub mod pack;
pub mod render;
pub mod scene;

#[cfg(feature = "gpu")]
pub mod gpu;

pub use error::{Error, Result};

/// Convenience re-exports for callers wiring up a compiler + render loop.
pub mod prelude {
    pub use crate::autofocus::{autofocus, closest_hit, ray_aabb, ray_triangle, AutofocusResult, MAX_T};
    pub use crate::bvh::{build_bvh, serialize, BuildResult, Node, SerializedBvh};
    pub use crate::error::{Error, Result};
    pub use crate::geom::{Material, Triangle, TransformOverrides};
    pub use crate::pack::{pack_records, PackedBuffer};
    pub use crate::render::{FramePresenter, RenderLoop, TickOutcome};
    pub use crate::scene::{compile_scene, CompiledScene, MeshLoader, RunMode, SceneDescriptor};
}
