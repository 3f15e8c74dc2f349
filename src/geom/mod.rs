//! Geometry primitives: triangles and materials.

pub mod material;
pub mod triangle;

pub use material::{Material, StandardSurfaceParams, DEFAULT_DIELECTRIC, DEFAULT_IOR};
pub use triangle::{Triangle, TransformOverrides, VertexAttrs};
