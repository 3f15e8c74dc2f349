//! Scene descriptor parsing, material resolution, and the scene compiler
//! pipeline that ties them together (§4.4, §6).

pub mod compiler;
pub mod descriptor;
pub mod material_resolve;

pub use compiler::{
    compile_scene, CompiledScene, LightRange, LoadedGroup, LoadedProp, MeshLoader, RawTriangle, RunMode,
};
pub use descriptor::{ColorOrPath, EnvironmentDescriptor, PropDescriptor, SceneDescriptor, WorldTransformEntry};
pub use material_resolve::{resolve_material, RawGroupMaterial, TexturePacker};
