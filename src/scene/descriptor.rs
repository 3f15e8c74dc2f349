//! Scene descriptor JSON schema (§6).

use std::collections::HashMap;

use serde::Deserialize;

/// Either a flat color or a texture path — mirrors the scene descriptor's
/// `string ⇒ texture, object ⇒ color` convention for material overrides.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ColorOrPath {
    Path(String),
    Color([f32; 3]),
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum EnvironmentDescriptor {
    Path(String),
    /// Color stops interpolated into a 1x2048 radiance texture (§6).
    Stops(Vec<[f32; 4]>),
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PropDescriptor {
    pub path: String,
    #[serde(default)]
    pub emittance: Option<[f32; 3]>,
    #[serde(default)]
    pub reflectance: Option<[f32; 3]>,
    #[serde(default)]
    pub diffuse: Option<ColorOrPath>,
    #[serde(default, rename = "metallicRoughness")]
    pub metallic_roughness: Option<ColorOrPath>,
    #[serde(default)]
    pub normal: Option<ColorOrPath>,
    #[serde(default)]
    pub emission: Option<ColorOrPath>,
    #[serde(default)]
    pub ior: Option<f32>,
    #[serde(default)]
    pub dielectric: Option<f32>,
    #[serde(default, rename = "mrSwizzle")]
    pub mr_swizzle: Option<String>,
}

/// A `worldTransforms` entry: material-resolution overrides keyed by prop
/// path, consulted by [`crate::scene::material_resolve`] but never retained
/// on the built [`crate::geom::Triangle`] (§4.5).
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct WorldTransformEntry {
    #[serde(default)]
    pub diffuse: Option<ColorOrPath>,
    #[serde(default, rename = "metallicRoughness")]
    pub metallic_roughness: Option<ColorOrPath>,
    #[serde(default, rename = "mrSwizzle")]
    pub mr_swizzle: Option<String>,
    #[serde(default)]
    pub emission: Option<ColorOrPath>,
    #[serde(default)]
    pub normal: Option<ColorOrPath>,
    #[serde(default)]
    pub ior: Option<f32>,
    #[serde(default)]
    pub dielectric: Option<f32>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SceneDescriptor {
    #[serde(default)]
    pub props: Vec<PropDescriptor>,
    #[serde(default, rename = "static_props")]
    pub static_props: Vec<PropDescriptor>,
    #[serde(default, rename = "animated_props")]
    pub animated_props: Vec<PropDescriptor>,
    #[serde(default)]
    pub environment: Option<EnvironmentDescriptor>,
    #[serde(default, rename = "cameraPos")]
    pub camera_pos: Option<[f32; 3]>,
    #[serde(default, rename = "cameraDir")]
    pub camera_dir: Option<[f32; 3]>,
    #[serde(default, rename = "fovScale")]
    pub fov_scale: Option<f32>,
    #[serde(default, rename = "environmentTheta")]
    pub environment_theta: Option<f32>,
    #[serde(default)]
    pub exposure: Option<f32>,
    #[serde(default)]
    pub samples: Option<u32>,
    #[serde(default)]
    pub normalize: Option<f32>,
    #[serde(default, rename = "worldTransforms")]
    pub world_transforms: HashMap<String, WorldTransformEntry>,
    #[serde(default, rename = "atlasRes")]
    pub atlas_res: Option<u32>,
}

impl SceneDescriptor {
    pub fn parse(json: &str) -> crate::error::Result<Self> {
        serde_json::from_str(json).map_err(Into::into)
    }

    /// Merge `props`, `static_props`, and `animated_props` into one ordered
    /// sequence (§4.4 step 1).
    pub fn merged_props(&self) -> impl Iterator<Item = &PropDescriptor> {
        self.props
            .iter()
            .chain(self.static_props.iter())
            .chain(self.animated_props.iter())
    }
}
