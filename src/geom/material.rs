//! Material — atlas indices resolved by the scene compiler (§4.5) plus the
//! optional extended physically-based block the teacher's Standard Surface
//! path carries (`GpuMaterial` in the grounding crate).

use serde::{Deserialize, Serialize};

/// Default IOR used when neither the material nor `worldTransforms`
/// override it.
pub const DEFAULT_IOR: f32 = 1.4;
/// Sentinel meaning "not dielectric" for the `dielectric` field.
pub const DEFAULT_DIELECTRIC: f32 = -1.0;

/// Four atlas indices plus emittance/IOR/dielectric, one per material group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub diffuse_index: i32,
    pub roughness_index: i32,
    pub emission_index: i32,
    pub normal_index: i32,
    pub emittance: [f32; 3],
    pub ior: f32,
    pub dielectric: f32,
    /// Additive physically-based block; never replaces the four indices
    /// above, which remain the required GPU-facing contract.
    pub extended: Option<StandardSurfaceParams>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            diffuse_index: -1,
            roughness_index: -1,
            emission_index: -1,
            normal_index: -1,
            emittance: [0.0, 0.0, 0.0],
            ior: DEFAULT_IOR,
            dielectric: DEFAULT_DIELECTRIC,
            extended: None,
        }
    }
}

impl Material {
    /// `emittance · (1,1,1) > 0` — the condition the scene compiler uses to
    /// classify a prop's triangles as light-emitting (§4.4 step 4).
    #[inline]
    pub fn is_emissive(&self) -> bool {
        self.emittance.iter().sum::<f32>() > 0.0
    }
}

/// Extended physically-based parameter block, additive over the four
/// required atlas indices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StandardSurfaceParams {
    pub base_color_weight: [f32; 4],
    pub specular_color_weight: [f32; 4],
    pub transmission_color_weight: [f32; 4],
    pub subsurface_color_weight: [f32; 4],
    pub coat_color_weight: [f32; 4],
    pub emission_color_weight: [f32; 4],
}
