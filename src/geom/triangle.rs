//! Triangle — vertex/UV/normal/tangent/bitangent carrier plus the cached
//! AABB used by the BVH builder.

use crate::math::{BoundingBox, Vec3};
use crate::geom::material::Material;

/// Per-prop shading overrides carried alongside the resolved [`Material`]
/// (§3: "a transforms record carrying the per-prop emittance/reflectance/
/// IOR/dielectric overrides"). Distinct from the `worldTransforms` material
/// *resolution* inputs in [`crate::scene::material_resolve`], which only
/// feed into building the `Material` itself and are not retained per-triangle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransformOverrides {
    pub emittance: Option<[f32; 3]>,
    pub reflectance: Option<[f32; 3]>,
    pub ior: Option<f32>,
    pub dielectric: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexAttrs {
    pub uv: [f32; 2],
    pub normal: Vec3,
    pub tangent: Vec3,
    pub bitangent: Vec3,
}

#[derive(Debug, Clone)]
pub struct Triangle {
    pub verts: [Vec3; 3],
    pub attrs: [VertexAttrs; 3],
    pub material: Material,
    pub transforms: TransformOverrides,
    aabb: BoundingBox,
}

impl Triangle {
    pub fn new(
        verts: [Vec3; 3],
        attrs: [VertexAttrs; 3],
        material: Material,
        transforms: TransformOverrides,
    ) -> Self {
        let mut aabb = BoundingBox::EMPTY;
        for v in verts {
            aabb.grow_point(v);
        }
        Self {
            verts,
            attrs,
            material,
            transforms,
            aabb,
        }
    }

    #[inline]
    pub fn aabb(&self) -> BoundingBox {
        self.aabb
    }

    #[inline]
    pub fn centroid(&self) -> Vec3 {
        (self.verts[0] + self.verts[1] + self.verts[2]) / 3.0
    }

    /// Recompute the cached AABB after the vertices are mutated in place
    /// (used by the scene compiler's normalize-and-recenter step, §4.4.5).
    pub fn recompute_aabb(&mut self) {
        let mut aabb = BoundingBox::EMPTY;
        for v in self.verts {
            aabb.grow_point(v);
        }
        self.aabb = aabb;
    }
}
