//! Scene compiler: parses the scene descriptor, merges prop lists, invokes
//! the (opaque) mesh loader, resolves materials, normalizes bounds, builds
//! and serializes the BVH, and emits every packed GPU buffer (§4.4).

use std::collections::HashMap;

use glam::{Mat4, Vec3};
use rayon::prelude::*;

use crate::bvh::{build_bvh, serialize, Node, SerializedBvh, LEAF_SIZE};
use crate::error::Result;
use crate::geom::{Material, TransformOverrides, Triangle, VertexAttrs};
use crate::math::BoundingBox;
use crate::pack::{pack_records, PackedBuffer};
use crate::scene::descriptor::{PropDescriptor, SceneDescriptor, WorldTransformEntry};
use crate::scene::material_resolve::{resolve_material, RawGroupMaterial, TexturePacker};

/// A single loaded triangle in object/world space, before material
/// resolution or BVH construction.
#[derive(Debug, Clone)]
pub struct RawTriangle {
    pub verts: [Vec3; 3],
    pub uvs: [[f32; 2]; 3],
    pub normals: [Vec3; 3],
    pub tangents: [Vec3; 3],
    pub bitangents: [Vec3; 3],
}

/// One material group within a loaded prop.
#[derive(Debug, Clone)]
pub struct LoadedGroup {
    pub triangles: Vec<RawTriangle>,
    pub material: RawGroupMaterial,
}

/// A fully loaded prop: its material groups and an optional world matrix
/// (identity if the loader already placed geometry in world space).
#[derive(Debug, Clone)]
pub struct LoadedProp {
    pub groups: Vec<LoadedGroup>,
    pub transform: Option<Mat4>,
}

/// Mesh loading is an external collaborator (§1): this trait is the seam.
/// A real implementation parses OBJ/MTL (or glTF, etc); it is not this
/// crate's concern.
pub trait MeshLoader {
    fn load(&self, prop: &PropDescriptor) -> Result<LoadedProp>;
}

/// `(firstLightOrdinal, lastLightOrdinal)` for one emissive group (§3, §4.4
/// step 7).
pub type LightRange = (u32, u32);

/// Everything the scene compiler produces: the BVH, the triangle set in its
/// original load order, and every packed GPU buffer (§3, §4.4).
pub struct CompiledScene {
    pub triangles: Vec<Triangle>,
    pub bvh_root: Node,
    pub bvh_depth: usize,
    pub serialized_bvh: SerializedBvh,
    pub scene_bounds: BoundingBox,

    pub bvh_buffer: PackedBuffer,
    pub triangles_buffer: PackedBuffer,
    pub normal_buffer: PackedBuffer,
    pub uv_buffer: PackedBuffer,
    pub material_buffer: PackedBuffer,
    pub light_buffer: PackedBuffer,
    pub light_ranges: Vec<LightRange>,

    pub directives: Vec<String>,
}

/// Run mode tags parsed from `--mode` (§6): `test`, `nee`, `alpha`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunMode {
    pub test: bool,
    pub next_event_estimation: bool,
    pub alpha: bool,
}

fn overrides_for(world_transforms: &HashMap<String, WorldTransformEntry>, path: &str) -> WorldTransformEntry {
    world_transforms.get(path).cloned().unwrap_or_default()
}

/// Compile a scene descriptor into GPU-ready buffers.
#[tracing::instrument(skip_all)]
pub fn compile_scene(
    descriptor: &SceneDescriptor,
    loader: &dyn MeshLoader,
    packer: &mut dyn TexturePacker,
    env_bin_count: usize,
    mode: RunMode,
) -> Result<CompiledScene> {
    let mut triangles: Vec<Triangle> = Vec::new();
    let mut scene_bounds = BoundingBox::EMPTY;
    let mut light_ranges: Vec<LightRange> = Vec::new();
    let mut light_triangle_indices: Vec<usize> = Vec::new();

    for prop in descriptor.merged_props() {
        let loaded = loader.load(prop)?;
        let overrides = overrides_for(&descriptor.world_transforms, &prop.path);
        let prop_is_light = prop.emittance.map(|e| e.iter().sum::<f32>() > 0.0).unwrap_or(false);

        let shading_overrides = TransformOverrides {
            emittance: prop.emittance,
            reflectance: prop.reflectance,
            ior: prop.ior,
            dielectric: prop.dielectric,
        };

        for group in &loaded.groups {
            let emittance = prop.emittance.unwrap_or([0.0, 0.0, 0.0]);
            let material = resolve_material(&group.material, &overrides, emittance, packer);
            let group_start = triangles.len();

            for raw in &group.triangles {
                let (verts, normals) = match loaded.transform {
                    Some(m) => {
                        let normal_mat = m.inverse().transpose();
                        let verts = raw.verts.map(|v| m.transform_point3(v));
                        let normals = raw.normals.map(|n| normal_mat.transform_vector3(n).normalize_or_zero());
                        (verts, normals)
                    }
                    None => (raw.verts, raw.normals),
                };

                for v in verts {
                    scene_bounds.grow_point(v);
                }

                let attrs = [0, 1, 2].map(|i| VertexAttrs {
                    uv: raw.uvs[i],
                    normal: normals[i],
                    tangent: raw.tangents[i],
                    bitangent: raw.bitangents[i],
                });

                triangles.push(Triangle::new(verts, attrs, material, shading_overrides));
            }

            if prop_is_light && triangles.len() > group_start {
                let base = light_triangle_indices.len() as u32;
                light_triangle_indices.extend(group_start..triangles.len());
                let count = (triangles.len() - group_start) as u32;
                light_ranges.push((base, base + count - 1));
            }
        }
    }

    if let Some(normalize) = descriptor.normalize {
        if !scene_bounds.is_empty() {
            normalize_scene(&mut triangles, &mut scene_bounds, normalize);
        }
    }

    let build = build_bvh(&triangles);
    let serialized = serialize(&build.root);

    let (bvh_buffer, triangles_buffer, normal_buffer, uv_buffer, material_buffer, light_buffer) =
        pack_all_buffers(&triangles, &serialized, &light_triangle_indices);

    let num_light_ranges = light_ranges.len().max(1);
    let mut directives = vec![
        format!("#define ENV_BINS {}", env_bin_count),
        format!("#define NUM_LIGHT_RANGES {}", num_light_ranges),
        format!("#define LEAF_SIZE {}", LEAF_SIZE),
    ];
    if mode.next_event_estimation {
        directives.push("#define USE_EXPLICIT".to_string());
    }
    if mode.alpha {
        directives.push("#define USE_ALPHA".to_string());
    }

    Ok(CompiledScene {
        triangles,
        bvh_root: build.root,
        bvh_depth: build.depth,
        serialized_bvh: serialized,
        scene_bounds,
        bvh_buffer,
        triangles_buffer,
        normal_buffer,
        uv_buffer,
        material_buffer,
        light_buffer,
        light_ranges,
        directives,
    })
}

/// Rescale so the longest extent of the scene bounds equals `2 * normalize`,
/// recentered on the origin (§4.4 step 5, S5).
fn normalize_scene(triangles: &mut [Triangle], scene_bounds: &mut BoundingBox, normalize: f32) {
    let centroid = scene_bounds.centroid();
    let extent = scene_bounds.max - scene_bounds.min;
    let longest = extent.x.max(extent.y).max(extent.z);
    if longest <= 0.0 {
        return;
    }
    let scale = (2.0 * normalize) / longest;

    for tri in triangles.iter_mut() {
        for v in tri.verts.iter_mut() {
            *v = (*v - centroid) * scale;
        }
        tri.recompute_aabb();
    }

    *scene_bounds = BoundingBox::EMPTY;
    for tri in triangles.iter() {
        scene_bounds.grow(&tri.aabb());
    }
}

/// Emit every packed buffer. The per-triangle projections (positions,
/// normals, UVs, materials) are independent of each other, so each is built
/// with a parallel map over the BVH leaf order (§5).
fn pack_all_buffers(
    triangles: &[Triangle],
    serialized: &SerializedBvh,
    light_triangle_indices: &[usize],
) -> (PackedBuffer, PackedBuffer, PackedBuffer, PackedBuffer, PackedBuffer, PackedBuffer) {
    let order = &serialized.leaf_tri_order;

    let bvh_flat: Vec<f32> = serialized
        .records
        .par_iter()
        .flat_map_iter(|rec| rec.to_floats().into_iter())
        .collect();

    let tri_flat: Vec<f32> = order
        .par_iter()
        .flat_map_iter(|&idx| {
            let t = &triangles[idx];
            [
                t.verts[0].x, t.verts[0].y, t.verts[0].z,
                t.verts[1].x, t.verts[1].y, t.verts[1].z,
                t.verts[2].x, t.verts[2].y, t.verts[2].z,
            ]
            .into_iter()
        })
        .collect();

    let normal_flat: Vec<f32> = order
        .par_iter()
        .flat_map_iter(|&idx| {
            let t = &triangles[idx];
            t.attrs.into_iter().flat_map(|a| {
                [a.normal.x, a.normal.y, a.normal.z, a.tangent.x, a.tangent.y, a.tangent.z, a.bitangent.x, a.bitangent.y, a.bitangent.z]
                    .into_iter()
            })
        })
        .collect();

    let uv_flat: Vec<f32> = order
        .par_iter()
        .flat_map_iter(|&idx| {
            let t = &triangles[idx];
            t.attrs.into_iter().flat_map(|a| a.uv.into_iter())
        })
        .collect();

    let mat_flat: Vec<f32> = order
        .par_iter()
        .flat_map_iter(|&idx| {
            let m: &Material = &triangles[idx].material;
            [
                m.diffuse_index as f32,
                m.roughness_index as f32,
                m.emission_index as f32,
                m.normal_index as f32,
                -1.0,
                -1.0,
                m.emittance[0], m.emittance[1], m.emittance[2],
                m.ior,
                m.dielectric,
                -1.0,
            ]
            .into_iter()
        })
        .collect();

    let light_flat: Vec<f32> = light_triangle_indices
        .par_iter()
        .flat_map_iter(|&idx| {
            let t = &triangles[idx];
            [
                t.verts[0].x, t.verts[0].y, t.verts[0].z,
                t.verts[1].x, t.verts[1].y, t.verts[1].z,
                t.verts[2].x, t.verts[2].y, t.verts[2].z,
            ]
            .into_iter()
        })
        .collect();

    (
        pack_records(&bvh_flat, 9, 3),
        pack_records(&tri_flat, 9, 3),
        pack_records(&normal_flat, 27, 3),
        pack_records(&uv_flat, 6, 2),
        pack_records(&mat_flat, 12, 3),
        pack_records(&light_flat, 9, 3),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::material_resolve::TexturePacker;

    struct NullPacker;
    impl TexturePacker for NullPacker {
        fn pack_color(&mut self, _color: [f32; 3]) -> i32 {
            0
        }
        fn pack_path(&mut self, _path: &str) -> i32 {
            0
        }
    }

    struct SingleTriangleLoader;

    impl MeshLoader for SingleTriangleLoader {
        fn load(&self, _prop: &PropDescriptor) -> Result<LoadedProp> {
            let tri = RawTriangle {
                verts: [Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)],
                uvs: [[0.0, 0.0]; 3],
                normals: [Vec3::Z; 3],
                tangents: [Vec3::X; 3],
                bitangents: [Vec3::Y; 3],
            };
            Ok(LoadedProp {
                groups: vec![LoadedGroup {
                    triangles: vec![tri],
                    material: RawGroupMaterial::default(),
                }],
                transform: None,
            })
        }
    }

    fn descriptor_with_emittance(e: Option<[f32; 3]>) -> SceneDescriptor {
        SceneDescriptor {
            props: vec![PropDescriptor {
                path: "p".into(),
                emittance: e,
                reflectance: None,
                diffuse: None,
                metallic_roughness: None,
                normal: None,
                emission: None,
                ior: None,
                dielectric: None,
                mr_swizzle: None,
            }],
            static_props: vec![],
            animated_props: vec![],
            environment: None,
            camera_pos: None,
            camera_dir: None,
            fov_scale: None,
            environment_theta: None,
            exposure: None,
            samples: None,
            normalize: None,
            world_transforms: HashMap::new(),
            atlas_res: None,
        }
    }

    #[test]
    fn compiles_single_triangle_scene() {
        let desc = descriptor_with_emittance(None);
        let loader = SingleTriangleLoader;
        let mut packer = NullPacker;
        let compiled = compile_scene(&desc, &loader, &mut packer, 0, RunMode::default()).unwrap();
        assert_eq!(compiled.triangles.len(), 1);
        assert_eq!(compiled.bvh_depth, 0);
        assert!(compiled.light_ranges.is_empty());
    }

    #[test]
    fn emissive_prop_produces_a_light_range() {
        let desc = descriptor_with_emittance(Some([1.0, 1.0, 1.0]));
        let loader = SingleTriangleLoader;
        let mut packer = NullPacker;
        let compiled = compile_scene(&desc, &loader, &mut packer, 0, RunMode::default()).unwrap();
        assert_eq!(compiled.light_ranges, vec![(0, 0)]);
        assert_eq!(compiled.triangles[0].material.emittance, [1.0, 1.0, 1.0]);
        // materialBuffer layout: 4 indices, 2 pad, then 3 emittance floats (§3).
        assert_eq!(&compiled.material_buffer.data[6..9], &[1.0, 1.0, 1.0]);
    }

    #[test]
    fn s5_normalize_rescales_into_unit_cube_centered_on_origin() {
        struct BigLoader;
        impl MeshLoader for BigLoader {
            fn load(&self, _prop: &PropDescriptor) -> Result<LoadedProp> {
                let tri = RawTriangle {
                    verts: [Vec3::splat(-10.0), Vec3::new(10.0, -10.0, -10.0), Vec3::new(-10.0, 10.0, 10.0)],
                    uvs: [[0.0, 0.0]; 3],
                    normals: [Vec3::Z; 3],
                    tangents: [Vec3::X; 3],
                    bitangents: [Vec3::Y; 3],
                };
                let tri2 = RawTriangle {
                    verts: [Vec3::splat(10.0), Vec3::new(-10.0, 10.0, 10.0), Vec3::new(10.0, -10.0, -10.0)],
                    ..tri.clone()
                };
                Ok(LoadedProp {
                    groups: vec![LoadedGroup {
                        triangles: vec![tri, tri2],
                        material: RawGroupMaterial::default(),
                    }],
                    transform: None,
                })
            }
        }

        let mut desc = descriptor_with_emittance(None);
        desc.normalize = Some(1.0);
        let loader = BigLoader;
        let mut packer = NullPacker;
        let compiled = compile_scene(&desc, &loader, &mut packer, 0, RunMode::default()).unwrap();

        for tri in &compiled.triangles {
            for v in tri.verts {
                assert!(v.x >= -1.0001 && v.x <= 1.0001);
                assert!(v.y >= -1.0001 && v.y <= 1.0001);
                assert!(v.z >= -1.0001 && v.z <= 1.0001);
            }
        }
        let centroid = compiled.scene_bounds.centroid();
        assert!(centroid.length() < 1e-4);
    }
}
