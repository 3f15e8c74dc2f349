//! Material resolution precedence chains (§4.5).
//!
//! The texture atlas packer is an opaque external collaborator: it accepts
//! either a color or an image path and returns an integer atlas index. Here
//! it's a trait seam so the compiler never depends on an actual image
//! decoder or atlas layout algorithm.

use crate::geom::material::{Material, DEFAULT_DIELECTRIC, DEFAULT_IOR};
use crate::scene::descriptor::{ColorOrPath, WorldTransformEntry};

/// Fallback colors used when no material, loader, or world-transform value
/// resolves a channel (§4.5).
pub const FALLBACK_DIFFUSE: [f32; 3] = [0.5, 0.5, 0.5];
pub const FALLBACK_ROUGHNESS: [f32; 3] = [0.0, 0.3, 0.0];
pub const FALLBACK_EMISSION: [f32; 3] = [0.0, 0.0, 0.0];
pub const FALLBACK_NORMAL: [f32; 3] = [0.5, 0.5, 1.0];

/// Raw per-group material values as reported by the (external) mesh
/// loader, before atlas resolution.
#[derive(Debug, Clone, Default)]
pub struct RawGroupMaterial {
    pub map_kd: Option<String>,
    pub kd: Option<[f32; 3]>,
    pub map_pmr: Option<String>,
    pub pmr_swizzle: Option<String>,
    pub pmr: Option<[f32; 3]>,
    pub map_kem: Option<String>,
    pub kem: Option<[f32; 3]>,
    pub map_bump: Option<String>,
    pub ior: Option<f32>,
    pub dielectric: Option<f32>,
}

/// External texture-atlas packer: accepts images or colors, returns an
/// integer index into the packed atlas array.
pub trait TexturePacker {
    fn pack_color(&mut self, color: [f32; 3]) -> i32;
    fn pack_path(&mut self, path: &str) -> i32;
    fn pack_path_swizzled(&mut self, path: &str, swizzle: &str) -> i32 {
        let _ = swizzle;
        self.pack_path(path)
    }
}

fn resolve_channel(
    loader_path: &Option<String>,
    loader_color: &Option<[f32; 3]>,
    world_override: &Option<ColorOrPath>,
    fallback: [f32; 3],
    packer: &mut dyn TexturePacker,
) -> i32 {
    if let Some(path) = loader_path {
        return packer.pack_path(path);
    }
    if let Some(color) = loader_color {
        return packer.pack_color(*color);
    }
    match world_override {
        Some(ColorOrPath::Path(path)) => packer.pack_path(path),
        Some(ColorOrPath::Color(color)) => packer.pack_color(*color),
        None => packer.pack_color(fallback),
    }
}

/// Resolve a group's material following the §4.5 precedence chains.
///
/// `emittance` is the prop's raw radiance (§3, §4.4 step 4), not an atlas
/// channel — it is carried straight onto the resolved `Material` rather
/// than routed through the texture packer.
pub fn resolve_material(
    raw: &RawGroupMaterial,
    overrides: &WorldTransformEntry,
    emittance: [f32; 3],
    packer: &mut dyn TexturePacker,
) -> Material {
    let diffuse_index = resolve_channel(&raw.map_kd, &raw.kd, &overrides.diffuse, FALLBACK_DIFFUSE, packer);

    let roughness_index = if let Some(path) = &raw.map_pmr {
        match &raw.pmr_swizzle {
            Some(sw) => packer.pack_path_swizzled(path, sw),
            None => packer.pack_path(path),
        }
    } else if let Some(color) = raw.pmr {
        packer.pack_color(color)
    } else {
        match (&overrides.metallic_roughness, &overrides.mr_swizzle) {
            (Some(ColorOrPath::Path(path)), Some(sw)) => packer.pack_path_swizzled(path, sw),
            (Some(ColorOrPath::Path(path)), None) => packer.pack_path(path),
            (Some(ColorOrPath::Color(color)), _) => packer.pack_color(*color),
            (None, _) => packer.pack_color(FALLBACK_ROUGHNESS),
        }
    };

    let emission_index = resolve_channel(&raw.map_kem, &raw.kem, &overrides.emission, FALLBACK_EMISSION, packer);

    let normal_index = if let Some(path) = &raw.map_bump {
        packer.pack_path(path)
    } else {
        match &overrides.normal {
            Some(ColorOrPath::Path(path)) => packer.pack_path(path),
            Some(ColorOrPath::Color(color)) => packer.pack_color(*color),
            None => packer.pack_color(FALLBACK_NORMAL),
        }
    };

    let ior = raw.ior.or(overrides.ior).unwrap_or(DEFAULT_IOR);
    let dielectric = raw.dielectric.or(overrides.dielectric).unwrap_or(DEFAULT_DIELECTRIC);

    Material {
        diffuse_index,
        roughness_index,
        emission_index,
        normal_index,
        emittance,
        ior,
        dielectric,
        extended: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakePacker {
        next: i32,
        pub calls: Vec<String>,
    }

    impl TexturePacker for FakePacker {
        fn pack_color(&mut self, color: [f32; 3]) -> i32 {
            self.calls.push(format!("color:{:?}", color));
            let idx = self.next;
            self.next += 1;
            idx
        }
        fn pack_path(&mut self, path: &str) -> i32 {
            self.calls.push(format!("path:{path}"));
            let idx = self.next;
            self.next += 1;
            idx
        }
    }

    #[test]
    fn loader_texture_wins_over_everything_else() {
        let raw = RawGroupMaterial {
            map_kd: Some("diffuse.png".into()),
            kd: Some([1.0, 0.0, 0.0]),
            ..Default::default()
        };
        let overrides = WorldTransformEntry {
            diffuse: Some(ColorOrPath::Color([0.0, 1.0, 0.0])),
            ..Default::default()
        };
        let mut packer = FakePacker::default();
        let mat = resolve_material(&raw, &overrides, [0.0, 0.0, 0.0], &mut packer);
        assert_eq!(packer.calls[0], "path:diffuse.png");
        assert_eq!(mat.diffuse_index, 0);
    }

    #[test]
    fn falls_through_to_world_transform_color_when_loader_is_silent() {
        let raw = RawGroupMaterial::default();
        let overrides = WorldTransformEntry {
            diffuse: Some(ColorOrPath::Color([0.2, 0.3, 0.4])),
            ..Default::default()
        };
        let mut packer = FakePacker::default();
        let mat = resolve_material(&raw, &overrides, [0.0, 0.0, 0.0], &mut packer);
        assert_eq!(packer.calls[0], "color:[0.2, 0.3, 0.4]");
        assert_eq!(mat.diffuse_index, 0);
    }

    #[test]
    fn falls_back_to_default_diffuse_when_nothing_resolves() {
        let raw = RawGroupMaterial::default();
        let overrides = WorldTransformEntry::default();
        let mut packer = FakePacker::default();
        let mat = resolve_material(&raw, &overrides, [0.0, 0.0, 0.0], &mut packer);
        assert_eq!(packer.calls[0], "color:[0.5, 0.5, 0.5]");
        assert_eq!(mat.diffuse_index, 0);
    }

    #[test]
    fn ior_and_dielectric_fall_through_material_then_transforms_then_default() {
        let mut packer = FakePacker::default();

        let raw = RawGroupMaterial { ior: Some(1.8), ..Default::default() };
        let overrides = WorldTransformEntry { ior: Some(2.0), ..Default::default() };
        let mat = resolve_material(&raw, &overrides, [0.0, 0.0, 0.0], &mut packer);
        assert_eq!(mat.ior, 1.8);

        let raw = RawGroupMaterial::default();
        let mat = resolve_material(&raw, &overrides, [0.0, 0.0, 0.0], &mut packer);
        assert_eq!(mat.ior, 2.0);

        let mat = resolve_material(&raw, &WorldTransformEntry::default(), [0.0, 0.0, 0.0], &mut packer);
        assert_eq!(mat.ior, DEFAULT_IOR);
        assert_eq!(mat.dielectric, DEFAULT_DIELECTRIC);
    }

    #[test]
    fn emittance_is_carried_onto_the_material_untouched_by_the_packer() {
        let raw = RawGroupMaterial::default();
        let overrides = WorldTransformEntry::default();
        let mut packer = FakePacker::default();
        let mat = resolve_material(&raw, &overrides, [2.0, 1.5, 0.0], &mut packer);
        assert_eq!(mat.emittance, [2.0, 1.5, 0.0]);
    }
}
