//! End-to-end integration tests driving the scene compiler, autofocus, and
//! render loop together, the way the CLI binary wires them.

use glam::Vec3;
use pathtrace_compiler::prelude::*;
use pathtrace_compiler::scene::{LoadedGroup, LoadedProp, MeshLoader, PropDescriptor, RawTriangle, RunMode};

struct StubLoader;

impl MeshLoader for StubLoader {
    fn load(&self, prop: &PropDescriptor) -> Result<LoadedProp> {
        if prop.path == "missing.obj" {
            return Err(Error::AssetMissing(prop.path.clone().into()));
        }
        let tri = RawTriangle {
            verts: [Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)],
            uvs: [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
            normals: [Vec3::Z; 3],
            tangents: [Vec3::X; 3],
            bitangents: [Vec3::Y; 3],
        };
        Ok(LoadedProp {
            groups: vec![LoadedGroup { triangles: vec![tri], material: Default::default() }],
            transform: None,
        })
    }
}

struct StubPacker;
impl pathtrace_compiler::scene::TexturePacker for StubPacker {
    fn pack_color(&mut self, _color: [f32; 3]) -> i32 {
        1
    }
    fn pack_path(&mut self, _path: &str) -> i32 {
        2
    }
}

fn descriptor(json: &str) -> pathtrace_compiler::scene::SceneDescriptor {
    pathtrace_compiler::scene::SceneDescriptor::parse(json).unwrap()
}

#[test]
fn s1_single_triangle_scene_compiles_to_one_bvh_record_and_packed_buffers() {
    let desc = descriptor(r#"{"props":[{"path":"tri.obj"}]}"#);
    let loader = StubLoader;
    let mut packer = StubPacker;
    let compiled = compile_scene(&desc, &loader, &mut packer, 0, RunMode::default()).unwrap();

    assert_eq!(compiled.triangles.len(), 1);
    assert_eq!(compiled.serialized_bvh.records.len(), 1);
    assert!(compiled.bvh_buffer.data.len() >= 9);
    assert!(compiled.triangles_buffer.data.len() >= 9);
}

#[test]
fn s4_autofocus_probe_hits_the_compiled_scenes_triangle() {
    let desc = descriptor(r#"{"props":[{"path":"tri.obj"}]}"#);
    let loader = StubLoader;
    let mut packer = StubPacker;
    let compiled = compile_scene(&desc, &loader, &mut packer, 0, RunMode::default()).unwrap();

    let eye = Vec3::new(0.25, 0.25, 1.0);
    let dir = Vec3::new(0.0, 0.0, -1.0);
    let result = autofocus(&compiled.bvh_root, &compiled.triangles, eye, dir, 0.05);
    assert!((result.focal_depth - 1.0).abs() < 1e-6);
}

#[test]
fn missing_asset_propagates_as_a_fatal_error() {
    let desc = descriptor(r#"{"props":[{"path":"missing.obj"}]}"#);
    let loader = StubLoader;
    let mut packer = StubPacker;
    match compile_scene(&desc, &loader, &mut packer, 0, RunMode::default()) {
        Err(Error::AssetMissing(_)) => {}
        other => panic!("expected AssetMissing, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn s6_render_loop_over_a_compiled_scene_halts_at_the_sample_budget() {
    struct RecordingPresenter(u32);
    impl FramePresenter for RecordingPresenter {
        fn draw_camera(&mut self) {}
        fn draw_tracer(&mut self, _pingpong: u32, _res_scale: f32) {
            self.0 += 1;
        }
        fn draw_quad(&mut self, _pingpong: u32, _res_scale: f32) {}
        fn clear_accumulators(&mut self) {}
    }

    let desc = descriptor(r#"{"props":[{"path":"tri.obj"}]}"#);
    let loader = StubLoader;
    let mut packer = StubPacker;
    let _compiled = compile_scene(&desc, &loader, &mut packer, 0, RunMode::default()).unwrap();

    let mut loop_state = RenderLoop::new(Some(8));
    let mut presenter = RecordingPresenter(0);
    while loop_state.tick(&mut presenter, true) == TickOutcome::Continue {}
    assert_eq!(presenter.0, 8);
}
