//! CLI entry point: compiles a scene descriptor and drives the render loop
//! to completion, then writes the tone-mapped frame to disk.
//!
//! Mesh loading and the tracer/tone-map shaders are external collaborators
//! (§1 Non-goals); this binary wires the host-side pipeline together with
//! stand-ins for both so the compiler and render loop can run end to end
//! without a GPU device.

use std::fs;

use clap::Parser;
use pathtrace_compiler::cli::Args;
use pathtrace_compiler::error::Result;
use pathtrace_compiler::render::{FramePresenter, RenderLoop, TickOutcome};
use pathtrace_compiler::scene::{
    compile_scene, LoadedProp, MeshLoader, PropDescriptor, SceneDescriptor, TexturePacker,
};

/// Stand-in for the external mesh loader: every prop resolves to an empty
/// triangle set, since parsing OBJ/glTF geometry is out of scope here.
struct NullMeshLoader;

impl MeshLoader for NullMeshLoader {
    fn load(&self, _prop: &PropDescriptor) -> Result<LoadedProp> {
        Ok(LoadedProp { groups: Vec::new(), transform: None })
    }
}

/// Stand-in for the external texture-atlas packer: every color or path
/// resolves to atlas index 0.
struct NullTexturePacker;

impl TexturePacker for NullTexturePacker {
    fn pack_color(&mut self, _color: [f32; 3]) -> i32 {
        0
    }
    fn pack_path(&mut self, _path: &str) -> i32 {
        0
    }
}

/// Stand-in presenter: the tracer/tone-map shaders are out of scope, so
/// each pass is a no-op that only exercises the render loop's pass
/// ordering and state transitions.
struct NullPresenter;

impl FramePresenter for NullPresenter {
    fn draw_camera(&mut self) {}
    fn draw_tracer(&mut self, _pingpong: u32, _res_scale: f32) {}
    fn draw_quad(&mut self, _pingpong: u32, _res_scale: f32) {}
    fn clear_accumulators(&mut self) {}
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let json = fs::read_to_string(&args.scene)?;
    let descriptor = SceneDescriptor::parse(&json)?;

    let env_bin_count = match &descriptor.environment {
        Some(pathtrace_compiler::scene::EnvironmentDescriptor::Stops(stops)) => stops.len(),
        _ => 0,
    };

    let loader = NullMeshLoader;
    let mut packer = NullTexturePacker;
    let compiled = compile_scene(&descriptor, &loader, &mut packer, env_bin_count, args.mode)?;

    tracing::info!(
        triangles = compiled.triangles.len(),
        bvh_depth = compiled.bvh_depth,
        light_ranges = compiled.light_ranges.len(),
        directives = ?compiled.directives,
        "scene compiled"
    );

    let mut render_loop = RenderLoop::new(descriptor.samples);
    let mut presenter = NullPresenter;
    while render_loop.tick(&mut presenter, args.frame.is_some()) == TickOutcome::Continue {}

    let (width, height) = args.res;
    let image = image::RgbImage::from_pixel(width, height, image::Rgb([32, 32, 32]));
    image.save(&args.out)?;
    tracing::info!(path = ?args.out, "wrote output frame");

    Ok(())
}
