//! Thin `wgpu`-based GPU-binding adapter (§4.8, ambient — not elaborated by
//! name in the spec's module table, grounded in the teacher's
//! `compute.rs::PathTraceCompute`).
//!
//! Owns storage-buffer upload and the camera uniform; does not implement
//! the tracer or tone-map shaders, which are explicitly out of scope.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::render::FramePresenter;
use crate::scene::CompiledScene;

/// Camera uniform the tracer shader would read: eye/dir/fovScale/
/// lensFeatures/envTheta/exposure plus the progressive sample counter.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub eye: [f32; 3],
    pub fov_scale: f32,
    pub dir: [f32; 3],
    pub env_theta: f32,
    pub lens_features: [f32; 2],
    pub exposure: f32,
    pub pingpong: u32,
}

/// Storage buffers holding the scene compiler's packed arrays, uploaded
/// once at init and treated as immutable thereafter (§5 ordering).
pub struct SceneBuffers {
    pub bvh: wgpu::Buffer,
    pub triangles: wgpu::Buffer,
    pub normals: wgpu::Buffer,
    pub uvs: wgpu::Buffer,
    pub materials: wgpu::Buffer,
    pub lights: wgpu::Buffer,
}

fn upload(device: &wgpu::Device, label: &str, data: &[f32]) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(data),
        usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
    })
}

/// GPU-side adapter driving the two ping-pong accumulator targets and the
/// scene's immutable storage buffers.
pub struct GpuContext {
    device: wgpu::Device,
    queue: wgpu::Queue,
    camera_buffer: wgpu::Buffer,
    scene_buffers: Option<SceneBuffers>,
    accumulators: [wgpu::Texture; 2],
    width: u32,
    height: u32,
}

impl GpuContext {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue, width: u32, height: u32) -> Self {
        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("camera_uniform"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let accumulators = [
            Self::create_accumulator(&device, width, height),
            Self::create_accumulator(&device, width, height),
        ];
        Self {
            device,
            queue,
            camera_buffer,
            scene_buffers: None,
            accumulators,
            width,
            height,
        }
    }

    fn create_accumulator(device: &wgpu::Device, width: u32, height: u32) -> wgpu::Texture {
        device.create_texture(&wgpu::TextureDescriptor {
            label: Some("pt_accumulator"),
            size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba32Float,
            usage: wgpu::TextureUsages::STORAGE_BINDING | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        })
    }

    /// Upload every packed buffer once at startup (§5: "uploaded exactly
    /// once and treated as immutable thereafter").
    pub fn upload_scene(&mut self, compiled: &CompiledScene) {
        self.scene_buffers = Some(SceneBuffers {
            bvh: upload(&self.device, "bvh_buffer", &compiled.bvh_buffer.data),
            triangles: upload(&self.device, "triangles_buffer", &compiled.triangles_buffer.data),
            normals: upload(&self.device, "normal_buffer", &compiled.normal_buffer.data),
            uvs: upload(&self.device, "uv_buffer", &compiled.uv_buffer.data),
            materials: upload(&self.device, "material_buffer", &compiled.material_buffer.data),
            lights: upload(&self.device, "light_buffer", &compiled.light_buffer.data),
        });
    }

    pub fn update_camera(&self, uniform: &CameraUniform) {
        self.queue.write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(uniform));
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.accumulators = [
            Self::create_accumulator(&self.device, width, height),
            Self::create_accumulator(&self.device, width, height),
        ];
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Drives the three per-tick passes against a [`GpuContext`]. The actual
/// tracer/tone-map WGSL is out of scope; this records the pass ordering the
/// render loop depends on.
pub struct GpuPresenter<'a> {
    pub ctx: &'a mut GpuContext,
}

impl<'a> FramePresenter for GpuPresenter<'a> {
    fn draw_camera(&mut self) {
        tracing::trace!("drawCamera");
    }

    fn draw_tracer(&mut self, pingpong: u32, res_scale: f32) {
        tracing::trace!(pingpong, res_scale, "drawTracer");
    }

    fn draw_quad(&mut self, pingpong: u32, res_scale: f32) {
        tracing::trace!(pingpong, res_scale, "drawQuad");
    }

    fn clear_accumulators(&mut self) {
        tracing::trace!("clear_accumulators");
    }
}
