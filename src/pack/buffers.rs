//! Packing of BVH/triangle/material data into flat, padded float arrays
//! suitable for upload as 2D textures, plus bytemuck-castable storage-buffer
//! views over the same data for the GPU-binding adapter (§3, §6).

use bytemuck::{Pod, Zeroable};

/// A packed float buffer plus the 2D layout the shader-side texture sampler
/// needs: `width`/`height` in pixels, `channels` floats per pixel.
#[derive(Debug, Clone)]
pub struct PackedBuffer {
    pub data: Vec<f32>,
    pub width: usize,
    pub height: usize,
    pub channels: usize,
}

/// Value used to pad unused cells at the tail of a packed buffer.
pub const PAD_VALUE: f32 = -1.0;

/// Pack `n_records` records of `floats_per_record` floats each into a
/// square-ish 2D texture with `channels` floats per pixel, tail-padded with
/// [`PAD_VALUE`].
///
/// `width = ceil(sqrt(numPixels) / pixels_per_record) * pixels_per_record`,
/// `height = ceil(numPixels / width)`, where `numPixels = n_records *
/// pixels_per_record` and `pixels_per_record = floats_per_record /
/// channels` (§6).
pub fn pack_records(flat: &[f32], floats_per_record: usize, channels: usize) -> PackedBuffer {
    debug_assert_eq!(flat.len() % floats_per_record, 0);
    debug_assert_eq!(floats_per_record % channels, 0);

    let pixels_per_record = floats_per_record / channels;
    let n_records = flat.len() / floats_per_record.max(1);
    let num_pixels = n_records * pixels_per_record;

    if num_pixels == 0 {
        let data = vec![PAD_VALUE; pixels_per_record * channels];
        return PackedBuffer {
            data,
            width: pixels_per_record,
            height: 1,
            channels,
        };
    }

    let raw_width = (num_pixels as f32).sqrt() / pixels_per_record as f32;
    let width = (raw_width.ceil() as usize).max(1) * pixels_per_record;
    let height = num_pixels.div_ceil(width);

    let total_floats = width * height * channels;
    debug_assert!(total_floats >= flat.len(), "padding count must be non-negative");

    let mut data = vec![PAD_VALUE; total_floats];
    data[..flat.len()].copy_from_slice(flat);
    PackedBuffer {
        data,
        width,
        height,
        channels,
    }
}

/// Bytemuck-castable view of a packed BVH node record (mirrors
/// [`crate::bvh::SerializedBvhRecord::to_floats`]).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct GpuBvhNode {
    pub cells: [f32; 9],
}

/// Bytemuck-castable view of a packed triangle's 9 position floats.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct GpuTriangle {
    pub cells: [f32; 9],
}

/// Bytemuck-castable view of a packed material's 12 floats (4 indices, 2
/// pad, 3 emittance, IOR, dielectric, 1 pad).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct GpuMaterial {
    pub cells: [f32; 12],
}
