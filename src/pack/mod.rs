//! Flat, GPU-uploadable buffer packing.

pub mod buffers;

pub use buffers::{pack_records, GpuBvhNode, GpuMaterial, GpuTriangle, PackedBuffer, PAD_VALUE};
