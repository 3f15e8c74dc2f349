//! Error types for the scene compiler and render loop.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the host-side compiler and render loop.
///
/// Per the error model: everything here is fatal at startup (asset,
/// descriptor, and environment errors) or a logic-bug assertion (padding
/// underflow). Ray misses and autofocus no-hits are not errors — they
/// return the sentinel `maxT` and never reach this type.
#[derive(Error, Debug)]
pub enum Error {
    /// Scene descriptor JSON failed to parse or was missing required fields.
    #[error("malformed scene descriptor: {0}")]
    MalformedScene(String),

    /// Mesh loader could not resolve an asset path.
    #[error("asset not found: {0}")]
    AssetMissing(PathBuf),

    /// A prop referenced a material group the mesh loader never emitted.
    #[error("material group not found: {0}")]
    MaterialGroupMissing(String),

    /// Required GPU extension/feature absent at adapter init.
    #[error("unsupported GPU environment: {0}")]
    EnvironmentUnsupported(String),

    /// Shader module failed to compile (info log attached).
    #[error("shader compile failure ({kind}): {log}")]
    ShaderCompile { kind: String, log: String },

    /// JSON (de)serialization failure.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error reading scene assets or writing output images.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image encode/decode failure on the present-pass output.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Generic error with message, used sparingly for one-off failures.
    #[error("{0}")]
    Other(String),
}

impl Error {
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedScene(msg.into())
    }
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
