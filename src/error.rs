//! Error types for the display adapter.

use thiserror::Error;

/// Errors surfaced by the per-frame display pipeline.
///
/// There is no retry path anywhere in this crate: every error is reported
/// synchronously for the frame that produced it, and recovery (retrying,
/// falling back to simpler composition) is left to the caller.
#[derive(Debug, Error)]
pub enum DisplayError {
    /// The layer-stack arena could not grow to hold the current frame.
    /// Unrecoverable for this frame; no partial stack is exposed.
    #[error("layer stack arena allocation failed ({requested} bytes requested)")]
    OutOfMemory { requested: usize },

    /// The inbound layer list carried a pixel format this adapter does not
    /// recognize. Translation of the offending list is aborted.
    #[error("unsupported pixel format code {0:#x}")]
    UnsupportedFormat(u32),

    /// An attribute query used a code this adapter does not recognize.
    #[error("unsupported display attribute code {0}")]
    UnsupportedAttribute(u32),

    /// The composition engine rejected a prepare or commit pass.
    #[error("composition engine rejected the layer stack: {0}")]
    Engine(#[from] EngineError),
}

/// Failures reported by the composition engine interface.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The stack handed to the engine was malformed or unsupported.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The engine backend failed for reasons outside this adapter's control.
    #[error("backend failure: {0}")]
    Backend(String),
}
