//! Stack commit adapter: buffer and fence exchange around engine commit.
//!
//! Acquire fences transfer into the stack for the duration of the commit and
//! are released exactly once whether or not the engine accepted the frame;
//! release fences produced by the engine are handed back to the caller's
//! layer slots.

use crate::arena::LayerStackView;
use crate::frame::FrameContents;
use crate::layer::LayerComposition;

/// Attaches each layer's plane descriptor and acquire fence ahead of engine
/// commit.
///
/// For layers with a buffer handle, plane-0 descriptor, offset and stride
/// are copied in; the acquire fence is taken from the caller's slot
/// unconditionally, transferring ownership to the stack.
pub fn attach_buffers(contents: &mut FrameContents, stack: &mut LayerStackView<'_>) {
    for (i, src) in contents.layers.iter_mut().enumerate() {
        let buffer = &mut stack.buffers[i];

        if let Some(handle) = &src.buffer {
            buffer.planes[0].fd = handle.fd;
            buffer.planes[0].offset = handle.offset;
            buffer.planes[0].stride = handle.stride;
        }

        buffer.acquire_fence = src.acquire_fence.take();
    }
}

/// Completes a successful engine commit: moves release fences out to the
/// caller for hardware-composed and target layers, and releases every
/// acquire fence.
pub fn finish_commit(contents: &mut FrameContents, stack: &mut LayerStackView<'_>) {
    for (i, dst) in contents.layers.iter_mut().enumerate() {
        let composition = stack.layers[i].composition;
        let buffer = &mut stack.buffers[i];

        if matches!(
            composition,
            LayerComposition::Hardware | LayerComposition::GpuTarget
        ) {
            dst.release_fence = buffer.release_fence.take();
        }

        buffer.acquire_fence = None;
    }
}

/// Releases every acquire fence held by the stack. Used on the engine
/// rejection path so a failed commit cannot leak descriptors.
pub fn release_acquire_fences(stack: &mut LayerStackView<'_>) {
    for buffer in stack.buffers.iter_mut() {
        buffer.acquire_fence = None;
    }
}
