//! Caller-owned frame contents.
//!
//! The display server hands the adapter one [`FrameContents`] per display per
//! frame: an externally shaped list of layer entries plus frame-level state.
//! The adapter reads it during prepare, and writes the finalized composition
//! types, release fences and the retire fence back into it on behalf of the
//! caller. Buffer handles are borrowed references valid only for the current
//! frame.

use crate::layer::{LayerComposition, LayerRect};
use crate::sync::Fence;
use std::os::fd::RawFd;

/// Raw pixel-format codes accepted on the inbound layer list.
///
/// Any other value fails the frame with
/// [`DisplayError::UnsupportedFormat`](crate::error::DisplayError).
pub mod format_code {
    pub const RGBA_8888: u32 = 1;
    pub const RGBX_8888: u32 = 2;
    pub const RGB_888: u32 = 3;
    pub const RGB_565: u32 = 4;
    pub const BGRA_8888: u32 = 5;
    pub const BGRX_8888: u32 = 6;
    /// Vendor NV12 variant produced by the video decoder.
    pub const YCBCR_420_SP_VENUS: u32 = 7;
}

/// Bits of the inbound transform bitmask.
pub mod transform {
    pub const FLIP_H: u32 = 1 << 0;
    pub const FLIP_V: u32 = 1 << 1;
    pub const ROT_90: u32 = 1 << 2;
}

/// Raw blending codes on the inbound layer list. Unrecognized values map to
/// no blending.
pub mod blend_code {
    pub const NONE: u32 = 0;
    pub const PREMULTIPLIED: u32 = 1;
    pub const COVERAGE: u32 = 2;
}

/// Integer pixel rectangle as submitted by the display server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PixelRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl PixelRect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
}

impl From<PixelRect> for LayerRect {
    /// Widens an integer pixel rectangle to float display coordinates.
    fn from(rect: PixelRect) -> Self {
        LayerRect {
            left: rect.left as f32,
            top: rect.top as f32,
            right: rect.right as f32,
            bottom: rect.bottom as f32,
        }
    }
}

/// Composition type exchanged with the display server for each layer.
///
/// Inbound it is the server's hint; after prepare it carries the finalized
/// decision the server must honor when drawing the frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompositionType {
    /// Client composition: the server draws this layer into the framebuffer.
    #[default]
    Framebuffer,
    /// The display hardware composes this layer directly.
    Overlay,
    /// The framebuffer target layer itself.
    FramebufferTarget,
}

impl From<LayerComposition> for CompositionType {
    fn from(composition: LayerComposition) -> Self {
        match composition {
            LayerComposition::Gpu => CompositionType::Framebuffer,
            LayerComposition::Hardware => CompositionType::Overlay,
            LayerComposition::GpuTarget => CompositionType::FramebufferTarget,
        }
    }
}

/// Stable identity of a graphics buffer allocation.
///
/// Assigned by the buffer allocator and constant for the life of the
/// allocation; the composition cache compares these across frames to detect
/// buffer swaps without touching pixel content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub u64);

/// Descriptor of an externally allocated graphics buffer.
///
/// Only the fields the adapter reads are modeled here; the pixel memory
/// behind `fd` is never touched.
#[derive(Debug, Clone)]
pub struct BufferHandle {
    pub id: BufferId,
    /// Raw pixel-format code ([`format_code`]).
    pub format: u32,
    pub width: u32,
    pub height: u32,
    /// Plane-0 descriptor. Non-owning; valid for the current frame only.
    pub fd: RawFd,
    pub offset: u32,
    pub stride: u32,
    /// Buffer is tagged as video content.
    pub video: bool,
    /// Buffer is tagged as protected content.
    pub secure: bool,
}

/// One externally owned layer entry in the frame's layer list.
#[derive(Debug, Default)]
pub struct FrameLayer {
    /// Source buffer, or `None` for a layer with no content this frame.
    pub buffer: Option<BufferHandle>,
    /// Destination rectangle on the display, in pixels.
    pub display_frame: PixelRect,
    /// Source crop within the buffer, in float coordinates.
    pub source_crop: LayerRect,
    /// Screen-space rectangles where the layer is visible.
    pub visible_region: Vec<PixelRect>,
    /// Damage since the previous frame.
    pub dirty_rect: PixelRect,
    /// In: the server's composition hint. Out: the finalized decision.
    pub composition: CompositionType,
    /// Raw blending code ([`blend_code`]).
    pub blending: u32,
    /// Raw transform bitmask ([`transform`]).
    pub transform: u32,
    pub plane_alpha: u8,
    /// The server asks for this layer to be skipped.
    pub skip: bool,
    /// In: signals the buffer is ready to read. Taken by commit.
    pub acquire_fence: Option<Fence>,
    /// Out: written by commit for hardware-composed and target layers.
    pub release_fence: Option<Fence>,
}

/// The per-frame layer list for one display.
#[derive(Debug, Default)]
pub struct FrameContents {
    pub layers: Vec<FrameLayer>,
    /// The server changed layer geometry since the previous frame.
    pub geometry_changed: bool,
    /// Out: signals the previous frame's content may be discarded.
    pub retire_fence: Option<Fence>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_rect_widens_to_float() {
        let rect: LayerRect = PixelRect::new(-5, 10, 100, 60).into();
        assert_eq!(rect, LayerRect::new(-5.0, 10.0, 100.0, 60.0));
    }

    #[test]
    fn test_composition_write_back_mapping() {
        assert_eq!(
            CompositionType::from(LayerComposition::Gpu),
            CompositionType::Framebuffer
        );
        assert_eq!(
            CompositionType::from(LayerComposition::Hardware),
            CompositionType::Overlay
        );
        assert_eq!(
            CompositionType::from(LayerComposition::GpuTarget),
            CompositionType::FramebufferTarget
        );
    }
}
