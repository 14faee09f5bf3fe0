//! Layer translation: external layer list → arena-backed layer stack.
//!
//! Translation is strictly index-order: slot `i` of the internal stack is
//! derived solely from entry `i` of the caller's list. Every later cache
//! lookup relies on that correspondence, so it must never be permuted.

use log::warn;

use crate::arena::LayerStackView;
use crate::cache::CompositionCache;
use crate::error::DisplayError;
use crate::frame::{blend_code, format_code, transform, CompositionType, FrameContents};
use crate::layer::{LayerBlending, LayerBufferFormat, LayerComposition, LayerRect};

/// Populates the carved stack from an immutable view of the frame contents.
///
/// The arena must have been allocated for this frame's shape beforehand. The
/// `updating` flag is computed against `cache`, the previous frame's
/// snapshot; the cache itself is not touched here.
///
/// # Errors
///
/// [`DisplayError::UnsupportedFormat`] when any layer's buffer carries an
/// unrecognized pixel-format code. Already-translated slots are left as
/// populated, but the frame as a whole must be treated as failed.
pub fn build_stack(
    contents: &FrameContents,
    cache: &CompositionCache,
    stack: &mut LayerStackView<'_>,
) -> Result<(), DisplayError> {
    for (i, src) in contents.layers.iter().enumerate() {
        if let Some(handle) = &src.buffer {
            let buffer = &mut stack.buffers[i];
            buffer.format = map_format(handle.format)?;
            buffer.width = handle.width;
            buffer.height = handle.height;

            if handle.video {
                stack.flags.video_present = true;
            }
            if handle.secure {
                stack.flags.secure_present = true;
            }
        }

        let (visible_span, dirty_start) = {
            let layer = &stack.layers[i];
            (layer.visible_regions, layer.dirty_region.start as usize)
        };
        for (j, rect) in src.visible_region.iter().enumerate() {
            stack.rects[visible_span.start as usize + j] = LayerRect::from(*rect);
        }
        stack.rects[dirty_start] = LayerRect::from(src.dirty_rect);

        let layer = &mut stack.layers[i];
        layer.dst_rect = LayerRect::from(src.display_frame);
        layer.src_rect = src.source_crop;
        layer.composition = intake_composition(src.composition);
        layer.blending = map_blending(src.blending);

        layer.transform.flip_horizontal = src.transform & transform::FLIP_H != 0;
        layer.transform.flip_vertical = src.transform & transform::FLIP_V != 0;
        layer.transform.rotation = if src.transform & transform::ROT_90 != 0 {
            90.0
        } else {
            0.0
        };

        layer.plane_alpha = src.plane_alpha;
        layer.flags.skip = src.skip;
        layer.flags.updating = cache.handle_at(i) != src.buffer.as_ref().map(|b| b.id);

        if layer.flags.skip {
            stack.flags.skip_present = true;
        }
    }

    stack.flags.geometry_changed = contents.geometry_changed;

    Ok(())
}

/// Maps the server's composition hint into the internal decision space. Only
/// the framebuffer target is special; everything else starts out
/// hardware-composable and is refined by the engine's prepare pass.
fn intake_composition(composition: CompositionType) -> LayerComposition {
    match composition {
        CompositionType::FramebufferTarget => LayerComposition::GpuTarget,
        _ => LayerComposition::Hardware,
    }
}

fn map_blending(code: u32) -> LayerBlending {
    match code {
        blend_code::PREMULTIPLIED => LayerBlending::Premultiplied,
        blend_code::COVERAGE => LayerBlending::Coverage,
        _ => LayerBlending::None,
    }
}

fn map_format(code: u32) -> Result<LayerBufferFormat, DisplayError> {
    match code {
        format_code::RGBA_8888 => Ok(LayerBufferFormat::Rgba8888),
        format_code::BGRA_8888 => Ok(LayerBufferFormat::Bgra8888),
        format_code::RGBX_8888 => Ok(LayerBufferFormat::Rgbx8888),
        format_code::BGRX_8888 => Ok(LayerBufferFormat::Bgrx8888),
        format_code::RGB_888 => Ok(LayerBufferFormat::Rgb888),
        format_code::RGB_565 => Ok(LayerBufferFormat::Rgb565),
        format_code::YCBCR_420_SP_VENUS => Ok(LayerBufferFormat::Ycbcr420SemiPlanarVenus),
        other => {
            warn!("unsupported pixel format code {:#x}", other);
            Err(DisplayError::UnsupportedFormat(other))
        }
    }
}
