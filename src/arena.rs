//! Layer-stack arena: per-frame storage for the internal layer array.
//!
//! Building a layer stack requires one layer record, one buffer descriptor,
//! N visible-region rectangles and one dirty rectangle per layer, with N and
//! the layer count changing every frame. Allocating those individually would
//! cost an allocation per layer per frame, so the arena sizes one logical
//! block for the whole frame and carves it into sub-allocations addressed by
//! index and [`RectSpan`] handles.
//!
//! The sizing policy is reuse-if-large-enough, else grow: the exact byte
//! requirement is computed from the frame's shape, and only when it exceeds
//! the current capacity does the arena reallocate, to the requirement rounded
//! up to the next [`ARENA_SIZE_STEP`] multiple. Capacity therefore never
//! shrinks for the lifetime of a display, amortizing reallocation cost across
//! frames. Growth relocates the pools, so no caller may retain a span or
//! index across frames.
//!
//! Every carved record is default-initialized every frame, whether or not the
//! backing storage was reused, so stale prior-frame contents never leak into
//! a new stack.

use std::mem::size_of;

use log::debug;

use crate::error::DisplayError;
use crate::layer::{Layer, LayerBuffer, LayerRect, LayerStackFlags, RectSpan};
use crate::sync::Fence;

/// Arena capacity is always rounded up to a multiple of this step, in bytes.
pub const ARENA_SIZE_STEP: usize = 4096;

fn round_up(value: usize, step: usize) -> usize {
    (value + step - 1) / step * step
}

/// Borrowed view of the current frame's layer stack.
///
/// Valid only until the next [`LayerStackArena::allocate`]; the view cannot
/// outlive the arena borrow that produced it. `buffers[i]` is the buffer
/// descriptor of `layers[i]`.
#[derive(Debug)]
pub struct LayerStackView<'a> {
    pub layers: &'a mut [Layer],
    pub buffers: &'a mut [LayerBuffer],
    pub rects: &'a mut [LayerRect],
    pub flags: &'a mut LayerStackFlags,
    /// Deposited by the engine on commit; moved out to the caller.
    pub retire_fence: &'a mut Option<Fence>,
}

impl LayerStackView<'_> {
    pub fn layer_count(&self) -> u32 {
        self.layers.len() as u32
    }

    /// The visible-region rectangles of the layer at `index`.
    pub fn visible_rects(&self, index: usize) -> &[LayerRect] {
        &self.rects[self.layers[index].visible_regions.range()]
    }

    /// The dirty rectangle of the layer at `index`.
    pub fn dirty_rect(&self, index: usize) -> &LayerRect {
        &self.rects[self.layers[index].dirty_region.start as usize]
    }
}

/// Display-owned arena holding the frame's layer array and every layer's
/// sub-allocations.
///
/// One instance per display; dropped with the display. The byte capacity is
/// accounted against the exact requirement of the record types
/// ([`Layer`], [`LayerBuffer`], [`LayerRect`]) and is monotonically
/// non-decreasing.
#[derive(Debug, Default)]
pub struct LayerStackArena {
    layers: Vec<Layer>,
    buffers: Vec<LayerBuffer>,
    rects: Vec<LayerRect>,
    flags: LayerStackFlags,
    retire_fence: Option<Fence>,
    /// Logical byte capacity; multiple of [`ARENA_SIZE_STEP`], never shrinks.
    capacity: usize,
    /// Scratch: per-layer visible-region counts for the current frame.
    shape: Vec<u32>,
}

impl LayerStackArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact byte requirement for a frame with the given per-layer
    /// visible-region counts: one [`Layer`] and one [`LayerBuffer`] per
    /// layer, plus one [`LayerRect`] per visible region and one more for the
    /// dirty rectangle.
    pub fn required_bytes(visible_counts: &[u32]) -> usize {
        let rect_count: usize = visible_counts.iter().map(|&v| v as usize + 1).sum();
        visible_counts.len() * (size_of::<Layer>() + size_of::<LayerBuffer>())
            + rect_count * size_of::<LayerRect>()
    }

    /// Current logical capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of layers carved for the current frame.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Sizes and carves the arena for one frame.
    ///
    /// `visible_counts` yields, per layer, how many visible-region
    /// rectangles that layer carries. On return the arena holds
    /// default-initialized records for every layer, with each layer's
    /// rectangle spans assigned in carve order: visible regions first, then
    /// the dirty rectangle.
    ///
    /// # Errors
    ///
    /// [`DisplayError::OutOfMemory`] when the backing storage cannot grow to
    /// the requirement. The frame must then be skipped; the arena contents
    /// are unspecified until the next successful `allocate`.
    pub fn allocate(
        &mut self,
        visible_counts: impl IntoIterator<Item = u32>,
    ) -> Result<(), DisplayError> {
        self.shape.clear();
        self.shape.extend(visible_counts);

        let layer_count = self.shape.len();
        let rect_count: usize = self.shape.iter().map(|&v| v as usize + 1).sum();
        let required = Self::required_bytes(&self.shape);

        // Reuse the existing allocation when it is large enough; otherwise
        // grow to the requirement rounded up to the next size step. Rounding
        // slack is granted to the rectangle pool, the variable-length part.
        let mut rect_slots = rect_count;
        if required > self.capacity {
            let rounded = round_up(required, ARENA_SIZE_STEP);
            rect_slots += (rounded - required) / size_of::<LayerRect>();
            self.capacity = rounded;
            debug!(
                "layer stack arena grew to {} bytes ({} layers, {} rects)",
                rounded, layer_count, rect_count
            );
        }

        self.layers.clear();
        self.buffers.clear();
        self.rects.clear();

        let oom = |requested: usize| DisplayError::OutOfMemory { requested };
        self.layers
            .try_reserve_exact(layer_count)
            .map_err(|_| oom(self.capacity))?;
        self.buffers
            .try_reserve_exact(layer_count)
            .map_err(|_| oom(self.capacity))?;
        self.rects
            .try_reserve_exact(rect_slots)
            .map_err(|_| oom(self.capacity))?;

        // Carve: per layer, visible-region rectangles then the dirty
        // rectangle, tightly packed in frame order. Everything is freshly
        // default-initialized even when the backing storage was reused.
        let mut cursor = 0u32;
        for &visible in &self.shape {
            let visible_regions = RectSpan {
                start: cursor,
                len: visible,
            };
            cursor += visible;
            let dirty_region = RectSpan {
                start: cursor,
                len: 1,
            };
            cursor += 1;

            self.layers.push(Layer {
                visible_regions,
                dirty_region,
                ..Layer::default()
            });
            self.buffers.push(LayerBuffer::default());
        }
        self.rects.resize(rect_count, LayerRect::default());

        self.flags = LayerStackFlags::default();
        self.retire_fence = None;

        Ok(())
    }

    /// Mutable view of the carved stack for the current frame.
    pub fn stack_mut(&mut self) -> LayerStackView<'_> {
        LayerStackView {
            layers: &mut self.layers,
            buffers: &mut self.buffers,
            rects: &mut self.rects,
            flags: &mut self.flags,
            retire_fence: &mut self.retire_fence,
        }
    }
}
