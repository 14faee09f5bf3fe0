//! Frame-to-frame composition cache and the redraw decision.
//!
//! The cache remembers, per layer slot, the buffer identity and composition
//! decision applied in the previous frame. Comparing the current frame
//! against it answers the one question that matters for power: does the GPU
//! actually have to redraw the framebuffer, or can last frame's composition
//! be reused? A wrong answer is visible either way: a false negative shows
//! stale pixels, a false positive burns a redundant GPU pass.
//!
//! The cache is read-only while the current frame's decisions are being
//! made and is overwritten exactly once per frame, after the redraw decision
//! has been consumed. Entries beyond the cached layer count are stale and
//! are ignored until overwritten.

use crate::arena::LayerStackView;
use crate::frame::{BufferId, FrameContents};
use crate::layer::LayerComposition;

#[derive(Debug, Clone, Copy, Default)]
struct CacheSlot {
    handle: Option<BufferId>,
    composition: LayerComposition,
}

/// Per-display cache of the previous frame's composition decisions.
///
/// Lives as long as the display; one slot per layer index.
#[derive(Debug, Default)]
pub struct CompositionCache {
    slots: Vec<CacheSlot>,
    layer_count: u32,
}

impl CompositionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer identity cached at `slot` from the previous frame, if any.
    pub fn handle_at(&self, slot: usize) -> Option<BufferId> {
        self.slots.get(slot).and_then(|s| s.handle)
    }

    /// Decides whether the framebuffer must be redrawn this frame.
    ///
    /// True when any of the following fired:
    /// 1. the layer count changed since the previous frame;
    /// 2. any layer is marked skip in the current stack;
    /// 3. the frame's geometry changed;
    /// 4. any non-target layer's decision differs from the cached decision;
    /// 5. any GPU-composed layer's buffer identity differs from the cached
    ///    identity.
    ///
    /// The GPU-target layer is excluded from the per-layer checks: it is a
    /// different buffer every frame and composed every frame by construction.
    pub fn needs_redraw(&self, stack: &LayerStackView<'_>, contents: &FrameContents) -> bool {
        if self.layer_count != stack.layer_count()
            || stack.flags.skip_present
            || stack.flags.geometry_changed
        {
            return true;
        }

        for (i, layer) in stack.layers.iter().enumerate() {
            if layer.composition == LayerComposition::GpuTarget {
                continue;
            }

            let cached = &self.slots[i];
            if cached.composition != layer.composition {
                return true;
            }

            if layer.composition == LayerComposition::Gpu
                && cached.handle != contents.layers[i].buffer.as_ref().map(|b| b.id)
            {
                return true;
            }
        }

        false
    }

    /// Records the finalized frame: buffer identity and composition decision
    /// for every non-target slot, plus the layer count.
    ///
    /// Must run exactly once per frame, after [`Self::needs_redraw`] has been
    /// consumed: the decision for frame N is computed against frame N-1's
    /// snapshot. The GPU-target slot is never written.
    pub fn update(&mut self, stack: &LayerStackView<'_>, contents: &FrameContents) {
        let layer_count = stack.layers.len();
        if self.slots.len() < layer_count {
            self.slots.resize(layer_count, CacheSlot::default());
        }

        for (i, layer) in stack.layers.iter().enumerate() {
            if layer.composition == LayerComposition::GpuTarget {
                continue;
            }

            self.slots[i] = CacheSlot {
                handle: contents.layers[i].buffer.as_ref().map(|b| b.id),
                composition: layer.composition,
            };
        }

        self.layer_count = layer_count as u32;
    }
}
