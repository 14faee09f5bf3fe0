//! Interfaces to the external collaborators: the lower-level composition
//! engine below the adapter and the display server hosting it above.
//!
//! Both sides are contracts only. The engine performs the actual scheduling,
//! blending and scan-out; the server receives vsync and invalidate
//! notifications. This crate never implements either.

use crate::arena::LayerStackView;
use crate::error::EngineError;

/// Power state of a display pipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    Off,
    On,
}

/// Mode information for the active display configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayConfigInfo {
    pub vsync_period_ns: u32,
    pub x_pixels: u32,
    pub y_pixels: u32,
    pub x_dpi: f32,
    pub y_dpi: f32,
}

/// The composition engine driving one display.
///
/// Per frame, [`prepare`](Self::prepare) receives the translated stack and
/// refines each layer's composition decision (it may claim layers for
/// hardware composition or push them to the GPU);
/// [`commit`](Self::commit) then consumes the plane- and fence-attached
/// stack, performs the composition, and deposits per-layer release fences
/// and the stack-level retire fence into the view. Non-success from either
/// pass aborts that pipeline stage.
pub trait CompositionEngine {
    fn prepare(&mut self, stack: &mut LayerStackView<'_>) -> Result<(), EngineError>;

    fn commit(&mut self, stack: &mut LayerStackView<'_>) -> Result<(), EngineError>;

    fn set_vsync(&mut self, enabled: bool) -> Result<(), EngineError>;

    fn set_display_state(&mut self, state: DisplayState) -> Result<(), EngineError>;

    fn config(&self) -> Result<DisplayConfigInfo, EngineError>;
}

/// Callbacks into the hosting display server.
pub trait DisplayEventHandler {
    /// A vsync pulse occurred on the display at the given timestamp.
    fn vsync(&self, display_id: u32, timestamp_ns: i64);

    /// The display's content is stale and the server should schedule a new
    /// frame.
    fn refresh(&self, display_id: u32);
}
