//! # Stratum
//!
//! A display layer-stack adapter: the glue between a display server's
//! per-frame layer list and a lower-level composition engine.
//!
//! Each frame, the adapter translates the externally owned layer list into
//! an arena-backed internal stack without per-layer allocations, asks the
//! engine for composition decisions, and uses a frame-to-frame cache to
//! decide whether the GPU actually has to redraw anything. Fences flow
//! through in both directions; pixels never do.
//!
//! ## Architecture
//!
//! - `arena`: layer-stack arena (sizing, reuse-vs-grow, carving)
//! - `translate`: external layer list → internal stack
//! - `cache`: frame-to-frame composition cache and the redraw decision
//! - `commit`: buffer/fence attach and fence propagation around commit
//! - `display`: per-display front object and plumbing
//! - `engine`: contracts for the composition engine and the display server
//! - `frame`: caller-owned frame contents
//! - `layer`: internal layer-stack data model
//! - `sync`: fence descriptors
//!
//! ## Usage
//!
//! ```no_run
//! use stratum::{Display, FrameContents};
//! # use stratum::{CompositionEngine, DisplayConfigInfo, DisplayState, EngineError, LayerStackView};
//! # struct Engine;
//! # impl CompositionEngine for Engine {
//! #     fn prepare(&mut self, _: &mut LayerStackView<'_>) -> Result<(), EngineError> { Ok(()) }
//! #     fn commit(&mut self, _: &mut LayerStackView<'_>) -> Result<(), EngineError> { Ok(()) }
//! #     fn set_vsync(&mut self, _: bool) -> Result<(), EngineError> { Ok(()) }
//! #     fn set_display_state(&mut self, _: DisplayState) -> Result<(), EngineError> { Ok(()) }
//! #     fn config(&self) -> Result<DisplayConfigInfo, EngineError> { unimplemented!() }
//! # }
//!
//! fn present(display: &mut Display<Engine>, contents: &mut FrameContents) -> anyhow::Result<()> {
//!     display.prepare(contents)?;
//!     display.commit(contents)?;
//!     Ok(())
//! }
//! ```

pub mod arena;
pub mod cache;
pub mod commit;
pub mod display;
pub mod engine;
pub mod error;
pub mod frame;
pub mod layer;
pub mod sync;
pub mod translate;

pub use arena::{LayerStackArena, LayerStackView, ARENA_SIZE_STEP};
pub use cache::CompositionCache;
pub use display::{Display, DisplayEvent, DisplayKind};
pub use engine::{CompositionEngine, DisplayConfigInfo, DisplayEventHandler, DisplayState};
pub use error::{DisplayError, EngineError};
pub use frame::{
    BufferHandle, BufferId, CompositionType, FrameContents, FrameLayer, PixelRect,
};
pub use layer::{
    Layer, LayerBlending, LayerBuffer, LayerBufferFormat, LayerComposition, LayerFlags,
    LayerRect, LayerStackFlags, LayerTransform, RectSpan,
};
pub use sync::Fence;

/// Version information for Stratum
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
