//! Per-display front object: the per-frame pipeline and display plumbing.
//!
//! One [`Display`] per physical display, each owning its own arena and
//! composition cache. The per-frame contract is two calls in order:
//! [`Display::prepare`] translates the caller's layer list, lets the engine
//! decide composition, and writes the finalized composition types back;
//! [`Display::commit`] attaches buffers and fences, commits through the
//! engine, and propagates release and retire fences back to the caller.
//! Displays are independent; nothing is shared between instances.

use log::{error, info, warn};

use crate::arena::LayerStackArena;
use crate::cache::CompositionCache;
use crate::commit;
use crate::engine::{CompositionEngine, DisplayConfigInfo, DisplayEventHandler, DisplayState};
use crate::error::DisplayError;
use crate::frame::FrameContents;
use crate::layer::LayerComposition;
use crate::translate;

/// Attribute codes accepted by [`Display::attribute`].
pub mod attribute {
    pub const VSYNC_PERIOD: u32 = 1;
    pub const WIDTH: u32 = 2;
    pub const HEIGHT: u32 = 3;
    pub const DPI_X: u32 = 4;
    pub const DPI_Y: u32 = 5;
    pub const SECURE: u32 = 6;
}

/// The kinds of display this adapter drives.
///
/// Variant-specific behavior is dispatched by `match` where it differs; the
/// stack, cache and arena logic is shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayKind {
    /// The built-in panel.
    Primary,
    /// A hotpluggable sink (HDMI and friends).
    External,
}

/// Events the server can enable or disable per display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayEvent {
    Vsync,
    Orientation,
}

/// One display's adapter state: arena, cache, engine and event plumbing.
pub struct Display<E: CompositionEngine> {
    kind: DisplayKind,
    id: u32,
    engine: E,
    events: Option<Box<dyn DisplayEventHandler>>,
    arena: LayerStackArena,
    cache: CompositionCache,
}

impl<E: CompositionEngine> Display<E> {
    pub fn new(kind: DisplayKind, id: u32, engine: E) -> Self {
        Self {
            kind,
            id,
            engine,
            events: None,
            arena: LayerStackArena::new(),
            cache: CompositionCache::new(),
        }
    }

    /// Registers the server-side callback sink for vsync and refresh events.
    pub fn set_event_handler(&mut self, handler: Box<dyn DisplayEventHandler>) {
        self.events = Some(handler);
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn kind(&self) -> DisplayKind {
        self.kind
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Prepare pass: builds this frame's layer stack and finalizes
    /// composition decisions into the caller's list.
    ///
    /// Frames with zero or one layer (the lone layer being the framebuffer
    /// target) present a single full-screen buffer; there is nothing to
    /// decide, so no stack is built and the engine is not consulted.
    ///
    /// # Errors
    ///
    /// [`DisplayError::OutOfMemory`] if the arena cannot grow,
    /// [`DisplayError::UnsupportedFormat`] for an unrecognized pixel format,
    /// [`DisplayError::Engine`] if the engine rejects the stack. The frame
    /// must then be skipped by the caller.
    pub fn prepare(&mut self, contents: &mut FrameContents) -> Result<(), DisplayError> {
        if contents.layers.len() <= 1 {
            return Ok(());
        }

        self.arena
            .allocate(contents.layers.iter().map(|l| l.visible_region.len() as u32))?;

        let mut stack = self.arena.stack_mut();
        translate::build_stack(contents, &self.cache, &mut stack)?;

        if let Err(e) = self.engine.prepare(&mut stack) {
            error!("display {}: prepare failed: {}", self.id, e);
            return Err(e.into());
        }

        let needs_redraw = self.cache.needs_redraw(&stack, contents);

        // Write the finalized decision back. When nothing forced a redraw,
        // non-target layers are promoted to hardware composition so the GPU
        // pass can be skipped; the cache keeps the engine's own decision.
        for (i, dst) in contents.layers.iter_mut().enumerate() {
            let mut composition = stack.layers[i].composition;
            if !needs_redraw && composition != LayerComposition::GpuTarget {
                composition = LayerComposition::Hardware;
            }
            dst.composition = composition.into();
        }

        self.cache.update(&stack, contents);

        Ok(())
    }

    /// Commit pass: submits the prepared stack and exchanges fences.
    ///
    /// Must follow a successful [`Self::prepare`] for the same contents. For
    /// degenerate 0/1-layer frames the sole acquire fence, if any, is
    /// released without engine interaction.
    ///
    /// Acquire-fence ownership transfers in at the start of the call and is
    /// released exactly once on every path, including engine rejection.
    pub fn commit(&mut self, contents: &mut FrameContents) -> Result<(), DisplayError> {
        if contents.layers.len() <= 1 {
            if let Some(layer) = contents.layers.first_mut() {
                layer.acquire_fence = None;
            }
            return Ok(());
        }

        let mut stack = self.arena.stack_mut();
        commit::attach_buffers(contents, &mut stack);

        if let Err(e) = self.engine.commit(&mut stack) {
            commit::release_acquire_fences(&mut stack);
            error!("display {}: commit failed: {}", self.id, e);
            return Err(e.into());
        }

        commit::finish_commit(contents, &mut stack);
        contents.retire_fence = stack.retire_fence.take();

        Ok(())
    }

    /// Blanks or unblanks the display.
    pub fn set_blank(&mut self, blank: bool) -> Result<(), DisplayError> {
        info!("display {}: blank = {}", self.id, blank);
        let state = if blank {
            DisplayState::Off
        } else {
            DisplayState::On
        };
        self.set_state(state)
    }

    pub fn set_state(&mut self, state: DisplayState) -> Result<(), DisplayError> {
        if let Err(e) = self.engine.set_display_state(state) {
            error!("display {}: set state failed: {}", self.id, e);
            return Err(e.into());
        }
        Ok(())
    }

    /// Powers the display pipe up.
    pub fn power_on(&mut self) -> Result<(), DisplayError> {
        match self.kind {
            DisplayKind::Primary => self.set_state(DisplayState::On),
            // Hotpluggable sinks power themselves; nothing to drive here.
            DisplayKind::External => Ok(()),
        }
    }

    /// Powers the display pipe down.
    pub fn power_off(&mut self) -> Result<(), DisplayError> {
        match self.kind {
            DisplayKind::Primary => self.set_state(DisplayState::Off),
            DisplayKind::External => Ok(()),
        }
    }

    /// Enables or disables delivery of a display event.
    ///
    /// Event kinds with no engine control path are accepted and ignored with
    /// a warning; that is a deliberate policy, not a failure.
    pub fn set_event_enabled(
        &mut self,
        event: DisplayEvent,
        enable: bool,
    ) -> Result<(), DisplayError> {
        match event {
            DisplayEvent::Vsync => {
                info!("display {}: vsync events {}", self.id, enable);
                if let Err(e) = self.engine.set_vsync(enable) {
                    error!(
                        "display {}: vsync control failed (enable = {}): {}",
                        self.id, enable, e
                    );
                    return Err(e.into());
                }
            }
            DisplayEvent::Orientation => {
                warn!("display {}: unsupported event {:?}", self.id, event);
            }
        }
        Ok(())
    }

    /// Forwards a vsync pulse to the server, if a handler is registered.
    pub fn handle_vsync(&self, timestamp_ns: i64) {
        if let Some(events) = &self.events {
            events.vsync(self.id, timestamp_ns);
        }
    }

    /// Asks the server to schedule a new frame, if a handler is registered.
    pub fn handle_refresh(&self) {
        if let Some(events) = &self.events {
            events.refresh(self.id);
        }
    }

    /// Identifiers of the supported display configurations. A single active
    /// configuration is exposed today.
    pub fn configs(&self) -> &'static [u32] {
        &[0]
    }

    /// Mode information for the active configuration.
    pub fn config(&self) -> Result<DisplayConfigInfo, DisplayError> {
        self.engine.config().map_err(|e| {
            error!("display {}: config query failed: {}", self.id, e);
            DisplayError::Engine(e)
        })
    }

    /// Queries one display attribute by code (see [`attribute`]).
    ///
    /// DPI values are scaled by 1000 to fit the integer exchange format.
    pub fn attribute(&self, code: u32) -> Result<i32, DisplayError> {
        let config = self.config()?;

        Ok(match code {
            attribute::VSYNC_PERIOD => config.vsync_period_ns as i32,
            attribute::WIDTH => config.x_pixels as i32,
            attribute::HEIGHT => config.y_pixels as i32,
            attribute::DPI_X => (config.x_dpi * 1000.0) as i32,
            attribute::DPI_Y => (config.y_dpi * 1000.0) as i32,
            // Physical displays are always secure sinks.
            attribute::SECURE => 1,
            other => {
                warn!("display {}: spurious attribute code {}", self.id, other);
                return Err(DisplayError::UnsupportedAttribute(other));
            }
        })
    }
}
