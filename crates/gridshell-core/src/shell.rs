#![forbid(unsafe_code)]

//! Event-capture-and-render-synchronization loop.
//!
//! [`Shell`] ties the pieces together: raw input is normalized, queued into
//! the engine in exact arrival order, and each accepted event requests one
//! paint callback through the injected [`FrameRequester`]. When the callback
//! fires, the engine runs exactly once — the sole point where queued input is
//! consumed — and every cell is read back and written to the sink. No input
//! coalescing is done here; the paint primitive is the natural coalescing
//! point, since any number of synchronous handlers run between two frames.
//!
//! Before bootstrap completes the engine is absent and all input is silently
//! dropped — no buffering, no error. This window is intentional.

use tracing::{debug, trace};

use crate::engine::Engine;
use crate::geometry::GridSize;
use crate::input::{DefaultHandling, InputNormalizer, RawKey, RawKeyPress, RawPointer, RawWheel};
use crate::sink::GridSink;

/// Injected paint-scheduling capability.
pub trait FrameRequester {
    /// Request a single future paint callback.
    ///
    /// Contract: the callback fires at most once per paint frame no matter
    /// how many requests land within that frame, it always fires once
    /// requested (no cancellation), and it runs to completion atomically
    /// with respect to input handlers.
    fn request_frame(&mut self);
}

/// The shell: engine handle, display sink, normalizer, and frame scheduling.
///
/// Single-threaded and event-driven; every method runs to completion, and the
/// only mutable state outside the engine is the wheel unit estimate inside
/// the normalizer.
#[derive(Debug)]
pub struct Shell<E, S, R> {
    size: GridSize,
    engine: Option<E>,
    sink: S,
    frames: R,
    normalizer: InputNormalizer,
}

impl<E, S, R> Shell<E, S, R>
where
    E: Engine,
    S: GridSink,
    R: FrameRequester,
{
    /// Create a shell with no engine yet. Input is dropped until
    /// [`Shell::install_engine`] runs.
    pub fn new(size: GridSize, sink: S, frames: R) -> Self {
        Self {
            size,
            engine: None,
            sink,
            frames,
            normalizer: InputNormalizer::new(size),
        }
    }

    /// Whether bootstrap has completed and input is being accepted.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.engine.is_some()
    }

    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// The installed engine, if bootstrap has completed.
    #[must_use]
    pub const fn engine(&self) -> Option<&E> {
        self.engine.as_ref()
    }

    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Install the freshly created engine, fix its dimensions, and request
    /// the unconditional initial frame so the grid renders before any input.
    pub fn install_engine(&mut self, mut engine: E) {
        engine.set_size(self.size.width, self.size.height);
        self.engine = Some(engine);
        debug!(
            width = self.size.width,
            height = self.size.height,
            "engine installed, requesting initial frame"
        );
        self.frames.request_frame();
    }

    /// Request a redraw outside the input path (fonts finished loading, page
    /// became visible again, …). Safe to call any number of times per frame;
    /// the paint primitive coalesces.
    pub fn request_update(&mut self) {
        self.frames.request_frame();
    }

    /// Handle a raw `keydown`. Returns the default-handling decision; before
    /// bootstrap the event is dropped and defaults stay untouched.
    pub fn key_down(&mut self, raw: &RawKey) -> DefaultHandling {
        let Some(engine) = self.engine.as_mut() else {
            trace!("dropping keydown before engine bootstrap");
            return DefaultHandling::Allow;
        };
        let (event, handling) = self.normalizer.key_down(raw);
        engine.push(event);
        self.frames.request_frame();
        handling
    }

    /// Handle a raw `keypress`. Suppresses defaults once the engine is live.
    pub fn key_press(&mut self, raw: &RawKeyPress) -> DefaultHandling {
        let Some(engine) = self.engine.as_mut() else {
            trace!("dropping keypress before engine bootstrap");
            return DefaultHandling::Allow;
        };
        let (event, handling) = self.normalizer.key_press(raw);
        engine.push(event);
        self.frames.request_frame();
        handling
    }

    /// Handle a raw pointer press. Off-grid positions are rejected.
    pub fn mouse_press(&mut self, raw: &RawPointer) {
        if self.engine.is_none() {
            trace!("dropping mouse press before engine bootstrap");
            return;
        }
        let cell = self.sink.pixel_to_cell(raw.pixel_x, raw.pixel_y);
        let Some(event) = self.normalizer.mouse_press(cell, raw.button) else {
            trace!(
                pixel_x = raw.pixel_x,
                pixel_y = raw.pixel_y,
                "rejecting off-grid mouse press"
            );
            return;
        };
        if let Some(engine) = self.engine.as_mut() {
            engine.push(event);
            self.frames.request_frame();
        }
    }

    /// Handle a raw pointer release, with the same rejection policy.
    pub fn mouse_release(&mut self, raw: &RawPointer) {
        if self.engine.is_none() {
            trace!("dropping mouse release before engine bootstrap");
            return;
        }
        let cell = self.sink.pixel_to_cell(raw.pixel_x, raw.pixel_y);
        let Some(event) = self.normalizer.mouse_release(cell, raw.button) else {
            trace!(
                pixel_x = raw.pixel_x,
                pixel_y = raw.pixel_y,
                "rejecting off-grid mouse release"
            );
            return;
        };
        if let Some(engine) = self.engine.as_mut() {
            engine.push(event);
            self.frames.request_frame();
        }
    }

    /// Handle a raw wheel event.
    ///
    /// The wheel unit estimate tightens even while the engine is still
    /// loading; only the event itself is dropped in that window. Once live,
    /// defaults are suppressed unconditionally so the page never scrolls.
    pub fn wheel(&mut self, raw: &RawWheel) -> DefaultHandling {
        let cell = self.sink.pixel_to_cell(raw.pixel_x, raw.pixel_y);
        let event = self.normalizer.wheel(cell, raw.delta_y);
        let Some(engine) = self.engine.as_mut() else {
            trace!("dropping wheel before engine bootstrap");
            return DefaultHandling::Allow;
        };
        match event {
            Some(event) => {
                engine.push(event);
                self.frames.request_frame();
            }
            None => trace!(
                pixel_x = raw.pixel_x,
                pixel_y = raw.pixel_y,
                "rejecting off-grid wheel"
            ),
        }
        DefaultHandling::Suppress
    }

    /// Paint-callback body: step the engine once, then flush every cell to
    /// the sink in row-major order. No-op until bootstrap completes.
    ///
    /// The full redraw is deliberate — cells are never diffed or cached, so
    /// the grid always reflects engine state after the latest input batch.
    pub fn on_frame(&mut self) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        engine.run();
        for (x, y) in self.size.cells() {
            // Invalid code points blank the cell.
            let glyph = char::from_u32(engine.glyph(x, y)).unwrap_or(' ');
            let fg = engine.foreground(x, y).to_hex();
            let bg = engine.background(x, y).to_hex();
            self.sink.draw(x, y, glyph, &fg, &bg);
        }
    }
}
