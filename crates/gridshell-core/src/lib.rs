#![forbid(unsafe_code)]

//! `gridshell-core` is the host-agnostic half of a browser shell for a
//! turn-based ASCII game.
//!
//! The shell owns three policies and nothing else:
//! - **what input is captured**: raw DOM-level key/pointer/wheel records are
//!   normalized into the [`input::InputEvent`] taxonomy, with per-event
//!   decisions about suppressing default browser handling,
//! - **when the simulation is stepped**: every accepted event is queued into
//!   the engine and requests one paint callback; the engine runs exactly once
//!   per fired frame no matter how many events arrived in between,
//! - **how engine state reaches the screen**: a full-grid redraw after every
//!   step (cells are never diffed or cached — stale-cell bugs are traded away
//!   for a little redundant drawing).
//!
//! The game engine and the character-grid display are opaque collaborators
//! behind the [`engine::Engine`] and [`sink::GridSink`] capability traits, and
//! the paint primitive is injected via [`shell::FrameRequester`], so the whole
//! loop is testable without a browser.

pub mod color;
pub mod engine;
pub mod geometry;
pub mod input;
pub mod shell;
pub mod sink;

pub use color::Rgb;
pub use engine::Engine;
pub use geometry::GridSize;
pub use input::{DefaultHandling, InputEvent, InputNormalizer, Modifiers};
pub use shell::{FrameRequester, Shell};
pub use sink::GridSink;
