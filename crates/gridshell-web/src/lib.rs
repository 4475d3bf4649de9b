#![forbid(unsafe_code)]

//! WASM front-end for `gridshell`.
//!
//! Binds the host-agnostic loop from `gridshell-core` to a real browser page:
//! - [`GridShell`] is the JS-facing surface: construct it with a display
//!   object, `boot()` the engine with a random seed, `attach()` DOM listeners,
//! - the engine and display stay untyped JS objects behind adapters (the
//!   game is an opaque module; the display is a rot.js-style character grid),
//! - frames are scheduled through `requestAnimationFrame`, with a pending
//!   flag guaranteeing at most one engine step per paint frame.
//!
//! Everything browser-specific is gated on `wasm32`; on other targets this
//! crate only re-exports the default geometry.

#[cfg(target_arch = "wasm32")]
mod display;
#[cfg(target_arch = "wasm32")]
mod engine;
#[cfg(target_arch = "wasm32")]
mod reflect;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::GridShell;

/// Default grid geometry when the host passes no options.
pub const DEFAULT_COLS: u16 = 80;
pub const DEFAULT_ROWS: u16 = 36;
