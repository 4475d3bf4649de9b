#![forbid(unsafe_code)]

//! The opaque game-engine capability.
//!
//! Turn resolution, world simulation, RNG, and entity state live behind this
//! trait; the shell only queues normalized input, steps the simulation, and
//! reads back per-cell display state. Any implementation is substitutable,
//! which is how the scheduler and normalizer are tested without a real game.
//!
//! Failure semantics: a failing engine leaves the simulation undefined, so
//! the methods are infallible by contract and adapters treat engine-internal
//! errors as fatal.

use crate::color::Rgb;
use crate::input::{InputEvent, Modifiers};

pub trait Engine {
    /// Fix the grid dimensions. Called once at bootstrap, before the first
    /// frame.
    fn set_size(&mut self, width: u16, height: u16);

    /// Consume all queued input, in arrival order, and advance the
    /// simulation by one logical step.
    fn run(&mut self);

    /// Code point of the glyph at a cell.
    fn glyph(&self, x: u16, y: u16) -> u32;

    fn foreground(&self, x: u16, y: u16) -> Rgb;

    fn background(&self, x: u16, y: u16) -> Rgb;

    fn push_key_down(&mut self, key_code: u32, ctrl: bool, alt: bool, shift: bool);

    fn push_key_press(&mut self, char_code: u32, ctrl: bool, alt: bool);

    fn push_mouse_press(&mut self, x: u16, y: u16, button: u8);

    fn push_mouse_release(&mut self, x: u16, y: u16, button: u8);

    fn push_mouse_wheel(&mut self, x: u16, y: u16, steps: i32);

    /// Queue one normalized event, dispatching to the typed push methods.
    fn push(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown { key_code, mods } => self.push_key_down(
                key_code,
                mods.contains(Modifiers::CTRL),
                mods.contains(Modifiers::ALT),
                mods.contains(Modifiers::SHIFT),
            ),
            InputEvent::KeyPress {
                char_code,
                ctrl,
                alt,
            } => self.push_key_press(char_code, ctrl, alt),
            InputEvent::MousePress { x, y, button } => self.push_mouse_press(x, y, button),
            InputEvent::MouseRelease { x, y, button } => self.push_mouse_release(x, y, button),
            InputEvent::MouseWheel { x, y, steps } => self.push_mouse_wheel(x, y, steps),
        }
    }
}
