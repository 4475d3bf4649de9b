//! End-to-end loop properties against a simulated paint scheduler.
//!
//! The fake scheduler models the browser's paint-callback primitive: any
//! number of requests within one frame collapse into a single pending flag,
//! and the host fires at most one callback per frame.

use std::cell::Cell;
use std::rc::Rc;

use pretty_assertions::assert_eq;

use gridshell_core::input::{RawKey, RawKeyPress, RawWheel};
use gridshell_core::{DefaultHandling, Engine, FrameRequester, GridSink, GridSize, Modifiers, Rgb, Shell};

/// Paint scheduler double with `requestAnimationFrame` coalescing semantics.
#[derive(Debug, Clone, Default)]
struct FakePaintLoop {
    pending: Rc<Cell<bool>>,
}

impl FakePaintLoop {
    /// Fire the pending callback, if any. Returns whether one fired.
    fn fire(&self, shell: &mut TestShell) -> bool {
        if !self.pending.replace(false) {
            return false;
        }
        shell.on_frame();
        true
    }
}

impl FrameRequester for FakePaintLoop {
    fn request_frame(&mut self) {
        self.pending.set(true);
    }
}

/// Engine double counting runs and pushes, rendering a uniform grid.
#[derive(Debug, Default)]
struct CountingEngine {
    pushes: usize,
    runs: usize,
    pushes_at_last_run: usize,
}

impl Engine for CountingEngine {
    fn set_size(&mut self, _width: u16, _height: u16) {}

    fn run(&mut self) {
        self.runs += 1;
        self.pushes_at_last_run = self.pushes;
    }

    fn glyph(&self, _x: u16, _y: u16) -> u32 {
        '.' as u32
    }

    fn foreground(&self, _x: u16, _y: u16) -> Rgb {
        Rgb(0xFFFFFF)
    }

    fn background(&self, _x: u16, _y: u16) -> Rgb {
        Rgb::BLACK
    }

    fn push_key_down(&mut self, _key_code: u32, _ctrl: bool, _alt: bool, _shift: bool) {
        self.pushes += 1;
    }

    fn push_key_press(&mut self, _char_code: u32, _ctrl: bool, _alt: bool) {
        self.pushes += 1;
    }

    fn push_mouse_press(&mut self, _x: u16, _y: u16, _button: u8) {
        self.pushes += 1;
    }

    fn push_mouse_release(&mut self, _x: u16, _y: u16, _button: u8) {
        self.pushes += 1;
    }

    fn push_mouse_wheel(&mut self, _x: u16, _y: u16, _steps: i32) {
        self.pushes += 1;
    }
}

#[derive(Debug, Default)]
struct CountingSink {
    draws: usize,
}

impl GridSink for CountingSink {
    fn draw(&mut self, _x: u16, _y: u16, _glyph: char, _fg: &str, _bg: &str) {
        self.draws += 1;
    }

    fn pixel_to_cell(&self, pixel_x: i32, pixel_y: i32) -> Option<(i32, i32)> {
        Some((pixel_x, pixel_y))
    }
}

type TestShell = Shell<CountingEngine, CountingSink, FakePaintLoop>;

fn booted_shell() -> (TestShell, FakePaintLoop) {
    let frames = FakePaintLoop::default();
    let mut shell = Shell::new(GridSize::new(10, 5), CountingSink::default(), frames.clone());
    shell.install_engine(CountingEngine::default());
    (shell, frames)
}

fn key(label: &str) -> RawKey {
    RawKey {
        key: label.to_string(),
        key_code: 0,
        mods: Modifiers::empty(),
    }
}

#[test]
fn initial_frame_renders_with_no_input() {
    let (mut shell, frames) = booted_shell();
    assert!(frames.fire(&mut shell));
    let engine = engine_of(&shell);
    assert_eq!((engine.0, engine.1), (1, 0));
}

#[test]
fn many_events_in_one_frame_step_the_engine_once() {
    let (mut shell, frames) = booted_shell();
    frames.fire(&mut shell);

    for _ in 0..7 {
        shell.key_down(&key("ArrowLeft"));
    }
    shell.key_press(&RawKeyPress {
        char_code: 105,
        mods: Modifiers::empty(),
    });
    shell.wheel(&RawWheel {
        pixel_x: 3,
        pixel_y: 3,
        delta_y: -53.0,
    });

    assert!(frames.fire(&mut shell));
    let (runs, pushes, pushes_at_last_run) = engine_of(&shell);
    // All nine events were queued before the single run of this frame.
    assert_eq!(runs, 2);
    assert_eq!(pushes, 9);
    assert_eq!(pushes_at_last_run, 9);
}

#[test]
fn idle_frames_do_not_rerun_the_engine() {
    let (mut shell, frames) = booted_shell();
    frames.fire(&mut shell);
    assert!(!frames.fire(&mut shell));
    assert!(!frames.fire(&mut shell));
    assert_eq!(engine_of(&shell).0, 1);
}

#[test]
fn every_fired_frame_is_a_full_redraw() {
    let (mut shell, frames) = booted_shell();
    frames.fire(&mut shell);
    shell.key_down(&key("x"));
    frames.fire(&mut shell);
    shell.key_down(&key("x"));
    shell.key_down(&key("y"));
    frames.fire(&mut shell);

    let size = shell.size();
    assert_eq!(draws_of(&shell), 3 * size.cell_count());
}

#[test]
fn pre_bootstrap_input_schedules_nothing() {
    let frames = FakePaintLoop::default();
    let mut shell: TestShell = Shell::new(
        GridSize::new(10, 5),
        CountingSink::default(),
        frames.clone(),
    );

    shell.key_down(&key("ArrowUp"));
    assert_eq!(
        shell.wheel(&RawWheel {
            pixel_x: 0,
            pixel_y: 0,
            delta_y: 10.0,
        }),
        DefaultHandling::Allow
    );
    assert!(!frames.fire(&mut shell));
}

fn engine_of(shell: &TestShell) -> (usize, usize, usize) {
    let engine = shell.engine().expect("engine installed");
    (engine.runs, engine.pushes, engine.pushes_at_last_run)
}

fn draws_of(shell: &TestShell) -> usize {
    shell.sink().draws
}
