#![forbid(unsafe_code)]

//! JS-facing shell surface and `requestAnimationFrame` scheduling.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use gridshell_core::input::{RawKey, RawKeyPress, RawPointer, RawWheel};
use gridshell_core::{DefaultHandling, FrameRequester, GridSize, Modifiers, Shell};
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, EventTarget, KeyboardEvent, MouseEvent, WheelEvent};

use crate::display::JsDisplay;
use crate::engine::JsEngine;
use crate::reflect::parse_option_u16;
use crate::{DEFAULT_COLS, DEFAULT_ROWS};

type WebShell = Shell<JsEngine, JsDisplay, RafScheduler>;

struct RafState {
    // Weak link back to the shell: the scheduler lives inside it.
    shell: RefCell<Weak<RefCell<WebShell>>>,
    scheduled: Cell<bool>,
}

/// Paint scheduling over `requestAnimationFrame`.
///
/// Raw rAF runs every registered callback, so the pending flag is what
/// upholds the [`FrameRequester`] contract: at most one shell frame per paint
/// frame, however many input events requested one.
pub(crate) struct RafScheduler {
    state: Rc<RafState>,
}

impl FrameRequester for RafScheduler {
    fn request_frame(&mut self) {
        if self.state.scheduled.replace(true) {
            return;
        }
        let state = Rc::clone(&self.state);
        let callback = Closure::once(move || {
            state.scheduled.set(false);
            let shell = state.shell.borrow().upgrade();
            if let Some(shell) = shell {
                shell.borrow_mut().on_frame();
            }
        });
        let Some(window) = web_sys::window() else {
            warn!("no window object, cannot schedule frames");
            self.state.scheduled.set(false);
            return;
        };
        match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
            Ok(_) => callback.forget(),
            Err(err) => {
                warn!(?err, "requestAnimationFrame failed");
                self.state.scheduled.set(false);
            }
        }
    }
}

/// Browser shell for a turn-based ASCII game.
///
/// Typical host sequence:
/// ```js
/// const shell = new GridShell(display, { cols: 80, rows: 36 });
/// shell.attach(document, display.getContainer());
/// shell.boot(Game);   // once the engine module has loaded
/// ```
///
/// Input arriving between `attach` and `boot` is dropped by design; nothing
/// is buffered before the engine is live.
#[wasm_bindgen]
pub struct GridShell {
    shell: Rc<RefCell<WebShell>>,
}

#[wasm_bindgen]
impl GridShell {
    /// Create the shell around a display object exposing
    /// `draw(x, y, glyph, fg, bg)` and `pixelToCell(px, py)`.
    ///
    /// `options` may carry `cols` and `rows` (defaults 80×36).
    #[wasm_bindgen(constructor)]
    pub fn new(display: JsValue, options: Option<JsValue>) -> Result<GridShell, JsValue> {
        let cols = parse_option_u16(options.as_ref(), "cols")?.unwrap_or(DEFAULT_COLS);
        let rows = parse_option_u16(options.as_ref(), "rows")?.unwrap_or(DEFAULT_ROWS);
        let display = JsDisplay::new(display)?;

        let state = Rc::new(RafState {
            shell: RefCell::new(Weak::new()),
            scheduled: Cell::new(false),
        });
        let shell = Rc::new(RefCell::new(Shell::new(
            GridSize::new(cols, rows),
            display,
            RafScheduler {
                state: Rc::clone(&state),
            },
        )));
        *state.shell.borrow_mut() = Rc::downgrade(&shell);
        Ok(GridShell { shell })
    }

    /// Instantiate the engine class with a fresh random 32-bit seed, fix its
    /// grid size, and request the initial frame.
    pub fn boot(&self, engine_class: JsValue) -> Result<(), JsValue> {
        let seed = random_seed();
        debug!(seed, "booting engine");
        let engine = JsEngine::create(&engine_class, seed)?;
        self.shell.borrow_mut().install_engine(engine);
        Ok(())
    }

    /// Whether the engine is live and input is being accepted.
    #[wasm_bindgen(js_name = isReady)]
    pub fn is_ready(&self) -> bool {
        self.shell.borrow().is_ready()
    }

    /// Request a redraw outside the input path.
    #[wasm_bindgen(js_name = requestUpdate)]
    pub fn request_update(&self) {
        self.shell.borrow_mut().request_update();
    }

    /// Install DOM listeners: keyboard on `keyTarget` (usually the document),
    /// pointer and wheel on `pointerTarget` (the display container).
    pub fn attach(
        &self,
        key_target: &EventTarget,
        pointer_target: &EventTarget,
    ) -> Result<(), JsValue> {
        {
            let shell = Rc::clone(&self.shell);
            let on_keydown = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
                let raw = RawKey {
                    key: event.key(),
                    key_code: event.key_code(),
                    mods: Modifiers::from_flags(
                        event.ctrl_key(),
                        event.alt_key(),
                        event.shift_key(),
                    ),
                };
                if shell.borrow_mut().key_down(&raw) == DefaultHandling::Suppress {
                    event.prevent_default();
                }
            });
            key_target
                .add_event_listener_with_callback("keydown", on_keydown.as_ref().unchecked_ref())?;
            on_keydown.forget();
        }

        {
            let shell = Rc::clone(&self.shell);
            let on_keypress = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
                let raw = RawKeyPress {
                    char_code: event.char_code(),
                    mods: Modifiers::from_flags(
                        event.ctrl_key(),
                        event.alt_key(),
                        event.shift_key(),
                    ),
                };
                if shell.borrow_mut().key_press(&raw) == DefaultHandling::Suppress {
                    event.prevent_default();
                }
            });
            key_target.add_event_listener_with_callback(
                "keypress",
                on_keypress.as_ref().unchecked_ref(),
            )?;
            on_keypress.forget();
        }

        {
            let shell = Rc::clone(&self.shell);
            let on_mousedown = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
                shell.borrow_mut().mouse_press(&pointer_raw(&event));
            });
            pointer_target.add_event_listener_with_callback(
                "mousedown",
                on_mousedown.as_ref().unchecked_ref(),
            )?;
            on_mousedown.forget();
        }

        {
            let shell = Rc::clone(&self.shell);
            let on_mouseup = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
                shell.borrow_mut().mouse_release(&pointer_raw(&event));
            });
            pointer_target.add_event_listener_with_callback(
                "mouseup",
                on_mouseup.as_ref().unchecked_ref(),
            )?;
            on_mouseup.forget();
        }

        {
            let shell = Rc::clone(&self.shell);
            let on_wheel = Closure::<dyn FnMut(WheelEvent)>::new(move |event: WheelEvent| {
                let raw = RawWheel {
                    pixel_x: event.client_x(),
                    pixel_y: event.client_y(),
                    delta_y: event.delta_y(),
                };
                if shell.borrow_mut().wheel(&raw) == DefaultHandling::Suppress {
                    event.prevent_default();
                }
            });
            // Wheel listeners default to passive on some targets, which would
            // make preventDefault a no-op.
            let options = AddEventListenerOptions::new();
            options.set_passive(false);
            pointer_target.add_event_listener_with_callback_and_add_event_listener_options(
                "wheel",
                on_wheel.as_ref().unchecked_ref(),
                &options,
            )?;
            on_wheel.forget();
        }

        Ok(())
    }
}

fn pointer_raw(event: &MouseEvent) -> RawPointer {
    RawPointer {
        pixel_x: event.client_x(),
        pixel_y: event.client_y(),
        button: u8::try_from(event.button()).unwrap_or(0),
    }
}

fn random_seed() -> u32 {
    (js_sys::Math::random() * 4_294_967_296.0) as u32
}
