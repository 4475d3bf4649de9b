#![forbid(unsafe_code)]

//! Adapter implementing the core [`Engine`] capability over an untyped JS
//! engine object (typically a wasm-bindgen game module loaded by the page).
//!
//! The JS contract: a class-like object with `create(seed)` (or a
//! wasm-bindgen-style static `new(seed)`), whose instances expose `setSize`,
//! `run`, `getGlyph`, `getForeground`, `getBackground`, and the
//! `pushKeyDown` / `pushKeyPress` / `pushMousePress` / `pushMouseRelease` /
//! `pushMouseWheel` queue methods.
//!
//! Method lookups happen once at construction and surface as constructor
//! errors. A JS exception from a live engine call is rethrown to the host —
//! an engine-internal failure leaves the simulation undefined, so there is
//! deliberately no recovery path.

use gridshell_core::{Engine, Rgb};
use js_sys::{Array, Function};
use wasm_bindgen::JsValue;

use crate::reflect::method;

pub(crate) struct JsEngine {
    handle: JsValue,
    set_size: Function,
    run: Function,
    get_glyph: Function,
    get_foreground: Function,
    get_background: Function,
    push_key_down: Function,
    push_key_press: Function,
    push_mouse_press: Function,
    push_mouse_release: Function,
    push_mouse_wheel: Function,
}

impl JsEngine {
    /// Instantiate the engine with a 32-bit seed and bind its methods.
    pub(crate) fn create(class: &JsValue, seed: u32) -> Result<Self, JsValue> {
        let ctor = method(class, "create").or_else(|_| method(class, "new"))?;
        let handle = ctor.call1(class, &JsValue::from_f64(f64::from(seed)))?;
        Ok(Self {
            set_size: method(&handle, "setSize")?,
            run: method(&handle, "run")?,
            get_glyph: method(&handle, "getGlyph")?,
            get_foreground: method(&handle, "getForeground")?,
            get_background: method(&handle, "getBackground")?,
            push_key_down: method(&handle, "pushKeyDown")?,
            push_key_press: method(&handle, "pushKeyPress")?,
            push_mouse_press: method(&handle, "pushMousePress")?,
            push_mouse_release: method(&handle, "pushMouseRelease")?,
            push_mouse_wheel: method(&handle, "pushMouseWheel")?,
            handle,
        })
    }

    /// Call a bound engine method; an exception is fatal by contract.
    fn call(&self, f: &Function, args: &Array) -> JsValue {
        match f.apply(&self.handle, args) {
            Ok(value) => value,
            Err(err) => wasm_bindgen::throw_val(err),
        }
    }

    fn read_u32(&self, f: &Function, x: u16, y: u16) -> u32 {
        self.call(f, &Array::of2(&x.into(), &y.into()))
            .as_f64()
            .unwrap_or(0.0) as u32
    }
}

impl Engine for JsEngine {
    fn set_size(&mut self, width: u16, height: u16) {
        self.call(&self.set_size, &Array::of2(&width.into(), &height.into()));
    }

    fn run(&mut self) {
        self.call(&self.run, &Array::new());
    }

    fn glyph(&self, x: u16, y: u16) -> u32 {
        self.read_u32(&self.get_glyph, x, y)
    }

    fn foreground(&self, x: u16, y: u16) -> Rgb {
        Rgb(self.read_u32(&self.get_foreground, x, y))
    }

    fn background(&self, x: u16, y: u16) -> Rgb {
        Rgb(self.read_u32(&self.get_background, x, y))
    }

    fn push_key_down(&mut self, key_code: u32, ctrl: bool, alt: bool, shift: bool) {
        self.call(
            &self.push_key_down,
            &Array::of4(&key_code.into(), &ctrl.into(), &alt.into(), &shift.into()),
        );
    }

    fn push_key_press(&mut self, char_code: u32, ctrl: bool, alt: bool) {
        self.call(
            &self.push_key_press,
            &Array::of3(&char_code.into(), &ctrl.into(), &alt.into()),
        );
    }

    fn push_mouse_press(&mut self, x: u16, y: u16, button: u8) {
        self.call(
            &self.push_mouse_press,
            &Array::of3(&x.into(), &y.into(), &button.into()),
        );
    }

    fn push_mouse_release(&mut self, x: u16, y: u16, button: u8) {
        self.call(
            &self.push_mouse_release,
            &Array::of3(&x.into(), &y.into(), &button.into()),
        );
    }

    fn push_mouse_wheel(&mut self, x: u16, y: u16, steps: i32) {
        self.call(
            &self.push_mouse_wheel,
            &Array::of3(&x.into(), &y.into(), &steps.into()),
        );
    }
}
