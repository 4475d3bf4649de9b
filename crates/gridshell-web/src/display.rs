#![forbid(unsafe_code)]

//! Adapter implementing the core [`GridSink`] capability over a rot.js-style
//! display object.
//!
//! The JS contract: `draw(x, y, glyph, fg, bg)` writes one cell, and
//! `pixelToCell(px, py)` maps a pixel position to `[cellX, cellY]` — or
//! `null`/`undefined` when the point lies off the display surface, which the
//! shell treats as a rejected event.

use gridshell_core::GridSink;
use js_sys::{Array, Function};
use wasm_bindgen::{JsCast, JsValue};

use crate::reflect::method;

pub(crate) struct JsDisplay {
    target: JsValue,
    draw: Function,
    pixel_to_cell: Function,
}

impl JsDisplay {
    pub(crate) fn new(display: JsValue) -> Result<Self, JsValue> {
        Ok(Self {
            draw: method(&display, "draw")?,
            pixel_to_cell: method(&display, "pixelToCell")?,
            target: display,
        })
    }
}

impl GridSink for JsDisplay {
    fn draw(&mut self, x: u16, y: u16, glyph: char, fg: &str, bg: &str) {
        let args = Array::of5(
            &x.into(),
            &y.into(),
            &JsValue::from_str(glyph.encode_utf8(&mut [0u8; 4])),
            &JsValue::from_str(fg),
            &JsValue::from_str(bg),
        );
        if let Err(err) = self.draw.apply(&self.target, &args) {
            wasm_bindgen::throw_val(err);
        }
    }

    fn pixel_to_cell(&self, pixel_x: i32, pixel_y: i32) -> Option<(i32, i32)> {
        let result = self
            .pixel_to_cell
            .call2(&self.target, &pixel_x.into(), &pixel_y.into())
            .ok()?;
        if result.is_null() || result.is_undefined() {
            return None;
        }
        let pair = result.dyn_into::<Array>().ok()?;
        let x = pair.get(0).as_f64()?;
        let y = pair.get(1).as_f64()?;
        Some((x as i32, y as i32))
    }
}
