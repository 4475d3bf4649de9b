#![forbid(unsafe_code)]

//! Reflection helpers for untyped host objects (engine, display, options).

use js_sys::{Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};

/// Look up a callable property on a host object.
pub(crate) fn method(target: &JsValue, name: &str) -> Result<Function, JsValue> {
    let value = Reflect::get(target, &JsValue::from_str(name))?;
    value
        .dyn_into::<Function>()
        .map_err(|_| JsValue::from_str(&format!("host object has no `{name}` method")))
}

/// Read an optional numeric field from an options object, validated to `u16`.
pub(crate) fn parse_option_u16(options: Option<&JsValue>, key: &str) -> Result<Option<u16>, JsValue> {
    let Some(options) = options else {
        return Ok(None);
    };
    if options.is_null() || options.is_undefined() {
        return Ok(None);
    }
    let value = Reflect::get(options, &JsValue::from_str(key))?;
    if value.is_null() || value.is_undefined() {
        return Ok(None);
    }
    let number = value
        .as_f64()
        .ok_or_else(|| JsValue::from_str(&format!("`{key}` must be a number")))?;
    if !number.is_finite() || number < 1.0 || number > f64::from(u16::MAX) {
        return Err(JsValue::from_str(&format!("`{key}` out of range")));
    }
    Ok(Some(number as u16))
}
