#![forbid(unsafe_code)]

//! Input normalization: raw DOM-level events → engine-understood records.
//!
//! The normalizer performs no game logic. It owns exactly two policies:
//! - **default-handling decisions** ([`DefaultHandling`]): which events must
//!   suppress the browser's default behavior (page scroll, navigation) and
//!   which are allowed through for normal text-entry interactions, and
//! - **wheel delta normalization** ([`WheelNormalizer`]): browsers and devices
//!   report wildly different raw wheel magnitudes, so the smallest observed
//!   nonzero magnitude becomes the unit of one wheel "click" and every delta
//!   is emitted as an integer multiple of it.
//!
//! Pointer events carry cell coordinates, translated from pixels by the
//! display sink *before* they reach the normalizer; anything that maps
//! off-grid is rejected here (never clamped) so the engine only ever sees
//! valid coordinates.
//!
//! Events also have a stable JSON encoding ([`InputEventJson`]) for
//! record/replay and host-side tracing.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::geometry::GridSize;

bitflags! {
    /// Modifier keys held during an input event, as a compact `u8` bitset.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
    }
}

impl Modifiers {
    #[must_use]
    pub fn from_flags(ctrl: bool, alt: bool, shift: bool) -> Self {
        let mut mods = Self::empty();
        mods.set(Self::CTRL, ctrl);
        mods.set(Self::ALT, alt);
        mods.set(Self::SHIFT, shift);
        mods
    }
}

/// Whether the host should let the browser run its default handling for the
/// raw event, or call `preventDefault()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultHandling {
    Allow,
    Suppress,
}

/// Raw `keydown` record: the DOM `key` label plus the device-native key code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawKey {
    /// DOM `key` label (`"a"`, `"ArrowUp"`, `"F5"`, …).
    pub key: String,
    pub key_code: u32,
    pub mods: Modifiers,
}

/// Raw `keypress` record: a produced character code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawKeyPress {
    pub char_code: u32,
    pub mods: Modifiers,
}

/// Raw pointer press/release record, in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawPointer {
    pub pixel_x: i32,
    pub pixel_y: i32,
    pub button: u8,
}

/// Raw wheel record, in device pixels with the browser's native delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawWheel {
    pub pixel_x: i32,
    pub pixel_y: i32,
    pub delta_y: f64,
}

/// Normalized input event, ready for the engine's queue.
///
/// Pointer variants carry validated cell coordinates. `KeyPress` deliberately
/// drops the shift flag: printable-character events already encode case in
/// the character code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputEvent {
    KeyDown { key_code: u32, mods: Modifiers },
    KeyPress { char_code: u32, ctrl: bool, alt: bool },
    MousePress { x: u16, y: u16, button: u8 },
    MouseRelease { x: u16, y: u16, button: u8 },
    MouseWheel { x: u16, y: u16, steps: i32 },
}

/// Running minimum of observed wheel magnitudes.
///
/// Lives for the whole page session and only ever tightens; there is no
/// reset. Scale-invariant: scaling every raw delta by a constant scales the
/// minimum by the same constant, so the emitted steps are unchanged.
#[derive(Debug, Default, Clone)]
pub struct WheelNormalizer {
    min_magnitude: Option<f64>,
}

impl WheelNormalizer {
    /// Observe one raw delta and emit its integer step.
    ///
    /// Zero-magnitude deltas leave the minimum untouched (they carry no unit
    /// information and would poison the division) and emit step 0.
    pub fn step(&mut self, delta: f64) -> i32 {
        let magnitude = delta.abs();
        if !(magnitude > 0.0) {
            return 0;
        }
        let min = match self.min_magnitude {
            Some(current) => current.min(magnitude),
            None => magnitude,
        };
        self.min_magnitude = Some(min);
        (delta / min).round() as i32
    }
}

/// Maps raw input into the [`InputEvent`] taxonomy.
///
/// Owns the grid bounds used to reject off-grid pointer events and the
/// session-lifetime [`WheelNormalizer`] (explicit state, not an ambient
/// global, so the component tests in isolation).
#[derive(Debug, Clone)]
pub struct InputNormalizer {
    size: GridSize,
    wheel: WheelNormalizer,
}

impl InputNormalizer {
    #[must_use]
    pub fn new(size: GridSize) -> Self {
        Self {
            size,
            wheel: WheelNormalizer::default(),
        }
    }

    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Normalize a `keydown`.
    ///
    /// Keys whose label is a single printable character keep the browser's
    /// default handling (normal text-entry interactions pass through); all
    /// other keys (arrows, function keys, …) suppress it to prevent page
    /// scroll and navigation.
    #[must_use]
    pub fn key_down(&self, raw: &RawKey) -> (InputEvent, DefaultHandling) {
        let handling = if is_single_char_label(&raw.key) {
            DefaultHandling::Allow
        } else {
            DefaultHandling::Suppress
        };
        let event = InputEvent::KeyDown {
            key_code: raw.key_code,
            mods: raw.mods,
        };
        (event, handling)
    }

    /// Normalize a `keypress`. Default handling is always suppressed.
    #[must_use]
    pub fn key_press(&self, raw: &RawKeyPress) -> (InputEvent, DefaultHandling) {
        let event = InputEvent::KeyPress {
            char_code: raw.char_code,
            ctrl: raw.mods.contains(Modifiers::CTRL),
            alt: raw.mods.contains(Modifiers::ALT),
        };
        (event, DefaultHandling::Suppress)
    }

    /// Normalize a pointer press. `cell` is the sink's pixel→cell translation;
    /// `None` or off-grid coordinates reject the event.
    #[must_use]
    pub fn mouse_press(&self, cell: Option<(i32, i32)>, button: u8) -> Option<InputEvent> {
        let (x, y) = self.accept_cell(cell)?;
        Some(InputEvent::MousePress { x, y, button })
    }

    /// Normalize a pointer release, with the same rejection policy as presses.
    #[must_use]
    pub fn mouse_release(&self, cell: Option<(i32, i32)>, button: u8) -> Option<InputEvent> {
        let (x, y) = self.accept_cell(cell)?;
        Some(InputEvent::MouseRelease { x, y, button })
    }

    /// Normalize a wheel event.
    ///
    /// The running minimum updates for *every* observed delta, even when the
    /// event is subsequently rejected for being off-grid (or dropped by the
    /// shell because the engine is not live yet): the unit estimate must keep
    /// tightening from the first physical scroll onward.
    pub fn wheel(&mut self, cell: Option<(i32, i32)>, delta_y: f64) -> Option<InputEvent> {
        let steps = self.wheel.step(delta_y);
        let (x, y) = self.accept_cell(cell)?;
        Some(InputEvent::MouseWheel { x, y, steps })
    }

    fn accept_cell(&self, cell: Option<(i32, i32)>) -> Option<(u16, u16)> {
        let (x, y) = cell?;
        if !self.size.contains(x, y) {
            return None;
        }
        Some((x as u16, y as u16))
    }
}

/// The printable pass-through heuristic: a DOM `key` label of exactly one
/// `char`. Multi-character labels name non-printable keys (`"ArrowUp"`).
fn is_single_char_label(label: &str) -> bool {
    let mut chars = label.chars();
    chars.next().is_some() && chars.next().is_none()
}

/// Stable JSON encoding for record/replay: a `kind` tag plus the minimum
/// semantic fields.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputEventJson {
    KeyDown { key_code: u32, mods: u8 },
    KeyPress { char_code: u32, ctrl: bool, alt: bool },
    MousePress { x: u16, y: u16, button: u8 },
    MouseRelease { x: u16, y: u16, button: u8 },
    MouseWheel { x: u16, y: u16, steps: i32 },
}

impl InputEvent {
    /// Encode this event as a stable JSON string.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&InputEventJson::from(*self))
    }

    /// Decode a previously encoded event JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        let json: InputEventJson = serde_json::from_str(s)?;
        Ok(Self::from(json))
    }
}

impl From<InputEvent> for InputEventJson {
    fn from(value: InputEvent) -> Self {
        match value {
            InputEvent::KeyDown { key_code, mods } => Self::KeyDown {
                key_code,
                mods: mods.bits(),
            },
            InputEvent::KeyPress {
                char_code,
                ctrl,
                alt,
            } => Self::KeyPress {
                char_code,
                ctrl,
                alt,
            },
            InputEvent::MousePress { x, y, button } => Self::MousePress { x, y, button },
            InputEvent::MouseRelease { x, y, button } => Self::MouseRelease { x, y, button },
            InputEvent::MouseWheel { x, y, steps } => Self::MouseWheel { x, y, steps },
        }
    }
}

impl From<InputEventJson> for InputEvent {
    fn from(value: InputEventJson) -> Self {
        match value {
            InputEventJson::KeyDown { key_code, mods } => Self::KeyDown {
                key_code,
                mods: Modifiers::from_bits_truncate(mods),
            },
            InputEventJson::KeyPress {
                char_code,
                ctrl,
                alt,
            } => Self::KeyPress {
                char_code,
                ctrl,
                alt,
            },
            InputEventJson::MousePress { x, y, button } => Self::MousePress { x, y, button },
            InputEventJson::MouseRelease { x, y, button } => Self::MouseRelease { x, y, button },
            InputEventJson::MouseWheel { x, y, steps } => Self::MouseWheel { x, y, steps },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn normalizer() -> InputNormalizer {
        InputNormalizer::new(GridSize::new(80, 36))
    }

    fn raw_key(label: &str) -> RawKey {
        RawKey {
            key: label.to_string(),
            key_code: 0,
            mods: Modifiers::empty(),
        }
    }

    #[test]
    fn single_char_keydown_allows_default() {
        let n = normalizer();
        let (_, handling) = n.key_down(&raw_key("a"));
        assert_eq!(handling, DefaultHandling::Allow);
        let (_, handling) = n.key_down(&raw_key("Z"));
        assert_eq!(handling, DefaultHandling::Allow);
        // One code point, even when it needs several UTF-8 bytes.
        let (_, handling) = n.key_down(&raw_key("ä"));
        assert_eq!(handling, DefaultHandling::Allow);
    }

    #[test]
    fn multi_char_keydown_suppresses_default() {
        let n = normalizer();
        for label in ["ArrowUp", "ArrowDown", "F5", "Escape", "PageDown"] {
            let (_, handling) = n.key_down(&raw_key(label));
            assert_eq!(handling, DefaultHandling::Suppress, "label {label:?}");
        }
    }

    #[test]
    fn keypress_always_suppresses_and_drops_shift() {
        let n = normalizer();
        let raw = RawKeyPress {
            char_code: u32::from(b'A'),
            mods: Modifiers::from_flags(true, false, true),
        };
        let (event, handling) = n.key_press(&raw);
        assert_eq!(handling, DefaultHandling::Suppress);
        assert_eq!(
            event,
            InputEvent::KeyPress {
                char_code: 65,
                ctrl: true,
                alt: false,
            }
        );
    }

    #[test]
    fn pointer_events_off_grid_are_rejected() {
        let n = normalizer();
        assert_eq!(n.mouse_press(None, 0), None);
        assert_eq!(n.mouse_press(Some((-1, 0)), 0), None);
        assert_eq!(n.mouse_press(Some((80, 0)), 0), None);
        assert_eq!(n.mouse_release(Some((0, 36)), 1), None);
        assert_eq!(
            n.mouse_press(Some((79, 35)), 2),
            Some(InputEvent::MousePress {
                x: 79,
                y: 35,
                button: 2,
            })
        );
    }

    #[test]
    fn wheel_steps_follow_running_minimum() {
        let mut w = WheelNormalizer::default();
        // First delta defines the unit, so it always lands on ±1.
        assert_eq!(w.step(100.0), 1);
        assert_eq!(w.step(-50.0), -1);
        assert_eq!(w.step(200.0), 4);
        assert_eq!(w.step(-150.0), -3);
    }

    #[test]
    fn wheel_zero_delta_leaves_unit_untouched() {
        let mut w = WheelNormalizer::default();
        assert_eq!(w.step(0.0), 0);
        assert_eq!(w.step(-0.0), 0);
        assert_eq!(w.step(120.0), 1);
        assert_eq!(w.step(0.0), 0);
        assert_eq!(w.step(240.0), 2);
    }

    #[test]
    fn wheel_updates_minimum_even_when_rejected() {
        let mut n = normalizer();
        // Off-grid, but the unit estimate must still tighten.
        assert_eq!(n.wheel(None, 30.0), None);
        assert_eq!(
            n.wheel(Some((5, 5)), 120.0),
            Some(InputEvent::MouseWheel {
                x: 5,
                y: 5,
                steps: 4,
            })
        );
    }

    #[test]
    fn event_json_roundtrip_is_stable() {
        let events = [
            InputEvent::KeyDown {
                key_code: 38,
                mods: Modifiers::CTRL | Modifiers::SHIFT,
            },
            InputEvent::KeyPress {
                char_code: 113,
                ctrl: false,
                alt: true,
            },
            InputEvent::MouseWheel {
                x: 10,
                y: 2,
                steps: -3,
            },
        ];
        for ev in events {
            let j1 = ev.to_json_string().expect("serialize");
            let j2 = ev.to_json_string().expect("serialize");
            assert_eq!(j1, j2);
            let back = InputEvent::from_json_str(&j1).expect("deserialize");
            assert_eq!(ev, back);
        }
    }

    proptest! {
        // Scaling every raw delta by the same constant scales the running
        // minimum identically, so the emitted step sequence is unchanged.
        // Power-of-two scales keep the float arithmetic exact.
        #[test]
        fn wheel_steps_are_scale_invariant(
            deltas in prop::collection::vec(-1000i32..1000, 1..64),
            exp in -5i32..6,
        ) {
            let k = f64::powi(2.0, exp);
            let mut base = WheelNormalizer::default();
            let mut scaled = WheelNormalizer::default();
            for d in deltas {
                let d = f64::from(d);
                prop_assert_eq!(base.step(d), scaled.step(d * k));
            }
        }

        #[test]
        fn first_nonzero_delta_is_one_step(delta in -1e6f64..1e6) {
            prop_assume!(delta != 0.0);
            let mut w = WheelNormalizer::default();
            prop_assert_eq!(w.step(delta), delta.signum() as i32);
        }
    }
}
