#![forbid(unsafe_code)]

//! 24-bit cell colors, packed the way the engine reports them.
//!
//! The engine's per-cell color words put **red in the low byte**:
//! `r = n & 0xFF`, `g = (n >> 8) & 0xFF`, `b = (n >> 16) & 0xFF`. Display
//! sinks want CSS hex strings, so `0x00FF00` renders as `"#00ff00"` (green).

use core::fmt;

/// A packed 24-bit RGB color word from the engine (red in the low byte).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb(pub u32);

impl Rgb {
    pub const BLACK: Self = Self(0);

    #[must_use]
    pub const fn r(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    #[must_use]
    pub const fn g(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    #[must_use]
    pub const fn b(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    /// Lowercase CSS hex form, `"#rrggbb"`.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r(), self.g(), self.b())
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r(), self.g(), self.b())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_order_is_red_low_byte() {
        assert_eq!(Rgb(0x0000FF).to_hex(), "#ff0000");
        assert_eq!(Rgb(0x00FF00).to_hex(), "#00ff00");
        assert_eq!(Rgb(0xFF0000).to_hex(), "#0000ff");
    }

    #[test]
    fn hex_is_zero_padded_lowercase() {
        assert_eq!(Rgb::BLACK.to_hex(), "#000000");
        assert_eq!(Rgb(0x0A0B0C).to_hex(), "#0c0b0a");
        assert_eq!(format!("{}", Rgb(0xFFFFFF)), "#ffffff");
    }
}
