#![forbid(unsafe_code)]

//! The external display-sink capability.
//!
//! The sink owns a fixed character cell buffer and the pixel↔cell geometry
//! (font metrics, canvas offsets). Font rendering, color parsing, and DOM
//! management are entirely its concern; the shell just hands it cells.

pub trait GridSink {
    /// Write one cell. Called up to `width * height` times per frame with
    /// lowercase CSS hex colors (`"#rrggbb"`).
    fn draw(&mut self, x: u16, y: u16, glyph: char, fg: &str, bg: &str);

    /// Translate a pixel position to cell coordinates, or `None` when the
    /// point lies outside the display surface. Returned coordinates are still
    /// bounds-checked by the shell before an event is built.
    fn pixel_to_cell(&self, pixel_x: i32, pixel_y: i32) -> Option<(i32, i32)>;
}
