#![forbid(unsafe_code)]

//! Fixed grid geometry.
//!
//! The grid is sized once at startup and never changes. Every
//! coordinate-bearing operation in the shell bounds-checks against it;
//! off-grid pointer input is rejected outright rather than clamped so that
//! out-of-range coordinates can never reach the engine.

/// Fixed dimensions of the character grid, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    #[must_use]
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Whether a (possibly negative) cell coordinate lies on the grid.
    #[must_use]
    pub const fn contains(self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32
    }

    /// Total number of cells.
    #[must_use]
    pub const fn cell_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// All cell coordinates in row-major order.
    pub fn cells(self) -> impl Iterator<Item = (u16, u16)> {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| (x, y)))
    }
}
