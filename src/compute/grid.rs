//! Grid construction from reels and stop positions.

use serde::{Deserialize, Serialize};

use crate::schema::{Coord, REEL_COUNT, ReelTriple, SymbolKey, VISIBLE_ROWS};

/// Stop index per reel.
pub type Stops = [usize; REEL_COUNT];

/// Row-major 3x3 matrix of symbol keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid([[SymbolKey; REEL_COUNT]; VISIBLE_ROWS]);

impl Grid {
    /// Build the visible grid for a stop triple.
    ///
    /// Each reel contributes its 3-symbol window as a column; columns are
    /// transposed into rows. Stops are taken modulo reel length.
    pub fn from_stops(reels: &ReelTriple, stops: Stops) -> Self {
        let columns: [[SymbolKey; VISIBLE_ROWS]; REEL_COUNT] =
            std::array::from_fn(|col| reels.reel(col).window(stops[col]));
        Self(std::array::from_fn(|row| {
            std::array::from_fn(|col| columns[col][row])
        }))
    }

    /// Construct directly from rows.
    pub fn from_rows(rows: [[SymbolKey; REEL_COUNT]; VISIBLE_ROWS]) -> Self {
        Self(rows)
    }

    /// Symbol at (row, col).
    #[inline]
    pub fn at(&self, (row, col): Coord) -> SymbolKey {
        self.0[row][col]
    }

    /// Rows top to bottom.
    pub fn rows(&self) -> &[[SymbolKey; REEL_COUNT]; VISIBLE_ROWS] {
        &self.0
    }
}
