//! Winning patterns over the 3x3 grid.

use serde::Serialize;

/// Grid coordinate as (row, col), 0-based.
pub type Coord = (usize, usize);

/// A fixed shape of grid cells that pays when all cells share one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pattern {
    /// Stable identifier used in match detail.
    pub name: &'static str,
    /// Cells covered by the shape. The first cell decides the candidate symbol.
    pub coords: &'static [Coord],
    /// Payout weight applied on top of the symbol multiplier.
    pub weight: u32,
}

const TOP_LEFT: [Coord; 4] = [(0, 0), (0, 1), (1, 0), (1, 1)];
const TOP_RIGHT: [Coord; 4] = [(0, 1), (0, 2), (1, 1), (1, 2)];
const BOTTOM_LEFT: [Coord; 4] = [(1, 0), (1, 1), (2, 0), (2, 1)];
const BOTTOM_RIGHT: [Coord; 4] = [(1, 1), (1, 2), (2, 1), (2, 2)];
const FULL: [Coord; 9] = [
    (0, 0),
    (0, 1),
    (0, 2),
    (1, 0),
    (1, 1),
    (1, 2),
    (2, 0),
    (2, 1),
    (2, 2),
];

/// The five winning patterns: four 2x2 corner blocks (weight 1) and the
/// full 3x3 block (weight 5).
pub const PATTERNS: [Pattern; 5] = [
    Pattern {
        name: "top_left_2x2",
        coords: &TOP_LEFT,
        weight: 1,
    },
    Pattern {
        name: "top_right_2x2",
        coords: &TOP_RIGHT,
        weight: 1,
    },
    Pattern {
        name: "bottom_left_2x2",
        coords: &BOTTOM_LEFT,
        weight: 1,
    },
    Pattern {
        name: "bottom_right_2x2",
        coords: &BOTTOM_RIGHT,
        weight: 1,
    },
    Pattern {
        name: "full_3x3",
        coords: &FULL,
        weight: 5,
    },
];

/// Sum of all pattern weights (payout factor of a monochrome grid).
pub fn total_weight() -> u32 {
    PATTERNS.iter().map(|p| p.weight).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_in_bounds() {
        for p in &PATTERNS {
            assert!(!p.coords.is_empty());
            assert!(p.weight > 0);
            for &(r, c) in p.coords {
                assert!(r < 3 && c < 3, "{} has out-of-range cell", p.name);
            }
        }
    }

    #[test]
    fn test_total_weight() {
        assert_eq!(total_weight(), 9);
    }
}
