//! Reel and reel-triple value types.

use serde::{Deserialize, Serialize};

use super::SymbolKey;

/// Number of reels (and grid columns).
pub const REEL_COUNT: usize = 3;

/// Number of visible rows per reel.
pub const VISIBLE_ROWS: usize = 3;

/// A circular reel storing symbol keys in order.
///
/// Always holds at least one symbol. Serializes as a plain list of keys and
/// deserializes through [`Reel::new`], so an empty list is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SymbolKey>", into = "Vec<SymbolKey>")]
pub struct Reel {
    symbols: Vec<SymbolKey>,
}

impl Reel {
    /// Create a reel, rejecting an empty symbol list.
    pub fn new(symbols: Vec<SymbolKey>) -> Result<Self, ReelError> {
        if symbols.is_empty() {
            return Err(ReelError::EmptyReel { index: None });
        }
        Ok(Self { symbols })
    }

    /// Wrap symbols already known to be non-empty (generator output).
    pub(crate) fn from_nonempty(symbols: Vec<SymbolKey>) -> Self {
        debug_assert!(!symbols.is_empty());
        Self { symbols }
    }

    /// Symbols in reel order.
    #[inline]
    pub fn symbols(&self) -> &[SymbolKey] {
        &self.symbols
    }

    /// Number of stops on the reel.
    #[inline]
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Symbol at a position, wrapping around.
    #[inline]
    pub fn symbol_at(&self, position: usize) -> SymbolKey {
        self.symbols[position % self.symbols.len()]
    }

    /// Visible column for a stop: rows 0..3 top to bottom, with wrap-around.
    #[inline]
    pub fn window(&self, start: usize) -> [SymbolKey; VISIBLE_ROWS] {
        std::array::from_fn(|offset| self.symbol_at(start + offset))
    }

    /// Consume the reel, returning its symbols.
    pub fn into_symbols(self) -> Vec<SymbolKey> {
        self.symbols
    }
}

impl TryFrom<Vec<SymbolKey>> for Reel {
    type Error = ReelError;

    fn try_from(symbols: Vec<SymbolKey>) -> Result<Self, Self::Error> {
        Self::new(symbols)
    }
}

impl From<Reel> for Vec<SymbolKey> {
    fn from(reel: Reel) -> Self {
        reel.symbols
    }
}

/// Exactly three reels; reel `i` feeds grid column `i`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ReelsPayload", into = "ReelsPayload")]
pub struct ReelTriple {
    reels: [Reel; REEL_COUNT],
}

impl ReelTriple {
    /// Build from exactly three reels.
    pub fn new(reels: Vec<Reel>) -> Result<Self, ReelError> {
        let found = reels.len();
        let reels: [Reel; REEL_COUNT] = reels
            .try_into()
            .map_err(|_| ReelError::WrongReelCount { found })?;
        Ok(Self { reels })
    }

    /// Build from raw symbol lists, validating each reel.
    pub fn from_symbols(lists: Vec<Vec<SymbolKey>>) -> Result<Self, ReelError> {
        let reels = lists
            .into_iter()
            .enumerate()
            .map(|(index, symbols)| {
                Reel::new(symbols).map_err(|_| ReelError::EmptyReel { index: Some(index) })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(reels)
    }

    /// The three reels in column order.
    #[inline]
    pub fn reels(&self) -> &[Reel; REEL_COUNT] {
        &self.reels
    }

    /// Reel for a column.
    #[inline]
    pub fn reel(&self, index: usize) -> &Reel {
        &self.reels[index]
    }

    /// Reel lengths in column order.
    pub fn lengths(&self) -> [usize; REEL_COUNT] {
        std::array::from_fn(|i| self.reels[i].len())
    }

    /// Number of distinct stop combinations (product of lengths).
    pub fn combinations(&self) -> u64 {
        self.reels.iter().map(|r| r.len() as u64).product()
    }

    /// Consume into the raw symbol lists.
    pub fn into_symbols(self) -> [Vec<SymbolKey>; REEL_COUNT] {
        self.reels.map(Reel::into_symbols)
    }
}

impl From<[Reel; REEL_COUNT]> for ReelTriple {
    fn from(reels: [Reel; REEL_COUNT]) -> Self {
        Self { reels }
    }
}

/// Public JSON shape of a reel triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReelsPayload {
    pub reel_1: Vec<SymbolKey>,
    pub reel_2: Vec<SymbolKey>,
    pub reel_3: Vec<SymbolKey>,
}

impl TryFrom<ReelsPayload> for ReelTriple {
    type Error = ReelError;

    fn try_from(payload: ReelsPayload) -> Result<Self, Self::Error> {
        Self::from_symbols(vec![payload.reel_1, payload.reel_2, payload.reel_3])
    }
}

impl From<ReelTriple> for ReelsPayload {
    fn from(triple: ReelTriple) -> Self {
        let [reel_1, reel_2, reel_3] = triple.into_symbols();
        Self {
            reel_1,
            reel_2,
            reel_3,
        }
    }
}

/// Reel construction errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReelError {
    #[error("Reel{} must contain at least one symbol", .index.map(|i| format!(" {}", i + 1)).unwrap_or_default())]
    EmptyReel { index: Option<usize> },
    #[error("Expected exactly {expected} reels, found {found}", expected = REEL_COUNT)]
    WrongReelCount { found: usize },
}
