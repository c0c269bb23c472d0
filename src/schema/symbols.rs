//! Fixed symbol table and payout multipliers.

use serde::Serialize;

/// Symbol key as stored on reels and in grids.
pub type SymbolKey = u8;

/// A single symbol with its payout multiplier.
///
/// Only the entries of [`SYMBOLS`] exist; there is no public constructor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Symbol {
    key: SymbolKey,
    multiplier: f64,
}

impl Symbol {
    const fn entry(key: SymbolKey, multiplier: f64) -> Self {
        Self { key, multiplier }
    }

    /// Integer key (0-4).
    #[inline]
    pub fn key(&self) -> SymbolKey {
        self.key
    }

    /// Multiplier applied to bet and pattern weight on a match.
    #[inline]
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }
}

/// The five symbols, indexed by key.
pub const SYMBOLS: [Symbol; 5] = [
    Symbol::entry(0, 0.25),
    Symbol::entry(1, 0.55),
    Symbol::entry(2, 1.0),
    Symbol::entry(3, 3.0),
    Symbol::entry(4, 5.0),
];

/// Number of distinct symbols.
pub const SYMBOL_COUNT: usize = SYMBOLS.len();

/// Categorical weights used when generating reel content.
/// Biased towards the low multipliers.
pub const SYMBOL_WEIGHTS: [u32; SYMBOL_COUNT] = [5, 5, 4, 2, 1];

/// Look up a symbol by key.
#[inline]
pub fn symbol(key: SymbolKey) -> Result<&'static Symbol, SymbolError> {
    SYMBOLS.get(key as usize).ok_or(SymbolError::Unknown(key))
}

/// Multiplier for a symbol key.
#[inline]
pub fn multiplier(key: SymbolKey) -> Result<f64, SymbolError> {
    symbol(key).map(Symbol::multiplier)
}

/// Symbol lookup errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SymbolError {
    #[error("Unknown symbol key {0} (expected 0..{max})", max = SYMBOL_COUNT - 1)]
    Unknown(SymbolKey),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_keys_match_index() {
        for (i, s) in SYMBOLS.iter().enumerate() {
            assert_eq!(s.key() as usize, i);
            assert!(s.multiplier() > 0.0);
        }
    }

    #[test]
    fn test_multipliers() {
        assert_eq!(multiplier(0).unwrap(), 0.25);
        assert_eq!(multiplier(1).unwrap(), 0.55);
        assert_eq!(multiplier(2).unwrap(), 1.0);
        assert_eq!(multiplier(3).unwrap(), 3.0);
        assert_eq!(multiplier(4).unwrap(), 5.0);
    }

    #[test]
    fn test_unknown_symbol() {
        assert_eq!(symbol(5), Err(SymbolError::Unknown(5)));
        assert_eq!(multiplier(255), Err(SymbolError::Unknown(255)));
    }

    #[test]
    fn test_symbol_serializes_key_and_multiplier() {
        let json = serde_json::to_value(symbol(3).unwrap()).unwrap();
        assert_eq!(json, serde_json::json!({"key": 3, "multiplier": 3.0}));
    }
}
