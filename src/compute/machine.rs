//! Slot machine: grid scoring against the fixed pattern set.

use serde::Serialize;

use crate::schema::{
    ConfigError, Coord, PATTERNS, Pattern, ReelTriple, SymbolError, SymbolKey, multiplier,
};

use super::{Grid, Stops};

/// A 3-reel machine with a fixed bet.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotMachine {
    reels: ReelTriple,
    bet_amount: f64,
}

impl SlotMachine {
    /// Create a machine, rejecting a non-positive bet.
    pub fn new(reels: ReelTriple, bet_amount: f64) -> Result<Self, ConfigError> {
        if !(bet_amount > 0.0) {
            return Err(ConfigError::InvalidBet(bet_amount));
        }
        Ok(Self { reels, bet_amount })
    }

    #[inline]
    pub fn reels(&self) -> &ReelTriple {
        &self.reels
    }

    #[inline]
    pub fn bet_amount(&self) -> f64 {
        self.bet_amount
    }

    /// Give back the reels.
    pub fn into_reels(self) -> ReelTriple {
        self.reels
    }

    /// Grid shown for a stop triple.
    #[inline]
    pub fn spin_grid(&self, stops: Stops) -> Grid {
        Grid::from_stops(&self.reels, stops)
    }

    /// Total payout for a grid across all patterns.
    ///
    /// Patterns are scored independently; every match adds
    /// `bet * multiplier(symbol) * weight`.
    pub fn payout(&self, grid: &Grid) -> Result<f64, SymbolError> {
        let mut total = 0.0;
        for pattern in &PATTERNS {
            if let Some(symbol) = matched_symbol(grid, pattern) {
                total += self.bet_amount * multiplier(symbol)? * pattern.weight as f64;
            }
        }
        Ok(total)
    }

    /// Payout plus per-pattern match detail, for display.
    pub fn evaluate_patterns(&self, grid: &Grid) -> Result<PatternEvaluation, SymbolError> {
        let mut matches = Vec::new();
        let mut payout = 0.0;
        for pattern in &PATTERNS {
            let Some(symbol) = matched_symbol(grid, pattern) else {
                continue;
            };
            let multiplier = multiplier(symbol)?;
            let contribution = self.bet_amount * multiplier * pattern.weight as f64;
            payout += contribution;
            matches.push(PatternMatch {
                pattern: pattern.name,
                coords: pattern.coords,
                symbol,
                weight: pattern.weight,
                multiplier,
                payout: contribution,
            });
        }
        Ok(PatternEvaluation { payout, matches })
    }
}

/// Symbol shared by every cell of the pattern, if any.
#[inline]
fn matched_symbol(grid: &Grid, pattern: &Pattern) -> Option<SymbolKey> {
    let (&first, rest) = pattern.coords.split_first()?;
    let symbol = grid.at(first);
    rest.iter()
        .all(|&cell| grid.at(cell) == symbol)
        .then_some(symbol)
}

/// A single pattern match with its payout contribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternMatch {
    pub pattern: &'static str,
    pub coords: &'static [Coord],
    pub symbol: SymbolKey,
    pub weight: u32,
    pub multiplier: f64,
    pub payout: f64,
}

/// Grid payout with its match detail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternEvaluation {
    pub payout: f64,
    pub matches: Vec<PatternMatch>,
}
