//! Exact evaluation of RTP and win rate by full stop enumeration.

use rayon::prelude::*;

use crate::schema::{Metrics, SymbolError};

use super::SlotMachine;

/// Enumerates every stop combination of a machine.
///
/// Cost is `L0 * L1 * L2` grid evaluations; keep reels short.
pub struct ExactEvaluator<'a> {
    machine: &'a SlotMachine,
}

impl<'a> ExactEvaluator<'a> {
    pub fn new(machine: &'a SlotMachine) -> Self {
        Self { machine }
    }

    /// Score all combinations and aggregate exact metrics.
    ///
    /// Work is split across the first reel's stops. Partial sums are
    /// collected in stop order and folded sequentially, so the result does
    /// not depend on thread scheduling.
    pub fn run(&self) -> Result<Metrics, SymbolError> {
        let [l0, _, _] = self.machine.reels().lengths();

        let partials: Vec<(u64, f64)> = (0..l0)
            .into_par_iter()
            .map(|i| self.sweep_first_stop(i))
            .collect::<Result<_, _>>()?;

        let (wins, total_return) = partials
            .into_iter()
            .fold((0u64, 0.0f64), |(w, r), (pw, pr)| (w + pw, r + pr));

        Ok(Metrics::from_totals(
            self.machine.reels().combinations(),
            wins,
            total_return,
            self.machine.bet_amount(),
        ))
    }

    /// Wins and total return over all combinations with reel 0 at `i`.
    fn sweep_first_stop(&self, i: usize) -> Result<(u64, f64), SymbolError> {
        let [_, l1, l2] = self.machine.reels().lengths();
        let mut wins = 0u64;
        let mut total_return = 0.0;
        for j in 0..l1 {
            for k in 0..l2 {
                let grid = self.machine.spin_grid([i, j, k]);
                let payout = self.machine.payout(&grid)?;
                total_return += payout;
                if payout > 0.0 {
                    wins += 1;
                }
            }
        }
        Ok((wins, total_return))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ReelTriple, SymbolKey};

    fn machine(lists: Vec<Vec<SymbolKey>>) -> SlotMachine {
        SlotMachine::new(ReelTriple::from_symbols(lists).unwrap(), 1.0).unwrap()
    }

    #[test]
    fn test_all_twos() {
        let m = machine(vec![vec![2], vec![2], vec![2]]);
        let metrics = ExactEvaluator::new(&m).run().unwrap();
        assert_eq!(metrics.spins, 1);
        assert_eq!(metrics.rtp, 9.0);
        assert_eq!(metrics.win_rate, 1.0);
        assert_eq!(metrics.total_bet, 1.0);
    }

    #[test]
    fn test_all_zeros() {
        let m = machine(vec![vec![0], vec![0], vec![0]]);
        let metrics = ExactEvaluator::new(&m).run().unwrap();
        assert_eq!(metrics.spins, 1);
        assert_eq!(metrics.rtp, 2.25);
        assert_eq!(metrics.win_rate, 1.0);
    }

    #[test]
    fn test_disjoint_columns_never_pay() {
        // Neighbouring columns never share a symbol, so no block can match
        let m = machine(vec![vec![0, 3], vec![1, 4], vec![2, 0]]);
        let metrics = ExactEvaluator::new(&m).run().unwrap();
        assert_eq!(metrics.spins, 8);
        assert_eq!(metrics.rtp, 0.0);
        assert_eq!(metrics.win_rate, 0.0);
        assert_eq!(metrics.total_return, 0.0);
    }

    #[test]
    fn test_win_rate_is_exact_ratio() {
        // Reel 0 never repeats vertically, so only the right-hand blocks can
        // match. They depend on reel 2 alone: stops 0, 1 and 3 pay, stop 2
        // does not.
        let m = machine(vec![vec![0, 1, 2], vec![0], vec![0, 0, 0, 1]]);
        let metrics = ExactEvaluator::new(&m).run().unwrap();
        assert_eq!(metrics.spins, 12);
        assert_eq!(metrics.win_rate, 9.0 / 12.0);
        assert_eq!(metrics.total_return, 3.0);
        assert_eq!(metrics.rtp, 0.25);
    }

    #[test]
    fn test_bet_does_not_change_rtp() {
        let lists = vec![vec![0, 0, 1, 2], vec![0, 2, 2], vec![1, 1, 0]];
        let unit = machine(lists.clone());
        let big = SlotMachine::new(ReelTriple::from_symbols(lists).unwrap(), 4.0).unwrap();

        let a = ExactEvaluator::new(&unit).run().unwrap();
        let b = ExactEvaluator::new(&big).run().unwrap();
        assert_eq!(a.spins, b.spins);
        assert_eq!(a.win_rate, b.win_rate);
        assert!((a.rtp - b.rtp).abs() < 1e-12);
        assert_eq!(b.total_bet, 4.0 * a.total_bet);
    }

    #[test]
    fn test_unknown_symbol_propagates() {
        let m = machine(vec![vec![0, 9], vec![9], vec![9]]);
        assert_eq!(ExactEvaluator::new(&m).run(), Err(SymbolError::Unknown(9)));
    }
}
