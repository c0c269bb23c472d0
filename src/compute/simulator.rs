//! Stochastic simulator: seeded random spins over a machine.

use rand::prelude::*;
use serde::Serialize;

use crate::schema::{Metrics, SymbolError};

use super::{Grid, PatternMatch, SlotMachine, Stops};

/// Samples uniform stop triples from its own seeded generator.
pub struct Simulator<'a> {
    machine: &'a SlotMachine,
    rng: StdRng,
}

impl<'a> Simulator<'a> {
    /// Create from seed. Same seed and reels give bit-identical runs.
    pub fn new(machine: &'a SlotMachine, seed: u64) -> Self {
        Self {
            machine,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create with random seed.
    pub fn from_entropy(machine: &'a SlotMachine) -> Self {
        Self {
            machine,
            rng: StdRng::from_entropy(),
        }
    }

    /// Draw one stop per reel, uniform over its length.
    pub fn random_stops(&mut self) -> Stops {
        let lengths = self.machine.reels().lengths();
        std::array::from_fn(|i| self.rng.gen_range(0..lengths[i]))
    }

    /// Run `spins` independent spins and aggregate metrics.
    pub fn run(&mut self, spins: u64) -> Result<Metrics, SymbolError> {
        let mut wins = 0u64;
        let mut total_return = 0.0;
        for _ in 0..spins {
            let stops = self.random_stops();
            let grid = self.machine.spin_grid(stops);
            let payout = self.machine.payout(&grid)?;
            total_return += payout;
            if payout > 0.0 {
                wins += 1;
            }
        }
        Ok(Metrics::from_totals(
            spins,
            wins,
            total_return,
            self.machine.bet_amount(),
        ))
    }

    /// Single spin with match detail.
    pub fn spin(&mut self) -> Result<SpinOutcome, SymbolError> {
        let stops = self.random_stops();
        let grid = self.machine.spin_grid(stops);
        let evaluation = self.machine.evaluate_patterns(&grid)?;
        Ok(SpinOutcome {
            stops,
            grid,
            payout: evaluation.payout,
            matches: evaluation.matches,
        })
    }
}

/// Result of a single displayed spin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpinOutcome {
    pub stops: Stops,
    pub grid: Grid,
    pub payout: f64,
    pub matches: Vec<PatternMatch>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::ExactEvaluator;
    use crate::schema::{ReelTriple, SymbolKey};

    fn machine(lists: Vec<Vec<SymbolKey>>) -> SlotMachine {
        SlotMachine::new(ReelTriple::from_symbols(lists).unwrap(), 1.0).unwrap()
    }

    fn mixed_machine() -> SlotMachine {
        machine(vec![
            vec![0, 0, 1, 1, 2, 0, 3],
            vec![0, 0, 0, 1, 2, 2],
            vec![1, 1, 0, 0, 0, 4, 2, 2],
        ])
    }

    #[test]
    fn test_same_seed_is_bit_identical() {
        let m = mixed_machine();
        let a = Simulator::new(&m, 42).run(5_000).unwrap();
        let b = Simulator::new(&m, 42).run(5_000).unwrap();
        assert_eq!(a.spins, b.spins);
        assert_eq!(a.total_return.to_bits(), b.total_return.to_bits());
        assert_eq!(a.win_rate.to_bits(), b.win_rate.to_bits());
        assert_eq!(a.rtp.to_bits(), b.rtp.to_bits());
    }

    #[test]
    fn test_stops_in_range() {
        let m = mixed_machine();
        let mut sim = Simulator::new(&m, 7);
        let lengths = m.reels().lengths();
        for _ in 0..1_000 {
            let stops = sim.random_stops();
            for (stop, len) in stops.iter().zip(lengths) {
                assert!(*stop < len);
            }
        }
    }

    #[test]
    fn test_single_stop_reels_match_exact() {
        let m = machine(vec![vec![2], vec![2], vec![2]]);
        let metrics = Simulator::new(&m, 1).run(100).unwrap();
        assert_eq!(metrics.spins, 100);
        assert_eq!(metrics.rtp, 9.0);
        assert_eq!(metrics.win_rate, 1.0);
    }

    #[test]
    fn test_converges_to_exact() {
        let m = mixed_machine();
        let exact = ExactEvaluator::new(&m).run().unwrap();
        let sampled = Simulator::new(&m, 2024).run(200_000).unwrap();

        assert!(
            (sampled.rtp - exact.rtp).abs() < 0.03,
            "sampled rtp {} vs exact {}",
            sampled.rtp,
            exact.rtp
        );
        assert!(
            (sampled.win_rate - exact.win_rate).abs() < 0.01,
            "sampled win rate {} vs exact {}",
            sampled.win_rate,
            exact.win_rate
        );
    }

    #[test]
    fn test_zero_spins() {
        let m = mixed_machine();
        let metrics = Simulator::new(&m, 3).run(0).unwrap();
        assert_eq!(metrics.spins, 0);
        assert_eq!(metrics.rtp, 0.0);
        assert_eq!(metrics.win_rate, 0.0);
    }

    #[test]
    fn test_spin_detail_matches_payout() {
        let m = mixed_machine();
        let mut sim = Simulator::new(&m, 11);
        for _ in 0..200 {
            let outcome = sim.spin().unwrap();
            assert_eq!(outcome.grid, m.spin_grid(outcome.stops));
            assert_eq!(outcome.payout, m.payout(&outcome.grid).unwrap());
            assert_eq!(outcome.matches.is_empty(), outcome.payout == 0.0);
        }
    }
}
