//! Reel generation and mutation for the annealing search.
//!
//! Mutation is a pure function of the input triple and the generator state:
//! the input is never modified and a fresh triple is returned.

use rand::distributions::WeightedIndex;
use rand::prelude::*;

use crate::schema::{
    ConfigError, MutationWeights, REEL_COUNT, Reel, ReelTriple, SYMBOL_WEIGHTS, SymbolKey,
};

/// Mutation operators, one applied per search step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// Swap two positions within one reel.
    Swap,
    /// Redraw one position from the biased symbol distribution.
    Resample,
    /// Circularly rotate one reel by a non-zero offset.
    Rotate,
    /// Overwrite a short wrap-around span with the symbol at its start.
    Reinforce,
    /// Copy a short slice from one reel into another (or the same) reel.
    CopySlice,
}

impl Mutation {
    /// All operators, in the order of [`MutationWeights::as_array`].
    pub const ALL: [Mutation; 5] = [
        Mutation::Swap,
        Mutation::Resample,
        Mutation::Rotate,
        Mutation::Reinforce,
        Mutation::CopySlice,
    ];
}

const MIN_COPY_LEN: usize = 2;
const MAX_COPY_LEN: usize = 6;

/// Random number generator wrapper for reel operations.
pub struct ReelRng {
    rng: StdRng,
    symbols: WeightedIndex<u32>,
    operators: WeightedIndex<f64>,
    run_length_bounds: (usize, usize),
}

impl ReelRng {
    /// Create from seed.
    pub fn new(
        seed: u64,
        weights: &MutationWeights,
        run_length_bounds: (usize, usize),
    ) -> Result<Self, ConfigError> {
        Self::with_rng(StdRng::seed_from_u64(seed), weights, run_length_bounds)
    }

    /// Create with random seed.
    pub fn random(
        weights: &MutationWeights,
        run_length_bounds: (usize, usize),
    ) -> Result<Self, ConfigError> {
        Self::with_rng(StdRng::from_entropy(), weights, run_length_bounds)
    }

    fn with_rng(
        rng: StdRng,
        weights: &MutationWeights,
        run_length_bounds: (usize, usize),
    ) -> Result<Self, ConfigError> {
        weights.validate()?;
        let symbols = WeightedIndex::new(SYMBOL_WEIGHTS)
            .map_err(|_| ConfigError::InvalidMutationWeights)?;
        let operators = WeightedIndex::new(weights.as_array())
            .map_err(|_| ConfigError::InvalidMutationWeights)?;
        Ok(Self {
            rng,
            symbols,
            operators,
            run_length_bounds,
        })
    }

    /// Draw a symbol from the biased categorical distribution.
    pub fn biased_symbol(&mut self) -> SymbolKey {
        self.symbols.sample(&mut self.rng) as SymbolKey
    }

    /// Random run length within bounds.
    fn run_length(&mut self) -> usize {
        let (lo, hi) = self.run_length_bounds;
        self.rng.gen_range(lo..=hi)
    }

    /// Generate a reel of `length` symbols built from runs of identical keys.
    pub fn random_reel(&mut self, length: usize) -> Reel {
        let length = length.max(1);
        let mut symbols = Vec::with_capacity(length + self.run_length_bounds.1);
        while symbols.len() < length {
            let symbol = self.biased_symbol();
            let run = self.run_length();
            symbols.extend(std::iter::repeat_n(symbol, run));
        }
        symbols.truncate(length);
        Reel::from_nonempty(symbols)
    }

    /// Generate three reels with independently drawn lengths.
    pub fn random_triple(&mut self, length_bounds: (usize, usize)) -> ReelTriple {
        let lengths: [usize; REEL_COUNT] =
            std::array::from_fn(|_| self.rng.gen_range(length_bounds.0..=length_bounds.1));
        ReelTriple::from(lengths.map(|len| self.random_reel(len)))
    }

    /// Pick an operator according to the configured weights.
    pub fn pick_mutation(&mut self) -> Mutation {
        Mutation::ALL[self.operators.sample(&mut self.rng)]
    }

    /// Produce a neighbour of `reels` using one randomly chosen operator.
    pub fn mutate(&mut self, reels: &ReelTriple) -> (ReelTriple, Mutation) {
        let mutation = self.pick_mutation();
        (self.apply(reels, mutation), mutation)
    }

    /// Apply a specific operator, returning a new triple.
    pub fn apply(&mut self, reels: &ReelTriple, mutation: Mutation) -> ReelTriple {
        let mut lists: [Vec<SymbolKey>; REEL_COUNT] =
            std::array::from_fn(|i| reels.reel(i).symbols().to_vec());

        match mutation {
            Mutation::Swap => {
                let reel = &mut lists[self.rng.gen_range(0..REEL_COUNT)];
                if reel.len() > 1 {
                    let picked = rand::seq::index::sample(&mut self.rng, reel.len(), 2);
                    reel.swap(picked.index(0), picked.index(1));
                }
            }
            Mutation::Resample => {
                let i = self.rng.gen_range(0..REEL_COUNT);
                let j = self.rng.gen_range(0..lists[i].len());
                lists[i][j] = self.biased_symbol();
            }
            Mutation::Rotate => {
                let reel = &mut lists[self.rng.gen_range(0..REEL_COUNT)];
                // A single-stop reel has no non-zero rotation
                if reel.len() > 1 {
                    let k = self.rng.gen_range(1..reel.len());
                    reel.rotate_left(k);
                }
            }
            Mutation::Reinforce => {
                let i = self.rng.gen_range(0..REEL_COUNT);
                let n = lists[i].len();
                let start = self.rng.gen_range(0..n);
                let run = self.run_length();
                let value = lists[i][start];
                for offset in 1..run {
                    lists[i][(start + offset) % n] = value;
                }
            }
            Mutation::CopySlice => {
                let src = self.rng.gen_range(0..REEL_COUNT);
                let dst = self.rng.gen_range(0..REEL_COUNT);
                let (n_src, n_dst) = (lists[src].len(), lists[dst].len());
                if n_src >= MIN_COPY_LEN && n_dst >= MIN_COPY_LEN {
                    let max_len = MAX_COPY_LEN.min(n_src).min(n_dst);
                    let len = self.rng.gen_range(MIN_COPY_LEN..=max_len);
                    let s0 = self.rng.gen_range(0..=n_src - len);
                    let d0 = self.rng.gen_range(0..=n_dst - len);
                    let slice = lists[src][s0..s0 + len].to_vec();
                    lists[dst][d0..d0 + len].copy_from_slice(&slice);
                }
            }
        }

        ReelTriple::from(lists.map(Reel::from_nonempty))
    }

    /// Generate next u64 for seeding child generators.
    pub fn next_seed(&mut self) -> u64 {
        self.rng.r#gen()
    }

    /// Uniform draw in [0, 1).
    pub fn unit(&mut self) -> f64 {
        self.rng.r#gen()
    }
}
