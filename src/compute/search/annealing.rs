//! Simulated-annealing search over reel configurations.

use log::{debug, info, trace};
use serde::Serialize;

use crate::compute::{Simulator, SlotMachine};
use crate::schema::{Candidate, ConfigError, ReelTriple, SearchConfig, SymbolError};

use super::objective::Objective;
use super::reels::{Mutation, ReelRng};

/// Floor on temperature in the acceptance test.
const MIN_TEMPERATURE: f64 = 1e-6;

/// Progress reported after every annealing step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SearchProgress {
    /// 1-based step just completed.
    pub step: usize,
    /// Temperature after cooling.
    pub temperature: f64,
    /// Loss of the current state.
    pub current_loss: f64,
    /// Lowest loss seen so far.
    pub best_loss: f64,
    /// Whether this step's proposal was accepted.
    pub accepted: bool,
}

/// Why the search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StopReason {
    /// A sampled proposal landed within tolerance of the targets.
    EarlyStop,
    /// The step budget ran out.
    StepBudget,
}

/// Final result of a search run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub best: Candidate,
    pub best_loss: f64,
    pub steps: usize,
    pub accepted: usize,
    pub stop_reason: StopReason,
    pub elapsed_seconds: f64,
}

/// Search errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchError {
    #[error("Invalid search configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Symbol(#[from] SymbolError),
}

/// Annealing engine. Owns its generator; every simulator it spawns is seeded
/// from that generator, so a run is reproducible from the config seed.
pub struct ReelSearch {
    config: SearchConfig,
    objective: Objective,
    rng: ReelRng,
}

impl ReelSearch {
    /// Create a search engine, validating the configuration.
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => ReelRng::new(seed, &config.mutation_weights, config.run_length_bounds)?,
            None => ReelRng::random(&config.mutation_weights, config.run_length_bounds)?,
        };
        let objective = Objective::from_config(&config);
        Ok(Self {
            config,
            objective,
            rng,
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    /// Generate the initial reel triple.
    pub fn random_candidate(&mut self) -> ReelTriple {
        self.rng.random_triple(self.config.reel_length_bounds)
    }

    /// Score reels on a fresh sample drawn with a freshly drawn seed.
    ///
    /// Evaluating the same reels twice gives different metrics.
    pub fn evaluate(&mut self, reels: ReelTriple) -> Result<Candidate, SearchError> {
        let machine = SlotMachine::new(reels, self.config.bet_amount)?;
        let seed = self.rng.next_seed();
        let metrics = Simulator::new(&machine, seed).run(self.config.spins_per_eval)?;
        Ok(Candidate {
            reels: machine.into_reels(),
            metrics,
        })
    }

    /// Run the search and return the best candidate.
    pub fn search(&mut self) -> Result<Candidate, SearchError> {
        Ok(self.run()?.best)
    }

    /// Run the search (blocking).
    pub fn run(&mut self) -> Result<SearchOutcome, SearchError> {
        self.run_with_callback(|_| {})
    }

    /// Run the search with a progress callback invoked after every step.
    pub fn run_with_callback<F>(&mut self, mut callback: F) -> Result<SearchOutcome, SearchError>
    where
        F: FnMut(&SearchProgress),
    {
        let start_time = std::time::Instant::now();

        let initial = self.random_candidate();
        info!(
            "Starting reel search: {} steps, {} spins/eval, seed {:?}, reel lengths {:?}",
            self.config.max_steps,
            self.config.spins_per_eval,
            self.config.seed,
            initial.lengths()
        );

        let mut current = self.evaluate(initial)?;
        let mut current_loss = self.objective.loss(&current.metrics);
        let mut best = current.clone();
        let mut best_loss = current_loss;

        let mut temperature = self.config.initial_temperature;
        let mut accepted_total = 0;
        let mut steps = 0;
        let mut stop_reason = StopReason::StepBudget;

        for step in 0..self.config.max_steps {
            let (proposal, mutation) = self.rng.mutate(&current.reels);
            let proposal = self.evaluate(proposal)?;
            let loss = self.objective.loss(&proposal.metrics);

            let accepted = loss < current_loss || self.metropolis(current_loss, loss, temperature);
            trace_step(step, mutation, loss, current_loss, temperature, accepted);

            let early = self
                .objective
                .is_close(&proposal.metrics, self.config.early_stop_tolerance)
                .then(|| (proposal.clone(), loss));

            if accepted {
                accepted_total += 1;
                if loss < best_loss {
                    debug!(
                        "Step {}: new best loss {:.6} (rtp {:.4}, win rate {:.4})",
                        step + 1,
                        loss,
                        proposal.metrics.rtp,
                        proposal.metrics.win_rate
                    );
                    best = proposal.clone();
                    best_loss = loss;
                }
                current = proposal;
                current_loss = loss;
            }

            temperature *= self.config.cooling_rate;
            steps = step + 1;

            callback(&SearchProgress {
                step: steps,
                temperature,
                current_loss,
                best_loss,
                accepted,
            });

            if let Some((candidate, loss)) = early {
                debug!(
                    "Early stop at step {}: rtp {:.4}, win rate {:.4}",
                    steps, candidate.metrics.rtp, candidate.metrics.win_rate
                );
                best = candidate;
                best_loss = loss;
                stop_reason = StopReason::EarlyStop;
                break;
            }
        }

        let elapsed = start_time.elapsed().as_secs_f64();
        info!(
            "Reel search finished after {} steps ({:?}): best loss {:.6}, rtp {:.4}, win rate {:.4}",
            steps, stop_reason, best_loss, best.metrics.rtp, best.metrics.win_rate
        );

        Ok(SearchOutcome {
            best,
            best_loss,
            steps,
            accepted: accepted_total,
            stop_reason,
            elapsed_seconds: elapsed,
        })
    }

    /// Metropolis acceptance for a non-improving proposal.
    fn metropolis(&mut self, current_loss: f64, loss: f64, temperature: f64) -> bool {
        let probability = ((current_loss - loss) / temperature.max(MIN_TEMPERATURE)).exp();
        self.rng.unit() < probability
    }
}

fn trace_step(
    step: usize,
    mutation: Mutation,
    loss: f64,
    current_loss: f64,
    temperature: f64,
    accepted: bool,
) {
    trace!(
        "Step {}: {:?} -> loss {:.6} vs {:.6} at T={:.4} ({})",
        step + 1,
        mutation,
        loss,
        current_loss,
        temperature,
        if accepted { "accepted" } else { "rejected" }
    );
}
