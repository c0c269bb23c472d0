//! Simulated-annealing search for reel configurations.
//!
//! # Overview
//!
//! - **Reel operations** (`reels`): biased random reels and the five mutation operators
//! - **Objective** (`objective`): loss over sampled RTP and win rate
//! - **Annealing** (`annealing`): the Metropolis search loop
//!
//! Candidates are scored by sampling, and every evaluation draws a fresh
//! simulator seed. A reel triple that is revisited gets a new, noisy score.
//!
//! # Example
//!
//! ```rust,no_run
//! use slot_tuner::compute::search::ReelSearch;
//! use slot_tuner::schema::SearchConfig;
//!
//! let mut engine = ReelSearch::new(SearchConfig::default())?;
//! let outcome = engine.run_with_callback(|progress| {
//!     println!("Step {}: best loss = {:.4}", progress.step, progress.best_loss);
//! })?;
//! println!("Sampled RTP: {:.4}", outcome.best.metrics.rtp);
//! # Ok::<(), slot_tuner::compute::search::SearchError>(())
//! ```

mod annealing;
mod objective;
mod reels;

pub use annealing::{ReelSearch, SearchError, SearchOutcome, SearchProgress, StopReason};
pub use objective::Objective;
pub use reels::{Mutation, ReelRng};
