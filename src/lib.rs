//! Slot Tuner - Reel configuration search for a 3x3 pattern-pay slot game.
//!
//! This crate searches for three reels whose return to player sits at a
//! target (0.95 by default) while at least a minimum share of spins win
//! (0.55 by default). Candidates are scored by sampling during the search
//! and certified by exact enumeration of every stop combination.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Symbols, patterns, reels, configuration and result types
//! - `compute`: Spin evaluation, exact and sampled metrics, annealing search
//!
//! # Example
//!
//! ```rust,no_run
//! use slot_tuner::{
//!     compute::{ExactEvaluator, SlotMachine, certify},
//!     schema::{RetryPolicy, SearchConfig},
//! };
//!
//! let config = SearchConfig::default();
//! let certification = certify(&config, &RetryPolicy::default())?;
//!
//! let machine = SlotMachine::new(certification.candidate.reels.clone(), 1.0)?;
//! let exact = ExactEvaluator::new(&machine).run()?;
//! println!("Exact RTP: {:.4}, win rate: {:.4}", exact.rtp, exact.win_rate);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::{ExactEvaluator, Simulator, SlotMachine, certify};
pub use schema::{Metrics, ReelTriple, SearchConfig};
