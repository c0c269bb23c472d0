//! Compute module - Spin evaluation, exact enumeration, sampling and search.

mod certification;
mod exact;
mod grid;
mod machine;
mod simulator;

pub mod search;

pub use certification::*;
pub use exact::*;
pub use grid::*;
pub use machine::*;
pub use simulator::*;
