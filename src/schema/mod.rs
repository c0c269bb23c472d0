//! Schema module - Value types, configuration, and reports for reel search.

mod config;
mod pattern;
mod reel;
mod report;
mod symbols;

pub use config::*;
pub use pattern::*;
pub use reel::*;
pub use report::*;
pub use symbols::*;
