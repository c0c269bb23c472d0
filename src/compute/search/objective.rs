//! Search objective combining RTP error and win-rate penalties.

use crate::schema::{Metrics, SearchConfig};

/// Weight on win-rate shortfall below the floor.
const SHORTFALL_WEIGHT: f64 = 2.0;

/// Weight on win-rate excess above the floor.
const EXCESS_WEIGHT: f64 = 0.1;

/// Scores metrics against RTP and win-rate targets. Lower is better.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Objective {
    pub target_rtp: f64,
    pub min_win_rate: f64,
}

impl Objective {
    pub fn new(target_rtp: f64, min_win_rate: f64) -> Self {
        Self {
            target_rtp,
            min_win_rate,
        }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(config.target_rtp, config.min_win_rate)
    }

    /// `|rtp - target| + 2 * shortfall + 0.1 * excess`.
    pub fn loss(&self, metrics: &Metrics) -> f64 {
        let rtp_error = (metrics.rtp - self.target_rtp).abs();
        let shortfall = (self.min_win_rate - metrics.win_rate).max(0.0);
        let excess = (metrics.win_rate - self.min_win_rate).max(0.0);
        rtp_error + SHORTFALL_WEIGHT * shortfall + EXCESS_WEIGHT * excess
    }

    /// Ranking score used to compare exactly validated results:
    /// RTP distance plus unweighted win-rate shortfall.
    pub fn validation_gap(&self, metrics: &Metrics) -> f64 {
        (metrics.rtp - self.target_rtp).abs() + (self.min_win_rate - metrics.win_rate).max(0.0)
    }

    /// Close enough on a sample to stop searching.
    pub fn is_close(&self, metrics: &Metrics, tolerance: f64) -> bool {
        (metrics.rtp - self.target_rtp).abs() < tolerance && metrics.win_rate >= self.min_win_rate
    }
}
