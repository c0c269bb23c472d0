//! Configuration types for reel search and certification.

use serde::{Deserialize, Serialize};

/// Default RTP target.
pub const TARGET_RTP: f64 = 0.95;

/// Default win-rate floor.
pub const MIN_WIN_RATE: f64 = 0.55;

fn default_target_rtp() -> f64 {
    TARGET_RTP
}

fn default_min_win_rate() -> f64 {
    MIN_WIN_RATE
}

fn default_max_steps() -> usize {
    200
}

fn default_spins_per_eval() -> u64 {
    50_000
}

fn default_seed() -> Option<u64> {
    Some(1337)
}

fn default_reel_length_bounds() -> (usize, usize) {
    (8, 14)
}

fn default_run_length_bounds() -> (usize, usize) {
    (2, 4)
}

fn default_initial_temperature() -> f64 {
    1.0
}

fn default_cooling_rate() -> f64 {
    0.98
}

fn default_early_stop_tolerance() -> f64 {
    0.01
}

fn default_bet_amount() -> f64 {
    1.0
}

/// Configuration for the annealing reel search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Expected return per unit bet to aim for.
    #[serde(default = "default_target_rtp")]
    pub target_rtp: f64,
    /// Minimum fraction of winning spins.
    #[serde(default = "default_min_win_rate")]
    pub min_win_rate: f64,
    /// Annealing step budget.
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
    /// Spins sampled per candidate evaluation.
    #[serde(default = "default_spins_per_eval")]
    pub spins_per_eval: u64,
    /// Random seed for reproducibility (`None` draws from entropy).
    #[serde(default = "default_seed")]
    pub seed: Option<u64>,
    /// Inclusive range for initial reel lengths.
    #[serde(default = "default_reel_length_bounds")]
    pub reel_length_bounds: (usize, usize),
    /// Inclusive range for generated symbol runs.
    #[serde(default = "default_run_length_bounds")]
    pub run_length_bounds: (usize, usize),
    /// Starting temperature.
    #[serde(default = "default_initial_temperature")]
    pub initial_temperature: f64,
    /// Temperature multiplier applied after every step.
    #[serde(default = "default_cooling_rate")]
    pub cooling_rate: f64,
    /// Sampled RTP distance that triggers an early stop.
    #[serde(default = "default_early_stop_tolerance")]
    pub early_stop_tolerance: f64,
    /// Relative frequency of each mutation operator.
    #[serde(default)]
    pub mutation_weights: MutationWeights,
    /// Bet used while evaluating candidates.
    #[serde(default = "default_bet_amount")]
    pub bet_amount: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            target_rtp: default_target_rtp(),
            min_win_rate: default_min_win_rate(),
            max_steps: default_max_steps(),
            spins_per_eval: default_spins_per_eval(),
            seed: default_seed(),
            reel_length_bounds: default_reel_length_bounds(),
            run_length_bounds: default_run_length_bounds(),
            initial_temperature: default_initial_temperature(),
            cooling_rate: default_cooling_rate(),
            early_stop_tolerance: default_early_stop_tolerance(),
            mutation_weights: MutationWeights::default(),
            bet_amount: default_bet_amount(),
        }
    }
}

impl SearchConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.target_rtp > 0.0) {
            return Err(ConfigError::InvalidTargetRtp(self.target_rtp));
        }
        if !(0.0..=1.0).contains(&self.min_win_rate) {
            return Err(ConfigError::InvalidWinRate(self.min_win_rate));
        }
        if self.spins_per_eval == 0 {
            return Err(ConfigError::ZeroSpins);
        }
        check_bounds("reel_length_bounds", self.reel_length_bounds)?;
        check_bounds("run_length_bounds", self.run_length_bounds)?;
        if !(self.cooling_rate > 0.0 && self.cooling_rate <= 1.0) {
            return Err(ConfigError::InvalidCoolingRate(self.cooling_rate));
        }
        if !(self.initial_temperature >= 0.0) {
            return Err(ConfigError::InvalidTemperature(self.initial_temperature));
        }
        if !(self.bet_amount > 0.0) {
            return Err(ConfigError::InvalidBet(self.bet_amount));
        }
        self.mutation_weights.validate()
    }
}

fn check_bounds(name: &'static str, bounds: (usize, usize)) -> Result<(), ConfigError> {
    if bounds.0 == 0 || bounds.0 > bounds.1 {
        return Err(ConfigError::InvalidBounds {
            name,
            min: bounds.0,
            max: bounds.1,
        });
    }
    Ok(())
}

/// Relative frequencies of the mutation operators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationWeights {
    /// Swap two positions within one reel.
    pub swap: f64,
    /// Redraw one position from the biased symbol distribution.
    pub resample: f64,
    /// Circularly shift one reel.
    pub rotate: f64,
    /// Extend the symbol at a position into a short run.
    pub reinforce: f64,
    /// Copy a short slice within or between reels.
    pub copy_slice: f64,
}

impl Default for MutationWeights {
    fn default() -> Self {
        Self {
            swap: 0.25,
            resample: 0.25,
            rotate: 0.20,
            reinforce: 0.15,
            copy_slice: 0.15,
        }
    }
}

impl MutationWeights {
    /// Weights in operator order (swap, resample, rotate, reinforce, copy).
    pub fn as_array(&self) -> [f64; 5] {
        [
            self.swap,
            self.resample,
            self.rotate,
            self.reinforce,
            self.copy_slice,
        ]
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let weights = self.as_array();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ConfigError::InvalidMutationWeights);
        }
        if weights.iter().sum::<f64>() <= 0.0 {
            return Err(ConfigError::InvalidMutationWeights);
        }
        Ok(())
    }
}

/// Retry policy for exact certification of search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Allowed exact RTP distance from the target.
    pub tolerance: f64,
    /// Reruns allowed after the first search.
    pub max_attempts: usize,
    /// Step budget multiplier applied on every rerun.
    pub step_growth: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            max_attempts: 8,
            step_growth: 1.5,
        }
    }
}

impl RetryPolicy {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tolerance >= 0.0) {
            return Err(ConfigError::InvalidTolerance(self.tolerance));
        }
        if !(self.step_growth > 0.0) {
            return Err(ConfigError::InvalidStepGrowth(self.step_growth));
        }
        Ok(())
    }
}

/// One stage of the auto-search schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleStage {
    pub steps: usize,
    pub spins_per_eval: u64,
    pub seed: u64,
}

fn default_schedule_tolerance() -> f64 {
    1e-6
}

/// Fixed sequence of increasingly expensive search stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoSchedule {
    pub stages: Vec<ScheduleStage>,
    /// Allowed exact RTP distance for a stage to count as a strict match.
    #[serde(default = "default_schedule_tolerance")]
    pub tolerance: f64,
}

impl Default for AutoSchedule {
    fn default() -> Self {
        let stage = |steps, spins_per_eval, seed| ScheduleStage {
            steps,
            spins_per_eval,
            seed,
        };
        Self {
            stages: vec![
                stage(150, 8_000, 1),
                stage(250, 10_000, 7),
                stage(350, 12_000, 42),
                stage(450, 15_000, 1337),
                stage(600, 20_000, 2024),
            ],
            tolerance: default_schedule_tolerance(),
        }
    }
}

impl AutoSchedule {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stages.is_empty() {
            return Err(ConfigError::EmptySchedule);
        }
        if self.stages.iter().any(|s| s.spins_per_eval == 0) {
            return Err(ConfigError::ZeroSpins);
        }
        if !(self.tolerance >= 0.0) {
            return Err(ConfigError::InvalidTolerance(self.tolerance));
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Target RTP must be positive, got {0}")]
    InvalidTargetRtp(f64),
    #[error("Minimum win rate must lie in [0, 1], got {0}")]
    InvalidWinRate(f64),
    #[error("Spins per evaluation must be non-zero")]
    ZeroSpins,
    #[error("Invalid {name}: ({min}, {max})")]
    InvalidBounds {
        name: &'static str,
        min: usize,
        max: usize,
    },
    #[error("Cooling rate must lie in (0, 1], got {0}")]
    InvalidCoolingRate(f64),
    #[error("Initial temperature must be non-negative, got {0}")]
    InvalidTemperature(f64),
    #[error("Bet amount must be positive, got {0}")]
    InvalidBet(f64),
    #[error("Mutation weights must be non-negative with a positive sum")]
    InvalidMutationWeights,
    #[error("Tolerance must be non-negative, got {0}")]
    InvalidTolerance(f64),
    #[error("Step growth must be positive, got {0}")]
    InvalidStepGrowth(f64),
    #[error("Auto schedule has no stages")]
    EmptySchedule,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SearchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.target_rtp, 0.95);
        assert_eq!(config.min_win_rate, 0.55);
        assert_eq!(config.reel_length_bounds, (8, 14));
        assert!(RetryPolicy::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SearchConfig =
            serde_json::from_str(r#"{"max_steps": 10, "seed": null}"#).unwrap();
        assert_eq!(config.max_steps, 10);
        assert_eq!(config.seed, None);
        assert_eq!(config.spins_per_eval, 50_000);
        assert_eq!(config.mutation_weights, MutationWeights::default());
    }

    #[test]
    fn test_invalid_configs() {
        let bad = SearchConfig {
            spins_per_eval: 0,
            ..Default::default()
        };
        assert_eq!(bad.validate(), Err(ConfigError::ZeroSpins));

        let bad = SearchConfig {
            reel_length_bounds: (10, 5),
            ..Default::default()
        };
        assert!(matches!(
            bad.validate(),
            Err(ConfigError::InvalidBounds {
                name: "reel_length_bounds",
                ..
            })
        ));

        let bad = SearchConfig {
            min_win_rate: 1.5,
            ..Default::default()
        };
        assert_eq!(bad.validate(), Err(ConfigError::InvalidWinRate(1.5)));

        let bad = SearchConfig {
            mutation_weights: MutationWeights {
                swap: 0.0,
                resample: 0.0,
                rotate: 0.0,
                reinforce: 0.0,
                copy_slice: 0.0,
            },
            ..Default::default()
        };
        assert_eq!(bad.validate(), Err(ConfigError::InvalidMutationWeights));

        let bad = SearchConfig {
            bet_amount: 0.0,
            ..Default::default()
        };
        assert_eq!(bad.validate(), Err(ConfigError::InvalidBet(0.0)));
    }

    #[test]
    fn test_default_schedule() {
        let schedule = AutoSchedule::default();
        assert_eq!(schedule.stages.len(), 5);
        assert_eq!(schedule.stages[0].steps, 150);
        assert_eq!(schedule.stages[4].seed, 2024);
        assert!(schedule.validate().is_ok());

        let empty = AutoSchedule {
            stages: Vec::new(),
            ..Default::default()
        };
        assert_eq!(empty.validate(), Err(ConfigError::EmptySchedule));
    }
}
