//! Exact certification of search results.
//!
//! Sampled metrics are noisy, so a searched candidate is re-scored by full
//! enumeration before it is trusted. [`certify`] reruns the search with a
//! growing budget until the exact metrics meet the targets; [`auto_search`]
//! runs a fixed schedule of searches and keeps the best exactly scored one.

use log::{info, warn};
use rayon::prelude::*;
use serde::Serialize;

use crate::compute::search::{Objective, ReelSearch, SearchError};
use crate::schema::{
    AutoSchedule, Candidate, Metrics, RetryPolicy, ScheduleStage, SearchConfig, ValidationArtifact,
};

use super::{ExactEvaluator, SlotMachine};

/// A searched candidate together with its exact metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Certification {
    /// Best candidate of the last search (metrics are sampled).
    pub candidate: Candidate,
    /// Exact metrics of the candidate's reels.
    pub exact: Metrics,
    /// Reruns performed after the first search.
    pub attempts: usize,
    /// Whether the exact metrics meet the targets.
    pub satisfied: bool,
}

impl Certification {
    /// Artifact for the certified reels.
    pub fn to_artifact(&self) -> ValidationArtifact {
        ValidationArtifact::new(self.candidate.reels.clone(), &self.exact)
    }
}

/// Result of an auto-schedule search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AutoSearchOutcome {
    /// Index of the selected stage.
    pub stage_index: usize,
    pub stage: ScheduleStage,
    pub candidate: Candidate,
    pub exact: Metrics,
    pub satisfied: bool,
}

impl AutoSearchOutcome {
    pub fn to_artifact(&self) -> ValidationArtifact {
        ValidationArtifact::new(self.candidate.reels.clone(), &self.exact)
    }
}

/// Search, then exactly score the best candidate.
fn search_and_score(config: SearchConfig) -> Result<(Candidate, Metrics), SearchError> {
    let bet_amount = config.bet_amount;
    let candidate = ReelSearch::new(config)?.search()?;
    let machine = SlotMachine::new(candidate.reels.clone(), bet_amount)?;
    let exact = ExactEvaluator::new(&machine).run()?;
    Ok((candidate, exact))
}

/// Search and certify, rerunning with more steps and a shifted seed while
/// the exact metrics miss the targets.
///
/// Unmet targets after the last rerun are reported through
/// [`Certification::satisfied`], not as an error.
pub fn certify(config: &SearchConfig, policy: &RetryPolicy) -> Result<Certification, SearchError> {
    policy.validate()?;
    let meets =
        |exact: &Metrics| exact.meets(config.target_rtp, config.min_win_rate, policy.tolerance);

    let (mut candidate, mut exact) = search_and_score(config.clone())?;
    info!(
        "Attempt 0: exact rtp {:.6}, win rate {:.4}",
        exact.rtp, exact.win_rate
    );

    let mut attempts = 0;
    let mut steps = config.max_steps;
    while !meets(&exact) && attempts < policy.max_attempts {
        attempts += 1;
        steps = (steps as f64 * policy.step_growth) as usize;
        let retry = SearchConfig {
            max_steps: steps,
            seed: config.seed.map(|seed| seed.wrapping_add(attempts as u64)),
            ..config.clone()
        };
        (candidate, exact) = search_and_score(retry)?;
        info!(
            "Attempt {}: {} steps, exact rtp {:.6}, win rate {:.4}",
            attempts, steps, exact.rtp, exact.win_rate
        );
    }

    let satisfied = meets(&exact);
    if !satisfied {
        warn!(
            "Targets not met after {} reruns: exact rtp {:.6}, win rate {:.4}",
            attempts, exact.rtp, exact.win_rate
        );
    }

    Ok(Certification {
        candidate,
        exact,
        attempts,
        satisfied,
    })
}

/// Run every schedule stage and select a result.
///
/// Stages run in parallel. Selection follows schedule order: the first
/// stage meeting the targets wins, otherwise the stage with the smallest
/// validation gap (earliest on ties).
pub fn auto_search(
    schedule: &AutoSchedule,
    base: &SearchConfig,
) -> Result<AutoSearchOutcome, SearchError> {
    schedule.validate()?;
    let objective = Objective::from_config(base);

    let mut results: Vec<(Candidate, Metrics)> = schedule
        .stages
        .par_iter()
        .map(|stage| {
            search_and_score(SearchConfig {
                max_steps: stage.steps,
                spins_per_eval: stage.spins_per_eval,
                seed: Some(stage.seed),
                ..base.clone()
            })
        })
        .collect::<Result<_, _>>()?;

    let meets =
        |exact: &Metrics| exact.meets(base.target_rtp, base.min_win_rate, schedule.tolerance);

    let strict = results.iter().position(|(_, exact)| meets(exact));
    let stage_index = strict.unwrap_or_else(|| {
        let mut best = 0;
        for (i, (_, exact)) in results.iter().enumerate().skip(1) {
            if objective.validation_gap(exact) < objective.validation_gap(&results[best].1) {
                best = i;
            }
        }
        best
    });

    let stage = schedule.stages[stage_index];
    let (candidate, exact) = results.swap_remove(stage_index);
    let satisfied = strict.is_some();

    if satisfied {
        info!(
            "Stage {} ({} steps, seed {}) meets targets: rtp {:.6}, win rate {:.4}",
            stage_index, stage.steps, stage.seed, exact.rtp, exact.win_rate
        );
    } else {
        warn!(
            "No stage met targets; closest is stage {}: rtp {:.6}, win rate {:.4}",
            stage_index, exact.rtp, exact.win_rate
        );
    }

    Ok(AutoSearchOutcome {
        stage_index,
        stage,
        candidate,
        exact,
        satisfied,
    })
}
