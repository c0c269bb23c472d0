//! Slot Tuner CLI - Search, certify and inspect reel configurations.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use slot_tuner::{
    compute::{ExactEvaluator, Simulator, SlotMachine, auto_search, certify},
    schema::{AutoSchedule, ReelsFile, RetryPolicy, SearchConfig, ValidationArtifact},
};

const DEFAULT_STEPS: usize = 800;
const DEFAULT_EVAL_SPINS: u64 = 50_000;
const DEFAULT_SEED: u64 = 42;

#[derive(Parser, Debug)]
#[command(name = "slot-tuner")]
#[command(about = "Search for 3-reel configurations that hit a target RTP and win rate")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the annealing search, certify it exactly and write the artifact
    Search {
        /// Search steps (overrides the config file)
        #[arg(long)]
        steps: Option<usize>,
        /// Spins per candidate evaluation (overrides the config file)
        #[arg(long)]
        eval_spins: Option<u64>,
        /// Random seed (overrides the config file)
        #[arg(long)]
        seed: Option<u64>,
        /// Search configuration JSON
        #[arg(long)]
        config: Option<PathBuf>,
        /// Reruns allowed when the exact metrics miss the targets
        #[arg(long, default_value_t = 8)]
        max_attempts: usize,
        #[arg(long, default_value = "reels_config.json")]
        out: PathBuf,
    },
    /// Run the fixed auto schedule and write the best certified artifact
    Auto {
        /// Base search configuration JSON
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, default_value = "reels_config.json")]
        out: PathBuf,
    },
    /// Estimate metrics for saved reels by sampling
    Simulate {
        /// Artifact or bare reels JSON
        #[arg(long)]
        reels: PathBuf,
        #[arg(long, default_value_t = 100_000)]
        spins: u64,
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
        #[arg(long, default_value_t = 1.0)]
        bet: f64,
    },
    /// Compute exact metrics for saved reels
    Exact {
        /// Artifact or bare reels JSON
        #[arg(long)]
        reels: PathBuf,
        #[arg(long, default_value_t = 1.0)]
        bet: f64,
    },
    /// Spin saved reels once and show the matched patterns
    Spin {
        /// Artifact or bare reels JSON
        #[arg(long)]
        reels: PathBuf,
        #[arg(long, default_value_t = 1.0)]
        bet: f64,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the default search configuration
    Example,
}

fn main() -> Result<()> {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Search {
            steps,
            eval_spins,
            seed,
            config,
            max_attempts,
            out,
        } => {
            let mut config = match config {
                Some(path) => load_config(&path)?,
                None => SearchConfig {
                    max_steps: DEFAULT_STEPS,
                    spins_per_eval: DEFAULT_EVAL_SPINS,
                    seed: Some(DEFAULT_SEED),
                    ..Default::default()
                },
            };
            if let Some(steps) = steps {
                config.max_steps = steps;
            }
            if let Some(eval_spins) = eval_spins {
                config.spins_per_eval = eval_spins;
            }
            if let Some(seed) = seed {
                config.seed = Some(seed);
            }
            let policy = RetryPolicy {
                max_attempts,
                ..Default::default()
            };
            run_search(&config, &policy, &out)
        }
        Commands::Auto { config, out } => {
            let config = match config {
                Some(path) => load_config(&path)?,
                None => SearchConfig::default(),
            };
            run_auto(&config, &out)
        }
        Commands::Simulate {
            reels,
            spins,
            seed,
            bet,
        } => {
            let machine = load_machine(&reels, bet)?;
            let metrics = Simulator::new(&machine, seed).run(spins)?;
            print_json(&metrics)
        }
        Commands::Exact { reels, bet } => {
            let machine = load_machine(&reels, bet)?;
            let metrics = ExactEvaluator::new(&machine).run()?;
            print_json(&metrics)
        }
        Commands::Spin { reels, bet, seed } => {
            let machine = load_machine(&reels, bet)?;
            let mut simulator = match seed {
                Some(seed) => Simulator::new(&machine, seed),
                None => Simulator::from_entropy(&machine),
            };
            let outcome = simulator.spin()?;
            print_json(&outcome)
        }
        Commands::Example => print_example_config(),
    }
}

fn run_search(config: &SearchConfig, policy: &RetryPolicy, out: &Path) -> Result<()> {
    println!("Slot Tuner Search");
    println!("=================");
    println!(
        "Steps: {}, spins/eval: {}, seed: {:?}",
        config.max_steps, config.spins_per_eval, config.seed
    );
    println!(
        "Targets: rtp {}, win rate >= {}",
        config.target_rtp, config.min_win_rate
    );
    println!();

    let start = Instant::now();
    let certification = certify(config, policy)?;
    let artifact = certification.to_artifact();
    save_artifact(&artifact, out)?;

    println!("Best candidate saved to: {}", out.display());
    println!("Reel lengths: {:?}", certification.candidate.reels.lengths());
    println!("Reruns: {}", certification.attempts);
    println!("RTP: {}", certification.exact.rtp);
    println!("Win rate: {}", certification.exact.win_rate);
    println!("Time: {:.2}s", start.elapsed().as_secs_f32());

    if !certification.satisfied {
        eprintln!(
            "Warning: constraints not met within tolerance; consider increasing steps/spins."
        );
        std::process::exit(1);
    }
    Ok(())
}

fn run_auto(base: &SearchConfig, out: &Path) -> Result<()> {
    let schedule = AutoSchedule::default();
    println!("Slot Tuner Auto Search");
    println!("======================");
    println!("Stages: {}", schedule.stages.len());
    println!();

    let start = Instant::now();
    let outcome = auto_search(&schedule, base)?;
    save_artifact(&outcome.to_artifact(), out)?;

    println!("Best candidate saved to: {}", out.display());
    println!(
        "Stage: {} ({} steps, {} spins/eval, seed {})",
        outcome.stage_index, outcome.stage.steps, outcome.stage.spins_per_eval, outcome.stage.seed
    );
    println!("RTP: {}", outcome.exact.rtp);
    println!("Win rate: {}", outcome.exact.win_rate);
    println!("Time: {:.2}s", start.elapsed().as_secs_f32());

    if !outcome.satisfied {
        eprintln!("Warning: no schedule stage met the targets; saved the closest result.");
        std::process::exit(1);
    }
    Ok(())
}

fn load_config(path: &Path) -> Result<SearchConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: SearchConfig = serde_json::from_str(&content)
        .with_context(|| format!("parsing config {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

fn load_machine(path: &Path, bet: f64) -> Result<SlotMachine> {
    let reels = ReelsFile::load_reels(path)
        .with_context(|| format!("loading reels from {}", path.display()))?;
    Ok(SlotMachine::new(reels, bet)?)
}

fn save_artifact(artifact: &ValidationArtifact, path: &Path) -> Result<()> {
    artifact
        .save(path)
        .with_context(|| format!("writing artifact {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_example_config() -> Result<()> {
    print_json(&SearchConfig::default())
}
