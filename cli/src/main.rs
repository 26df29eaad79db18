//! Escrow Staking simulator
//!
//! Replays staking scenarios against the reward/penalty engine, quotes
//! hypothetical stakes and inspects saved pool snapshots.

mod quote;
mod report;
mod scenario;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use economics::BonusPolicy;
use owo_colors::OwoColorize;
use stake_storage::{PoolSnapshot, Storage};
use staking::StakingConfig;
use std::path::PathBuf;

use crate::quote::QuoteRequest;
use crate::scenario::Scenario;

#[derive(Parser)]
#[command(name = "stake-sim")]
#[command(about = "Escrow staking reward and penalty simulator", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scenario file against a fresh pool
    Run {
        /// Pool configuration (TOML); defaults apply when omitted
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Scenario file (JSON)
        #[arg(short, long, value_name = "FILE")]
        scenario: PathBuf,

        /// Save the final state as a snapshot in this directory
        #[arg(long, value_name = "DIR")]
        data_dir: Option<PathBuf>,

        /// Snapshot name
        #[arg(long, default_value = "latest")]
        name: String,

        /// Abort on the first rejected step
        #[arg(long)]
        strict: bool,

        /// Print the step outcomes as JSON
        #[arg(long)]
        json: bool,
    },

    /// Bonuses and penalties for a hypothetical stake
    Quote {
        /// Principal in whole tokens
        #[arg(long)]
        tokens: u64,

        /// Committed duration in days
        #[arg(long)]
        days: u64,

        /// Day the stake is closed, counted from its start
        #[arg(long)]
        exit_day: u64,

        /// Reward accrued by the exit day, in whole tokens
        #[arg(long, default_value_t = 0)]
        reward_tokens: u64,

        /// clamp_at_cap or flat_ten_percent
        #[arg(long, default_value = "clamp_at_cap", value_parser = parse_policy)]
        policy: BonusPolicy,

        #[arg(long, default_value_t = 100)]
        early_penalty_percent: u64,

        #[arg(long)]
        json: bool,
    },

    /// Show the totals of a saved snapshot
    Inspect {
        #[arg(long, value_name = "DIR")]
        data_dir: PathBuf,

        #[arg(long, default_value = "latest")]
        name: String,

        /// List open stakes too
        #[arg(long)]
        stakes: bool,

        /// List token balances too
        #[arg(long)]
        holders: bool,

        #[arg(long)]
        json: bool,
    },
}

fn parse_policy(value: &str) -> std::result::Result<BonusPolicy, String> {
    match value {
        "clamp_at_cap" => Ok(BonusPolicy::ClampAtCap),
        "flat_ten_percent" => Ok(BonusPolicy::FlatTenPercent),
        other => Err(format!(
            "unknown bonus policy '{}' (expected clamp_at_cap or flat_ten_percent)",
            other
        )),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            scenario,
            data_dir,
            name,
            strict,
            json,
        } => {
            let config = match config {
                Some(path) => StakingConfig::load_from_file(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => StakingConfig::default(),
            };
            let scenario = Scenario::load(&scenario)?;
            log::info!("Replaying {} steps", scenario.steps.len());

            let replay = scenario.replay(config, strict)?;
            if let Err(e) = replay.pool.check_invariants() {
                log::error!("Pool invariants violated after replay: {}", e);
            }

            let snapshot = PoolSnapshot::new(
                replay.pool.clone(),
                replay.token.clone(),
                replay.end_time,
            );
            if json {
                println!("{}", serde_json::to_string_pretty(&replay.outcomes)?);
            } else {
                report::print_replay(&replay);
                report::print_summary(&snapshot.summary());
            }

            if let Some(dir) = data_dir {
                let storage = Storage::open(&dir)
                    .with_context(|| format!("opening data dir {}", dir.display()))?;
                storage.save_pool(&name, &snapshot)?;
                if !json {
                    println!(
                        "\n{} Saved snapshot '{}' to {}",
                        "✓".green(),
                        name,
                        dir.display()
                    );
                }
            }
        }

        Commands::Quote {
            tokens,
            days,
            exit_day,
            reward_tokens,
            policy,
            early_penalty_percent,
            json,
        } => {
            let quote = quote::quote(QuoteRequest {
                tokens,
                days,
                exit_day,
                reward_tokens,
                policy,
                early_penalty_percent,
            })?;
            if json {
                println!("{}", serde_json::to_string_pretty(&quote)?);
            } else {
                report::print_quote(&quote);
            }
        }

        Commands::Inspect {
            data_dir,
            name,
            stakes,
            holders,
            json,
        } => {
            let storage = Storage::open(&data_dir)?;
            let snapshot = storage.load_pool(&name)?;
            let summary = snapshot.summary();

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
                return Ok(());
            }

            report::print_summary(&summary);
            if stakes {
                println!("\n{}", "Open Stakes".yellow().bold());
                for stake in snapshot.pool.ledger().iter() {
                    println!(
                        "  {}  {}  {} for {} days",
                        stake.id,
                        stake.owner,
                        report::tokens(stake.principal),
                        stake.days_committed
                    );
                }
            }
            if holders {
                report::print_holders(&snapshot);
            }
            println!();
        }
    }

    Ok(())
}
