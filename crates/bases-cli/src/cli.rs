//! CLI argument definitions using clap
//!
//! This module contains all the clap structs for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// SupportingBases - Project your finances and get adaptive recommendations
#[derive(Parser)]
#[command(name = "bases")]
#[command(about = "Financial projection and recommendation engine", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Engine config override (defaults to the data dir override, then built-in values)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Decision history file
    #[arg(long, default_value = "bases-history.json", global = true)]
    pub history: PathBuf,

    /// Session (user) the history belongs to
    #[arg(long, default_value = "default", global = true)]
    pub session: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the versioned investment simulation contract
    Simulate {
        /// Simulation input JSON file
        #[arg(short, long)]
        input: PathBuf,

        /// Correlation id echoed in the response metadata
        #[arg(long)]
        correlation_id: Option<String>,
    },

    /// Show health indicators and phase of an account
    Indicators {
        /// Account JSON file
        #[arg(short, long)]
        account: PathBuf,
    },

    /// Project an account forward month by month
    Project {
        /// Account JSON file
        #[arg(short, long)]
        account: PathBuf,

        /// Number of months to project
        #[arg(short, long, default_value = "12")]
        months: u32,

        /// Monthly income growth (%)
        #[arg(long)]
        growth: Option<f64>,

        /// Monthly expense inflation (%)
        #[arg(long)]
        inflation: Option<f64>,

        /// JSON file with an ordered list of strategies (applied after --growth/--inflation)
        #[arg(long)]
        strategies: Option<PathBuf>,
    },

    /// Compare alternative accounts against a baseline (balance variance)
    Compare {
        /// Baseline account JSON file
        #[arg(short, long)]
        baseline: PathBuf,

        /// JSON file with a list of named alternative accounts
        #[arg(short, long)]
        scenarios: PathBuf,

        /// Number of months to project
        #[arg(short, long, default_value = "1")]
        months: u32,
    },

    /// Rank strategy bundles by projected stability score
    Rank {
        /// Account JSON file
        #[arg(short, long)]
        account: PathBuf,

        /// JSON file with a list of named strategy bundles
        #[arg(short, long)]
        bundles: PathBuf,

        /// Number of months to project
        #[arg(short, long, default_value = "12")]
        months: u32,
    },

    /// Score the recommendation catalog for an account
    Recommend {
        /// Account JSON file
        #[arg(short, long)]
        account: PathBuf,

        /// Only show the best recommendation
        #[arg(long)]
        best: bool,
    },

    /// Show alerts for an account
    Alerts {
        /// Account JSON file
        #[arg(short, long)]
        account: PathBuf,
    },

    /// Record a decision in the history
    Record {
        /// Account JSON file (its current snapshot is stored with the decision)
        #[arg(short, long)]
        account: PathBuf,

        /// Decision kind: simulation, evaluation, action_taken
        #[arg(short, long, default_value = "simulation")]
        kind: String,

        /// What was decided
        #[arg(short, long)]
        description: String,

        /// Recommendation or alert key the decision relates to
        #[arg(long)]
        key: Option<String>,

        /// Observed score
        #[arg(long, requires = "impact")]
        score: Option<f64>,

        /// Observed impact (%), used to bias future scores
        #[arg(long)]
        impact: Option<f64>,
    },

    /// List recorded decisions, most recent first
    History {
        /// Filter by kind: simulation, evaluation, action_taken
        #[arg(short, long)]
        kind: Option<String>,

        /// Show aggregated insights instead of decisions
        #[arg(long)]
        insights: bool,
    },

    /// Compute simplified stability metrics from raw income/expense lists
    Metrics {
        /// Metrics input JSON file
        #[arg(short, long)]
        input: PathBuf,
    },
}
