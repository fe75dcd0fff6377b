//! SupportingBases CLI - Financial projection and recommendation engine
//!
//! Usage:
//!   bases indicators --account account.json         Health indicators and phase
//!   bases project --account account.json -m 24       Month-by-month projection
//!   bases recommend --account account.json           Scored recommendation catalog
//!   bases alerts --account account.json              Alerts, risks first
//!   bases simulate --input request.json              Versioned simulation contract

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // Logs go to stderr so --json output stays parseable
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    let config = commands::load_config(cli.config.as_deref())?;
    let ctx = commands::AppContext {
        config,
        history_path: cli.history,
        session: cli.session,
        json: cli.json,
    };

    match cli.command {
        Commands::Simulate {
            input,
            correlation_id,
        } => commands::cmd_simulate(&ctx, &input, correlation_id),
        Commands::Indicators { account } => commands::cmd_indicators(&ctx, &account),
        Commands::Project {
            account,
            months,
            growth,
            inflation,
            strategies,
        } => commands::cmd_project(
            &ctx,
            &account,
            months,
            growth,
            inflation,
            strategies.as_deref(),
        ),
        Commands::Compare {
            baseline,
            scenarios,
            months,
        } => commands::cmd_compare(&ctx, &baseline, &scenarios, months),
        Commands::Rank {
            account,
            bundles,
            months,
        } => commands::cmd_rank(&ctx, &account, &bundles, months),
        Commands::Recommend { account, best } => commands::cmd_recommend(&ctx, &account, best),
        Commands::Alerts { account } => commands::cmd_alerts(&ctx, &account),
        Commands::Record {
            account,
            kind,
            description,
            key,
            score,
            impact,
        } => commands::cmd_record(
            &ctx,
            &account,
            &kind,
            &description,
            key.as_deref(),
            score,
            impact,
        ),
        Commands::History { kind, insights } => {
            commands::cmd_history(&ctx, kind.as_deref(), insights)
        }
        Commands::Metrics { input } => commands::cmd_metrics(&ctx, &input),
    }
}
