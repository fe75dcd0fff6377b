//! Simulation contract and metrics commands

use std::path::Path;

use anyhow::{Context, Result};
use bases_core::contract::{self, SimulationInput};
use bases_core::metrics::{self, Metric, MetricsInput};

use super::{fmt_months, print_json, read_json, AppContext};

pub fn cmd_simulate(
    ctx: &AppContext,
    input_path: &Path,
    correlation_id: Option<String>,
) -> Result<()> {
    let input: SimulationInput = read_json(input_path)?;
    let response = contract::simulate(&ctx.config.contract, &input, correlation_id)
        .context("Simulation failed")?;

    if ctx.json {
        return print_json(&response);
    }

    println!();
    println!(
        "🔮 Simulation (contract v{})",
        response.metadata.contract_version
    );
    println!("   ─────────────────────────────────────────────────────────────");
    for scenario in &response.scenarios {
        println!(
            "   {:<12} {:>5.2}% a.a.  R$ {:>14.2}  ({:+.2}%)",
            scenario.label, scenario.annual_rate, scenario.projected_wealth, scenario.return_pct
        );
    }

    println!();
    for rec in &response.recommendations {
        println!(
            "   💡 {} (viability {:.0}%)",
            rec.title,
            rec.viability_score * 100.0
        );
        println!("      {}", rec.description);
    }

    if !response.alerts.is_empty() {
        println!();
        for alert in &response.alerts {
            println!("   ⚠️  {}: {}", alert.title, alert.message);
        }
    }
    println!();

    Ok(())
}

pub fn cmd_metrics(ctx: &AppContext, input_path: &Path) -> Result<()> {
    let input: MetricsInput = read_json(input_path)?;
    let result = metrics::calculate_all_metrics(&input).context("Failed to compute metrics")?;

    if ctx.json {
        return print_json(&result);
    }

    let print = |metric: &Metric| {
        println!("   {:<36} {:>12}", metric.label, fmt_months(metric.value));
        println!("      {}", metric.description);
    };

    println!();
    println!("📐 Stability Metrics");
    println!("   ─────────────────────────────────────────────────────────────");
    print(&result.minimum_structural_goal);
    print(&result.volatility_adjusted_revenue);
    print(&result.compression_index);
    print(&result.survival_margin);
    print(&result.structural_elasticity);
    println!();

    Ok(())
}
