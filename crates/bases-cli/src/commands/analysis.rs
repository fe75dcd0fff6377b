//! Account analysis commands (indicators, project, compare, rank)

use std::path::Path;

use anyhow::{Context, Result};
use bases_core::scenarios::{NamedAccount, ScenarioEvaluator, StrategyBundle};
use bases_core::snapshot::{classify_phase, compression_index, minimum_structural_goal, stress_test};
use bases_core::{project_months, ProjectionStrategy};
use serde::Serialize;

use super::{fmt_months, fmt_pct, print_json, read_account, read_json, AppContext};

/// Income loss used for the stress test line
const STRESS_LOSS_PCT: f64 = 30.0;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IndicatorsReport {
    #[serde(flatten)]
    indicators: bases_core::HealthIndicators,
    phase: bases_core::Phase,
    collapsing: bool,
    minimum_structural_goal: f64,
    compression_index: f64,
    stress_test: bases_core::snapshot::StressTestResult,
}

pub fn cmd_indicators(ctx: &AppContext, account_path: &Path) -> Result<()> {
    let account = read_account(account_path)?;
    let snapshot = account.snapshot_now();
    let indicators = snapshot.indicators();

    let report = IndicatorsReport {
        indicators,
        phase: classify_phase(&indicators),
        collapsing: account.is_collapsing(),
        minimum_structural_goal: minimum_structural_goal(&snapshot),
        compression_index: compression_index(&snapshot),
        stress_test: stress_test(&snapshot, STRESS_LOSS_PCT),
    };

    if ctx.json {
        return print_json(&report);
    }

    println!();
    println!("📊 Financial Health");
    println!("   ─────────────────────────────────────────────");
    println!("   Income:            R$ {:.2}", snapshot.income());
    println!("   Expenses:          R$ {:.2}", snapshot.total_expenses());
    println!("   Reserves:          R$ {:.2}", snapshot.reserves());
    println!();
    println!("   Cash flow:         R$ {:.2}", indicators.cash_flow);
    println!("   Stability score:   {} / 1000", indicators.stability_score);
    println!("   Income committed:  {}", fmt_pct(indicators.income_commitment_pct));
    println!("   Reserve months:    {}", fmt_months(indicators.reserve_months));
    println!("   Phase:             {}", report.phase);
    println!();
    println!(
        "   Minimum structural goal: R$ {:.2}",
        report.minimum_structural_goal
    );
    println!(
        "   Compression index:       {}",
        fmt_months(report.compression_index)
    );
    if report.stress_test.can_withstand {
        println!("   ✅ Withstands a {}% income loss", STRESS_LOSS_PCT);
    } else {
        println!(
            "   ⚠️  A {}% income loss leaves a R$ {:.2} monthly deficit",
            STRESS_LOSS_PCT, report.stress_test.deficit
        );
    }
    if report.collapsing {
        println!("   🚨 Spending exceeds income with under a month of reserves");
    }
    println!();

    Ok(())
}

pub fn cmd_project(
    ctx: &AppContext,
    account_path: &Path,
    months: u32,
    growth: Option<f64>,
    inflation: Option<f64>,
    strategies_path: Option<&Path>,
) -> Result<()> {
    let account = read_account(account_path)?;

    let mut strategies = Vec::new();
    if let Some(pct) = growth {
        strategies.push(ProjectionStrategy::income_growth(pct).context("Invalid --growth")?);
    }
    if let Some(pct) = inflation {
        strategies
            .push(ProjectionStrategy::expense_inflation(pct).context("Invalid --inflation")?);
    }
    if let Some(path) = strategies_path {
        let extra: Vec<ProjectionStrategy> = read_json(path)?;
        strategies.extend(extra);
    }

    let projected =
        project_months(&account, months, &strategies).context("Projection failed")?;

    if ctx.json {
        return print_json(&projected);
    }

    println!();
    println!("📈 Projection ({} months)", months);
    for strategy in &strategies {
        println!("   • {}", strategy);
    }
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {:>5}  {:>12}  {:>12}  {:>12}  {:>6}",
        "Month", "Income", "Expenses", "Reserves", "Score"
    );

    for (i, snapshot) in projected.iter().enumerate() {
        println!(
            "   {:>5}  {:>12.2}  {:>12.2}  {:>12.2}  {:>6}",
            i + 1,
            snapshot.income(),
            snapshot.total_expenses(),
            snapshot.reserves(),
            snapshot.indicators().stability_score
        );
    }
    println!();

    Ok(())
}

pub fn cmd_compare(
    ctx: &AppContext,
    baseline_path: &Path,
    scenarios_path: &Path,
    months: u32,
) -> Result<()> {
    let baseline = read_account(baseline_path)?;
    let scenarios: Vec<NamedAccount> = read_json(scenarios_path)?;

    let evaluator = ScenarioEvaluator::new(ctx.config.scenarios.clone());
    let results = evaluator
        .compare_balances(&baseline, &scenarios, months)
        .context("Scenario comparison failed")?;

    if ctx.json {
        return print_json(&results);
    }

    println!();
    println!("⚖️  Scenarios vs baseline (R$ {:.2})", baseline.total_reserves());
    println!("   ─────────────────────────────────────────────────────────────");
    for result in &results {
        println!(
            "   {} [{}] variance R$ {:.2}",
            result.name,
            result.classification,
            result.variance().unwrap_or_default()
        );
        println!("      {}", result.description);
    }
    println!();

    Ok(())
}

pub fn cmd_rank(
    ctx: &AppContext,
    account_path: &Path,
    bundles_path: &Path,
    months: u32,
) -> Result<()> {
    let account = read_account(account_path)?;
    let bundles: Vec<StrategyBundle> = read_json(bundles_path)?;

    let evaluator = ScenarioEvaluator::new(ctx.config.scenarios.clone());
    let ranked = evaluator
        .rank_by_stability(&account, &bundles, months)
        .context("Scenario ranking failed")?;

    if ctx.json {
        return print_json(&ranked);
    }

    println!();
    println!("🏆 Strategies by stability after {} months", months);
    println!("   ─────────────────────────────────────────────────────────────");
    for (i, result) in ranked.iter().enumerate() {
        println!(
            "   {}. {} - score {} [{}]",
            i + 1,
            result.name,
            result.final_score().unwrap_or_default(),
            result.classification
        );
        println!("      {}", result.description);
    }
    println!();

    Ok(())
}
