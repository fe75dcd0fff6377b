//! Decision history commands (record, history)

use std::path::Path;

use anyhow::{Context, Result};
use bases_core::history::{Decision, DecisionKind, DecisionResult, HistoryRepository};

use super::{open_history, print_json, read_account, AppContext};

pub fn cmd_record(
    ctx: &AppContext,
    account_path: &Path,
    kind: &str,
    description: &str,
    key: Option<&str>,
    score: Option<f64>,
    impact: Option<f64>,
) -> Result<()> {
    let kind: DecisionKind = kind.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let account = read_account(account_path)?;

    let mut decision = Decision::new(kind, description, account.snapshot_now());
    if let Some(key) = key {
        decision = decision.with_key(key);
    }
    if let Some(estimated_impact) = impact {
        decision = decision.with_result(DecisionResult {
            score: score.unwrap_or_default(),
            estimated_impact,
        });
    }

    let id = decision.id.clone();
    let history = open_history(ctx);
    history
        .record(&ctx.session, decision)
        .context("Failed to record decision")?;

    if ctx.json {
        return print_json(&serde_json::json!({ "id": id }));
    }

    println!("✅ Recorded {} decision {}", kind, id);
    Ok(())
}

pub fn cmd_history(ctx: &AppContext, kind: Option<&str>, insights: bool) -> Result<()> {
    let history = open_history(ctx);

    if insights {
        let insights = history
            .generate_insights(&ctx.session)
            .context("Failed to aggregate insights")?;
        let list: Vec<_> = insights.iter().collect();

        if ctx.json {
            return print_json(&list);
        }
        if list.is_empty() {
            println!("No insights yet. Record simulations with --key and --impact.");
            return Ok(());
        }

        println!();
        println!("🧠 Insights ({})", ctx.session);
        println!("   ─────────────────────────────────────────────");
        for insight in list {
            println!(
                "   {:<32} avg impact {:>7.2}%  ({} samples)",
                insight.key, insight.average_impact, insight.samples
            );
        }
        println!();
        return Ok(());
    }

    let decisions = match kind {
        Some(kind) => {
            let kind: DecisionKind = kind.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            history.list_by_kind(&ctx.session, kind)
        }
        None => history.list_all(&ctx.session),
    }
    .context("Failed to list decisions")?;

    if ctx.json {
        return print_json(&decisions);
    }

    if decisions.is_empty() {
        println!("No decisions recorded for session '{}'.", ctx.session);
        return Ok(());
    }

    println!();
    println!("📜 Decisions ({})", ctx.session);
    println!("   ─────────────────────────────────────────────────────────────");
    for decision in &decisions {
        println!(
            "   {}  {:<12} {}",
            decision.timestamp.format("%Y-%m-%d %H:%M"),
            decision.kind.as_str(),
            decision.description
        );
        if let Some(key) = &decision.key {
            println!("      key: {}", key);
        }
        if let Some(result) = decision.result {
            println!(
                "      score {:.2}, impact {:.2}",
                result.score, result.estimated_impact
            );
        }
    }
    println!();

    Ok(())
}
