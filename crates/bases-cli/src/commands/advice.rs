//! Recommendation and alert commands

use std::path::Path;

use anyhow::{Context, Result};
use bases_core::dto::{AlertDto, RecommendationView};
use bases_core::AlertKind;

use super::{open_advisor, print_json, read_account, AppContext};

pub fn cmd_recommend(ctx: &AppContext, account_path: &Path, best: bool) -> Result<()> {
    let account = read_account(account_path)?;
    let advisor = open_advisor(ctx)?;

    let mut recommendations = advisor
        .recommend_all(&account)
        .context("Failed to score recommendations")?;
    if best {
        recommendations.truncate(1);
    }

    if ctx.json {
        return print_json(&recommendations);
    }

    if recommendations.is_empty() {
        println!("No recommendations available.");
        return Ok(());
    }

    println!();
    println!("💡 Recommendations");
    println!("   ─────────────────────────────────────────────────────────────");
    for rec in &recommendations {
        let view = RecommendationView::from(rec);
        println!(
            "   {}. {} (score {:.2}, risk {})",
            rec.priority, view.title, rec.final_score, rec.risk_level
        );
        println!("      {}", view.description);
        println!(
            "      Impact: {}  |  Stability in {} months: {}",
            view.impact, ctx.config.recommendations.projection_months, rec.projected_stability
        );
        println!("      Key: {}", rec.id);
    }
    println!();

    Ok(())
}

pub fn cmd_alerts(ctx: &AppContext, account_path: &Path) -> Result<()> {
    let account = read_account(account_path)?;
    let advisor = open_advisor(ctx)?;

    let alerts = advisor
        .alerts(&account)
        .context("Failed to generate alerts")?;

    if ctx.json {
        let dtos: Vec<AlertDto> = alerts.iter().map(AlertDto::from).collect();
        return print_json(&dtos);
    }

    if alerts.is_empty() {
        println!("✅ No alerts.");
        return Ok(());
    }

    println!();
    println!("🔔 Alerts ({})", alerts.len());
    println!("   ─────────────────────────────────────────────────────────────");
    for alert in &alerts {
        let icon = match alert.kind {
            AlertKind::Risk => "🚨",
            AlertKind::Opportunity => "🌱",
            AlertKind::Informational => "ℹ️ ",
        };
        println!(
            "   {} {} (impact {:.2})",
            icon, alert.title, alert.estimated_impact
        );
        println!("      {}", alert.description);
    }
    println!();

    Ok(())
}
