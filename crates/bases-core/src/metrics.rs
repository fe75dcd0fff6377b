//! Simplified stability metrics
//!
//! A flat entrypoint over raw income and expense lists, without the Account model.
//! Incomes are treated as a monthly series so their volatility can be penalised.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Conservative volatility penalty (k-factor)
const RISK_COEFFICIENT: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IncomeEntry {
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpensePriority {
    #[serde(alias = "essencial")]
    Essential,
    #[serde(alias = "nao_essencial")]
    NonEssential,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpenseEntry {
    pub amount: f64,
    pub priority: ExpensePriority,
}

/// Raw input. Every field is required but optional on the wire so that all
/// missing fields can be reported at once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsInput {
    pub incomes: Option<Vec<IncomeEntry>>,
    pub expenses: Option<Vec<ExpenseEntry>>,
    #[serde(alias = "liquidAssets")]
    pub liquid_assets: Option<f64>,
}

/// A labelled metric value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub value: f64,
    pub label: String,
    pub description: String,
}

impl Metric {
    fn new(value: f64, label: &str, description: &str) -> Self {
        Self {
            value,
            label: label.to_string(),
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityMetrics {
    /// Sum of essential expenses
    #[serde(rename = "mme")]
    pub minimum_structural_goal: Metric,
    /// Mean income minus 1.5 standard deviations
    #[serde(rename = "rav")]
    pub volatility_adjusted_revenue: Metric,
    /// Goal over adjusted revenue; above 1.0 the structure is collapsing
    #[serde(rename = "icf")]
    pub compression_index: Metric,
    /// Months the liquid assets cover the goal
    #[serde(rename = "msd")]
    pub survival_margin: Metric,
    /// Non-essential share of all expenses (0 to 1)
    #[serde(rename = "ee")]
    pub structural_elasticity: Metric,
}

pub fn calculate_all_metrics(input: &MetricsInput) -> Result<StabilityMetrics> {
    let mut missing = Vec::new();
    if input.incomes.is_none() {
        missing.push("incomes".to_string());
    }
    if input.expenses.is_none() {
        missing.push("expenses".to_string());
    }
    if input.liquid_assets.is_none() {
        missing.push("liquid_assets".to_string());
    }

    let (Some(incomes), Some(expenses), Some(liquid_assets)) =
        (&input.incomes, &input.expenses, input.liquid_assets)
    else {
        return Err(Error::MissingFields(missing));
    };

    let goal: f64 = expenses
        .iter()
        .filter(|e| e.priority == ExpensePriority::Essential)
        .map(|e| e.amount)
        .sum();

    let amounts: Vec<f64> = incomes.iter().map(|i| i.amount).collect();
    let adjusted_revenue = mean(&amounts) - RISK_COEFFICIENT * std_dev(&amounts);

    let compression = if adjusted_revenue <= 0.0 {
        if goal > 0.0 {
            f64::INFINITY
        } else {
            1.0
        }
    } else {
        goal / adjusted_revenue
    };

    let survival = if goal > 0.0 {
        liquid_assets / goal
    } else {
        f64::INFINITY
    };

    let total: f64 = expenses.iter().map(|e| e.amount).sum();
    let non_essential: f64 = expenses
        .iter()
        .filter(|e| e.priority == ExpensePriority::NonEssential)
        .map(|e| e.amount)
        .sum();
    let elasticity = if total > 0.0 {
        non_essential / total
    } else {
        0.0
    };

    tracing::debug!(goal, adjusted_revenue, compression, "Stability metrics computed");

    Ok(StabilityMetrics {
        minimum_structural_goal: Metric::new(
            goal,
            "Meta Mínima Estrutural",
            "Custo mensal mínimo para sobrevivência estrutural.",
        ),
        volatility_adjusted_revenue: Metric::new(
            adjusted_revenue,
            "Receita Ajustada por Volatilidade",
            "Estimativa de receita líquida em cenário pessimista.",
        ),
        compression_index: Metric::new(
            compression,
            "Índice de Compressão Financeira",
            "Pressão sobre a estrutura. Acima de 1.0 = colapso iminente.",
        ),
        survival_margin: Metric::new(
            survival,
            "Margem de Sobrevivência Dinâmica",
            "Meses de sobrevivência garantida sem nenhuma receita.",
        ),
        structural_elasticity: Metric::new(
            elasticity,
            "Elasticidade Estrutural",
            "Capacidade de cortar custos não essenciais (0 a 1).",
        ),
    })
}

fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Population standard deviation; 0 for fewer than two points
fn std_dev(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    let m = mean(data);
    let squares: Vec<f64> = data.iter().map(|v| (v - m).powi(2)).collect();
    mean(&squares).sqrt()
}
