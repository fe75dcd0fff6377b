//! Snapshot engine
//!
//! Pure functions over expenses and snapshots:
//! - grouping expenses into per-category totals
//! - deriving health indicators (cash flow, stability score, reserve coverage)
//! - structural checks (minimum goal, income stress test, compression index)
//! - classifying the user's phase from their indicators

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{Expense, ExpenseTotals, HealthIndicators, Snapshot};

/// Maximum stability score
pub const MAX_STABILITY_SCORE: u32 = 1000;

/// Months of essential expenses that earn full reserve points
const TARGET_RESERVE_MONTHS: f64 = 6.0;
const CASH_FLOW_WEIGHT: f64 = 0.4;
const RESERVE_WEIGHT: f64 = 0.6;

/// Safety margin applied on top of fixed costs for the minimum structural goal
const STRUCTURAL_SAFETY_MARGIN: f64 = 0.10;

/// Sum expense amounts per category. Categories absent from the input are 0.
pub fn group_expenses(expenses: &[Expense]) -> ExpenseTotals {
    expenses
        .iter()
        .fold(ExpenseTotals::default(), |mut totals, e| {
            totals.add(e.category(), e.amount());
            totals
        })
}

/// Compute the health indicators of a snapshot.
///
/// Division by zero never fails: without essential expenses the reserve coverage is
/// `+inf`, and without income the commitment is `+inf` and the stability score is 0.
pub fn compute_indicators(snapshot: &Snapshot) -> HealthIndicators {
    let income = snapshot.income();
    let totals = snapshot.expenses();
    let cash_flow = income - totals.total();
    let essential = totals.essential();

    let reserve_months = if essential > 0.0 {
        snapshot.reserves() / essential
    } else {
        f64::INFINITY
    };

    if income <= 0.0 {
        return HealthIndicators {
            cash_flow,
            stability_score: 0,
            income_commitment_pct: f64::INFINITY,
            reserve_months,
        };
    }

    let income_commitment_pct = essential / income * 100.0;

    let max = f64::from(MAX_STABILITY_SCORE);
    let cash_flow_points = clamp_points(cash_flow / income * max);
    let reserve_points = clamp_points((reserve_months / TARGET_RESERVE_MONTHS).min(1.0) * max);
    let blended = (CASH_FLOW_WEIGHT * cash_flow_points + RESERVE_WEIGHT * reserve_points).round();

    HealthIndicators {
        cash_flow,
        stability_score: clamp_points(blended) as u32,
        income_commitment_pct,
        reserve_months,
    }
}

fn clamp_points(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, f64::from(MAX_STABILITY_SCORE))
}

/// Minimum monthly amount needed to keep the fixed structure running
pub fn minimum_structural_goal(snapshot: &Snapshot) -> f64 {
    snapshot.expenses().fixed_structural * (1.0 + STRUCTURAL_SAFETY_MARGIN)
}

/// Outcome of an income stress test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StressTestResult {
    pub can_withstand: bool,
    /// Monthly shortfall when the reduced income does not cover expenses
    pub deficit: f64,
}

/// Check whether expenses are still covered after losing `loss_pct` percent of income
pub fn stress_test(snapshot: &Snapshot, loss_pct: f64) -> StressTestResult {
    let reduced_income = snapshot.income() * (1.0 - loss_pct / 100.0);
    let expenses = snapshot.total_expenses();
    let can_withstand = reduced_income >= expenses;

    StressTestResult {
        can_withstand,
        deficit: if can_withstand {
            0.0
        } else {
            expenses - reduced_income
        },
    }
}

/// How far total spending can be compressed before hitting fixed obligations.
/// `+inf` when there are no fixed costs.
pub fn compression_index(snapshot: &Snapshot) -> f64 {
    let fixed = snapshot.expenses().fixed_structural;
    if fixed == 0.0 {
        return f64::INFINITY;
    }
    snapshot.total_expenses() / fixed
}

/// Stage of the user's financial journey
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Focus on leaving the risk zone
    Survival,
    /// Building reserves
    Stabilization,
    /// Growing income and investing
    Growth,
    /// Building wealth at scale
    Expansion,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Survival => "survival",
            Phase::Stabilization => "stabilization",
            Phase::Growth => "growth",
            Phase::Expansion => "expansion",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify the phase from stability score and reserve coverage
pub fn classify_phase(indicators: &HealthIndicators) -> Phase {
    let score = indicators.stability_score;
    let months = indicators.reserve_months;

    if score < 400 || months < 1.0 {
        Phase::Survival
    } else if score < 700 || months < 3.0 {
        Phase::Stabilization
    } else if score < 900 || months < 6.0 {
        Phase::Growth
    } else {
        Phase::Expansion
    }
}
