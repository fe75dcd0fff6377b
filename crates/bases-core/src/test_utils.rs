//! Test utilities for bases-core
//!
//! Shared fixtures: the reference account used throughout the scenario examples
//! (income 5000, expenses 3000 fixed + 1000 variable, reserves 1000) and small
//! builders for expenses and decisions.

use chrono::{Duration, TimeZone, Utc};

use crate::history::{Decision, DecisionKind, DecisionResult};
use crate::models::{Account, Expense, ExpenseCategory};

/// Build a valid expense with a generated description
pub fn expense(id: &str, amount: f64, category: ExpenseCategory) -> Expense {
    Expense::new(id, format!("Despesa {}", id), amount, category, "Geral")
        .expect("fixture expense must be valid")
}

/// Expenses of the reference account
pub fn baseline_expenses() -> Vec<Expense> {
    vec![
        expense("d1", 3000.0, ExpenseCategory::FixedStructural),
        expense("d2", 1000.0, ExpenseCategory::VariableStructural),
    ]
}

/// Reference account: income 5000, expenses 4000, reserves 1000
pub fn baseline_account() -> Account {
    Account::new(5000.0, baseline_expenses(), 1000.0).expect("fixture account must be valid")
}

/// A simulation decision keyed to a catalog entry, `minutes` after a fixed epoch
pub fn simulation(key: &str, estimated_impact: f64, minutes: i64) -> Decision {
    let epoch = Utc
        .with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
        .single()
        .expect("fixed epoch is valid");

    Decision::new(
        DecisionKind::Simulation,
        format!("Simulação {}", key),
        baseline_account().snapshot_now(),
    )
    .with_key(key)
    .with_result(DecisionResult {
        score: 50.0,
        estimated_impact,
    })
    .with_timestamp(epoch + Duration::minutes(minutes))
}
