//! Projection strategies - pure per-month snapshot transforms

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{ExpenseCategory, Snapshot};

/// What a strategy changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyKind {
    /// Income compounds by `pct` every month
    IncomeGrowth,
    /// Every expense bucket compounds by `pct` every month
    ExpenseInflation,
    /// One bucket is cut by `pct` once, in the first projected month
    ExpenseCut { category: ExpenseCategory },
}

/// A validated transformation applied to each projected month.
///
/// The percentage is checked at construction, so an existing strategy is always valid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawStrategy")]
pub struct ProjectionStrategy {
    #[serde(flatten)]
    kind: StrategyKind,
    pct: f64,
}

#[derive(Deserialize)]
struct RawStrategy {
    #[serde(flatten)]
    kind: StrategyKind,
    pct: f64,
}

impl TryFrom<RawStrategy> for ProjectionStrategy {
    type Error = Error;

    fn try_from(raw: RawStrategy) -> Result<Self> {
        Self::new(raw.kind, raw.pct)
    }
}

impl ProjectionStrategy {
    pub fn new(kind: StrategyKind, pct: f64) -> Result<Self> {
        if !pct.is_finite() || pct < 0.0 {
            return Err(Error::InvalidData(format!(
                "strategy percentage cannot be negative, got {}",
                pct
            )));
        }
        if matches!(kind, StrategyKind::ExpenseCut { .. }) && pct > 100.0 {
            return Err(Error::InvalidData(format!(
                "expense cut cannot exceed 100 percent, got {}",
                pct
            )));
        }
        Ok(Self { kind, pct })
    }

    pub fn income_growth(pct: f64) -> Result<Self> {
        Self::new(StrategyKind::IncomeGrowth, pct)
    }

    pub fn expense_inflation(pct: f64) -> Result<Self> {
        Self::new(StrategyKind::ExpenseInflation, pct)
    }

    pub fn expense_cut(category: ExpenseCategory, pct: f64) -> Result<Self> {
        Self::new(StrategyKind::ExpenseCut { category }, pct)
    }

    pub fn kind(&self) -> StrategyKind {
        self.kind
    }

    pub fn pct(&self) -> f64 {
        self.pct
    }

    /// Transform `snapshot` for the 1-indexed projection `month`, returning a new snapshot
    pub fn apply(&self, snapshot: &Snapshot, month: u32) -> Snapshot {
        let factor = 1.0 + self.pct / 100.0;
        match self.kind {
            StrategyKind::IncomeGrowth => snapshot.with_income(snapshot.income() * factor),
            StrategyKind::ExpenseInflation => {
                snapshot.with_expenses(snapshot.expenses().scale(factor))
            }
            StrategyKind::ExpenseCut { category } => {
                if month != 1 {
                    return *snapshot;
                }
                let cut = 1.0 - self.pct / 100.0;
                snapshot.with_expenses(snapshot.expenses().scale_category(category, cut))
            }
        }
    }
}

impl fmt::Display for ProjectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            StrategyKind::IncomeGrowth => write!(f, "income +{}%/month", self.pct),
            StrategyKind::ExpenseInflation => write!(f, "expenses +{}%/month", self.pct),
            StrategyKind::ExpenseCut { category } => {
                write!(f, "{} -{}% once", category, self.pct)
            }
        }
    }
}
