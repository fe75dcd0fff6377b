//! Recommendation Engine
//!
//! Scores a fixed catalog of candidate strategies against the current account:
//!
//! 1. `estimatedImpact` is derived from the snapshot's category totals
//! 2. the base score maps impact relative to total expenses onto 0-100
//! 3. the base score is multiplied by the history adjustment for the entry's key
//! 4. entries are sorted by final score, highest first; ties keep catalog order
//!
//! Every entry is also projected forward (stability-score mode) so the caller can
//! see the stability it leads to.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::RecommendationConfig;
use crate::error::Result;
use crate::history::Insights;
use crate::models::{Account, ExpenseCategory, ExpenseTotals};
use crate::projection::{self, ProjectionStrategy};

/// Stable catalog keys shared with decisions and alerts
pub mod keys {
    pub const REDUCE_NON_ESSENTIAL: &str = "reduce-non-essential";
    pub const CONTAIN_STRUCTURAL_INFLATION: &str = "contain-structural-inflation";
    pub const GROW_INCOME: &str = "grow-income";
    pub const COMBINED_STRATEGY: &str = "combined-strategy";
}

const NON_ESSENTIAL_CUT_PCT: f64 = 15.0;
const CONTAINED_INFLATION_PCT: f64 = 0.5;
const INCOME_GROWTH_PCT: f64 = 1.0;
const COMBINED_GROWTH_PCT: f64 = 0.5;
const COMBINED_INFLATION_PCT: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How an entry's monthly impact is derived from the snapshot
#[derive(Debug, Clone, Copy, PartialEq)]
enum ImpactRule {
    /// Share of non-essential spending that is cut
    NonEssentialCut { pct: f64 },
    /// Essential spending saved by keeping inflation at `target_pct` instead of the baseline
    InflationContainment { target_pct: f64 },
    /// Share of income gained per month
    IncomeGrowth { pct: f64 },
    Combined { growth_pct: f64, target_pct: f64 },
}

impl ImpactRule {
    fn estimate(&self, income: f64, totals: &ExpenseTotals, baseline_inflation_pct: f64) -> f64 {
        let contained = |target: f64| {
            (totals.essential() * (baseline_inflation_pct - target) / 100.0).max(0.0)
        };

        match *self {
            ImpactRule::NonEssentialCut { pct } => {
                totals.get(ExpenseCategory::NonEssentialVariable) * pct / 100.0
            }
            ImpactRule::InflationContainment { target_pct } => contained(target_pct),
            ImpactRule::IncomeGrowth { pct } => income * pct / 100.0,
            ImpactRule::Combined {
                growth_pct,
                target_pct,
            } => income * growth_pct / 100.0 + contained(target_pct),
        }
    }
}

/// A fixed candidate strategy
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub key: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub risk_level: RiskLevel,
    pub strategies: Vec<ProjectionStrategy>,
    impact: ImpactRule,
}

/// The standard catalog, in tie-break order
pub fn default_catalog() -> Result<Vec<CatalogEntry>> {
    Ok(vec![
        CatalogEntry {
            key: keys::REDUCE_NON_ESSENTIAL,
            label: "Reduzir despesas variáveis não essenciais em 15%",
            description: "Cortar 15% dos gastos não essenciais libera caixa já no próximo mês.",
            risk_level: RiskLevel::Low,
            strategies: vec![ProjectionStrategy::expense_cut(
                ExpenseCategory::NonEssentialVariable,
                NON_ESSENTIAL_CUT_PCT,
            )?],
            impact: ImpactRule::NonEssentialCut {
                pct: NON_ESSENTIAL_CUT_PCT,
            },
        },
        CatalogEntry {
            key: keys::CONTAIN_STRUCTURAL_INFLATION,
            label: "Conter a inflação estrutural em 0,5% ao mês",
            description: "Renegociar contratos para manter os custos essenciais abaixo da inflação.",
            risk_level: RiskLevel::Low,
            strategies: vec![ProjectionStrategy::expense_inflation(
                CONTAINED_INFLATION_PCT,
            )?],
            impact: ImpactRule::InflationContainment {
                target_pct: CONTAINED_INFLATION_PCT,
            },
        },
        CatalogEntry {
            key: keys::GROW_INCOME,
            label: "Aumentar a receita em 1% ao mês",
            description: "Buscar reajustes, renda extra ou novos clientes de forma gradual.",
            risk_level: RiskLevel::Medium,
            strategies: vec![ProjectionStrategy::income_growth(INCOME_GROWTH_PCT)?],
            impact: ImpactRule::IncomeGrowth {
                pct: INCOME_GROWTH_PCT,
            },
        },
        CatalogEntry {
            key: keys::COMBINED_STRATEGY,
            label: "Estratégia combinada",
            description: "Crescer a receita em 0,5% ao mês e limitar a inflação a 0,3% ao mês.",
            risk_level: RiskLevel::Medium,
            strategies: vec![
                ProjectionStrategy::income_growth(COMBINED_GROWTH_PCT)?,
                ProjectionStrategy::expense_inflation(COMBINED_INFLATION_PCT)?,
            ],
            impact: ImpactRule::Combined {
                growth_pct: COMBINED_GROWTH_PCT,
                target_pct: COMBINED_INFLATION_PCT,
            },
        },
    ])
}

/// A catalog entry with its standing for the current account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Stable catalog key
    pub id: String,
    pub label: String,
    pub description: String,
    /// Monthly impact in currency units
    pub estimated_impact: f64,
    pub base_score: f64,
    pub final_score: f64,
    /// 1-based rank after sorting
    pub priority: u32,
    pub risk_level: RiskLevel,
    /// Stability score of the last projected month under this entry's strategies
    pub projected_stability: u32,
}

pub struct RecommendationEngine {
    config: RecommendationConfig,
    catalog: Vec<CatalogEntry>,
}

impl RecommendationEngine {
    pub fn new(config: RecommendationConfig) -> Result<Self> {
        Ok(Self {
            config,
            catalog: default_catalog()?,
        })
    }

    pub fn catalog(&self) -> &[CatalogEntry] {
        &self.catalog
    }

    /// Deterministic 0-100 score: `100 * n / (n + saturation)` with `n = impact / totalExpenses`
    pub fn base_score(&self, estimated_impact: f64, total_expenses: f64) -> f64 {
        if total_expenses <= 0.0 || estimated_impact <= 0.0 {
            return 0.0;
        }
        let n = estimated_impact / total_expenses;
        round2(100.0 * n / (n + self.config.score_saturation))
    }

    /// Whole catalog, best first
    pub fn recommend_all(
        &self,
        account: &Account,
        insights: &Insights,
    ) -> Result<Vec<Recommendation>> {
        let snapshot = account.snapshot_now();
        let totals = snapshot.expenses();
        let total_expenses = totals.total();

        let mut recommendations = Vec::with_capacity(self.catalog.len());

        for entry in &self.catalog {
            let estimated_impact = round2(entry.impact.estimate(
                snapshot.income(),
                totals,
                self.config.baseline_inflation_pct,
            ));
            let base_score = self.base_score(estimated_impact, total_expenses);
            let factor = insights.adjustment_factor(entry.key);
            let final_score = round2(base_score * factor);

            let projected = projection::project_months(
                account,
                self.config.projection_months,
                &entry.strategies,
            )?;
            let projected_stability = projected
                .last()
                .map(|s| s.indicators().stability_score)
                .unwrap_or_default();

            tracing::debug!(
                key = entry.key,
                estimated_impact,
                base_score,
                factor,
                final_score,
                projected_stability,
                "Recommendation scored"
            );

            recommendations.push(Recommendation {
                id: entry.key.to_string(),
                label: entry.label.to_string(),
                description: entry.description.to_string(),
                estimated_impact,
                base_score,
                final_score,
                priority: 0,
                risk_level: entry.risk_level,
                projected_stability,
            });
        }

        // Stable: equal scores keep catalog order
        recommendations.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
        for (rank, rec) in recommendations.iter_mut().enumerate() {
            rec.priority = rank as u32 + 1;
        }

        Ok(recommendations)
    }

    /// Head of [`recommend_all`](Self::recommend_all)
    pub fn recommend_best(
        &self,
        account: &Account,
        insights: &Insights,
    ) -> Result<Option<Recommendation>> {
        Ok(self.recommend_all(account, insights)?.into_iter().next())
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Account;
    use crate::test_utils::{baseline_account, baseline_expenses, expense, simulation};

    fn engine() -> RecommendationEngine {
        RecommendationEngine::new(RecommendationConfig::default()).unwrap()
    }

    fn find<'a>(recs: &'a [Recommendation], key: &str) -> &'a Recommendation {
        recs.iter().find(|r| r.id == key).unwrap()
    }

    #[test]
    fn test_catalog_keys_unique() {
        let engine = engine();
        let mut keys: Vec<_> = engine.catalog().iter().map(|e| e.key).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), engine.catalog().len());
    }

    #[test]
    fn test_estimated_impacts() {
        let mut expenses = baseline_expenses();
        expenses.push(expense("d3", 1000.0, ExpenseCategory::NonEssentialVariable));
        let account = Account::new(5000.0, expenses, 1000.0).unwrap();

        let recs = engine().recommend_all(&account, &Insights::empty()).unwrap();

        assert_eq!(find(&recs, keys::REDUCE_NON_ESSENTIAL).estimated_impact, 150.0);
        // 4000 essential * (1.0 - 0.5) / 100
        assert_eq!(
            find(&recs, keys::CONTAIN_STRUCTURAL_INFLATION).estimated_impact,
            20.0
        );
        assert_eq!(find(&recs, keys::GROW_INCOME).estimated_impact, 50.0);
        // 25 + 4000 * 0.7 / 100
        assert_eq!(find(&recs, keys::COMBINED_STRATEGY).estimated_impact, 53.0);
    }

    #[test]
    fn test_base_score_is_deterministic_and_bounded() {
        let engine = engine();
        assert_eq!(engine.base_score(0.0, 4000.0), 0.0);
        assert_eq!(engine.base_score(100.0, 0.0), 0.0);
        // n = 0.05 = saturation -> 50
        assert_eq!(engine.base_score(200.0, 4000.0), 50.0);
        assert!(engine.base_score(1e12, 1.0) <= 100.0);

        let account = baseline_account();
        let first = engine.recommend_all(&account, &Insights::empty()).unwrap();
        let second = engine.recommend_all(&account, &Insights::empty()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_sorted_descending_with_priorities() {
        let recs = engine()
            .recommend_all(&baseline_account(), &Insights::empty())
            .unwrap();

        assert_eq!(recs.len(), 4);
        assert!(recs.windows(2).all(|w| w[0].final_score >= w[1].final_score));
        let priorities: Vec<_> = recs.iter().map(|r| r.priority).collect();
        assert_eq!(priorities, vec![1, 2, 3, 4]);
        // Baseline has no non-essential spending
        assert_eq!(recs[3].id, keys::REDUCE_NON_ESSENTIAL);
        assert_eq!(recs[0].id, keys::COMBINED_STRATEGY);
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        // No expenses: every base score is 0
        let account = Account::new(0.0, vec![], 0.0).unwrap();
        let recs = engine().recommend_all(&account, &Insights::empty()).unwrap();

        let ids: Vec<_> = recs.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                keys::REDUCE_NON_ESSENTIAL,
                keys::CONTAIN_STRUCTURAL_INFLATION,
                keys::GROW_INCOME,
                keys::COMBINED_STRATEGY,
            ]
        );
    }

    #[test]
    fn test_insights_adjust_matching_key_only() {
        let account = baseline_account();
        let plain = engine().recommend_all(&account, &Insights::empty()).unwrap();

        let insights = Insights::from_decisions(&[simulation(keys::GROW_INCOME, 50.0, 0)]);
        let adjusted = engine().recommend_all(&account, &insights).unwrap();

        let before = find(&plain, keys::GROW_INCOME);
        let after = find(&adjusted, keys::GROW_INCOME);
        assert_eq!(after.base_score, before.base_score);
        assert!((after.final_score - round2(before.base_score * 1.5)).abs() < 1e-9);

        assert_eq!(
            find(&plain, keys::COMBINED_STRATEGY).final_score,
            find(&adjusted, keys::COMBINED_STRATEGY).final_score
        );
        assert_eq!(adjusted[0].id, keys::GROW_INCOME);
    }

    #[test]
    fn test_projected_stability_reported() {
        let recs = engine()
            .recommend_all(&baseline_account(), &Insights::empty())
            .unwrap();
        let grow = find(&recs, keys::GROW_INCOME).projected_stability;
        let contain = find(&recs, keys::CONTAIN_STRUCTURAL_INFLATION).projected_stability;
        assert!(grow > contain);
    }

    #[test]
    fn test_recommend_best_is_head() {
        let engine = engine();
        let account = baseline_account();
        let all = engine.recommend_all(&account, &Insights::empty()).unwrap();
        let best = engine
            .recommend_best(&account, &Insights::empty())
            .unwrap()
            .unwrap();
        assert_eq!(best, all[0]);
    }
}
