//! Scenario Evaluator
//!
//! Two comparison modes, not interchangeable:
//!
//! - **Balance variance** - each scenario is an alternative account. Its projected
//!   balance is compared to the baseline's current reserves and classified by the
//!   variance threshold. Results keep input order.
//! - **Stability score** - each scenario is a bundle of projection strategies applied
//!   to the same account. Scenarios are ranked by the stability score of their last
//!   projected month; ties keep input order.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ScenarioConfig;
use crate::error::{Error, Result};
use crate::models::Account;
use crate::projection::{self, ProjectionStrategy};

/// How a scenario compares to its baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Risk,
    Opportunity,
    Informational,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Risk => "risk",
            Classification::Opportunity => "opportunity",
            Classification::Informational => "informational",
        }
    }

    /// Sort priority (lower = shown first)
    pub fn priority(&self) -> u8 {
        match self {
            Classification::Risk => 1,
            Classification::Opportunity => 2,
            Classification::Informational => 3,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An alternative account to compare against a baseline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedAccount {
    pub name: String,
    pub account: Account,
}

impl NamedAccount {
    pub fn new(name: impl Into<String>, account: Account) -> Self {
        Self {
            name: name.into(),
            account,
        }
    }
}

/// A named, ordered list of strategies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyBundle {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub strategies: Vec<ProjectionStrategy>,
}

impl StrategyBundle {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        strategies: Vec<ProjectionStrategy>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            strategies,
        }
    }
}

/// Numbers behind a scenario result, per comparison mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ScenarioOutcome {
    Balance {
        projected_balance: f64,
        variance: f64,
    },
    Stability {
        final_score: u32,
        /// Final score minus the score of the same account projected without strategies
        score_delta: i64,
        projected_balance: f64,
    },
}

/// Outcome of evaluating one named scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,
    pub description: String,
    pub outcome: ScenarioOutcome,
    pub classification: Classification,
}

impl ScenarioResult {
    pub fn projected_balance(&self) -> f64 {
        match self.outcome {
            ScenarioOutcome::Balance {
                projected_balance, ..
            }
            | ScenarioOutcome::Stability {
                projected_balance, ..
            } => projected_balance,
        }
    }

    /// Stability score for ranked scenarios, `None` in balance mode
    pub fn final_score(&self) -> Option<u32> {
        match self.outcome {
            ScenarioOutcome::Stability { final_score, .. } => Some(final_score),
            ScenarioOutcome::Balance { .. } => None,
        }
    }

    pub fn variance(&self) -> Option<f64> {
        match self.outcome {
            ScenarioOutcome::Balance { variance, .. } => Some(variance),
            ScenarioOutcome::Stability { .. } => None,
        }
    }
}

/// Human-readable summary of a projected balance
pub fn describe_balance(months: u32, balance: f64) -> String {
    format!(
        "Após {} meses, o saldo projetado será de R$ {:.2}.",
        months, balance
    )
}

/// Evaluates and ranks competing scenarios
#[derive(Debug, Clone, Default)]
pub struct ScenarioEvaluator {
    config: ScenarioConfig,
}

impl ScenarioEvaluator {
    pub fn new(config: ScenarioConfig) -> Self {
        Self { config }
    }

    /// Classify a balance variance against the configured threshold
    pub fn classify_variance(&self, variance: f64) -> Classification {
        let threshold = self.config.variance_threshold;
        if variance > threshold {
            Classification::Opportunity
        } else if variance < -threshold {
            Classification::Risk
        } else {
            Classification::Informational
        }
    }

    /// Balance-variance mode. Results are in input order.
    pub fn compare_balances(
        &self,
        baseline: &Account,
        scenarios: &[NamedAccount],
        months: u32,
    ) -> Result<Vec<ScenarioResult>> {
        if months == 0 {
            return Err(Error::InvalidHorizon(0));
        }

        let results = scenarios
            .iter()
            .map(|scenario| {
                let account = &scenario.account;
                let monthly_flow = account.monthly_income() - account.total_expenses();
                let projected_balance = account.total_reserves() + monthly_flow * f64::from(months);
                let variance = projected_balance - baseline.total_reserves();
                let classification = self.classify_variance(variance);

                tracing::debug!(
                    scenario = %scenario.name,
                    projected_balance,
                    variance,
                    classification = classification.as_str(),
                    "Scenario compared"
                );

                ScenarioResult {
                    name: scenario.name.clone(),
                    description: describe_balance(months, projected_balance),
                    outcome: ScenarioOutcome::Balance {
                        projected_balance,
                        variance,
                    },
                    classification,
                }
            })
            .collect();

        Ok(results)
    }

    /// Stability-score mode. Results are sorted by final score, highest first.
    pub fn rank_by_stability(
        &self,
        account: &Account,
        bundles: &[StrategyBundle],
        months: u32,
    ) -> Result<Vec<ScenarioResult>> {
        let baseline_score = final_score(account, &[], months)?.0;

        let mut results = bundles
            .iter()
            .map(|bundle| {
                let (score, balance) = final_score(account, &bundle.strategies, months)?;
                let score_delta = i64::from(score) - i64::from(baseline_score);
                // Any score change counts; the variance threshold is in currency
                let classification = match score_delta {
                    d if d > 0 => Classification::Opportunity,
                    d if d < 0 => Classification::Risk,
                    _ => Classification::Informational,
                };

                Ok(ScenarioResult {
                    name: bundle.name.clone(),
                    description: describe_balance(months, balance),
                    outcome: ScenarioOutcome::Stability {
                        final_score: score,
                        score_delta,
                        projected_balance: balance,
                    },
                    classification,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        // Stable: equal scores keep input order
        results.sort_by(|a, b| b.final_score().cmp(&a.final_score()));

        Ok(results)
    }
}

/// Stability score and reserves of the last projected month
fn final_score(
    account: &Account,
    strategies: &[ProjectionStrategy],
    months: u32,
) -> Result<(u32, f64)> {
    let projected = projection::project_months(account, months, strategies)?;
    let last = projected.last().ok_or(Error::InvalidHorizon(0))?;
    Ok((last.indicators().stability_score, last.reserves()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExpenseCategory;
    use crate::test_utils::{baseline_account, baseline_expenses, expense};

    fn evaluator() -> ScenarioEvaluator {
        ScenarioEvaluator::default()
    }

    #[test]
    fn test_income_raise_is_opportunity() {
        let scenario = NamedAccount::new(
            "Aumento de Receita",
            Account::new(5500.0, baseline_expenses(), 1000.0).unwrap(),
        );
        let results = evaluator()
            .compare_balances(&baseline_account(), &[scenario], 1)
            .unwrap();

        assert_eq!(results[0].projected_balance(), 2500.0);
        assert_eq!(results[0].variance(), Some(1500.0));
        assert_eq!(results[0].classification, Classification::Opportunity);
        assert_eq!(
            results[0].description,
            "Após 1 meses, o saldo projetado será de R$ 2500.00."
        );
    }

    #[test]
    fn test_extra_expense_is_risk() {
        let mut expenses = baseline_expenses();
        expenses.push(expense("d3", 1200.0, ExpenseCategory::NonEssentialVariable));
        let scenario = NamedAccount::new(
            "Aumento de Despesa",
            Account::new(5000.0, expenses, 1000.0).unwrap(),
        );

        let results = evaluator()
            .compare_balances(&baseline_account(), &[scenario], 1)
            .unwrap();

        assert_eq!(results[0].projected_balance(), 800.0);
        assert_eq!(results[0].variance(), Some(-200.0));
        assert_eq!(results[0].classification, Classification::Risk);
    }

    #[test]
    fn test_small_variance_is_informational() {
        let scenario = NamedAccount::new(
            "Variação Mínima",
            Account::new(4080.0, baseline_expenses(), 1000.0).unwrap(),
        );
        let results = evaluator()
            .compare_balances(&baseline_account(), &[scenario], 1)
            .unwrap();

        assert_eq!(results[0].variance(), Some(80.0));
        assert_eq!(results[0].classification, Classification::Informational);
    }

    #[test]
    fn test_threshold_boundaries_are_exclusive() {
        let e = evaluator();
        assert_eq!(e.classify_variance(100.0), Classification::Informational);
        assert_eq!(e.classify_variance(-100.0), Classification::Informational);
        assert_eq!(e.classify_variance(100.01), Classification::Opportunity);
        assert_eq!(e.classify_variance(-100.01), Classification::Risk);
    }

    #[test]
    fn test_balance_mode_rejects_zero_months() {
        let result = evaluator().compare_balances(&baseline_account(), &[], 0);
        assert!(matches!(result, Err(Error::InvalidHorizon(0))));
    }

    #[test]
    fn test_rank_by_stability_orders_descending() {
        let bundles = vec![
            StrategyBundle::new(
                "inflation",
                "",
                vec![ProjectionStrategy::expense_inflation(2.0).unwrap()],
            ),
            StrategyBundle::new(
                "growth",
                "",
                vec![ProjectionStrategy::income_growth(2.0).unwrap()],
            ),
        ];

        let ranked = evaluator()
            .rank_by_stability(&baseline_account(), &bundles, 12)
            .unwrap();

        assert_eq!(ranked[0].name, "growth");
        assert_eq!(ranked[1].name, "inflation");
        assert!(ranked[0].final_score() >= ranked[1].final_score());
        assert_eq!(ranked[1].classification, Classification::Risk);
    }

    #[test]
    fn test_stability_classification_follows_score_delta_sign() {
        // A small growth moves the score by a few points only
        let bundles = vec![StrategyBundle::new(
            "slow growth",
            "",
            vec![ProjectionStrategy::income_growth(0.1).unwrap()],
        )];

        let ranked = evaluator()
            .rank_by_stability(&baseline_account(), &bundles, 12)
            .unwrap();

        match ranked[0].outcome {
            ScenarioOutcome::Stability { score_delta, .. } => {
                assert!(score_delta > 0 && score_delta < 100, "delta {}", score_delta)
            }
            _ => panic!("expected stability outcome"),
        }
        assert_eq!(ranked[0].classification, Classification::Opportunity);
    }

    #[test]
    fn test_rank_ties_keep_input_order() {
        let bundles = vec![
            StrategyBundle::new("first", "", vec![]),
            StrategyBundle::new("second", "", vec![]),
            StrategyBundle::new("third", "", vec![]),
        ];

        let ranked = evaluator()
            .rank_by_stability(&baseline_account(), &bundles, 6)
            .unwrap();

        let names: Vec<_> = ranked.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
        assert!(ranked
            .iter()
            .all(|r| r.classification == Classification::Informational));
    }
}
