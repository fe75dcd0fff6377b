//! Versioned simulation contract
//!
//! Request/response surface for investment simulations:
//! - three compound-interest scenarios around the requested annual rate
//! - strategic recommendations from goal viability and scenario spread
//! - alerts for low profitability, high risk and short horizons
//! - metadata carrying the contract version and generation time

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ContractConfig;
use crate::error::{Error, Result};
use crate::models::validate_amount;
use crate::projection::compound_interest;

pub const CONTRACT_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskProfile {
    #[serde(alias = "conservador")]
    Conservative,
    #[serde(alias = "moderado")]
    Moderate,
    #[serde(alias = "arrojado")]
    Aggressive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationInput {
    pub principal: f64,
    pub monthly_contribution: f64,
    /// Annual return rate in percent
    pub annual_rate: f64,
    pub horizon_months: i64,
    pub financial_goal: f64,
    pub risk_profile: RiskProfile,
}

impl SimulationInput {
    /// Validate the request, returning the horizon as a month count
    pub fn validate(&self) -> Result<u32> {
        validate_amount(self.principal, "principal")?;
        validate_amount(self.monthly_contribution, "monthly contribution")?;
        validate_amount(self.annual_rate, "annual rate")?;
        if !self.financial_goal.is_finite() || self.financial_goal <= 0.0 {
            return Err(Error::InvalidData(format!(
                "financial goal must be positive, got {}",
                self.financial_goal
            )));
        }
        if self.horizon_months <= 0 {
            return Err(Error::InvalidHorizon(self.horizon_months));
        }
        u32::try_from(self.horizon_months).map_err(|_| Error::InvalidHorizon(self.horizon_months))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioLabel {
    Pessimistic,
    Base,
    Optimistic,
}

impl ScenarioLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioLabel::Pessimistic => "pessimistic",
            ScenarioLabel::Base => "base",
            ScenarioLabel::Optimistic => "optimistic",
        }
    }
}

impl fmt::Display for ScenarioLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioEvaluation {
    pub label: ScenarioLabel,
    pub annual_rate: f64,
    pub projected_wealth: f64,
    pub return_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationCategory {
    StrategyAdjustment,
    PortfolioOptimization,
    PlanMaintenance,
    RiskManagement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategicRecommendation {
    pub category: RecommendationCategory,
    pub title: String,
    pub description: String,
    /// Base wealth over the goal, clamped to 0-1
    pub viability_score: f64,
    /// Scenario spread over base wealth
    pub estimated_risk: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    Warning,
    Alert,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractAlert {
    #[serde(rename = "type")]
    pub level: AlertLevel,
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractMetadata {
    pub contract_version: String,
    pub generated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResponse {
    pub input: SimulationInput,
    pub scenarios: Vec<ScenarioEvaluation>,
    pub recommendations: Vec<StrategicRecommendation>,
    pub alerts: Vec<ContractAlert>,
    pub metadata: ContractMetadata,
}

/// Run the full simulation pipeline for one request
pub fn simulate(
    config: &ContractConfig,
    input: &SimulationInput,
    correlation_id: Option<String>,
) -> Result<SimulationResponse> {
    let months = input.validate()?;

    let scenarios = evaluate_scenarios(config, input, months);
    let spread = Spread::from_scenarios(&scenarios);
    let recommendations = recommend(config, input, &spread);
    let alerts = contract_alerts(config, input, &spread);

    tracing::debug!(
        correlation_id = ?correlation_id,
        base_wealth = spread.base,
        risk_ratio = spread.risk_ratio(),
        recommendations = recommendations.len(),
        alerts = alerts.len(),
        "Simulation complete"
    );

    Ok(SimulationResponse {
        input: input.clone(),
        scenarios,
        recommendations,
        alerts,
        metadata: ContractMetadata {
            contract_version: CONTRACT_VERSION.to_string(),
            generated_at: Utc::now(),
            correlation_id,
        },
    })
}

/// Pessimistic, base and optimistic projections. Rates never go below zero.
pub fn evaluate_scenarios(
    config: &ContractConfig,
    input: &SimulationInput,
    months: u32,
) -> Vec<ScenarioEvaluation> {
    [
        (ScenarioLabel::Pessimistic, input.annual_rate - config.rate_spread),
        (ScenarioLabel::Base, input.annual_rate),
        (ScenarioLabel::Optimistic, input.annual_rate + config.rate_spread),
    ]
    .into_iter()
    .map(|(label, rate)| {
        let annual_rate = rate.max(0.0);
        let projection = compound_interest(
            input.principal,
            input.monthly_contribution,
            annual_rate,
            months,
        );
        ScenarioEvaluation {
            label,
            annual_rate,
            projected_wealth: projection.projected_wealth,
            return_pct: projection.return_pct,
        }
    })
    .collect()
}

/// Projected wealth of the three scenarios
#[derive(Debug, Clone, Copy)]
struct Spread {
    pessimistic: f64,
    base: f64,
    optimistic: f64,
}

impl Spread {
    fn from_scenarios(scenarios: &[ScenarioEvaluation]) -> Self {
        let wealth = |label| {
            scenarios
                .iter()
                .find(|s| s.label == label)
                .map_or(0.0, |s| s.projected_wealth)
        };
        Self {
            pessimistic: wealth(ScenarioLabel::Pessimistic),
            base: wealth(ScenarioLabel::Base),
            optimistic: wealth(ScenarioLabel::Optimistic),
        }
    }

    /// Spread between best and worst case relative to the base case
    fn risk_ratio(&self) -> f64 {
        if self.base > 0.0 {
            (self.optimistic - self.pessimistic) / self.base
        } else {
            0.0
        }
    }
}

fn recommend(
    config: &ContractConfig,
    input: &SimulationInput,
    spread: &Spread,
) -> Vec<StrategicRecommendation> {
    let viability_score = (spread.base / input.financial_goal).clamp(0.0, 1.0);
    let estimated_risk = spread.risk_ratio();

    let (category, title, description) = if viability_score < config.viability_low {
        (
            RecommendationCategory::StrategyAdjustment,
            "Revisão de Estratégia Necessária",
            format!(
                "Sua meta de R$ {:.2} está distante. Aumentar o aporte mensal ou o horizonte de tempo pode ser crucial.",
                input.financial_goal
            ),
        )
    } else if viability_score < config.viability_high {
        (
            RecommendationCategory::PortfolioOptimization,
            "Otimização de Carteira Sugerida",
            "Você está no caminho certo, mas pode não atingir 100% da meta. Considere buscar uma rentabilidade maior ou aumentar seus aportes.".to_string(),
        )
    } else {
        (
            RecommendationCategory::PlanMaintenance,
            "Plano Financeiro Sólido",
            "Sua estratégia atual tem alta probabilidade de atingir ou superar a meta. Mantenha a disciplina.".to_string(),
        )
    };

    let mut recommendations = vec![StrategicRecommendation {
        category,
        title: title.to_string(),
        description,
        viability_score,
        estimated_risk,
    }];

    if estimated_risk > config.volatility_threshold {
        recommendations.push(StrategicRecommendation {
            category: RecommendationCategory::RiskManagement,
            title: "Volatilidade da Carteira Elevada".to_string(),
            description: "A diferença entre os cenários otimista e pessimista é significativa. Considere diversificar seus investimentos.".to_string(),
            viability_score,
            estimated_risk,
        });
    }

    recommendations
}

fn contract_alerts(
    config: &ContractConfig,
    input: &SimulationInput,
    spread: &Spread,
) -> Vec<ContractAlert> {
    let mut alerts = Vec::new();

    if input.annual_rate < config.min_profitable_rate {
        alerts.push(ContractAlert {
            level: AlertLevel::Warning,
            title: "Rentabilidade Baixa".to_string(),
            message: format!(
                "Sua taxa de retorno anual de {}% é muito conservadora e pode não superar a inflação.",
                input.annual_rate
            ),
        });
    }

    if spread.risk_ratio() > config.max_risk_ratio {
        alerts.push(ContractAlert {
            level: AlertLevel::Alert,
            title: "Risco Elevado".to_string(),
            message: "A projeção indica alta volatilidade e um maior risco de perda de capital."
                .to_string(),
        });
    }

    if input.horizon_months < i64::from(config.short_horizon_months) {
        alerts.push(ContractAlert {
            level: AlertLevel::Info,
            title: "Horizonte de Curto Prazo".to_string(),
            message: format!(
                "Um horizonte de {} meses é considerado curto para investimentos voláteis.",
                input.horizon_months
            ),
        });
    }

    alerts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(principal: f64, contribution: f64, rate: f64, months: i64, goal: f64) -> SimulationInput {
        SimulationInput {
            principal,
            monthly_contribution: contribution,
            annual_rate: rate,
            horizon_months: months,
            financial_goal: goal,
            risk_profile: RiskProfile::Moderate,
        }
    }

    fn run(input: &SimulationInput) -> SimulationResponse {
        simulate(&ContractConfig::default(), input, None).unwrap()
    }

    #[test]
    fn test_validation() {
        let config = ContractConfig::default();
        let err = simulate(&config, &input(1000.0, 0.0, 5.0, 0, 1.0), None).unwrap_err();
        assert!(matches!(err, Error::InvalidHorizon(0)));

        let err = simulate(&config, &input(1000.0, 0.0, 5.0, -3, 1.0), None).unwrap_err();
        assert!(matches!(err, Error::InvalidHorizon(-3)));

        assert!(simulate(&config, &input(-1.0, 0.0, 5.0, 12, 1.0), None).is_err());
        assert!(simulate(&config, &input(1.0, 0.0, -5.0, 12, 1.0), None).is_err());
        assert!(simulate(&config, &input(1.0, 0.0, 5.0, 12, 0.0), None).is_err());
    }

    #[test]
    fn test_three_scenarios_around_rate() {
        let response = run(&input(10000.0, 500.0, 12.0, 12, 20000.0));

        let rates: Vec<_> = response.scenarios.iter().map(|s| s.annual_rate).collect();
        assert_eq!(rates, vec![10.0, 12.0, 14.0]);

        let base = &response.scenarios[1];
        assert_eq!(base.label, ScenarioLabel::Base);
        assert!((base.projected_wealth - 17609.5018).abs() < 0.001);
        assert!(response.scenarios[0].projected_wealth < base.projected_wealth);
        assert!(response.scenarios[2].projected_wealth > base.projected_wealth);
    }

    #[test]
    fn test_near_goal_suggests_optimization_and_short_horizon() {
        // Viability 0.88, spread ratio 0.03
        let response = run(&input(10000.0, 500.0, 12.0, 12, 20000.0));

        assert_eq!(response.recommendations.len(), 1);
        assert_eq!(
            response.recommendations[0].category,
            RecommendationCategory::PortfolioOptimization
        );
        assert_eq!(response.alerts.len(), 1);
        assert_eq!(response.alerts[0].level, AlertLevel::Info);
    }

    #[test]
    fn test_distant_goal_and_low_rate() {
        let response = run(&input(1000.0, 100.0, 0.5, 36, 1_000_000.0));

        // Pessimistic rate floored at zero
        assert_eq!(response.scenarios[0].annual_rate, 0.0);
        assert_eq!(response.scenarios[0].projected_wealth, 4600.0);

        assert_eq!(
            response.recommendations[0].category,
            RecommendationCategory::StrategyAdjustment
        );
        let levels: Vec<_> = response.alerts.iter().map(|a| a.level).collect();
        assert_eq!(levels, vec![AlertLevel::Warning]);
    }

    #[test]
    fn test_volatile_long_horizon() {
        // Spread ratio ~0.80
        let response = run(&input(1000.0, 0.0, 30.0, 240, 100_000.0));

        let categories: Vec<_> = response.recommendations.iter().map(|r| r.category).collect();
        assert_eq!(
            categories,
            vec![
                RecommendationCategory::PlanMaintenance,
                RecommendationCategory::RiskManagement
            ]
        );
        assert_eq!(response.recommendations[0].viability_score, 1.0);

        let levels: Vec<_> = response.alerts.iter().map(|a| a.level).collect();
        assert_eq!(levels, vec![AlertLevel::Alert]);
    }

    #[test]
    fn test_metadata_and_wire_shape() {
        let response = simulate(
            &ContractConfig::default(),
            &input(1000.0, 100.0, 6.0, 24, 5000.0),
            Some("req-42".to_string()),
        )
        .unwrap();

        assert_eq!(response.metadata.contract_version, "1.0.0");
        assert_eq!(response.metadata.correlation_id.as_deref(), Some("req-42"));

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["metadata"]["contractVersion"], "1.0.0");
        assert_eq!(json["input"]["horizonMonths"], 24);
        assert_eq!(json["scenarios"][1]["label"], "base");
    }

    #[test]
    fn test_input_accepts_portuguese_risk_profile() {
        let json = r#"{"principal": 0, "monthlyContribution": 100, "annualRate": 8,
                       "horizonMonths": 12, "financialGoal": 2000, "riskProfile": "arrojado"}"#;
        let parsed: SimulationInput = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.risk_profile, RiskProfile::Aggressive);
    }
}
