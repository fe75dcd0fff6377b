//! Alert Service
//!
//! Alerts come from two independent sources:
//! - recommendation scores: below `risk_below` is a risk (impact `100 - score`),
//!   at or above `opportunity_from` an opportunity (impact = score)
//! - static thresholds: reserves below `low_balance_below` raise an informational
//!   low balance alert with a fixed impact
//!
//! Impacts are adjusted by history insights keyed the same way as recommendations.
//! Output is ordered by type (risk, opportunity, informational), then by impact
//! descending. Alerts are transient and never stored.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AlertConfig;
use crate::dto::format_monthly_impact;
use crate::history::Insights;
use crate::models::Account;
use crate::recommend::Recommendation;

/// Stable key of the low balance alert
pub const LOW_BALANCE_KEY: &str = "low-balance";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Risk,
    Opportunity,
    Informational,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::Risk => "risk",
            AlertKind::Opportunity => "opportunity",
            AlertKind::Informational => "informational",
        }
    }

    /// Sort priority (lower = shown first)
    pub fn priority(&self) -> u8 {
        match self {
            AlertKind::Risk => 1,
            AlertKind::Opportunity => 2,
            AlertKind::Informational => 3,
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    /// Stable key the alert was derived from (recommendation id or threshold key)
    pub key: String,
    pub title: String,
    pub description: String,
    pub kind: AlertKind,
    pub estimated_impact: f64,
    pub generated_at: DateTime<Utc>,
    pub read: bool,
}

pub struct AlertService {
    config: AlertConfig,
}

impl AlertService {
    pub fn new(config: AlertConfig) -> Self {
        Self { config }
    }

    /// Generate sorted alerts, stamped now
    pub fn generate(
        &self,
        account: &Account,
        recommendations: &[Recommendation],
        insights: &Insights,
    ) -> Vec<Alert> {
        self.generate_at(account, recommendations, insights, Utc::now())
    }

    pub fn generate_at(
        &self,
        account: &Account,
        recommendations: &[Recommendation],
        insights: &Insights,
        generated_at: DateTime<Utc>,
    ) -> Vec<Alert> {
        let mut alerts: Vec<Alert> = recommendations
            .iter()
            .filter_map(|rec| self.score_alert(rec, generated_at))
            .collect();

        if let Some(alert) = self.low_balance_alert(account, generated_at) {
            alerts.push(alert);
        }

        for alert in &mut alerts {
            alert.estimated_impact *= insights.adjustment_factor(&alert.key);
        }

        // Stable: type first, then impact descending
        alerts.sort_by(|a, b| {
            a.kind
                .priority()
                .cmp(&b.kind.priority())
                .then_with(|| b.estimated_impact.total_cmp(&a.estimated_impact))
        });

        tracing::debug!(
            count = alerts.len(),
            risks = alerts.iter().filter(|a| a.kind == AlertKind::Risk).count(),
            "Alerts generated"
        );

        alerts
    }

    fn score_alert(&self, rec: &Recommendation, generated_at: DateTime<Utc>) -> Option<Alert> {
        let score = rec.final_score;

        let (kind, title, description, impact) = if score < self.config.risk_below {
            (
                AlertKind::Risk,
                format!("Risco Detectado: {}", rec.label),
                format!(
                    "A recomendação \"{}\" tem pontuação {:.2}, abaixo de {:.0}.",
                    rec.label, score, self.config.risk_below
                ),
                100.0 - score,
            )
        } else if score >= self.config.opportunity_from {
            (
                AlertKind::Opportunity,
                format!("Oportunidade Encontrada: {}", rec.label),
                format!(
                    "{} Impacto estimado de {}.",
                    rec.description,
                    format_monthly_impact(rec.estimated_impact)
                ),
                score,
            )
        } else {
            return None;
        };

        Some(Alert {
            id: Uuid::new_v4().to_string(),
            key: rec.id.clone(),
            title,
            description,
            kind,
            estimated_impact: impact,
            generated_at,
            read: false,
        })
    }

    fn low_balance_alert(&self, account: &Account, generated_at: DateTime<Utc>) -> Option<Alert> {
        let reserves = account.total_reserves();
        if reserves >= self.config.low_balance_below {
            return None;
        }

        Some(Alert {
            id: Uuid::new_v4().to_string(),
            key: LOW_BALANCE_KEY.to_string(),
            title: "Informativo: Saldo Baixo".to_string(),
            description: format!(
                "Suas reservas (R$ {:.2}) estão abaixo de R$ {:.2}.",
                reserves, self.config.low_balance_below
            ),
            kind: AlertKind::Informational,
            estimated_impact: self.config.low_balance_impact,
            generated_at,
            read: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommend::RiskLevel;
    use crate::test_utils::{baseline_account, baseline_expenses, simulation};

    fn rec(id: &str, score: f64) -> Recommendation {
        Recommendation {
            id: id.to_string(),
            label: format!("Rec {}", id),
            description: "Descrição.".to_string(),
            estimated_impact: 10.0,
            base_score: score,
            final_score: score,
            priority: 1,
            risk_level: RiskLevel::Low,
            projected_stability: 0,
        }
    }

    fn service() -> AlertService {
        AlertService::new(AlertConfig::default())
    }

    fn rich_account() -> Account {
        Account::new(5000.0, baseline_expenses(), 50_000.0).unwrap()
    }

    #[test]
    fn test_score_thresholds() {
        let recs = vec![rec("a", 49.99), rec("b", 50.0), rec("c", 84.99), rec("d", 85.0)];
        let alerts = service().generate(&rich_account(), &recs, &Insights::empty());

        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].kind, AlertKind::Risk);
        assert_eq!(alerts[0].key, "a");
        assert!((alerts[0].estimated_impact - 50.01).abs() < 1e-9);
        assert_eq!(alerts[1].kind, AlertKind::Opportunity);
        assert_eq!(alerts[1].estimated_impact, 85.0);
        assert!(alerts[1].title.starts_with("Oportunidade Encontrada"));
    }

    #[test]
    fn test_low_balance_alert() {
        // Baseline reserves are exactly 1000: no alert
        let none = service().generate(&baseline_account(), &[], &Insights::empty());
        assert!(none.is_empty());

        let poor = Account::new(5000.0, baseline_expenses(), 999.0).unwrap();
        let alerts = service().generate(&poor, &[], &Insights::empty());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::Informational);
        assert_eq!(alerts[0].estimated_impact, 30.0);
        assert_eq!(alerts[0].title, "Informativo: Saldo Baixo");
        assert!(!alerts[0].read);
    }

    #[test]
    fn test_ordering_type_then_impact() {
        let poor = Account::new(5000.0, baseline_expenses(), 0.0).unwrap();
        let recs = vec![rec("r1", 40.0), rec("o1", 90.0), rec("r2", 10.0), rec("o2", 99.0)];
        let alerts = service().generate(&poor, &recs, &Insights::empty());

        let keys: Vec<_> = alerts.iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, vec!["r2", "r1", "o2", "o1", LOW_BALANCE_KEY]);
    }

    #[test]
    fn test_insights_adjust_impact_by_key() {
        let poor = Account::new(5000.0, baseline_expenses(), 0.0).unwrap();
        let insights = Insights::from_decisions(&[
            simulation(LOW_BALANCE_KEY, 100.0, 0),
            simulation("r1", -50.0, 1),
        ]);
        let alerts = service().generate(&poor, &[rec("r1", 20.0)], &insights);

        assert_eq!(alerts[0].key, "r1");
        assert!((alerts[0].estimated_impact - 40.0).abs() < 1e-9);
        assert_eq!(alerts[1].key, LOW_BALANCE_KEY);
        assert!((alerts[1].estimated_impact - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_alert_ids_unique() {
        let recs = vec![rec("a", 1.0), rec("b", 2.0)];
        let alerts = service().generate(&rich_account(), &recs, &Insights::empty());
        assert_ne!(alerts[0].id, alerts[1].id);
    }
}
