//! Advisor
//!
//! Wires the recommendation engine and alert service to an injected history
//! repository for one session. Each call reads the insights once and uses that
//! snapshot for every score it computes. If the repository fails the advisor
//! logs a warning and carries on with no insights.

use std::sync::Arc;

use crate::alerts::{Alert, AlertService};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::history::{Decision, HistoryRepository, Insights};
use crate::models::Account;
use crate::recommend::{Recommendation, RecommendationEngine};
use crate::scenarios::ScenarioEvaluator;

/// Recommendations and alerts computed from the same insight snapshot
#[derive(Debug, Clone)]
pub struct Advice {
    pub recommendations: Vec<Recommendation>,
    pub alerts: Vec<Alert>,
}

pub struct Advisor {
    engine: RecommendationEngine,
    alerts: AlertService,
    scenarios: ScenarioEvaluator,
    history: Arc<dyn HistoryRepository>,
    session: String,
}

impl Advisor {
    pub fn new(
        config: &EngineConfig,
        history: Arc<dyn HistoryRepository>,
        session: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            engine: RecommendationEngine::new(config.recommendations.clone())?,
            alerts: AlertService::new(config.alerts.clone()),
            scenarios: ScenarioEvaluator::new(config.scenarios.clone()),
            history,
            session: session.into(),
        })
    }

    pub fn session(&self) -> &str {
        &self.session
    }

    pub fn scenarios(&self) -> &ScenarioEvaluator {
        &self.scenarios
    }

    /// Point-in-time insights, empty when history is unavailable
    pub fn insights(&self) -> Insights {
        match self.history.generate_insights(&self.session) {
            Ok(insights) => insights,
            Err(e) => {
                tracing::warn!(
                    session = %self.session,
                    error = %e,
                    "History unavailable, scoring without insights"
                );
                Insights::empty()
            }
        }
    }

    pub fn recommend_all(&self, account: &Account) -> Result<Vec<Recommendation>> {
        self.engine.recommend_all(account, &self.insights())
    }

    pub fn recommend_best(&self, account: &Account) -> Result<Option<Recommendation>> {
        self.engine.recommend_best(account, &self.insights())
    }

    pub fn alerts(&self, account: &Account) -> Result<Vec<Alert>> {
        Ok(self.advise(account)?.alerts)
    }

    pub fn advise(&self, account: &Account) -> Result<Advice> {
        let insights = self.insights();
        let recommendations = self.engine.recommend_all(account, &insights)?;
        let alerts = self.alerts.generate(account, &recommendations, &insights);
        Ok(Advice {
            recommendations,
            alerts,
        })
    }

    pub fn record_decision(&self, decision: Decision) -> Result<()> {
        self.history.record(&self.session, decision)
    }

    pub fn history(&self) -> Result<Vec<Decision>> {
        self.history.list_all(&self.session)
    }
}
