//! SupportingBases Core Library
//!
//! Financial projection and adaptive recommendation engine:
//! - Expense and account models with construction-time validation
//! - Snapshot engine deriving health indicators and structural checks
//! - Projection pipeline composing per-month strategies
//! - Scenario evaluation in balance-variance and stability-score modes
//! - Recommendation catalog scored deterministically and biased by history
//! - Alert service merging score-derived and threshold-derived alerts
//! - Append-only decision history with insight aggregation
//! - Versioned compound-interest simulation contract
//! - Simplified stability metrics and dashboard DTOs

pub mod advisor;
pub mod alerts;
pub mod config;
pub mod contract;
pub mod dto;
pub mod error;
pub mod history;
pub mod metrics;
pub mod models;
pub mod projection;
pub mod recommend;
pub mod scenarios;
pub mod snapshot;

/// Shared account and decision fixtures
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use advisor::{Advice, Advisor};
pub use alerts::{Alert, AlertKind, AlertService};
pub use config::{AlertConfig, ContractConfig, EngineConfig, RecommendationConfig, ScenarioConfig};
pub use contract::{simulate, SimulationInput, SimulationResponse, CONTRACT_VERSION};
pub use dto::{AccountDto, AlertDto, ExpenseDto, RecommendationView};
pub use error::{Error, Result};
pub use history::{
    Decision, DecisionKind, DecisionResult, HistoryRepository, InMemoryHistory, Insight, Insights,
};
pub use metrics::{calculate_all_metrics, MetricsInput, StabilityMetrics};
pub use models::{Account, Expense, ExpenseCategory, ExpenseTotals, HealthIndicators, Snapshot};
pub use projection::{project_months, ProjectionStrategy, StrategyKind};
pub use recommend::{Recommendation, RecommendationEngine, RiskLevel};
pub use scenarios::{
    Classification, NamedAccount, ScenarioEvaluator, ScenarioOutcome, ScenarioResult,
    StrategyBundle,
};
pub use snapshot::{classify_phase, Phase};
