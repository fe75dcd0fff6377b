//! Engine configuration
//!
//! Every threshold used by the scenario evaluator, recommendation engine, alert
//! service and simulation contract lives here.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path, or the override in the data dir
//!    (~/.local/share/supportingbases/config/engine.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Override files may be partial; missing keys keep their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/engine.toml");

/// Thresholds for the balance-variance scenario mode
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioConfig {
    /// |variance| above this classifies a scenario as risk or opportunity
    pub variance_threshold: f64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            variance_threshold: 100.0,
        }
    }
}

/// Recommendation catalog scoring
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationConfig {
    /// Months each catalog entry is projected for
    pub projection_months: u32,
    /// Assumed monthly structural inflation without containment (%)
    pub baseline_inflation_pct: f64,
    /// Impact/expense ratio mapping to a base score of 50
    pub score_saturation: f64,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            projection_months: 12,
            baseline_inflation_pct: 1.0,
            score_saturation: 0.05,
        }
    }
}

/// Alert thresholds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertConfig {
    /// Recommendation scores below this raise a risk alert
    pub risk_below: f64,
    /// Recommendation scores at or above this raise an opportunity alert
    pub opportunity_from: f64,
    /// Reserves below this raise the low balance alert
    pub low_balance_below: f64,
    /// Fixed impact of the low balance alert
    pub low_balance_impact: f64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            risk_below: 50.0,
            opportunity_from: 85.0,
            low_balance_below: 1000.0,
            low_balance_impact: 30.0,
        }
    }
}

/// Thresholds for the versioned simulation contract
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractConfig {
    /// Annual rate offset (percentage points) of the pessimistic/optimistic scenarios
    pub rate_spread: f64,
    /// Annual rates below this raise a low profitability alert
    pub min_profitable_rate: f64,
    /// Scenario spread over base wealth above this raises a high risk alert
    pub max_risk_ratio: f64,
    /// Horizons shorter than this raise a short horizon alert
    pub short_horizon_months: u32,
    pub viability_low: f64,
    pub viability_high: f64,
    /// Spread ratio above this adds a risk management recommendation
    pub volatility_threshold: f64,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            rate_spread: 2.0,
            min_profitable_rate: 1.0,
            max_risk_ratio: 0.5,
            short_horizon_months: 24,
            viability_low: 0.5,
            viability_high: 0.9,
            volatility_threshold: 0.4,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EngineConfig {
    pub scenarios: ScenarioConfig,
    pub recommendations: RecommendationConfig,
    pub alerts: AlertConfig,
    pub contract: ContractConfig,
}

impl EngineConfig {
    /// Load from an explicit path, the data dir override, or the embedded defaults
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        // An explicit path must exist; the data dir override is optional
        let path = match override_path {
            Some(path) if !path.exists() => {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path().filter(|p| p.exists()),
        };

        match path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "Loading engine config override");
                let content = fs::read_to_string(&path).map_err(|e| {
                    Error::Config(format!("Failed to read {}: {}", path.display(), e))
                })?;
                parse_config(&content)
            }
            None => parse_config(DEFAULT_CONFIG),
        }
    }

    /// Embedded defaults only
    pub fn embedded() -> Result<Self> {
        parse_config(DEFAULT_CONFIG)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("supportingbases").join("config").join("engine.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    scenarios: Option<RawScenarios>,
    recommendations: Option<RawRecommendations>,
    alerts: Option<RawAlerts>,
    contract: Option<RawContract>,
}

#[derive(Debug, Deserialize)]
struct RawScenarios {
    variance_threshold: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawRecommendations {
    projection_months: Option<u32>,
    baseline_inflation_pct: Option<f64>,
    score_saturation: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawAlerts {
    risk_below: Option<f64>,
    opportunity_from: Option<f64>,
    low_balance_below: Option<f64>,
    low_balance_impact: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawContract {
    rate_spread: Option<f64>,
    min_profitable_rate: Option<f64>,
    max_risk_ratio: Option<f64>,
    short_horizon_months: Option<u32>,
    viability_low: Option<f64>,
    viability_high: Option<f64>,
    volatility_threshold: Option<f64>,
}

/// Parse config from TOML content, layering it over the defaults
fn parse_config(content: &str) -> Result<EngineConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = EngineConfig::default();

    if let Some(scenarios) = raw.scenarios {
        if let Some(threshold) = scenarios.variance_threshold {
            config.scenarios.variance_threshold = threshold;
        }
    }

    if let Some(recs) = raw.recommendations {
        if let Some(months) = recs.projection_months {
            config.recommendations.projection_months = months;
        }
        if let Some(pct) = recs.baseline_inflation_pct {
            config.recommendations.baseline_inflation_pct = pct;
        }
        if let Some(saturation) = recs.score_saturation {
            config.recommendations.score_saturation = saturation;
        }
    }

    if let Some(alerts) = raw.alerts {
        if let Some(v) = alerts.risk_below {
            config.alerts.risk_below = v;
        }
        if let Some(v) = alerts.opportunity_from {
            config.alerts.opportunity_from = v;
        }
        if let Some(v) = alerts.low_balance_below {
            config.alerts.low_balance_below = v;
        }
        if let Some(v) = alerts.low_balance_impact {
            config.alerts.low_balance_impact = v;
        }
    }

    if let Some(contract) = raw.contract {
        let c = &mut config.contract;
        if let Some(v) = contract.rate_spread {
            c.rate_spread = v;
        }
        if let Some(v) = contract.min_profitable_rate {
            c.min_profitable_rate = v;
        }
        if let Some(v) = contract.max_risk_ratio {
            c.max_risk_ratio = v;
        }
        if let Some(v) = contract.short_horizon_months {
            c.short_horizon_months = v;
        }
        if let Some(v) = contract.viability_low {
            c.viability_low = v;
        }
        if let Some(v) = contract.viability_high {
            c.viability_high = v;
        }
        if let Some(v) = contract.volatility_threshold {
            c.volatility_threshold = v;
        }
    }

    validate(&config)?;
    Ok(config)
}

fn validate(config: &EngineConfig) -> Result<()> {
    if config.recommendations.projection_months == 0 {
        return Err(Error::Config(
            "recommendations.projection_months must be at least 1".to_string(),
        ));
    }
    if config.recommendations.score_saturation <= 0.0 {
        return Err(Error::Config(
            "recommendations.score_saturation must be positive".to_string(),
        ));
    }
    if config.alerts.risk_below > config.alerts.opportunity_from {
        return Err(Error::Config(format!(
            "alerts.risk_below ({}) cannot exceed alerts.opportunity_from ({})",
            config.alerts.risk_below, config.alerts.opportunity_from
        )));
    }
    if config.contract.viability_low > config.contract.viability_high {
        return Err(Error::Config(
            "contract.viability_low cannot exceed contract.viability_high".to_string(),
        ));
    }
    Ok(())
}
