//! Decision history and insight aggregation
//!
//! The history log is append-only. Every session (user) has its own arena, and a
//! single writer appends at a time while readers always get an owned copy of the
//! log taken at call time.
//!
//! Insights are the feedback signal for recommendations and alerts: past
//! simulation decisions are grouped by their stable key and their estimated
//! impacts averaged.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::Snapshot;

/// What kind of action a decision records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    Simulation,
    Evaluation,
    ActionTaken,
}

impl DecisionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionKind::Simulation => "simulation",
            DecisionKind::Evaluation => "evaluation",
            DecisionKind::ActionTaken => "action_taken",
        }
    }
}

impl FromStr for DecisionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "simulation" | "simulacao" => Ok(DecisionKind::Simulation),
            "evaluation" | "avaliacao" => Ok(DecisionKind::Evaluation),
            "action_taken" | "action" | "acao_tomada" => Ok(DecisionKind::ActionTaken),
            _ => Err(format!("Unknown decision kind: {}", s)),
        }
    }
}

impl fmt::Display for DecisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Measured outcome attached to a decision
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionResult {
    pub score: f64,
    pub estimated_impact: f64,
}

/// Immutable record of a past simulation or user action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub id: String,
    pub kind: DecisionKind,
    pub timestamp: DateTime<Utc>,
    pub description: String,
    /// Stable key of the recommendation or alert this decision relates to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub snapshot: Snapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<DecisionResult>,
}

impl Decision {
    /// New decision with a fresh id, stamped now
    pub fn new(kind: DecisionKind, description: impl Into<String>, snapshot: Snapshot) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            timestamp: Utc::now(),
            description: description.into(),
            key: None,
            snapshot,
            result: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_result(mut self, result: DecisionResult) -> Self {
        self.result = Some(result);
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

/// Aggregated historical signal for one stable key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub key: String,
    pub average_impact: f64,
    /// Number of decisions averaged
    pub samples: usize,
}

/// Point-in-time, read-only set of insights keyed by stable key
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Insights {
    by_key: BTreeMap<String, Insight>,
}

impl Insights {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Aggregate simulation decisions that carry both a key and a result
    pub fn from_decisions(decisions: &[Decision]) -> Self {
        let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();

        for decision in decisions {
            if decision.kind != DecisionKind::Simulation {
                continue;
            }
            let (Some(key), Some(result)) = (decision.key.as_deref(), decision.result) else {
                continue;
            };
            let entry = sums.entry(key).or_insert((0.0, 0));
            entry.0 += result.estimated_impact;
            entry.1 += 1;
        }

        let by_key = sums
            .into_iter()
            .map(|(key, (sum, count))| {
                let insight = Insight {
                    key: key.to_string(),
                    average_impact: sum / count as f64,
                    samples: count,
                };
                (key.to_string(), insight)
            })
            .collect();

        Self { by_key }
    }

    pub fn get(&self, key: &str) -> Option<&Insight> {
        self.by_key.get(key)
    }

    /// Multiplier for scores tied to `key`: `1 + averageImpact/100`, or 1 without an insight.
    /// Never negative.
    pub fn adjustment_factor(&self, key: &str) -> f64 {
        match self.get(key) {
            Some(insight) => (1.0 + insight.average_impact / 100.0).max(0.0),
            None => 1.0,
        }
    }

    /// Insights ordered by key
    pub fn iter(&self) -> impl Iterator<Item = &Insight> {
        self.by_key.values()
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

/// Storage contract for the decision log.
///
/// Implementations must be append-only and hand out owned copies.
pub trait HistoryRepository: Send + Sync {
    /// Append a decision to a session's log
    fn record(&self, session: &str, decision: Decision) -> Result<()>;

    /// Every decision of a session, most recent first
    fn list_all(&self, session: &str) -> Result<Vec<Decision>>;

    fn list_by_kind(&self, session: &str, kind: DecisionKind) -> Result<Vec<Decision>> {
        Ok(self
            .list_all(session)?
            .into_iter()
            .filter(|d| d.kind == kind)
            .collect())
    }

    fn generate_insights(&self, session: &str) -> Result<Insights> {
        Ok(Insights::from_decisions(&self.list_all(session)?))
    }
}

/// Process-local history arena keyed by session id
#[derive(Debug, Default)]
pub struct InMemoryHistory {
    sessions: RwLock<HashMap<String, Vec<Decision>>>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a repository from previously persisted sessions.
    ///
    /// Decisions are replayed in append order (oldest first). Duplicate ids are
    /// skipped with a warning so one bad entry does not discard the rest.
    pub fn from_sessions<I>(sessions: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<Decision>)>,
    {
        let history = Self::new();
        for (session, decisions) in sessions {
            for decision in decisions {
                if let Err(e) = history.record(&session, decision) {
                    tracing::warn!(session = %session, error = %e, "Skipping stored decision");
                }
            }
        }
        history
    }

    pub fn len(&self, session: &str) -> usize {
        self.sessions.read().get(session).map_or(0, Vec::len)
    }

    /// Ids of every session with at least one decision, sorted
    pub fn sessions(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sessions.read().keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl HistoryRepository for InMemoryHistory {
    fn record(&self, session: &str, decision: Decision) -> Result<()> {
        let mut sessions = self.sessions.write();
        let log = sessions.entry(session.to_string()).or_default();

        if log.iter().any(|d| d.id == decision.id) {
            return Err(Error::DuplicateDecision(decision.id));
        }

        tracing::debug!(
            session,
            id = %decision.id,
            kind = decision.kind.as_str(),
            key = ?decision.key,
            "Decision recorded"
        );
        log.push(decision);
        Ok(())
    }

    fn list_all(&self, session: &str) -> Result<Vec<Decision>> {
        let mut decisions: Vec<Decision> = self
            .sessions
            .read()
            .get(session)
            .map(|log| log.iter().rev().cloned().collect())
            .unwrap_or_default();

        // Later appends win ties on equal timestamps
        decisions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(decisions)
    }
}
