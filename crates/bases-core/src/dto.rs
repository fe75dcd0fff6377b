//! Wire shapes consumed by the dashboard
//!
//! Field names are camelCase and alert types use the dashboard's Portuguese
//! literals. Engine types convert into these at the boundary; accounts also
//! convert back, validating on the way in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::alerts::{Alert, AlertKind};
use crate::error::{Error, Result};
use crate::models::{Account, Expense, ExpenseCategory};
use crate::recommend::Recommendation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDto {
    pub id: String,
    #[serde(default)]
    pub description: String,
    pub amount: f64,
    pub category: ExpenseCategory,
    #[serde(default)]
    pub cost_center: String,
}

impl From<Expense> for ExpenseDto {
    fn from(expense: Expense) -> Self {
        Self {
            id: expense.id().to_string(),
            description: expense.description().to_string(),
            amount: expense.amount(),
            category: expense.category(),
            cost_center: expense.cost_center().to_string(),
        }
    }
}

/// `{ monthlyIncome, expenses, totalReserves }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub monthly_income: f64,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub total_reserves: f64,
}

impl From<Account> for AccountDto {
    fn from(account: Account) -> Self {
        Self {
            monthly_income: account.monthly_income(),
            expenses: account.expenses().to_vec(),
            total_reserves: account.total_reserves(),
        }
    }
}

impl TryFrom<AccountDto> for Account {
    type Error = Error;

    fn try_from(dto: AccountDto) -> Result<Self> {
        Account::new(dto.monthly_income, dto.expenses, dto.total_reserves)
    }
}

/// Alert type literals used by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertTypeDto {
    Risco,
    Oportunidade,
    Informativo,
}

impl From<AlertKind> for AlertTypeDto {
    fn from(kind: AlertKind) -> Self {
        match kind {
            AlertKind::Risk => AlertTypeDto::Risco,
            AlertKind::Opportunity => AlertTypeDto::Oportunidade,
            AlertKind::Informational => AlertTypeDto::Informativo,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertDto {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub alert_type: AlertTypeDto,
    pub estimated_impact: f64,
    pub generated_at: DateTime<Utc>,
    pub read: bool,
}

impl From<&Alert> for AlertDto {
    fn from(alert: &Alert) -> Self {
        Self {
            id: alert.id.clone(),
            title: alert.title.clone(),
            description: alert.description.clone(),
            alert_type: alert.kind.into(),
            estimated_impact: alert.estimated_impact,
            generated_at: alert.generated_at,
            read: alert.read,
        }
    }
}

/// Recommendation as rendered by the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationView {
    pub title: String,
    pub description: String,
    /// e.g. "R$ 120.00 / mês"
    pub impact: String,
}

impl From<&Recommendation> for RecommendationView {
    fn from(rec: &Recommendation) -> Self {
        Self {
            title: rec.label.clone(),
            description: rec.description.clone(),
            impact: format_monthly_impact(rec.estimated_impact),
        }
    }
}

pub fn format_monthly_impact(value: f64) -> String {
    format!("R$ {:.2} / mês", value)
}
