//! Domain models for the SupportingBases engine

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dto::{AccountDto, ExpenseDto};
use crate::error::{Error, Result};
use crate::snapshot;

/// Closed set of expense categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    /// Obligations that do not change month to month (rent, school fees)
    #[serde(alias = "ESTRUTURAL_FIXA")]
    FixedStructural,
    /// Essential costs that vary (groceries, transport)
    #[serde(alias = "ESTRUTURAL_VARIAVEL")]
    VariableStructural,
    /// Discretionary spending that can be cut
    #[serde(alias = "VARIAVEL_NAO_ESSENCIAL")]
    NonEssentialVariable,
    /// Investments in growth (courses, equipment)
    #[serde(alias = "EXPANSAO")]
    Expansion,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 4] = [
        Self::FixedStructural,
        Self::VariableStructural,
        Self::NonEssentialVariable,
        Self::Expansion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FixedStructural => "fixed_structural",
            Self::VariableStructural => "variable_structural",
            Self::NonEssentialVariable => "non_essential_variable",
            Self::Expansion => "expansion",
        }
    }

    /// Essential categories make up the structural cost of living
    pub fn is_essential(&self) -> bool {
        matches!(self, Self::FixedStructural | Self::VariableStructural)
    }
}

impl FromStr for ExpenseCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fixed_structural" | "fixed" | "estrutural_fixa" => Ok(Self::FixedStructural),
            "variable_structural" | "estrutural_variavel" => Ok(Self::VariableStructural),
            "non_essential_variable" | "non_essential" | "variavel_nao_essencial" => {
                Ok(Self::NonEssentialVariable)
            }
            "expansion" | "expansao" => Ok(Self::Expansion),
            _ => Err(format!("Unknown expense category: {}", s)),
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single categorized cost. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ExpenseDto", into = "ExpenseDto")]
pub struct Expense {
    id: String,
    description: String,
    amount: f64,
    category: ExpenseCategory,
    cost_center: String,
}

impl Expense {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        amount: f64,
        category: ExpenseCategory,
        cost_center: impl Into<String>,
    ) -> Result<Self> {
        let id = id.into();
        validate_amount(amount, &format!("expense '{}' amount", id))?;
        Ok(Self {
            id,
            description: description.into(),
            amount,
            category,
            cost_center: cost_center.into(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn category(&self) -> ExpenseCategory {
        self.category
    }

    pub fn cost_center(&self) -> &str {
        &self.cost_center
    }

    /// Copy of this expense with a different amount
    pub fn with_amount(&self, amount: f64) -> Result<Self> {
        Self::new(
            self.id.clone(),
            self.description.clone(),
            amount,
            self.category,
            self.cost_center.clone(),
        )
    }
}

impl TryFrom<ExpenseDto> for Expense {
    type Error = Error;

    fn try_from(dto: ExpenseDto) -> Result<Self> {
        Expense::new(
            dto.id,
            dto.description,
            dto.amount,
            dto.category,
            dto.cost_center,
        )
    }
}

/// A user's financial state: income, owned expenses and reserves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AccountDto", into = "AccountDto")]
pub struct Account {
    monthly_income: f64,
    expenses: Vec<Expense>,
    total_reserves: f64,
}

impl Account {
    pub fn new(monthly_income: f64, expenses: Vec<Expense>, total_reserves: f64) -> Result<Self> {
        validate_amount(monthly_income, "monthly income")?;
        if !total_reserves.is_finite() {
            return Err(Error::InvalidData(format!(
                "total reserves must be a finite number, got {}",
                total_reserves
            )));
        }
        Ok(Self {
            monthly_income,
            expenses,
            total_reserves,
        })
    }

    pub fn monthly_income(&self) -> f64 {
        self.monthly_income
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn total_reserves(&self) -> f64 {
        self.total_reserves
    }

    pub fn add_expense(&mut self, expense: Expense) {
        self.expenses.push(expense);
    }

    pub fn update_income(&mut self, monthly_income: f64) -> Result<()> {
        validate_amount(monthly_income, "monthly income")?;
        self.monthly_income = monthly_income;
        Ok(())
    }

    /// Sum of every expense amount
    pub fn total_expenses(&self) -> f64 {
        self.expenses.iter().map(Expense::amount).sum()
    }

    /// Point-in-time view of this account
    pub fn snapshot_now(&self) -> Snapshot {
        Snapshot::new(
            self.monthly_income,
            snapshot::group_expenses(&self.expenses),
            self.total_reserves,
        )
    }

    pub fn indicators(&self) -> HealthIndicators {
        self.snapshot_now().indicators()
    }

    /// Spending more than earned with less than a month of essentials in reserve
    pub fn is_collapsing(&self) -> bool {
        let indicators = self.indicators();
        indicators.cash_flow < 0.0 && indicators.reserve_months < 1.0
    }

    /// Indicators after cutting discretionary and expansion spending by `pct` percent.
    /// The account itself is left untouched.
    pub fn simulate_expense_cut(&self, pct: f64) -> Result<HealthIndicators> {
        if !(0.0..=100.0).contains(&pct) {
            return Err(Error::InvalidData(format!(
                "expense cut must be between 0 and 100 percent, got {}",
                pct
            )));
        }

        let factor = 1.0 - pct / 100.0;
        let cut = self
            .expenses
            .iter()
            .map(|e| match e.category() {
                ExpenseCategory::NonEssentialVariable | ExpenseCategory::Expansion => {
                    e.with_amount(e.amount() * factor)
                }
                _ => Ok(e.clone()),
            })
            .collect::<Result<Vec<_>>>()?;

        let simulated = Snapshot::new(
            self.monthly_income,
            snapshot::group_expenses(&cut),
            self.total_reserves,
        );
        Ok(simulated.indicators())
    }
}

/// Expenses summed per category. Every category is always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseTotals {
    pub fixed_structural: f64,
    pub variable_structural: f64,
    pub non_essential_variable: f64,
    pub expansion: f64,
}

impl ExpenseTotals {
    pub fn get(&self, category: ExpenseCategory) -> f64 {
        match category {
            ExpenseCategory::FixedStructural => self.fixed_structural,
            ExpenseCategory::VariableStructural => self.variable_structural,
            ExpenseCategory::NonEssentialVariable => self.non_essential_variable,
            ExpenseCategory::Expansion => self.expansion,
        }
    }

    fn slot(&mut self, category: ExpenseCategory) -> &mut f64 {
        match category {
            ExpenseCategory::FixedStructural => &mut self.fixed_structural,
            ExpenseCategory::VariableStructural => &mut self.variable_structural,
            ExpenseCategory::NonEssentialVariable => &mut self.non_essential_variable,
            ExpenseCategory::Expansion => &mut self.expansion,
        }
    }

    pub fn add(&mut self, category: ExpenseCategory, amount: f64) {
        *self.slot(category) += amount;
    }

    /// Copy with one bucket multiplied by `factor`
    pub fn scale_category(mut self, category: ExpenseCategory, factor: f64) -> Self {
        *self.slot(category) *= factor;
        self
    }

    /// Copy with every bucket multiplied by `factor`
    pub fn scale(self, factor: f64) -> Self {
        ExpenseCategory::ALL
            .iter()
            .fold(self, |totals, &c| totals.scale_category(c, factor))
    }

    pub fn total(&self) -> f64 {
        ExpenseCategory::ALL.iter().map(|&c| self.get(c)).sum()
    }

    /// Fixed plus variable structural costs
    pub fn essential(&self) -> f64 {
        self.fixed_structural + self.variable_structural
    }
}

/// Immutable point-in-time financial state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    income: f64,
    expenses: ExpenseTotals,
    reserves: f64,
}

impl Snapshot {
    pub fn new(income: f64, expenses: ExpenseTotals, reserves: f64) -> Self {
        Self {
            income,
            expenses,
            reserves,
        }
    }

    pub fn income(&self) -> f64 {
        self.income
    }

    pub fn expenses(&self) -> &ExpenseTotals {
        &self.expenses
    }

    pub fn reserves(&self) -> f64 {
        self.reserves
    }

    pub fn total_expenses(&self) -> f64 {
        self.expenses.total()
    }

    pub fn with_income(&self, income: f64) -> Self {
        Self { income, ..*self }
    }

    pub fn with_expenses(&self, expenses: ExpenseTotals) -> Self {
        Self { expenses, ..*self }
    }

    pub fn with_reserves(&self, reserves: f64) -> Self {
        Self { reserves, ..*self }
    }

    pub fn indicators(&self) -> HealthIndicators {
        snapshot::compute_indicators(self)
    }
}

/// Derived health metrics of a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthIndicators {
    /// Income minus all expenses
    pub cash_flow: f64,
    /// 0-1000 blend of cash flow ratio and reserve coverage
    pub stability_score: u32,
    /// Essential expenses as a percentage of income (+inf without income)
    pub income_commitment_pct: f64,
    /// Months of essential expenses covered by reserves (+inf without essentials)
    pub reserve_months: f64,
}

pub(crate) fn validate_amount(value: f64, what: &str) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidData(format!(
            "{} must be a non-negative number, got {}",
            what, value
        )));
    }
    Ok(())
}
