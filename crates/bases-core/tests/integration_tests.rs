//! Integration tests for bases-core
//!
//! These tests exercise the full account → projection → scenarios →
//! recommendations → alerts workflow, with history feeding back into scores.

use std::sync::Arc;

use bases_core::{
    alerts::LOW_BALANCE_KEY,
    project_months,
    recommend::keys,
    snapshot::{compute_indicators, group_expenses, MAX_STABILITY_SCORE},
    Account, Advisor, AlertKind, Classification, Decision, DecisionKind, DecisionResult,
    EngineConfig, Expense, ExpenseCategory, ExpenseTotals, HistoryRepository, InMemoryHistory,
    NamedAccount, ProjectionStrategy, ScenarioEvaluator, Snapshot, StrategyBundle,
};

fn expense(id: &str, amount: f64, category: ExpenseCategory) -> Expense {
    Expense::new(id, format!("Despesa {}", id), amount, category, "Geral")
        .expect("Failed to build expense")
}

fn baseline_expenses() -> Vec<Expense> {
    vec![
        expense("d1", 3000.0, ExpenseCategory::FixedStructural),
        expense("d2", 1000.0, ExpenseCategory::VariableStructural),
    ]
}

/// Income 5000, expenses 3000 fixed + 1000 variable, reserves 1000
fn baseline_account() -> Account {
    Account::new(5000.0, baseline_expenses(), 1000.0).expect("Failed to build account")
}

fn evaluator() -> ScenarioEvaluator {
    ScenarioEvaluator::new(EngineConfig::default().scenarios)
}

// =============================================================================
// Reference Scenario Fixtures
// =============================================================================

#[test]
fn test_reference_scenarios_balance_mode() {
    let mut extra_expenses = baseline_expenses();
    extra_expenses.push(expense("d3", 1200.0, ExpenseCategory::NonEssentialVariable));

    let scenarios = vec![
        NamedAccount::new(
            "Aumento de Receita",
            Account::new(5500.0, baseline_expenses(), 1000.0).unwrap(),
        ),
        NamedAccount::new(
            "Nova Despesa",
            Account::new(5000.0, extra_expenses, 1000.0).unwrap(),
        ),
        NamedAccount::new(
            "Receita Menor",
            Account::new(4080.0, baseline_expenses(), 1000.0).unwrap(),
        ),
    ];

    let results = evaluator()
        .compare_balances(&baseline_account(), &scenarios, 1)
        .unwrap();

    let summary: Vec<_> = results
        .iter()
        .map(|r| (r.projected_balance(), r.variance().unwrap(), r.classification))
        .collect();

    assert_eq!(
        summary,
        vec![
            (2500.0, 1500.0, Classification::Opportunity),
            (800.0, -200.0, Classification::Risk),
            (1080.0, 80.0, Classification::Informational),
        ]
    );
    assert_eq!(
        results[0].description,
        "Após 1 meses, o saldo projetado será de R$ 2500.00."
    );
}

#[test]
fn test_grouping_fills_every_category() {
    let totals = group_expenses(&[
        expense("1", 1500.0, ExpenseCategory::FixedStructural),
        expense("2", 1000.0, ExpenseCategory::VariableStructural),
    ]);

    assert_eq!(
        totals,
        ExpenseTotals {
            fixed_structural: 1500.0,
            variable_structural: 1000.0,
            non_essential_variable: 0.0,
            expansion: 0.0,
        }
    );
}

#[test]
fn test_zero_income_indicators() {
    let account = Account::new(
        0.0,
        vec![expense("rent", 800.0, ExpenseCategory::FixedStructural)],
        200.0,
    )
    .unwrap();

    let indicators = account.indicators();
    assert_eq!(indicators.stability_score, 0);
    assert!(indicators.income_commitment_pct.is_infinite());
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn test_grouping_invariant_over_mixed_lists() {
    let amounts = [0.0, 12.5, 999.99, 3000.0, 0.01, 47.0, 150.25, 8000.0];
    for len in 0..=amounts.len() {
        let expenses: Vec<_> = amounts[..len]
            .iter()
            .enumerate()
            .map(|(i, &amount)| {
                let category = ExpenseCategory::ALL[i % ExpenseCategory::ALL.len()];
                expense(&i.to_string(), amount, category)
            })
            .collect();

        let expected: f64 = expenses.iter().map(Expense::amount).sum();
        assert!((group_expenses(&expenses).total() - expected).abs() < 1e-9);
    }
}

#[test]
fn test_reserve_months_sentinel() {
    let account = Account::new(
        2000.0,
        vec![expense("fun", 300.0, ExpenseCategory::NonEssentialVariable)],
        0.0,
    )
    .unwrap();
    let indicators = account.indicators();
    assert!(indicators.reserve_months.is_infinite() && indicators.reserve_months > 0.0);
}

#[test]
fn test_stability_score_always_clamped() {
    let incomes = [0.0, 1.0, 5000.0, 1e9];
    let reserves = [-1e12, -1.0, 0.0, 1000.0, 1e12];
    let spends = [0.0, 1.0, 4000.0, 1e10];

    for &income in &incomes {
        for &reserve in &reserves {
            for &spend in &spends {
                let totals = ExpenseTotals {
                    fixed_structural: spend,
                    variable_structural: spend / 2.0,
                    non_essential_variable: spend / 4.0,
                    expansion: 0.0,
                };
                let score = compute_indicators(&Snapshot::new(income, totals, reserve))
                    .stability_score;
                assert!(score <= MAX_STABILITY_SCORE);
            }
        }
    }
}

#[test]
fn test_projection_determinism() {
    let account = baseline_account();
    let strategies = [
        ProjectionStrategy::income_growth(0.8).unwrap(),
        ProjectionStrategy::expense_inflation(0.4).unwrap(),
        ProjectionStrategy::expense_cut(ExpenseCategory::FixedStructural, 5.0).unwrap(),
    ];

    let first = project_months(&account, 36, &strategies).unwrap();
    let second = project_months(&account, 36, &strategies).unwrap();
    assert_eq!(first.len(), 36);
    assert_eq!(first, second);
}

#[test]
fn test_higher_growth_never_projects_lower_balance() {
    let account = baseline_account();
    let growth_rates = [0.0, 0.5, 1.0, 2.0, 5.0];
    let inflation = ProjectionStrategy::expense_inflation(1.0).unwrap();

    let finals: Vec<f64> = growth_rates
        .iter()
        .map(|&pct| {
            let strategies = [ProjectionStrategy::income_growth(pct).unwrap(), inflation];
            let months = project_months(&account, 24, &strategies).unwrap();
            months.last().unwrap().reserves()
        })
        .collect();

    assert!(finals.windows(2).all(|w| w[1] >= w[0]));

    // Lower inflation with equal growth is never worse
    let growth = ProjectionStrategy::income_growth(1.0).unwrap();
    let low = project_months(
        &account,
        24,
        &[growth, ProjectionStrategy::expense_inflation(0.2).unwrap()],
    )
    .unwrap();
    let high = project_months(
        &account,
        24,
        &[growth, ProjectionStrategy::expense_inflation(0.9).unwrap()],
    )
    .unwrap();
    assert!(low.last().unwrap().reserves() >= high.last().unwrap().reserves());
}

#[test]
fn test_zero_horizon_is_an_error() {
    assert!(project_months(&baseline_account(), 0, &[]).is_err());
    assert!(evaluator()
        .rank_by_stability(&baseline_account(), &[], 0)
        .is_err());
}

#[test]
fn test_negative_inputs_fail_fast() {
    assert!(Account::new(-1.0, vec![], 0.0).is_err());
    assert!(Expense::new("x", "x", -0.01, ExpenseCategory::Expansion, "").is_err());
    assert!(ProjectionStrategy::income_growth(-1.0).is_err());
}

// =============================================================================
// Advisor Workflow
// =============================================================================

fn poor_account() -> Account {
    Account::new(5000.0, baseline_expenses(), 500.0).unwrap()
}

#[test]
fn test_alert_ordering_type_then_impact() {
    let advisor = Advisor::new(
        &EngineConfig::default(),
        Arc::new(InMemoryHistory::new()),
        "user",
    )
    .unwrap();

    let alerts = advisor.alerts(&poor_account()).unwrap();
    assert!(!alerts.is_empty());

    for pair in alerts.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        let ordered = a.kind.priority() < b.kind.priority()
            || (a.kind == b.kind && a.estimated_impact >= b.estimated_impact);
        assert!(ordered, "{:?} before {:?}", a.kind, b.kind);
    }
    assert_eq!(alerts.last().unwrap().key, LOW_BALANCE_KEY);
    assert_eq!(alerts.last().unwrap().kind, AlertKind::Informational);
}

#[test]
fn test_history_feedback_loop() {
    let history = Arc::new(InMemoryHistory::new());
    let advisor = Advisor::new(&EngineConfig::default(), history.clone(), "user").unwrap();
    let account = baseline_account();

    let before = advisor.recommend_all(&account).unwrap();

    for (i, impact) in [40.0, 60.0].into_iter().enumerate() {
        let decision = Decision::new(
            DecisionKind::Simulation,
            "Simulou aumento de receita",
            account.snapshot_now(),
        )
        .with_key(keys::GROW_INCOME)
        .with_result(DecisionResult {
            score: 20.0,
            estimated_impact: impact,
        });
        advisor.record_decision(decision).unwrap();
        assert_eq!(history.len("user"), i + 1);
    }

    let insights = history.generate_insights("user").unwrap();
    assert_eq!(insights.get(keys::GROW_INCOME).unwrap().average_impact, 50.0);

    let after = advisor.recommend_all(&account).unwrap();
    let score = |recs: &[bases_core::Recommendation], key: &str| {
        recs.iter().find(|r| r.id == key).unwrap().final_score
    };

    assert!((score(&after, keys::GROW_INCOME) - score(&before, keys::GROW_INCOME) * 1.5).abs() < 0.01);
    assert_eq!(
        score(&after, keys::REDUCE_NON_ESSENTIAL),
        score(&before, keys::REDUCE_NON_ESSENTIAL)
    );
    assert_eq!(after[0].id, keys::GROW_INCOME);
}

#[test]
fn test_stability_ranking_with_catalog_like_bundles() {
    let bundles = vec![
        StrategyBundle::new(
            "Inflação",
            "Despesas sobem 1% ao mês",
            vec![ProjectionStrategy::expense_inflation(1.0).unwrap()],
        ),
        StrategyBundle::new("Nada muda", "", vec![]),
        StrategyBundle::new(
            "Crescimento",
            "Receita sobe 1% ao mês",
            vec![ProjectionStrategy::income_growth(1.0).unwrap()],
        ),
    ];

    let ranked = evaluator()
        .rank_by_stability(&baseline_account(), &bundles, 12)
        .unwrap();

    let names: Vec<_> = ranked.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Crescimento", "Nada muda", "Inflação"]);
    assert_eq!(ranked[0].classification, Classification::Opportunity);
    assert_eq!(ranked[1].classification, Classification::Informational);
    assert_eq!(ranked[2].classification, Classification::Risk);
}
