//! Compares spending against the total and per-category budgets.
//!
//! A ceiling is only exceeded when spending is strictly greater than it:
//! spending exactly the budgeted amount is still within budget.

use std::collections::BTreeSet;

use crate::{
    aggregation::{total_spent, totals_by_category},
    models::{CategoryBudget, CategoryId, Expense},
};

/// Which budgets have been exceeded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverBudgetStatus {
    /// Whether total spending exceeds the total budget.
    pub total: bool,
    /// The categories whose spending exceeds their category budget.
    pub categories: BTreeSet<CategoryId>,
}

impl OverBudgetStatus {
    /// Whether any budget has been exceeded.
    pub fn any(&self) -> bool {
        self.total || !self.categories.is_empty()
    }

    pub fn is_category_over(&self, category_id: CategoryId) -> bool {
        self.categories.contains(&category_id)
    }
}

/// Spending against a single category budget.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetUsage {
    pub category_id: CategoryId,
    pub category_name: String,
    pub spent: f64,
    pub budget: f64,
    /// `budget - spent`, negative once the budget has been exceeded.
    pub remaining: f64,
    pub is_over: bool,
}

/// Spending against the total budget.
#[derive(Debug, Clone, PartialEq)]
pub struct TotalBudgetUsage {
    pub spent: f64,
    /// `None` if no total budget has been configured.
    pub budget: Option<f64>,
    pub is_over: bool,
}

impl TotalBudgetUsage {
    /// The amount left to spend, if a total budget has been configured.
    pub fn remaining(&self) -> Option<f64> {
        self.budget.map(|budget| budget - self.spent)
    }
}

fn spent_in(totals: &[(CategoryId, f64)], category_id: CategoryId) -> f64 {
    totals
        .iter()
        .find(|(id, _)| *id == category_id)
        .map(|(_, amount)| *amount)
        .unwrap_or(0.0)
}

/// Checks `expenses` against the total budget and each category budget.
///
/// A `total_budget` of `None` means no total budget is configured, so the
/// total is never over. Only categories with an entry in `category_budgets`
/// are checked.
pub fn evaluate_budgets(
    expenses: &[Expense],
    total_budget: Option<f64>,
    category_budgets: &[CategoryBudget],
) -> OverBudgetStatus {
    let total = total_budget.is_some_and(|budget| total_spent(expenses) > budget);

    let totals = totals_by_category(expenses);
    let categories = category_budgets
        .iter()
        .filter(|budget| spent_in(&totals, budget.category_id) > budget.budget)
        .map(|budget| budget.category_id)
        .collect();

    OverBudgetStatus { total, categories }
}

/// Calculates the spending against each configured category budget.
///
/// # Returns
/// One entry per category budget, in the order the budgets are given.
pub fn budget_usage(expenses: &[Expense], category_budgets: &[CategoryBudget]) -> Vec<BudgetUsage> {
    let totals = totals_by_category(expenses);

    category_budgets
        .iter()
        .map(|budget| {
            let spent = spent_in(&totals, budget.category_id);

            BudgetUsage {
                category_id: budget.category_id,
                category_name: budget.category_name.clone(),
                spent,
                budget: budget.budget,
                remaining: budget.budget - spent,
                is_over: spent > budget.budget,
            }
        })
        .collect()
}

/// Calculates the spending against the total budget.
pub fn total_budget_usage(expenses: &[Expense], total_budget: Option<f64>) -> TotalBudgetUsage {
    let spent = total_spent(expenses);

    TotalBudgetUsage {
        spent,
        budget: total_budget,
        is_over: total_budget.is_some_and(|budget| spent > budget),
    }
}
