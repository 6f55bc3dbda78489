//! Expense aggregation for charts and budget checks.
//!
//! Provides functions to group expenses by category with their share of total
//! spending, and to bucket expenses into a dense series covering the last seven
//! calendar days. All functions are pure and recompute their output from the
//! full list of expenses on every call.

use std::collections::HashMap;

use time::{Date, Duration, OffsetDateTime};

use crate::models::{Categories, CategoryId, Expense};

/// The number of calendar days covered by [aggregate_last_seven_days].
pub const DAYS_IN_WEEK: usize = 7;

/// Total spending in one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category_id: CategoryId,
    /// The category name, or the unknown category label if the category no longer exists.
    pub category_name: String,
    /// The sum of the expenses in the category.
    pub amount: f64,
    /// `amount` as a percentage of the total across all categories.
    pub percentage: f64,
}

/// Total spending on one calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyTotal {
    pub date: Date,
    pub amount: f64,
    /// Whether `amount` equals the largest amount in the series. Ties are all flagged.
    pub is_maximum: bool,
}

/// The sum of all expense amounts.
pub fn total_spent(expenses: &[Expense]) -> f64 {
    expenses.iter().map(|expense| expense.amount).sum()
}

/// Sums expense amounts per category.
///
/// # Returns
/// Pairs of category ID and total, in the order each category was first seen.
pub fn totals_by_category(expenses: &[Expense]) -> Vec<(CategoryId, f64)> {
    let mut totals: Vec<(CategoryId, f64)> = Vec::new();
    let mut positions: HashMap<CategoryId, usize> = HashMap::new();

    for expense in expenses {
        match positions.get(&expense.category_id) {
            Some(&position) => totals[position].1 += expense.amount,
            None => {
                positions.insert(expense.category_id, totals.len());
                totals.push((expense.category_id, expense.amount));
            }
        }
    }

    totals
}

/// Groups expenses by category and calculates each category's share of spending.
///
/// Categories are looked up in `categories` for their display name, falling
/// back to the unknown category label. Entries whose percentage is not
/// positive are dropped, so an empty list or a zero total produces no entries.
///
/// # Returns
/// One entry per category in first-seen order.
pub fn aggregate_by_category(expenses: &[Expense], categories: &Categories) -> Vec<CategoryTotal> {
    let totals = totals_by_category(expenses);
    let total_amount: f64 = totals.iter().map(|(_, amount)| amount).sum();

    totals
        .into_iter()
        .map(|(category_id, amount)| {
            let percentage = if total_amount == 0.0 {
                0.0
            } else {
                amount / total_amount * 100.0
            };

            CategoryTotal {
                category_id,
                category_name: categories.lookup(category_id).display_name().to_owned(),
                amount,
                percentage,
            }
        })
        .filter(|entry| entry.percentage > 0.0)
        .collect()
}

/// The seven calendar days ending on `today`, oldest first.
pub fn last_seven_days(today: Date) -> Vec<Date> {
    (0..DAYS_IN_WEEK as i64)
        .rev()
        .map(|days_ago| today - Duration::days(days_ago))
        .collect()
}

/// Sums expenses per calendar day for the seven days ending on `reference`'s day.
///
/// Calendar days are taken in the UTC offset of `reference`, so callers pick
/// the time zone by converting `reference` before calling this function.
/// Expenses outside the window are ignored and days without expenses have an
/// amount of zero.
///
/// # Returns
/// Exactly seven entries in chronological order.
pub fn aggregate_last_seven_days(
    expenses: &[Expense],
    reference: OffsetDateTime,
) -> Vec<DailyTotal> {
    let offset = reference.offset();
    let days = last_seven_days(reference.date());
    let mut amounts = [0.0; DAYS_IN_WEEK];

    for expense in expenses {
        let day = expense.date.to_offset(offset).date();

        if let Some(position) = days.iter().position(|&date| date == day) {
            amounts[position] += expense.amount;
        }
    }

    let maximum = amounts.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    days.into_iter()
        .zip(amounts)
        .map(|(date, amount)| DailyTotal {
            date,
            amount,
            is_maximum: amount == maximum,
        })
        .collect()
}
