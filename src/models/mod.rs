//! This module defines the domain data types exchanged with the expense API.

pub use budget::CategoryBudget;
pub use category::{Categories, Category, CategoryLookup, UNKNOWN_CATEGORY_LABEL};
pub use expense::{Expense, ExpenseUpdate, NewExpense};
pub use user::UserData;

mod budget;
mod category;
pub(crate) mod epoch_millis;
mod expense;
mod user;

/// Alias for the integer type the API uses for expense IDs.
pub type ExpenseId = i64;
/// Alias for the integer type the API uses for user IDs.
pub type UserId = i64;
/// Alias for the integer type the API uses for category IDs.
pub type CategoryId = i64;

/// Check that `amount` can be used as an expense amount or budget.
///
/// # Errors
/// Returns [crate::Error::NegativeAmount] if `amount` is negative, infinite or NaN.
pub(crate) fn validate_amount(amount: f64) -> Result<f64, crate::Error> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(amount)
    } else {
        Err(crate::Error::NegativeAmount(amount))
    }
}
