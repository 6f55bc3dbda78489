//! Defines the per-category spending caps configured by the user.

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    models::{CategoryId, validate_amount},
};

/// A spending cap for a single category.
///
/// A category without a `CategoryBudget` has no cap and is never reported as
/// over budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBudget {
    /// The ID of the capped category.
    pub category_id: CategoryId,
    /// The name of the category at the time the budget was saved.
    #[serde(default)]
    pub category_name: String,
    /// The most that should be spent in the category.
    pub budget: f64,
}

impl CategoryBudget {
    /// Create a category budget.
    ///
    /// # Errors
    /// Returns [Error::NegativeAmount] if `budget` is negative or not a finite number.
    pub fn new(category_id: CategoryId, category_name: &str, budget: f64) -> Result<Self, Error> {
        Ok(Self {
            category_id,
            category_name: category_name.to_owned(),
            budget: validate_amount(budget)?,
        })
    }
}
