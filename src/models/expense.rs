//! Defines the expense model and the validated payloads used to create and edit expenses.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    models::{CategoryId, ExpenseId, UserId, epoch_millis, validate_amount},
};

/// A single recorded spend event.
///
/// Expenses are owned by a single user and are never shared between users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// The ID of the user that recorded the expense.
    pub user_id: UserId,
    /// The ID of the category the expense belongs to.
    pub category_id: CategoryId,
    /// The amount of money spent.
    pub amount: f64,
    /// A text description of what the money was spent on.
    #[serde(default)]
    pub description: String,
    /// When the money was spent, sent as epoch milliseconds.
    #[serde(with = "epoch_millis")]
    pub date: OffsetDateTime,
}

/// A validated expense that has not been sent to the API yet.
///
/// To create a new `NewExpense`, use [NewExpense::build].
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    category_id: CategoryId,
    amount: f64,
    description: String,
    date: OffsetDateTime,
}

impl NewExpense {
    /// Validate the fields for a new expense.
    ///
    /// `now` is the current time and is used to reject dates in the future.
    ///
    /// # Errors
    /// Returns [Error::NegativeAmount] if `amount` is negative or not a
    /// finite number, or [Error::FutureDate] if `date` is after `now`.
    pub fn build(
        category_id: CategoryId,
        amount: f64,
        description: &str,
        date: OffsetDateTime,
        now: OffsetDateTime,
    ) -> Result<Self, Error> {
        let amount = validate_amount(amount)?;

        if date > now {
            return Err(Error::FutureDate(date));
        }

        Ok(Self {
            category_id,
            amount,
            description: description.trim().to_owned(),
            date,
        })
    }

    /// The category the expense will be filed under.
    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }

    /// Create the request body for the API.
    ///
    /// The API assigns the ID, so the body is sent with an ID of zero.
    pub fn into_expense(self, user_id: UserId) -> Expense {
        Expense {
            id: 0,
            user_id,
            category_id: self.category_id,
            amount: self.amount,
            description: self.description,
            date: self.date,
        }
    }
}

/// The fields of an existing expense that may be edited.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseUpdate {
    /// The ID of the expense to edit.
    pub id: ExpenseId,
    /// The new amount.
    pub amount: f64,
    /// The new description.
    pub description: String,
    /// The new date, sent as epoch milliseconds.
    #[serde(with = "epoch_millis")]
    pub date: OffsetDateTime,
    /// The new category.
    pub category_id: CategoryId,
}

impl ExpenseUpdate {
    /// Validate an edit to `expense`.
    ///
    /// Edits follow the same rules as new expenses.
    ///
    /// # Errors
    /// Returns [Error::NegativeAmount] or [Error::FutureDate], see [NewExpense::build].
    pub fn build(expense: &Expense, now: OffsetDateTime) -> Result<Self, Error> {
        let validated = NewExpense::build(
            expense.category_id,
            expense.amount,
            &expense.description,
            expense.date,
            now,
        )?;

        Ok(Self {
            id: expense.id,
            amount: validated.amount,
            description: validated.description,
            date: validated.date,
            category_id: validated.category_id,
        })
    }
}
