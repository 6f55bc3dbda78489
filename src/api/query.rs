//! Query parameters and paginated responses for listing expenses.

use serde::Deserialize;

use crate::{
    models::{CategoryId, Expense, UserId},
    window::EvaluationWindow,
};

/// The number of expenses requested per page when none is specified.
pub const DEFAULT_PAGE_SIZE: u64 = 100;

/// The parameters for a single page of expenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpenseQuery {
    pub user_id: UserId,
    pub window: EvaluationWindow,
    /// The page to fetch, starting from one.
    pub page_no: u64,
    pub page_size: u64,
    /// Only list expenses in this category.
    pub category_id: Option<CategoryId>,
}

impl ExpenseQuery {
    /// Query the first page of all expenses in `window`.
    pub fn new(user_id: UserId, window: EvaluationWindow) -> Self {
        Self {
            user_id,
            window,
            page_no: 1,
            page_size: DEFAULT_PAGE_SIZE,
            category_id: None,
        }
    }

    pub fn category(mut self, category_id: Option<CategoryId>) -> Self {
        self.category_id = category_id;
        self
    }

    pub fn page(mut self, page_no: u64) -> Self {
        self.page_no = page_no;
        self
    }

    pub fn page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// The query string parameters in the order the API documents them.
    pub(crate) fn to_pairs(self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("userId", self.user_id.to_string()),
            ("startDate", self.window.start_millis().to_string()),
            ("endDate", self.window.end_millis().to_string()),
            ("pageNo", self.page_no.to_string()),
            ("pageSize", self.page_size.to_string()),
        ];

        if let Some(category_id) = self.category_id {
            pairs.push(("categoryId", category_id.to_string()));
        }

        pairs
    }
}

/// One page of expenses.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpensePage {
    pub expenses: Vec<Expense>,
    /// The number of pages available for the query, at least one.
    pub total_pages: u64,
}

/// The shapes the API may use for a page of expenses.
///
/// A bare array is a single, complete page. Paginated responses must carry an
/// explicit `totalPages` field.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum ExpensePageBody {
    Paginated {
        #[serde(alias = "content", alias = "items")]
        expenses: Vec<Expense>,
        #[serde(rename = "totalPages")]
        total_pages: u64,
    },
    Unpaginated(Vec<Expense>),
}

impl From<ExpensePageBody> for ExpensePage {
    fn from(body: ExpensePageBody) -> Self {
        match body {
            ExpensePageBody::Paginated {
                expenses,
                total_pages,
            } => ExpensePage {
                expenses,
                total_pages: total_pages.max(1),
            },
            ExpensePageBody::Unpaginated(expenses) => ExpensePage {
                expenses,
                total_pages: 1,
            },
        }
    }
}
