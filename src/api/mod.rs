//! A typed client for the expense tracking REST API.
//!
//! The API itself is owned by another service; this module only consumes it.

pub use client::{ApiClient, LogInRequest};
pub use query::{DEFAULT_PAGE_SIZE, ExpensePage, ExpenseQuery};

mod client;
mod query;
