//! Finflow tracks personal spending against budgets.
//!
//! This library talks to a remote expense API, aggregates the signed in user's
//! expenses by category and by day, and checks the totals against the
//! configured budgets. The results can be rendered as an HTML report or
//! exported to CSV.
//!
//! The typical flow is:
//! 1. Create a [SessionContext] and an [ApiClient], then log in.
//! 2. Construct a [DataService] once and pass it to whatever needs data.
//! 3. Call [DataService::dashboard] to fetch the month so far and evaluate it.

pub mod aggregation;
pub mod api;
pub mod budget;
mod endpoints;
mod error;
pub mod export;
mod logging;
pub mod models;
pub mod palette;
pub mod report;
pub mod services;
pub mod session;
pub mod timezone;
pub mod window;

#[cfg(test)]
mod test_utils;

pub use aggregation::{CategoryTotal, DailyTotal, aggregate_by_category, aggregate_last_seven_days};
pub use api::ApiClient;
pub use budget::{OverBudgetStatus, evaluate_budgets};
pub use error::Error;
pub use logging::LOG_BODY_LENGTH_LIMIT;
pub use services::{BudgetData, Dashboard, DataService};
pub use session::{Session, SessionContext};
pub use window::EvaluationWindow;
