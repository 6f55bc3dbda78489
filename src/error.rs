//! Defines the crate level error type and its conversions from the libraries used to talk to the
//! expense API and write exports.

use reqwest::StatusCode;
use time::OffsetDateTime;

use crate::models::{CategoryId, ExpenseId};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An operation that needs a signed in user was attempted without a session.
    #[error("not signed in, log in first to create a session")]
    NotSignedIn,

    /// The API rejected the session token with a 401 or 403 status.
    ///
    /// The session is cleared before this error is returned, so the caller
    /// should send the user back to the log in step.
    #[error("the session is no longer valid (HTTP {0}), log in again")]
    Unauthorized(StatusCode),

    /// The API responded with an unexpected, non-successful status code.
    #[error("the API responded with HTTP {status}: {body}")]
    UnexpectedStatus {
        /// The status code of the response.
        status: StatusCode,
        /// The (possibly truncated) response body.
        body: String,
    },

    /// The API acknowledged the request but reported `"status": false`.
    #[error("the API rejected the request to {0}")]
    Rejected(&'static str),

    /// The request could not be sent or the response could not be read.
    ///
    /// Callers should pass in the original error as a string.
    #[error("could not reach the expense API: {0}")]
    RequestFailed(String),

    /// The response body could not be parsed as the expected JSON.
    #[error("could not parse the API response: {0}")]
    InvalidResponse(String),

    /// The base URL for the API is not a valid URL.
    #[error("invalid API URL \"{0}\"")]
    InvalidApiUrl(String),

    /// A date in the future was used to create an expense.
    ///
    /// Expenses record events that have already happened, therefore future
    /// dates are not allowed.
    #[error("{0} is a date in the future, which is not allowed")]
    FutureDate(OffsetDateTime),

    /// A negative, infinite or NaN amount was used for an expense or budget.
    #[error("{0} is not a valid amount, amounts must be zero or more")]
    NegativeAmount(f64),

    /// The start of a date range came after its end.
    #[error("the date range starts ({0}) after it ends ({1})")]
    InvalidDateRange(String, String),

    /// A date string could not be parsed.
    #[error("could not parse \"{0}\" as a date, expected YYYY-MM-DD")]
    InvalidDate(String),

    /// The category ID does not refer to a known category.
    #[error("the category ID {0} does not refer to a valid category")]
    InvalidCategory(CategoryId),

    /// Tried to delete expenses without giving any IDs.
    #[error("no expenses were selected for deletion")]
    NoExpensesSelected,

    /// Tried to update an expense that is not in the current listing.
    #[error("the expense {0} could not be found")]
    ExpenseNotFound(ExpenseId),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The CSV export could not be written.
    #[error("could not write the CSV export: {0}")]
    CsvError(String),

    /// A file could not be read or written.
    #[error("I/O error: {0}")]
    IoError(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            Error::InvalidResponse(value.to_string())
        } else {
            tracing::error!("an unhandled request error occurred: {}", value);
            Error::RequestFailed(value.to_string())
        }
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Error::CsvError(value.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::IoError(value.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::JSONSerializationError(value.to_string())
    }
}

impl Error {
    /// Whether the user needs to log in (again) to recover from this error.
    pub fn requires_log_in(&self) -> bool {
        matches!(self, Error::NotSignedIn | Error::Unauthorized(_))
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use crate::Error;

    #[test]
    fn session_errors_require_log_in() {
        assert!(Error::NotSignedIn.requires_log_in());
        assert!(Error::Unauthorized(StatusCode::FORBIDDEN).requires_log_in());
        assert!(!Error::Rejected("addExpense").requires_log_in());
    }

    #[test]
    fn io_error_keeps_message() {
        let error: Error = std::io::Error::other("disk full").into();

        assert_eq!(error, Error::IoError("disk full".to_owned()));
    }
}
