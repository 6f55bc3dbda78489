//! The HTTP client for the expense API.
//!
//! Every request carries the session's bearer token. When the API answers with
//! `401 Unauthorized` or `403 Forbidden` the session is cleared and
//! [Error::Unauthorized] is returned, so callers never keep using a stale session.

use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    Error,
    api::query::{ExpensePage, ExpensePageBody, ExpenseQuery},
    endpoints, logging,
    models::{
        Category, CategoryBudget, CategoryId, Expense, ExpenseId, ExpenseUpdate, NewExpense,
        UserData, UserId,
    },
    session::{Session, SessionContext},
    window::EvaluationWindow,
};

/// The credentials sent to log in.
#[derive(Debug, Serialize)]
pub struct LogInRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// The acknowledgement the API sends after changing expenses.
#[derive(Debug, Deserialize)]
struct Acknowledgement {
    status: bool,
}

/// A client for the expense API that shares its session with the rest of the application.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionContext,
}

impl ApiClient {
    /// Create a client for the API hosted at `base_url`, e.g. "https://example.com".
    ///
    /// # Errors
    /// Returns [Error::InvalidApiUrl] if `base_url` is not a valid URL.
    pub fn new(base_url: &str, session: SessionContext) -> Result<Self, Error> {
        let trimmed = base_url.trim_end_matches('/');

        reqwest::Url::parse(trimmed).map_err(|_| Error::InvalidApiUrl(base_url.to_owned()))?;

        Ok(Self {
            http: reqwest::Client::new(),
            base_url: trimmed.to_owned(),
            session,
        })
    }

    /// The session used to authorize requests.
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<String, Error> {
        let mut builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path));

        if !query.is_empty() {
            builder = builder.query(query);
        }

        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token);
        }

        if let Some(body) = body {
            builder = builder.json(body);
        }

        let request = builder.build()?;
        let url = request.url().clone();
        logging::log_request(request.method(), &url, body);

        let response = self.http.execute(request).await?;
        let status = response.status();
        let text = response.text().await?;
        logging::log_response(status, &url, &text);

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::warn!("The API rejected the session ({status}), clearing the session");
            self.session.clear();
            return Err(Error::Unauthorized(status));
        }

        if !status.is_success() {
            return Err(Error::UnexpectedStatus { status, body: text });
        }

        Ok(text)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, Error> {
        let text = self.send(Method::GET, path, query, None).await?;
        parse_json(&text)
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &impl Serialize,
    ) -> Result<T, Error> {
        let body = serde_json::to_value(body)?;
        let text = self.send(Method::POST, path, query, Some(&body)).await?;
        parse_json(&text)
    }

    /// Log in with an email and password and start a session with the result.
    ///
    /// # Errors
    /// Returns [Error::Unauthorized] if the credentials are rejected.
    pub async fn log_in(&self, email: &str, password: &str) -> Result<Session, Error> {
        let session: Session = self
            .post_json(endpoints::LOG_IN, &[], &LogInRequest { email, password })
            .await?;

        self.session.init(session.clone());

        Ok(session)
    }

    /// End the current session.
    pub fn log_out(&self) {
        self.session.clear();
    }

    /// Get a single page of expenses.
    pub async fn get_expenses(&self, query: &ExpenseQuery) -> Result<ExpensePage, Error> {
        let body: ExpensePageBody = self
            .get_json(endpoints::GET_EXPENSES, &query.to_pairs())
            .await?;

        Ok(body.into())
    }

    /// Get every expense of the signed in user in `window`, following all pages.
    ///
    /// # Errors
    /// Returns [Error::NotSignedIn] if there is no session.
    pub async fn get_all_expenses(
        &self,
        window: EvaluationWindow,
        category_id: Option<CategoryId>,
    ) -> Result<Vec<Expense>, Error> {
        let user_id = self.session.user_id()?;
        let query = ExpenseQuery::new(user_id, window).category(category_id);

        let first_page = self.get_expenses(&query).await?;
        let total_pages = first_page.total_pages;
        let mut expenses = first_page.expenses;

        for page_no in 2..=total_pages {
            let page = self.get_expenses(&query.page(page_no)).await?;
            expenses.extend(page.expenses);
        }

        tracing::debug!(
            "Fetched {} expenses across {total_pages} page(s)",
            expenses.len()
        );

        Ok(expenses)
    }

    /// Record a new expense for the signed in user.
    ///
    /// # Errors
    /// Returns [Error::NotSignedIn] if there is no session, or
    /// [Error::Rejected] if the API reports that the expense was not saved.
    pub async fn add_expense(&self, expense: NewExpense) -> Result<(), Error> {
        let user_id = self.session.user_id()?;
        let body = expense.into_expense(user_id);

        let acknowledgement: Acknowledgement =
            self.post_json(endpoints::ADD_EXPENSE, &[], &body).await?;

        check_acknowledgement(acknowledgement, "add the expense")
    }

    /// Save an edit to an existing expense.
    ///
    /// # Errors
    /// Returns [Error::Rejected] if the API reports that the edit was not saved.
    pub async fn update_expense(&self, update: &ExpenseUpdate) -> Result<(), Error> {
        let acknowledgement: Acknowledgement =
            self.post_json(endpoints::UPDATE_EXPENSE, &[], update).await?;

        check_acknowledgement(acknowledgement, "update the expense")
    }

    /// Delete the expenses with the IDs `expense_ids` in a single request.
    ///
    /// # Errors
    /// Returns [Error::NoExpensesSelected] if `expense_ids` is empty, or
    /// [Error::Rejected] if the API reports that the expenses were not deleted.
    pub async fn delete_expenses(&self, expense_ids: &[ExpenseId]) -> Result<(), Error> {
        if expense_ids.is_empty() {
            return Err(Error::NoExpensesSelected);
        }

        let query: Vec<(&str, String)> = expense_ids
            .iter()
            .map(|id| ("expenseId", id.to_string()))
            .collect();

        let text = self
            .send(Method::POST, endpoints::DELETE_EXPENSES, &query, None)
            .await?;

        check_acknowledgement(parse_json(&text)?, "delete the expenses")
    }

    /// Get every category.
    pub async fn get_all_categories(&self) -> Result<Vec<Category>, Error> {
        let categories: Option<Vec<Category>> =
            self.get_json(endpoints::GET_ALL_CATEGORIES, &[]).await?;

        Ok(categories.unwrap_or_default())
    }

    /// Get the user record, which includes the total budget.
    pub async fn get_user_data(&self, user_id: UserId) -> Result<UserData, Error> {
        self.get_json(endpoints::GET_USER_DATA, &[("userId", user_id.to_string())])
            .await
    }

    /// Save the user record.
    pub async fn update_user_data(&self, user: &UserData) -> Result<(), Error> {
        let body = serde_json::to_value(user)?;
        self.send(Method::POST, endpoints::UPDATE_USER_DATA, &[], Some(&body))
            .await?;

        Ok(())
    }

    /// Get the category budgets of the user.
    pub async fn get_category_budgets(
        &self,
        user_id: UserId,
    ) -> Result<Vec<CategoryBudget>, Error> {
        let budgets: Option<Vec<CategoryBudget>> = self
            .get_json(
                endpoints::GET_CATEGORY_BUDGETS,
                &[("userId", user_id.to_string())],
            )
            .await?;

        Ok(budgets.unwrap_or_default())
    }

    /// Replace the category budgets of the user with `budgets`.
    pub async fn set_category_budgets(
        &self,
        user_id: UserId,
        budgets: &[CategoryBudget],
    ) -> Result<(), Error> {
        let body = serde_json::to_value(budgets)?;
        self.send(
            Method::POST,
            endpoints::SET_CATEGORY_BUDGETS,
            &[("userId", user_id.to_string())],
            Some(&body),
        )
        .await?;

        Ok(())
    }

    /// Remove the budget for the category `category_id`.
    pub async fn delete_category_budget(
        &self,
        user_id: UserId,
        category_id: CategoryId,
    ) -> Result<(), Error> {
        self.send(
            Method::DELETE,
            endpoints::DELETE_CATEGORY_BUDGET,
            &[
                ("userId", user_id.to_string()),
                ("categoryId", category_id.to_string()),
            ],
            None,
        )
        .await?;

        Ok(())
    }
}

/// Parse a JSON response body, treating an empty body as `null`.
fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, Error> {
    let text = if text.trim().is_empty() { "null" } else { text };

    serde_json::from_str(text).map_err(|error| Error::InvalidResponse(error.to_string()))
}

fn check_acknowledgement(
    acknowledgement: Acknowledgement,
    action: &'static str,
) -> Result<(), Error> {
    if acknowledgement.status {
        Ok(())
    } else {
        tracing::error!("The API refused to {action}");
        Err(Error::Rejected(action))
    }
}
