//! An in-process stand-in for the expense API, served on an ephemeral port.

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex, MutexGuard},
};

use axum::{
    Json, Router,
    extract::{Query, RawQuery, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    routing::{delete, get, post},
};
use serde_json::{Value, json};
use time::OffsetDateTime;

use crate::{
    endpoints,
    models::{Category, CategoryBudget, Expense, UserData, UserId, epoch_millis},
    session::Session,
};

pub(crate) const TEST_TOKEN: &str = "test-token";
pub(crate) const TEST_USER_ID: UserId = 7;
pub(crate) const TEST_PASSWORD: &str = "correct horse battery staple";

pub(crate) fn test_session() -> Session {
    Session {
        token: TEST_TOKEN.to_owned(),
        user_id: TEST_USER_ID,
        user_name: "Asha".to_owned(),
        user_photo: None,
    }
}

pub(crate) fn test_categories() -> Vec<Category> {
    ["Food", "Transport", "Rent"]
        .iter()
        .enumerate()
        .map(|(index, name)| Category {
            id: index as i64 + 1,
            name: (*name).to_owned(),
        })
        .collect()
}

struct MockState {
    expenses: Vec<Expense>,
    next_id: i64,
    categories: Vec<Category>,
    user: UserData,
    budgets: Vec<CategoryBudget>,
    page_size: Option<usize>,
    token_revoked: bool,
    reject_changes: bool,
    expense_requests: usize,
}

impl MockState {
    fn new() -> Self {
        let user = serde_json::from_value(json!({
            "id": TEST_USER_ID,
            "name": "Asha",
            "email": "asha@example.com",
            "totalBudget": null,
            "photoUrl": "https://example.com/asha.png"
        }))
        .expect("Could not create test user");

        Self {
            expenses: Vec::new(),
            next_id: 1,
            categories: test_categories(),
            user,
            budgets: Vec::new(),
            page_size: None,
            token_revoked: false,
            reject_changes: false,
            expense_requests: 0,
        }
    }

    fn insert(&mut self, mut expense: Expense) {
        expense.id = self.next_id;
        self.next_id += 1;
        self.expenses.push(expense);
    }
}

type SharedState = Arc<Mutex<MockState>>;

/// A running mock API. The server stops when the test's runtime shuts down.
pub(crate) struct MockApi {
    address: SocketAddr,
    state: SharedState,
}

impl MockApi {
    pub(crate) async fn spawn() -> Self {
        let state = Arc::new(Mutex::new(MockState::new()));

        let router = Router::new()
            .route(endpoints::LOG_IN, post(log_in))
            .route(endpoints::GET_EXPENSES, get(get_expenses))
            .route(endpoints::ADD_EXPENSE, post(add_expense))
            .route(endpoints::UPDATE_EXPENSE, post(update_expense))
            .route(endpoints::DELETE_EXPENSES, post(delete_expenses))
            .route(endpoints::GET_ALL_CATEGORIES, get(get_categories))
            .route(endpoints::GET_USER_DATA, get(get_user_data))
            .route(endpoints::UPDATE_USER_DATA, post(update_user_data))
            .route(endpoints::GET_CATEGORY_BUDGETS, get(get_category_budgets))
            .route(endpoints::SET_CATEGORY_BUDGETS, post(set_category_budgets))
            .route(endpoints::DELETE_CATEGORY_BUDGET, delete(delete_category_budget))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Could not bind mock API listener");
        let address = listener.local_addr().expect("Could not get mock API address");

        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Mock API server failed");
        });

        Self { address, state }
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().expect("Could not lock mock API state")
    }

    pub(crate) fn base_url(&self) -> String {
        format!("http://{}", self.address)
    }

    /// Create an expense owned by the test user. The ID is assigned by [MockApi::add_expenses].
    pub(crate) fn expense(&self, category_id: i64, amount: f64, date: OffsetDateTime) -> Expense {
        Expense {
            id: 0,
            user_id: TEST_USER_ID,
            category_id,
            amount,
            description: format!("Expense in category {category_id}"),
            date,
        }
    }

    pub(crate) fn add_expenses(&self, expenses: Vec<Expense>) {
        let mut state = self.lock();

        for expense in expenses {
            state.insert(expense);
        }
    }

    pub(crate) fn expenses(&self) -> Vec<Expense> {
        self.lock().expenses.clone()
    }

    pub(crate) fn budgets(&self) -> Vec<CategoryBudget> {
        self.lock().budgets.clone()
    }

    pub(crate) fn set_category_budgets(&self, budgets: Vec<CategoryBudget>) {
        self.lock().budgets = budgets;
    }

    pub(crate) fn set_total_budget(&self, total_budget: Option<f64>) {
        self.lock().user.total_budget = total_budget;
    }

    pub(crate) fn total_budget(&self) -> Option<f64> {
        self.lock().user.total_budget
    }

    /// Respond to expense listings with pages of at most `page_size` items and an explicit
    /// page count.
    pub(crate) fn set_page_size(&self, page_size: usize) {
        self.lock().page_size = Some(page_size);
    }

    /// Respond to every request with `403 Forbidden`.
    pub(crate) fn revoke_token(&self) {
        self.lock().token_revoked = true;
    }

    /// Acknowledge expense changes with `"status": false`.
    pub(crate) fn reject_changes(&self) {
        self.lock().reject_changes = true;
    }

    pub(crate) fn expense_requests(&self) -> usize {
        self.lock().expense_requests
    }
}

fn authorize(state: &MockState, headers: &HeaderMap) -> Result<(), StatusCode> {
    if state.token_revoked {
        return Err(StatusCode::FORBIDDEN);
    }

    let expected = format!("Bearer {TEST_TOKEN}");

    match headers.get(AUTHORIZATION) {
        Some(value) if value == expected.as_str() => Ok(()),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

fn parse_param<T: std::str::FromStr>(
    params: &HashMap<String, String>,
    name: &str,
) -> Result<Option<T>, StatusCode> {
    params
        .get(name)
        .map(|value| value.parse().map_err(|_| StatusCode::BAD_REQUEST))
        .transpose()
}

async fn log_in(Json(body): Json<Value>) -> Result<Json<Value>, StatusCode> {
    if body["password"] == TEST_PASSWORD {
        Ok(Json(json!({
            "token": TEST_TOKEN,
            "userId": TEST_USER_ID,
            "userName": "Asha"
        })))
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

async fn get_expenses(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    let mut state = state.lock().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    authorize(&state, &headers)?;
    state.expense_requests += 1;

    let user_id: UserId = parse_param(&params, "userId")?.ok_or(StatusCode::BAD_REQUEST)?;
    let start: i64 = parse_param(&params, "startDate")?.ok_or(StatusCode::BAD_REQUEST)?;
    let end: i64 = parse_param(&params, "endDate")?.ok_or(StatusCode::BAD_REQUEST)?;
    let page_no: usize = parse_param(&params, "pageNo")?.unwrap_or(1);
    let requested_size: Option<usize> = parse_param(&params, "pageSize")?;
    let category_id: Option<i64> = parse_param(&params, "categoryId")?;

    let matching: Vec<&Expense> = state
        .expenses
        .iter()
        .filter(|expense| expense.user_id == user_id)
        .filter(|expense| {
            let millis = epoch_millis::to_millis(expense.date);
            start <= millis && millis <= end
        })
        .filter(|expense| category_id.is_none_or(|id| expense.category_id == id))
        .collect();

    let body = match state.page_size {
        Some(page_size) => {
            let page_size = requested_size.map_or(page_size, |size| size.clamp(1, page_size));
            let total_pages = matching.len().div_ceil(page_size);
            let page: Vec<&Expense> = matching
                .into_iter()
                .skip((page_no.max(1) - 1) * page_size)
                .take(page_size)
                .collect();

            json!({ "content": page, "totalPages": total_pages })
        }
        None => json!(matching),
    };

    Ok(Json(body))
}

async fn add_expense(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(expense): Json<Expense>,
) -> Result<Json<Value>, StatusCode> {
    let mut state = state.lock().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    authorize(&state, &headers)?;

    if state.reject_changes {
        return Ok(Json(json!({ "status": false })));
    }

    state.insert(expense);

    Ok(Json(json!({ "status": true })))
}

async fn update_expense(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(update): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut state = state.lock().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    authorize(&state, &headers)?;

    let id = update["id"].as_i64().ok_or(StatusCode::BAD_REQUEST)?;
    let reject = state.reject_changes;

    let Some(expense) = state.expenses.iter_mut().find(|expense| expense.id == id) else {
        return Ok(Json(json!({ "status": false })));
    };

    if reject {
        return Ok(Json(json!({ "status": false })));
    }

    expense.amount = update["amount"].as_f64().ok_or(StatusCode::BAD_REQUEST)?;
    expense.category_id = update["categoryId"].as_i64().ok_or(StatusCode::BAD_REQUEST)?;
    expense.description = update["description"].as_str().unwrap_or_default().to_owned();
    expense.date = update["date"]
        .as_i64()
        .and_then(epoch_millis::from_millis)
        .ok_or(StatusCode::BAD_REQUEST)?;

    Ok(Json(json!({ "status": true })))
}

async fn delete_expenses(
    State(state): State<SharedState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Result<Json<Value>, StatusCode> {
    let mut state = state.lock().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    authorize(&state, &headers)?;

    let pairs: Vec<(String, i64)> = serde_urlencoded::from_str(&query.unwrap_or_default())
        .map_err(|_| StatusCode::BAD_REQUEST)?;
    let ids: Vec<i64> = pairs
        .into_iter()
        .filter(|(key, _)| key == "expenseId")
        .map(|(_, id)| id)
        .collect();

    if state.reject_changes || ids.is_empty() {
        return Ok(Json(json!({ "status": false })));
    }

    state.expenses.retain(|expense| !ids.contains(&expense.id));

    Ok(Json(json!({ "status": true })))
}

async fn get_categories(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Category>>, StatusCode> {
    let state = state.lock().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    authorize(&state, &headers)?;

    Ok(Json(state.categories.clone()))
}

async fn get_user_data(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<UserData>, StatusCode> {
    let state = state.lock().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    authorize(&state, &headers)?;

    Ok(Json(state.user.clone()))
}

async fn update_user_data(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(user): Json<UserData>,
) -> Result<Json<Value>, StatusCode> {
    let mut state = state.lock().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    authorize(&state, &headers)?;

    state.user = user;

    Ok(Json(json!({ "status": true })))
}

async fn get_category_budgets(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<Vec<CategoryBudget>>, StatusCode> {
    let state = state.lock().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    authorize(&state, &headers)?;

    Ok(Json(state.budgets.clone()))
}

async fn set_category_budgets(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(budgets): Json<Vec<CategoryBudget>>,
) -> Result<Json<Value>, StatusCode> {
    let mut state = state.lock().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    authorize(&state, &headers)?;

    state.budgets = budgets;

    Ok(Json(json!({ "status": true })))
}

async fn delete_category_budget(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    let mut state = state.lock().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    authorize(&state, &headers)?;

    let category_id: i64 = parse_param(&params, "categoryId")?.ok_or(StatusCode::BAD_REQUEST)?;
    state
        .budgets
        .retain(|budget| budget.category_id != category_id);

    Ok(Json(json!({ "status": true })))
}
