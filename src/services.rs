//! The data-loading service shared by every view of the expenses.
//!
//! A [DataService] is constructed once at start up and passed to whatever needs
//! categories, budgets or expenses. It owns the API client and the category
//! cache, which lives until the user logs out.

use std::sync::Arc;

use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::{
    Error,
    aggregation::{
        CategoryTotal, DailyTotal, aggregate_by_category, aggregate_last_seven_days, total_spent,
    },
    api::{ApiClient, ExpensePage, ExpenseQuery},
    budget::{
        BudgetUsage, OverBudgetStatus, TotalBudgetUsage, budget_usage, evaluate_budgets,
        total_budget_usage,
    },
    models::{
        Categories, CategoryBudget, CategoryId, Expense, ExpenseId, ExpenseUpdate, NewExpense,
        UserData,
    },
    window::EvaluationWindow,
};

/// The budgets configured by the signed in user.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetData {
    /// The ceiling on all spending, if one is configured.
    pub total_budget: Option<f64>,
    pub category_budgets: Vec<CategoryBudget>,
    /// The user record the total budget was read from.
    pub user: UserData,
}

/// A snapshot of the current month's spending and how it compares to the budgets.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub window: EvaluationWindow,
    /// The expenses inside `window`.
    pub expenses: Vec<Expense>,
    pub category_totals: Vec<CategoryTotal>,
    pub daily_totals: Vec<DailyTotal>,
    pub total_spent: f64,
    pub over_budget: OverBudgetStatus,
    pub budget_usage: Vec<BudgetUsage>,
    pub total_budget_usage: TotalBudgetUsage,
}

impl Dashboard {
    /// Run the aggregation and budget checks over `expenses`.
    ///
    /// `expenses` may reach past the start of `window` so that the seven day
    /// series is complete early in the month. Only the expenses inside `window`
    /// count towards the category totals and budgets. `now` anchors the seven
    /// day series and its offset decides calendar days.
    pub fn build(
        window: EvaluationWindow,
        expenses: Vec<Expense>,
        categories: &Categories,
        budgets: &BudgetData,
        now: OffsetDateTime,
    ) -> Self {
        let daily_totals = aggregate_last_seven_days(&expenses, now);
        let expenses: Vec<Expense> = expenses
            .into_iter()
            .filter(|expense| window.contains(expense.date))
            .collect();

        Self {
            window,
            category_totals: aggregate_by_category(&expenses, categories),
            daily_totals,
            total_spent: total_spent(&expenses),
            over_budget: evaluate_budgets(
                &expenses,
                budgets.total_budget,
                &budgets.category_budgets,
            ),
            budget_usage: budget_usage(&expenses, &budgets.category_budgets),
            total_budget_usage: total_budget_usage(&expenses, budgets.total_budget),
            expenses,
        }
    }
}

/// Loads and saves expense data through the API, caching the category list.
#[derive(Debug)]
pub struct DataService {
    client: ApiClient,
    categories: Mutex<Option<Arc<Categories>>>,
}

impl DataService {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            categories: Mutex::new(None),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// The category list, fetched from the API on first use.
    pub async fn categories(&self) -> Result<Arc<Categories>, Error> {
        let mut cache = self.categories.lock().await;

        if let Some(categories) = cache.as_ref() {
            return Ok(Arc::clone(categories));
        }

        let categories = self
            .client
            .get_all_categories()
            .await
            .inspect_err(|error| tracing::error!("Could not load the categories: {error}"))?;
        let categories = Arc::new(Categories::new(categories));
        tracing::info!("Loaded {} categories", categories.len());

        *cache = Some(Arc::clone(&categories));

        Ok(categories)
    }

    /// Drop the cached categories.
    pub async fn clear(&self) {
        self.categories.lock().await.take();
    }

    /// End the session and drop everything cached for it.
    pub async fn log_out(&self) {
        self.client.log_out();
        self.clear().await;
    }

    /// Load the total budget and category budgets of the signed in user.
    pub async fn budget_data(&self) -> Result<BudgetData, Error> {
        let user_id = self.client.session().user_id()?;

        let user = self
            .client
            .get_user_data(user_id)
            .await
            .inspect_err(|error| tracing::error!("Could not load the user record: {error}"))?;
        let category_budgets = self
            .client
            .get_category_budgets(user_id)
            .await
            .inspect_err(|error| tracing::error!("Could not load the category budgets: {error}"))?;

        Ok(BudgetData {
            total_budget: user.total_budget,
            category_budgets,
            user,
        })
    }

    /// Every expense in `window`, optionally restricted to one category.
    pub async fn expenses(
        &self,
        window: EvaluationWindow,
        category_id: Option<CategoryId>,
    ) -> Result<Vec<Expense>, Error> {
        self.client
            .get_all_expenses(window, category_id)
            .await
            .inspect_err(|error| tracing::error!("Could not load the expenses: {error}"))
    }

    /// One page of the expenses in `window`, optionally restricted to one category.
    ///
    /// # Errors
    /// Returns [Error::NotSignedIn] if there is no session.
    pub async fn expense_page(
        &self,
        window: EvaluationWindow,
        category_id: Option<CategoryId>,
        page_no: u64,
        page_size: u64,
    ) -> Result<ExpensePage, Error> {
        let user_id = self.client.session().user_id()?;
        let query = ExpenseQuery::new(user_id, window)
            .category(category_id)
            .page(page_no.max(1))
            .page_size(page_size);

        self.client
            .get_expenses(&query)
            .await
            .inspect_err(|error| tracing::error!("Could not load the expenses: {error}"))
    }

    /// Load the month so far and evaluate it against the budgets.
    ///
    /// Over-budget status always covers the whole month up to the end of today.
    /// The fetch also covers the last seven days when they start in the previous month.
    pub async fn dashboard(&self, now: OffsetDateTime) -> Result<Dashboard, Error> {
        let window = EvaluationWindow::current_month(now);
        let fetch_window = window.union(EvaluationWindow::last_seven_days(now));

        let expenses = self.expenses(fetch_window, None).await?;
        let categories = self.categories().await?;
        let budgets = self.budget_data().await?;

        Ok(Dashboard::build(window, expenses, &categories, &budgets, now))
    }

    /// Record a new expense after checking that its category exists.
    pub async fn add_expense(&self, expense: NewExpense) -> Result<(), Error> {
        let categories = self.categories().await?;

        if !categories.contains(expense.category_id()) {
            return Err(Error::InvalidCategory(expense.category_id()));
        }

        self.client.add_expense(expense).await?;
        tracing::info!("Added an expense");

        Ok(())
    }

    /// Find the expense `expense_id` in `window`.
    ///
    /// # Errors
    /// Returns [Error::ExpenseNotFound] if there is no such expense in the window.
    pub async fn find_expense(
        &self,
        window: EvaluationWindow,
        expense_id: ExpenseId,
    ) -> Result<Expense, Error> {
        self.expenses(window, None)
            .await?
            .into_iter()
            .find(|expense| expense.id == expense_id)
            .ok_or(Error::ExpenseNotFound(expense_id))
    }

    /// Save an edited expense, validating it the same way as a new expense.
    pub async fn update_expense(
        &self,
        expense: &Expense,
        now: OffsetDateTime,
    ) -> Result<(), Error> {
        let update = ExpenseUpdate::build(expense, now)?;

        if !self.categories().await?.contains(update.category_id) {
            return Err(Error::InvalidCategory(update.category_id));
        }

        self.client.update_expense(&update).await?;
        tracing::info!(expense_id = expense.id, "Updated an expense");

        Ok(())
    }

    pub async fn delete_expenses(&self, expense_ids: &[ExpenseId]) -> Result<(), Error> {
        self.client.delete_expenses(expense_ids).await?;
        tracing::info!("Deleted {} expense(s)", expense_ids.len());

        Ok(())
    }

    /// Set the total budget, or remove it with `None`.
    ///
    /// The user record is fetched first so that the fields this crate does not
    /// know about are posted back unchanged.
    pub async fn save_total_budget(&self, total_budget: Option<f64>) -> Result<(), Error> {
        let total_budget = total_budget
            .map(crate::models::validate_amount)
            .transpose()?;
        let user_id = self.client.session().user_id()?;

        let mut user = self.client.get_user_data(user_id).await?;
        user.total_budget = total_budget;

        self.client
            .update_user_data(&user)
            .await
            .inspect_err(|error| tracing::error!("Could not save the total budget: {error}"))?;
        tracing::info!("Saved the total budget");

        Ok(())
    }

    /// Replace every category budget with `budgets`.
    pub async fn save_category_budgets(&self, budgets: &[CategoryBudget]) -> Result<(), Error> {
        let user_id = self.client.session().user_id()?;

        self.client
            .set_category_budgets(user_id, budgets)
            .await
            .inspect_err(|error| tracing::error!("Could not save the category budgets: {error}"))?;
        tracing::info!("Saved {} category budget(s)", budgets.len());

        Ok(())
    }

    /// Merge `additions` into the existing category budgets and save the result.
    ///
    /// An addition replaces the existing budget for the same category. Category
    /// names are filled in from the category list.
    ///
    /// # Errors
    /// Returns [Error::InvalidCategory] if an addition refers to an unknown category.
    pub async fn add_category_budgets(
        &self,
        additions: &[(CategoryId, f64)],
    ) -> Result<Vec<CategoryBudget>, Error> {
        let categories = self.categories().await?;
        let mut budgets = self.budget_data().await?.category_budgets;

        for &(category_id, amount) in additions {
            let Some(category) = categories.lookup(category_id).category() else {
                return Err(Error::InvalidCategory(category_id));
            };
            let budget = CategoryBudget::new(category_id, &category.name, amount)?;

            match budgets.iter_mut().find(|existing| existing.category_id == category_id) {
                Some(existing) => *existing = budget,
                None => budgets.push(budget),
            }
        }

        self.save_category_budgets(&budgets).await?;

        Ok(budgets)
    }

    pub async fn delete_category_budget(&self, category_id: CategoryId) -> Result<(), Error> {
        let user_id = self.client.session().user_id()?;

        self.client
            .delete_category_budget(user_id, category_id)
            .await
            .inspect_err(|error| {
                tracing::error!("Could not delete the category budget: {error}")
            })?;
        tracing::info!(category_id, "Deleted a category budget");

        Ok(())
    }
}
