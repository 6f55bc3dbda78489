//! The expense API endpoint paths, relative to the API base URL.

/// The route for logging in a user.
pub const LOG_IN: &str = "/api/auth/login";
/// The route for listing a user's expenses within a date range.
pub const GET_EXPENSES: &str = "/api/expenses/getExpenses";
/// The route for creating an expense.
pub const ADD_EXPENSE: &str = "/api/expenses/addExpense";
/// The route for editing an expense.
pub const UPDATE_EXPENSE: &str = "/api/expenses/updateExpense";
/// The route for deleting one or more expenses, given as repeated `expenseId` parameters.
pub const DELETE_EXPENSES: &str = "/api/expenses/deleteExpense";
/// The route for listing all categories.
pub const GET_ALL_CATEGORIES: &str = "/api/getAllCategories";
/// The route for getting the user record, which includes the total budget.
pub const GET_USER_DATA: &str = "/api/getUserData";
/// The route for saving the user record.
pub const UPDATE_USER_DATA: &str = "/api/updateUserData";
/// The route for listing a user's category budgets.
pub const GET_CATEGORY_BUDGETS: &str = "/api/budgets/getCategoryBudget";
/// The route for replacing a user's category budgets.
pub const SET_CATEGORY_BUDGETS: &str = "/api/budgets/setCategoryBudget";
/// The route for deleting a single category budget.
pub const DELETE_CATEGORY_BUDGET: &str = "/api/budgets/deleteCategoryBudget";
