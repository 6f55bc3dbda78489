//! The alert banner and tables of the HTML report.

use maud::{Markup, html};
use time::{UtcOffset, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    budget::{BudgetUsage, OverBudgetStatus, TotalBudgetUsage},
    models::{Categories, Expense},
    report::html::{
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency, format_percentage,
    },
};

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

const TABLE_STYLE: &str =
    "w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400";

/// Renders a warning listing what is over budget, or nothing when everything is within budget.
pub fn over_budget_alert(
    over_budget: &OverBudgetStatus,
    total: &TotalBudgetUsage,
    categories: &Categories,
) -> Markup {
    if !over_budget.any() {
        return html!();
    }

    html! {
        div
            id="over-budget-alert"
            role="alert"
            class="w-full p-4 mb-4 text-sm text-red-800 rounded-lg bg-red-50
                dark:bg-gray-800 dark:text-red-400"
        {
            p class="font-semibold" { "You are over budget" }

            ul class="mt-1.5 list-disc list-inside"
            {
                @if over_budget.total {
                    li {
                        "Total spending of " (format_currency(total.spent))
                        @if let Some(budget) = total.budget {
                            " exceeds the budget of " (format_currency(budget))
                        }
                    }
                }

                @for category_id in &over_budget.categories {
                    li { (categories.lookup(*category_id).display_name()) }
                }
            }
        }
    }
}

/// Renders the spending against the total budget and each category budget.
pub fn budget_usage_table(total: &TotalBudgetUsage, usage: &[BudgetUsage]) -> Markup {
    html! {
        section id="budgets" class="w-full mb-8"
        {
            h2 class="text-xl font-semibold mb-4" { "Budgets" }

            table class=(TABLE_STYLE)
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Budget" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Spent" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Limit" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Remaining" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Used" }
                    }
                }

                tbody
                {
                    tr class=(TABLE_ROW_STYLE) data-over=(total.is_over.to_string())
                    {
                        th scope="row" class=(TABLE_CELL_STYLE) { "Total" }
                        td class=(TABLE_CELL_STYLE) { (format_currency(total.spent)) }

                        @match (total.budget, total.remaining()) {
                            (Some(budget), Some(remaining)) => {
                                td class=(TABLE_CELL_STYLE) { (format_currency(budget)) }
                                td class=(TABLE_CELL_STYLE) { (format_currency(remaining)) }
                                td class=(TABLE_CELL_STYLE) {
                                    (progress_bar(total.spent, budget, total.is_over))
                                }
                            }
                            _ => {
                                td class=(TABLE_CELL_STYLE) colspan="3" { "No total budget set" }
                            }
                        }
                    }

                    @for row in usage {
                        tr class=(TABLE_ROW_STYLE) data-over=(row.is_over.to_string())
                        {
                            th scope="row" class=(TABLE_CELL_STYLE) { (row.category_name) }
                            td class=(TABLE_CELL_STYLE) { (format_currency(row.spent)) }
                            td class=(TABLE_CELL_STYLE) { (format_currency(row.budget)) }
                            td class=(TABLE_CELL_STYLE) { (format_currency(row.remaining)) }
                            td class=(TABLE_CELL_STYLE) {
                                (progress_bar(row.spent, row.budget, row.is_over))
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Renders a horizontal bar showing how much of `budget` has been spent.
fn progress_bar(spent: f64, budget: f64, is_over: bool) -> Markup {
    let percentage = if budget > 0.0 {
        spent / budget * 100.0
    } else if spent > 0.0 {
        100.0
    } else {
        0.0
    };
    let clamped = percentage.clamp(0.0, 100.0);
    let color = if is_over {
        "bg-red-600 dark:bg-red-500"
    } else {
        "bg-blue-600 dark:bg-blue-500"
    };

    html! {
        div
            class="w-full bg-gray-200 dark:bg-gray-700 rounded-full h-2.5"
            role="progressbar"
            title=(format_percentage(percentage))
            aria-valuenow=(format!("{clamped:.0}"))
            aria-valuemin="0"
            aria-valuemax="100"
        {
            @if clamped > 0.0 {
                div
                    class={ (color) " h-2.5 rounded-full" }
                    style=(format!("width: {clamped:.1}%"))
                {}
            }
        }
    }
}

/// Renders the month's expenses, newest first.
pub fn expense_table(expenses: &[Expense], categories: &Categories, offset: UtcOffset) -> Markup {
    let mut sorted: Vec<&Expense> = expenses.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));

    html! {
        section id="expenses" class="w-full mb-8"
        {
            h2 class="text-xl font-semibold mb-4" { "Expenses" }

            @if sorted.is_empty() {
                p class="text-gray-600 dark:text-gray-400" { "No expenses recorded this month." }
            } @else {
                table class=(TABLE_STYLE)
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                        }
                    }

                    tbody
                    {
                        @for expense in sorted {
                            tr class=(TABLE_ROW_STYLE) data-expense-id=(expense.id)
                            {
                                td class=(TABLE_CELL_STYLE) { (format_date(expense, offset)) }
                                td class=(TABLE_CELL_STYLE) {
                                    (categories.lookup(expense.category_id).display_name())
                                }
                                td class=(TABLE_CELL_STYLE) { (expense.description) }
                                td class=(TABLE_CELL_STYLE) { (format_currency(expense.amount)) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn format_date(expense: &Expense, offset: UtcOffset) -> String {
    let date = expense.date.to_offset(offset).date();

    date.format(DATE_FORMAT).unwrap_or_else(|_| date.to_string())
}
