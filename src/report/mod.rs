//! A standalone HTML page summarising the month's spending.
//!
//! The page shows the over-budget alert, charts of the aggregated expenses, the
//! budget usage table and the list of expenses.

mod charts;
mod html;
mod tables;

pub use html::format_currency;

use maud::{Markup, html};

use crate::{
    models::Categories,
    report::{
        charts::{charts_script, charts_view, report_charts},
        html::{PAGE_CONTAINER_STYLE, base, format_percentage},
        tables::{budget_usage_table, expense_table, over_budget_alert},
    },
    services::Dashboard,
};

/// Render `dashboard` as a complete HTML document.
///
/// Dates are shown in the offset of the dashboard's evaluation window.
pub fn render_dashboard(dashboard: &Dashboard, categories: &Categories) -> Markup {
    let offset = dashboard.window.start.offset();
    let charts = report_charts(
        &dashboard.category_totals,
        &dashboard.daily_totals,
        &dashboard.over_budget,
    );

    let content = html! {
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-xl"
            {
                header class="flex justify-between flex-wrap items-end mb-4"
                {
                    h1 class="text-3xl font-bold" { "Spending this month" }

                    p id="total-spent" class="text-2xl font-semibold"
                    {
                        (format_currency(dashboard.total_spent))
                    }
                }

                (over_budget_alert(
                    &dashboard.over_budget,
                    &dashboard.total_budget_usage,
                    categories,
                ))

                @if dashboard.category_totals.is_empty() {
                    p class="text-gray-600 dark:text-gray-400 mb-4" { "Nothing to chart yet." }
                } @else {
                    ul id="category-breakdown" class="flex flex-wrap gap-4 mb-4"
                    {
                        @for total in &dashboard.category_totals {
                            li { (total.category_name) ": " (format_percentage(total.percentage)) }
                        }
                    }
                }

                (charts_view(&charts))
                (budget_usage_table(&dashboard.total_budget_usage, &dashboard.budget_usage))
                (expense_table(&dashboard.expenses, categories, offset))
            }
        }
    };

    base("Dashboard", &[charts_script(&charts)], &content)
}
