//! ECharts visualisations of the aggregated expenses.
//!
//! - **Spending by category**: a pie of each category's share of the month
//! - **Category totals**: a bar per category, red where the category is over budget
//! - **Last seven days**: a bar per day with the highest days highlighted
//!
//! Each chart is serialized as an ECharts option object and rendered into a
//! container with a small initialization script.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    datatype::DataPointItem,
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, Color, ItemStyle, JsFunction, Tooltip,
        Trigger,
    },
    series::{Bar, Pie},
};
use maud::{Markup, PreEscaped, html};
use time::{format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    aggregation::{CategoryTotal, DailyTotal},
    budget::OverBudgetStatus,
    palette::{
        BASE_PALETTE, MAXIMUM_DAY_COLOR, OVER_BUDGET_COLOR, REGULAR_DAY_COLOR, series_colors,
    },
    report::html::HeadElement,
};

const DAY_LABEL_FORMAT: &[BorrowedFormatItem] =
    format_description!("[weekday repr:short] [day padding:none]");

/// A chart with its HTML container ID and ECharts configuration.
pub struct ReportChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders a grid of containers, one per chart.
pub fn charts_view(charts: &[ReportChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates the script that initializes each chart once the page has loaded.
pub fn charts_script(charts: &[ReportChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chart = echarts.init(document.getElementById("{}"));
                    chart.setOption({});
                    window.addEventListener('resize', chart.resize);
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    HeadElement::ScriptSource(PreEscaped(format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{script_content}\n}});"
    )))
}

/// Builds every chart shown in the report.
pub fn report_charts(
    category_totals: &[CategoryTotal],
    daily_totals: &[DailyTotal],
    over_budget: &OverBudgetStatus,
) -> Vec<ReportChart> {
    vec![
        ReportChart {
            id: "category-share-chart",
            options: category_pie_chart(category_totals).to_string(),
        },
        ReportChart {
            id: "category-totals-chart",
            options: category_bar_chart(category_totals, over_budget).to_string(),
        },
        ReportChart {
            id: "last-seven-days-chart",
            options: last_seven_days_chart(daily_totals).to_string(),
        },
    ]
}

pub fn category_pie_chart(category_totals: &[CategoryTotal]) -> Chart {
    let colors: Vec<Color> = series_colors(category_totals.len())
        .into_iter()
        .map(Color::from)
        .collect();

    let data: Vec<DataPointItem> = category_totals
        .iter()
        .map(|total| DataPointItem::new(total.amount).name(total.category_name.as_str()))
        .collect();

    Chart::new()
        .title(Title::new().text("Spending by category").subtext("This month"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().bottom("1%"))
        .color(colors)
        .series(
            Pie::new()
                .name("Spending")
                .radius(vec!["40%", "70%"])
                .data(data),
        )
}

pub fn category_bar_chart(
    category_totals: &[CategoryTotal],
    over_budget: &OverBudgetStatus,
) -> Chart {
    let labels: Vec<String> = category_totals
        .iter()
        .map(|total| total.category_name.clone())
        .collect();

    let data: Vec<DataPointItem> = category_totals
        .iter()
        .enumerate()
        .map(|(index, total)| {
            let color = if over_budget.is_category_over(total.category_id) {
                OVER_BUDGET_COLOR
            } else {
                BASE_PALETTE[index % BASE_PALETTE.len()]
            };

            DataPointItem::new(total.amount).item_style(ItemStyle::new().color(color))
        })
        .collect();

    Chart::new()
        .title(Title::new().text("Category totals").subtext("This month"))
        .tooltip(currency_tooltip())
        .grid(grid())
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(currency_axis())
        .series(Bar::new().name("Spent").data(data))
}

pub fn last_seven_days_chart(daily_totals: &[DailyTotal]) -> Chart {
    let labels: Vec<String> = daily_totals
        .iter()
        .map(|day| {
            day.date
                .format(DAY_LABEL_FORMAT)
                .unwrap_or_else(|_| day.date.to_string())
        })
        .collect();

    let data: Vec<DataPointItem> = daily_totals
        .iter()
        .map(|day| {
            let color = if day.is_maximum {
                MAXIMUM_DAY_COLOR
            } else {
                REGULAR_DAY_COLOR
            };

            DataPointItem::new(day.amount).item_style(ItemStyle::new().color(color))
        })
        .collect();

    Chart::new()
        .title(Title::new().text("Last seven days"))
        .tooltip(currency_tooltip())
        .grid(grid())
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(currency_axis())
        .series(Bar::new().name("Spent").data(data))
}

fn grid() -> Grid {
    Grid::new()
        .left("3%")
        .right("4%")
        .bottom("3%")
        .contain_label(true)
}

fn currency_axis() -> Axis {
    Axis::new()
        .type_(AxisType::Value)
        .axis_label(AxisLabel::new().formatter(currency_formatter()))
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use serde_json::Value;
    use time::macros::date;

    use crate::{
        aggregation::{CategoryTotal, DailyTotal},
        budget::OverBudgetStatus,
        palette::{BASE_PALETTE, MAXIMUM_DAY_COLOR, OVER_BUDGET_COLOR, REGULAR_DAY_COLOR},
    };

    use super::{category_bar_chart, category_pie_chart, last_seven_days_chart, report_charts};

    fn totals() -> Vec<CategoryTotal> {
        vec![
            CategoryTotal {
                category_id: 1,
                category_name: "Food".to_owned(),
                amount: 75.0,
                percentage: 75.0,
            },
            CategoryTotal {
                category_id: 2,
                category_name: "Transport".to_owned(),
                amount: 25.0,
                percentage: 25.0,
            },
        ]
    }

    fn options(chart: charming::Chart) -> Value {
        serde_json::to_value(&chart).expect("chart should serialize")
    }

    /// Single components may be serialized as an object or a one element array.
    fn first(value: &Value) -> &Value {
        value.as_array().and_then(|items| items.first()).unwrap_or(value)
    }

    fn item_colors(options: &Value) -> Vec<String> {
        options["series"][0]["data"]
            .as_array()
            .expect("series data should be an array")
            .iter()
            .map(|item| item["itemStyle"]["color"].as_str().unwrap_or_default().to_owned())
            .collect()
    }

    #[test]
    fn pie_chart_uses_palette_and_category_names() {
        let options = options(category_pie_chart(&totals()));

        assert_eq!(options["color"][0], BASE_PALETTE[0]);
        assert_eq!(options["color"][1], BASE_PALETTE[1]);
        assert_eq!(options["series"][0]["data"][0]["name"], "Food");
        assert_eq!(options["series"][0]["data"][1]["value"], 25.0);
    }

    #[test]
    fn bar_chart_highlights_categories_over_budget() {
        let over_budget = OverBudgetStatus {
            total: false,
            categories: BTreeSet::from([2]),
        };

        let options = options(category_bar_chart(&totals(), &over_budget));

        assert_eq!(first(&options["xAxis"])["data"][1], "Transport");
        assert_eq!(item_colors(&options), vec![BASE_PALETTE[0], OVER_BUDGET_COLOR]);
    }

    #[test]
    fn seven_day_chart_highlights_maximum_days() {
        let days = vec![
            DailyTotal {
                date: date!(2025-04-16),
                amount: 10.0,
                is_maximum: true,
            },
            DailyTotal {
                date: date!(2025-04-17),
                amount: 4.0,
                is_maximum: false,
            },
        ];

        let options = options(last_seven_days_chart(&days));

        assert_eq!(first(&options["xAxis"])["data"][0], "Wed 16");
        assert_eq!(item_colors(&options), vec![MAXIMUM_DAY_COLOR, REGULAR_DAY_COLOR]);
    }

    #[test]
    fn report_charts_have_unique_ids() {
        let charts = report_charts(&totals(), &[], &OverBudgetStatus::default());

        let ids: BTreeSet<_> = charts.iter().map(|chart| chart.id).collect();
        assert_eq!(ids.len(), charts.len());
    }
}
