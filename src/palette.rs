//! Colours for chart series.

/// The base palette, from darkest to lightest purple.
pub const BASE_PALETTE: [&str; 5] = ["#130037", "#6a1b9a", "#9c27b0", "#ab47bc", "#ce93d8"];

/// The colour used to highlight values that exceed a budget.
pub const OVER_BUDGET_COLOR: &str = "#d32f2f";

/// The colour used to highlight the day(s) with the highest spending.
pub const MAXIMUM_DAY_COLOR: &str = "#130037";

/// The colour used for days that are not a maximum.
pub const REGULAR_DAY_COLOR: &str = "#ce93d8";

/// Returns `count` colours, cycling through [BASE_PALETTE].
pub fn series_colors(count: usize) -> Vec<&'static str> {
    (0..count)
        .map(|index| BASE_PALETTE[index % BASE_PALETTE.len()])
        .collect()
}
