//! Writes expenses to CSV for use in spreadsheets.

use std::io::Write;

use serde::Serialize;
use time::{UtcOffset, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    models::{Categories, Expense},
};

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ExpenseRow<'a> {
    category: &'a str,
    amount: String,
    description: &'a str,
    date: String,
}

/// Write `expenses` as CSV with the columns Category, Amount, Description and Date.
///
/// Dates are written as calendar days in `offset`. Expenses in a category that
/// is not in `categories` are labelled "Unknown category".
///
/// # Errors
/// Returns [Error::CsvError] or [Error::IoError] if `writer` fails.
pub fn write_csv<W: Write>(
    writer: W,
    expenses: &[Expense],
    categories: &Categories,
    offset: UtcOffset,
) -> Result<(), Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for expense in expenses {
        let date = expense
            .date
            .to_offset(offset)
            .date()
            .format(DATE_FORMAT)
            .map_err(|error| Error::CsvError(error.to_string()))?;

        csv_writer.serialize(ExpenseRow {
            category: categories.lookup(expense.category_id).display_name(),
            amount: format!("{:.2}", expense.amount),
            description: &expense.description,
            date,
        })?;
    }

    if expenses.is_empty() {
        csv_writer.write_record(["Category", "Amount", "Description", "Date"])?;
    }

    csv_writer.flush()?;
    tracing::info!("Exported {} expense(s) to CSV", expenses.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use time::{
        UtcOffset,
        macros::{datetime, offset},
    };

    use crate::{
        models::{Categories, Category, Expense},
        test_utils::test_categories,
    };

    use super::write_csv;

    fn expense(category_id: i64, amount: f64, description: &str) -> Expense {
        Expense {
            id: 1,
            user_id: 7,
            category_id,
            amount,
            description: description.to_owned(),
            date: datetime!(2025-04-02 22:30 UTC),
        }
    }

    fn export(expenses: &[Expense], categories: &Categories, offset: UtcOffset) -> String {
        let mut buffer = Vec::new();
        write_csv(&mut buffer, expenses, categories, offset).unwrap();

        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn writes_header_and_rows() {
        let categories = Categories::new(test_categories());

        let text = export(
            &[expense(1, 12.5, "Lunch"), expense(2, 3.0, "Bus")],
            &categories,
            UtcOffset::UTC,
        );

        assert_eq!(
            text,
            "Category,Amount,Description,Date\n\
             Food,12.50,Lunch,2025-04-02\n\
             Transport,3.00,Bus,2025-04-02\n"
        );
    }

    #[test]
    fn empty_export_still_has_header() {
        let text = export(&[], &Categories::default(), UtcOffset::UTC);

        assert_eq!(text, "Category,Amount,Description,Date\n");
    }

    #[test]
    fn quotes_descriptions_with_commas() {
        let categories = Categories::new(vec![Category {
            id: 1,
            name: "Food".to_owned(),
        }]);

        let text = export(&[expense(1, 1.0, "Milk, eggs")], &categories, UtcOffset::UTC);

        assert!(text.contains("Food,1.00,\"Milk, eggs\",2025-04-02"));
    }

    #[test]
    fn unknown_category_uses_fallback_label() {
        let text = export(&[expense(9, 1.0, "")], &Categories::default(), UtcOffset::UTC);

        assert!(text.contains("Unknown category,1.00,,2025-04-02"));
    }

    #[test]
    fn dates_use_given_offset() {
        let text = export(&[expense(1, 1.0, "")], &Categories::default(), offset!(+12));

        assert!(text.ends_with("2025-04-03\n"));
    }
}
