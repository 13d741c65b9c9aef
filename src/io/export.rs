use csv::{QuoteStyle, WriterBuilder};
use std::io::Write;

use crate::domain::{DATE_FORMAT, Expense, format_cents};

/// Header row of every export file.
pub const EXPORT_HEADER: [&str; 5] = ["Name", "Category", "Amount", "Date", "Notes"];

/// Replace commas so a free-text field cannot spill into the next column.
fn sanitize(field: &str) -> String {
    field.replace(',', " ")
}

/// Write a header plus one row per expense. Returns the number of rows written.
///
/// Name and notes have their commas replaced by spaces; category, amount and date
/// are written as-is.
pub fn write_expenses_csv<'a, W: Write>(
    writer: W,
    expenses: impl IntoIterator<Item = &'a Expense>,
) -> csv::Result<usize> {
    let mut csv_writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .from_writer(writer);

    csv_writer.write_record(EXPORT_HEADER)?;

    let mut count = 0;
    for expense in expenses {
        csv_writer.write_record([
            sanitize(expense.name()),
            expense.category().to_string(),
            format_cents(expense.amount_cents()),
            expense.date().format(DATE_FORMAT).to_string(),
            sanitize(expense.notes()),
        ])?;
        count += 1;
    }

    csv_writer.flush()?;
    Ok(count)
}
