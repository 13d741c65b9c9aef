use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::{Cents, ParseCentsError, format_cents, parse_cents};

/// Date format used everywhere an expense date is written or read.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Number of fields in a stored expense row.
pub const EXPENSE_FIELDS: usize = 5;

/// A single dated, categorized expense.
/// Expenses are immutable - history changes only by editing the ledger file and reloading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    name: String,
    /// Free text; usually one of the fixed categories
    category: String,
    amount_cents: Cents,
    date: NaiveDate,
    notes: String,
}

impl Expense {
    /// Create a new expense. Missing notes become an empty string; nothing is validated.
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        amount_cents: Cents,
        date: NaiveDate,
        notes: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            amount_cents,
            date,
            notes: notes.unwrap_or_default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn amount_cents(&self) -> Cents {
        self.amount_cents
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// The stored fields in ledger column order.
    pub fn to_fields(&self) -> [String; EXPENSE_FIELDS] {
        [
            self.name.clone(),
            self.category.clone(),
            format_cents(self.amount_cents),
            self.date.format(DATE_FORMAT).to_string(),
            self.notes.clone(),
        ]
    }

    /// Canonical single-line form: `name,category,amount,date,notes`.
    /// Commas inside free-text fields are not escaped.
    pub fn to_line(&self) -> String {
        self.to_fields().join(",")
    }

    /// Parse a stored row.
    ///
    /// Returns `Ok(None)` when the row has fewer than five fields. Fields past the
    /// fifth are ignored.
    pub fn from_fields(fields: &[&str]) -> Result<Option<Self>, ExpenseParseError> {
        let [name, category, amount, date, notes, ..] = fields else {
            return Ok(None);
        };

        let amount_cents = parse_cents(amount).map_err(|source| ExpenseParseError::Amount {
            value: amount.to_string(),
            source,
        })?;
        let date = NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|source| {
            ExpenseParseError::Date {
                value: date.to_string(),
                source,
            }
        })?;

        Ok(Some(Self::new(
            *name,
            *category,
            amount_cents,
            date,
            Some(notes.to_string()),
        )))
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}

#[derive(Debug, Error)]
pub enum ExpenseParseError {
    #[error("invalid amount '{value}': {source}")]
    Amount {
        value: String,
        source: ParseCentsError,
    },

    #[error("invalid date '{value}': {source}")]
    Date {
        value: String,
        source: chrono::ParseError,
    },
}
