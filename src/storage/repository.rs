use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, ReaderBuilder, StringRecord, WriterBuilder};

use crate::domain::{BudgetMap, Expense, format_cents, parse_cents};

use super::{BUDGETS_HEADER, StorageError};

/// Repository for the two flat-file stores: the expense ledger and the budget limits.
///
/// Both files are rewritten in full on every save. Fields are comma-joined without
/// quoting or escaping, so a comma inside a free-text field misaligns the row on reload.
#[derive(Debug, Clone)]
pub struct Repository {
    ledger_path: PathBuf,
    budgets_path: PathBuf,
}

impl Repository {
    /// Create a repository over the given ledger and budget files.
    /// Neither file needs to exist yet.
    pub fn new(ledger_path: impl Into<PathBuf>, budgets_path: impl Into<PathBuf>) -> Self {
        Self {
            ledger_path: ledger_path.into(),
            budgets_path: budgets_path.into(),
        }
    }

    pub fn ledger_path(&self) -> &Path {
        &self.ledger_path
    }

    pub fn budgets_path(&self) -> &Path {
        &self.budgets_path
    }

    // ========================
    // Ledger store
    // ========================

    /// Load every expense from the ledger file, in file order.
    ///
    /// A missing file is an empty ledger. Rows with fewer than five fields are skipped;
    /// the first row with a bad amount or date aborts the whole load.
    pub fn load_expenses(&self) -> Result<Vec<Expense>, StorageError> {
        let path = &self.ledger_path;
        let Some(file) = open_if_exists(path)? else {
            tracing::debug!(path = %path.display(), "ledger file not found, starting empty");
            return Ok(Vec::new());
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(file);

        let mut expenses = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|source| StorageError::Csv {
                path: path.clone(),
                source,
            })?;
            let fields: Vec<&str> = record.iter().collect();

            match Expense::from_fields(&fields) {
                Ok(Some(expense)) => expenses.push(expense),
                Ok(None) => {
                    tracing::debug!(line = line_of(&record), "skipping short ledger row");
                }
                Err(err) => {
                    return Err(StorageError::Parse {
                        path: path.clone(),
                        line: line_of(&record),
                        reason: err.to_string(),
                    });
                }
            }
        }

        tracing::debug!(path = %path.display(), count = expenses.len(), "loaded expenses");
        Ok(expenses)
    }

    /// Rewrite the ledger file with the given expenses, one canonical line each.
    pub fn save_expenses(&self, expenses: &[Expense]) -> Result<(), StorageError> {
        let path = &self.ledger_path;
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .quote_style(QuoteStyle::Never)
            .from_writer(create(path)?);

        for expense in expenses {
            writer
                .write_record(expense.to_fields())
                .map_err(|source| StorageError::Csv {
                    path: path.clone(),
                    source,
                })?;
        }
        finish(writer, path)?;

        tracing::debug!(path = %path.display(), count = expenses.len(), "saved expenses");
        Ok(())
    }

    // ========================
    // Budget store
    // ========================

    /// Load budget limits. The first line is a header and is skipped.
    ///
    /// A missing file yields an empty map; any bad amount aborts the whole load.
    pub fn load_budgets(&self) -> Result<BudgetMap, StorageError> {
        let path = &self.budgets_path;
        let mut budgets = BudgetMap::new();
        let Some(file) = open_if_exists(path)? else {
            tracing::debug!(path = %path.display(), "budgets file not found");
            return Ok(budgets);
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .quoting(false)
            .from_reader(file);

        for result in reader.records() {
            let record = result.map_err(|source| StorageError::Csv {
                path: path.clone(),
                source,
            })?;
            let (Some(category), Some(amount)) = (record.get(0), record.get(1)) else {
                continue;
            };

            let limit = parse_cents(amount).map_err(|err| StorageError::Parse {
                path: path.clone(),
                line: line_of(&record),
                reason: format!("invalid budget for '{}': {}", category, err),
            })?;
            budgets.set(category, limit);
        }

        tracing::debug!(path = %path.display(), count = budgets.len(), "loaded budgets");
        Ok(budgets)
    }

    /// Rewrite the budget file: header, then one `category,amount` row per entry.
    pub fn save_budgets(&self, budgets: &BudgetMap) -> Result<(), StorageError> {
        let path = &self.budgets_path;
        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Never)
            .from_writer(create(path)?);

        let csv_err = |source| StorageError::Csv {
            path: path.clone(),
            source,
        };
        writer.write_record(BUDGETS_HEADER).map_err(csv_err)?;
        for (category, limit) in budgets.entries() {
            writer
                .write_record([category, format_cents(limit).as_str()])
                .map_err(csv_err)?;
        }
        finish(writer, path)?;

        tracing::debug!(path = %path.display(), count = budgets.len(), "saved budgets");
        Ok(())
    }
}

fn open_if_exists(path: &Path) -> Result<Option<File>, StorageError> {
    match File::open(path) {
        Ok(file) => Ok(Some(file)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StorageError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn create(path: &Path) -> Result<BufWriter<File>, StorageError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })
}

fn finish<W: Write>(writer: csv::Writer<W>, path: &Path) -> Result<(), StorageError> {
    let io_err = |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut inner = writer.into_inner().map_err(|err| io_err(err.into_error()))?;
    inner.flush().map_err(io_err)
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|pos| pos.line()).unwrap_or(0)
}
