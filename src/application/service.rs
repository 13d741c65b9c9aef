use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::domain::{BudgetMap, BudgetStatus, Category, Cents, Expense};
use crate::io::export::write_expenses_csv;
use crate::storage::{Repository, StorageError};

use super::{AppError, CategoryReport, ChartBar, MonthlyReport, reporting};

/// The expense engine: owns the in-memory ledger and budget limits and keeps both
/// stores in sync with them.
/// This is the primary interface for any client (CLI, TUI, etc.).
///
/// Every mutation completes (mutate, persist, advise) before returning. The engine
/// assumes exclusive access to its files; callers sharing one instance across
/// threads must serialize `add_expense` and `set_budget`.
pub struct LedgerService {
    repo: Repository,
    expenses: Vec<Expense>,
    budgets: BudgetMap,
    load_warnings: Vec<StorageError>,
}

/// Result of adding an expense
#[derive(Debug)]
pub struct AddResult {
    pub expense: Expense,
    /// Set when the category is nearing or over its budget
    pub alert: Option<BudgetStatus>,
    /// Set when the ledger could not be written; the expense is still kept in memory
    pub save_error: Option<StorageError>,
}

impl LedgerService {
    /// Load the ledger, then the budgets, then fill in default budgets.
    ///
    /// Load failures are not fatal: a bad ledger starts empty, bad budgets start
    /// from defaults. The failures are kept in `load_warnings()`.
    pub fn open(repo: Repository) -> Self {
        let mut load_warnings = Vec::new();

        let expenses = repo.load_expenses().unwrap_or_else(|err| {
            tracing::warn!("failed to load expenses, starting empty: {err}");
            load_warnings.push(err);
            Vec::new()
        });

        let mut budgets = repo.load_budgets().unwrap_or_else(|err| {
            tracing::warn!("budgets file invalid, using defaults: {err}");
            load_warnings.push(err);
            BudgetMap::new()
        });
        budgets.ensure_defaults();

        Self {
            repo,
            expenses,
            budgets,
            load_warnings,
        }
    }

    /// Open the stores at the given paths.
    pub fn open_paths(ledger_path: impl AsRef<Path>, budgets_path: impl AsRef<Path>) -> Self {
        Self::open(Repository::new(
            ledger_path.as_ref(),
            budgets_path.as_ref(),
        ))
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// Problems encountered while loading the stores.
    pub fn load_warnings(&self) -> &[StorageError] {
        &self.load_warnings
    }

    // ========================
    // Ledger operations
    // ========================

    /// Append an expense, rewrite the ledger, then check the category's budget.
    ///
    /// The budget check is advisory and never rejects the expense.
    pub fn add_expense(
        &mut self,
        name: impl Into<String>,
        category: impl Into<String>,
        amount_cents: Cents,
        date: NaiveDate,
        notes: Option<String>,
    ) -> AddResult {
        let expense = Expense::new(name, category, amount_cents, date, notes);
        self.expenses.push(expense.clone());

        let save_error = self.repo.save_expenses(&self.expenses).err();
        if let Some(err) = &save_error {
            tracing::error!("error saving expenses: {err}");
        }

        let status = self.budget_status(expense.category());
        let alert = status.level.is_alert().then(|| {
            tracing::info!(
                category = %status.category,
                spent = status.spent,
                limit = status.limit,
                "budget {}",
                status.level
            );
            status
        });

        AddResult {
            expense,
            alert,
            save_error,
        }
    }

    /// All expenses in insertion order.
    pub fn all_expenses(&self) -> &[Expense] {
        &self.expenses
    }

    /// Expenses whose name, notes or category contains `keyword`, ignoring case.
    pub fn filter_by_keyword(&self, keyword: &str) -> Vec<&Expense> {
        let query = keyword.to_lowercase();
        self.expenses
            .iter()
            .filter(|e| {
                e.name().to_lowercase().contains(&query)
                    || e.notes().to_lowercase().contains(&query)
                    || e.category().to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Expenses whose category equals `category`, ignoring case.
    pub fn filter_by_category(&self, category: &str) -> Vec<&Expense> {
        let category = category.to_lowercase();
        self.expenses
            .iter()
            .filter(|e| e.category().to_lowercase() == category)
            .collect()
    }

    /// Expenses dated within `from..=to`. An inverted range yields nothing.
    pub fn filter_by_date_range(&self, from: NaiveDate, to: NaiveDate) -> Vec<&Expense> {
        self.expenses
            .iter()
            .filter(|e| from <= e.date() && e.date() <= to)
            .collect()
    }

    /// The `n` largest expenses, largest first. Equal amounts keep insertion order.
    pub fn top_n(&self, n: usize) -> Vec<&Expense> {
        let mut sorted: Vec<&Expense> = self.expenses.iter().collect();
        sorted.sort_by(|a, b| b.amount_cents().cmp(&a.amount_cents()));
        sorted.truncate(n);
        sorted
    }

    /// Expenses dated in the given month (1-12) of the given year.
    pub fn monthly_expenses(&self, month: u32, year: i32) -> Vec<&Expense> {
        self.expenses
            .iter()
            .filter(|e| e.date().month() == month && e.date().year() == year)
            .collect()
    }

    // ========================
    // Aggregations
    // ========================

    /// Sum per category name; categories with no expense are absent.
    pub fn category_totals<'a>(
        &self,
        expenses: impl IntoIterator<Item = &'a Expense>,
    ) -> BTreeMap<String, Cents> {
        reporting::category_totals(expenses)
    }

    pub fn total<'a>(&self, expenses: impl IntoIterator<Item = &'a Expense>) -> Cents {
        reporting::total(expenses)
    }

    /// Spending per fixed category over the whole ledger.
    pub fn category_report(&self) -> CategoryReport {
        CategoryReport::build(&self.expenses)
    }

    pub fn monthly_report(&self, month: u32, year: i32) -> Result<MonthlyReport<'_>, AppError> {
        if !(1..=12).contains(&month) {
            return Err(AppError::InvalidMonth(month));
        }
        Ok(MonthlyReport::build(
            month,
            year,
            self.monthly_expenses(month, year),
        ))
    }

    /// One bar per expense, sized against the largest expense.
    pub fn expense_chart(&self) -> Vec<ChartBar<'_>> {
        reporting::expense_chart(&self.expenses)
    }

    // ========================
    // Budget operations
    // ========================

    /// Set (or replace) a category's limit and rewrite the budget store.
    ///
    /// Limits <= 0 mean "no budget". The in-memory limit is updated even when the
    /// write fails. Changing a limit does not raise an alert.
    pub fn set_budget(
        &mut self,
        category: impl Into<String>,
        amount_cents: Cents,
    ) -> Result<(), AppError> {
        let category = category.into();
        self.budgets.set(category.clone(), amount_cents);

        if let Err(err) = self.repo.save_budgets(&self.budgets) {
            tracing::error!("error saving budgets: {err}");
            return Err(err.into());
        }

        tracing::debug!(%category, limit = amount_cents, "budget set");
        Ok(())
    }

    /// Current limit for a category (0 when unset).
    pub fn budget(&self, category: &str) -> Cents {
        self.budgets.get(category)
    }

    pub fn budgets(&self) -> &BudgetMap {
        &self.budgets
    }

    /// Spending against the limit for one category.
    pub fn budget_status(&self, category: &str) -> BudgetStatus {
        let spent = self.total(self.filter_by_category(category));
        BudgetStatus::new(category, spent, self.budgets.get(category))
    }

    /// Budget status for every fixed category, in display order.
    pub fn budget_overview(&self) -> Vec<BudgetStatus> {
        Category::ALL
            .iter()
            .map(|category| self.budget_status(category.as_str()))
            .collect()
    }

    // ========================
    // Export
    // ========================

    /// Write the given expenses to `path` with a header row. Returns the row count.
    ///
    /// Commas in names and notes are replaced by spaces. The ledger is not touched.
    pub fn export_csv<'a>(
        &self,
        path: impl AsRef<Path>,
        expenses: impl IntoIterator<Item = &'a Expense>,
    ) -> Result<usize, AppError> {
        let path = path.as_ref();
        let export_err = |source: csv::Error| {
            tracing::error!("export to {} failed: {source}", path.display());
            AppError::Export {
                path: path.to_path_buf(),
                source,
            }
        };

        let file = File::create(path).map_err(|err| export_err(err.into()))?;
        let count = write_expenses_csv(BufWriter::new(file), expenses).map_err(export_err)?;

        tracing::info!("exported {count} rows to {}", path.display());
        Ok(count)
    }

    /// Export the whole ledger.
    pub fn export_all(&self, path: impl AsRef<Path>) -> Result<usize, AppError> {
        self.export_csv(path, &self.expenses)
    }

    /// Export the expenses of one month. Months outside 1-12 are rejected before
    /// any file is created.
    pub fn export_month(
        &self,
        month: u32,
        year: i32,
        path: impl AsRef<Path>,
    ) -> Result<usize, AppError> {
        if !(1..=12).contains(&month) {
            return Err(AppError::InvalidMonth(month));
        }
        self.export_csv(path, self.monthly_expenses(month, year))
    }
}
