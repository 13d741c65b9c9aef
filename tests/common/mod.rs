// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use outlay::Repository;
use outlay::application::LedgerService;
use std::path::PathBuf;
use tempfile::TempDir;

pub fn ledger_path(dir: &TempDir) -> PathBuf {
    dir.path().join("expenses.csv")
}

pub fn budgets_path(dir: &TempDir) -> PathBuf {
    dir.path().join("budgets.csv")
}

/// Helper to create a test service over an empty temporary directory
pub fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let service = reopen(&temp_dir);
    Ok((service, temp_dir))
}

/// Open a fresh service over the stores in `dir`, as a new process would
pub fn reopen(dir: &TempDir) -> LedgerService {
    LedgerService::open(Repository::new(ledger_path(dir), budgets_path(dir)))
}

/// Helper to parse a date string into NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Test fixture: a small ledger spread over two months and several categories
pub struct StandardExpenses;

impl StandardExpenses {
    pub fn create(service: &mut LedgerService) {
        service.add_expense("Groceries", "Food", 4550, parse_date("2024-01-03"), None);
        service.add_expense(
            "Team lunch",
            "Food",
            2000,
            parse_date("2024-01-10"),
            Some("Lunch with team".into()),
        );
        service.add_expense("Metro card", "Transport", 3000, parse_date("2024-01-15"), None);
        service.add_expense(
            "Electricity",
            "Bills",
            8000,
            parse_date("2024-01-31"),
            Some("January bill".into()),
        );
        service.add_expense("Cinema", "Entertainment", 2000, parse_date("2024-02-01"), None);
        service.add_expense("Umbrella", "Misc", 1500, parse_date("2024-02-14"), None);
    }
}
