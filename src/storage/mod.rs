mod error;
mod repository;

pub use error::*;
pub use repository::*;

/// Default ledger store file (one expense per line, no header)
pub const DEFAULT_LEDGER_FILE: &str = "expenses.csv";

/// Default budget store file
pub const DEFAULT_BUDGETS_FILE: &str = "budgets.csv";

/// Header line of the budget store
pub const BUDGETS_HEADER: [&str; 2] = ["Category", "Budget"];
