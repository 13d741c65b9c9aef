// Application layer - the expense engine and the reports it computes.
// Presentation layers (CLI, future TUI) call into `LedgerService` and only format
// the values it returns.

pub mod error;
pub mod reporting;
pub mod service;

pub use error::*;
pub use reporting::*;
pub use service::*;
