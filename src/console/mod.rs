//! Interactive operation console shared by the SQL and service browsers.
//!
//!   catalog  - Catalog / Category / Operation (static, built at startup)
//!   format   - ResultSet + aligned, truncating table renderer
//!   executor - execute() with per-operation failure containment
//!   menu     - main/category menu loop
//!   term     - LineSource + Term (scripted or stdin/Ctrl-C input)

pub mod catalog;
pub mod executor;
pub mod format;
pub mod menu;
pub mod term;

pub use catalog::{Catalog, Category, ItemLabel};
pub use executor::{ActionResult, Completion, OperationOutcome, execute};
pub use format::{ResultSet, Value, render_result_set};
pub use menu::{ConsoleOptions, ExitReason};
pub use term::{StdinSource, Term};
