/*!
Command dispatcher module.

Directory Layout:
  src/cmd/
    mod.rs          (this file)
    console.rs      (ConsoleKind enum: sql | services)
    list.rs         (ListArgs     + execute_list)
    sql.rs          (SqlArgs      + execute_sql)
    services.rs     (ServicesArgs + execute_services)
    shared.rs       (run_one / run_interactive used by both consoles)
    format.rs       (color / table helpers for non-interactive output)

Conventions:
  - Each subcommand module exposes exactly one public `execute_*` function
    that returns `anyhow::Result<()>`.
  - Argument structs derive `clap::Args` and are kept minimal.
*/

pub mod console;
pub mod format;
pub mod list;
pub mod services;
pub mod shared;
pub mod sql;

pub use list::{ListArgs, execute_list};
pub use services::{ServicesArgs, execute_services};
pub use sql::{SqlArgs, execute_sql};
