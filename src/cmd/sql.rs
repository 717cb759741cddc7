/*!
`sql.rs`

Implements the `sql` subcommand: the query browser over the guitar-shop
database.

Database resolution: `--database`, then `LAB_CONSOLE_DATABASE`, then
`sql.database` from the config file. Without any of them an in-memory
database is created and seeded, so the browser works out of the box.
*/

use anyhow::Result;
use clap::Args;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::cmd::shared::{run_interactive, run_one};
use crate::config::Config;
use crate::console::ConsoleOptions;
use crate::log_info;
use crate::sql::{SqlConnection, queries};

pub const DATABASE_ENV: &str = "LAB_CONSOLE_DATABASE";

/// CLI arguments for `lab-console sql`
#[derive(Args, Debug, Default)]
pub struct SqlArgs {
    /// SQLite database file (falls back to LAB_CONSOLE_DATABASE, then config)
    #[arg(short = 'd', long, value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// Load the sample guitar-shop data if the database has no tables
    #[arg(long)]
    pub seed: bool,

    /// Run a single query by key (or category/key) and exit
    #[arg(long, value_name = "KEY")]
    pub run: Option<String>,

    /// Wait for Enter after each query
    #[arg(long)]
    pub pause: bool,
}

/// Entry point for the sql subcommand.
pub fn execute_sql(args: SqlArgs, config: &Config) -> Result<()> {
    let path = resolve_database(
        args.database.clone(),
        std::env::var_os(DATABASE_ENV),
        config,
    );
    let mut db = open_database(path, args.seed || config.sql.seed_if_empty)?;
    log_info!("Using database {}", db.label());

    let catalog = queries::catalog()?;
    match args.run.as_deref() {
        Some(selector) => run_one(&catalog, &mut db, selector),
        None => {
            let options = ConsoleOptions {
                pause_after_operation: args.pause || config.console.pause_after_operation,
            };
            run_interactive(&catalog, &mut db, &options)?;
            Ok(())
        }
    }
}

fn resolve_database(
    flag: Option<PathBuf>,
    env: Option<OsString>,
    config: &Config,
) -> Option<PathBuf> {
    flag.or_else(|| env.filter(|v| !v.is_empty()).map(PathBuf::from))
        .or_else(|| config.sql.database.clone())
}

fn open_database(path: Option<PathBuf>, seed: bool) -> Result<SqlConnection> {
    let Some(path) = path else {
        let db = SqlConnection::open_in_memory()?;
        db.seed()?;
        return Ok(db);
    };

    let db = SqlConnection::open(&path)?;
    if seed {
        if db.is_empty()? {
            db.seed()?;
            log_info!("Loaded sample data into {}", path.display());
        } else {
            log_info!("{} already has tables; not seeding", path.display());
        }
    }
    Ok(db)
}
