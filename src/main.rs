use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cmd;
mod config;
mod console;
mod services;
mod sql;
mod utils;

use cmd::{ListArgs, ServicesArgs, SqlArgs};
use config::Config;

/// Lab Console - menu-driven browsers for the database and services labs
///
/// Command layout:
///   lab-console sql      [--database PATH] [--seed] [--run KEY] [--pause]
///   lab-console services [--store-root DIR] [--spool DIR] [--no-cache] [--run KEY] [--pause]
///   lab-console list     [sql|services] [--json]
///
/// Global flags / env:
///   -v / -vv              Increase verbosity
///   -q / --quiet          Errors only
///   -c / --config         YAML or JSON config file (or LAB_CONSOLE_CONFIG env)
///   LAB_CONSOLE_DATABASE  Database fallback if --database not provided
///
/// Examples:
///   lab-console sql
///   lab-console sql --database shop.db --seed --run inner_join/orders_with_customer_and_address
///   lab-console services --store-root ./objects --spool ./mail
///   lab-console list services --json
#[derive(Parser, Debug)]
#[command(
    name = "lab-console",
    version,
    author,
    about = "Lab Console - interactive SQL and service operation browsers",
    propagate_version = true,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Silence all non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file (falls back to LAB_CONSOLE_CONFIG env var)
    #[arg(short = 'c', long = "config", global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Browse canned SQL queries over the guitar-shop database
    Sql(SqlArgs),

    /// Browse object storage, cache and mail operations
    Services(ServicesArgs),

    /// List a console's categories and operations
    List(ListArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = utils::derive_level(cli.verbose, cli.quiet);
    utils::init_logging(level);

    let config = Config::resolve(cli.config.as_deref())?;

    match cli.command {
        Commands::Sql(args) => cmd::execute_sql(args, &config),
        Commands::Services(args) => cmd::execute_services(args, &config),
        Commands::List(args) => cmd::execute_list(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["lab-console", "sql", "-vv", "--run", "x", "-c", "lab.yaml"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("lab.yaml")));
        match cli.command {
            Commands::Sql(a) => assert_eq!(a.run.as_deref(), Some("x")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn services_flags() {
        let cli = Cli::try_parse_from([
            "lab-console",
            "services",
            "--no-cache",
            "--store-root",
            "/tmp/o",
            "--pause",
        ])
        .unwrap();
        match cli.command {
            Commands::Services(a) => {
                assert!(a.no_cache && a.pause);
                assert_eq!(a.store_root, Some(PathBuf::from("/tmp/o")));
                assert_eq!(a.spool, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
