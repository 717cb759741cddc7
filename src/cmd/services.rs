/*!
`services.rs`

Implements the `services` subcommand: the object storage / cache / mail
operations browser.

Each service is connected once before the menu starts. A service that
cannot be reached is left out (its category reports it as unavailable);
if none can be reached the command fails.
*/

use anyhow::{Result, bail};
use clap::Args;
use std::path::PathBuf;

use crate::cmd::shared::{run_interactive, run_one};
use crate::config::Config;
use crate::console::ConsoleOptions;
use crate::services::{ServiceHandles, ServiceTargets, operations};

/// CLI arguments for `lab-console services`
#[derive(Args, Debug, Default)]
pub struct ServicesArgs {
    /// Object storage root directory (default from config: lab-data/objects)
    #[arg(long, value_name = "DIR")]
    pub store_root: Option<PathBuf>,

    /// Mail spool directory (default from config: lab-data/mail)
    #[arg(long, value_name = "DIR")]
    pub spool: Option<PathBuf>,

    /// Start without the key-value cache
    #[arg(long)]
    pub no_cache: bool,

    /// Run a single operation by key (or category/key) and exit
    #[arg(long, value_name = "KEY")]
    pub run: Option<String>,

    /// Wait for Enter after each operation
    #[arg(long)]
    pub pause: bool,
}

/// Entry point for the services subcommand.
pub fn execute_services(args: ServicesArgs, config: &Config) -> Result<()> {
    let store_root = args
        .store_root
        .clone()
        .unwrap_or_else(|| config.services.store_root.clone());
    let spool = args
        .spool
        .clone()
        .unwrap_or_else(|| config.services.spool_dir.clone());

    let targets = ServiceTargets {
        store_root: Some(&store_root),
        cache: config.services.cache && !args.no_cache,
        spool: Some(&spool),
    };
    let mut handles = ServiceHandles::connect(&targets);
    if !handles.any_available() {
        bail!("Failed to connect to any services. Please check your configuration.");
    }

    let catalog = operations::catalog()?;
    match args.run.as_deref() {
        Some(selector) => run_one(&catalog, &mut handles, selector),
        None => {
            let options = ConsoleOptions {
                pause_after_operation: args.pause || config.console.pause_after_operation,
            };
            run_interactive(&catalog, &mut handles, &options)?;
            Ok(())
        }
    }
}
