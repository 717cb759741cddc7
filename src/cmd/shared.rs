/*!
Shared helpers for the console subcommands.

  - run_one         (`--run KEY`: execute a single operation and exit)
  - run_interactive (menu loop over stdin/stdout with Ctrl-C handling)

Both are generic over the capability bundle so `sql` and `services` share
one code path.
*/

use anyhow::{Result, anyhow, bail};
use std::io;

use crate::console::term::ReaderSource;
use crate::console::{
    Catalog, ConsoleOptions, ExitReason, OperationOutcome, StdinSource, Term, execute, menu,
};
use crate::{log_debug, log_info};

/// Execute the operation named by `selector` once, reading any prompts from
/// stdin. A failed operation is an error so the process exits non-zero.
pub fn run_one<H>(catalog: &Catalog<H>, handles: &mut H, selector: &str) -> Result<()> {
    let stdin = io::stdin();
    let mut source = ReaderSource::new(stdin.lock());
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut term = Term::new(&mut source, &mut out);
    run_selected(catalog, handles, selector, &mut term)
}

fn run_selected<H>(
    catalog: &Catalog<H>,
    handles: &mut H,
    selector: &str,
    term: &mut Term<'_>,
) -> Result<()> {
    let op = catalog
        .find(selector)
        .ok_or_else(|| anyhow!("Unknown operation '{selector}' (see `lab-console list`)"))?;
    if let Some(service) = catalog.category_of(op).unavailable(handles) {
        bail!("{service} is not available for this operation.");
    }
    log_debug!("running {} non-interactively", op.key());
    match execute(handles, op, term) {
        OperationOutcome::Success => Ok(()),
        OperationOutcome::Failure(msg) => bail!("{} failed: {msg}", op.display_name()),
    }
}

/// Run the menu loop until the operator quits, input ends, or Ctrl-C.
pub fn run_interactive<H>(
    catalog: &Catalog<H>,
    handles: &mut H,
    options: &ConsoleOptions,
) -> Result<ExitReason> {
    let mut source = StdinSource::new()?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut term = Term::new(&mut source, &mut out);
    let reason = menu::run(catalog, handles, &mut term, options)?;
    log_info!("{} closed ({reason:?})", catalog.title());
    Ok(reason)
}
