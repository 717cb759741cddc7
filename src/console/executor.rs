//! Uniform operation execution with failure containment.
//!
//! Every action returns `ActionResult`. Errors and panics are caught here and
//! turned into `OperationOutcome::Failure`; nothing raised by an action
//! reaches the menu loop.

use std::io::Write;
use std::panic::{self, AssertUnwindSafe};

use super::catalog::Operation;
use super::term::Term;
use crate::log_debug;

/// How an action that did not raise finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Done,
    /// Soft failure: the action ran but did not complete.
    NotCompleted,
}

pub type ActionResult = anyhow::Result<Completion>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationOutcome {
    Success,
    Failure(String),
}

impl OperationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, OperationOutcome::Success)
    }
}

pub const SOFT_FAILURE: &str = "operation failed";

pub fn execute<H>(handles: &mut H, op: &Operation<H>, term: &mut Term<'_>) -> OperationOutcome {
    // Output errors are ignored; the terminal is the only sink.
    let _ = writeln!(term, "\nExecuting: {}", op.display_name());
    let _ = writeln!(term, "{}", "=".repeat(80));

    let result = panic::catch_unwind(AssertUnwindSafe(|| op.invoke(handles, term)));

    let outcome = match result {
        Ok(Ok(Completion::Done)) => {
            let _ = writeln!(term, "Operation completed successfully");
            OperationOutcome::Success
        }
        Ok(Ok(Completion::NotCompleted)) => {
            let _ = writeln!(term, "Operation failed");
            OperationOutcome::Failure(SOFT_FAILURE.to_string())
        }
        Ok(Err(e)) => {
            let _ = writeln!(term, "Error executing operation: {e:#}");
            OperationOutcome::Failure(format!("{e:#}"))
        }
        Err(payload) => {
            let msg = panic_message(payload.as_ref());
            let _ = writeln!(term, "Error executing operation: {msg}");
            OperationOutcome::Failure(msg)
        }
    };
    let _ = term.flush();

    if let OperationOutcome::Failure(reason) = &outcome {
        log_debug!("operation '{}' failed: {reason}", op.key());
    }
    outcome
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "action panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::catalog::{Catalog, Category};
    use crate::console::term::ReaderSource;
    use anyhow::bail;
    use std::io::Cursor;

    fn catalog() -> Catalog<u32> {
        Catalog::builder("exec")
            .category(
                Category::new("c", "C")
                    .operation("works", |n: &mut u32, _: &mut Term<'_>| {
                        *n += 1;
                        Ok(Completion::Done)
                    })
                    .operation("gives_up", |_: &mut u32, _: &mut Term<'_>| {
                        Ok(Completion::NotCompleted)
                    })
                    .operation("raises", |_: &mut u32, _: &mut Term<'_>| {
                        bail!("backend unreachable")
                    })
                    .operation("bad_number", |_: &mut u32, t: &mut Term<'_>| {
                        let n: i64 = t.prompt("Enter number: ")?.parse()?;
                        Ok(if n > 0 { Completion::Done } else { Completion::NotCompleted })
                    })
                    .operation("panics", |_: &mut u32, _: &mut Term<'_>| {
                        panic!("boom")
                    }),
            )
            .build()
            .unwrap()
    }

    fn run(key: &str, input: &str) -> (OperationOutcome, String, u32) {
        let cat = catalog();
        let op = cat.find(key).unwrap();
        let mut src = ReaderSource::new(Cursor::new(input.to_string()));
        let mut out = Vec::new();
        let mut counter = 0;
        let outcome = {
            let mut term = Term::new(&mut src, &mut out);
            execute(&mut counter, op, &mut term)
        };
        (outcome, String::from_utf8(out).unwrap(), counter)
    }

    #[test]
    fn success_prints_banner_and_result() {
        let (outcome, out, n) = run("works", "");
        assert_eq!(outcome, OperationOutcome::Success);
        assert_eq!(n, 1);
        assert!(out.starts_with("\nExecuting: Works\n"));
        assert!(out.contains(&"=".repeat(80)));
        assert!(out.ends_with("Operation completed successfully\n"));
    }

    #[test]
    fn soft_failure_has_no_detail() {
        let (outcome, out, _) = run("gives_up", "");
        assert_eq!(outcome, OperationOutcome::Failure(SOFT_FAILURE.into()));
        assert!(out.ends_with("Operation failed\n"));
    }

    #[test]
    fn errors_are_contained() {
        let (outcome, out, _) = run("raises", "");
        assert_eq!(
            outcome,
            OperationOutcome::Failure("backend unreachable".into())
        );
        assert!(out.contains("Error executing operation: backend unreachable"));
    }

    #[test]
    fn malformed_input_is_a_failure() {
        let (outcome, _, _) = run("bad_number", "abc\n");
        assert!(!outcome.is_success());
    }

    #[test]
    fn panics_are_contained() {
        let (outcome, out, _) = run("panics", "");
        assert_eq!(outcome, OperationOutcome::Failure("boom".into()));
        assert!(out.contains("Error executing operation: boom"));
    }

    #[test]
    fn every_key_yields_its_expected_outcome() {
        let expected = [
            ("works", true),
            ("gives_up", false),
            ("raises", false),
            ("bad_number", false),
            ("panics", false),
        ];
        let cat = catalog();
        let keys: Vec<String> = cat.all_operations().iter().map(|o| o.key().to_string()).collect();
        assert_eq!(keys, expected.map(|(k, _)| k));

        for (key, ok) in expected {
            let (outcome, out, _) = run(key, "");
            assert_eq!(outcome.is_success(), ok, "{key}: {outcome:?}");
            assert!(out.starts_with("\nExecuting: "), "{key}");
            let last = out.lines().last().unwrap_or_default();
            if ok {
                assert_eq!(last, "Operation completed successfully", "{key}");
            } else {
                assert!(
                    last == "Operation failed" || last.starts_with("Error executing operation: "),
                    "{key}: {last}"
                );
            }
        }
    }
}
