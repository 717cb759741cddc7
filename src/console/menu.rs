/*!
Menu-driven console loop.

States: `MainMenu -> CategoryMenu(category | All) -> execute -> MainMenu`,
terminal state reached by `0` at the main menu, end of input, or Ctrl-C.
One operation is executed per category visit; the operator re-selects the
category to run another.
*/

use anyhow::Result;
use std::io::Write;

use super::catalog::{Catalog, Operation};
use super::executor::execute;
use super::term::{Input, Term};
use crate::{log_debug, log_info};

pub const INVALID_SELECTION: &str = "Invalid selection. Please try again.";
pub const INVALID_NUMBER: &str = "Please enter a valid number.";

#[derive(Debug, Clone, Default)]
pub struct ConsoleOptions {
    /// Wait for Enter after each round, as the classroom tools did.
    pub pause_after_operation: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    Quit,
    Interrupted,
    InputClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Category(usize),
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    MainMenu,
    CategoryMenu(View),
    Exited(ExitReason),
}

/// What happened during one category visit.
enum Round {
    Back,
    Done,
    Exit(ExitReason),
}

pub fn run<H>(
    catalog: &Catalog<H>,
    handles: &mut H,
    term: &mut Term<'_>,
    options: &ConsoleOptions,
) -> Result<ExitReason> {
    let mut state = State::MainMenu;
    let mut executed = 0usize;
    let mut failed = 0usize;

    loop {
        state = match state {
            State::MainMenu => main_menu(catalog, handles, term, options)?,
            State::CategoryMenu(view) => {
                match category_menu(catalog, handles, term, view, &mut executed, &mut failed)? {
                    Round::Exit(reason) => State::Exited(reason),
                    Round::Back => State::MainMenu,
                    Round::Done => pause(term, options)?.unwrap_or(State::MainMenu),
                }
            }
            State::Exited(reason) => {
                match reason {
                    ExitReason::Quit => writeln!(term, "\nGoodbye!")?,
                    ExitReason::Interrupted => writeln!(term, "\n\nGoodbye!")?,
                    ExitReason::InputClosed => writeln!(term)?,
                }
                term.flush()?;
                log_info!("console exited ({executed} executed, {failed} failed)");
                return Ok(reason);
            }
        };
    }
}

fn main_menu<H>(
    catalog: &Catalog<H>,
    handles: &H,
    term: &mut Term<'_>,
    options: &ConsoleOptions,
) -> Result<State> {
    let label = catalog.label();
    let categories = catalog.categories();
    let all_choice = categories.len() + 1;

    writeln!(term, "\n{}", "=".repeat(60))?;
    writeln!(term, "{}", catalog.title())?;
    writeln!(term, "{}", "=".repeat(60))?;
    writeln!(term, "\nAvailable {} Categories:", label.group_noun)?;
    for (i, cat) in categories.iter().enumerate() {
        writeln!(term, "{}. {}", i + 1, cat.title())?;
    }
    writeln!(term, "{all_choice}. All {}", label.plural)?;
    writeln!(term, "0. Exit")?;

    let choice = match term.ask(&format!("\nSelect a category (0-{all_choice}): "))? {
        Input::Line(line) => line,
        Input::Closed => return Ok(State::Exited(ExitReason::InputClosed)),
        Input::Interrupted => return Ok(State::Exited(ExitReason::Interrupted)),
    };

    match choice.trim().parse::<usize>() {
        Ok(0) => Ok(State::Exited(ExitReason::Quit)),
        Ok(n) if n == all_choice => Ok(State::CategoryMenu(View::All)),
        Ok(n) if n <= categories.len() => {
            let cat = &categories[n - 1];
            if let Some(service) = cat.unavailable(handles) {
                writeln!(
                    term,
                    "{service} is not available. Please ensure the service is running."
                )?;
                return Ok(State::MainMenu);
            }
            Ok(State::CategoryMenu(View::Category(n - 1)))
        }
        _ => {
            writeln!(term, "{INVALID_SELECTION}")?;
            Ok(pause(term, options)?.unwrap_or(State::MainMenu))
        }
    }
}

fn category_menu<H>(
    catalog: &Catalog<H>,
    handles: &mut H,
    term: &mut Term<'_>,
    view: View,
    executed: &mut usize,
    failed: &mut usize,
) -> Result<Round> {
    let label = catalog.label();
    let (heading, listed): (String, Vec<&Operation<H>>) = match view {
        View::Category(idx) => {
            let cat = &catalog.categories()[idx];
            (cat.title().to_uppercase(), cat.operations().iter().collect())
        }
        View::All => (
            format!("ALL {}", label.plural.to_uppercase()),
            catalog.all_operations(),
        ),
    };

    writeln!(term, "\n{}", "-".repeat(40))?;
    writeln!(term, "{heading}")?;
    writeln!(term, "{}", "-".repeat(40))?;
    for (i, op) in listed.iter().enumerate() {
        writeln!(term, "{}. {}", i + 1, op.display_name())?;
    }
    writeln!(term, "0. Back to main menu")?;

    let prompt = format!(
        "\nSelect {} {} (0-{}): ",
        label.article,
        label.singular,
        listed.len()
    );
    let choice = match term.ask(&prompt)? {
        Input::Line(line) => line,
        Input::Closed => return Ok(Round::Exit(ExitReason::InputClosed)),
        Input::Interrupted => return Ok(Round::Exit(ExitReason::Interrupted)),
    };

    let index = match choice.trim().parse::<usize>() {
        Ok(0) => return Ok(Round::Back),
        Ok(n) => n,
        Err(_) => {
            writeln!(term, "{INVALID_NUMBER}")?;
            return Ok(Round::Done);
        }
    };
    let picked = match view {
        View::Category(idx) => catalog.operation_at(idx, index),
        View::All => catalog.all_operation_at(index),
    };
    let Some(op) = picked else {
        writeln!(term, "{INVALID_SELECTION}")?;
        return Ok(Round::Done);
    };

    // In the All view the owning category still decides availability.
    let owner = catalog.category_of(op);
    if let Some(service) = owner.unavailable(handles) {
        writeln!(term, "{service} is not available for this operation.")?;
        return Ok(Round::Done);
    }

    log_debug!("executing '{}/{}'", owner.name(), op.key());
    *executed += 1;
    if !execute(handles, op, term).is_success() {
        *failed += 1;
    }

    if term.interrupted() {
        return Ok(Round::Exit(ExitReason::Interrupted));
    }
    Ok(Round::Done)
}

/// `Some(state)` when the pause itself ended the session.
fn pause(term: &mut Term<'_>, options: &ConsoleOptions) -> Result<Option<State>> {
    if !options.pause_after_operation {
        return Ok(None);
    }
    Ok(match term.ask("\nPress Enter to continue...")? {
        Input::Line(_) => None,
        Input::Closed => Some(State::Exited(ExitReason::InputClosed)),
        Input::Interrupted => Some(State::Exited(ExitReason::Interrupted)),
    })
}

/* --------------------------------- Tests ---------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::catalog::Category;
    use crate::console::executor::{ActionResult, Completion};
    use crate::console::term::{LineSource, ReaderSource};
    use anyhow::bail;
    use std::io::Cursor;

    #[derive(Default)]
    struct Recorder {
        ran: Vec<String>,
        cache_up: bool,
    }

    fn record(key: &'static str) -> impl Fn(&mut Recorder, &mut Term<'_>) -> ActionResult {
        move |r: &mut Recorder, _: &mut Term<'_>| {
            r.ran.push(key.to_string());
            Ok(Completion::Done)
        }
    }

    fn single() -> Catalog<Recorder> {
        Catalog::builder("Single")
            .category(
                Category::new("single", "Single")
                    .operation("a", record("a"))
                    .operation("b", record("b"))
                    .operation("c", record("c")),
            )
            .build()
            .unwrap()
    }

    fn session<H>(
        catalog: &Catalog<H>,
        handles: &mut H,
        script: &str,
        options: ConsoleOptions,
    ) -> (ExitReason, String) {
        let mut src = ReaderSource::new(Cursor::new(script.to_string()));
        run_with(catalog, handles, &mut src, options)
    }

    fn run_with<H>(
        catalog: &Catalog<H>,
        handles: &mut H,
        src: &mut dyn LineSource,
        options: ConsoleOptions,
    ) -> (ExitReason, String) {
        let mut out = Vec::new();
        let reason = {
            let mut term = Term::new(src, &mut out);
            run(catalog, handles, &mut term, &options).unwrap()
        };
        (reason, String::from_utf8(out).unwrap())
    }

    #[test]
    fn select_category_then_operation_then_quit() {
        let cat = single();
        let mut rec = Recorder::default();
        let (reason, out) = session(&cat, &mut rec, "1\n2\n0\n", ConsoleOptions::default());
        assert_eq!(reason, ExitReason::Quit);
        assert_eq!(rec.ran, ["b"]);
        assert!(out.contains("Select a category (0-2): "));
        assert!(out.contains("Select an operation (0-3): "));
        assert!(out.contains("Executing: B"));
        assert!(out.ends_with("\nGoodbye!\n"));
        // back at the main menu after executing
        assert_eq!(out.matches("Available Service Categories:").count(), 2);
    }

    #[test]
    fn main_menu_invalid_input_reprompts() {
        let cat = single();
        let mut rec = Recorder::default();
        let (reason, out) = session(&cat, &mut rec, "x\n9\n0\n", ConsoleOptions::default());
        assert_eq!(reason, ExitReason::Quit);
        assert_eq!(out.matches(INVALID_SELECTION).count(), 2);
        assert!(rec.ran.is_empty());
    }

    #[test]
    fn category_menu_back_and_bad_input() {
        let cat = single();
        let mut rec = Recorder::default();
        let (_, out) = session(&cat, &mut rec, "1\n0\n1\nzz\n1\n4\n0\n", ConsoleOptions::default());
        assert!(rec.ran.is_empty());
        assert_eq!(out.matches(INVALID_NUMBER).count(), 1);
        assert_eq!(out.matches(INVALID_SELECTION).count(), 1);
        assert_eq!(out.matches("Back to main menu").count(), 3);
    }

    #[test]
    fn all_view_dispatches_to_owning_category() {
        let cat = Catalog::builder("Two")
            .label(crate::console::catalog::ItemLabel::QUERY)
            .category(Category::new("x", "X").operation("a", record("x.a")))
            .category(
                Category::new("y", "Y")
                    .requires("Cache", |r: &Recorder| r.cache_up)
                    .operation("a", record("y.a"))
                    .operation("b", record("y.b")),
            )
            .build()
            .unwrap();

        let mut rec = Recorder::default();
        let (_, out) = session(&cat, &mut rec, "3\n1\n3\n3\n0\n", ConsoleOptions::default());
        assert!(out.contains("ALL QUERIES"));
        assert!(out.contains("Select a query (0-3): "));
        assert!(out.contains("Cache is not available for this operation."));
        assert_eq!(out.matches("Cache is not available. Please ensure the service is running.").count(), 0);
        assert_eq!(rec.ran, ["x.a"]);

        let mut rec = Recorder::default();
        let (_, out) = session(&cat, &mut rec, "2\n0\n", ConsoleOptions::default());
        assert!(out.contains("Cache is not available. Please ensure the service is running."));
        assert!(!out.contains("Back to main menu"));

        let mut rec = Recorder {
            cache_up: true,
            ..Recorder::default()
        };
        let _ = session(&cat, &mut rec, "3\n2\n2\n2\n0\n", ConsoleOptions::default());
        assert_eq!(rec.ran, ["y.a", "y.b"]);
    }

    #[test]
    fn failures_do_not_stop_the_loop() {
        let cat = Catalog::builder("F")
            .category(
                Category::new("f", "F")
                    .operation("boom", |_: &mut Recorder, _: &mut Term<'_>| bail!("down"))
                    .operation("ok", record("ok")),
            )
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        let (reason, out) = session(&cat, &mut rec, "1\n1\n1\n2\n0\n", ConsoleOptions::default());
        assert_eq!(reason, ExitReason::Quit);
        assert!(out.contains("Error executing operation: down"));
        assert_eq!(rec.ran, ["ok"]);
    }

    #[test]
    fn pause_consumes_a_line() {
        let cat = single();
        let mut rec = Recorder::default();
        let opts = ConsoleOptions {
            pause_after_operation: true,
        };
        let (reason, out) = session(&cat, &mut rec, "1\n1\n\n0\n", opts);
        assert_eq!(reason, ExitReason::Quit);
        assert_eq!(rec.ran, ["a"]);
        assert!(out.contains("Press Enter to continue..."));
    }

    #[test]
    fn end_of_input_exits() {
        let cat = single();
        let mut rec = Recorder::default();
        let (reason, _) = session(&cat, &mut rec, "1\n", ConsoleOptions::default());
        assert_eq!(reason, ExitReason::InputClosed);
    }

    #[test]
    fn interrupt_during_action_prompt_ends_session() {
        // Menu answers come from the script; the first read past it is Ctrl-C.
        struct ThenInterrupt(Vec<&'static str>);
        impl LineSource for ThenInterrupt {
            fn next_line(&mut self) -> Result<Input> {
                Ok(if self.0.is_empty() {
                    Input::Interrupted
                } else {
                    Input::Line(self.0.remove(0).to_string())
                })
            }
        }

        let cat = Catalog::builder("Ask")
            .category(Category::new("ask", "Ask").operation(
                "ask",
                |r: &mut Recorder, t: &mut Term<'_>| {
                    let v = t.prompt("Enter key: ")?;
                    r.ran.push(v);
                    Ok(Completion::Done)
                },
            ))
            .build()
            .unwrap();

        let mut rec = Recorder::default();
        let mut src = ThenInterrupt(vec!["1", "1"]);
        let (reason, out) = run_with(&cat, &mut rec, &mut src, ConsoleOptions::default());
        assert_eq!(reason, ExitReason::Interrupted);
        assert!(rec.ran.is_empty());
        assert!(out.contains("Enter key: "));
        assert!(out.contains("Error executing operation: interrupted"));
        assert!(out.ends_with("\n\nGoodbye!\n"));
        assert_eq!(out.matches("Available Service Categories:").count(), 1);
    }

    #[test]
    fn interrupt_exits_gracefully() {
        struct Interrupting;
        impl LineSource for Interrupting {
            fn next_line(&mut self) -> Result<Input> {
                Ok(Input::Interrupted)
            }
        }
        let cat = single();
        let mut rec = Recorder::default();
        let (reason, out) = run_with(&cat, &mut rec, &mut Interrupting, ConsoleOptions::default());
        assert_eq!(reason, ExitReason::Interrupted);
        assert!(out.ends_with("\n\nGoodbye!\n"));
    }
}
