/*!
format.rs

Human-output helpers for the non-interactive subcommands (`list`, `--run`
summaries). The interactive menus print plain text only; their wording is
matched by scripted sessions.

  - StyleOptions::detect() -> StyleOptions   (tty, NO_COLOR, COLUMNS)
  - color(role, text, &StyleOptions) -> String
  - table(headers, rows, &StyleOptions) -> String

This module returns strings; callers decide where they are printed.
*/

use std::io::IsTerminal;

/* -------------------------------------------------------------------------- */
/* Style Options                                                              */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Clone)]
pub struct StyleOptions {
    pub use_color: bool,
    pub term_width: usize,
}

impl StyleOptions {
    /// Colors unless `NO_COLOR` is set or stdout is not a terminal.
    pub fn detect() -> Self {
        if !std::io::stdout().is_terminal() {
            return Self::plain();
        }
        let width = std::env::var("COLUMNS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .map(|w| w.clamp(40, 220))
            .unwrap_or(100);

        StyleOptions {
            use_color: std::env::var_os("NO_COLOR").is_none(),
            term_width: width,
        }
    }

    pub fn plain() -> Self {
        StyleOptions {
            use_color: false,
            term_width: 100,
        }
    }
}

/* -------------------------------------------------------------------------- */
/* Color                                                                      */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Clone, Copy)]
pub enum Role {
    Primary,
    Accent,
    Dim,
}

pub fn color(role: Role, text: impl AsRef<str>, style: &StyleOptions) -> String {
    if !style.use_color {
        return text.as_ref().to_string();
    }
    let code = match role {
        Role::Primary => "38;5;45", // cyan-ish
        Role::Accent => "38;5;213", // magenta/pink
        Role::Dim => "2",
    };
    format!("\x1b[{code}m{}\x1b[0m", text.as_ref())
}

/* -------------------------------------------------------------------------- */
/* Table Rendering                                                             */
/* -------------------------------------------------------------------------- */

/// Two-space separated table; the last column is cut to fit `term_width`.
pub fn table(headers: &[&str], rows: &[Vec<String>], style: &StyleOptions) -> String {
    if headers.is_empty() {
        return String::new();
    }
    let cols = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(cols) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let fixed: usize = widths[..cols - 1].iter().sum::<usize>() + (cols - 1) * 2;
    if let Some(last) = widths.last_mut() {
        let room = style.term_width.saturating_sub(fixed).max(8);
        *last = (*last).min(room);
    }

    let render = |cells: &mut dyn Iterator<Item = &str>| -> String {
        cells
            .enumerate()
            .map(|(i, c)| {
                let cell = truncate_ellipsis(c, widths[i]);
                if i + 1 == cols {
                    cell
                } else {
                    format!("{cell:<w$}", w = widths[i])
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
    };

    let mut out = color(Role::Accent, render(&mut headers.iter().copied()), style);
    out.push('\n');
    let sep = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  ");
    out.push_str(&color(Role::Dim, sep, style));
    for row in rows {
        out.push('\n');
        out.push_str(&render(&mut row.iter().map(String::as_str)));
    }
    out
}

pub fn truncate_ellipsis(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    if max_chars <= 1 {
        return "…".into();
    }
    let mut out: String = s.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}

/* -------------------------------------------------------------------------- */
/* Tests                                                                       */
/* -------------------------------------------------------------------------- */
