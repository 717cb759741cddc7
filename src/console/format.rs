//! Result-set rendering for query-style operations.
//!
//! Column width is `min(max(name, widest value) + 2, 30)`. Overlong values are
//! cut so that value plus `...` fills exactly `width - 2` characters. Widths
//! are counted in chars, not bytes.

use std::fmt;

/// Hard cap on a rendered column, padding included.
pub const MAX_COLUMN_WIDTH: usize = 30;
const PADDING: usize = 2;
const ELLIPSIS: &str = "...";
const NULL: &str = "NULL";

/// Nullable scalar cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    /// Display string; `NULL` for a missing value.
    pub fn display(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str(NULL),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Real(r) if r.is_finite() && r.fract() == 0.0 => write!(f, "{r:.1}"),
            Value::Real(r) => write!(f, "{r}"),
            Value::Text(s) => f.write_str(s),
            Value::Blob(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

/// Columns plus rows; each row aligned 1:1 with `columns`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl ResultSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn column_widths(rs: &ResultSet) -> Vec<usize> {
    rs.columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let widest = rs
                .rows
                .iter()
                .map(|row| row.get(i).map_or(NULL.len(), |v| v.display().chars().count()))
                .max()
                .unwrap_or(0);
            (name.chars().count().max(widest) + PADDING).min(MAX_COLUMN_WIDTH)
        })
        .collect()
}

fn fit_cell(value: &str, width: usize) -> String {
    let limit = width.saturating_sub(PADDING);
    let shown = if value.chars().count() > limit {
        let keep = width.saturating_sub(PADDING + ELLIPSIS.len());
        let mut cut: String = value.chars().take(keep).collect();
        cut.push_str(ELLIPSIS);
        cut
    } else {
        value.to_string()
    };
    format!("{shown:<width$}")
}

/// Render `rs` as an aligned text table followed by a row-count footer.
pub fn render_result_set(rs: &ResultSet) -> String {
    if rs.is_empty() {
        return "No results found.\n".to_string();
    }

    let widths = column_widths(rs);
    let mut out = String::new();

    let header = rs
        .columns
        .iter()
        .zip(&widths)
        .map(|(name, w)| format!("{name:<w$}", w = *w))
        .collect::<Vec<_>>()
        .join(" | ");
    out.push_str(&header);
    out.push('\n');
    out.push_str(&"-".repeat(header.chars().count()));
    out.push('\n');

    for row in &rs.rows {
        let line = widths
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let raw = row.get(i).map_or_else(|| NULL.to_string(), Value::display);
                fit_cell(&raw, *w)
            })
            .collect::<Vec<_>>()
            .join(" | ");
        out.push_str(&line);
        out.push('\n');
    }

    out.push_str(&format!("\nTotal rows returned: {}\n", rs.row_count()));
    out
}
