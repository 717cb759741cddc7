/*!
`list.rs`

Implements the `list` subcommand: prints a console's catalog (or every
console's, when none is named) without entering the interactive loop.

Columns: category, index within category, key, display name. The key (or
`category/key`) is what `--run` accepts.

JSON Output Shape:
{
  "status": "ok",
  "console": "services",
  "title": "Lab 8: Service Operations Browser",
  "count": 15,
  "operations": [
    { "category": "storage", "index": 1, "key": "list_buckets", "name": "List Buckets" }
  ]
}
*/

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::cmd::console::ConsoleKind;
use crate::cmd::format::{Role, StyleOptions, color, table};
use crate::console::Catalog;
use crate::{services, sql};

/// CLI arguments for `lab-console list [console]`
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Console whose catalog is listed (sql|services); all when omitted
    pub console: Option<ConsoleKind>,

    /// Output JSON instead of human-readable text
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize, PartialEq)]
struct Entry {
    category: String,
    index: usize,
    key: String,
    name: String,
}

struct Listing {
    kind: ConsoleKind,
    title: String,
    items: Vec<Entry>,
}

fn entries<H>(catalog: &Catalog<H>) -> Vec<Entry> {
    catalog
        .categories()
        .iter()
        .flat_map(|cat| {
            cat.operations().iter().enumerate().map(|(i, op)| Entry {
                category: cat.name().to_string(),
                index: i + 1,
                key: op.key().to_string(),
                name: op.display_name().to_string(),
            })
        })
        .collect()
}

fn listing(kind: ConsoleKind) -> Result<Listing> {
    let (title, items) = match kind {
        ConsoleKind::Sql => {
            let c = sql::queries::catalog()?;
            (c.title().to_string(), entries(&c))
        }
        ConsoleKind::Services => {
            let c = services::operations::catalog()?;
            (c.title().to_string(), entries(&c))
        }
    };
    Ok(Listing { kind, title, items })
}

/// Entry point for the list subcommand.
pub fn execute_list(args: ListArgs) -> Result<()> {
    let kinds = match &args.console {
        Some(kind) => std::slice::from_ref(kind),
        None => ConsoleKind::variants(),
    };
    let listings = kinds.iter().map(|k| listing(*k)).collect::<Result<Vec<_>>>()?;

    if args.json {
        let body = match listings.as_slice() {
            [one] => one.to_json(),
            many => serde_json::Value::Array(many.iter().map(Listing::to_json).collect()),
        };
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    let style = StyleOptions::detect();
    let text: Vec<String> = listings.iter().map(|l| l.render(&style)).collect();
    println!("{}", text.join("\n\n"));
    Ok(())
}

impl Listing {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "status": "ok",
            "console": self.kind.to_string(),
            "title": self.title,
            "count": self.items.len(),
            "operations": self.items,
        })
    }

    fn render(&self, style: &StyleOptions) -> String {
        let rows: Vec<Vec<String>> = self
            .items
            .iter()
            .map(|e| {
                vec![
                    e.category.clone(),
                    e.index.to_string(),
                    e.key.clone(),
                    e.name.clone(),
                ]
            })
            .collect();

        let mut out = color(
            Role::Primary,
            format!("{} ({})", self.title, self.items.len()),
            style,
        );
        out.push_str("\n\n");
        out.push_str(&table(&["CATEGORY", "#", "KEY", "NAME"], &rows, style));
        out.push_str("\n\n");
        out.push_str(&color(
            Role::Dim,
            format!("Use `lab-console {} --run <key>` to run one directly", self.kind),
            style,
        ));
        out
    }
}
