/*!
Static catalog of console operations.

A `Catalog<H>` is an ordered list of `Category<H>`, each an ordered list of
`Operation<H>`. `H` is the capability bundle the actions run against (a SQL
connection, a set of service clients, a test recorder). The catalog is built
once at startup and never mutated afterwards.

Selection indices handed to the lookup helpers are 1-based, exactly as the
menus print them.
*/

use anyhow::{Result, bail};
use std::collections::HashSet;

use super::executor::ActionResult;
use super::term::Term;

/// Action bound to an operation.
pub type Action<H> = Box<dyn Fn(&mut H, &mut Term<'_>) -> ActionResult>;

/// A single named, invocable action.
pub struct Operation<H> {
    key: String,
    display_name: String,
    category: usize,
    action: Action<H>,
}

impl<H> Operation<H> {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub(crate) fn invoke(&self, handles: &mut H, term: &mut Term<'_>) -> ActionResult {
        (self.action)(handles, term)
    }
}

impl<H> std::fmt::Debug for Operation<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operation")
            .field("key", &self.key)
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

/// Availability check for the capability a category runs against.
pub struct Gate<H> {
    pub service: String,
    pub check: fn(&H) -> bool,
}

/// Named, ordered group of operations.
pub struct Category<H> {
    name: String,
    title: String,
    gate: Option<Gate<H>>,
    operations: Vec<Operation<H>>,
}

impl<H> Category<H> {
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            gate: None,
            operations: Vec::new(),
        }
    }

    /// Refuse the category unless `check` reports the backing service as up.
    pub fn requires(mut self, service: impl Into<String>, check: fn(&H) -> bool) -> Self {
        self.gate = Some(Gate {
            service: service.into(),
            check,
        });
        self
    }

    pub fn operation<F>(mut self, key: impl Into<String>, action: F) -> Self
    where
        F: Fn(&mut H, &mut Term<'_>) -> ActionResult + 'static,
    {
        let key = key.into();
        self.operations.push(Operation {
            display_name: display_name(&key),
            key,
            category: 0,
            action: Box::new(action),
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn operations(&self) -> &[Operation<H>] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `None` when the backing service is usable, otherwise its name.
    pub fn unavailable(&self, handles: &H) -> Option<&str> {
        match &self.gate {
            Some(gate) if !(gate.check)(handles) => Some(gate.service.as_str()),
            _ => None,
        }
    }
}

/// How the console refers to the items it lists ("query", "operation").
#[derive(Debug, Clone)]
pub struct ItemLabel {
    pub article: &'static str,
    pub singular: &'static str,
    pub plural: &'static str,
    pub group_noun: &'static str,
}

impl ItemLabel {
    pub const OPERATION: ItemLabel = ItemLabel {
        article: "an",
        singular: "operation",
        plural: "Operations",
        group_noun: "Service",
    };

    pub const QUERY: ItemLabel = ItemLabel {
        article: "a",
        singular: "query",
        plural: "Queries",
        group_noun: "Query",
    };
}

pub struct Catalog<H> {
    title: String,
    label: ItemLabel,
    categories: Vec<Category<H>>,
}

pub struct CatalogBuilder<H> {
    title: String,
    label: ItemLabel,
    categories: Vec<Category<H>>,
}

impl<H> CatalogBuilder<H> {
    pub fn label(mut self, label: ItemLabel) -> Self {
        self.label = label;
        self
    }

    pub fn category(mut self, mut category: Category<H>) -> Self {
        let idx = self.categories.len();
        for op in &mut category.operations {
            op.category = idx;
        }
        self.categories.push(category);
        self
    }

    pub fn build(self) -> Result<Catalog<H>> {
        if self.categories.is_empty() {
            bail!("catalog '{}' has no categories", self.title);
        }
        for cat in &self.categories {
            if cat.is_empty() {
                bail!("category '{}' has no operations", cat.name);
            }
            let mut seen = HashSet::new();
            for op in &cat.operations {
                if !seen.insert(op.key.as_str()) {
                    bail!(
                        "duplicate operation key '{}' in category '{}'",
                        op.key,
                        cat.name
                    );
                }
            }
        }
        Ok(Catalog {
            title: self.title,
            label: self.label,
            categories: self.categories,
        })
    }
}

impl<H> Catalog<H> {
    pub fn builder(title: impl Into<String>) -> CatalogBuilder<H> {
        CatalogBuilder {
            title: title.into(),
            label: ItemLabel::OPERATION,
            categories: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn label(&self) -> &ItemLabel {
        &self.label
    }

    pub fn categories(&self) -> &[Category<H>] {
        &self.categories
    }

    /// Flattened view: category order, then operation order within each.
    pub fn all_operations(&self) -> Vec<&Operation<H>> {
        self.categories
            .iter()
            .flat_map(|c| c.operations.iter())
            .collect()
    }

    /// 1-based operation lookup within a category.
    pub fn operation_at(&self, category: usize, index: usize) -> Option<&Operation<H>> {
        let cat = self.categories.get(category)?;
        index.checked_sub(1).and_then(|i| cat.operations.get(i))
    }

    /// 1-based lookup across the flattened view.
    pub fn all_operation_at(&self, index: usize) -> Option<&Operation<H>> {
        index
            .checked_sub(1)
            .and_then(|i| self.categories.iter().flat_map(|c| c.operations.iter()).nth(i))
    }

    pub fn category_of(&self, op: &Operation<H>) -> &Category<H> {
        &self.categories[op.category]
    }

    /// Find by `key` or `category/key`; a bare key resolves to the first match
    /// in category order.
    pub fn find(&self, selector: &str) -> Option<&Operation<H>> {
        let selector = selector.trim();
        if let Some((cat, key)) = selector.split_once('/') {
            return self
                .categories
                .iter()
                .find(|c| c.name.eq_ignore_ascii_case(cat))?
                .operations
                .iter()
                .find(|op| op.key == key);
        }
        self.all_operations().into_iter().find(|op| op.key == selector)
    }
}

/// "products_with_categories_and_price" -> "Products With Categories And Price".
pub fn display_name(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut in_word = false;
    for ch in key.chars() {
        let ch = if ch == '_' || ch == '-' { ' ' } else { ch };
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

/* --------------------------------- Tests ---------------------------------- */
