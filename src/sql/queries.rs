//! Canned guitar-shop queries grouped the way the lab handout groups them.

use anyhow::Result;
use std::io::Write;

use super::SqlConnection;
use crate::console::{
    ActionResult, Catalog, Category, Completion, ItemLabel, Term, render_result_set,
};

pub const SINGLE: &[(&str, &str)] = &[
    (
        "authenticate_customer",
        "SELECT customer_id, password
FROM customers
WHERE email_address = 'erinv@gmail.com';",
    ),
    (
        "list_administrators",
        "SELECT admin_id, email_address, first_name, last_name
FROM administrators;",
    ),
    (
        "show_categories",
        "SELECT category_id, category_name
FROM categories;",
    ),
];

pub const INNER_JOIN: &[(&str, &str)] = &[
    (
        "products_with_categories_and_price",
        "SELECT c.category_name,
       p.product_code,
       p.product_name,
       (p.list_price - p.list_price * p.discount_percent / 100) AS final_price
FROM products AS p
INNER JOIN categories AS c
ON p.category_id = c.category_id;",
    ),
    (
        "customers_with_shipping_address",
        "SELECT c.customer_id,
       c.first_name,
       c.last_name,
       a.line1,
       a.city,
       a.state,
       a.zip_code
FROM customers AS c
INNER JOIN addresses AS a
ON c.shipping_address_id = a.address_id;",
    ),
    (
        "orders_with_customer_and_address",
        "SELECT o.order_id,
       c.first_name,
       c.last_name,
       a.line1 AS ship_address,
       o.ship_date
FROM orders AS o
INNER JOIN customers AS c
ON o.customer_id = c.customer_id
INNER JOIN addresses AS a
ON o.ship_address_id = a.address_id;",
    ),
    (
        "order_items_with_product_and_date",
        "SELECT oi.order_id,
       o.order_date,
       p.product_name,
       oi.quantity,
       oi.item_price
FROM order_items AS oi
INNER JOIN orders AS o
ON oi.order_id = o.order_id
INNER JOIN products AS p
ON oi.product_id = p.product_id;",
    ),
    (
        "order_items_by_category",
        "SELECT oi.item_id,
       p.product_name,
       c.category_name
FROM order_items AS oi
INNER JOIN products AS p
ON oi.product_id = p.product_id
INNER JOIN categories AS c
ON p.category_id = c.category_id;",
    ),
];

pub const GROUP_BY: &[(&str, &str)] = &[
    (
        "customers_per_state",
        "SELECT a.state,
       COUNT(*) AS num_customers
FROM addresses AS a
GROUP BY a.state;",
    ),
    (
        "total_quantity_per_product",
        "SELECT p.product_name,
       SUM(oi.quantity) AS total_sold
FROM order_items AS oi
INNER JOIN products AS p
ON p.product_id = oi.product_id
GROUP BY p.product_name;",
    ),
    (
        "products_by_category",
        "SELECT c.category_name,
       COUNT(*) AS product_count
FROM products AS p
INNER JOIN categories AS c
ON p.category_id = c.category_id
GROUP BY c.category_name;",
    ),
    (
        "max_order_value_per_customer",
        "SELECT o.customer_id,
       MAX(o.ship_amount + o.tax_amount) AS max_order_value
FROM orders AS o
GROUP BY o.customer_id;",
    ),
    (
        "orders_and_revenue_per_month",
        "SELECT strftime('%Y-%m', order_date) AS order_month,
       COUNT(*) AS order_count,
       SUM(ship_amount + tax_amount) AS revenue
FROM orders
GROUP BY order_month;",
    ),
];

fn run_query(sql: &'static str) -> impl Fn(&mut SqlConnection, &mut Term<'_>) -> ActionResult {
    move |db: &mut SqlConnection, term: &mut Term<'_>| {
        let rs = db.query(sql)?;
        write!(term, "{}", render_result_set(&rs))?;
        Ok(Completion::Done)
    }
}

fn category(name: &str, title: &str, queries: &[(&'static str, &'static str)]) -> Category<SqlConnection> {
    queries
        .iter()
        .fold(Category::new(name, title), |cat, &(key, sql)| {
            cat.operation(key, run_query(sql))
        })
}

pub fn catalog() -> Result<Catalog<SqlConnection>> {
    Catalog::builder("Lab 7: SQL Query Browser")
        .label(ItemLabel::QUERY)
        .category(category("single", "Single Queries", SINGLE))
        .category(category("inner_join", "Inner Join Queries", INNER_JOIN))
        .category(category("group_by", "Group-By Queries", GROUP_BY))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::{OperationOutcome, execute};
    use crate::console::term::ReaderSource;
    use std::io::Cursor;

    #[test]
    fn category_sizes_match_handout() {
        let cat = catalog().unwrap();
        let sizes: Vec<_> = cat.categories().iter().map(|c| c.len()).collect();
        assert_eq!(sizes, [3, 5, 5]);
        assert_eq!(cat.all_operations().len(), 13);
    }

    #[test]
    fn query_shapes() {
        for (_, sql) in INNER_JOIN {
            assert!(sql.to_uppercase().contains("INNER JOIN"));
        }
        for (_, sql) in GROUP_BY {
            assert!(sql.to_uppercase().contains("GROUP BY"));
        }
        for (_, sql) in SINGLE.iter().chain(INNER_JOIN).chain(GROUP_BY) {
            let upper = sql.to_uppercase();
            assert!(upper.contains("SELECT") && upper.contains("FROM"));
        }
    }

    #[test]
    fn every_query_runs_against_sample_data() {
        let cat = catalog().unwrap();
        let mut db = SqlConnection::open_in_memory().unwrap();
        db.seed().unwrap();
        for op in cat.all_operations() {
            let mut src = ReaderSource::new(Cursor::new(String::new()));
            let mut out = Vec::new();
            let outcome = {
                let mut term = Term::new(&mut src, &mut out);
                execute(&mut db, op, &mut term)
            };
            let text = String::from_utf8(out).unwrap();
            assert_eq!(outcome, OperationOutcome::Success, "{}: {text}", op.key());
            assert!(text.contains("Total rows returned:"), "{}", op.key());
        }
    }

    #[test]
    fn authenticate_customer_finds_erin() {
        let db = SqlConnection::open_in_memory().unwrap();
        db.seed().unwrap();
        let rs = db.query(SINGLE[0].1).unwrap();
        assert_eq!(rs.columns, ["customer_id", "password"]);
        assert_eq!(rs.row_count(), 1);
    }

    #[test]
    fn every_query_fails_cleanly_without_schema() {
        let cat = catalog().unwrap();
        let mut db = SqlConnection::open_in_memory().unwrap();
        for op in cat.all_operations() {
            let mut src = ReaderSource::new(Cursor::new(String::new()));
            let mut out = Vec::new();
            let outcome = {
                let mut term = Term::new(&mut src, &mut out);
                execute(&mut db, op, &mut term)
            };
            let text = String::from_utf8(out).unwrap();
            assert!(
                matches!(&outcome, OperationOutcome::Failure(m) if m.contains("no such table")),
                "{}: {outcome:?}",
                op.key()
            );
            assert!(text.contains("Error executing operation: "), "{}", op.key());
        }
    }
}
