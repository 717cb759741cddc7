//! Operation catalog for the service browser. Every action collects its
//! arguments by prompting through the terminal.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::ServiceHandles;
use super::mail::{BodyKind, Message};
use super::store::format_time;
use crate::console::{ActionResult, Catalog, Category, Completion, Term};

/* ---- Object storage ---- */

fn list_buckets(h: &mut ServiceHandles, t: &mut Term<'_>) -> ActionResult {
    let buckets = h.store()?.list_buckets()?;
    writeln!(t, "Available buckets:")?;
    writeln!(t, "{}", "-".repeat(40))?;
    if buckets.is_empty() {
        writeln!(t, "No buckets found.")?;
    }
    for b in buckets {
        writeln!(t, "• {} (Created: {})", b.name, format_time(b.created))?;
    }
    Ok(Completion::Done)
}

fn create_bucket(h: &mut ServiceHandles, t: &mut Term<'_>) -> ActionResult {
    let store = h.store()?;
    let bucket = t.prompt("Enter bucket name: ")?;
    store.create_bucket(&bucket)?;
    writeln!(t, "Bucket '{bucket}' created successfully")?;
    Ok(Completion::Done)
}

fn upload_file(h: &mut ServiceHandles, t: &mut Term<'_>) -> ActionResult {
    let store = h.store()?;
    let bucket = t.prompt("Enter bucket name: ")?;
    let file = PathBuf::from(t.prompt("Enter file path to upload: ")?);
    let default_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let object = t.prompt_or(
        "Enter object name (or press Enter for same as file): ",
        &default_name,
    )?;
    let bytes = store.upload_file(&file, &bucket, &object)?;
    writeln!(t, "File uploaded successfully to {bucket}/{object} ({bytes} bytes)")?;
    Ok(Completion::Done)
}

fn list_objects(h: &mut ServiceHandles, t: &mut Term<'_>) -> ActionResult {
    let store = h.store()?;
    let bucket = t.prompt("Enter bucket name: ")?;
    let objects = store.list_objects(&bucket)?;
    writeln!(t, "Objects in bucket '{bucket}':")?;
    writeln!(t, "{}", "-".repeat(50))?;
    if objects.is_empty() {
        writeln!(t, "No objects found in bucket.")?;
    }
    for o in objects {
        writeln!(
            t,
            "• {} ({} bytes, Modified: {})",
            o.key,
            o.size,
            format_time(o.modified)
        )?;
    }
    Ok(Completion::Done)
}

fn download_file(h: &mut ServiceHandles, t: &mut Term<'_>) -> ActionResult {
    let store = h.store()?;
    let bucket = t.prompt("Enter bucket name: ")?;
    let object = t.prompt("Enter object name: ")?;
    let dest = t.prompt("Enter local file path: ")?;
    store.download_file(&bucket, &object, Path::new(&dest))?;
    writeln!(t, "File downloaded successfully to {dest}")?;
    Ok(Completion::Done)
}

/* ---- Cache ---- */

fn parse_number<T: std::str::FromStr>(raw: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("invalid number: '{raw}'"))
}

fn set_key_value(h: &mut ServiceHandles, t: &mut Term<'_>) -> ActionResult {
    let cache = h.cache()?;
    let key = t.prompt("Enter key: ")?;
    let value = t.prompt("Enter value: ")?;
    cache.set(&key, &value);
    writeln!(t, "Set {key} = {value}")?;
    Ok(Completion::Done)
}

fn get_key_value(h: &mut ServiceHandles, t: &mut Term<'_>) -> ActionResult {
    let cache = h.cache()?;
    let key = t.prompt("Enter key: ")?;
    match cache.get(&key) {
        Some(value) => writeln!(t, "{key} = {value}")?,
        None => writeln!(t, "Key '{key}' not found")?,
    }
    Ok(Completion::Done)
}

fn list_all_keys(h: &mut ServiceHandles, t: &mut Term<'_>) -> ActionResult {
    let cache = h.cache()?;
    let pattern = t.prompt_or("Enter pattern (or press Enter for all keys): ", "*")?;
    let keys = cache.keys(&pattern)?;
    writeln!(t, "Keys matching pattern '{pattern}':")?;
    writeln!(t, "{}", "-".repeat(40))?;
    if keys.is_empty() {
        writeln!(t, "No keys found.")?;
    }
    for key in keys {
        let value = cache.get(&key).unwrap_or_default();
        writeln!(t, "• {key} = {value}")?;
    }
    Ok(Completion::Done)
}

fn delete_key(h: &mut ServiceHandles, t: &mut Term<'_>) -> ActionResult {
    let cache = h.cache()?;
    let key = t.prompt("Enter key to delete: ")?;
    if cache.delete(&key) {
        writeln!(t, "Key '{key}' deleted successfully")?;
    } else {
        writeln!(t, "Key '{key}' not found")?;
    }
    Ok(Completion::Done)
}

fn set_with_expiry(h: &mut ServiceHandles, t: &mut Term<'_>) -> ActionResult {
    let cache = h.cache()?;
    let key = t.prompt("Enter key: ")?;
    let value = t.prompt("Enter value: ")?;
    let seconds: u64 = parse_number(&t.prompt("Enter expiration time in seconds: ")?)?;
    cache.set_with_expiry(&key, &value, Duration::from_secs(seconds))?;
    writeln!(t, "Set {key} = {value} (expires in {seconds} seconds)")?;
    Ok(Completion::Done)
}

fn increment_counter(h: &mut ServiceHandles, t: &mut Term<'_>) -> ActionResult {
    let cache = h.cache()?;
    let key = t.prompt("Enter counter key: ")?;
    let by: i64 = parse_number(&t.prompt_or("Enter increment value (default 1): ", "1")?)?;
    let now = cache.incr_by(&key, by)?;
    writeln!(t, "Counter '{key}' incremented to {now}")?;
    Ok(Completion::Done)
}

/* ---- Email ---- */

fn compose(t: &mut Term<'_>, body_label: &str, kind: BodyKind) -> Result<Message> {
    let from = t.prompt("Enter sender email: ")?;
    let to = t.prompt("Enter recipient email: ")?;
    let subject = t.prompt("Enter subject: ")?;
    let body = t.prompt(body_label)?;
    Ok(Message {
        from,
        to,
        subject,
        body,
        kind,
    })
}

fn send_simple_email(h: &mut ServiceHandles, t: &mut Term<'_>) -> ActionResult {
    let mailer = h.mail()?;
    let msg = compose(t, "Enter message: ", BodyKind::Plain)?;
    mailer.send(&msg)?;
    writeln!(t, "Email sent successfully to {}", msg.to)?;
    Ok(Completion::Done)
}

fn send_html_email(h: &mut ServiceHandles, t: &mut Term<'_>) -> ActionResult {
    let mailer = h.mail()?;
    let msg = compose(t, "Enter HTML content: ", BodyKind::Html)?;
    mailer.send(&msg)?;
    writeln!(t, "HTML email sent successfully to {}", msg.to)?;
    Ok(Completion::Done)
}

fn test_smtp_connection(h: &mut ServiceHandles, t: &mut Term<'_>) -> ActionResult {
    let mailer = h.mail()?;
    mailer.check()?;
    writeln!(t, "Mail relay connection successful")?;
    writeln!(t, "Spool: {}", mailer.spool().display())?;
    writeln!(t, "Messages in spool: {}", mailer.spooled()?.len())?;
    Ok(Completion::Done)
}

fn send_bulk_email(h: &mut ServiceHandles, t: &mut Term<'_>) -> ActionResult {
    let mailer = h.mail()?;
    let from = t.prompt("Enter sender email: ")?;
    let recipients: Vec<String> = t
        .prompt("Enter recipient emails (comma-separated): ")?
        .split(',')
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .collect();
    let subject = t.prompt("Enter subject: ")?;
    let body = t.prompt("Enter message: ")?;

    if recipients.is_empty() {
        writeln!(t, "No recipients given.")?;
        return Ok(Completion::NotCompleted);
    }

    for to in &recipients {
        mailer.send(&Message {
            from: from.clone(),
            to: to.clone(),
            subject: subject.clone(),
            body: body.clone(),
            kind: BodyKind::Plain,
        })?;
        writeln!(t, "Email sent to {to}")?;
    }
    writeln!(t, "Bulk email sent to {} recipients", recipients.len())?;
    Ok(Completion::Done)
}

pub fn catalog() -> Result<Catalog<ServiceHandles>> {
    Catalog::builder("Lab 8: Service Operations Browser")
        .category(
            Category::new("storage", "Object Storage Operations")
                .requires("Object storage", |h: &ServiceHandles| h.store.is_some())
                .operation("list_buckets", list_buckets)
                .operation("create_bucket", create_bucket)
                .operation("upload_file", upload_file)
                .operation("list_objects", list_objects)
                .operation("download_file", download_file),
        )
        .category(
            Category::new("cache", "Cache Operations")
                .requires("Cache", |h: &ServiceHandles| h.cache.is_some())
                .operation("set_key_value", set_key_value)
                .operation("get_key_value", get_key_value)
                .operation("list_all_keys", list_all_keys)
                .operation("delete_key", delete_key)
                .operation("set_with_expiry", set_with_expiry)
                .operation("increment_counter", increment_counter),
        )
        .category(
            Category::new("email", "Email Operations")
                .requires("Mail relay", |h: &ServiceHandles| h.mail.is_some())
                .operation("send_simple_email", send_simple_email)
                .operation("send_html_email", send_html_email)
                .operation("test_smtp_connection", test_smtp_connection)
                .operation("send_bulk_email", send_bulk_email),
        )
        .build()
}
