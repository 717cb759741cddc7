//! Mail relay that drops each message into a spool directory as an `.eml`
//! file, one file per recipient.

use anyhow::{Context, Result, bail};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Plain,
    Html,
}

impl BodyKind {
    fn content_type(self) -> &'static str {
        match self {
            BodyKind::Plain => "text/plain; charset=utf-8",
            BodyKind::Html => "text/html; charset=utf-8",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Message {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub kind: BodyKind,
}

impl Message {
    pub fn render(&self) -> String {
        format!(
            "From: {}\r\nTo: {}\r\nSubject: {}\r\nDate: {}\r\nMIME-Version: 1.0\r\nContent-Type: {}\r\n\r\n{}\r\n",
            self.from,
            self.to,
            self.subject,
            Utc::now().to_rfc2822(),
            self.kind.content_type(),
            self.body
        )
    }
}

#[derive(Debug)]
pub struct SpoolMailer {
    spool: PathBuf,
    seq: AtomicU64,
}

fn check_address(role: &str, addr: &str) -> Result<()> {
    let addr = addr.trim();
    match addr.split_once('@') {
        Some((local, domain))
            if !local.is_empty()
                && !domain.is_empty()
                && !addr.contains(char::is_whitespace) =>
        {
            Ok(())
        }
        _ => bail!("invalid {role} address: '{addr}'"),
    }
}

impl SpoolMailer {
    pub fn connect(spool: &Path) -> Result<Self> {
        fs::create_dir_all(spool)
            .with_context(|| format!("Failed to create mail spool: {}", spool.display()))?;
        Ok(Self {
            spool: spool.to_path_buf(),
            seq: AtomicU64::new(0),
        })
    }

    pub fn spool(&self) -> &Path {
        &self.spool
    }

    /// Verify the spool is still writable.
    pub fn check(&self) -> Result<()> {
        let marker = self.spool.join(".writable");
        fs::write(&marker, b"").with_context(|| format!("Spool not writable: {}", self.spool.display()))?;
        let _ = fs::remove_file(marker);
        Ok(())
    }

    /// Spool one message; returns the file it was written to.
    pub fn send(&self, msg: &Message) -> Result<PathBuf> {
        check_address("sender", &msg.from)?;
        check_address("recipient", &msg.to)?;
        let n = self.seq.fetch_add(1, Ordering::Relaxed);
        let name = format!("{}-{n:04}.eml", Utc::now().format("%Y%m%dT%H%M%S%.3f"));
        let path = self.spool.join(name);
        fs::write(&path, msg.render())
            .with_context(|| format!("Failed to spool message to {}", path.display()))?;
        Ok(path)
    }

    pub fn spooled(&self) -> Result<Vec<PathBuf>> {
        let mut out: Vec<PathBuf> = fs::read_dir(&self.spool)?
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|x| x == "eml"))
            .collect();
        out.sort();
        Ok(out)
    }
}
