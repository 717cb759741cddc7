//! In-process key-value cache with per-key expiry.
//!
//! Expired entries are dropped lazily on access. `keys` takes a glob pattern
//! (`*`, `?`, `[...]`) the way the cache server's KEYS command does.

use anyhow::{Context, Result, anyhow, bail};
use glob::Pattern;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|t| t > now)
    }
}

#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: BTreeMap<String, Entry>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn purge(&mut self) {
        let now = Instant::now();
        self.entries.retain(|_, e| e.live(now));
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: None,
            },
        );
    }

    pub fn set_with_expiry(&mut self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        if ttl.is_zero() {
            bail!("invalid expire time: must be positive");
        }
        let expires_at = Instant::now()
            .checked_add(ttl)
            .ok_or_else(|| {
                anyhow!("invalid expire time: {} seconds is out of range", ttl.as_secs())
            })?;
        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Some(expires_at),
            },
        );
        Ok(())
    }

    pub fn get(&mut self, key: &str) -> Option<String> {
        self.purge();
        self.entries.get(key).map(|e| e.value.clone())
    }

    /// Keys matching `pattern`, in sorted order.
    pub fn keys(&mut self, pattern: &str) -> Result<Vec<String>> {
        let pat = Pattern::new(pattern).with_context(|| format!("invalid pattern '{pattern}'"))?;
        self.purge();
        Ok(self
            .entries
            .keys()
            .filter(|k| pat.matches(k))
            .cloned()
            .collect())
    }

    /// True when the key existed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.purge();
        self.entries.remove(key).is_some()
    }

    /// Add `by` to an integer value (missing keys start at 0). Keeps any expiry.
    pub fn incr_by(&mut self, key: &str, by: i64) -> Result<i64> {
        self.purge();
        let entry = self.entries.entry(key.to_string()).or_insert_with(|| Entry {
            value: "0".to_string(),
            expires_at: None,
        });
        let current: i64 = entry
            .value
            .parse()
            .map_err(|_| anyhow!("value is not an integer or out of range"))?;
        let next = current
            .checked_add(by)
            .ok_or_else(|| anyhow!("increment or decrement would overflow"))?;
        entry.value = next.to_string();
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_delete() {
        let mut c = MemoryCache::new();
        c.set("a", "1");
        assert_eq!(c.get("a").as_deref(), Some("1"));
        assert!(c.delete("a"));
        assert!(!c.delete("a"));
        assert_eq!(c.get("a"), None);
    }

    #[test]
    fn expiry_drops_keys() {
        let mut c = MemoryCache::new();
        c.set_with_expiry("t", "v", Duration::from_millis(20)).unwrap();
        assert_eq!(c.get("t").as_deref(), Some("v"));
        std::thread::sleep(Duration::from_millis(40));
        assert_eq!(c.get("t"), None);
        assert!(c.keys("*").unwrap().is_empty());
        assert!(c.set_with_expiry("t", "v", Duration::ZERO).is_err());
    }

    #[test]
    fn huge_expiry_is_an_error() {
        let mut c = MemoryCache::new();
        let err = c
            .set_with_expiry("k", "v", Duration::from_secs(u64::MAX))
            .unwrap_err();
        assert!(err.to_string().starts_with("invalid expire time"));
        assert_eq!(c.get("k"), None);
    }

    #[test]
    fn keys_by_glob() {
        let mut c = MemoryCache::new();
        c.set("user:1", "a");
        c.set("user:2", "b");
        c.set("session", "c");
        assert_eq!(c.keys("user:*").unwrap(), ["user:1", "user:2"]);
        assert_eq!(c.keys("*").unwrap().len(), 3);
        assert_eq!(c.keys("user:?").unwrap().len(), 2);
        assert!(c.keys("[").is_err());
    }

    #[test]
    fn incr_by_counts_and_rejects_text() {
        let mut c = MemoryCache::new();
        assert_eq!(c.incr_by("n", 1).unwrap(), 1);
        assert_eq!(c.incr_by("n", 5).unwrap(), 6);
        assert_eq!(c.incr_by("n", -10).unwrap(), -4);
        c.set("s", "abc");
        assert!(c.incr_by("s", 1).is_err());
        c.set("big", &i64::MAX.to_string());
        assert!(c.incr_by("big", 1).is_err());
    }
}
