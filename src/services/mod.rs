//! Capabilities for the multi-service browser.
//!
//! Each service is connected once at startup. A service that fails to
//! connect stays `None` and its category is refused at the menu.

pub mod cache;
pub mod mail;
pub mod operations;
pub mod store;

use std::path::Path;

use crate::{log_error, log_info};
use cache::MemoryCache;
use mail::SpoolMailer;
use store::DirStore;

#[derive(Debug, Default)]
pub struct ServiceHandles {
    pub store: Option<DirStore>,
    pub cache: Option<MemoryCache>,
    pub mail: Option<SpoolMailer>,
}

/// Where each service lives; `None` leaves that service disconnected.
#[derive(Debug, Clone, Default)]
pub struct ServiceTargets<'a> {
    pub store_root: Option<&'a Path>,
    pub cache: bool,
    pub spool: Option<&'a Path>,
}

impl ServiceHandles {
    pub fn connect(targets: &ServiceTargets<'_>) -> Self {
        let store = targets.store_root.and_then(|root| match DirStore::connect(root) {
            Ok(s) => {
                log_info!("Connected to object storage at {}", s.root().display());
                Some(s)
            }
            Err(e) => {
                log_error!("Error connecting to object storage: {e:#}");
                None
            }
        });

        let cache = targets.cache.then(|| {
            log_info!("Connected to cache");
            MemoryCache::new()
        });

        let mail = targets.spool.and_then(|spool| match SpoolMailer::connect(spool) {
            Ok(m) => {
                log_info!("Connected to mail spool at {}", spool.display());
                Some(m)
            }
            Err(e) => {
                log_error!("Mail spool connection issue: {e:#}");
                None
            }
        });

        Self { store, cache, mail }
    }

    pub fn any_available(&self) -> bool {
        self.store.is_some() || self.cache.is_some() || self.mail.is_some()
    }

    pub fn store(&mut self) -> anyhow::Result<&mut DirStore> {
        self.store
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("object storage is not connected"))
    }

    pub fn cache(&mut self) -> anyhow::Result<&mut MemoryCache> {
        self.cache
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("cache is not connected"))
    }

    pub fn mail(&mut self) -> anyhow::Result<&mut SpoolMailer> {
        self.mail
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("mail relay is not connected"))
    }
}
