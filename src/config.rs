/*!
Optional configuration file (YAML or JSON, picked by extension).

Lookup order: `--config PATH`, then `LAB_CONSOLE_CONFIG`. Without either,
defaults apply. Command-line flags override whatever is loaded here.

```yaml
console:
  pause_after_operation: true
sql:
  database: ./shop.db
  seed_if_empty: true
services:
  store_root: ./lab-data/objects
  spool_dir: ./lab-data/mail
  cache: true
```
*/

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "LAB_CONSOLE_CONFIG";

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub console: ConsoleSection,
    pub sql: SqlSection,
    pub services: ServicesSection,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConsoleSection {
    pub pause_after_operation: bool,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SqlSection {
    /// SQLite file; in-memory sample database when absent.
    pub database: Option<PathBuf>,
    pub seed_if_empty: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ServicesSection {
    pub store_root: PathBuf,
    pub spool_dir: PathBuf,
    pub cache: bool,
}

impl Default for ServicesSection {
    fn default() -> Self {
        Self {
            store_root: PathBuf::from("lab-data/objects"),
            spool_dir: PathBuf::from("lab-data/mail"),
            cache: true,
        }
    }
}

impl Config {
    /// Load from `explicit`, else from `LAB_CONSOLE_CONFIG`, else defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let from_env = std::env::var_os(CONFIG_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        match explicit.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::parse(&raw, path)
    }

    fn parse(raw: &str, path: &Path) -> Result<Self> {
        let lower = path.to_string_lossy().to_ascii_lowercase();
        if lower.ends_with(".yaml") || lower.ends_with(".yml") {
            serde_yaml::from_str(raw).context("failed to parse YAML config")
        } else {
            serde_json::from_str(raw).context("failed to parse JSON config")
        }
    }
}
