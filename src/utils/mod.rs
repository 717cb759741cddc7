//! Utilities: logging (dynamic level) and small path helpers.
//!
//! Key items:
//!   init_logging / derive_level
//!   log_error! / log_info! / log_debug! / log_trace!
//!
//! Log lines go to stderr. Stdout belongs to the console menus, so scripted
//! sessions can capture it without log noise.

/// Logging helpers.
pub mod logging {
    use chrono::Local;
    use std::io::Write;
    use std::sync::atomic::{AtomicU8, Ordering};

    #[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
    pub enum LogLevel {
        Error = 0,
        Info = 1,
        Debug = 2,
        Trace = 3,
    }

    impl LogLevel {
        fn tag(self) -> &'static str {
            match self {
                LogLevel::Error => "ERROR",
                LogLevel::Info => "INFO",
                LogLevel::Debug => "DEBUG",
                LogLevel::Trace => "TRACE",
            }
        }

        fn from_u8(raw: u8) -> Self {
            match raw {
                0 => LogLevel::Error,
                1 => LogLevel::Info,
                2 => LogLevel::Debug,
                _ => LogLevel::Trace,
            }
        }
    }

    static LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Info as u8);

    pub fn init_logging(level: LogLevel) {
        LEVEL.store(level as u8, Ordering::Relaxed);
    }

    pub fn enabled(level: LogLevel) -> bool {
        level <= LogLevel::from_u8(LEVEL.load(Ordering::Relaxed))
    }

    /// `-q` wins; each `-v` raises the level by one.
    pub fn derive_level(verbose: u8, quiet: bool) -> LogLevel {
        if quiet {
            LogLevel::Error
        } else {
            LogLevel::from_u8(verbose.saturating_add(1))
        }
    }

    pub fn log(level: LogLevel, msg: impl AsRef<str>) {
        if !enabled(level) {
            return;
        }
        let mut err = std::io::stderr().lock();
        let _ = writeln!(
            err,
            "{} {:<5} {}",
            Local::now().format("%H:%M:%S%.3f"),
            level.tag(),
            msg.as_ref()
        );
    }

    #[macro_export]
    macro_rules! log_error {
        ($($t:tt)*) => { $crate::utils::logging::log($crate::utils::logging::LogLevel::Error, format!($($t)*)) };
    }
    #[macro_export]
    macro_rules! log_info {
        ($($t:tt)*) => { $crate::utils::logging::log($crate::utils::logging::LogLevel::Info, format!($($t)*)) };
    }
    #[macro_export]
    macro_rules! log_debug {
        ($($t:tt)*) => { $crate::utils::logging::log($crate::utils::logging::LogLevel::Debug, format!($($t)*)) };
    }
    #[macro_export]
    macro_rules! log_trace {
        ($($t:tt)*) => { $crate::utils::logging::log($crate::utils::logging::LogLevel::Trace, format!($($t)*)) };
    }
}

pub use logging::{derive_level, init_logging};

/// Reject names that would escape their parent directory when joined onto it.
pub fn ensure_plain_name(kind: &str, name: &str) -> anyhow::Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        anyhow::bail!("{kind} name cannot be empty");
    }
    if trimmed == "." || trimmed == ".." || trimmed.contains(['/', '\\']) {
        anyhow::bail!("invalid {kind} name: '{name}'");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::logging::{LogLevel, derive_level};
    use super::ensure_plain_name;

    #[test]
    fn quiet_wins_over_verbose() {
        assert_eq!(derive_level(3, true), LogLevel::Error);
        assert_eq!(derive_level(0, false), LogLevel::Info);
        assert_eq!(derive_level(1, false), LogLevel::Debug);
        assert_eq!(derive_level(2, false), LogLevel::Trace);
    }

    #[test]
    fn plain_names() {
        assert!(ensure_plain_name("bucket", "photos").is_ok());
        assert!(ensure_plain_name("bucket", "").is_err());
        assert!(ensure_plain_name("bucket", "..").is_err());
        assert!(ensure_plain_name("object", "a/b").is_err());
    }
}
