/*!
Which console a command targets.

Variants:
  sql       (query browser over the guitar-shop database)
  services  (object storage / cache / mail operations)
*/

use std::fmt;

#[derive(clap::ValueEnum, Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ConsoleKind {
    /// Canned SQL queries
    Sql,
    /// Object storage, cache and mail operations
    Services,
}

impl ConsoleKind {
    /// All consoles, in help/listing order.
    pub const fn variants() -> &'static [ConsoleKind] {
        &[ConsoleKind::Sql, ConsoleKind::Services]
    }
}

impl fmt::Display for ConsoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConsoleKind::Sql => "sql",
            ConsoleKind::Services => "services",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::ConsoleKind;
    use clap::ValueEnum;

    #[test]
    fn display_matches_clap_names() {
        for k in ConsoleKind::variants() {
            let parsed = ConsoleKind::from_str(&k.to_string(), true).unwrap();
            assert_eq!(parsed, *k);
        }
        assert!(ConsoleKind::from_str("tools", true).is_err());
    }
}
