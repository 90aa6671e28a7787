use serde::Deserialize;

use crate::dialect::{self, Dialect};
use crate::error::SplitError;

/// Mode holds all splitting configuration for sqlsplit.
#[derive(Debug, Clone, Deserialize)]
pub struct Mode {
    #[serde(default = "default_dialect")]
    pub dialect_name: String,

    /// Strip the trailing terminator character from each statement.
    #[serde(default)]
    pub strip_trailing_semicolon: bool,

    /// Print per-file statement counts instead of the statements.
    #[serde(default)]
    pub count: bool,

    /// Report split failures without printing statements.
    #[serde(default)]
    pub check: bool,

    /// Glob patterns to exclude.
    #[serde(default)]
    pub exclude: Vec<String>,

    #[serde(default)]
    pub verbose: bool,

    #[serde(default)]
    pub quiet: bool,

    #[serde(default)]
    pub no_color: bool,

    #[serde(default)]
    pub force_color: bool,
}

fn default_dialect() -> String {
    "postgres".to_string()
}

impl Mode {
    /// Create the dialect for the configured dialect_name.
    pub fn dialect(&self) -> Result<Box<dyn Dialect>, SplitError> {
        dialect::dialect_from_name(&self.dialect_name)
    }

    /// Whether color output is enabled.
    pub fn color(&self) -> bool {
        if self.force_color {
            return true;
        }
        if self.no_color {
            return false;
        }
        if std::env::var("NO_COLOR").is_ok() {
            return false;
        }
        true
    }

    /// SQL file extensions to process.
    pub fn sql_extensions(&self) -> &[&str] {
        &["sql", "ddl", "dml"]
    }
}

impl Default for Mode {
    fn default() -> Self {
        Self {
            dialect_name: "postgres".to_string(),
            strip_trailing_semicolon: false,
            count: false,
            check: false,
            exclude: Vec::new(),
            verbose: false,
            quiet: false,
            no_color: false,
            force_color: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mode() {
        let mode = Mode::default();
        assert_eq!(mode.dialect_name, "postgres");
        assert!(!mode.strip_trailing_semicolon);
        assert!(!mode.check);
        assert!(!mode.count);
    }

    #[test]
    fn test_dialect_creation() {
        let mode = Mode::default();
        assert!(mode.dialect().is_ok());

        let bad = Mode {
            dialect_name: "db2".to_string(),
            ..Mode::default()
        };
        assert!(bad.dialect().is_err());
    }

    #[test]
    fn test_color_logic() {
        let mut mode = Mode::default();
        mode.no_color = true;
        assert!(!mode.color());

        mode.force_color = true;
        assert!(mode.color()); // force_color overrides no_color
    }

    #[test]
    fn test_deserialize_defaults() {
        let mode: Mode = toml::from_str("dialect_name = \"oracle\"").unwrap();
        assert_eq!(mode.dialect_name, "oracle");
        assert!(!mode.strip_trailing_semicolon);
    }
}
