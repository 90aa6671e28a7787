use thiserror::Error;

/// User-facing errors. Both splitter errors are fatal and non-retryable:
/// they signal a configuration or programming mistake, not a transient
/// condition, and no partial statement list is returned alongside them.
#[derive(Error, Debug)]
pub enum SplitError {
    #[error("unsupported SQL dialect: {0}")]
    UnsupportedDialect(String),

    #[error("block nesting exceeds {max} open blocks at line {line}, column {column}")]
    NestingLimitExceeded {
        max: usize,
        line: usize,
        column: usize,
    },

    #[error("sqlsplit config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SplitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SplitError::UnsupportedDialect("sqlite".to_string());
        assert_eq!(err.to_string(), "unsupported SQL dialect: sqlite");

        let err = SplitError::NestingLimitExceeded {
            max: 256,
            line: 12,
            column: 3,
        };
        assert!(err.to_string().contains("256"));
        assert!(err.to_string().contains("line 12"));
    }
}
