//! Error types for the boardid core library.

use thiserror::Error;

/// Errors that abort a whole resolution run.
///
/// Per-strategy failures never surface here; they are logged and converted
/// into "try the next strategy" by the [`Resolver`](crate::Resolver).
#[derive(Debug, Error)]
pub enum BoardIdError {
    /// A strategy is missing a parameter its kind requires, or carries an
    /// out-of-range value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// More strategies were configured than a single run may try.
    #[error("Too many strategies: {count} configured, at most {max} allowed")]
    TooManyStrategies { count: usize, max: usize },

    /// Every configured strategy was tried and none produced an identifier.
    #[error("No strategy succeeded (tried: {})", tried.join(", "))]
    NoStrategySucceeded { tried: Vec<String> },

    /// An I/O operation outside of a strategy probe failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias that pins the error type to [`BoardIdError`].
pub type Result<T> = std::result::Result<T, BoardIdError>;

impl BoardIdError {
    /// Returns a short, human-readable message suitable for the command line.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidConfig(msg) => msg.clone(),
            Self::TooManyStrategies { max, .. } => {
                format!("Too many strategies specified (the maximum is {max})")
            }
            Self::NoStrategySucceeded { .. } => "Unable to determine a board ID".to_string(),
            Self::Io(e) => format!("File error: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_strategy_succeeded_lists_attempts() {
        let e = BoardIdError::NoStrategySucceeded {
            tried: vec!["cpuinfo".to_string(), "macaddr".to_string()],
        };
        assert_eq!(e.to_string(), "No strategy succeeded (tried: cpuinfo, macaddr)");
        assert_eq!(e.user_message(), "Unable to determine a board ID");
    }

    #[test]
    fn test_too_many_strategies_message() {
        let e = BoardIdError::TooManyStrategies { count: 9, max: 8 };
        assert!(e.to_string().contains("9 configured"));
        assert!(e.user_message().contains("maximum is 8"));
    }
}
