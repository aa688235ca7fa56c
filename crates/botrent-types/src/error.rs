use thiserror::Error;

/// Errors surfaced to callers of the hosting application (CLI, REST API).
///
/// The tracker itself never fails; these describe bad input or an absent
/// record when the caller asked for one explicitly.
#[derive(Debug, Error)]
pub enum TrialError {
    #[error("no trial for bot {0}")]
    NotFound(i64),

    #[error("invalid bot id: '{0}'")]
    InvalidBotId(String),
}

/// Errors from persistence operations (returned by `TrialStore` implementations).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(String),

    /// Another process holds the data directory lock.
    #[error("{0} is locked by another botrent process (is `botrent serve` running?)")]
    Locked(String),
}

impl From<std::io::Error> for RepositoryError {
    fn from(e: std::io::Error) -> Self {
        RepositoryError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(e: serde_json::Error) -> Self {
        RepositoryError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trial_error_display() {
        assert_eq!(TrialError::NotFound(42).to_string(), "no trial for bot 42");
        assert_eq!(
            TrialError::InvalidBotId("abc".to_string()).to_string(),
            "invalid bot id: 'abc'"
        );
    }

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");

        let err = RepositoryError::Locked("/data/botrent.lock".to_string());
        assert!(err.to_string().starts_with("/data/botrent.lock is locked"));
    }

    #[test]
    fn test_repository_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: RepositoryError = io.into();
        assert!(matches!(err, RepositoryError::Io(ref msg) if msg.contains("read-only")));
    }
}
