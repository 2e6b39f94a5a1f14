//! Error taxonomy for obstacle removal solving

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a map or solving a path.
#[derive(Debug, Error)]
pub enum RemovalError {
    /// Malformed or truncated CSV input.
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Input that parses but violates the data model.
    #[error("validation error: {0}")]
    Validation(String),

    /// The satisfiability oracle failed; enumeration for the path is aborted.
    #[error("oracle failure: {0}")]
    Oracle(#[from] OracleFailure),

    /// Internal defect, never caused by user input.
    #[error("internal invariant violated: {0}")]
    Invariant(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Ways a satisfiability backend can fail to answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleFailure {
    /// The backend was interrupted by its time limit.
    #[error("solver timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// The backend could not handle the formula.
    #[error("solver backend error: {0}")]
    Backend(String),
}

impl RemovalError {
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Attach `path` to an I/O error that was raised without one.
    pub fn at_path(self, path: impl Into<PathBuf>) -> Self {
        match self {
            Self::Io { source, .. } => Self::io(path, source),
            other => other,
        }
    }
}

impl From<csv::Error> for RemovalError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map_or(0, |pos| pos.line() as usize);
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(source) => Self::io(PathBuf::new(), source),
            _ => Self::Parse { line, message },
        }
    }
}

pub type Result<T> = std::result::Result<T, RemovalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = RemovalError::parse(3, "expected 5 fields, found 4");
        assert_eq!(err.to_string(), "parse error on line 3: expected 5 fields, found 4");

        let err: RemovalError = OracleFailure::Timeout { seconds: 10 }.into();
        assert!(err.to_string().contains("timed out after 10s"));
    }

    #[test]
    fn test_csv_errors_convert() {
        let io_error = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let err = RemovalError::from(csv::Error::from(io_error)).at_path("maps/a.csv");
        match err {
            RemovalError::Io { path, .. } => assert_eq!(path, PathBuf::from("maps/a.csv")),
            other => panic!("expected Io, got {:?}", other),
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(&b"1\n\xff\n"[..]);
        let err = reader
            .records()
            .find_map(|record| record.err())
            .map(RemovalError::from)
            .unwrap();
        assert!(matches!(err, RemovalError::Parse { .. }));
    }
}
