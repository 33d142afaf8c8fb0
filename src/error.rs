use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors raised while loading data, profiles or configuration
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed table {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Table {} is missing required column '{column}'", .path.display())]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("Invalid profile table: {0}")]
    Profiles(String),

    #[error("Unknown personality type '{0}'")]
    UnknownProfile(String),

    #[error("Invalid range '{0}': expected MIN-MAX with 0 <= MIN <= MAX <= 100")]
    InvalidRange(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Which side of a recommendation produced no candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Songs,
    Wines,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Songs => write!(f, "songs"),
            Self::Wines => write!(f, "wines"),
        }
    }
}

/// Non-fatal matcher outcome, rendered as a warning rather than aborting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("no {0} matched the request")]
    NoMatch(RecordKind),
}
