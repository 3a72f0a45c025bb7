//! Centralized error types for ngarchive.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort (or may abort) an ingestion run.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// I/O error with the associated file path.
    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The specified archive file does not exist.
    #[error("Archive file not found: {0}")]
    FileNotFound(PathBuf),

    /// A second real post claimed an identity that is already archived.
    #[error("Duplicate message id {identity:?} at line {line}")]
    DuplicateIdentity { identity: String, line: usize },

    /// Ingestion finished but a clean archive was required.
    #[error("Archive is not clean: {failures} failed message(s), {duplicates} duplicate id(s)")]
    Unclean { failures: usize, duplicates: usize },

    /// The configuration could not be used.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience alias for `Result<T, ArchiveError>`.
pub type Result<T> = std::result::Result<T, ArchiveError>;

impl ArchiveError {
    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// A recoverable failure while turning one chunk into a post.
///
/// Every variant carries the raw value that could not be understood so the
/// diagnostic summary can show it verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PostError {
    /// A header line without a `:` separator.
    #[error("invalid header line {0:?}")]
    InvalidHeaderLine(String),

    /// None of the known date layouts matched.
    #[error("unknown date layout {0:?}")]
    UnknownDateLayout(String),

    /// The chunk carried no `Date:` header at all.
    #[error("missing date header")]
    MissingDate,

    /// `Message-ID` was not wrapped in angle brackets.
    #[error("invalid message-id {0:?}")]
    InvalidMessageId(String),

    /// `Lines:` was not a number.
    #[error("invalid line count {value:?}: {reason}")]
    InvalidLineCount { value: String, reason: String },
}

/// A per-message failure recorded during ingestion.
#[derive(Debug, Clone)]
pub struct IngestFailure {
    /// 1-based archive line of the chunk's `From ` delimiter.
    pub line: usize,
    /// The raw delimiter line.
    pub from: String,
    pub error: PostError,
}

impl std::fmt::Display for IngestFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {} ({}): {}", self.line, self.from, self.error)
    }
}

impl PostError {
    /// Short stable name of the failure class, for grouping in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidHeaderLine(_) => "invalid header line",
            Self::UnknownDateLayout(_) => "unknown date layout",
            Self::MissingDate => "missing date",
            Self::InvalidMessageId(_) => "invalid message-id",
            Self::InvalidLineCount { .. } => "invalid line count",
        }
    }
}
