//! CLI error type with stable exit codes.
//!
//! - Exit code **2**: the snapshot could not be read or parsed, or stdout
//!   could not be written. Nothing was analyzed.
//! - Exit code **1**: the snapshot was fine but the run could not complete
//!   (unknown group, store failure, inconsistent league).
//!
//! Finding no circle is not an error.
use std::fmt;
use std::path::PathBuf;

use cos_core::{AnalysisError, SnapshotError, StoreError};

#[derive(Debug)]
pub enum CliError {
    // --- Exit code 2: input failures ---
    FileNotFound {
        path: PathBuf,
    },

    PermissionDenied {
        path: PathBuf,
    },

    /// The input exceeds `--max-file-size`.
    FileTooLarge {
        /// `"-"` for stdin, otherwise the path.
        source: String,
        limit: u64,
        /// Known for disk files only.
        actual: Option<u64>,
    },

    InvalidUtf8 {
        source: String,
        byte_offset: usize,
    },

    StdinReadError {
        detail: String,
    },

    IoError {
        source: String,
        detail: String,
    },

    /// The input is not a usable season snapshot.
    InvalidSnapshot {
        detail: String,
    },

    // --- Exit code 1: logical failures ---
    /// `--group` named no group in the league.
    GroupNotFound {
        name: String,
    },

    AnalysisFailed {
        detail: String,
    },

    StoreFailed {
        detail: String,
    },
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. }
            | Self::PermissionDenied { .. }
            | Self::FileTooLarge { .. }
            | Self::InvalidUtf8 { .. }
            | Self::StdinReadError { .. }
            | Self::IoError { .. }
            | Self::InvalidSnapshot { .. } => 2,

            Self::GroupNotFound { .. } | Self::AnalysisFailed { .. } | Self::StoreFailed { .. } => 1,
        }
    }

    /// Message printed to stderr before exiting.
    pub fn message(&self) -> String {
        match self {
            Self::FileNotFound { path } => {
                format!("error: file not found: {}", path.display())
            }
            Self::PermissionDenied { path } => {
                format!("error: permission denied: {}", path.display())
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: Some(actual),
            } => {
                format!("error: file too large: {source} is {actual} bytes, limit is {limit} bytes")
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: None,
            } => {
                format!("error: file too large: {source} exceeded limit of {limit} bytes")
            }
            Self::InvalidUtf8 {
                source,
                byte_offset,
            } => {
                format!("error: invalid UTF-8 in {source} at byte {byte_offset}")
            }
            Self::StdinReadError { detail } => {
                format!("error: failed to read stdin: {detail}")
            }
            Self::IoError { source, detail } => {
                format!("error: I/O error on {source}: {detail}")
            }
            Self::InvalidSnapshot { detail } => {
                format!("error: invalid season snapshot: {detail}")
            }
            Self::GroupNotFound { name } => {
                format!("error: no group named '{name}'")
            }
            Self::AnalysisFailed { detail } => {
                format!("error: analysis failed: {detail}")
            }
            Self::StoreFailed { detail } => {
                format!("error: result store: {detail}")
            }
        }
    }

    /// Wraps a failed write to stdout.
    pub fn stdout(e: &std::io::Error) -> Self {
        Self::IoError {
            source: "stdout".to_owned(),
            detail: e.to_string(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for CliError {}

impl From<SnapshotError> for CliError {
    fn from(e: SnapshotError) -> Self {
        let detail = match &e {
            SnapshotError::Json(json) => {
                format!("line {}, column {}: {json}", json.line(), json.column())
            }
            SnapshotError::UnknownParent { .. }
            | SnapshotError::UnknownGroup { .. }
            | SnapshotError::League(_) => e.to_string(),
        };
        Self::InvalidSnapshot { detail }
    }
}

impl From<AnalysisError> for CliError {
    fn from(e: AnalysisError) -> Self {
        match e {
            AnalysisError::Store(store) => store.into(),
            AnalysisError::NotAGroup(_)
            | AnalysisError::Graph(_)
            | AnalysisError::Assemble(_) => Self::AnalysisFailed {
                detail: e.to_string(),
            },
        }
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        Self::StoreFailed {
            detail: e.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
