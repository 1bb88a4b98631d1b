//! Error taxonomy for the check-and-report pipeline.
//!
//! - `LintError::Open` / `LintError::Read` are recoverable per-file problems.
//!   They are pushed into [`Diagnostics`](crate::diagnostics::Diagnostics)
//!   and never stop the batch.
//! - `LintError::Violation` is a rule finding. Under the default policy it
//!   ends the batch and is returned to the caller.
//! - `ReportError` covers report construction and sink failures, which the
//!   CLI treats as fatal.
//!
//! Inputs that cannot be stat'ed and hash/language failures never produce
//! an error value at all.

use std::io;

use thiserror::Error;

use crate::rules::catalog::RuleId;

#[derive(Debug, Error)]
pub enum LintError {
    #[error("could not open `{path}`: {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("[{rule}] could not read the first {len} bytes of `{path}`: {source}")]
    Read {
        rule: RuleId,
        path: String,
        len: usize,
        #[source]
        source: io::Error,
    },

    #[error("[{rule}] {message}")]
    Violation {
        rule: RuleId,
        path: String,
        message: String,
    },
}

impl LintError {
    /// The input path this error is about.
    pub fn path(&self) -> &str {
        match self {
            LintError::Open { path, .. }
            | LintError::Read { path, .. }
            | LintError::Violation { path, .. } => path,
        }
    }

    pub fn is_violation(&self) -> bool {
        matches!(self, LintError::Violation { .. })
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("unsupported SARIF version `{0}`")]
    UnsupportedVersion(String),

    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write report: {0}")]
    Io(#[from] io::Error),
}
