//! Error types for the dependency engine.
//!
//! Most "errors" here are rejected edits: they are returned as values and
//! surfaced as warnings, never propagated as fatal failures.

use thiserror::Error;

use crate::model::TaskId;

#[derive(Error, Debug)]
pub enum Error {
    // Rejected edits
    #[error("A task cannot depend on itself: {0}")]
    SelfLoop(TaskId),

    #[error("Dependency {from} -> {to} would create a cycle")]
    Cycle { from: TaskId, to: TaskId },

    // Loading
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True for errors caused by a proposed graph edit rather than I/O.
    pub fn is_rejected_edit(&self) -> bool {
        matches!(self, Error::SelfLoop(_) | Error::Cycle { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
