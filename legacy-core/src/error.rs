//! Errors raised by the interview engine.

use thiserror::Error;

/// Errors from interview engine operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterviewError {
    #[error("Cannot generate story from incomplete interview ({answered} of {total} questions answered)")]
    IncompleteSession { answered: usize, total: usize },

    #[error("Interview is already complete: all {total} questions have been answered")]
    SessionComplete { total: usize },
}
