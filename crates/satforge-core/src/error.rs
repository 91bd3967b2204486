//! Assembly error types.
//!
//! Every failure in the selection/assembly/rendering pipeline is a
//! deterministic function of (corpus contents, exam plan), so none of these
//! are retryable. They propagate unchanged to the caller; no component
//! substitutes a partial result.

use thiserror::Error;

use crate::model::{ModuleId, Section};

/// Errors raised while selecting, assembling, or rendering an exam.
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// The corpus holds fewer eligible questions for a slot than requested.
    #[error(
        "insufficient questions for {section} {module}: requested {requested}, {available} eligible"
    )]
    InsufficientQuestions {
        section: Section,
        module: ModuleId,
        requested: usize,
        available: usize,
    },

    /// The plan names a (section, module) slot the corpus has no questions for.
    #[error("no questions in the corpus for {section} {module}")]
    UnknownSectionOrModule { section: Section, module: ModuleId },

    /// The plan requests zero questions in total.
    #[error("exam plan requests no questions")]
    EmptySpec,

    /// An unrecognized visibility mode token.
    #[error("invalid visibility mode: '{0}' (expected full, answers-only, or no-answers)")]
    InvalidMode(String),

    /// A question violates the option-letter invariant.
    #[error("malformed question '{id}': {detail}")]
    MalformedQuestion { id: String, detail: String },
}

impl AssemblyError {
    pub fn malformed(id: impl Into<String>, detail: impl Into<String>) -> Self {
        AssemblyError::MalformedQuestion {
            id: id.into(),
            detail: detail.into(),
        }
    }
}

/// Result alias for the assembly pipeline.
pub type Result<T> = std::result::Result<T, AssemblyError>;
