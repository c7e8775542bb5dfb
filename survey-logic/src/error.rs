use std::path::PathBuf;

use survey_logic_types::{QuestionId, SectionId, SurveyError};

use crate::ValidationErrors;

/// Error type for preview sessions and session runs.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Unknown question: {0}")]
    UnknownQuestion(QuestionId),

    #[error("Survey did not complete within {0} steps")]
    StepLimit(usize),

    /// Every question blocking the section is hidden, so asking again cannot
    /// unblock it.
    #[error(
        "Section {section} cannot be completed: {} hidden question(s) fail validation",
        .errors.len()
    )]
    Unanswerable {
        section: usize,
        errors: ValidationErrors,
    },

    #[error("Failed to access session state at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed session state: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Survey(#[from] SurveyError),
}

impl SessionError {
    /// Check if this error represents cancellation by the respondent.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Survey(err) if err.is_cancelled())
    }
}

/// Error type for reorganizing a survey definition.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OrganizeError {
    #[error("Section position {index} is out of range (survey has {len} sections)")]
    SectionOutOfRange { index: usize, len: usize },

    #[error("Question position {index} is out of range (section '{section}' has {len} questions)")]
    QuestionOutOfRange {
        section: SectionId,
        index: usize,
        len: usize,
    },

    #[error("Unknown section: {0}")]
    UnknownSection(SectionId),

    #[error("Unknown question: {0}")]
    UnknownQuestion(QuestionId),
}
