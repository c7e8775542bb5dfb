use crate::{QuestionId, SectionId};

/// Error type for survey runs.
#[derive(Debug, thiserror::Error)]
pub enum SurveyError {
    /// Respondent cancelled the survey (Ctrl+C, closed window, etc.)
    #[error("Survey cancelled by respondent")]
    Cancelled,

    /// Respondent-specific failure (I/O, terminal error, scripted answer missing, etc.)
    #[error("Respondent error: {0}")]
    Respondent(#[from] anyhow::Error),
}

impl SurveyError {
    /// Create a respondent error from any error type.
    pub fn respondent(err: impl Into<anyhow::Error>) -> Self {
        Self::Respondent(err.into())
    }

    /// Check if this error represents cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// A survey definition that breaks an identifier invariant.
#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    #[error("Section has a blank id")]
    BlankSectionId,

    #[error("Question in section '{0}' has a blank id")]
    BlankQuestionId(SectionId),

    #[error("Duplicate section id: {0}")]
    DuplicateSectionId(SectionId),

    #[error("Duplicate question id: {0}")]
    DuplicateQuestionId(QuestionId),

    #[error("Malformed survey definition: {0}")]
    Json(#[from] serde_json::Error),
}
