//! A respondent that answers from a script, for tests and replays.
//!
//! ```rust,ignore
//! use survey_logic::{RunnerOptions, ScriptedRespondent, run_session};
//!
//! let mut respondent = ScriptedRespondent::new()
//!     .with_answer("age", 34)
//!     .with_answer("colors", vec!["Red", "Blue"]);
//! let state = run_session(&definition, &mut respondent, RunnerOptions::default())?;
//! assert!(state.completed);
//! ```

use std::collections::HashMap;

use survey_logic_types::{AnswerValue, Prompt, QuestionId, Respondent, SurveyError};

/// Answers questions from a map of pre-configured values.
///
/// Questions without a scripted answer are left unanswered. A script cannot
/// react to a validation message, so being asked again with one is an error;
/// this keeps runs over invalid scripts finite.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRespondent {
    answers: HashMap<QuestionId, AnswerValue>,
    cancel_at: Option<QuestionId>,
    asked: Vec<QuestionId>,
    sections: Vec<String>,
}

/// Why a script could not answer.
#[derive(Debug, thiserror::Error)]
pub enum ScriptedError {
    #[error("Scripted answer for '{id}' was rejected: {message}")]
    Rejected { id: QuestionId, message: String },
}

impl ScriptedRespondent {
    /// Create a respondent that answers nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the answer to a question.
    pub fn with_answer(mut self, id: impl Into<QuestionId>, value: impl Into<AnswerValue>) -> Self {
        self.answers.insert(id.into(), value.into());
        self
    }

    /// Cancel the run when this question is asked.
    pub fn cancel_at(mut self, id: impl Into<QuestionId>) -> Self {
        self.cancel_at = Some(id.into());
        self
    }

    /// Questions asked so far, in order. Re-asks appear again.
    pub fn asked(&self) -> &[QuestionId] {
        &self.asked
    }

    /// Titles of the sections entered so far, in order.
    pub fn sections(&self) -> &[String] {
        &self.sections
    }
}

impl Respondent for ScriptedRespondent {
    type Error = SurveyError;

    fn answer(&mut self, prompt: Prompt<'_>) -> Result<Option<AnswerValue>, Self::Error> {
        let id = &prompt.question.id;
        self.asked.push(id.clone());

        if self.cancel_at.as_ref() == Some(id) {
            return Err(SurveyError::Cancelled);
        }
        if let Some(message) = prompt.error {
            return Err(SurveyError::respondent(ScriptedError::Rejected {
                id: id.clone(),
                message: message.to_string(),
            }));
        }
        Ok(self.answers.get(id).cloned())
    }

    fn enter_section(&mut self, title: &str, _index: usize, _total: usize) {
        self.sections.push(title.to_string());
    }
}
