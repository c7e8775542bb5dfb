//! A respondent's pass through a survey.
//!
//! `PreviewSession` owns the answer map and the navigation position. The
//! visibility of every question is recomputed whenever an answer changes,
//! so readers always see the result for the current answers.

use std::fs;
use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use survey_logic_types::{AnswerValue, Answers, Question, QuestionId, Section, SurveyDefinition};

use crate::{Evaluator, EvaluatorOptions, Navigation, SessionError, ValidationErrors, Visibility};

/// Everything needed to resume a session: answers and position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionState {
    pub current_section: usize,
    pub answers: Answers,
    /// Sections visited before the current one, most recent last.
    pub history: Vec<usize>,
    pub completed: bool,
}

impl SessionState {
    /// Read a saved state from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SessionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Write the state to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| SessionError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// What happened when the respondent asked for the next section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Validation failed; the section did not change.
    Blocked(ValidationErrors),

    /// The session moved to another section.
    Moved {
        section_index: usize,
        /// Question to highlight, set by a skip rule.
        focus: Option<QuestionId>,
    },

    /// The last section was submitted.
    Completed,
}

/// A live session over one survey definition.
#[derive(Debug, Clone)]
pub struct PreviewSession<'a> {
    evaluator: Evaluator<'a>,
    state: SessionState,
    visibility: Visibility,
    errors: ValidationErrors,
    focus: Option<QuestionId>,
}

impl<'a> PreviewSession<'a> {
    /// Start a fresh session at the first section.
    pub fn new(definition: &'a SurveyDefinition, options: EvaluatorOptions) -> Self {
        Self::resume(definition, SessionState::default(), options)
    }

    /// Continue a session from saved state.
    ///
    /// Positions that no longer exist in the definition (the survey was
    /// edited since the state was saved) are clamped or dropped.
    pub fn resume(
        definition: &'a SurveyDefinition,
        mut state: SessionState,
        options: EvaluatorOptions,
    ) -> Self {
        let len = definition.len();
        if len > 0 && state.current_section >= len {
            warn!(
                "Saved section {} no longer exists; resuming at section {}",
                state.current_section,
                len - 1
            );
            state.current_section = len - 1;
        }
        state.history.retain(|&index| index < len);

        let evaluator = Evaluator::with_options(definition, options);
        let visibility = evaluator.visibility(&state.answers);
        Self {
            evaluator,
            state,
            visibility,
            errors: ValidationErrors::new(),
            focus: None,
        }
    }

    /// The definition this session runs over.
    pub fn definition(&self) -> &'a SurveyDefinition {
        self.evaluator.definition()
    }

    pub fn evaluator(&self) -> &Evaluator<'a> {
        &self.evaluator
    }

    /// Record, replace or clear (`None`) the answer to a question.
    ///
    /// Clears the question's pending validation message and recomputes
    /// visibility.
    pub fn handle_answer_change(
        &mut self,
        id: &QuestionId,
        value: Option<AnswerValue>,
    ) -> Result<(), SessionError> {
        if self.definition().question(id).is_none() {
            return Err(SessionError::UnknownQuestion(id.clone()));
        }
        match value {
            Some(value) => self.state.answers.set(id, value),
            None => {
                self.state.answers.remove(id);
            }
        }
        self.errors.remove(id);
        self.visibility = self.evaluator.visibility(&self.state.answers);
        Ok(())
    }

    /// Submit the current section.
    ///
    /// On success the previous position is pushed to the history so
    /// `handle_previous_section` can return to it.
    pub fn handle_next_section(&mut self) -> NavigationOutcome {
        if self.state.completed {
            return NavigationOutcome::Completed;
        }
        let current = self.state.current_section;
        match self.evaluator.next_section(current, &self.state.answers) {
            Err(errors) => {
                self.errors = errors.clone();
                NavigationOutcome::Blocked(errors)
            }
            Ok(Navigation::Complete) => {
                debug!("Survey completed after section {current}");
                self.errors.clear();
                self.focus = None;
                self.state.completed = true;
                NavigationOutcome::Completed
            }
            Ok(navigation) => {
                let section_index = navigation.next_section_index().unwrap_or(current);
                let focus = navigation.target_question_id().cloned();
                self.state.history.push(current);
                self.state.current_section = section_index;
                self.errors.clear();
                self.focus = focus.clone();
                NavigationOutcome::Moved {
                    section_index,
                    focus,
                }
            }
        }
    }

    /// Return to the previously shown section. Returns `false` at the start.
    pub fn handle_previous_section(&mut self) -> bool {
        match self.state.history.pop() {
            Some(previous) => {
                self.state.current_section = previous;
                self.state.completed = false;
                self.errors.clear();
                self.focus = None;
                true
            }
            None => false,
        }
    }

    /// Discard all answers and start over.
    pub fn reset(&mut self) {
        self.state = SessionState::default();
        self.errors.clear();
        self.focus = None;
        self.visibility = self.evaluator.visibility(&self.state.answers);
    }

    /// The section currently shown, if the survey has any.
    pub fn current_section(&self) -> Option<&'a Section> {
        self.definition().section(self.state.current_section)
    }

    pub fn current_section_index(&self) -> usize {
        self.state.current_section
    }

    /// The visible questions of the current section.
    pub fn visible_questions(&self) -> Vec<&'a Question> {
        match self.current_section() {
            Some(section) => section
                .questions
                .iter()
                .filter(|q| self.visibility.is_visible(&q.id))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn is_visible(&self, id: &QuestionId) -> bool {
        self.visibility.is_visible(id)
    }

    pub fn visibility(&self) -> &Visibility {
        &self.visibility
    }

    /// Validation messages from the last rejected submit.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// The question a skip rule asked to highlight, if any.
    pub fn focus(&self) -> Option<&QuestionId> {
        self.focus.as_ref()
    }

    pub fn answers(&self) -> &Answers {
        &self.state.answers
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn into_state(self) -> SessionState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state.completed
    }

    /// Fraction of sections passed, in `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        let len = self.definition().len();
        if self.state.completed || len == 0 {
            1.0
        } else {
            self.state.current_section as f64 / len as f64
        }
    }
}
