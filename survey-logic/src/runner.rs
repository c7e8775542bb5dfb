//! Driving a whole session with a `Respondent`.

use log::{debug, info};
use survey_logic_types::{Prompt, Respondent, SurveyDefinition, SurveyError};

use crate::{NavigationOutcome, PreviewSession, RunnerOptions, SessionError, SessionState};

/// Runs a session to completion, asking a respondent one visible question
/// at a time.
#[derive(Debug, Clone)]
pub struct Runner<'a> {
    session: PreviewSession<'a>,
    max_steps: usize,
}

impl<'a> Runner<'a> {
    /// Start a run at the first section.
    pub fn new(definition: &'a SurveyDefinition, options: RunnerOptions) -> Self {
        Self::resume(definition, SessionState::default(), options)
    }

    /// Continue a run from saved state.
    pub fn resume(
        definition: &'a SurveyDefinition,
        state: SessionState,
        options: RunnerOptions,
    ) -> Self {
        Self {
            session: PreviewSession::resume(definition, state, options.evaluator),
            max_steps: options.max_steps,
        }
    }

    pub fn session(&self) -> &PreviewSession<'a> {
        &self.session
    }

    /// Run until the survey completes.
    ///
    /// Visibility is re-evaluated after every answer, so a question revealed
    /// by an earlier answer in the same section is asked too. When a submit
    /// is rejected only the failing questions are asked again; when none of
    /// them is visible the run stops with `SessionError::Unanswerable`. `checkpoint`
    /// is called with the state after every section change.
    pub fn run<R, F>(
        mut self,
        respondent: &mut R,
        mut checkpoint: F,
    ) -> Result<SessionState, SessionError>
    where
        R: Respondent,
        F: FnMut(&SessionState) -> Result<(), SessionError>,
    {
        let total = self.session.definition().len();
        let mut steps = 0;
        let mut entered = None;
        let mut retry = false;

        while !self.session.is_completed() {
            let index = self.session.current_section_index();
            if let Some(section) = self.session.current_section() {
                if entered != Some(index) {
                    debug!("Entering section '{}' ({}/{total})", section.id, index + 1);
                    respondent.enter_section(&section.title, index, total);
                    entered = Some(index);
                }

                for question in &section.questions {
                    if !self.session.is_visible(&question.id) {
                        continue;
                    }
                    let error = self.session.errors().get(&question.id);
                    if retry && error.is_none() {
                        continue;
                    }
                    let prompt = Prompt {
                        question,
                        current: self.session.answers().get(&question.id),
                        error,
                        focused: self.session.focus() == Some(&question.id),
                    };
                    let value = respondent.answer(prompt).map_err(respondent_error)?;
                    self.session.handle_answer_change(&question.id, value)?;
                }
            }

            if steps == self.max_steps {
                return Err(SessionError::StepLimit(self.max_steps));
            }
            steps += 1;

            match self.session.handle_next_section() {
                NavigationOutcome::Blocked(errors) => {
                    debug!("Section {index} blocked by {} error(s)", errors.len());
                    if !errors.iter().any(|(id, _)| self.session.is_visible(id)) {
                        return Err(SessionError::Unanswerable {
                            section: index,
                            errors,
                        });
                    }
                    retry = true;
                }
                NavigationOutcome::Moved { .. } | NavigationOutcome::Completed => {
                    retry = false;
                    checkpoint(self.session.state())?;
                }
            }
        }

        info!("Survey completed in {steps} step(s)");
        Ok(self.session.into_state())
    }
}

/// Run a session from the first section to completion.
pub fn run_session<R: Respondent>(
    definition: &SurveyDefinition,
    respondent: &mut R,
    options: RunnerOptions,
) -> Result<SessionState, SessionError> {
    Runner::new(definition, options).run(respondent, |_| Ok(()))
}

fn respondent_error(err: impl Into<anyhow::Error>) -> SessionError {
    let err: anyhow::Error = err.into();
    match err.downcast::<SurveyError>() {
        Ok(survey) => SessionError::Survey(survey),
        Err(other) => SessionError::Survey(SurveyError::Respondent(other)),
    }
}
