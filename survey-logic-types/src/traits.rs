use crate::{AnswerValue, Question};

/// A prompt for a single question, as handed to a `Respondent`.
#[derive(Debug, Clone, Copy)]
pub struct Prompt<'a> {
    /// The question being asked.
    pub question: &'a Question,

    /// The answer currently on record, if any.
    pub current: Option<&'a AnswerValue>,

    /// Validation message from the last submit, if the answer was rejected.
    pub error: Option<&'a str>,

    /// Set when a skip-logic jump asked for this question to be highlighted.
    pub focused: bool,
}

/// Something that answers survey questions: a terminal prompt, a scripted
/// test double, a replay of stored answers.
///
/// The runner decides which questions are visible and where to navigate;
/// a respondent only ever sees one visible question at a time.
pub trait Respondent {
    /// The error type for this respondent.
    type Error: Into<anyhow::Error>;

    /// Answer one question.
    ///
    /// # Returns
    /// * `Ok(Some(value))` to record an answer
    /// * `Ok(None)` to leave the question unanswered (or clear it)
    /// * `Err` on cancellation or respondent failure
    fn answer(&mut self, prompt: Prompt<'_>) -> Result<Option<AnswerValue>, Self::Error>;

    /// Called when the runner enters a section. The default does nothing.
    fn enter_section(&mut self, _title: &str, _index: usize, _total: usize) {}
}
