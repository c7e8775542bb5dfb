//! Terminal respondent built on dialoguer.

use dialoguer::theme::{ColorfulTheme, SimpleTheme, Theme};
use dialoguer::{Confirm, Editor, FuzzySelect, Input, MultiSelect, Select, Sort};
use survey_logic::{
    AnswerShape, AnswerValue, Prompt, Question, QuestionType, Respondent, SurveyError,
};
use thiserror::Error;

/// Error type for the dialoguer respondent.
#[derive(Debug, Error)]
pub enum PromptError {
    /// User cancelled the survey (e.g., pressed Ctrl+C).
    #[error("Survey cancelled by user")]
    Cancelled,

    /// An I/O error occurred during prompting.
    #[error("Dialoguer error: {0}")]
    Dialoguer(#[from] dialoguer::Error),
}

impl From<PromptError> for SurveyError {
    fn from(err: PromptError) -> Self {
        match err {
            PromptError::Cancelled => SurveyError::Cancelled,
            other => SurveyError::respondent(other),
        }
    }
}

/// Helper to check if a dialoguer error is a cancellation (Ctrl+C)
fn is_cancelled(err: &dialoguer::Error) -> bool {
    matches!(err, dialoguer::Error::IO(io_err) if io_err.kind() == std::io::ErrorKind::Interrupted)
}

fn interact<T>(result: dialoguer::Result<T>) -> Result<T, PromptError> {
    result.map_err(|err| {
        if is_cancelled(&err) {
            PromptError::Cancelled
        } else {
            PromptError::Dialoguer(err)
        }
    })
}

/// Asks survey questions on the terminal.
///
/// The prompt used depends on the question type: free text and numbers use
/// `Input`, long text opens an editor, choices use `Select` (or
/// `FuzzySelect` for dropdowns), multi-valued questions use `MultiSelect`
/// and ranking uses `Sort`.
#[derive(Debug, Default, Clone)]
pub struct DialoguerRespondent {
    /// Use colorful theme for prompts.
    colorful: bool,
}

impl DialoguerRespondent {
    /// Create a respondent with the colorful theme.
    pub fn new() -> Self {
        Self { colorful: true }
    }

    /// Create a respondent with the plain (no color) theme.
    pub fn plain() -> Self {
        Self { colorful: false }
    }

    fn theme(&self) -> Box<dyn Theme> {
        if self.colorful {
            Box::new(ColorfulTheme::default())
        } else {
            Box::new(SimpleTheme)
        }
    }

    fn ask(&self, prompt: Prompt<'_>) -> Result<Option<AnswerValue>, PromptError> {
        let question = prompt.question;
        if let Some(message) = prompt.error {
            eprintln!("Error: {message}");
        }
        let label = if prompt.focused {
            format!("> {}", question.text)
        } else {
            question.text.clone()
        };

        match question.question_type.shape() {
            _ if question.question_type == QuestionType::YesNo => {
                self.ask_yes_no(&label, prompt.current)
            }
            AnswerShape::Scalar if question.question_type.is_choice() && !question.options.is_empty() => {
                self.ask_choice(&label, question, prompt.current)
            }
            AnswerShape::Multi if question.question_type == QuestionType::Ranking => {
                self.ask_ranking(&label, question)
            }
            AnswerShape::Multi => self.ask_many(&label, question, prompt.current),
            AnswerShape::Numeric => self.ask_number(&label, question, prompt.current),
            _ if question.question_type == QuestionType::Textarea => {
                self.ask_long_text(&label, prompt.current)
            }
            AnswerShape::Scalar | AnswerShape::Unknown => {
                self.ask_text(&label, question, prompt.current)
            }
        }
    }

    fn ask_text(
        &self,
        label: &str,
        question: &Question,
        current: Option<&AnswerValue>,
    ) -> Result<Option<AnswerValue>, PromptError> {
        let theme = self.theme();
        let mut builder = Input::<String>::with_theme(theme.as_ref())
            .with_prompt(label)
            .allow_empty(!question.required);
        if let Some(current) = current {
            builder = builder.with_initial_text(current.to_text());
        }
        let value = interact(builder.interact_text())?;
        Ok(non_empty(value))
    }

    fn ask_long_text(
        &self,
        label: &str,
        current: Option<&AnswerValue>,
    ) -> Result<Option<AnswerValue>, PromptError> {
        eprintln!("{label}");
        let initial = current.map(AnswerValue::to_text).unwrap_or_default();
        let value = interact(Editor::new().edit(&initial))?;
        Ok(value.and_then(non_empty))
    }

    fn ask_number(
        &self,
        label: &str,
        question: &Question,
        current: Option<&AnswerValue>,
    ) -> Result<Option<AnswerValue>, PromptError> {
        let theme = self.theme();
        let mut builder = Input::<String>::with_theme(theme.as_ref())
            .with_prompt(label)
            .allow_empty(!question.required)
            .validate_with(|input: &String| -> Result<(), &'static str> {
                if input.trim().is_empty() || input.trim().parse::<f64>().is_ok() {
                    Ok(())
                } else {
                    Err("Enter a number")
                }
            });
        if let Some(current) = current {
            builder = builder.with_initial_text(current.to_text());
        }
        let value = interact(builder.interact_text())?;
        Ok(value
            .trim()
            .parse::<f64>()
            .ok()
            .map(AnswerValue::Number))
    }

    fn ask_yes_no(
        &self,
        label: &str,
        current: Option<&AnswerValue>,
    ) -> Result<Option<AnswerValue>, PromptError> {
        let theme = self.theme();
        let default = current.is_some_and(|value| value.to_text() == "Yes");
        let value = interact(
            Confirm::with_theme(theme.as_ref())
                .with_prompt(label)
                .default(default)
                .interact(),
        )?;
        Ok(Some(AnswerValue::from(if value { "Yes" } else { "No" })))
    }

    fn ask_choice(
        &self,
        label: &str,
        question: &Question,
        current: Option<&AnswerValue>,
    ) -> Result<Option<AnswerValue>, PromptError> {
        let theme = self.theme();
        let default = current
            .and_then(|value| question.options.iter().position(|o| *o == value.to_text()))
            .unwrap_or(0);

        let selection = if question.question_type == QuestionType::Dropdown {
            let builder = FuzzySelect::with_theme(theme.as_ref())
                .with_prompt(label)
                .items(&question.options)
                .default(default);
            if question.required {
                interact(builder.interact()).map(Some)?
            } else {
                interact(builder.interact_opt())?
            }
        } else {
            let builder = Select::with_theme(theme.as_ref())
                .with_prompt(label)
                .items(&question.options)
                .default(default);
            if question.required {
                interact(builder.interact()).map(Some)?
            } else {
                interact(builder.interact_opt())?
            }
        };

        Ok(selection
            .and_then(|index| question.options.get(index))
            .map(|option| AnswerValue::from(option.as_str())))
    }

    fn ask_many(
        &self,
        label: &str,
        question: &Question,
        current: Option<&AnswerValue>,
    ) -> Result<Option<AnswerValue>, PromptError> {
        let theme = self.theme();
        let defaults: Vec<bool> = question
            .options
            .iter()
            .map(|option| current.is_some_and(|value| value.includes(option)))
            .collect();
        let indices = interact(
            MultiSelect::with_theme(theme.as_ref())
                .with_prompt(label)
                .items(&question.options)
                .defaults(&defaults)
                .interact(),
        )?;
        let chosen: Vec<String> = indices
            .into_iter()
            .filter_map(|i| question.options.get(i).cloned())
            .collect();
        Ok(Some(AnswerValue::from(chosen)))
    }

    fn ask_ranking(
        &self,
        label: &str,
        question: &Question,
    ) -> Result<Option<AnswerValue>, PromptError> {
        let theme = self.theme();
        let order = interact(
            Sort::with_theme(theme.as_ref())
                .with_prompt(label)
                .items(&question.options)
                .interact(),
        )?;
        let ranked: Vec<String> = order
            .into_iter()
            .filter_map(|i| question.options.get(i).cloned())
            .collect();
        Ok(Some(AnswerValue::from(ranked)))
    }
}

fn non_empty(value: String) -> Option<AnswerValue> {
    if value.trim().is_empty() {
        None
    } else {
        Some(AnswerValue::Text(value))
    }
}

/// Section header shown on stderr; stdout stays free for the answers JSON.
fn section_banner(title: &str, index: usize, total: usize) -> String {
    format!("== {title} ({}/{total}) ==", index + 1)
}

impl Respondent for DialoguerRespondent {
    type Error = SurveyError;

    fn answer(&mut self, prompt: Prompt<'_>) -> Result<Option<AnswerValue>, Self::Error> {
        Ok(self.ask(prompt)?)
    }

    fn enter_section(&mut self, title: &str, index: usize, total: usize) {
        eprintln!();
        eprintln!("{}", section_banner(title, index, total));
    }
}
