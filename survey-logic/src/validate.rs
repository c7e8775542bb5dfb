//! Answer checks run when a section is submitted.

use log::warn;
use regex::Regex;
use serde::{Serialize, Serializer};
use survey_logic_types::{AnswerValue, Answers, Question, QuestionId, QuestionType, Section};

pub const REQUIRED_MESSAGE: &str = "This question is required";

/// Per-question validation messages, in question order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<(QuestionId, String)>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for a question, replacing any previous one.
    pub fn insert(&mut self, id: QuestionId, message: impl Into<String>) {
        let message = message.into();
        match self.errors.iter_mut().find(|(existing, _)| *existing == id) {
            Some((_, slot)) => *slot = message,
            None => self.errors.push((id, message)),
        }
    }

    /// The message for a question, if it failed.
    pub fn get(&self, id: &QuestionId) -> Option<&str> {
        self.errors
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, message)| message.as_str())
    }

    pub fn contains(&self, id: &QuestionId) -> bool {
        self.get(id).is_some()
    }

    /// Drop the message for a question (its answer changed).
    pub fn remove(&mut self, id: &QuestionId) {
        self.errors.retain(|(existing, _)| existing != id);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &str)> {
        self.errors.iter().map(|(id, message)| (id, message.as_str()))
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.errors.iter().map(|(id, message)| (id, message)))
    }
}

/// Validate the questions of a section that `include` selects.
pub fn validate_section(
    section: &Section,
    answers: &Answers,
    include: impl Fn(&Question) -> bool,
) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    for question in section.questions.iter().filter(|q| include(q)) {
        if let Err(message) = validate_answer(question, answers.get(&question.id)) {
            errors.insert(question.id.clone(), message);
        }
    }
    errors
}

/// Validate one answer against its question.
///
/// Required questions need a non-empty answer. Non-empty answers are checked
/// against the question's type and its `ValidationConfig`; an empty answer to
/// an optional question is always accepted.
pub fn validate_answer(question: &Question, answer: Option<&AnswerValue>) -> Result<(), String> {
    let Some(answer) = answer.filter(|value| !value.is_empty()) else {
        return if question.required {
            Err(REQUIRED_MESSAGE.to_string())
        } else {
            Ok(())
        };
    };

    check_type(&question.question_type, answer)?;

    let Some(rules) = &question.config.validation else {
        return Ok(());
    };
    let fail = |generated: String| Err(rules.message.clone().unwrap_or(generated));

    if let Some(items) = answer.as_list() {
        if let Some(min) = rules.min_selections
            && items.len() < min
        {
            return fail(format!("Select at least {min} options"));
        }
        if let Some(max) = rules.max_selections
            && items.len() > max
        {
            return fail(format!("Select at most {max} options"));
        }
        return Ok(());
    }

    let text = answer.to_text();
    let length = text.chars().count();
    if let Some(min) = rules.min_length
        && length < min
    {
        return fail(format!("Enter at least {min} characters ({length} so far)"));
    }
    if let Some(max) = rules.max_length
        && length > max
    {
        return fail(format!("Enter at most {max} characters"));
    }

    if rules.min.is_some() || rules.max.is_some() {
        let n = answer.to_number();
        if n.is_nan() {
            return fail("Enter a number".to_string());
        }
        if let Some(min) = rules.min
            && n < min
        {
            return fail(format!("Enter a value of at least {min}"));
        }
        if let Some(max) = rules.max
            && n > max
        {
            return fail(format!("Enter a value of at most {max}"));
        }
    }

    if let Some(pattern) = &rules.pattern {
        match Regex::new(pattern) {
            Ok(re) if !re.is_match(&text) => {
                return fail("Answer does not match the expected format".to_string());
            }
            Ok(_) => {}
            Err(err) => warn!(
                "Ignoring invalid pattern on question '{}': {err}",
                question.id
            ),
        }
    }

    Ok(())
}

fn check_type(question_type: &QuestionType, answer: &AnswerValue) -> Result<(), String> {
    match question_type {
        QuestionType::Email => {
            let email = answer.to_text();
            let valid = email
                .split_once('@')
                .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
            if valid {
                Ok(())
            } else {
                Err("Enter a valid email (e.g., you@example.com)".into())
            }
        }
        QuestionType::Number
        | QuestionType::Rating
        | QuestionType::Scale
        | QuestionType::Nps
        | QuestionType::Slider => {
            if answer.to_number().is_nan() {
                Err("Enter a number".into())
            } else {
                Ok(())
            }
        }
        _ => Ok(()),
    }
}
