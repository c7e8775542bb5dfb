use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    Condition, DisplayLogicConfig, QuestionConfig, QuestionId, SkipLogicConfig, SkipRule,
    ValidationConfig,
};

/// A single question in a survey section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Stable identifier; the key of this question's answer.
    pub id: QuestionId,

    /// The kind of question (determines the answer shape).
    #[serde(rename = "type")]
    pub question_type: QuestionType,

    /// The prompt text shown to the respondent.
    #[serde(default)]
    pub text: String,

    /// Choices for choice-based questions.
    #[serde(default)]
    pub options: Vec<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub config: QuestionConfig,
}

impl Question {
    /// Create a new optional question without choices or config.
    pub fn new(
        id: impl Into<QuestionId>,
        question_type: QuestionType,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            question_type,
            text: text.into(),
            options: Vec::new(),
            required: false,
            config: QuestionConfig::default(),
        }
    }

    /// Set the choices.
    pub fn with_options<S: Into<String>>(mut self, options: impl IntoIterator<Item = S>) -> Self {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Mark the question as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Show the question only when all conditions hold.
    pub fn shown_when(mut self, conditions: Vec<Condition>) -> Self {
        self.config.display_logic = Some(DisplayLogicConfig::all_of(conditions));
        self
    }

    /// Attach skip-logic rules.
    pub fn with_skip_rules(mut self, rules: Vec<SkipRule>) -> Self {
        self.config.skip_logic = Some(SkipLogicConfig::new(rules));
        self
    }

    /// Attach answer constraints.
    pub fn with_validation(mut self, validation: ValidationConfig) -> Self {
        self.config.validation = Some(validation);
        self
    }

    /// Check if visibility of this question depends on other answers.
    pub fn has_display_logic(&self) -> bool {
        self.config.active_display_logic().is_some()
    }

    /// Check if submitting this question's section may jump elsewhere.
    pub fn has_skip_logic(&self) -> bool {
        self.config.active_skip_logic().is_some()
    }
}

/// How a question type's answers are shaped, for value coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerShape {
    /// One text-like value.
    Scalar,
    /// Several selected values.
    Multi,
    /// One numeric value.
    Numeric,
    /// A question type the evaluator does not understand.
    Unknown,
}

/// The kind of question.
///
/// Serialized as its snake_case name; unrecognised names are kept as
/// `Other` so stored definitions round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QuestionType {
    Text,
    Textarea,
    Email,
    Phone,
    Number,
    Date,
    MultipleChoice,
    Dropdown,
    YesNo,
    Checkbox,
    MultiSelect,
    Rating,
    Scale,
    Nps,
    Slider,
    Ranking,
    Other(String),
}

impl QuestionType {
    /// The wire name of the question type.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Number => "number",
            Self::Date => "date",
            Self::MultipleChoice => "multiple_choice",
            Self::Dropdown => "dropdown",
            Self::YesNo => "yes_no",
            Self::Checkbox => "checkbox",
            Self::MultiSelect => "multi_select",
            Self::Rating => "rating",
            Self::Scale => "scale",
            Self::Nps => "nps",
            Self::Slider => "slider",
            Self::Ranking => "ranking",
            Self::Other(name) => name,
        }
    }

    /// The answer shape of this question type.
    pub fn shape(&self) -> AnswerShape {
        match self {
            Self::Text
            | Self::Textarea
            | Self::Email
            | Self::Phone
            | Self::Date
            | Self::MultipleChoice
            | Self::Dropdown
            | Self::YesNo => AnswerShape::Scalar,
            Self::Checkbox | Self::MultiSelect | Self::Ranking => AnswerShape::Multi,
            Self::Number | Self::Rating | Self::Scale | Self::Nps | Self::Slider => {
                AnswerShape::Numeric
            }
            Self::Other(_) => AnswerShape::Unknown,
        }
    }

    /// Check if the respondent picks from `options`.
    pub fn is_choice(&self) -> bool {
        matches!(
            self,
            Self::MultipleChoice | Self::Dropdown | Self::Checkbox | Self::MultiSelect | Self::Ranking
        )
    }
}

impl From<String> for QuestionType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "text" => Self::Text,
            "textarea" => Self::Textarea,
            "email" => Self::Email,
            "phone" => Self::Phone,
            "number" => Self::Number,
            "date" => Self::Date,
            "multiple_choice" => Self::MultipleChoice,
            "dropdown" => Self::Dropdown,
            "yes_no" => Self::YesNo,
            "checkbox" => Self::Checkbox,
            "multi_select" => Self::MultiSelect,
            "rating" => Self::Rating,
            "scale" => Self::Scale,
            "nps" => Self::Nps,
            "slider" => Self::Slider,
            "ranking" => Self::Ranking,
            _ => Self::Other(name),
        }
    }
}

impl From<&str> for QuestionType {
    fn from(name: &str) -> Self {
        Self::from(name.to_string())
    }
}

impl From<QuestionType> for String {
    fn from(question_type: QuestionType) -> Self {
        question_type.as_str().to_string()
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_external_shape() {
        let json = r#"{
            "id": "B",
            "type": "text",
            "text": "Why?",
            "required": true,
            "config": {
                "displayLogic": {
                    "enabled": true,
                    "conditions": [{"questionId": "A", "operator": "equals", "value": "Yes"}]
                }
            }
        }"#;
        let question: Question = serde_json::from_str(json).unwrap();
        assert_eq!(question.question_type, QuestionType::Text);
        assert!(question.required);
        assert!(question.has_display_logic());
        assert!(!question.has_skip_logic());
    }

    #[test]
    fn unknown_type_round_trips() {
        let json = r#"{"id":"z","type":"map_zone","text":"Where?"}"#;
        let question: Question = serde_json::from_str(json).unwrap();
        assert_eq!(question.question_type.shape(), AnswerShape::Unknown);
        let back = serde_json::to_value(&question).unwrap();
        assert_eq!(back["type"], "map_zone");
    }

    #[test]
    fn builder() {
        let question = Question::new("color", QuestionType::Checkbox, "Colors?")
            .with_options(["Red", "Blue"])
            .required();
        assert_eq!(question.options, vec!["Red", "Blue"]);
        assert!(question.required);
        assert_eq!(question.question_type.shape(), AnswerShape::Multi);
    }
}
