//! Core types for the survey-logic crate.
//!
//! This crate provides the foundational, presentation-agnostic types:
//! - `SurveyDefinition` and `Section` - The survey tree, ordered for navigation
//! - `Question`, `QuestionType` and `QuestionConfig` - Questions and their typed capabilities
//! - `Answers` and `AnswerValue` - The answer map collected from a respondent
//! - `Respondent` trait - For implementing things that answer questions

mod ids;
pub use ids::{QuestionId, SectionId};

mod answer_value;
pub use answer_value::AnswerValue;

mod answers;
pub use answers::{AnswerError, Answers};

mod config;
pub use config::{
    Condition, DisplayLogicConfig, Operator, QuestionConfig, SkipLogicConfig, SkipRule,
    ValidationConfig,
};

mod question;
pub use question::{AnswerShape, Question, QuestionType};

mod survey_definition;
pub use survey_definition::{Section, SurveyDefinition};

mod error;
pub use error::{DefinitionError, SurveyError};

mod traits;
pub use traits::{Prompt, Respondent};
