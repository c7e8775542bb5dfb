use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{DefinitionError, Question, QuestionId, SectionId};

/// An ordered group of questions, the unit of navigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub questions: Vec<Question>,

    /// Position of the section within its survey.
    #[serde(default)]
    pub order_num: i64,
}

impl Section {
    /// Create an empty section.
    pub fn new(id: impl Into<SectionId>, title: impl Into<String>, order_num: i64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            questions: Vec::new(),
            order_num,
        }
    }

    /// Append a question.
    pub fn with_question(mut self, question: Question) -> Self {
        self.questions.push(question);
        self
    }

    /// Get the questions.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Find a question of this section by identifier.
    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| &q.id == id)
    }

    /// Position of a question within this section.
    pub fn position_of(&self, id: &QuestionId) -> Option<usize> {
        self.questions.iter().position(|q| &q.id == id)
    }
}

/// The survey tree: sections of questions, ordered by `order_num`.
///
/// A definition is presentation-agnostic. It can be previewed
/// interactively, evaluated against a stored answer map, or audited for
/// broken references.
///
/// Every constructor (including deserialization) sorts the sections and
/// rejects duplicate or blank identifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SurveyDocument")]
pub struct SurveyDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,

    sections: Vec<Section>,
}

/// The unchecked wire form of a survey definition.
#[derive(Deserialize)]
struct SurveyDocument {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    sections: Vec<Section>,
}

impl TryFrom<SurveyDocument> for SurveyDefinition {
    type Error = DefinitionError;

    fn try_from(doc: SurveyDocument) -> Result<Self, Self::Error> {
        let mut definition = Self::new(doc.sections)?;
        definition.id = doc.id;
        definition.title = doc.title;
        Ok(definition)
    }
}

impl SurveyDefinition {
    /// Create a survey definition from sections.
    pub fn new(mut sections: Vec<Section>) -> Result<Self, DefinitionError> {
        sections.sort_by_key(|section| section.order_num);
        let definition = Self {
            id: None,
            title: None,
            sections,
        };
        definition.check()?;
        Ok(definition)
    }

    /// Parse a survey definition from JSON.
    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Create an empty survey definition.
    pub fn empty() -> Self {
        Self {
            id: None,
            title: None,
            sections: Vec::new(),
        }
    }

    /// Set the survey identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the survey title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Check identifier invariants: no blank ids, section ids unique, question
    /// ids unique across the whole survey.
    pub fn check(&self) -> Result<(), DefinitionError> {
        let mut section_ids = HashSet::new();
        let mut question_ids = HashSet::new();
        for section in &self.sections {
            if section.id.is_blank() {
                return Err(DefinitionError::BlankSectionId);
            }
            if !section_ids.insert(&section.id) {
                return Err(DefinitionError::DuplicateSectionId(section.id.clone()));
            }
            for question in &section.questions {
                if question.id.is_blank() {
                    return Err(DefinitionError::BlankQuestionId(section.id.clone()));
                }
                if !question_ids.insert(&question.id) {
                    return Err(DefinitionError::DuplicateQuestionId(question.id.clone()));
                }
            }
        }
        Ok(())
    }

    /// Get the sections in navigation order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Get a mutable reference to the sections.
    ///
    /// Callers must keep identifiers unique; `check` verifies them.
    pub fn sections_mut(&mut self) -> &mut Vec<Section> {
        &mut self.sections
    }

    /// Get a section by position.
    pub fn section(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    /// Position of a section by identifier.
    pub fn section_index(&self, id: &SectionId) -> Option<usize> {
        self.sections.iter().position(|s| &s.id == id)
    }

    /// All questions, in survey order.
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.sections.iter().flat_map(|s| s.questions.iter())
    }

    /// Find a question by identifier.
    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.questions().find(|q| &q.id == id)
    }

    /// Section index and in-section position of a question.
    pub fn locate(&self, id: &QuestionId) -> Option<(usize, usize)> {
        self.sections
            .iter()
            .enumerate()
            .find_map(|(si, s)| s.position_of(id).map(|qi| (si, qi)))
    }

    /// The section containing a question.
    pub fn section_of(&self, id: &QuestionId) -> Option<&Section> {
        self.sections.iter().find(|s| s.position_of(id).is_some())
    }

    /// Questions whose text is exactly `text`, in survey order.
    pub fn questions_with_text<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a Question> {
        self.questions().filter(move |q| q.text == text)
    }

    /// Check if the survey has no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Get the number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }
}

impl Default for SurveyDefinition {
    fn default() -> Self {
        Self::empty()
    }
}
