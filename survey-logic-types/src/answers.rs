use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, Serializer};

use crate::{AnswerValue, QuestionId};

/// Error type for typed answer access.
#[derive(Debug, thiserror::Error)]
pub enum AnswerError {
    #[error("Missing answer for question: {0}")]
    Missing(QuestionId),

    #[error("Type mismatch for question '{id}': expected {expected}, got {actual}")]
    TypeMismatch {
        id: QuestionId,
        expected: &'static str,
        actual: &'static str,
    },
}

/// The answer map: question identifier to respondent-supplied value.
///
/// A question without an entry is unanswered. On the wire this is a plain
/// JSON object; `null` entries are read as "unanswered" and dropped.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "BTreeMap<QuestionId, Option<AnswerValue>>")]
pub struct Answers {
    values: BTreeMap<QuestionId, AnswerValue>,
}

impl Answers {
    /// Create a new empty answer map.
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Record an answer, replacing any previous one.
    pub fn set(&mut self, id: impl Into<QuestionId>, value: impl Into<AnswerValue>) {
        self.values.insert(id.into(), value.into());
    }

    /// Builder-style `set`.
    pub fn with(mut self, id: impl Into<QuestionId>, value: impl Into<AnswerValue>) -> Self {
        self.set(id, value);
        self
    }

    /// Get the answer for a question.
    pub fn get(&self, id: &QuestionId) -> Option<&AnswerValue> {
        self.values.get(id)
    }

    /// Check if an answer exists for a question (even an empty one).
    pub fn contains(&self, id: &QuestionId) -> bool {
        self.values.contains_key(id)
    }

    /// Remove the answer for a question.
    pub fn remove(&mut self, id: &QuestionId) -> Option<AnswerValue> {
        self.values.remove(id)
    }

    /// Check if a question has a non-empty answer.
    pub fn has_value(&self, id: &QuestionId) -> bool {
        self.get(id).is_some_and(|value| !value.is_empty())
    }

    /// Get an iterator over all answered questions, in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &AnswerValue)> {
        self.values.iter()
    }

    /// Get the number of answers.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if there are no answers.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Drop every answer.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Get a text answer.
    pub fn get_text(&self, id: &QuestionId) -> Result<&str, AnswerError> {
        match self.get(id) {
            Some(AnswerValue::Text(s)) => Ok(s),
            Some(other) => Err(AnswerError::TypeMismatch {
                id: id.clone(),
                expected: "Text",
                actual: other.type_name(),
            }),
            None => Err(AnswerError::Missing(id.clone())),
        }
    }

    /// Get a numeric answer.
    pub fn get_number(&self, id: &QuestionId) -> Result<f64, AnswerError> {
        match self.get(id) {
            Some(AnswerValue::Number(n)) => Ok(*n),
            Some(other) => Err(AnswerError::TypeMismatch {
                id: id.clone(),
                expected: "Number",
                actual: other.type_name(),
            }),
            None => Err(AnswerError::Missing(id.clone())),
        }
    }

    /// Get a list answer.
    pub fn get_list(&self, id: &QuestionId) -> Result<&[AnswerValue], AnswerError> {
        match self.get(id) {
            Some(AnswerValue::List(items)) => Ok(items),
            Some(other) => Err(AnswerError::TypeMismatch {
                id: id.clone(),
                expected: "List",
                actual: other.type_name(),
            }),
            None => Err(AnswerError::Missing(id.clone())),
        }
    }
}

impl From<BTreeMap<QuestionId, Option<AnswerValue>>> for Answers {
    fn from(raw: BTreeMap<QuestionId, Option<AnswerValue>>) -> Self {
        Self {
            values: raw
                .into_iter()
                .filter_map(|(id, value)| value.map(|v| (id, v)))
                .collect(),
        }
    }
}

impl Serialize for Answers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.values.serialize(serializer)
    }
}

impl<'a> IntoIterator for &'a Answers {
    type Item = (&'a QuestionId, &'a AnswerValue);
    type IntoIter = std::collections::btree_map::Iter<'a, QuestionId, AnswerValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl<K: Into<QuestionId>, V: Into<AnswerValue>> FromIterator<(K, V)> for Answers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut answers = Answers::new();
        for (id, value) in iter {
            answers.set(id, value);
        }
        answers
    }
}
