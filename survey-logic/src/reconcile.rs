//! Recovery of stale question references in display-logic conditions.
//!
//! A condition stores the referenced question's id and a snapshot of its
//! text. When a question is deleted and recreated during editing the id goes
//! stale; the text snapshot can still find the replacement. Matching is by
//! text only, so it breaks when wording changes or two questions share a
//! text. `ReconciliationPolicy::Strict` turns it off.

use log::{debug, warn};
use survey_logic_types::{AnswerValue, Answers, Condition, Question, QuestionId, SurveyDefinition};

use crate::ReconciliationPolicy;

/// How a condition's question reference was resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution<'a> {
    /// An answer is recorded under the referenced id. `question` is `None`
    /// when the id no longer names a question of the survey.
    Direct {
        id: &'a QuestionId,
        question: Option<&'a Question>,
    },

    /// The referenced question exists (or was found by text) but is unanswered.
    Unanswered(&'a Question),

    /// The id was stale; a question with exactly the saved text was used.
    ByText(&'a Question),

    /// The id was stale and no exact text match was answered; an answered
    /// question whose text matches after whitespace and case folding was used.
    ByAnsweredText(&'a Question),

    /// Nothing could be resolved.
    Unresolved,
}

impl<'a> Resolution<'a> {
    /// The question the reference resolved to, if any.
    pub fn question(&self) -> Option<&'a Question> {
        match *self {
            Self::Direct { question, .. } => question,
            Self::Unanswered(q) | Self::ByText(q) | Self::ByAnsweredText(q) => Some(q),
            Self::Unresolved => None,
        }
    }

    /// The answer the reference resolved to, if any.
    pub fn answer<'b>(&self, answers: &'b Answers) -> Option<&'b AnswerValue> {
        match *self {
            Self::Direct { id, .. } => answers.get(id),
            Self::ByText(q) | Self::ByAnsweredText(q) => answers.get(&q.id),
            Self::Unanswered(_) | Self::Unresolved => None,
        }
    }

    /// Check if the reference went through text matching.
    pub fn is_reconciled(&self) -> bool {
        matches!(self, Self::ByText(_) | Self::ByAnsweredText(_))
    }
}

/// Resolve the question a condition refers to.
///
/// Text matching only runs when the referenced id is unanswered and names no
/// question of the survey. Never mutates the definition.
pub fn resolve<'a>(
    definition: &'a SurveyDefinition,
    answers: &Answers,
    condition: &'a Condition,
    policy: ReconciliationPolicy,
) -> Resolution<'a> {
    let referenced = definition.question(&condition.question_id);

    if answers.contains(&condition.question_id) {
        return Resolution::Direct {
            id: &condition.question_id,
            question: referenced,
        };
    }
    if let Some(question) = referenced {
        return Resolution::Unanswered(question);
    }

    if policy == ReconciliationPolicy::Strict {
        warn!(
            "Condition references unknown question '{}' (strict identifiers)",
            condition.question_id
        );
        return Resolution::Unresolved;
    }

    let Some(text) = condition
        .question_text
        .as_deref()
        .filter(|t| !t.trim().is_empty())
    else {
        warn!(
            "Condition references unknown question '{}' and has no text snapshot",
            condition.question_id
        );
        return Resolution::Unresolved;
    };

    let matches: Vec<&Question> = definition.questions_with_text(text).collect();
    if matches.len() > 1 {
        warn!(
            "Stale reference '{}' matches {} questions with text {:?}",
            condition.question_id,
            matches.len(),
            text
        );
    }
    if let Some(question) = matches.iter().copied().find(|q| answers.contains(&q.id)) {
        debug!(
            "Resolved stale reference '{}' to '{}' by text",
            condition.question_id, question.id
        );
        return Resolution::ByText(question);
    }
    if let Some(question) = matches.first().copied() {
        return Resolution::Unanswered(question);
    }

    let wanted = normalize(text);
    let answered_match = answers
        .iter()
        .filter_map(|(id, _)| definition.question(id))
        .find(|q| normalize(&q.text) == wanted);
    if let Some(question) = answered_match {
        debug!(
            "Resolved stale reference '{}' to answered question '{}' by folded text",
            condition.question_id, question.id
        );
        return Resolution::ByAnsweredText(question);
    }

    warn!(
        "Could not reconcile reference '{}' ({:?}); condition is unsatisfiable",
        condition.question_id, text
    );
    Resolution::Unresolved
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// A condition whose stale question id was rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repair {
    /// The question owning the display logic.
    pub owner: QuestionId,
    pub stale: QuestionId,
    pub replacement: QuestionId,
}

/// Rewrite stale condition references that have exactly one exact text match.
///
/// This is the authoring-side counterpart of `resolve`: it persists what
/// evaluation would otherwise re-derive on every pass. Ambiguous and
/// unmatched references are left alone.
pub fn reconcile_definition(definition: &mut SurveyDefinition) -> Vec<Repair> {
    let mut planned = Vec::new();
    for (si, section) in definition.sections().iter().enumerate() {
        for (qi, question) in section.questions.iter().enumerate() {
            let Some(logic) = &question.config.display_logic else {
                continue;
            };
            for (ci, condition) in logic.conditions.iter().enumerate() {
                if definition.question(&condition.question_id).is_some() {
                    continue;
                }
                let Some(text) = condition.question_text.as_deref() else {
                    continue;
                };
                let matches: Vec<&Question> = definition.questions_with_text(text).collect();
                if let [only] = matches.as_slice() {
                    planned.push((
                        si,
                        qi,
                        ci,
                        Repair {
                            owner: question.id.clone(),
                            stale: condition.question_id.clone(),
                            replacement: only.id.clone(),
                        },
                    ));
                }
            }
        }
    }

    let sections = definition.sections_mut();
    let mut repairs = Vec::with_capacity(planned.len());
    for (si, qi, ci, repair) in planned {
        if let Some(condition) = sections[si].questions[qi]
            .config
            .display_logic
            .as_mut()
            .and_then(|logic| logic.conditions.get_mut(ci))
        {
            condition.question_id = repair.replacement.clone();
            repairs.push(repair);
        }
    }
    repairs
}
