//! Static checks of the question references in a definition.
//!
//! Evaluation tolerates broken references (the condition fails, the rule is
//! passed over); the audit surfaces them so an author can fix them.

use serde::Serialize;
use survey_logic_types::{Operator, QuestionId, SectionId, SurveyDefinition};

/// Which kind of logic an issue was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicKind {
    Display,
    Skip,
}

/// One broken or suspicious reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReferenceIssue {
    /// A condition names a question that does not exist.
    DanglingCondition {
        owner: QuestionId,
        referenced: QuestionId,
        /// The question text matching would use at evaluation time.
        #[serde(skip_serializing_if = "Option::is_none")]
        recoverable_by: Option<QuestionId>,
        /// Several questions share the saved text.
        ambiguous: bool,
    },

    /// A question's display logic depends on its own answer.
    SelfReference { owner: QuestionId },

    /// A condition depends on a question that comes later in the survey.
    ForwardReference {
        owner: QuestionId,
        referenced: QuestionId,
    },

    /// An operator that cannot be evaluated in this kind of logic.
    InvalidOperator {
        owner: QuestionId,
        logic: LogicKind,
        operator: String,
    },

    /// An enabled skip rule without a target section.
    MissingTarget { owner: QuestionId, rule: usize },

    /// A skip rule targets a section that does not exist.
    UnknownTargetSection {
        owner: QuestionId,
        rule: usize,
        section_id: SectionId,
    },

    /// A skip rule focuses a question outside its target section.
    TargetQuestionNotInSection {
        owner: QuestionId,
        rule: usize,
        section_id: SectionId,
        question_id: QuestionId,
    },
}

impl ReferenceIssue {
    /// The question whose logic has the issue.
    pub fn owner(&self) -> &QuestionId {
        match self {
            Self::DanglingCondition { owner, .. }
            | Self::SelfReference { owner }
            | Self::ForwardReference { owner, .. }
            | Self::InvalidOperator { owner, .. }
            | Self::MissingTarget { owner, .. }
            | Self::UnknownTargetSection { owner, .. }
            | Self::TargetQuestionNotInSection { owner, .. } => owner,
        }
    }
}

/// Report every reference issue of the active logic in a definition, in
/// survey order. Disabled logic and disabled rules are not checked.
pub fn audit(definition: &SurveyDefinition) -> Vec<ReferenceIssue> {
    let mut issues = Vec::new();
    let positions: Vec<&QuestionId> = definition.questions().map(|q| &q.id).collect();
    let position = |id: &QuestionId| positions.iter().position(|p| *p == id);

    for (own_position, question) in definition.questions().enumerate() {
        let owner = &question.id;

        if let Some(logic) = question.config.active_display_logic() {
            for condition in &logic.conditions {
                if !condition.operator.is_display_operator() {
                    issues.push(invalid_operator(owner, LogicKind::Display, &condition.operator));
                }
                if &condition.question_id == owner {
                    issues.push(ReferenceIssue::SelfReference {
                        owner: owner.clone(),
                    });
                    continue;
                }
                match position(&condition.question_id) {
                    Some(referenced) if referenced > own_position => {
                        issues.push(ReferenceIssue::ForwardReference {
                            owner: owner.clone(),
                            referenced: condition.question_id.clone(),
                        });
                    }
                    Some(_) => {}
                    None => {
                        let matches: Vec<&QuestionId> = match condition.question_text.as_deref() {
                            Some(text) => definition
                                .questions_with_text(text)
                                .map(|q| &q.id)
                                .collect(),
                            None => Vec::new(),
                        };
                        issues.push(ReferenceIssue::DanglingCondition {
                            owner: owner.clone(),
                            referenced: condition.question_id.clone(),
                            recoverable_by: matches.first().map(|id| (*id).clone()),
                            ambiguous: matches.len() > 1,
                        });
                    }
                }
            }
        }

        if let Some(logic) = question.config.active_skip_logic() {
            for (rule_index, rule) in logic.rules.iter().enumerate() {
                if !rule.enabled {
                    continue;
                }
                if !rule.operator.is_known() {
                    issues.push(invalid_operator(owner, LogicKind::Skip, &rule.operator));
                }
                let Some(target) = rule.target_section() else {
                    issues.push(ReferenceIssue::MissingTarget {
                        owner: owner.clone(),
                        rule: rule_index,
                    });
                    continue;
                };
                let Some(section_index) = definition.section_index(target) else {
                    issues.push(ReferenceIssue::UnknownTargetSection {
                        owner: owner.clone(),
                        rule: rule_index,
                        section_id: target.clone(),
                    });
                    continue;
                };
                if let Some(focus) = rule.target_question()
                    && let Some(section) = definition.section(section_index)
                    && section.question(focus).is_none()
                {
                    issues.push(ReferenceIssue::TargetQuestionNotInSection {
                        owner: owner.clone(),
                        rule: rule_index,
                        section_id: target.clone(),
                        question_id: focus.clone(),
                    });
                }
            }
        }
    }
    issues
}

fn invalid_operator(owner: &QuestionId, logic: LogicKind, operator: &Operator) -> ReferenceIssue {
    ReferenceIssue::InvalidOperator {
        owner: owner.clone(),
        logic,
        operator: operator.to_string(),
    }
}
