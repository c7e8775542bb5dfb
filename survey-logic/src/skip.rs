//! Skip logic: which section comes after a submitted one.
//!
//! Navigation only happens once the section validates. The first firing
//! rule decides the jump; otherwise the survey advances in order.

use log::{debug, warn};
use serde::Serialize;
use survey_logic_types::{Answers, QuestionId, Section, SectionId};

use crate::{Evaluator, ValidationErrors, operator, validate};

/// Where to go after a section is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Navigation {
    /// No rule fired; continue with the next section.
    Advance { section_index: usize },

    /// A skip rule fired.
    Jump {
        section_index: usize,
        section_id: SectionId,
        #[serde(skip_serializing_if = "Option::is_none")]
        target_question_id: Option<QuestionId>,
        /// The question whose rule fired.
        triggered_by: QuestionId,
    },

    /// The submitted section was the last one.
    Complete,
}

impl Navigation {
    /// The section to show next, or `None` when the survey is complete.
    pub fn next_section_index(&self) -> Option<usize> {
        match self {
            Self::Advance { section_index } | Self::Jump { section_index, .. } => {
                Some(*section_index)
            }
            Self::Complete => None,
        }
    }

    /// The question to highlight in the next section, if a rule named one.
    pub fn target_question_id(&self) -> Option<&QuestionId> {
        match self {
            Self::Jump {
                target_question_id, ..
            } => target_question_id.as_ref(),
            _ => None,
        }
    }
}

impl Evaluator<'_> {
    /// Decide the next section after submitting section `current`.
    ///
    /// Fails with the per-question messages when validation rejects the
    /// section; nothing else is evaluated in that case. An index past the
    /// end counts as complete.
    pub fn next_section(
        &self,
        current: usize,
        answers: &Answers,
    ) -> Result<Navigation, ValidationErrors> {
        let Some(section) = self.definition.section(current) else {
            warn!("Section index {current} is out of range; treating survey as complete");
            return Ok(Navigation::Complete);
        };

        let errors = validate::validate_section(section, answers, |q| {
            self.options.validate_hidden_questions || self.should_show(q, answers)
        });
        if !errors.is_empty() {
            debug!(
                "Section '{}' rejected with {} error(s)",
                section.id,
                errors.len()
            );
            return Err(errors);
        }

        if let Some(jump) = self.find_jump(section, answers) {
            return Ok(jump);
        }

        if current + 1 < self.definition.len() {
            Ok(Navigation::Advance {
                section_index: current + 1,
            })
        } else {
            Ok(Navigation::Complete)
        }
    }

    /// Find the first skip rule that fires for a section.
    ///
    /// Every answered question of the section is scanned in order, hidden
    /// ones included; for each, rules run in priority order. Disabled rules, rules without a target and rules whose
    /// target section does not exist are passed over. The first matching
    /// rule wins and nothing after it is evaluated.
    pub fn find_jump(&self, section: &Section, answers: &Answers) -> Option<Navigation> {
        for question in &section.questions {
            let Some(logic) = question.config.active_skip_logic() else {
                continue;
            };
            let Some(answer) = answers.get(&question.id).filter(|a| !a.is_empty()) else {
                continue;
            };
            let Some(answer) = answer.coerce_for(&question.question_type) else {
                debug!(
                    "Skipping rules of '{}': unknown type '{}'",
                    question.id, question.question_type
                );
                continue;
            };

            for rule in logic.ordered_rules() {
                if !rule.enabled {
                    continue;
                }
                let Some(target) = rule.target_section() else {
                    continue;
                };
                if !operator::evaluate(&rule.operator, Some(&answer), &rule.expected()) {
                    continue;
                }
                let Some(section_index) = self.definition.section_index(target) else {
                    warn!(
                        "Skip rule on '{}' targets unknown section '{}'",
                        question.id, target
                    );
                    continue;
                };
                debug!(
                    "Skip rule on '{}' ({} {}) jumps to section '{}'",
                    question.id,
                    rule.operator,
                    rule.expected().to_text(),
                    target
                );
                return Some(Navigation::Jump {
                    section_index,
                    section_id: target.clone(),
                    target_question_id: rule.target_question().cloned(),
                    triggered_by: question.id.clone(),
                });
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_logic_types::{Condition, Question, QuestionType, SkipRule, SurveyDefinition};

    fn three_sections(first: Section) -> SurveyDefinition {
        SurveyDefinition::new(vec![
            first,
            Section::new("S2", "Two", 1)
                .with_question(Question::new("x", QuestionType::Text, "X?")),
            Section::new("S3", "Three", 2)
                .with_question(Question::new("y", QuestionType::Text, "Y?")),
        ])
        .unwrap()
    }

    #[test]
    fn sequential_without_rules() {
        let definition = three_sections(
            Section::new("S1", "One", 0).with_question(Question::new("a", QuestionType::Text, "A?")),
        );
        let evaluator = Evaluator::new(&definition);
        assert_eq!(
            evaluator.next_section(0, &Answers::new()),
            Ok(Navigation::Advance { section_index: 1 })
        );
        assert_eq!(
            evaluator.next_section(2, &Answers::new()),
            Ok(Navigation::Complete)
        );
    }

    #[test]
    fn rule_jumps_over_sections() {
        let definition = three_sections(
            Section::new("S1", "One", 0).with_question(
                Question::new("D", QuestionType::Number, "D?")
                    .required()
                    .with_skip_rules(vec![
                        SkipRule::jump_to("S3", "greater_than", "3").with_target_question("y"),
                    ]),
            ),
        );
        let evaluator = Evaluator::new(&definition);
        let navigation = evaluator
            .next_section(0, &Answers::new().with("D", "5"))
            .unwrap();
        assert_eq!(navigation.next_section_index(), Some(2));
        assert_eq!(navigation.target_question_id(), Some(&QuestionId::from("y")));

        let navigation = evaluator
            .next_section(0, &Answers::new().with("D", "2"))
            .unwrap();
        assert_eq!(navigation, Navigation::Advance { section_index: 1 });
    }

    #[test]
    fn first_match_wins_across_questions_and_rules() {
        let definition = three_sections(
            Section::new("S1", "One", 0)
                .with_question(
                    Question::new("first", QuestionType::Text, "First?").with_skip_rules(vec![
                        SkipRule::jump_to("S3", "equals", "go"),
                        SkipRule::jump_to("S2", "equals", "go"),
                    ]),
                )
                .with_question(
                    Question::new("second", QuestionType::Text, "Second?")
                        .with_skip_rules(vec![SkipRule::jump_to("S2", "equals", "go")]),
                ),
        );
        let evaluator = Evaluator::new(&definition);
        let answers = Answers::new().with("first", "go").with("second", "go");
        match evaluator.next_section(0, &answers).unwrap() {
            Navigation::Jump {
                section_id,
                triggered_by,
                ..
            } => {
                assert_eq!(section_id.as_str(), "S3");
                assert_eq!(triggered_by.as_str(), "first");
            }
            other => panic!("Expected a jump, got {other:?}"),
        }
    }

    #[test]
    fn explicit_priority_reorders_rules() {
        let definition = three_sections(
            Section::new("S1", "One", 0).with_question(
                Question::new("a", QuestionType::Text, "A?").with_skip_rules(vec![
                    SkipRule::jump_to("S2", "equals", "go"),
                    SkipRule::jump_to("S3", "equals", "go").with_priority(0),
                ]),
            ),
        );
        let evaluator = Evaluator::new(&definition);
        let navigation = evaluator
            .next_section(0, &Answers::new().with("a", "go"))
            .unwrap();
        assert_eq!(navigation.next_section_index(), Some(2));
    }

    #[test]
    fn malformed_rules_are_skipped() {
        let mut no_target = SkipRule::jump_to("S3", "equals", "go");
        no_target.target_section_id = None;
        let definition = three_sections(
            Section::new("S1", "One", 0).with_question(
                Question::new("a", QuestionType::Text, "A?").with_skip_rules(vec![
                    SkipRule::jump_to("S3", "equals", "go").disabled(),
                    no_target,
                    SkipRule::jump_to("nowhere", "equals", "go"),
                    SkipRule::jump_to("S3", "bogus", "go"),
                    SkipRule::jump_to("S2", "contains", "g"),
                ]),
            ),
        );
        let evaluator = Evaluator::new(&definition);
        let navigation = evaluator
            .next_section(0, &Answers::new().with("a", "go"))
            .unwrap();
        assert!(matches!(
            navigation,
            Navigation::Jump { section_index: 1, .. }
        ));
    }

    #[test]
    fn unanswered_questions_do_not_jump() {
        let definition = three_sections(
            Section::new("S1", "One", 0).with_question(
                Question::new("a", QuestionType::Text, "A?")
                    .with_skip_rules(vec![SkipRule::jump_to("S3", "is_empty", "")]),
            ),
        );
        let evaluator = Evaluator::new(&definition);
        assert_eq!(
            evaluator.next_section(0, &Answers::new()),
            Ok(Navigation::Advance { section_index: 1 })
        );
    }

    #[test]
    fn validation_blocks_navigation() {
        let definition = three_sections(
            Section::new("S1", "One", 0)
                .with_question(
                    Question::new("D", QuestionType::Number, "D?")
                        .required()
                        .with_skip_rules(vec![SkipRule::jump_to("S3", "greater_than", "3")]),
                )
                .with_question(Question::new("E", QuestionType::Text, "E?").required()),
        );
        let evaluator = Evaluator::new(&definition);
        let errors = evaluator
            .next_section(0, &Answers::new().with("D", "5"))
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains(&"E".into()));
    }

    #[test]
    fn hidden_required_questions_do_not_block() {
        let definition = three_sections(
            Section::new("S1", "One", 0)
                .with_question(Question::new("A", QuestionType::YesNo, "A?").required())
                .with_question(
                    Question::new("B", QuestionType::Text, "B?")
                        .required()
                        .shown_when(vec![Condition::new("A", "equals", "Yes")]),
                ),
        );
        let answers = Answers::new().with("A", "No");
        assert!(Evaluator::new(&definition).next_section(0, &answers).is_ok());

        let strict = Evaluator::with_options(
            &definition,
            crate::EvaluatorOptions {
                validate_hidden_questions: true,
                ..Default::default()
            },
        );
        assert!(strict.next_section(0, &answers).is_err());
    }

    #[test]
    fn hidden_answered_question_still_jumps() {
        let definition = three_sections(
            Section::new("S1", "One", 0)
                .with_question(Question::new("A", QuestionType::YesNo, "A?"))
                .with_question(
                    Question::new("H", QuestionType::Text, "H?")
                        .shown_when(vec![Condition::new("A", "equals", "Yes")])
                        .with_skip_rules(vec![SkipRule::jump_to("S3", "equals", "go")]),
                ),
        );
        let evaluator = Evaluator::new(&definition);
        let answers = Answers::new().with("A", "No").with("H", "go");
        let hidden = definition.question(&"H".into()).unwrap();
        assert!(!evaluator.should_show(hidden, &answers));
        match evaluator.next_section(0, &answers).unwrap() {
            Navigation::Jump {
                section_index,
                triggered_by,
                ..
            } => {
                assert_eq!(section_index, 2);
                assert_eq!(triggered_by.as_str(), "H");
            }
            other => panic!("Expected a jump, got {other:?}"),
        }
    }

    #[test]
    fn numeric_text_answer_matches_verbatim() {
        let definition = three_sections(
            Section::new("S1", "One", 0).with_question(
                Question::new("n", QuestionType::Number, "N?")
                    .with_skip_rules(vec![SkipRule::jump_to("S3", "equals", "05")]),
            ),
        );
        let evaluator = Evaluator::new(&definition);
        assert_eq!(
            evaluator
                .next_section(0, &Answers::new().with("n", "05"))
                .unwrap()
                .next_section_index(),
            Some(2)
        );
        assert_eq!(
            evaluator.next_section(0, &Answers::new().with("n", "5")),
            Ok(Navigation::Advance { section_index: 1 })
        );
    }

    #[test]
    fn navigation_serializes_with_action_tag() {
        let json = serde_json::to_value(Navigation::Advance { section_index: 1 }).unwrap();
        assert_eq!(json["action"], "advance");
        assert_eq!(json["section_index"], 1);
    }
}
