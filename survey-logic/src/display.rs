//! Display logic: which questions a respondent sees.
//!
//! A question is shown unless its enabled display logic has a condition that
//! does not hold for the current answers.

use std::collections::HashSet;

use log::debug;
use survey_logic_types::{Answers, Condition, Question, QuestionId, Section, SurveyDefinition};

use crate::{EvaluatorOptions, operator, reconcile};

/// The branching evaluator for one survey definition.
///
/// Every method is a pure function of the definition and the answer map it
/// is given; nothing is cached between calls.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    pub(crate) definition: &'a SurveyDefinition,
    pub(crate) options: EvaluatorOptions,
}

impl<'a> Evaluator<'a> {
    /// Create an evaluator with default options.
    pub fn new(definition: &'a SurveyDefinition) -> Self {
        Self::with_options(definition, EvaluatorOptions::default())
    }

    /// Create an evaluator with the given options.
    pub fn with_options(definition: &'a SurveyDefinition, options: EvaluatorOptions) -> Self {
        Self {
            definition,
            options,
        }
    }

    /// The definition being evaluated.
    pub fn definition(&self) -> &'a SurveyDefinition {
        self.definition
    }

    pub fn options(&self) -> EvaluatorOptions {
        self.options
    }

    /// Decide whether a question is displayed.
    ///
    /// Questions without active display logic are always shown. Otherwise
    /// every condition must hold.
    pub fn should_show(&self, question: &Question, answers: &Answers) -> bool {
        match question.config.active_display_logic() {
            Some(logic) => logic
                .conditions
                .iter()
                .all(|condition| self.condition_holds(condition, answers)),
            None => true,
        }
    }

    /// Evaluate a single display-logic condition.
    ///
    /// A condition fails when its operator is not a display operator, when
    /// no answer can be resolved for it, or when the source question's type
    /// is unknown.
    pub fn condition_holds(&self, condition: &Condition, answers: &Answers) -> bool {
        if !condition.operator.is_display_operator() {
            debug!(
                "Operator '{}' is not usable in display logic",
                condition.operator
            );
            return false;
        }

        let resolution = reconcile::resolve(
            self.definition,
            answers,
            condition,
            self.options.reconciliation,
        );
        let Some(answer) = resolution.answer(answers) else {
            return false;
        };

        let answer = match resolution.question() {
            Some(source) => match answer.coerce_for(&source.question_type) {
                Some(coerced) => coerced,
                None => {
                    debug!(
                        "Question '{}' has unknown type '{}'; condition fails",
                        source.id, source.question_type
                    );
                    return false;
                }
            },
            None => answer.clone(),
        };

        operator::evaluate(&condition.operator, Some(&answer), &condition.expected())
    }

    /// Compute the visibility of every question in one pass.
    pub fn visibility(&self, answers: &Answers) -> Visibility {
        let hidden = self
            .definition
            .questions()
            .filter(|q| !self.should_show(q, answers))
            .map(|q| q.id.clone())
            .collect();
        Visibility { hidden }
    }

    /// The visible questions of a section, in order.
    pub fn visible_questions<'s>(
        &self,
        section: &'s Section,
        answers: &Answers,
    ) -> Vec<&'s Question> {
        section
            .questions
            .iter()
            .filter(|q| self.should_show(q, answers))
            .collect()
    }
}

/// The result of one visibility pass over a survey.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Visibility {
    hidden: HashSet<QuestionId>,
}

impl Visibility {
    /// Check if a question is visible. Questions unknown to the pass are visible.
    pub fn is_visible(&self, id: &QuestionId) -> bool {
        !self.hidden.contains(id)
    }

    /// Check if a question is hidden.
    pub fn is_hidden(&self, id: &QuestionId) -> bool {
        self.hidden.contains(id)
    }

    /// Number of hidden questions.
    pub fn hidden_count(&self) -> usize {
        self.hidden.len()
    }

    /// Split the questions of a definition into visible and hidden ids, in
    /// survey order.
    pub fn partition<'d>(
        &self,
        definition: &'d SurveyDefinition,
    ) -> (Vec<&'d QuestionId>, Vec<&'d QuestionId>) {
        definition
            .questions()
            .map(|q| &q.id)
            .partition(|id| self.is_visible(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_logic_types::{DisplayLogicConfig, QuestionType, Section};

    fn gate(condition: Condition) -> SurveyDefinition {
        SurveyDefinition::new(vec![
            Section::new("s1", "One", 0)
                .with_question(
                    Question::new("A", QuestionType::MultipleChoice, "Continue?")
                        .with_options(["Yes", "No"]),
                )
                .with_question(Question::new("B", QuestionType::Text, "Why?").shown_when(vec![
                    condition,
                ])),
        ])
        .unwrap()
    }

    fn b_visible(definition: &SurveyDefinition, answers: &Answers) -> bool {
        let evaluator = Evaluator::new(definition);
        let b = definition.question(&"B".into()).unwrap();
        evaluator.should_show(b, answers)
    }

    #[test]
    fn without_display_logic_always_visible() {
        let definition = gate(Condition::new("A", "equals", "Yes"));
        let evaluator = Evaluator::new(&definition);
        let a = definition.question(&"A".into()).unwrap();
        assert!(evaluator.should_show(a, &Answers::new()));
        assert!(evaluator.should_show(a, &Answers::new().with("A", "No")));
    }

    #[test]
    fn disabled_display_logic_is_ignored() {
        let mut definition = gate(Condition::new("A", "equals", "Yes"));
        definition.sections_mut()[0].questions[1].config.display_logic = Some(DisplayLogicConfig {
            enabled: false,
            conditions: vec![Condition::new("A", "equals", "Yes")],
        });
        assert!(b_visible(&definition, &Answers::new().with("A", "No")));
    }

    #[test]
    fn enabled_without_conditions_is_visible() {
        let mut definition = gate(Condition::new("A", "equals", "Yes"));
        definition.sections_mut()[0].questions[1].config.display_logic =
            Some(DisplayLogicConfig::all_of(Vec::new()));
        assert!(b_visible(&definition, &Answers::new()));
    }

    #[test]
    fn unanswered_source_hides() {
        let definition = gate(Condition::new("A", "equals", "Yes"));
        assert!(!b_visible(&definition, &Answers::new()));
    }

    #[test]
    fn equals_controls_visibility() {
        let definition = gate(Condition::new("A", "equals", "Yes"));
        assert!(!b_visible(&definition, &Answers::new().with("A", "No")));
        assert!(b_visible(&definition, &Answers::new().with("A", "Yes")));
    }

    #[test]
    fn all_conditions_must_hold() {
        let definition = SurveyDefinition::new(vec![
            Section::new("s1", "One", 0)
                .with_question(Question::new("age", QuestionType::Number, "Age?"))
                .with_question(Question::new("pet", QuestionType::Text, "Pet?"))
                .with_question(Question::new("B", QuestionType::Text, "Why?").shown_when(vec![
                    Condition::new("age", "greater_than_or_equal", "18"),
                    Condition::new("pet", "equals", "cat"),
                ])),
        ])
        .unwrap();
        let both = Answers::new().with("age", "21").with("pet", "cat");
        let one = Answers::new().with("age", "21").with("pet", "dog");
        assert!(b_visible(&definition, &both));
        assert!(!b_visible(&definition, &one));
    }

    #[test]
    fn emptiness_operators_fail_in_display_logic() {
        let definition = gate(Condition::new("A", "is_not_empty", ""));
        assert!(!b_visible(&definition, &Answers::new().with("A", "Yes")));
    }

    #[test]
    fn unknown_operator_hides() {
        let definition = gate(Condition::new("A", "starts_with", "Y"));
        assert!(!b_visible(&definition, &Answers::new().with("A", "Yes")));
    }

    #[test]
    fn unknown_source_type_hides() {
        let definition = SurveyDefinition::new(vec![
            Section::new("s1", "One", 0)
                .with_question(Question::new("zone", QuestionType::from("map_zone"), "Where?"))
                .with_question(Question::new("B", QuestionType::Text, "Why?").shown_when(vec![
                    Condition::new("zone", "equals", "north"),
                ])),
        ])
        .unwrap();
        assert!(!b_visible(&definition, &Answers::new().with("zone", "north")));
    }

    fn gated_on(source: Question, condition: Condition) -> SurveyDefinition {
        SurveyDefinition::new(vec![
            Section::new("s1", "One", 0)
                .with_question(source)
                .with_question(
                    Question::new("B", QuestionType::Text, "Why?").shown_when(vec![condition]),
                ),
        ])
        .unwrap()
    }

    #[test]
    fn equals_on_numeric_question_compares_text_verbatim() {
        let number = gated_on(
            Question::new("n", QuestionType::Number, "How many?"),
            Condition::new("n", "equals", "05"),
        );
        assert!(b_visible(&number, &Answers::new().with("n", "05")));
        assert!(!b_visible(&number, &Answers::new().with("n", "5")));

        let rating = gated_on(
            Question::new("r", QuestionType::Rating, "Score?"),
            Condition::new("r", "equals", "4.0"),
        );
        assert!(b_visible(&rating, &Answers::new().with("r", "4.0")));
        assert!(!b_visible(&rating, &Answers::new().with("r", "4")));
    }

    #[test]
    fn ordering_on_numeric_question_reads_numbers() {
        let rating = gated_on(
            Question::new("r", QuestionType::Rating, "Score?"),
            Condition::new("r", "greater_than_or_equal", "4"),
        );
        assert!(b_visible(&rating, &Answers::new().with("r", "4.0")));
        assert!(b_visible(&rating, &Answers::new().with("r", 5)));
        assert!(!b_visible(&rating, &Answers::new().with("r", "3")));
    }

    #[test]
    fn visibility_pass_is_idempotent() {
        let definition = gate(Condition::new("A", "equals", "Yes"));
        let answers = Answers::new().with("A", "No");
        let evaluator = Evaluator::new(&definition);
        let first = evaluator.visibility(&answers);
        let second = evaluator.visibility(&answers);
        assert_eq!(first, second);
        assert!(first.is_hidden(&"B".into()));
        let (visible, hidden) = first.partition(&definition);
        assert_eq!(visible, vec![&QuestionId::from("A")]);
        assert_eq!(hidden, vec![&QuestionId::from("B")]);
    }
}
