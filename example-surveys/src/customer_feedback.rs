use survey_logic::{
    Condition, DefinitionError, Question, QuestionType, Section, SkipRule, SurveyDefinition,
    ValidationConfig,
};

/// The minimum rating that counts as a happy visit.
pub const HAPPY_RATING: i64 = 4;

/// A post-visit feedback survey.
///
/// Respondents who did not visit skip straight to the wrap-up; unhappy
/// visitors get a complaint section, happy ones are asked what they liked.
pub fn customer_feedback() -> Result<SurveyDefinition, DefinitionError> {
    let about = Section::new("about", "About you", 0)
        .with_question(
            Question::new("name", QuestionType::Text, "What is your name?")
                .required()
                .with_validation(ValidationConfig {
                    min_length: Some(2),
                    max_length: Some(80),
                    ..Default::default()
                }),
        )
        .with_question(
            Question::new("visited", QuestionType::YesNo, "Did you visit us this month?")
                .with_options(["Yes", "No"])
                .required()
                .with_skip_rules(vec![
                    SkipRule::jump_to("wrap_up", "equals", "No").with_target_question("comments"),
                ]),
        );

    let visit = Section::new("visit", "Your visit", 1)
        .with_question(
            Question::new("rating", QuestionType::Rating, "How would you rate your visit?")
                .required()
                .with_validation(ValidationConfig {
                    min: Some(1.0),
                    max: Some(5.0),
                    ..Default::default()
                })
                .with_skip_rules(vec![
                    SkipRule::jump_to("complaint", "less_than", "3").with_target_question("issue"),
                    SkipRule::jump_to("wrap_up", "greater_than_or_equal", "3"),
                ]),
        )
        .with_question(
            Question::new("liked", QuestionType::Checkbox, "What did you like?")
                .with_options(["Staff", "Food", "Prices", "Atmosphere"])
                .with_validation(ValidationConfig {
                    max_selections: Some(3),
                    ..Default::default()
                })
                .shown_when(vec![Condition::new(
                    "rating",
                    "greater_than_or_equal",
                    HAPPY_RATING,
                )]),
        )
        .with_question(
            Question::new("favorite_dish", QuestionType::Text, "Which dish was your favorite?")
                .shown_when(vec![
                    Condition::new("rating", "greater_than_or_equal", HAPPY_RATING),
                    Condition::new("liked", "contains", "Food"),
                ]),
        );

    let complaint = Section::new("complaint", "What went wrong", 2)
        .with_question(
            Question::new("issue", QuestionType::Dropdown, "What was the main problem?")
                .with_options(["Service", "Food", "Cleanliness", "Other"])
                .required(),
        )
        .with_question(
            Question::new("issue_details", QuestionType::Textarea, "Please describe it")
                .required()
                .shown_when(vec![Condition::new("issue", "equals", "Other")]),
        )
        .with_question(
            Question::new("callback", QuestionType::Email, "Email for a callback (optional)"),
        );

    let wrap_up = Section::new("wrap_up", "Wrap up", 3)
        .with_question(
            Question::new("recommend", QuestionType::Nps, "How likely are you to recommend us?")
                .with_validation(ValidationConfig {
                    min: Some(0.0),
                    max: Some(10.0),
                    ..Default::default()
                }),
        )
        .with_question(Question::new(
            "comments",
            QuestionType::Textarea,
            "Anything else?",
        ));

    Ok(SurveyDefinition::new(vec![about, visit, complaint, wrap_up])?
        .with_id("customer-feedback")
        .with_title("Customer feedback"))
}
