//! Operator semantics shared by display logic and skip logic.
//!
//! Values are compared the way the authoring front end compares them:
//! list answers (checkbox, multi-select) test membership, scalar answers are
//! stringified for equality and substring tests, and ordering operators
//! coerce both sides to numbers.

use survey_logic_types::{AnswerValue, Operator};

/// Evaluate `answer <operator> expected`.
///
/// An absent answer only satisfies `is_empty`. Unknown operators never match.
pub fn evaluate(operator: &Operator, answer: Option<&AnswerValue>, expected: &AnswerValue) -> bool {
    match operator {
        Operator::IsEmpty => answer.is_none_or(AnswerValue::is_empty),
        Operator::IsNotEmpty => answer.is_some_and(|value| !value.is_empty()),
        Operator::Unknown(_) => false,
        _ => match answer {
            Some(value) => compare(operator, value, expected),
            None => false,
        },
    }
}

fn compare(operator: &Operator, answer: &AnswerValue, expected: &AnswerValue) -> bool {
    match operator {
        Operator::Equals => equals(answer, expected),
        Operator::NotEquals => !equals(answer, expected),
        Operator::Contains => contains(answer, expected),
        Operator::NotContains => !contains(answer, expected),
        Operator::GreaterThan => answer.to_number() > expected.to_number(),
        Operator::LessThan => answer.to_number() < expected.to_number(),
        Operator::GreaterThanOrEqual => answer.to_number() >= expected.to_number(),
        Operator::LessThanOrEqual => answer.to_number() <= expected.to_number(),
        Operator::IsEmpty => answer.is_empty(),
        Operator::IsNotEmpty => !answer.is_empty(),
        Operator::Unknown(_) => false,
    }
}

fn equals(answer: &AnswerValue, expected: &AnswerValue) -> bool {
    let expected = expected.to_text();
    if answer.is_list() {
        answer.includes(&expected)
    } else {
        answer.to_text() == expected
    }
}

fn contains(answer: &AnswerValue, expected: &AnswerValue) -> bool {
    let expected = expected.to_text();
    if answer.is_list() {
        answer.includes(&expected)
    } else {
        answer.to_text().contains(&expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(op: &str, answer: impl Into<AnswerValue>, expected: impl Into<AnswerValue>) -> bool {
        evaluate(
            &Operator::from(op),
            Some(&answer.into()),
            &expected.into(),
        )
    }

    #[test]
    fn equals_is_strict_text_equality() {
        assert!(eval("equals", "Yes", "Yes"));
        assert!(!eval("equals", "yes", "Yes"));
        assert!(!eval("equals", "Yes ", "Yes"));
        assert!(eval("equals", 5, "5"));
        assert!(eval("equals", true, "true"));
    }

    #[test]
    fn equals_on_list_tests_membership() {
        assert!(eval("equals", vec!["Red", "Blue"], "Red"));
        assert!(!eval("equals", vec!["Red", "Blue"], "Green"));
        assert!(eval("not_equals", vec!["Red", "Blue"], "Green"));
    }

    #[test]
    fn contains_on_list_and_scalar() {
        assert!(eval("contains", vec!["Red", "Blue"], "Red"));
        assert!(!eval("contains", vec!["Redwood"], "Red"));
        assert!(eval("contains", "I like Red things", "Red"));
        assert!(eval("not_contains", "blue", "Red"));
    }

    #[test]
    fn ordering_coerces_to_numbers() {
        assert!(eval("greater_than", "5", "3"));
        assert!(!eval("greater_than", "3", "3"));
        assert!(eval("greater_than_or_equal", "3", "3"));
        assert!(eval("less_than", 2, "10"));
        assert!(eval("less_than_or_equal", 2.5, 2.5));
        // "10" > "9" numerically, not lexically
        assert!(eval("greater_than", "10", "9"));
    }

    #[test]
    fn ordering_with_non_numbers_never_matches() {
        assert!(!eval("greater_than", "abc", "3"));
        assert!(!eval("less_than", "abc", "3"));
        assert!(!eval("greater_than", vec!["1", "2"], "0"));
    }

    #[test]
    fn emptiness() {
        let expected = AnswerValue::from("");
        assert!(evaluate(&Operator::IsEmpty, None, &expected));
        assert!(evaluate(&Operator::IsEmpty, Some(&"  ".into()), &expected));
        assert!(!evaluate(&Operator::IsNotEmpty, None, &expected));
        assert!(evaluate(&Operator::IsNotEmpty, Some(&"x".into()), &expected));
    }

    #[test]
    fn absent_answer_fails_comparisons() {
        let expected = AnswerValue::from("Yes");
        assert!(!evaluate(&Operator::Equals, None, &expected));
        assert!(!evaluate(&Operator::NotEquals, None, &expected));
    }

    #[test]
    fn unknown_operator_never_matches() {
        assert!(!eval("starts_with", "Yes", "Y"));
        assert!(!eval("", "Yes", "Yes"));
    }
}
