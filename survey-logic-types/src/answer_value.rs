use serde::{Deserialize, Serialize};

use crate::{AnswerShape, QuestionType};

/// A single answer value collected from a respondent.
///
/// This is the value stored in `Answers` for each answered question. On the
/// wire it is plain JSON: a boolean, a number, a string or an array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// A yes/no value.
    Bool(bool),

    /// A numeric value (number, rating, scale, slider questions).
    Number(f64),

    /// A text value (text, choice, date questions).
    Text(String),

    /// Several values (checkbox, multi-select, ranking questions).
    List(Vec<AnswerValue>),
}

impl AnswerValue {
    /// Stringify the value for equality and substring tests.
    ///
    /// Integral numbers print without a fractional part, infinities print as
    /// `Infinity` and lists are joined with commas. Numbers are always
    /// written in plain decimal notation, never with an exponent (`1e21`
    /// prints as `1000000000000000000000`).
    pub fn to_text(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => format_number(*n),
            Self::Text(s) => s.clone(),
            Self::List(items) => items
                .iter()
                .map(Self::to_text)
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// Coerce the value to a number (`Number(value)` semantics).
    ///
    /// Returns `NaN` when the value has no numeric reading.
    pub fn to_number(&self) -> f64 {
        match self {
            Self::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Number(n) => *n,
            Self::Text(s) => parse_number(s),
            Self::List(items) => match items.as_slice() {
                [] => 0.0,
                [single] => single.to_number(),
                _ => f64::NAN,
            },
        }
    }

    /// Check if the value counts as "no answer": blank text or an empty list.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Bool(_) | Self::Number(_) => false,
        }
    }

    /// Check if this is a list value.
    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as a list.
    pub fn as_list(&self) -> Option<&[AnswerValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Check if a list value includes an element whose text equals `needle`.
    ///
    /// Always `false` for scalar values.
    pub fn includes(&self, needle: &str) -> bool {
        match self {
            Self::List(items) => items.iter().any(|item| item.to_text() == needle),
            _ => false,
        }
    }

    /// Coerce the value into the shape a question type expects.
    ///
    /// Multi-valued questions wrap a scalar into a one-element list. Scalar
    /// and numeric answers are kept verbatim, so `"05"` still equals `"05"`;
    /// ordering operators read numbers through `to_number`. Returns `None`
    /// for question types the evaluator does not understand.
    pub fn coerce_for(&self, question_type: &QuestionType) -> Option<AnswerValue> {
        match question_type.shape() {
            AnswerShape::Unknown => None,
            AnswerShape::Multi => match self {
                Self::List(_) => Some(self.clone()),
                scalar => Some(Self::List(vec![scalar.clone()])),
            },
            AnswerShape::Numeric | AnswerShape::Scalar => Some(self.clone()),
        }
    }

    /// Get the type name of this value for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "Bool",
            Self::Number(_) => "Number",
            Self::Text(_) => "Text",
            Self::List(_) => "List",
        }
    }
}

fn format_number(n: f64) -> String {
    if n == f64::INFINITY {
        "Infinity".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        n.to_string()
    }
}

fn parse_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    // Rust accepts "inf" and "nan" spellings that a browser would reject.
    if trimmed.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

impl From<String> for AnswerValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for AnswerValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<f64> for AnswerValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for AnswerValue {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<i32> for AnswerValue {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<bool> for AnswerValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<&str>> for AnswerValue {
    fn from(items: Vec<&str>) -> Self {
        Self::List(items.into_iter().map(Self::from).collect())
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items.into_iter().map(Self::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_of_integral_number_has_no_fraction() {
        assert_eq!(AnswerValue::Number(5.0).to_text(), "5");
        assert_eq!(AnswerValue::Number(2.5).to_text(), "2.5");
    }

    #[test]
    fn text_of_list_is_comma_joined() {
        let value = AnswerValue::from(vec!["Red", "Blue"]);
        assert_eq!(value.to_text(), "Red,Blue");
    }

    #[test]
    fn numeric_coercion() {
        assert_eq!(AnswerValue::from(" 42 ").to_number(), 42.0);
        assert_eq!(AnswerValue::from("").to_number(), 0.0);
        assert_eq!(AnswerValue::from(true).to_number(), 1.0);
        assert!(AnswerValue::from("abc").to_number().is_nan());
        assert!(AnswerValue::from("nan").to_number().is_nan());
        assert_eq!(AnswerValue::from("1e3").to_number(), 1000.0);
        assert_eq!(AnswerValue::from(vec!["7"]).to_number(), 7.0);
        assert!(AnswerValue::from(vec!["1", "2"]).to_number().is_nan());
    }

    #[test]
    fn emptiness() {
        assert!(AnswerValue::from("   ").is_empty());
        assert!(AnswerValue::List(Vec::new()).is_empty());
        assert!(!AnswerValue::from(0).is_empty());
        assert!(!AnswerValue::from(false).is_empty());
    }

    #[test]
    fn untagged_json() {
        let value: AnswerValue = serde_json::from_str(r#"["Red", 3, true]"#).unwrap();
        assert_eq!(
            value,
            AnswerValue::List(vec![
                AnswerValue::from("Red"),
                AnswerValue::Number(3.0),
                AnswerValue::Bool(true),
            ])
        );
    }

    #[test]
    fn coerce_wraps_scalar_for_multi_questions() {
        let value = AnswerValue::from("Red");
        let coerced = value.coerce_for(&QuestionType::Checkbox).unwrap();
        assert!(coerced.includes("Red"));
    }

    #[test]
    fn coerce_keeps_numeric_text_verbatim() {
        let value = AnswerValue::from("05");
        assert_eq!(
            value.coerce_for(&QuestionType::Number),
            Some(AnswerValue::from("05"))
        );
        assert_eq!(
            AnswerValue::from("4.0").coerce_for(&QuestionType::Rating),
            Some(AnswerValue::from("4.0"))
        );
    }

    #[test]
    fn large_and_small_numbers_print_without_exponent() {
        assert_eq!(AnswerValue::Number(1e21).to_text(), "1000000000000000000000");
        assert_eq!(AnswerValue::Number(1e-7).to_text(), "0.0000001");
        assert_eq!(AnswerValue::Number(f64::NEG_INFINITY).to_text(), "-Infinity");
    }

    #[test]
    fn coerce_unknown_type_yields_nothing() {
        let value = AnswerValue::from("x");
        assert_eq!(
            value.coerce_for(&QuestionType::Other("hologram".into())),
            None
        );
    }
}
