use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{AnswerValue, QuestionId, SectionId};

/// Comparison operator used by display-logic conditions and skip-logic rules.
///
/// Serialized as its snake_case name. Names the evaluator does not know are
/// kept as `Unknown` so a definition round-trips unchanged; they never match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    IsEmpty,
    IsNotEmpty,
    /// An operator name this evaluator does not understand (empty when missing).
    Unknown(String),
}

impl Default for Operator {
    fn default() -> Self {
        Self::Unknown(String::new())
    }
}

impl Operator {
    /// The wire name of the operator.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Equals => "equals",
            Self::NotEquals => "not_equals",
            Self::Contains => "contains",
            Self::NotContains => "not_contains",
            Self::GreaterThan => "greater_than",
            Self::LessThan => "less_than",
            Self::GreaterThanOrEqual => "greater_than_or_equal",
            Self::LessThanOrEqual => "less_than_or_equal",
            Self::IsEmpty => "is_empty",
            Self::IsNotEmpty => "is_not_empty",
            Self::Unknown(name) => name,
        }
    }

    /// Check if the operator is understood by the evaluator.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    /// Check if the operator may be used in a display-logic condition.
    ///
    /// Emptiness checks are skip-logic only.
    pub fn is_display_operator(&self) -> bool {
        self.is_known() && !matches!(self, Self::IsEmpty | Self::IsNotEmpty)
    }
}

impl From<String> for Operator {
    fn from(name: String) -> Self {
        match name.as_str() {
            "equals" => Self::Equals,
            "not_equals" => Self::NotEquals,
            "contains" => Self::Contains,
            "not_contains" => Self::NotContains,
            "greater_than" => Self::GreaterThan,
            "less_than" => Self::LessThan,
            "greater_than_or_equal" => Self::GreaterThanOrEqual,
            "less_than_or_equal" => Self::LessThanOrEqual,
            "is_empty" => Self::IsEmpty,
            "is_not_empty" => Self::IsNotEmpty,
            _ => Self::Unknown(name),
        }
    }
}

impl From<&str> for Operator {
    fn from(name: &str) -> Self {
        Self::from(name.to_string())
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.as_str().to_string()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One display-logic condition: "show when question X <operator> value".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// The question whose answer is tested.
    #[serde(default)]
    pub question_id: QuestionId,

    /// Snapshot of the referenced question's text, taken when the condition
    /// was authored. Used to recover a stale `question_id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_text: Option<String>,

    #[serde(default)]
    pub operator: Operator,

    #[serde(default)]
    pub value: Option<AnswerValue>,
}

impl Condition {
    /// Create a new condition.
    pub fn new(
        question_id: impl Into<QuestionId>,
        operator: impl Into<Operator>,
        value: impl Into<AnswerValue>,
    ) -> Self {
        Self {
            question_id: question_id.into(),
            question_text: None,
            operator: operator.into(),
            value: Some(value.into()),
        }
    }

    /// Attach the referenced question's text snapshot.
    pub fn with_question_text(mut self, text: impl Into<String>) -> Self {
        self.question_text = Some(text.into());
        self
    }

    /// The value to compare against; a missing value compares as empty text.
    pub fn expected(&self) -> AnswerValue {
        self.value
            .clone()
            .unwrap_or_else(|| AnswerValue::Text(String::new()))
    }
}

/// Conditional visibility of a question. All conditions must hold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayLogicConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub conditions: Vec<Condition>,
}

impl DisplayLogicConfig {
    /// Enabled display logic requiring all of the given conditions.
    pub fn all_of(conditions: Vec<Condition>) -> Self {
        Self {
            enabled: true,
            conditions,
        }
    }

    /// Check if the logic constrains visibility at all.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.conditions.is_empty()
    }
}

fn enabled_by_default() -> bool {
    true
}

/// One skip-logic rule: "after submit, if my answer <operator> value, jump".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkipRule {
    #[serde(default)]
    pub operator: Operator,

    #[serde(default)]
    pub value: Option<AnswerValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_section_id: Option<SectionId>,

    /// Question to focus once the target section is shown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_question_id: Option<QuestionId>,

    #[serde(default = "enabled_by_default")]
    pub enabled: bool,

    /// Explicit evaluation order within the question; lower runs first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
}

impl SkipRule {
    /// Create an enabled rule jumping to `target` when it matches.
    pub fn jump_to(
        target: impl Into<SectionId>,
        operator: impl Into<Operator>,
        value: impl Into<AnswerValue>,
    ) -> Self {
        Self {
            operator: operator.into(),
            value: Some(value.into()),
            target_section_id: Some(target.into()),
            target_question_id: None,
            enabled: true,
            priority: None,
        }
    }

    /// Focus a question in the target section after jumping.
    pub fn with_target_question(mut self, id: impl Into<QuestionId>) -> Self {
        self.target_question_id = Some(id.into());
        self
    }

    /// Set an explicit priority.
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Disable the rule.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// The target section, ignoring blank identifiers.
    pub fn target_section(&self) -> Option<&SectionId> {
        self.target_section_id.as_ref().filter(|id| !id.is_blank())
    }

    /// The target question, ignoring blank identifiers.
    pub fn target_question(&self) -> Option<&QuestionId> {
        self.target_question_id.as_ref().filter(|id| !id.is_blank())
    }

    /// The value to compare against; a missing value compares as empty text.
    pub fn expected(&self) -> AnswerValue {
        self.value
            .clone()
            .unwrap_or_else(|| AnswerValue::Text(String::new()))
    }
}

/// Conditional navigation after the question's section is submitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkipLogicConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub rules: Vec<SkipRule>,
}

impl SkipLogicConfig {
    /// Enabled skip logic with the given rules.
    pub fn new(rules: Vec<SkipRule>) -> Self {
        Self {
            enabled: true,
            rules,
        }
    }

    /// Rules in evaluation order: explicit priority ascending, then rules
    /// without a priority; ties keep their array position.
    pub fn ordered_rules(&self) -> Vec<&SkipRule> {
        let mut rules: Vec<&SkipRule> = self.rules.iter().collect();
        rules.sort_by_key(|rule| rule.priority.unwrap_or(u32::MAX));
        rules
    }
}

/// Answer constraints checked when a section is submitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_selections: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_selections: Option<usize>,

    /// Regular expression a text answer must match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Message shown instead of the generated one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// The optional capabilities attached to a question.
///
/// Each capability is a typed record; anything else found in the stored
/// config (appearance, per-type settings) is kept untouched in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_logic: Option<DisplayLogicConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_logic: Option<SkipLogicConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationConfig>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl QuestionConfig {
    /// Display logic, if present and active.
    pub fn active_display_logic(&self) -> Option<&DisplayLogicConfig> {
        self.display_logic.as_ref().filter(|logic| logic.is_active())
    }

    /// Skip logic, if present and enabled.
    pub fn active_skip_logic(&self) -> Option<&SkipLogicConfig> {
        self.skip_logic.as_ref().filter(|logic| logic.enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_names_round_trip() {
        for name in [
            "equals",
            "not_equals",
            "contains",
            "not_contains",
            "greater_than",
            "less_than",
            "greater_than_or_equal",
            "less_than_or_equal",
            "is_empty",
            "is_not_empty",
        ] {
            let op = Operator::from(name);
            assert!(op.is_known(), "{name}");
            assert_eq!(op.as_str(), name);
        }
    }

    #[test]
    fn unknown_operator_is_preserved() {
        let op: Operator = serde_json::from_str("\"starts_with\"").unwrap();
        assert_eq!(op, Operator::Unknown("starts_with".into()));
        assert_eq!(serde_json::to_string(&op).unwrap(), "\"starts_with\"");
    }

    #[test]
    fn emptiness_operators_are_not_display_operators() {
        assert!(Operator::Equals.is_display_operator());
        assert!(!Operator::IsEmpty.is_display_operator());
        assert!(!Operator::Unknown("x".into()).is_display_operator());
    }

    #[test]
    fn condition_reads_external_field_names() {
        let json = r#"{"questionId":"A","questionText":"Age?","operator":"equals","value":"Yes"}"#;
        let condition: Condition = serde_json::from_str(json).unwrap();
        assert_eq!(condition.question_id.as_str(), "A");
        assert_eq!(condition.question_text.as_deref(), Some("Age?"));
        assert_eq!(condition.operator, Operator::Equals);
    }

    #[test]
    fn skip_rule_defaults_to_enabled() {
        let rule: SkipRule =
            serde_json::from_str(r#"{"operator":"equals","value":"x","targetSectionId":"S2"}"#)
                .unwrap();
        assert!(rule.enabled);
        assert_eq!(rule.target_section().map(SectionId::as_str), Some("S2"));
    }

    #[test]
    fn blank_target_is_missing() {
        let rule: SkipRule =
            serde_json::from_str(r#"{"operator":"equals","targetSectionId":""}"#).unwrap();
        assert!(rule.target_section().is_none());
    }

    #[test]
    fn ordered_rules_respect_priority_then_position() {
        let logic = SkipLogicConfig::new(vec![
            SkipRule::jump_to("a", "equals", "1"),
            SkipRule::jump_to("b", "equals", "1").with_priority(2),
            SkipRule::jump_to("c", "equals", "1"),
            SkipRule::jump_to("d", "equals", "1").with_priority(1),
        ]);
        let order: Vec<_> = logic
            .ordered_rules()
            .iter()
            .filter_map(|rule| rule.target_section().map(|id| id.as_str().to_string()))
            .collect();
        assert_eq!(order, ["d", "b", "a", "c"]);
    }

    #[test]
    fn unknown_config_keys_are_kept() {
        let json = r#"{"displayLogic":{"enabled":false,"conditions":[]},"appearance":{"color":"red"}}"#;
        let config: QuestionConfig = serde_json::from_str(json).unwrap();
        assert!(config.extra.contains_key("appearance"));
        assert!(config.active_display_logic().is_none());
        let back = serde_json::to_value(&config).unwrap();
        assert_eq!(back["appearance"]["color"], "red");
    }
}
