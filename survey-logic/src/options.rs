use serde::{Deserialize, Serialize};

/// How a display-logic condition with a stale question reference is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconciliationPolicy {
    /// Fall back to the condition's saved question text.
    #[default]
    TextSnapshot,

    /// Identifiers only; a stale reference never matches.
    Strict,
}

/// Evaluator settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorOptions {
    pub reconciliation: ReconciliationPolicy,

    /// Apply required/constraint checks to questions hidden by display logic.
    pub validate_hidden_questions: bool,
}

impl EvaluatorOptions {
    /// Options that resolve conditions by identifier only.
    pub fn strict() -> Self {
        Self {
            reconciliation: ReconciliationPolicy::Strict,
            ..Self::default()
        }
    }
}

/// Settings for driving a whole session with a `Respondent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerOptions {
    pub evaluator: EvaluatorOptions,

    /// Upper bound on section submits (including rejected ones). Skip logic
    /// may jump backwards, so a run is not otherwise guaranteed to end.
    pub max_steps: usize,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            evaluator: EvaluatorOptions::default(),
            max_steps: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_reconcile_by_text() {
        let options = EvaluatorOptions::default();
        assert_eq!(options.reconciliation, ReconciliationPolicy::TextSnapshot);
        assert!(!options.validate_hidden_questions);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let options: RunnerOptions =
            serde_json::from_str(r#"{"evaluator":{"reconciliation":"strict"}}"#).unwrap();
        assert_eq!(options.evaluator.reconciliation, ReconciliationPolicy::Strict);
        assert_eq!(options.max_steps, 1000);
    }
}
