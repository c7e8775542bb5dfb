use survey_logic::{DefinitionError, SurveyDefinition};

/// The stored JSON of the health screening survey.
///
/// It was exported from an editor after the age question was deleted and
/// recreated, so the alcohol question still refers to the old id
/// (`stale-1`) and has to be recovered through its text snapshot.
pub const HEALTH_SCREENING_JSON: &str = include_str!("../fixtures/health_screening.json");

/// Load the health screening survey.
pub fn health_screening() -> Result<SurveyDefinition, DefinitionError> {
    SurveyDefinition::from_json(HEALTH_SCREENING_JSON)
}
