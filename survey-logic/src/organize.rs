//! Reordering of sections and questions in an authoring session.
//!
//! Every operation leaves `order_num` equal to the section position so the
//! definition stays in navigation order when it is saved and reloaded.

use log::debug;
use survey_logic_types::{QuestionId, SectionId, SurveyDefinition};

use crate::OrganizeError;

/// Move the section at `from` to position `to`.
pub fn move_section(
    definition: &mut SurveyDefinition,
    from: usize,
    to: usize,
) -> Result<(), OrganizeError> {
    let sections = definition.sections_mut();
    let len = sections.len();
    for index in [from, to] {
        if index >= len {
            return Err(OrganizeError::SectionOutOfRange { index, len });
        }
    }
    let section = sections.remove(from);
    debug!("Moving section '{}' from {from} to {to}", section.id);
    sections.insert(to, section);
    renumber(definition);
    Ok(())
}

/// Move a question within its section.
pub fn move_question(
    definition: &mut SurveyDefinition,
    section_id: &SectionId,
    from: usize,
    to: usize,
) -> Result<(), OrganizeError> {
    let index = definition
        .section_index(section_id)
        .ok_or_else(|| OrganizeError::UnknownSection(section_id.clone()))?;
    let section = &mut definition.sections_mut()[index];
    let len = section.questions.len();
    for index in [from, to] {
        if index >= len {
            return Err(OrganizeError::QuestionOutOfRange {
                section: section_id.clone(),
                index,
                len,
            });
        }
    }
    let question = section.questions.remove(from);
    section.questions.insert(to, question);
    Ok(())
}

/// Move a question to another section, inserting it at `index`.
///
/// `index` may equal the target's length to append. Conditions and skip rules
/// referring to the question keep working since its id does not change.
pub fn transfer_question(
    definition: &mut SurveyDefinition,
    question_id: &QuestionId,
    target: &SectionId,
    index: usize,
) -> Result<(), OrganizeError> {
    let (si, qi) = definition
        .locate(question_id)
        .ok_or_else(|| OrganizeError::UnknownQuestion(question_id.clone()))?;
    let ti = definition
        .section_index(target)
        .ok_or_else(|| OrganizeError::UnknownSection(target.clone()))?;

    let sections = definition.sections_mut();
    // Within one section the question is removed first, so the last valid
    // slot is one less.
    let len = sections[ti].questions.len() - usize::from(si == ti);
    if index > len {
        return Err(OrganizeError::QuestionOutOfRange {
            section: target.clone(),
            index,
            len,
        });
    }

    let question = sections[si].questions.remove(qi);
    debug!(
        "Transferring question '{}' from '{}' to '{}' at {index}",
        question.id, sections[si].id, target
    );
    sections[ti].questions.insert(index, question);
    Ok(())
}

/// Set every section's `order_num` to its position.
pub fn renumber(definition: &mut SurveyDefinition) {
    for (position, section) in definition.sections_mut().iter_mut().enumerate() {
        section.order_num = position as i64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_logic_types::{Question, QuestionType, Section};

    fn definition() -> SurveyDefinition {
        SurveyDefinition::new(vec![
            Section::new("a", "A", 10)
                .with_question(Question::new("a1", QuestionType::Text, "A1"))
                .with_question(Question::new("a2", QuestionType::Text, "A2"))
                .with_question(Question::new("a3", QuestionType::Text, "A3")),
            Section::new("b", "B", 20).with_question(Question::new("b1", QuestionType::Text, "B1")),
            Section::new("c", "C", 30),
        ])
        .unwrap()
    }

    fn section_ids(definition: &SurveyDefinition) -> Vec<&str> {
        definition.sections().iter().map(|s| s.id.as_str()).collect()
    }

    fn question_ids(definition: &SurveyDefinition, section: usize) -> Vec<&str> {
        definition.sections()[section]
            .questions
            .iter()
            .map(|q| q.id.as_str())
            .collect()
    }

    #[test]
    fn move_section_renumbers() {
        let mut definition = definition();
        move_section(&mut definition, 2, 0).unwrap();
        assert_eq!(section_ids(&definition), ["c", "a", "b"]);
        let orders: Vec<i64> = definition.sections().iter().map(|s| s.order_num).collect();
        assert_eq!(orders, [0, 1, 2]);
    }

    #[test]
    fn move_section_out_of_range() {
        let mut definition = definition();
        assert_eq!(
            move_section(&mut definition, 0, 3),
            Err(OrganizeError::SectionOutOfRange { index: 3, len: 3 })
        );
        assert_eq!(section_ids(&definition), ["a", "b", "c"]);
    }

    #[test]
    fn move_question_within_section() {
        let mut definition = definition();
        move_question(&mut definition, &"a".into(), 0, 2).unwrap();
        assert_eq!(question_ids(&definition, 0), ["a2", "a3", "a1"]);
        assert!(matches!(
            move_question(&mut definition, &"zzz".into(), 0, 1),
            Err(OrganizeError::UnknownSection(_))
        ));
        assert!(matches!(
            move_question(&mut definition, &"b".into(), 0, 1),
            Err(OrganizeError::QuestionOutOfRange { index: 1, len: 1, .. })
        ));
    }

    #[test]
    fn transfer_between_sections() {
        let mut definition = definition();
        transfer_question(&mut definition, &"a2".into(), &"c".into(), 0).unwrap();
        assert_eq!(question_ids(&definition, 0), ["a1", "a3"]);
        assert_eq!(question_ids(&definition, 2), ["a2"]);

        transfer_question(&mut definition, &"b1".into(), &"c".into(), 1).unwrap();
        assert_eq!(question_ids(&definition, 2), ["a2", "b1"]);
        assert!(definition.check().is_ok());
    }

    #[test]
    fn transfer_within_section_bounds() {
        let mut definition = definition();
        assert!(transfer_question(&mut definition, &"a1".into(), &"a".into(), 3).is_err());
        transfer_question(&mut definition, &"a1".into(), &"a".into(), 2).unwrap();
        assert_eq!(question_ids(&definition, 0), ["a2", "a3", "a1"]);
    }

    #[test]
    fn transfer_unknown_ids() {
        let mut definition = definition();
        assert_eq!(
            transfer_question(&mut definition, &"nope".into(), &"a".into(), 0),
            Err(OrganizeError::UnknownQuestion("nope".into()))
        );
        assert_eq!(
            transfer_question(&mut definition, &"a1".into(), &"nope".into(), 0),
            Err(OrganizeError::UnknownSection("nope".into()))
        );
    }
}
