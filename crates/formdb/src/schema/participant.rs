use crate::kind::EntityKind;
use formdb_core::{
    schema::{ColumnDef, EntitySchema, ParentLink},
    types::EntitySlug,
    value::FieldType,
};

///
/// ParticipantSchema
///
/// Membership row for restricted-access forms: which users may submit.
///

pub struct ParticipantSchema;

pub static PARTICIPANT: ParticipantSchema = ParticipantSchema;

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", FieldType::Uint),
    ColumnDef::new("form_id", FieldType::Uint),
    ColumnDef::new("user_id", FieldType::Uint),
];

const PARENTS: &[ParentLink] = &[ParentLink::new("form_id", EntityKind::Form.slug())];

impl EntitySchema for ParticipantSchema {
    fn slug(&self) -> EntitySlug {
        EntityKind::Participant.slug()
    }

    fn table(&self) -> &'static str {
        "participants"
    }

    fn meta_table(&self) -> &'static str {
        "participant_meta"
    }

    fn columns(&self) -> &'static [ColumnDef] {
        COLUMNS
    }

    fn parent_links(&self) -> &'static [ParentLink] {
        PARENTS
    }

    fn orderable_columns(&self) -> &'static [&'static str] {
        &["id", "user_id"]
    }

    fn filterable_columns(&self) -> &'static [&'static str] {
        &["form_id", "user_id"]
    }

    fn author_column(&self) -> Option<&'static str> {
        Some("user_id")
    }
}
