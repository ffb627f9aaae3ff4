use crate::kind::EntityKind;
use formdb_core::{
    schema::{BatchRef, ColumnDef, EntitySchema, ParentLink, RelatedFilter},
    types::EntitySlug,
    value::FieldType,
};

///
/// SubmissionValueSchema
///
/// One answered field of a submission. `element_id` points across the
/// hierarchy at the element that was answered; during duplication it is a
/// batch ref, rewritten to the cloned element when the whole form was
/// copied, and left alone when only the submission subtree was.
///

pub struct SubmissionValueSchema;

pub static SUBMISSION_VALUE: SubmissionValueSchema = SubmissionValueSchema;

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", FieldType::Uint),
    ColumnDef::new("submission_id", FieldType::Uint),
    ColumnDef::new("element_id", FieldType::Uint),
    ColumnDef::new("field", FieldType::Text),
    ColumnDef::new("value", FieldType::Text),
];

const PARENTS: &[ParentLink] = &[ParentLink::new("submission_id", EntityKind::Submission.slug())];
const REFS: &[BatchRef] = &[BatchRef::new("element_id", EntityKind::Element.slug())];

impl EntitySchema for SubmissionValueSchema {
    fn slug(&self) -> EntitySlug {
        EntityKind::SubmissionValue.slug()
    }

    fn table(&self) -> &'static str {
        "submission_values"
    }

    fn meta_table(&self) -> &'static str {
        "submission_value_meta"
    }

    fn columns(&self) -> &'static [ColumnDef] {
        COLUMNS
    }

    fn parent_links(&self) -> &'static [ParentLink] {
        PARENTS
    }

    fn batch_refs(&self) -> &'static [BatchRef] {
        REFS
    }

    fn orderable_columns(&self) -> &'static [&'static str] {
        &["id", "field"]
    }

    fn filterable_columns(&self) -> &'static [&'static str] {
        &["submission_id", "element_id", "field"]
    }

    /// Filtering values by form requires hopping through submissions.
    fn related_filter(&self, field: &str) -> Option<RelatedFilter> {
        match field {
            "form_id" => Some(RelatedFilter::new("submissions", "submission_id", "id", "form_id")),
            _ => None,
        }
    }
}
