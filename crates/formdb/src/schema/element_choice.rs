use crate::kind::EntityKind;
use formdb_core::{
    schema::{ColumnDef, EntitySchema, ParentLink, RelatedFilter},
    types::EntitySlug,
    value::FieldType,
};

///
/// ElementChoiceSchema
///
/// One selectable option of a choice-typed element, ordered by `sort`.
///

pub struct ElementChoiceSchema;

pub static ELEMENT_CHOICE: ElementChoiceSchema = ElementChoiceSchema;

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", FieldType::Uint),
    ColumnDef::new("element_id", FieldType::Uint),
    ColumnDef::new("field", FieldType::Text),
    ColumnDef::new("value", FieldType::Text),
    ColumnDef::new("sort", FieldType::Int),
];

const PARENTS: &[ParentLink] = &[ParentLink::new("element_id", EntityKind::Element.slug())];

impl EntitySchema for ElementChoiceSchema {
    fn slug(&self) -> EntitySlug {
        EntityKind::ElementChoice.slug()
    }

    fn table(&self) -> &'static str {
        "element_choices"
    }

    fn meta_table(&self) -> &'static str {
        "element_choice_meta"
    }

    fn columns(&self) -> &'static [ColumnDef] {
        COLUMNS
    }

    fn sort_column(&self) -> Option<&'static str> {
        Some("sort")
    }

    fn parent_links(&self) -> &'static [ParentLink] {
        PARENTS
    }

    fn orderable_columns(&self) -> &'static [&'static str] {
        &["id", "field", "sort"]
    }

    fn filterable_columns(&self) -> &'static [&'static str] {
        &["element_id", "field"]
    }

    fn related_filter(&self, field: &str) -> Option<RelatedFilter> {
        match field {
            "container_id" => Some(RelatedFilter::new("elements", "element_id", "id", "container_id")),
            _ => None,
        }
    }
}
