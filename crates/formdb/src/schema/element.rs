use crate::kind::EntityKind;
use formdb_core::{
    schema::{ColumnDef, EntitySchema, ParentLink, RelatedFilter},
    types::EntitySlug,
    value::FieldType,
};

///
/// ElementSchema
///
/// One field of a form. `type` is the element-type slug (textfield,
/// dropdown, ...); rendering and validation for it live with the host.
///

pub struct ElementSchema;

pub static ELEMENT: ElementSchema = ElementSchema;

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", FieldType::Uint),
    ColumnDef::new("container_id", FieldType::Uint),
    ColumnDef::new("label", FieldType::Text),
    ColumnDef::new("sort", FieldType::Int),
    ColumnDef::new("type", FieldType::Text),
];

const PARENTS: &[ParentLink] = &[ParentLink::new("container_id", EntityKind::Container.slug())];

impl EntitySchema for ElementSchema {
    fn slug(&self) -> EntitySlug {
        EntityKind::Element.slug()
    }

    fn table(&self) -> &'static str {
        "elements"
    }

    fn meta_table(&self) -> &'static str {
        "element_meta"
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
        &["id", "label", "sort"]
    }

    fn filterable_columns(&self) -> &'static [&'static str] {
        &["container_id", "label", "type"]
    }

    /// Filtering elements by form requires hopping through containers.
    fn related_filter(&self, field: &str) -> Option<RelatedFilter> {
        match field {
            "form_id" => Some(RelatedFilter::new("containers", "container_id", "id", "form_id")),
            _ => None,
        }
    }

    fn title_column(&self) -> Option<&'static str> {
        Some("label")
    }

    fn type_column(&self) -> Option<&'static str> {
        Some("type")
    }
}
