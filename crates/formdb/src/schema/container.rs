use crate::kind::EntityKind;
use formdb_core::{
    schema::{ColumnDef, EntitySchema, ParentLink},
    types::EntitySlug,
    value::FieldType,
};

///
/// ContainerSchema
///
/// One page/step of a form. Ordered by its `sort` column within the form.
///

pub struct ContainerSchema;

pub static CONTAINER: ContainerSchema = ContainerSchema;

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", FieldType::Uint),
    ColumnDef::new("form_id", FieldType::Uint),
    ColumnDef::new("label", FieldType::Text),
    ColumnDef::new("sort", FieldType::Int),
];

const PARENTS: &[ParentLink] = &[ParentLink::new("form_id", EntityKind::Form.slug())];

impl EntitySchema for ContainerSchema {
    fn slug(&self) -> EntitySlug {
        EntityKind::Container.slug()
    }

    fn table(&self) -> &'static str {
        "containers"
    }

    fn meta_table(&self) -> &'static str {
        "container_meta"
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
        &["form_id", "label"]
    }

    fn title_column(&self) -> Option<&'static str> {
        Some("label")
    }
}
