use crate::kind::EntityKind;
use formdb_core::{
    schema::{BatchRef, ColumnDef, EntitySchema, ParentLink, RelatedFilter},
    types::EntitySlug,
    value::FieldType,
};

///
/// ElementSettingSchema
///
/// One named setting of an element. Some element types store another
/// element's id in `value` (conditional display, linked fields), so the
/// column is declared a batch ref: duplication rewrites it when the
/// referenced element was cloned in the same walk, and leaves plain
/// setting values alone.
///

pub struct ElementSettingSchema;

pub static ELEMENT_SETTING: ElementSettingSchema = ElementSettingSchema;

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", FieldType::Uint),
    ColumnDef::new("element_id", FieldType::Uint),
    ColumnDef::new("name", FieldType::Text),
    ColumnDef::new("value", FieldType::Text),
];

const PARENTS: &[ParentLink] = &[ParentLink::new("element_id", EntityKind::Element.slug())];
const REFS: &[BatchRef] = &[BatchRef::new("value", EntityKind::Element.slug())];

impl EntitySchema for ElementSettingSchema {
    fn slug(&self) -> EntitySlug {
        EntityKind::ElementSetting.slug()
    }

    fn table(&self) -> &'static str {
        "element_settings"
    }

    fn meta_table(&self) -> &'static str {
        "element_setting_meta"
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
        &["id", "name"]
    }

    fn filterable_columns(&self) -> &'static [&'static str] {
        &["element_id", "name"]
    }

    /// Filtering settings by container requires hopping through elements.
    fn related_filter(&self, field: &str) -> Option<RelatedFilter> {
        match field {
            "container_id" => Some(RelatedFilter::new("elements", "element_id", "id", "container_id")),
            _ => None,
        }
    }
}
