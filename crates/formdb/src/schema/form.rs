use crate::kind::EntityKind;
use formdb_core::{
    schema::{ColumnDef, ColumnDefault, EntitySchema},
    types::EntitySlug,
    value::FieldType,
};
use std::fmt;

///
/// FormStatus
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum FormStatus {
    #[default]
    Draft,
    Publish,
    Trash,
}

impl FormStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Publish => "publish",
            Self::Trash => "trash",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "draft" => Some(Self::Draft),
            "publish" => Some(Self::Publish),
            "trash" => Some(Self::Trash),
            _ => None,
        }
    }
}

impl fmt::Display for FormStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

///
/// FormSchema
///
/// Root of the hierarchy. Containers, submissions, and participants hang
/// off a form through their `form_id` columns.
///

pub struct FormSchema;

pub static FORM: FormSchema = FormSchema;

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", FieldType::Uint),
    ColumnDef::new("title", FieldType::Text),
    ColumnDef::new("slug", FieldType::Text),
    ColumnDef::new("status", FieldType::Text).with_default(ColumnDefault::Text("draft")),
    ColumnDef::new("author_id", FieldType::Uint),
    ColumnDef::new("timestamp", FieldType::Uint),
];

impl EntitySchema for FormSchema {
    fn slug(&self) -> EntitySlug {
        EntityKind::Form.slug()
    }

    fn table(&self) -> &'static str {
        "forms"
    }

    fn meta_table(&self) -> &'static str {
        "form_meta"
    }

    fn columns(&self) -> &'static [ColumnDef] {
        COLUMNS
    }

    fn orderable_columns(&self) -> &'static [&'static str] {
        &["id", "title", "timestamp"]
    }

    fn filterable_columns(&self) -> &'static [&'static str] {
        &["slug", "status", "author_id"]
    }

    fn title_column(&self) -> Option<&'static str> {
        Some("title")
    }

    fn author_column(&self) -> Option<&'static str> {
        Some("author_id")
    }

    fn status_column(&self) -> Option<&'static str> {
        Some("status")
    }

    fn single_key_meta(&self) -> &'static [&'static str] {
        &["redirect_url", "success_message"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_text() {
        for status in [FormStatus::Draft, FormStatus::Publish, FormStatus::Trash] {
            assert_eq!(FormStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(FormStatus::parse("pending"), None);
    }

    #[test]
    fn new_forms_default_to_draft() {
        let status = COLUMNS
            .iter()
            .find(|c| c.name == "status")
            .expect("status column");

        assert_eq!(
            status.default_value().as_str(),
            Some(FormStatus::Draft.as_str())
        );
    }
}
