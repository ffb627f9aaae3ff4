use crate::kind::EntityKind;
use formdb_core::{
    schema::{ColumnDef, ColumnDefault, EntitySchema, ParentLink},
    types::EntitySlug,
    value::FieldType,
};
use std::fmt;

///
/// SubmissionStatus
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SubmissionStatus {
    #[default]
    Completed,
    Progressing,
}

impl SubmissionStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Progressing => "progressing",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "completed" => Some(Self::Completed),
            "progressing" => Some(Self::Progressing),
            _ => None,
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

///
/// SubmissionSchema
///
/// One filled-in form. `user_id` is zero for anonymous submissions;
/// `cookie_key` ties progressing submissions back to their browser.
///

pub struct SubmissionSchema;

pub static SUBMISSION: SubmissionSchema = SubmissionSchema;

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", FieldType::Uint),
    ColumnDef::new("form_id", FieldType::Uint),
    ColumnDef::new("user_id", FieldType::Uint),
    ColumnDef::new("timestamp", FieldType::Uint),
    ColumnDef::new("remote_addr", FieldType::Text),
    ColumnDef::new("cookie_key", FieldType::Text),
    ColumnDef::new("status", FieldType::Text).with_default(ColumnDefault::Text("completed")),
];

const PARENTS: &[ParentLink] = &[ParentLink::new("form_id", EntityKind::Form.slug())];

impl EntitySchema for SubmissionSchema {
    fn slug(&self) -> EntitySlug {
        EntityKind::Submission.slug()
    }

    fn table(&self) -> &'static str {
        "submissions"
    }

    fn meta_table(&self) -> &'static str {
        "submission_meta"
    }

    fn columns(&self) -> &'static [ColumnDef] {
        COLUMNS
    }

    fn parent_links(&self) -> &'static [ParentLink] {
        PARENTS
    }

    fn orderable_columns(&self) -> &'static [&'static str] {
        &["id", "timestamp"]
    }

    fn filterable_columns(&self) -> &'static [&'static str] {
        &["form_id", "user_id", "status", "cookie_key"]
    }

    fn author_column(&self) -> Option<&'static str> {
        Some("user_id")
    }

    fn status_column(&self) -> Option<&'static str> {
        Some("status")
    }
}
