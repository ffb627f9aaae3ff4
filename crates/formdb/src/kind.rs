use crate::schema;
use formdb_core::{schema::EntitySchema, types::EntitySlug};
use std::fmt;

///
/// EntityKind
///
/// One variant per entity type. The registry itself is keyed by slug; this
/// enum is the typed handle domain code uses to reach slugs and schema
/// singletons without spelling strings.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum EntityKind {
    Form,
    Container,
    Element,
    ElementSetting,
    ElementChoice,
    Submission,
    SubmissionValue,
    Participant,
}

impl EntityKind {
    pub const ALL: [Self; 8] = [
        Self::Form,
        Self::Container,
        Self::Element,
        Self::ElementSetting,
        Self::ElementChoice,
        Self::Submission,
        Self::SubmissionValue,
        Self::Participant,
    ];

    #[must_use]
    pub const fn slug(self) -> EntitySlug {
        EntitySlug::new(match self {
            Self::Form => "form",
            Self::Container => "container",
            Self::Element => "element",
            Self::ElementSetting => "element_setting",
            Self::ElementChoice => "element_choice",
            Self::Submission => "submission",
            Self::SubmissionValue => "submission_value",
            Self::Participant => "participant",
        })
    }

    /// Schema singleton for this kind.
    #[must_use]
    pub fn schema(self) -> &'static dyn EntitySchema {
        match self {
            Self::Form => &schema::FORM,
            Self::Container => &schema::CONTAINER,
            Self::Element => &schema::ELEMENT,
            Self::ElementSetting => &schema::ELEMENT_SETTING,
            Self::ElementChoice => &schema::ELEMENT_CHOICE,
            Self::Submission => &schema::SUBMISSION,
            Self::SubmissionValue => &schema::SUBMISSION_VALUE,
            Self::Participant => &schema::PARTICIPANT,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}
