//! The form-domain entity schemas. Hierarchy: a form owns containers,
//! submissions, and participants; a container owns elements; an element
//! owns its settings and choices; a submission owns its values.

mod container;
mod element;
mod element_choice;
mod element_setting;
mod form;
mod participant;
mod submission;
mod submission_value;

pub use container::{CONTAINER, ContainerSchema};
pub use element::{ELEMENT, ElementSchema};
pub use element_choice::{ELEMENT_CHOICE, ElementChoiceSchema};
pub use element_setting::{ELEMENT_SETTING, ElementSettingSchema};
pub use form::{FORM, FormSchema, FormStatus};
pub use participant::{PARTICIPANT, ParticipantSchema};
pub use submission::{SUBMISSION, SubmissionSchema, SubmissionStatus};
pub use submission_value::{SUBMISSION_VALUE, SubmissionValueSchema};
