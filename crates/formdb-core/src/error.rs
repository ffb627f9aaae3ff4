use crate::{
    duplicate::TranslationTable,
    model::ModelError,
    registry::RegistryError,
    store::StoreError,
    types::{EntitySlug, Id},
};
use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
///
/// Runtime error surface. Store failures arrive typed per operation; cache
/// failures never appear here — reads degrade to store lookups and writes
/// are dropped, because the cache is a performance layer, not a
/// correctness dependency.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("{slug} {id} not found")]
    NotFound { slug: EntitySlug, id: Id },

    #[error("insert into '{table}' failed: {source}")]
    Insert {
        table: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("update of '{table}' row {id} failed: {source}")]
    Update {
        table: &'static str,
        id: Id,
        #[source]
        source: StoreError,
    },

    #[error("delete of '{table}' row {id} failed: {source}")]
    Delete {
        table: &'static str,
        id: Id,
        #[source]
        source: StoreError,
    },

    #[error("select on '{table}' failed: {source}")]
    Select {
        table: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("invalid filter '{field}': {reason}")]
    InvalidFilter { field: String, reason: String },

    /// The walk stopped at the failing node; everything cloned before it is
    /// a valid, addressable entity, and the carried table says what exists.
    #[error("duplication aborted after partial clone: {source}")]
    DuplicationPartial {
        #[source]
        source: Box<Error>,
        translations: TranslationTable,
    },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl Error {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::NotFound { .. } => ErrorClass::NotFound,
            Self::Insert { source, .. }
            | Self::Update { source, .. }
            | Self::Delete { source, .. }
            | Self::Select { source, .. } => {
                if source.is_row_not_found() {
                    ErrorClass::NotFound
                } else {
                    ErrorClass::Internal
                }
            }
            Self::InvalidFilter { .. } | Self::Model(_) => ErrorClass::Unsupported,
            Self::DuplicationPartial { .. } => ErrorClass::Internal,
            Self::Registry(err) => err.class(),
        }
    }

    #[must_use]
    pub const fn origin(&self) -> ErrorOrigin {
        match self {
            Self::NotFound { .. } | Self::Model(_) | Self::Registry(_) => ErrorOrigin::Manager,
            Self::Insert { .. } | Self::Update { .. } | Self::Delete { .. } | Self::Select { .. } => {
                ErrorOrigin::Store
            }
            Self::InvalidFilter { .. } => ErrorOrigin::Query,
            Self::DuplicationPartial { .. } => ErrorOrigin::Duplicate,
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.class(), ErrorClass::NotFound)
    }

    /// Translation table accumulated before a duplication failure.
    #[must_use]
    pub const fn partial_translations(&self) -> Option<&TranslationTable> {
        match self {
            Self::DuplicationPartial { translations, .. } => Some(translations),
            _ => None,
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin(), self.class(), self)
    }
}

///
/// ErrorClass
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    NotFound,
    Conflict,
    Unsupported,
    Internal,
    InvariantViolation,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Unsupported => "unsupported",
            Self::Internal => "internal",
            Self::InvariantViolation => "invariant_violation",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Store,
    Cache,
    Query,
    Manager,
    Duplicate,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Store => "store",
            Self::Cache => "cache",
            Self::Query => "query",
            Self::Manager => "manager",
            Self::Duplicate => "duplicate",
        };
        write!(f, "{label}")
    }
}
