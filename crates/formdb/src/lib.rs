//! formdb — entity persistence and duplication for form content.
//!
//! ## Crate layout
//! - `core`: runtime data model, managers, queries, collections, caching,
//!   and the duplication engine.
//! - `schema`: the form-domain entity types built on the core — forms,
//!   containers, elements, element settings/choices, submissions,
//!   submission values, and participants.
//!
//! `open` builds a fully wired registry over a row store and a cache
//! service; the `prelude` mirrors the surface embedding hosts use.

pub use formdb_core as core;

mod connect;
mod kind;

pub mod schema;

pub use connect::open;
pub use formdb_core::Error;
pub use kind::EntityKind;

///
/// Consts
///

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///

pub mod prelude {
    pub use crate::{EntityKind, VERSION, open};
    pub use formdb_core::{
        cache::{CacheService, MemoryCache},
        collection::{Collection, FieldMode},
        duplicate::{DuplicationListener, DuplicationOutcome, TranslationTable},
        error::Error,
        manager::Manager,
        model::Model,
        query::{FilterValue, Limit, OrderBy, QueryArgs},
        registry::Registry,
        row::Row,
        store::{MemoryRowStore, RowStore},
        types::{Direction, EntitySlug, Id},
        value::Value,
    };
}
