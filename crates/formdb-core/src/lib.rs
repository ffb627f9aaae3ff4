//! Core runtime for formdb: typed values and rows, the schema contract,
//! row-store and cache substrates with in-memory reference
//! implementations, per-type managers with an explicit meta tier,
//! declarative queries, ordered collections, generation-counter cache
//! invalidation, and the two-pass duplication engine. The ergonomics are
//! exported via the `prelude`.

pub mod cache;
pub mod collection;
pub mod duplicate;
pub mod error;
pub mod manager;
pub mod model;
pub mod query;
pub mod registry;
pub mod row;
pub mod schema;
pub mod store;
pub mod types;
pub mod value;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::Error;

///
/// Prelude
///
/// Domain vocabulary only. Substrate contracts and engine internals are
/// imported from their modules when actually needed.
///

pub mod prelude {
    pub use crate::{
        collection::{Collection, FieldMode},
        duplicate::{DuplicationListener, DuplicationOutcome, TranslationTable},
        error::Error,
        manager::Manager,
        model::Model,
        query::{FilterValue, Limit, OrderBy, QueryArgs},
        registry::{Registry, RegistryBuilder},
        row::Row,
        schema::{BatchRef, ColumnDef, ColumnDefault, EntitySchema, ParentLink, RelatedFilter},
        types::{Direction, EntitySlug, Id},
        value::{FieldType, Value},
    };
}
