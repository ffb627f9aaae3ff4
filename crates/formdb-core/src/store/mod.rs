mod memory;

pub use memory::MemoryRowStore;

use crate::{
    row::Row,
    types::{Direction, Id},
    value::Value,
};
use thiserror::Error as ThisError;

///
/// StoreError
///

#[derive(Debug, ThisError)]
pub enum StoreError {
    #[error("row {id} not found in table '{table}'")]
    RowNotFound { table: String, id: Id },

    #[error("store rejected the write on '{table}': {reason}")]
    Rejected { table: String, reason: String },

    #[error("store unavailable: {reason}")]
    Unavailable { reason: String },
}

impl StoreError {
    #[must_use]
    pub const fn is_row_not_found(&self) -> bool {
        matches!(self, Self::RowNotFound { .. })
    }
}

///
/// WhereClause
///

#[derive(Clone, Debug, PartialEq)]
pub enum WhereClause {
    /// Exact match on one column.
    Eq(String, Value),
    /// Membership in a value list.
    In(String, Vec<Value>),
}

impl WhereClause {
    #[must_use]
    pub fn column(&self) -> &str {
        match self {
            Self::Eq(column, _) | Self::In(column, _) => column,
        }
    }

    #[must_use]
    pub fn matches(&self, row: &Row) -> bool {
        match self {
            Self::Eq(column, value) => row.get(column) == Some(value),
            Self::In(column, values) => row.get(column).is_some_and(|v| values.contains(v)),
        }
    }
}

///
/// Join
///
/// Single-hop inner join: a base row survives when some row of `table`
/// matches `foreign_column = base.local_column` and satisfies `wheres`.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Join {
    pub table: String,
    pub local_column: String,
    pub foreign_column: String,
    pub wheres: Vec<WhereClause>,
}

///
/// OrderSpec
///

#[derive(Clone, Debug, PartialEq)]
pub enum OrderSpec {
    /// Sort by columns in sequence.
    Columns(Vec<(String, Direction)>),
    /// Follow a caller-supplied id sequence exactly.
    IdList(Vec<Id>),
}

impl Default for OrderSpec {
    fn default() -> Self {
        Self::Columns(Vec::new())
    }
}

///
/// SelectCriteria
///
/// Compiled request against one table. The query module is the only place
/// these are constructed; stores only evaluate them.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectCriteria {
    pub wheres: Vec<WhereClause>,
    pub joins: Vec<Join>,
    pub order: OrderSpec,
    /// `None` means unlimited.
    pub limit: Option<u64>,
    pub offset: u64,
}

///
/// Selection
///
/// One page of rows plus the unpaginated match count.
///

#[derive(Clone, Debug, Default)]
pub struct Selection {
    pub rows: Vec<Row>,
    pub total: u64,
}

///
/// RowStore
///
/// Blocking, table-scoped row contract the runtime persists through.
/// Inserts assign the primary key; the reference implementation
/// materializes it under the `id` column. Host adapters whose tables name
/// their keys differently translate in their own layer.
///

pub trait RowStore: Send + Sync {
    fn insert(&self, table: &str, row: &Row) -> Result<Id, StoreError>;

    /// Overlay the given columns onto an existing row.
    fn update(&self, table: &str, id: Id, row: &Row) -> Result<(), StoreError>;

    fn delete(&self, table: &str, id: Id) -> Result<(), StoreError>;

    fn select(&self, table: &str, criteria: &SelectCriteria) -> Result<Selection, StoreError>;
}
