use crate::{
    types::{Direction, EntitySlug},
    value::{FieldType, Value},
};
use thiserror::Error as ThisError;

///
/// ColumnDef
///
/// One declared column: name, type, and the default a freshly created
/// model starts with.
///

#[derive(Clone, Copy, Debug)]
pub struct ColumnDef {
    pub name: &'static str,
    pub ty: FieldType,
    pub default: ColumnDefault,
}

impl ColumnDef {
    #[must_use]
    pub const fn new(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            default: ColumnDefault::Auto,
        }
    }

    #[must_use]
    pub const fn with_default(mut self, default: ColumnDefault) -> Self {
        self.default = default;
        self
    }

    /// Default cell value for a freshly created model.
    #[must_use]
    pub fn default_value(&self) -> Value {
        match self.default {
            ColumnDefault::Auto => self.ty.zero(),
            ColumnDefault::Bool(v) => Value::Bool(v),
            ColumnDefault::Int(v) => Value::Int(v),
            ColumnDefault::Uint(v) => Value::Uint(v),
            ColumnDefault::Text(v) => Value::Text(v.to_string()),
        }
    }

    /// Check a candidate value against the column type, admitting the
    /// sign-compatible integer coercions.
    pub fn admit(&self, value: Value) -> Result<Value, ColumnTypeError> {
        let found = value.kind_name();
        let admitted = match (self.ty, value) {
            (FieldType::Bool, v @ Value::Bool(_))
            | (FieldType::Int, v @ Value::Int(_))
            | (FieldType::Uint, v @ Value::Uint(_))
            | (FieldType::Text, v @ Value::Text(_)) => v,
            (FieldType::Uint, Value::Int(i)) => match u64::try_from(i) {
                Ok(u) => Value::Uint(u),
                Err(_) => return Err(self.type_error(found)),
            },
            (FieldType::Int, Value::Uint(u)) => match i64::try_from(u) {
                Ok(i) => Value::Int(i),
                Err(_) => return Err(self.type_error(found)),
            },
            _ => return Err(self.type_error(found)),
        };

        Ok(admitted)
    }

    const fn type_error(&self, found: &'static str) -> ColumnTypeError {
        ColumnTypeError {
            column: self.name,
            expected: self.ty,
            found,
        }
    }
}

///
/// ColumnDefault
///

#[derive(Clone, Copy, Debug)]
pub enum ColumnDefault {
    /// Typed zero: 0, empty string, false.
    Auto,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Text(&'static str),
}

///
/// ColumnTypeError
///

#[derive(Debug, ThisError)]
#[error("column '{column}' expects {expected}, got {found}")]
pub struct ColumnTypeError {
    pub column: &'static str,
    pub expected: FieldType,
    pub found: &'static str,
}

///
/// ParentLink
///
/// Column on a child type holding its parent's primary key. These are
/// traversal metadata for cascade delete and duplication, not enforced
/// store constraints.
///

#[derive(Clone, Copy, Debug)]
pub struct ParentLink {
    pub column: &'static str,
    pub parent: EntitySlug,
}

impl ParentLink {
    #[must_use]
    pub const fn new(column: &'static str, parent: EntitySlug) -> Self {
        Self { column, parent }
    }
}

///
/// BatchRef
///
/// Column that may reference another entity cloned in the same duplication
/// walk (a sibling or a cousin type). Pass 2 of the engine rewrites these
/// when the old value resolves inside the walk's translation table.
///

#[derive(Clone, Copy, Debug)]
pub struct BatchRef {
    pub column: &'static str,
    pub target: EntitySlug,
}

impl BatchRef {
    #[must_use]
    pub const fn new(column: &'static str, target: EntitySlug) -> Self {
        Self { column, target }
    }
}

///
/// RelatedFilter
///
/// How a filter field living on a related table is reached: join
/// `through_table` on `local_column = through_key` and apply the filter to
/// `through_column` there.
///

#[derive(Clone, Copy, Debug)]
pub struct RelatedFilter {
    pub through_table: &'static str,
    pub local_column: &'static str,
    pub through_key: &'static str,
    pub through_column: &'static str,
}

impl RelatedFilter {
    #[must_use]
    pub const fn new(
        through_table: &'static str,
        local_column: &'static str,
        through_key: &'static str,
        through_column: &'static str,
    ) -> Self {
        Self {
            through_table,
            local_column,
            through_key,
            through_column,
        }
    }
}

///
/// EntitySchema
///
/// Static description of one entity type: table layout, traversal links,
/// and query whitelists. Implemented once per type as a unit struct; the
/// registry maps slugs to managers built over these.
///

pub trait EntitySchema: Send + Sync {
    fn slug(&self) -> EntitySlug;

    fn table(&self) -> &'static str;

    /// Side table holding this type's `(owner_id, meta_key, meta_value)`
    /// rows.
    fn meta_table(&self) -> &'static str;

    fn primary_key(&self) -> &'static str {
        "id"
    }

    fn columns(&self) -> &'static [ColumnDef];

    /// Declared sort column, when result order should not follow the
    /// primary key.
    fn sort_column(&self) -> Option<&'static str> {
        None
    }

    fn parent_links(&self) -> &'static [ParentLink] {
        &[]
    }

    fn batch_refs(&self) -> &'static [BatchRef] {
        &[]
    }

    /// Whitelist of columns a query may order by. Anything else falls back
    /// to the default order.
    fn orderable_columns(&self) -> &'static [&'static str] {
        &[]
    }

    /// Declared filter fields matched directly on this table.
    fn filterable_columns(&self) -> &'static [&'static str] {
        &[]
    }

    /// Filter fields living on a related table, reached through a join.
    fn related_filter(&self, _field: &str) -> Option<RelatedFilter> {
        None
    }

    fn title_column(&self) -> Option<&'static str> {
        None
    }

    fn author_column(&self) -> Option<&'static str> {
        None
    }

    fn type_column(&self) -> Option<&'static str> {
        None
    }

    fn status_column(&self) -> Option<&'static str> {
        None
    }

    /// Meta keys declared single-valued; writes replace instead of append.
    fn single_key_meta(&self) -> &'static [&'static str] {
        &[]
    }

    /// Declared column by name.
    fn column(&self, name: &str) -> Option<&'static ColumnDef> {
        self.columns().iter().find(|c| c.name == name)
    }

    fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Default result order: declared sort column when present, primary key
    /// otherwise. Always ascending.
    fn default_order(&self) -> (&'static str, Direction) {
        (
            self.sort_column().unwrap_or_else(|| self.primary_key()),
            Direction::Asc,
        )
    }

    /// Parent-link column pointing at the given parent type.
    fn parent_link_to(&self, parent: EntitySlug) -> Option<&'static ParentLink> {
        self.parent_links().iter().find(|l| l.parent == parent)
    }
}
