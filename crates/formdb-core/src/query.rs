use crate::{
    cache::CacheKey,
    collection::Collection,
    error::Error,
    manager::{META_KEY_COLUMN, META_OWNER_COLUMN, META_PRIMARY_COLUMN, Manager},
    schema::{ColumnDef, EntitySchema},
    store::{Join, OrderSpec, SelectCriteria, WhereClause},
    types::{Direction, Id},
    value::Value,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;
use xxhash_rust::xxh3::xxh3_64;

///
/// Limit
///
/// Page size. Callers passing signed input go through `from_signed`: -1 is
/// the documented "unlimited" sentinel, any other negative normalizes to
/// an empty page that short-circuits before the store.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub enum Limit {
    #[default]
    All,
    Count(u64),
}

impl Limit {
    #[must_use]
    pub fn from_signed(raw: i64) -> Self {
        match raw {
            -1 => Self::All,
            n if n < 0 => Self::Count(0),
            n => Self::Count(u64::try_from(n).unwrap_or(0)),
        }
    }

    #[must_use]
    pub const fn is_empty_page(self) -> bool {
        matches!(self, Self::Count(0))
    }
}

///
/// OrderBy
///

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub enum OrderBy {
    /// Manager's declared default order.
    #[default]
    Default,
    /// Single column, direction taken from `QueryArgs::order`. Columns
    /// outside the orderable whitelist fall back to the default order.
    Column(String),
    /// Ordered column → direction sequence.
    Columns(Vec<(String, Direction)>),
    /// Follow a caller-supplied id sequence exactly.
    IdList(Vec<Id>),
}

///
/// FilterValue
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum FilterValue {
    /// Exact match.
    One(Value),
    /// List membership.
    Many(Vec<Value>),
}

impl From<Value> for FilterValue {
    fn from(value: Value) -> Self {
        Self::One(value)
    }
}

impl From<Vec<Value>> for FilterValue {
    fn from(values: Vec<Value>) -> Self {
        Self::Many(values)
    }
}

///
/// QueryArgs
///
/// Declarative filter/sort/paginate request. Filters are a sorted map, so
/// the canonical fingerprint is independent of construction order.
///

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct QueryArgs {
    pub number: Limit,
    pub offset: u64,
    pub orderby: OrderBy,
    pub order: Direction,
    pub filters: BTreeMap<String, FilterValue>,
}

impl QueryArgs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.filters.insert(field.into(), value.into());
        self
    }

    #[must_use]
    pub fn limit(mut self, number: Limit) -> Self {
        self.number = number;
        self
    }

    #[must_use]
    pub const fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    #[must_use]
    pub fn orderby(mut self, orderby: OrderBy) -> Self {
        self.orderby = orderby;
        self
    }

    #[must_use]
    pub const fn order(mut self, order: Direction) -> Self {
        self.order = order;
        self
    }
}

/// Canonical fingerprint of one argument set. Filters live in a sorted
/// map, so two equal requests hash identically regardless of the order
/// their filters were added in.
pub(crate) fn fingerprint(args: &QueryArgs) -> u64 {
    let canonical = serde_json::to_vec(args).unwrap_or_default();
    xxh3_64(&canonical)
}

/// Compile a request into store criteria. This module is the only
/// constructor of `SelectCriteria`.
pub(crate) fn compile(
    schema: &'static dyn EntitySchema,
    args: &QueryArgs,
) -> Result<SelectCriteria, Error> {
    let mut criteria = SelectCriteria::default();

    parse_where(schema, args, &mut criteria)?;
    parse_orderby(schema, args, &mut criteria)?;

    criteria.offset = args.offset;
    criteria.limit = match args.number {
        Limit::All => None,
        Limit::Count(n) => Some(n),
    };

    Ok(criteria)
}

// Declared filter fields become where clauses; fields living on a related
// table become joins; anything unknown is ignored for forward
// compatibility.
fn parse_where(
    schema: &'static dyn EntitySchema,
    args: &QueryArgs,
    criteria: &mut SelectCriteria,
) -> Result<(), Error> {
    for (field, filter) in &args.filters {
        if schema.filterable_columns().iter().any(|c| *c == field.as_str()) {
            if let Some(def) = schema.column(field) {
                criteria.wheres.push(typed_clause(def, field, filter)?);
                continue;
            }
        }

        if let Some(related) = schema.related_filter(field) {
            criteria.joins.push(Join {
                table: related.through_table.to_string(),
                local_column: related.local_column.to_string(),
                foreign_column: related.through_key.to_string(),
                wheres: vec![raw_clause(related.through_column, filter)],
            });
            continue;
        }

        debug!(entity = %schema.slug(), %field, "unknown filter field ignored");
    }

    Ok(())
}

fn typed_clause(
    def: &ColumnDef,
    field: &str,
    filter: &FilterValue,
) -> Result<WhereClause, Error> {
    let admit = |value: &Value| {
        def.admit(value.clone()).map_err(|err| Error::InvalidFilter {
            field: field.to_string(),
            reason: err.to_string(),
        })
    };

    match filter {
        FilterValue::One(value) => Ok(WhereClause::Eq(field.to_string(), admit(value)?)),
        FilterValue::Many(values) => {
            let mut admitted = Vec::with_capacity(values.len());
            for value in values {
                admitted.push(admit(value)?);
            }
            Ok(WhereClause::In(field.to_string(), admitted))
        }
    }
}

// Joined-table filter columns belong to another schema, so their values
// pass through untyped; the store compares cells directly.
fn raw_clause(column: &str, filter: &FilterValue) -> WhereClause {
    match filter {
        FilterValue::One(value) => WhereClause::Eq(column.to_string(), value.clone()),
        FilterValue::Many(values) => WhereClause::In(column.to_string(), values.clone()),
    }
}

fn parse_orderby(
    schema: &'static dyn EntitySchema,
    args: &QueryArgs,
    criteria: &mut SelectCriteria,
) -> Result<(), Error> {
    let orderable = |name: &str| schema.orderable_columns().iter().any(|c| *c == name);

    criteria.order = match &args.orderby {
        OrderBy::Default => default_order(schema),
        OrderBy::Column(name) => {
            if orderable(name) {
                OrderSpec::Columns(vec![(name.clone(), args.order)])
            } else {
                debug!(entity = %schema.slug(), column = %name, "orderby outside the whitelist, using default order");
                default_order(schema)
            }
        }
        OrderBy::Columns(columns) => {
            let kept: Vec<(String, Direction)> = columns
                .iter()
                .filter(|(name, _)| orderable(name))
                .cloned()
                .collect();
            if kept.is_empty() {
                default_order(schema)
            } else {
                OrderSpec::Columns(kept)
            }
        }
        OrderBy::IdList(ids) => {
            if ids.iter().any(|id| id.is_unset()) {
                return Err(Error::InvalidFilter {
                    field: "orderby".to_string(),
                    reason: "id list contains an unset id".to_string(),
                });
            }
            let values: Vec<Value> = ids.iter().copied().map(Value::from).collect();
            criteria
                .wheres
                .push(WhereClause::In(schema.primary_key().to_string(), values));
            OrderSpec::IdList(ids.clone())
        }
    };

    Ok(())
}

fn default_order(schema: &dyn EntitySchema) -> OrderSpec {
    let (column, direction) = schema.default_order();
    OrderSpec::Columns(vec![(column.to_string(), direction)])
}

/// Criteria for a single-row fetch by primary key.
pub(crate) fn criteria_by_id(schema: &dyn EntitySchema, id: Id) -> SelectCriteria {
    SelectCriteria {
        wheres: vec![WhereClause::Eq(
            schema.primary_key().to_string(),
            Value::from(id),
        )],
        limit: Some(1),
        ..SelectCriteria::default()
    }
}

/// Criteria for every meta row of one owner, in insertion order.
pub(crate) fn criteria_meta_owner(owner: Id) -> SelectCriteria {
    SelectCriteria {
        wheres: vec![WhereClause::Eq(
            META_OWNER_COLUMN.to_string(),
            Value::from(owner),
        )],
        order: OrderSpec::Columns(vec![(META_PRIMARY_COLUMN.to_string(), Direction::Asc)]),
        ..SelectCriteria::default()
    }
}

/// Criteria for the meta rows of one owner under one key.
pub(crate) fn criteria_meta_key(owner: Id, key: &str) -> SelectCriteria {
    let mut criteria = criteria_meta_owner(owner);
    criteria
        .wheres
        .push(WhereClause::Eq(META_KEY_COLUMN.to_string(), Value::from(key)));
    criteria
}

///
/// CachedPage
///
/// What a query caches: the id page plus the unpaginated total.
///

#[derive(Deserialize, Serialize)]
struct CachedPage {
    ids: Vec<Id>,
    total: u64,
}

/// Execute a request against the manager's store, serving repeats from the
/// generation-keyed cache.
pub(crate) fn execute(manager: &Manager, args: &QueryArgs) -> Result<Collection, Error> {
    // empty-page requests short-circuit before touching cache or store
    if args.number.is_empty_page() {
        return Ok(Collection::from_ids(Vec::new(), 0));
    }
    if let OrderBy::IdList(ids) = &args.orderby {
        if ids.is_empty() {
            return Ok(Collection::from_ids(Vec::new(), 0));
        }
    }

    let criteria = compile(manager.schema(), args)?;
    let key = CacheKey::query(fingerprint(args), manager.generation());

    if let Some(bytes) = manager.cache_get(&key) {
        if let Ok(page) = serde_json::from_slice::<CachedPage>(&bytes) {
            debug!(entity = %manager.slug(), "query served from cache");
            return Ok(Collection::from_ids(page.ids, page.total));
        }
    }

    let selection = manager
        .store()
        .select(manager.table(), &criteria)
        .map_err(|source| Error::Select {
            table: manager.table(),
            source,
        })?;

    let primary = manager.schema().primary_key();
    let ids: Vec<Id> = selection
        .rows
        .iter()
        .filter_map(|row| row.get(primary).and_then(Value::as_id))
        .collect();

    let page = CachedPage {
        ids,
        total: selection.total,
    };
    if let Ok(bytes) = serde_json::to_vec(&page) {
        manager.cache_set(&key, &bytes);
    }

    Ok(Collection::from_ids(page.ids, page.total))
}
