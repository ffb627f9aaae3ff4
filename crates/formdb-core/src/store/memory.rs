use super::{Join, OrderSpec, RowStore, SelectCriteria, Selection, StoreError};
use crate::{
    row::Row,
    types::{Direction, Id},
    value::Value,
};
use parking_lot::RwLock;
use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashMap},
};

/// Column the reference store materializes assigned keys under.
const ID_COLUMN: &str = "id";

///
/// Table
///

#[derive(Default)]
struct Table {
    next_id: u64,
    rows: BTreeMap<Id, Row>,
}

impl Table {
    fn assign_id(&mut self) -> Id {
        self.next_id += 1;
        Id::new(self.next_id)
    }
}

///
/// MemoryRowStore
///
/// BTreeMap-backed reference implementation of the row contract. Tables
/// are created on first insert; selecting from an absent table yields an
/// empty selection so parent types without children read as childless.
///

#[derive(Default)]
pub struct MemoryRowStore {
    tables: RwLock<HashMap<String, Table>>,
}

impl MemoryRowStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Live row count of one table.
    #[must_use]
    pub fn row_count(&self, table: &str) -> usize {
        self.tables.read().get(table).map_or(0, |t| t.rows.len())
    }
}

impl RowStore for MemoryRowStore {
    fn insert(&self, table: &str, row: &Row) -> Result<Id, StoreError> {
        let mut tables = self.tables.write();
        let entry = tables.entry(table.to_string()).or_default();

        let id = entry.assign_id();
        let mut stored = row.clone();
        stored.set(ID_COLUMN, id);
        entry.rows.insert(id, stored);

        Ok(id)
    }

    fn update(&self, table: &str, id: Id, row: &Row) -> Result<(), StoreError> {
        let mut tables = self.tables.write();
        let existing = tables
            .get_mut(table)
            .and_then(|t| t.rows.get_mut(&id))
            .ok_or_else(|| StoreError::RowNotFound {
                table: table.to_string(),
                id,
            })?;

        for (column, value) in row.iter() {
            existing.set(column, value.clone());
        }
        // the key column is authoritative and cannot be overlaid away
        existing.set(ID_COLUMN, id);

        Ok(())
    }

    fn delete(&self, table: &str, id: Id) -> Result<(), StoreError> {
        let removed = self
            .tables
            .write()
            .get_mut(table)
            .and_then(|t| t.rows.remove(&id));

        if removed.is_none() {
            return Err(StoreError::RowNotFound {
                table: table.to_string(),
                id,
            });
        }

        Ok(())
    }

    fn select(&self, table: &str, criteria: &SelectCriteria) -> Result<Selection, StoreError> {
        let tables = self.tables.read();
        let Some(target) = tables.get(table) else {
            return Ok(Selection::default());
        };

        let mut matched: Vec<Row> = target
            .rows
            .values()
            .filter(|row| criteria.wheres.iter().all(|w| w.matches(row)))
            .filter(|row| criteria.joins.iter().all(|j| join_matches(&tables, j, row)))
            .cloned()
            .collect();

        order_rows(&mut matched, &criteria.order);

        let total = matched.len() as u64;
        let offset = usize::try_from(criteria.offset).unwrap_or(usize::MAX);
        let rows: Vec<Row> = match criteria.limit {
            Some(limit) => matched
                .into_iter()
                .skip(offset)
                .take(usize::try_from(limit).unwrap_or(usize::MAX))
                .collect(),
            None => matched.into_iter().skip(offset).collect(),
        };

        Ok(Selection { rows, total })
    }
}

fn join_matches(tables: &HashMap<String, Table>, join: &Join, row: &Row) -> bool {
    let Some(local) = row.get(&join.local_column) else {
        return false;
    };

    tables.get(&join.table).is_some_and(|joined| {
        joined.rows.values().any(|candidate| {
            candidate.get(&join.foreign_column) == Some(local)
                && join.wheres.iter().all(|w| w.matches(candidate))
        })
    })
}

fn order_rows(rows: &mut [Row], order: &OrderSpec) {
    match order {
        OrderSpec::Columns(columns) if !columns.is_empty() => {
            rows.sort_by(|a, b| {
                for (column, direction) in columns {
                    let left = a.get(column).unwrap_or(&Value::Null);
                    let right = b.get(column).unwrap_or(&Value::Null);
                    let ordering = match direction {
                        Direction::Asc => left.cmp(right),
                        Direction::Desc => right.cmp(left),
                    };
                    if ordering != Ordering::Equal {
                        return ordering;
                    }
                }
                Ordering::Equal
            });
        }
        OrderSpec::Columns(_) => {}
        OrderSpec::IdList(ids) => {
            let position: HashMap<Id, usize> = ids
                .iter()
                .copied()
                .enumerate()
                .map(|(index, id)| (id, index))
                .collect();

            rows.sort_by_key(|row| {
                row.get(ID_COLUMN)
                    .and_then(Value::as_id)
                    .and_then(|id| position.get(&id).copied())
                    .unwrap_or(usize::MAX)
            });
        }
    }
}
