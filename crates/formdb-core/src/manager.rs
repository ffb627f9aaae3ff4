use crate::{
    cache::{CacheKey, CacheService, decode_generation, encode_generation},
    collection::Collection,
    error::Error,
    model::Model,
    query::{self, QueryArgs},
    registry::Registry,
    row::Row,
    schema::EntitySchema,
    store::{RowStore, StoreError},
    types::{EntitySlug, Id},
    value::Value,
};
use parking_lot::RwLock;
use std::{collections::BTreeSet, sync::Arc};
use tracing::{debug, warn};

/// Meta side-table layout, shared by every entity type.
pub(crate) const META_PRIMARY_COLUMN: &str = "id";
pub(crate) const META_OWNER_COLUMN: &str = "owner_id";
pub(crate) const META_KEY_COLUMN: &str = "meta_key";
pub(crate) const META_VALUE_COLUMN: &str = "meta_value";

///
/// Manager
///
/// Owning service for one entity type: schema, CRUD, the explicit meta
/// tier, caching, and the parent/child links the cascade and duplication
/// walks traverse. Constructed once per type and handed out through the
/// registry.
///

pub struct Manager {
    schema: &'static dyn EntitySchema,
    store: Arc<dyn RowStore>,
    cache: Arc<dyn CacheService>,
    children: RwLock<Vec<EntitySlug>>,
    parents: RwLock<Vec<EntitySlug>>,
}

impl std::fmt::Debug for Manager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Manager")
            .field("slug", &self.schema.slug())
            .field("children", &*self.children.read())
            .field("parents", &*self.parents.read())
            .finish_non_exhaustive()
    }
}

impl Manager {
    #[must_use]
    pub fn new(
        schema: &'static dyn EntitySchema,
        store: Arc<dyn RowStore>,
        cache: Arc<dyn CacheService>,
    ) -> Self {
        Self {
            schema,
            store,
            cache,
            children: RwLock::new(Vec::new()),
            parents: RwLock::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn schema(&self) -> &'static dyn EntitySchema {
        self.schema
    }

    #[must_use]
    pub fn slug(&self) -> EntitySlug {
        self.schema.slug()
    }

    #[must_use]
    pub fn table(&self) -> &'static str {
        self.schema.table()
    }

    /// Cache group this manager partitions the cache service by.
    #[must_use]
    pub fn cache_group(&self) -> &'static str {
        self.schema.slug().as_str()
    }

    pub(crate) fn store(&self) -> &dyn RowStore {
        self.store.as_ref()
    }

    // ------------------------------------------------------------------
    // Relationship links
    // ------------------------------------------------------------------

    /// Child entity types, in registration order. The duplication walk
    /// relies on this order, so structural children should be linked
    /// before data children (containers before submissions).
    #[must_use]
    pub fn children(&self) -> Vec<EntitySlug> {
        self.children.read().clone()
    }

    #[must_use]
    pub fn parents(&self) -> Vec<EntitySlug> {
        self.parents.read().clone()
    }

    #[must_use]
    pub fn has_child(&self, slug: EntitySlug) -> bool {
        self.children.read().contains(&slug)
    }

    pub(crate) fn link_child(&self, slug: EntitySlug) {
        let mut children = self.children.write();
        if !children.contains(&slug) {
            children.push(slug);
        }
    }

    pub(crate) fn link_parent(&self, slug: EntitySlug) {
        let mut parents = self.parents.write();
        if !parents.contains(&slug) {
            parents.push(slug);
        }
    }

    // ------------------------------------------------------------------
    // CRUD
    // ------------------------------------------------------------------

    /// Cache-first fetch of one entity.
    pub fn get(&self, id: Id) -> Result<Model, Error> {
        if id.is_unset() {
            return Err(self.not_found(id));
        }

        if let Some(bytes) = self.cache_get(&CacheKey::entity(id)) {
            match serde_json::from_slice::<Row>(&bytes) {
                Ok(row) => {
                    debug!(entity = %self.slug(), %id, "cache hit");
                    return Ok(Model::from_row(self.schema, &row)?);
                }
                Err(err) => {
                    debug!(entity = %self.slug(), %id, %err, "cache entry undecodable, reading store");
                }
            }
        }

        let criteria = query::criteria_by_id(self.schema, id);
        let selection = self
            .store
            .select(self.table(), &criteria)
            .map_err(|source| Error::Select {
                table: self.table(),
                source,
            })?;

        let Some(row) = selection.rows.into_iter().next() else {
            return Err(self.not_found(id));
        };

        let model = Model::from_row(self.schema, &row)?;
        self.cache_row(&model);

        Ok(model)
    }

    /// Build a transient model: declared defaults overridden by `fields`.
    /// Nothing is persisted.
    pub fn create(&self, fields: &Row) -> Result<Model, Error> {
        let mut model = Model::new(self.schema);
        model.apply(fields)?;
        Ok(model)
    }

    /// Create and persist in one step, returning the assigned key.
    pub fn add(&self, fields: &Row) -> Result<Id, Error> {
        let mut model = self.create(fields)?;

        let mut row = model.to_representation();
        row.remove(self.schema.primary_key());

        let id = self
            .store
            .insert(self.table(), &row)
            .map_err(|source| Error::Insert {
                table: self.table(),
                source,
            })?;

        model.set_id(id);
        self.cache_row(&model);
        self.bump_generation();
        debug!(entity = %self.slug(), %id, "added");

        Ok(id)
    }

    /// Load, apply `fields`, persist.
    pub fn update(&self, id: Id, fields: &Row) -> Result<Model, Error> {
        let mut model = self.get(id)?;
        model.apply(fields)?;
        model.set_id(id);

        let mut row = model.to_representation();
        row.remove(self.schema.primary_key());

        self.store
            .update(self.table(), id, &row)
            .map_err(|source| match source {
                StoreError::RowNotFound { .. } => self.not_found(id),
                source => Error::Update {
                    table: self.table(),
                    id,
                    source,
                },
            })?;

        self.cache_row(&model);
        self.bump_generation();

        Ok(model)
    }

    /// Cascade delete: every child reachable through the registry links
    /// first, then this entity's meta rows, then the row itself.
    pub fn delete(&self, registry: &Registry, id: Id) -> Result<(), Error> {
        // existence check up front so a bogus id fails before any child walk
        let _ = self.get(id)?;

        for child_slug in self.children() {
            let child = registry.manager(child_slug)?;
            let Some(link) = child.schema().parent_link_to(self.slug()) else {
                warn!(parent = %self.slug(), child = %child_slug, "child link without a parent-link column, skipping");
                continue;
            };

            let args = QueryArgs::new().filter(link.column, Value::from(id));
            let children = child.query(&args)?;
            for child_id in children.ids() {
                child.delete(registry, child_id)?;
            }
        }

        self.purge_meta(id)?;

        self.store
            .delete(self.table(), id)
            .map_err(|source| match source {
                StoreError::RowNotFound { .. } => self.not_found(id),
                source => Error::Delete {
                    table: self.table(),
                    id,
                    source,
                },
            })?;

        self.cache_delete(&CacheKey::entity(id));
        self.bump_generation();
        debug!(entity = %self.slug(), %id, "deleted");

        Ok(())
    }

    /// Run a declarative query, returning a collection in ids mode.
    pub fn query(&self, args: &QueryArgs) -> Result<Collection, Error> {
        query::execute(self, args)
    }

    // ------------------------------------------------------------------
    // Optional trait columns
    // ------------------------------------------------------------------

    #[must_use]
    pub fn title<'a>(&self, model: &'a Model) -> Option<&'a Value> {
        self.schema.title_column().and_then(|c| model.get(c))
    }

    #[must_use]
    pub fn author<'a>(&self, model: &'a Model) -> Option<&'a Value> {
        self.schema.author_column().and_then(|c| model.get(c))
    }

    #[must_use]
    pub fn type_of<'a>(&self, model: &'a Model) -> Option<&'a Value> {
        self.schema.type_column().and_then(|c| model.get(c))
    }

    #[must_use]
    pub fn status<'a>(&self, model: &'a Model) -> Option<&'a Value> {
        self.schema.status_column().and_then(|c| model.get(c))
    }

    // ------------------------------------------------------------------
    // Meta tier
    // ------------------------------------------------------------------

    /// All values stored under one meta key, cache-first.
    pub fn meta(&self, id: Id, key: &str) -> Result<Vec<Value>, Error> {
        let cache_key = CacheKey::meta(id, key);
        if let Some(bytes) = self.cache_get(&cache_key) {
            if let Ok(values) = serde_json::from_slice::<Vec<Value>>(&bytes) {
                return Ok(values);
            }
        }

        let values = self.meta_values_from_store(id, key)?;
        if let Ok(bytes) = serde_json::to_vec(&values) {
            self.cache_set(&cache_key, &bytes);
        }

        Ok(values)
    }

    /// First value under a meta key.
    pub fn meta_first(&self, id: Id, key: &str) -> Result<Option<Value>, Error> {
        Ok(self.meta(id, key)?.into_iter().next())
    }

    /// A meta key is "set" iff at least one row exists for it. Declared
    /// columns are always set; this is the meta-tier counterpart.
    pub fn meta_is_set(&self, id: Id, key: &str) -> Result<bool, Error> {
        Ok(!self.meta(id, key)?.is_empty())
    }

    /// Append one value under a meta key. Keys declared single-valued
    /// replace instead. A null value deletes the key.
    pub fn add_meta(&self, id: Id, key: &str, value: Value) -> Result<(), Error> {
        if value.is_null() {
            return self.delete_meta(id, key);
        }
        if self.schema.single_key_meta().iter().any(|k| *k == key) {
            return self.update_meta(id, key, value);
        }

        self.insert_meta_row(id, key, &value)?;
        self.invalidate_meta(id, key);

        Ok(())
    }

    /// Replace every value under a meta key. A null value deletes the key
    /// rather than storing a null.
    pub fn update_meta(&self, id: Id, key: &str, value: Value) -> Result<(), Error> {
        self.remove_meta_rows(id, key)?;
        if !value.is_null() {
            self.insert_meta_row(id, key, &value)?;
        }
        self.invalidate_meta(id, key);

        Ok(())
    }

    /// Drop every value under a meta key.
    pub fn delete_meta(&self, id: Id, key: &str) -> Result<(), Error> {
        self.remove_meta_rows(id, key)?;
        self.invalidate_meta(id, key);

        Ok(())
    }

    /// Raw `(key, value)` meta pairs of one owner, in row order.
    /// Duplication copies these verbatim onto the clone.
    pub(crate) fn meta_rows(&self, id: Id) -> Result<Vec<(String, Value)>, Error> {
        let criteria = query::criteria_meta_owner(id);
        let selection = self
            .store
            .select(self.schema.meta_table(), &criteria)
            .map_err(|source| Error::Select {
                table: self.schema.meta_table(),
                source,
            })?;

        Ok(selection
            .rows
            .iter()
            .filter_map(|row| {
                let key = row.get(META_KEY_COLUMN)?.as_str()?.to_string();
                let value = decode_meta_value(row)?;
                Some((key, value))
            })
            .collect())
    }

    pub(crate) fn insert_meta_row(&self, id: Id, key: &str, value: &Value) -> Result<(), Error> {
        let encoded = serde_json::to_string(value).unwrap_or_default();
        let mut row = Row::new();
        row.set(META_OWNER_COLUMN, Value::from(id));
        row.set(META_KEY_COLUMN, key);
        row.set(META_VALUE_COLUMN, encoded);

        self.store
            .insert(self.schema.meta_table(), &row)
            .map_err(|source| Error::Insert {
                table: self.schema.meta_table(),
                source,
            })?;

        Ok(())
    }

    fn meta_values_from_store(&self, id: Id, key: &str) -> Result<Vec<Value>, Error> {
        let criteria = query::criteria_meta_key(id, key);
        let selection = self
            .store
            .select(self.schema.meta_table(), &criteria)
            .map_err(|source| Error::Select {
                table: self.schema.meta_table(),
                source,
            })?;

        Ok(selection.rows.iter().filter_map(decode_meta_value).collect())
    }

    fn remove_meta_rows(&self, id: Id, key: &str) -> Result<(), Error> {
        let criteria = query::criteria_meta_key(id, key);
        let selection = self
            .store
            .select(self.schema.meta_table(), &criteria)
            .map_err(|source| Error::Select {
                table: self.schema.meta_table(),
                source,
            })?;

        for row in &selection.rows {
            if let Some(meta_id) = row.get(META_PRIMARY_COLUMN).and_then(Value::as_id) {
                self.store
                    .delete(self.schema.meta_table(), meta_id)
                    .map_err(|source| Error::Delete {
                        table: self.schema.meta_table(),
                        id: meta_id,
                        source,
                    })?;
            }
        }

        Ok(())
    }

    // Cascade path: drop every meta row of one owner and its cached keys.
    fn purge_meta(&self, id: Id) -> Result<(), Error> {
        let keys: BTreeSet<String> = self
            .meta_rows(id)?
            .into_iter()
            .map(|(key, _)| key)
            .collect();

        for key in keys {
            self.delete_meta(id, &key)?;
        }

        Ok(())
    }

    fn invalidate_meta(&self, id: Id, key: &str) {
        self.cache_delete(&CacheKey::meta(id, key));
        self.bump_generation();
    }

    // ------------------------------------------------------------------
    // Cache plumbing
    // ------------------------------------------------------------------

    /// Current generation token, initializing it on first use. A cache
    /// outage reads as generation zero; nothing gets cached during the
    /// outage either, so the runtime degrades to store-only operation.
    pub(crate) fn generation(&self) -> u64 {
        match self.cache.get(self.cache_group(), CacheKey::LAST_CHANGED) {
            Ok(Some(bytes)) => decode_generation(&bytes).unwrap_or(0),
            Ok(None) => {
                let _ = self
                    .cache
                    .add(self.cache_group(), CacheKey::LAST_CHANGED, &encode_generation(1));
                // re-read in case a concurrent writer initialized it first
                self.cache
                    .get(self.cache_group(), CacheKey::LAST_CHANGED)
                    .ok()
                    .flatten()
                    .as_deref()
                    .and_then(decode_generation)
                    .unwrap_or(1)
            }
            Err(err) => {
                debug!(entity = %self.slug(), %err, "generation read failed, treating as zero");
                0
            }
        }
    }

    /// Refresh `last_changed` after a successful mutation. Every cached
    /// query key embeds the token, so one write invalidates every cached
    /// query of this type at once; stale entries age out on their own.
    pub(crate) fn bump_generation(&self) {
        let next = self.generation().wrapping_add(1);
        if let Err(err) = self.cache.set(
            self.cache_group(),
            CacheKey::LAST_CHANGED,
            &encode_generation(next),
            None,
        ) {
            warn!(entity = %self.slug(), %err, "generation refresh failed, ignored");
        }
    }

    pub(crate) fn cache_get(&self, key: &str) -> Option<Vec<u8>> {
        match self.cache.get(self.cache_group(), key) {
            Ok(found) => found,
            Err(err) => {
                debug!(entity = %self.slug(), key, %err, "cache read failed, treating as miss");
                None
            }
        }
    }

    pub(crate) fn cache_set(&self, key: &str, bytes: &[u8]) {
        if let Err(err) = self.cache.set(self.cache_group(), key, bytes, None) {
            warn!(entity = %self.slug(), key, %err, "cache write failed, ignored");
        }
    }

    fn cache_delete(&self, key: &str) {
        if let Err(err) = self.cache.delete(self.cache_group(), key) {
            warn!(entity = %self.slug(), key, %err, "cache delete failed, ignored");
        }
    }

    fn cache_row(&self, model: &Model) {
        if let Ok(bytes) = serde_json::to_vec(&model.to_representation()) {
            self.cache_set(&CacheKey::entity(model.id()), &bytes);
        }
    }

    fn not_found(&self, id: Id) -> Error {
        Error::NotFound {
            slug: self.schema.slug(),
            id,
        }
    }
}

fn decode_meta_value(row: &Row) -> Option<Value> {
    let text = row.get(META_VALUE_COLUMN)?.as_str()?;
    serde_json::from_str(text).ok()
}
