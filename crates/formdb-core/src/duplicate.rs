use crate::{
    error::Error,
    manager::Manager,
    query::QueryArgs,
    registry::Registry,
    row::Row,
    types::{EntitySlug, Id},
    value::Value,
};
use std::collections::BTreeMap;
use tracing::{debug, info};

///
/// TranslationTable
///
/// Old-id → new-id mappings accumulated across one duplication walk, one
/// map per entity type. Threaded by reference through the recursion — an
/// explicit accumulator, not engine state — so the algorithm can be tested
/// on a fixed subtree by asserting the final table.
///

#[derive(Clone, Debug, Default)]
pub struct TranslationTable {
    by_slug: BTreeMap<EntitySlug, BTreeMap<Id, Id>>,
}

impl TranslationTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, slug: EntitySlug, old: Id, new: Id) {
        self.by_slug.entry(slug).or_default().insert(old, new);
    }

    /// New id of `old`, if that entity was cloned in this walk. Ids outside
    /// the walk resolve to `None` and are treated as external references.
    #[must_use]
    pub fn lookup(&self, slug: EntitySlug, old: Id) -> Option<Id> {
        self.by_slug.get(&slug).and_then(|map| map.get(&old)).copied()
    }

    #[must_use]
    pub fn for_slug(&self, slug: EntitySlug) -> Option<&BTreeMap<Id, Id>> {
        self.by_slug.get(&slug)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntitySlug, &BTreeMap<Id, Id>)> + '_ {
        self.by_slug.iter().map(|(slug, map)| (*slug, map))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_slug.is_empty()
    }

    /// Total entities cloned across every type.
    #[must_use]
    pub fn cloned_count(&self) -> usize {
        self.by_slug.values().map(BTreeMap::len).sum()
    }
}

///
/// DuplicationOutcome
///
/// Completion notice: root ids plus every per-type translation table, so
/// collaborators indexing by the old ids can react.
///

#[derive(Clone, Debug)]
pub struct DuplicationOutcome {
    pub slug: EntitySlug,
    pub source: Id,
    pub duplicate: Id,
    pub translations: TranslationTable,
}

///
/// DuplicationListener
///

pub trait DuplicationListener: Send + Sync {
    fn on_duplicated(&self, outcome: &DuplicationOutcome);
}

/// Deep-copy `id` and every descendant reachable through the registry's
/// parent/child links.
///
/// Pass 1 clones parent-before-child: the representation minus the primary
/// key, with parent-link columns rewritten through mappings recorded
/// earlier in the same walk. Pass 2 runs per sibling batch, after the
/// whole batch is cloned, rewriting batch-ref columns whose old value
/// resolves inside the translation table; anything else is an external
/// reference and stays untouched. Recursion starts only after a batch
/// finishes both passes, which is what guarantees a descendant's fixup
/// always sees its parent level fully mapped.
///
/// There is no rollback: everything cloned before a failing node remains a
/// valid, addressable entity, and the error carries the partial table so
/// the caller can keep or discard the copy.
pub(crate) fn duplicate(
    registry: &Registry,
    slug: EntitySlug,
    id: Id,
) -> Result<DuplicationOutcome, Error> {
    let mut translations = TranslationTable::new();

    let result = run_walk(registry, slug, id, &mut translations);

    match result {
        Ok(new_id) => {
            let outcome = DuplicationOutcome {
                slug,
                source: id,
                duplicate: new_id,
                translations,
            };
            info!(
                entity = %slug,
                source = %id,
                duplicate = %new_id,
                cloned = outcome.translations.cloned_count(),
                "duplication complete"
            );
            registry.notify_duplicated(&outcome);

            Ok(outcome)
        }
        Err(source) => Err(Error::DuplicationPartial {
            source: Box::new(source),
            translations,
        }),
    }
}

fn run_walk(
    registry: &Registry,
    slug: EntitySlug,
    id: Id,
    translations: &mut TranslationTable,
) -> Result<Id, Error> {
    let manager = registry.manager(slug)?;

    let new_id = clone_entity(manager.as_ref(), id, translations)?;
    fixup_entity_refs(manager.as_ref(), id, translations)?;
    clone_children(registry, manager.as_ref(), id, translations)?;

    Ok(new_id)
}

// Pass 1 for one entity: clone the row, rewrite parent links already
// mapped in this walk, copy the attached meta verbatim.
fn clone_entity(
    manager: &Manager,
    id: Id,
    translations: &mut TranslationTable,
) -> Result<Id, Error> {
    let model = manager.get(id)?;
    let schema = manager.schema();

    let mut row = model.to_representation();
    row.remove(schema.primary_key());

    for link in schema.parent_links() {
        let mapped = row
            .get(link.column)
            .and_then(Value::as_id)
            .and_then(|old| translations.lookup(link.parent, old));
        if let Some(new_parent) = mapped {
            row.set(link.column, new_parent);
        }
        // an unmapped parent id is outside the walk (the root's own parent)
        // and is carried over as-is
    }

    let new_id = manager.add(&row)?;
    translations.record(schema.slug(), id, new_id);

    for (key, value) in manager.meta_rows(id)? {
        manager.insert_meta_row(new_id, &key, &value)?;
    }

    debug!(entity = %schema.slug(), source = %id, duplicate = %new_id, "cloned");

    Ok(new_id)
}

// Pass 2 for one entity: rewrite batch-ref columns that resolve inside the
// walk. Text-typed columns remap only when their content parses as an id
// that was actually cloned.
fn fixup_entity_refs(
    manager: &Manager,
    old_id: Id,
    translations: &TranslationTable,
) -> Result<(), Error> {
    let schema = manager.schema();
    if schema.batch_refs().is_empty() {
        return Ok(());
    }
    let Some(new_id) = translations.lookup(schema.slug(), old_id) else {
        return Ok(());
    };

    let model = manager.get(new_id)?;
    let mut fixes = Row::new();
    for batch_ref in schema.batch_refs() {
        let Some(value) = model.get(batch_ref.column) else {
            continue;
        };
        let Some(old_target) = value.as_ref_id() else {
            continue;
        };
        if let Some(new_target) = translations.lookup(batch_ref.target, old_target) {
            fixes.set(batch_ref.column, value.with_ref_id(new_target));
        }
    }

    if !fixes.is_empty() {
        manager.update(new_id, &fixes)?;
    }

    Ok(())
}

// Clone every child batch under one parent: pass 1 over the whole batch,
// then pass 2 over the whole batch, then recurse per child.
fn clone_children(
    registry: &Registry,
    parent: &Manager,
    old_parent: Id,
    translations: &mut TranslationTable,
) -> Result<(), Error> {
    for child_slug in parent.children() {
        let child = registry.manager(child_slug)?;
        let Some(link) = child.schema().parent_link_to(parent.slug()) else {
            debug!(parent = %parent.slug(), child = %child_slug, "child link without a parent-link column, skipping");
            continue;
        };

        let batch = child.query(&QueryArgs::new().filter(link.column, Value::from(old_parent)))?;
        let batch_ids = batch.ids();

        for &old_id in &batch_ids {
            clone_entity(child.as_ref(), old_id, translations)?;
        }
        for &old_id in &batch_ids {
            fixup_entity_refs(child.as_ref(), old_id, translations)?;
        }
        for &old_id in &batch_ids {
            clone_children(registry, child.as_ref(), old_id, translations)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::EntitySchema;
    use crate::test_support::{FOLDER, ITEM, NOTE, folder_registry};
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn seed_tree(registry: &Registry) -> (Id, Id, Id) {
        let folders = registry.manager(FOLDER.slug()).expect("folders");
        let items = registry.manager(ITEM.slug()).expect("items");

        let folder = folders
            .add(&Row::new().with("name", "root"))
            .expect("folder");
        let first = items
            .add(&Row::new().with("folder_id", folder).with("label", "first"))
            .expect("first item");
        let second = items
            .add(&Row::new().with("folder_id", folder).with("label", "second"))
            .expect("second item");

        (folder, first, second)
    }

    #[test]
    fn subtree_clone_maps_every_level() {
        let (registry, store, _) = folder_registry();
        let (folder, first, _) = seed_tree(&registry);

        let notes = registry.manager(NOTE.slug()).expect("notes");
        notes
            .add(&Row::new().with("item_id", first).with("body", "hello"))
            .expect("note");

        let outcome = registry
            .duplicate(FOLDER.slug(), folder)
            .expect("duplicate");

        assert_ne!(outcome.duplicate, folder);
        assert_eq!(outcome.translations.cloned_count(), 4);
        assert_eq!(store.row_count("folders"), 2);
        assert_eq!(store.row_count("items"), 4);
        assert_eq!(store.row_count("notes"), 2);

        // cloned children hang off the cloned parent, not the source
        let items = registry.manager(ITEM.slug()).expect("items");
        let cloned_items = items
            .query(&QueryArgs::new().filter("folder_id", Value::from(outcome.duplicate)))
            .expect("query clones");
        assert_eq!(cloned_items.len(), 2);
    }

    #[test]
    fn forward_sibling_reference_is_remapped() {
        let (registry, _, _) = folder_registry();
        let (folder, first, second) = seed_tree(&registry);

        // first item points at its sibling, which clones later in the batch
        let items = registry.manager(ITEM.slug()).expect("items");
        items
            .update(first, &Row::new().with("linked_item", second))
            .expect("link sibling");

        let outcome = registry
            .duplicate(FOLDER.slug(), folder)
            .expect("duplicate");

        let new_first = outcome
            .translations
            .lookup(ITEM.slug(), first)
            .expect("first mapped");
        let new_second = outcome
            .translations
            .lookup(ITEM.slug(), second)
            .expect("second mapped");

        let clone = items.get(new_first).expect("clone");
        assert_eq!(clone.get("linked_item"), Some(&Value::Uint(new_second.get())));
    }

    #[test]
    fn references_outside_the_walk_stay_untouched() {
        let (registry, _, _) = folder_registry();
        let (folder, first, _) = seed_tree(&registry);

        let items = registry.manager(ITEM.slug()).expect("items");
        items
            .update(first, &Row::new().with("linked_item", 9999_u64))
            .expect("external link");

        let outcome = registry
            .duplicate(FOLDER.slug(), folder)
            .expect("duplicate");

        let new_first = outcome
            .translations
            .lookup(ITEM.slug(), first)
            .expect("mapped");
        let clone = items.get(new_first).expect("clone");
        assert_eq!(clone.get("linked_item"), Some(&Value::Uint(9999)));
    }

    #[test]
    fn meta_rows_are_copied_onto_clones() {
        let (registry, _, _) = folder_registry();
        let (folder, first, _) = seed_tree(&registry);

        let items = registry.manager(ITEM.slug()).expect("items");
        items
            .update_meta(first, "color", Value::Text("red".into()))
            .expect("meta");

        let outcome = registry
            .duplicate(FOLDER.slug(), folder)
            .expect("duplicate");
        let new_first = outcome
            .translations
            .lookup(ITEM.slug(), first)
            .expect("mapped");

        assert_eq!(
            items.meta_first(new_first, "color").expect("clone meta"),
            Some(Value::Text("red".into()))
        );
    }

    #[test]
    fn listeners_receive_the_outcome() {
        struct Recorder(Arc<Mutex<Vec<(Id, Id)>>>);

        impl DuplicationListener for Recorder {
            fn on_duplicated(&self, outcome: &DuplicationOutcome) {
                self.0.lock().push((outcome.source, outcome.duplicate));
            }
        }

        let (registry, _, _) = folder_registry();
        let (folder, _, _) = seed_tree(&registry);

        let seen = Arc::new(Mutex::new(Vec::new()));
        registry.subscribe(Box::new(Recorder(Arc::clone(&seen))));

        let outcome = registry
            .duplicate(FOLDER.slug(), folder)
            .expect("duplicate");

        assert_eq!(seen.lock().as_slice(), &[(folder, outcome.duplicate)]);
    }

    #[test]
    fn missing_root_yields_partial_error_with_empty_table() {
        let (registry, _, _) = folder_registry();

        let err = registry
            .duplicate(FOLDER.slug(), Id::new(42))
            .expect_err("must fail");

        let translations = err.partial_translations().expect("partial table");
        assert!(translations.is_empty());
    }
}
