//! Shared fixtures for unit tests: a small folder/item/note hierarchy with
//! a self-referential item column, wired over the in-memory substrates.

use crate::{
    cache::MemoryCache,
    manager::Manager,
    registry::Registry,
    schema::{BatchRef, ColumnDef, EntitySchema, ParentLink},
    store::MemoryRowStore,
    types::EntitySlug,
    value::FieldType,
};
use std::sync::Arc;

///
/// FolderSchema
///

pub(crate) struct FolderSchema;

pub(crate) static FOLDER: FolderSchema = FolderSchema;

const FOLDER_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", FieldType::Uint),
    ColumnDef::new("name", FieldType::Text),
];

impl EntitySchema for FolderSchema {
    fn slug(&self) -> EntitySlug {
        EntitySlug::new("folder")
    }

    fn table(&self) -> &'static str {
        "folders"
    }

    fn meta_table(&self) -> &'static str {
        "folder_meta"
    }

    fn columns(&self) -> &'static [ColumnDef] {
        FOLDER_COLUMNS
    }

    fn orderable_columns(&self) -> &'static [&'static str] {
        &["id", "name"]
    }

    fn filterable_columns(&self) -> &'static [&'static str] {
        &["name"]
    }

    fn title_column(&self) -> Option<&'static str> {
        Some("name")
    }
}

///
/// ItemSchema
///

pub(crate) struct ItemSchema;

pub(crate) static ITEM: ItemSchema = ItemSchema;

const ITEM_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", FieldType::Uint),
    ColumnDef::new("folder_id", FieldType::Uint),
    ColumnDef::new("label", FieldType::Text),
    ColumnDef::new("sort", FieldType::Int),
    ColumnDef::new("linked_item", FieldType::Uint),
];

const ITEM_PARENTS: &[ParentLink] = &[ParentLink::new("folder_id", EntitySlug::new("folder"))];
const ITEM_REFS: &[BatchRef] = &[BatchRef::new("linked_item", EntitySlug::new("item"))];

impl EntitySchema for ItemSchema {
    fn slug(&self) -> EntitySlug {
        EntitySlug::new("item")
    }

    fn table(&self) -> &'static str {
        "items"
    }

    fn meta_table(&self) -> &'static str {
        "item_meta"
    }

    fn columns(&self) -> &'static [ColumnDef] {
        ITEM_COLUMNS
    }

    fn sort_column(&self) -> Option<&'static str> {
        Some("sort")
    }

    fn parent_links(&self) -> &'static [ParentLink] {
        ITEM_PARENTS
    }

    fn batch_refs(&self) -> &'static [BatchRef] {
        ITEM_REFS
    }

    fn orderable_columns(&self) -> &'static [&'static str] {
        &["id", "sort"]
    }

    fn filterable_columns(&self) -> &'static [&'static str] {
        &["folder_id", "label"]
    }
}

///
/// NoteSchema
///

pub(crate) struct NoteSchema;

pub(crate) static NOTE: NoteSchema = NoteSchema;

const NOTE_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", FieldType::Uint),
    ColumnDef::new("item_id", FieldType::Uint),
    ColumnDef::new("body", FieldType::Text),
];

const NOTE_PARENTS: &[ParentLink] = &[ParentLink::new("item_id", EntitySlug::new("item"))];

impl EntitySchema for NoteSchema {
    fn slug(&self) -> EntitySlug {
        EntitySlug::new("note")
    }

    fn table(&self) -> &'static str {
        "notes"
    }

    fn meta_table(&self) -> &'static str {
        "note_meta"
    }

    fn columns(&self) -> &'static [ColumnDef] {
        NOTE_COLUMNS
    }

    fn parent_links(&self) -> &'static [ParentLink] {
        NOTE_PARENTS
    }

    fn filterable_columns(&self) -> &'static [&'static str] {
        &["item_id"]
    }
}

pub(crate) fn manager_for(
    schema: &'static dyn EntitySchema,
    store: &Arc<MemoryRowStore>,
    cache: &Arc<MemoryCache>,
) -> Manager {
    Manager::new(schema, store.clone(), cache.clone())
}

/// Registry over fresh in-memory substrates: folder → item → note.
pub(crate) fn folder_registry() -> (Registry, Arc<MemoryRowStore>, Arc<MemoryCache>) {
    let store = Arc::new(MemoryRowStore::new());
    let cache = Arc::new(MemoryCache::new());

    let mut builder = Registry::builder();
    builder
        .register(manager_for(&FOLDER, &store, &cache))
        .expect("register folder");
    builder
        .register(manager_for(&ITEM, &store, &cache))
        .expect("register item");
    builder
        .register(manager_for(&NOTE, &store, &cache))
        .expect("register note");

    builder
        .link(FOLDER.slug(), ITEM.slug())
        .expect("link folder -> item");
    builder
        .link(ITEM.slug(), NOTE.slug())
        .expect("link item -> note");

    (builder.build(), store, cache)
}
