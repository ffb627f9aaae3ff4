//! Shared fixture: a wired registry over fresh in-memory substrates, with
//! handles kept so tests can assert raw row counts and rebuild cold-cache
//! views of the same data.
#![allow(dead_code)]

use formdb::prelude::*;
use std::sync::Arc;

pub struct Fixture {
    pub registry: Registry,
    pub store: Arc<MemoryRowStore>,
    pub cache: Arc<MemoryCache>,
}

pub fn open_memory() -> Fixture {
    let store = Arc::new(MemoryRowStore::new());
    let cache = Arc::new(MemoryCache::new());
    let registry = formdb::open(store.clone(), cache.clone()).expect("wired registry");

    Fixture {
        registry,
        store,
        cache,
    }
}

impl Fixture {
    pub fn manager(&self, kind: EntityKind) -> Arc<Manager> {
        self.registry.manager(kind.slug()).expect("manager per kind")
    }

    /// Same rows, empty cache: what a fresh process would see.
    pub fn cold_reload(&self) -> Registry {
        formdb::open(self.store.clone(), Arc::new(MemoryCache::new()))
            .expect("cold registry over the same store")
    }

    pub fn add_form(&self, title: &str) -> Id {
        self.manager(EntityKind::Form)
            .add(&Row::new().with("title", title))
            .expect("add form")
    }

    pub fn add_container(&self, form: Id, label: &str) -> Id {
        self.manager(EntityKind::Container)
            .add(&Row::new().with("form_id", form).with("label", label))
            .expect("add container")
    }

    pub fn add_element(&self, container: Id, label: &str, kind: &str) -> Id {
        self.manager(EntityKind::Element)
            .add(
                &Row::new()
                    .with("container_id", container)
                    .with("label", label)
                    .with("type", kind),
            )
            .expect("add element")
    }
}
