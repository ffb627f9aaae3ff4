use crate::{
    duplicate::{self, DuplicationListener, DuplicationOutcome},
    error::Error,
    manager::Manager,
    types::{EntitySlug, Id},
};
use parking_lot::RwLock;
use std::{collections::BTreeMap, sync::Arc};
use thiserror::Error as ThisError;

///
/// RegistryError
///

#[derive(Debug, ThisError)]
pub enum RegistryError {
    #[error("no manager registered for '{0}'")]
    UnknownEntity(EntitySlug),

    #[error("manager for '{0}' already registered")]
    AlreadyRegistered(EntitySlug),

    #[error("linking {child} under {parent} would make a type its own ancestor")]
    RelationshipCycle {
        parent: EntitySlug,
        child: EntitySlug,
    },
}

impl RegistryError {
    #[must_use]
    pub(crate) const fn class(&self) -> crate::error::ErrorClass {
        match self {
            Self::UnknownEntity(_) => crate::error::ErrorClass::NotFound,
            Self::AlreadyRegistered(_) | Self::RelationshipCycle { .. } => {
                crate::error::ErrorClass::InvariantViolation
            }
        }
    }
}

///
/// RegistryBuilder
///
/// Construction-time wiring: managers first, then parent/child links.
/// Links are validated against the accumulated graph, so no type can ever
/// become its own ancestor.
///

#[derive(Default)]
pub struct RegistryBuilder {
    managers: BTreeMap<EntitySlug, Arc<Manager>>,
    links: Vec<(EntitySlug, EntitySlug)>,
}

impl RegistryBuilder {
    pub fn register(&mut self, manager: Manager) -> Result<(), RegistryError> {
        let slug = manager.slug();
        if self.managers.contains_key(&slug) {
            return Err(RegistryError::AlreadyRegistered(slug));
        }

        self.managers.insert(slug, Arc::new(manager));
        Ok(())
    }

    /// Declare `child` a child type of `parent`. Link order is traversal
    /// order for cascade delete and duplication.
    pub fn link(&mut self, parent: EntitySlug, child: EntitySlug) -> Result<(), RegistryError> {
        if !self.managers.contains_key(&parent) {
            return Err(RegistryError::UnknownEntity(parent));
        }
        if !self.managers.contains_key(&child) {
            return Err(RegistryError::UnknownEntity(child));
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(RegistryError::RelationshipCycle { parent, child });
        }

        self.links.push((parent, child));
        Ok(())
    }

    // True when `candidate` is an ancestor of `slug` in the links so far.
    fn is_ancestor(&self, candidate: EntitySlug, slug: EntitySlug) -> bool {
        self.links
            .iter()
            .filter(|(_, child)| *child == slug)
            .any(|(parent, _)| *parent == candidate || self.is_ancestor(candidate, *parent))
    }

    #[must_use]
    pub fn build(self) -> Registry {
        for (parent, child) in &self.links {
            // both sides were validated at link time
            if let (Some(p), Some(c)) = (self.managers.get(parent), self.managers.get(child)) {
                p.link_child(*child);
                c.link_parent(*parent);
            }
        }

        Registry {
            managers: self.managers,
            listeners: RwLock::new(Vec::new()),
        }
    }
}

///
/// Registry
///
/// Slug-keyed manager lookup, built once at startup and passed by
/// reference to everything that needs entity access. There is no ambient
/// global instance.
///

pub struct Registry {
    managers: BTreeMap<EntitySlug, Arc<Manager>>,
    listeners: RwLock<Vec<Box<dyn DuplicationListener>>>,
}

impl Registry {
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn manager(&self, slug: EntitySlug) -> Result<Arc<Manager>, Error> {
        self.managers
            .get(&slug)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownEntity(slug).into())
    }

    pub fn managers(&self) -> impl Iterator<Item = &Arc<Manager>> + '_ {
        self.managers.values()
    }

    /// Register a duplication listener; every completed duplication
    /// notifies each listener with the outcome and translation tables.
    pub fn subscribe(&self, listener: Box<dyn DuplicationListener>) {
        self.listeners.write().push(listener);
    }

    pub(crate) fn notify_duplicated(&self, outcome: &DuplicationOutcome) {
        for listener in self.listeners.read().iter() {
            listener.on_duplicated(outcome);
        }
    }

    /// Deep-copy an entity and its descendants, returning the outcome with
    /// every per-type translation table.
    pub fn duplicate(&self, slug: EntitySlug, id: Id) -> Result<DuplicationOutcome, Error> {
        duplicate::duplicate(self, slug, id)
    }

    /// Cascade-delete an entity and its descendants.
    pub fn delete(&self, slug: EntitySlug, id: Id) -> Result<(), Error> {
        self.manager(slug)?.delete(self, id)
    }
}
