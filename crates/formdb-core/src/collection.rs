use crate::{error::Error, manager::Manager, model::Model, types::Id};

///
/// FieldMode
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldMode {
    Ids,
    Models,
}

///
/// Items
///
/// Current representation of a collection: raw primary keys or hydrated
/// models.
///

#[derive(Clone, Debug)]
pub enum Items {
    Ids(Vec<Id>),
    Models(Vec<Model>),
}

///
/// Collection
///
/// Ordered result set: one page of ids or models plus the unpaginated
/// match count. `len() <= total()` always holds; `total()` is independent
/// of page size.
///

#[derive(Clone, Debug)]
pub struct Collection {
    items: Items,
    total: u64,
}

impl Collection {
    #[must_use]
    pub const fn from_ids(ids: Vec<Id>, total: u64) -> Self {
        Self {
            items: Items::Ids(ids),
            total,
        }
    }

    #[must_use]
    pub const fn from_models(models: Vec<Model>, total: u64) -> Self {
        Self {
            items: Items::Models(models),
            total,
        }
    }

    /// Entries on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.items {
            Items::Ids(ids) => ids.len(),
            Items::Models(models) => models.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Unpaginated match count.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    #[must_use]
    pub const fn mode(&self) -> FieldMode {
        match &self.items {
            Items::Ids(_) => FieldMode::Ids,
            Items::Models(_) => FieldMode::Models,
        }
    }

    /// Current representation, unmodified.
    #[must_use]
    pub const fn get_raw(&self) -> &Items {
        &self.items
    }

    /// Primary keys of this page, whichever mode it is in.
    #[must_use]
    pub fn ids(&self) -> Vec<Id> {
        match &self.items {
            Items::Ids(ids) => ids.clone(),
            Items::Models(models) => models.iter().map(Model::id).collect(),
        }
    }

    /// Hydrated page, when in models mode.
    #[must_use]
    pub fn models(&self) -> Option<&[Model]> {
        match &self.items {
            Items::Ids(_) => None,
            Items::Models(models) => Some(models),
        }
    }

    #[must_use]
    pub fn get_id(&self, index: usize) -> Option<Id> {
        match &self.items {
            Items::Ids(ids) => ids.get(index).copied(),
            Items::Models(models) => models.get(index).map(Model::id),
        }
    }

    #[must_use]
    pub fn get_model(&self, index: usize) -> Option<&Model> {
        match &self.items {
            Items::Ids(_) => None,
            Items::Models(models) => models.get(index),
        }
    }

    /// Hydrate every id in place. Idempotent: a collection already in
    /// models mode is untouched. Ids that no longer resolve are dropped —
    /// a delete racing a query is last-write-wins, not a caller error.
    pub fn transform_into_models(&mut self, manager: &Manager) -> Result<(), Error> {
        let Items::Ids(ids) = &self.items else {
            return Ok(());
        };

        let mut models = Vec::with_capacity(ids.len());
        for id in ids {
            match manager.get(*id) {
                Ok(model) => models.push(model),
                Err(err) if err.is_not_found() => {}
                Err(err) => return Err(err),
            }
        }
        self.items = Items::Models(models);

        Ok(())
    }

    /// Collapse back to primary keys in place. Idempotent inverse of
    /// `transform_into_models`.
    pub fn transform_into_ids(&mut self) {
        if let Items::Models(models) = &self.items {
            let ids = models.iter().map(Model::id).collect();
            self.items = Items::Ids(ids);
        }
    }

    /// Forward iteration over the current representation.
    #[must_use]
    pub const fn iter(&self) -> Iter<'_> {
        Iter {
            collection: self,
            index: 0,
        }
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = Entry<'a>;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

///
/// Entry
///

#[derive(Clone, Copy, Debug)]
pub enum Entry<'a> {
    Id(Id),
    Model(&'a Model),
}

impl Entry<'_> {
    #[must_use]
    pub fn id(&self) -> Id {
        match self {
            Self::Id(id) => *id,
            Self::Model(model) => model.id(),
        }
    }
}

///
/// Iter
///

pub struct Iter<'a> {
    collection: &'a Collection,
    index: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = Entry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = match &self.collection.items {
            Items::Ids(ids) => ids.get(self.index).copied().map(Entry::Id),
            Items::Models(models) => models.get(self.index).map(Entry::Model),
        };
        if entry.is_some() {
            self.index += 1;
        }
        entry
    }
}
