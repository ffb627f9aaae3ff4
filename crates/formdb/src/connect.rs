use crate::kind::EntityKind;
use formdb_core::{
    cache::CacheService, error::Error, manager::Manager, registry::Registry, store::RowStore,
};
use std::sync::Arc;

/// Build a fully wired registry over the given substrates: one manager per
/// entity type plus the parent/child links the cascade and duplication
/// walks traverse. Structural children are linked before data children so
/// a form's elements are always cloned before the submission values that
/// reference them.
pub fn open(store: Arc<dyn RowStore>, cache: Arc<dyn CacheService>) -> Result<Registry, Error> {
    let mut builder = Registry::builder();

    for kind in EntityKind::ALL {
        builder.register(Manager::new(
            kind.schema(),
            Arc::clone(&store),
            Arc::clone(&cache),
        ))?;
    }

    use EntityKind as K;
    for (parent, child) in [
        (K::Form, K::Container),
        (K::Container, K::Element),
        (K::Element, K::ElementSetting),
        (K::Element, K::ElementChoice),
        (K::Form, K::Submission),
        (K::Submission, K::SubmissionValue),
        (K::Form, K::Participant),
    ] {
        builder.link(parent.slug(), child.slug())?;
    }

    Ok(builder.build())
}
