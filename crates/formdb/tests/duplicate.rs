mod common;

use common::open_memory;
use formdb::prelude::*;

/// The full remap scenario: a form with one container holding two
/// elements, where the first element's setting references the second
/// element — a forward sibling reference, since the second clones later.
#[test]
fn duplicated_settings_point_at_the_cloned_sibling() {
    let fx = open_memory();

    let form = fx.add_form("Original");
    let container = fx.add_container(form, "page one");
    let first = fx.add_element(container, "first", "textfield");
    let second = fx.add_element(container, "second", "textfield");

    let settings = fx.manager(EntityKind::ElementSetting);
    settings
        .add(
            &Row::new()
                .with("element_id", first)
                .with("name", "linked_element")
                .with("value", second.to_string()),
        )
        .expect("sibling-referencing setting");

    let outcome = fx
        .registry
        .duplicate(EntityKind::Form.slug(), form)
        .expect("duplicate");

    // a fresh form exists
    assert_ne!(outcome.duplicate, form);
    fx.manager(EntityKind::Form)
        .get(outcome.duplicate)
        .expect("cloned form");

    // the cloned container points at the cloned form
    let containers = fx.manager(EntityKind::Container);
    let new_container = outcome
        .translations
        .lookup(EntityKind::Container.slug(), container)
        .expect("container mapped");
    let cloned_container = containers.get(new_container).expect("cloned container");
    assert_eq!(
        cloned_container.get("form_id"),
        Some(&Value::Uint(outcome.duplicate.get()))
    );

    // both elements cloned under the cloned container
    let elements = fx.manager(EntityKind::Element);
    let cloned_elements = elements
        .query(&QueryArgs::new().filter("container_id", Value::from(new_container)))
        .expect("cloned elements");
    assert_eq!(cloned_elements.len(), 2);

    // the duplicated setting holds the *new* id of the second element
    let new_first = outcome
        .translations
        .lookup(EntityKind::Element.slug(), first)
        .expect("first mapped");
    let new_second = outcome
        .translations
        .lookup(EntityKind::Element.slug(), second)
        .expect("second mapped");
    assert_ne!(new_second, second);

    let cloned_settings = settings
        .query(&QueryArgs::new().filter("element_id", Value::from(new_first)))
        .expect("cloned settings");
    let mut cloned_settings = cloned_settings;
    cloned_settings
        .transform_into_models(&settings)
        .expect("hydrate");
    let setting = cloned_settings.get_model(0).expect("one setting");

    assert_eq!(
        setting.get("value"),
        Some(&Value::Text(new_second.to_string())),
        "forward sibling reference must be remapped"
    );
}

#[test]
fn plain_setting_values_are_left_alone() {
    let fx = open_memory();

    let form = fx.add_form("Plain");
    let container = fx.add_container(form, "page");
    let element = fx.add_element(container, "q", "textfield");

    let settings = fx.manager(EntityKind::ElementSetting);
    settings
        .add(
            &Row::new()
                .with("element_id", element)
                .with("name", "placeholder")
                .with("value", "Your answer..."),
        )
        .expect("plain setting");

    let outcome = fx
        .registry
        .duplicate(EntityKind::Form.slug(), form)
        .expect("duplicate");

    let new_element = outcome
        .translations
        .lookup(EntityKind::Element.slug(), element)
        .expect("mapped");
    let mut cloned = settings
        .query(&QueryArgs::new().filter("element_id", Value::from(new_element)))
        .expect("cloned settings");
    cloned.transform_into_models(&settings).expect("hydrate");

    assert_eq!(
        cloned.get_model(0).expect("setting").get("value"),
        Some(&Value::Text("Your answer...".into()))
    );
}

#[test]
fn submission_values_follow_their_elements_across_the_copy() {
    let fx = open_memory();

    let form = fx.add_form("Answered");
    let container = fx.add_container(form, "page");
    let element = fx.add_element(container, "q", "textfield");

    let submissions = fx.manager(EntityKind::Submission);
    let submission = submissions
        .add(&Row::new().with("form_id", form).with("user_id", 7_u64))
        .expect("submission");

    let values = fx.manager(EntityKind::SubmissionValue);
    values
        .add(
            &Row::new()
                .with("submission_id", submission)
                .with("element_id", element)
                .with("value", "hello"),
        )
        .expect("submission value");

    let outcome = fx
        .registry
        .duplicate(EntityKind::Form.slug(), form)
        .expect("duplicate");

    let new_submission = outcome
        .translations
        .lookup(EntityKind::Submission.slug(), submission)
        .expect("submission mapped");
    let new_element = outcome
        .translations
        .lookup(EntityKind::Element.slug(), element)
        .expect("element mapped");

    let mut cloned = values
        .query(&QueryArgs::new().filter("submission_id", Value::from(new_submission)))
        .expect("cloned values");
    cloned.transform_into_models(&values).expect("hydrate");
    let value = cloned.get_model(0).expect("one value");

    assert_eq!(
        value.get("element_id"),
        Some(&Value::Uint(new_element.get())),
        "cross-entity pointer must land on the cloned element"
    );
    assert_eq!(value.get("value"), Some(&Value::Text("hello".into())));
}

#[test]
fn duplication_copies_meta_and_notifies_listeners() {
    use parking_lot::Mutex;
    use std::sync::Arc;

    struct Recorder(Arc<Mutex<Vec<Id>>>);

    impl DuplicationListener for Recorder {
        fn on_duplicated(&self, outcome: &DuplicationOutcome) {
            self.0.lock().push(outcome.duplicate);
        }
    }

    let fx = open_memory();
    let form = fx.add_form("Observed");
    fx.manager(EntityKind::Form)
        .update_meta(form, "redirect_url", Value::Text("/done".into()))
        .expect("meta");

    let seen = Arc::new(Mutex::new(Vec::new()));
    fx.registry.subscribe(Box::new(Recorder(Arc::clone(&seen))));

    let outcome = fx
        .registry
        .duplicate(EntityKind::Form.slug(), form)
        .expect("duplicate");

    assert_eq!(seen.lock().as_slice(), &[outcome.duplicate]);
    assert_eq!(
        fx.manager(EntityKind::Form)
            .meta_first(outcome.duplicate, "redirect_url")
            .expect("clone meta"),
        Some(Value::Text("/done".into()))
    );
}

#[test]
fn the_source_subtree_is_untouched_by_duplication() {
    let fx = open_memory();

    let form = fx.add_form("Source");
    let container = fx.add_container(form, "page");
    let element = fx.add_element(container, "q", "textfield");

    fx.registry
        .duplicate(EntityKind::Form.slug(), form)
        .expect("duplicate");

    let original = fx
        .manager(EntityKind::Element)
        .get(element)
        .expect("source element still present");
    assert_eq!(original.get("container_id"), Some(&Value::Uint(container.get())));
    assert_eq!(fx.store.row_count("forms"), 2);
}
