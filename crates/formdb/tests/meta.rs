mod common;

use common::open_memory;
use formdb::prelude::*;

#[test]
fn undeclared_attributes_live_in_the_meta_tier() {
    let fx = open_memory();
    let forms = fx.manager(EntityKind::Form);
    let id = fx.add_form("Meta host");

    assert!(!forms.meta_is_set(id, "redirect_url").expect("initially unset"));

    forms
        .update_meta(id, "redirect_url", Value::Text("/thanks".into()))
        .expect("set meta");

    // full reload with an empty cache: the value must come from the store
    let cold = fx.cold_reload();
    let cold_forms = cold.manager(EntityKind::Form.slug()).expect("forms");

    assert!(cold_forms.meta_is_set(id, "redirect_url").expect("set after reload"));
    assert_eq!(
        cold_forms.meta_first(id, "redirect_url").expect("read"),
        Some(Value::Text("/thanks".into()))
    );
}

#[test]
fn null_deletes_the_meta_key() {
    let fx = open_memory();
    let forms = fx.manager(EntityKind::Form);
    let id = fx.add_form("Meta host");

    forms
        .update_meta(id, "limit", Value::Uint(100))
        .expect("set");
    forms
        .update_meta(id, "limit", Value::Null)
        .expect("null deletes");

    let cold = fx.cold_reload();
    let cold_forms = cold.manager(EntityKind::Form.slug()).expect("forms");
    assert!(!cold_forms.meta_is_set(id, "limit").expect("unset after reload"));
    assert_eq!(fx.store.row_count("form_meta"), 0);
}

#[test]
fn meta_keys_are_scoped_per_owner() {
    let fx = open_memory();
    let forms = fx.manager(EntityKind::Form);
    let first = fx.add_form("First");
    let second = fx.add_form("Second");

    forms
        .update_meta(first, "shared_key", Value::Text("one".into()))
        .expect("set");
    forms
        .update_meta(second, "shared_key", Value::Text("two".into()))
        .expect("set");

    assert_eq!(
        forms.meta_first(first, "shared_key").expect("read"),
        Some(Value::Text("one".into()))
    );
    assert_eq!(
        forms.meta_first(second, "shared_key").expect("read"),
        Some(Value::Text("two".into()))
    );
}

#[test]
fn single_valued_keys_replace_on_append() {
    let fx = open_memory();
    let forms = fx.manager(EntityKind::Form);
    let id = fx.add_form("Single");

    forms
        .add_meta(id, "redirect_url", Value::Text("/first".into()))
        .expect("set");
    forms
        .add_meta(id, "redirect_url", Value::Text("/second".into()))
        .expect("replace");

    let values = forms.meta(id, "redirect_url").expect("read");
    assert_eq!(values, vec![Value::Text("/second".into())]);
}

#[test]
fn multi_valued_keys_accumulate_in_order() {
    let fx = open_memory();
    let forms = fx.manager(EntityKind::Form);
    let id = fx.add_form("Tagged");

    for tag in ["alpha", "beta", "gamma"] {
        forms
            .add_meta(id, "tag", Value::Text(tag.into()))
            .expect("append");
    }

    let values = forms.meta(id, "tag").expect("read");
    assert_eq!(
        values,
        vec![
            Value::Text("alpha".into()),
            Value::Text("beta".into()),
            Value::Text("gamma".into()),
        ]
    );
}
