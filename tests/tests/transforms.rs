//! Transform integration tests.

use magic_tests::prelude::*;
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;

#[test]
fn test_on_set() {
    let mut user = OnSetUser::booted().unwrap();
    user.set("firstName", " j ").unwrap();
    assert_eq!(user.get("firstName").unwrap(), Value::from("J"));
    assert_eq!(raw_value(&user, "firstName").unwrap(), Value::from("J"));
}

#[test]
fn test_on_get() {
    let mut user = OnGetUser::booted().unwrap();
    user.set("firstName", " j ").unwrap();
    assert_eq!(user.get("firstName").unwrap(), Value::from("J"));
    assert_eq!(raw_value(&user, "firstName").unwrap(), Value::from(" j "));
}

#[test]
fn test_on_set_and_on_get() {
    // GIVEN a property encoded on write and decoded on read
    let mut user = OnSetAndGetUser::booted().unwrap();

    // WHEN a map is written
    let data = BTreeMap::from([("name".to_string(), Value::from("j"))]);
    user.set("data", Value::Map(data)).unwrap();

    // THEN the read is an object and the stored value is JSON text
    let read = user.get("data").unwrap();
    assert_eq!(
        read.as_object().and_then(|object| object.get("name")),
        Some(&Value::from("j"))
    );
    assert_eq!(user.data, r#"{"name":"j"}"#);
}

#[test]
fn test_host_methods_as_transformers() {
    let mut user = CustomCallableUser::booted().unwrap();
    user.set("number", 1).unwrap();
    assert_eq!(user.get("number").unwrap(), Value::Int(1));
    assert_eq!(raw_value(&user, "number").unwrap(), Value::Int(2));
}

#[test]
fn test_transformers_see_current_host_state() {
    let mut user = CustomInstanceCallableUser::booted().unwrap();
    user.set("number", 1).unwrap();
    assert_eq!(user.get("number").unwrap(), Value::Int(2));
    assert_eq!(raw_value(&user, "number").unwrap(), Value::Int(1));

    user.set("offset", 2).unwrap();
    assert_eq!(user.get("number").unwrap(), Value::Int(3));
    assert_eq!(raw_value(&user, "number").unwrap(), Value::Int(1));
}

#[test]
fn test_before_handlers_wrap_transforms() {
    // GIVEN a before-set handler that normalizes input ahead of the transform
    let mut user = OnSetUser::booted().unwrap();
    user.on_before_set("first*", |_, event| {
        if event.input().as_str() == Some("stop") {
            event.stop();
        }
        Ok(())
    })
    .unwrap();

    // WHEN the handler stops the event
    user.set("firstName", "stop").unwrap();

    // THEN the on phase never wrote
    assert_eq!(user.first_name, "");

    user.set("firstName", "go").unwrap();
    assert_eq!(user.first_name, "GO");
}
