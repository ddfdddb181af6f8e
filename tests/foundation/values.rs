//! Integration tests for marker payload values
//!
//! Tests construction, field access, and display.

use extmodel_foundation::Value;

#[test]
fn value_default_is_nil() {
    assert!(Value::default().is_nil());
    assert_eq!(Value::Nil.type_name(), "nil");
}

#[test]
fn value_scalars() {
    assert_eq!(Value::from(true).as_bool(), Some(true));
    assert_eq!(Value::from(42_i64).as_int(), Some(42));
    assert_eq!(Value::from("WAIT").as_str(), Some("WAIT"));
    assert_eq!(Value::from("WAIT").as_int(), None);
}

#[test]
fn map_payload_fields() {
    let payload = Value::map([
        ("default", Value::from("FAIL")),
        ("supported", Value::list([Value::from("FAIL"), Value::from("DROP")])),
    ]);
    assert_eq!(payload.get_str("default"), Some("FAIL"));
    assert_eq!(
        payload.get("supported").map(Value::string_items),
        Some(vec!["FAIL", "DROP"])
    );
    assert_eq!(payload.get_str("supported"), None);
}

#[test]
fn equal_payloads_compare_equal() {
    let a = Value::map([("name", Value::from("LISTENER"))]);
    let b = Value::map([("name", Value::from("LISTENER"))]);
    assert_eq!(a, b);
    assert_ne!(a, Value::map([("name", Value::from("REQUEST"))]));
}

#[test]
fn display_strings_are_quoted() {
    assert_eq!(Value::from("x").to_string(), "\"x\"");
    assert_eq!(Value::list([Value::Int(1), Value::Int(2)]).to_string(), "[1 2]");
}
