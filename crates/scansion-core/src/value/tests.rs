use super::*;

#[test]
fn all_null_requires_at_least_one_value() {
    assert!(!Value::all_null(&[]));
    assert!(Value::all_null(&[Value::Null, Value::Null]));
    assert!(!Value::all_null(&[Value::Null, Value::Int(0)]));
}

#[test]
fn key_eq_bridges_signed_and_unsigned() {
    assert!(Value::Int(3).key_eq(&Value::Uint(3)));
    assert!(Value::Uint(3).key_eq(&Value::Int(3)));
    assert!(!Value::Int(-3).key_eq(&Value::Uint(3)));
    assert!(!Value::Int(3).key_eq(&Value::text("3")));
    assert!(Value::text("a").key_eq(&Value::text("a")));
}

#[test]
fn key_eq_compares_floats_by_bits() {
    assert!(Value::Float64(f64::NAN).key_eq(&Value::Float64(f64::NAN)));
    assert!(Value::Float64(1.5).key_eq(&Value::Float64(1.5)));
    assert!(!Value::Float64(0.0).key_eq(&Value::Float64(-0.0)));
    assert!(!Value::Float64(3.0).key_eq(&Value::Int(3)));
}

#[test]
fn integer_accessors_check_range() {
    assert_eq!(Value::Uint(u64::MAX).as_i64(), None);
    assert_eq!(Value::Int(-1).as_u64(), None);
    assert_eq!(Value::Int(42).as_u64(), Some(42));
    assert_eq!(Value::text("42").as_i64(), None);
}

#[test]
fn from_option_maps_none_to_null() {
    assert_eq!(Value::from(None::<i64>), Value::Null);
    assert_eq!(Value::from(Some("Dublin")), Value::text("Dublin"));
    assert_eq!(Value::from(7_u32), Value::Uint(7));
}

#[test]
fn display_is_readable() {
    assert_eq!(Value::Null.to_string(), "NULL");
    assert_eq!(Value::text("Snow Crash").to_string(), "'Snow Crash'");
    assert_eq!(Value::Blob(vec![1, 2, 3]).to_string(), "<3 bytes>");
}

#[test]
fn value_serde_round_trip_preserves_variant() {
    let values = vec![
        Value::Null,
        Value::Int(-4),
        Value::Uint(4),
        Value::text("x"),
    ];

    let json = serde_json::to_string(&values).expect("serialize values");
    let decoded: Vec<Value> = serde_json::from_str(&json).expect("deserialize values");

    assert_eq!(decoded, values);
}
