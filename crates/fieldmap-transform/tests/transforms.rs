use fieldmap_model::{DateStyle, NumberStyle, StringOp, Transformation};
use fieldmap_transform::{Apply, apply};
use serde_json::{Value, json};

fn from_wire(value: Value) -> Transformation {
    serde_json::from_value(value).expect("valid transformation")
}

#[test]
fn decimal2_formats_five() {
    let t = Transformation::NumberFormat(Some(NumberStyle::Decimal2));
    assert_eq!(t.apply(Some(&json!(5))), Some(json!("5.00")));
}

#[test]
fn trim_strips_surrounding_whitespace() {
    let t = Transformation::StringManipulation(Some(StringOp::Trim));
    assert_eq!(t.apply(Some(&json!("  hi  "))), Some(json!("hi")));
}

#[test]
fn wire_configs_drive_behavior() {
    let upper = from_wire(json!({"type": "stringManipulation", "config": "uppercase"}));
    assert_eq!(apply(Some(&json!("abc")), &upper), Some(json!("ABC")));

    let lookup = from_wire(json!({"type": "lookup", "config": "{\"F\":\"Female\"}"}));
    assert_eq!(apply(Some(&json!("F")), &lookup), Some(json!("Female")));

    let iso = from_wire(json!({"type": "dateFormat", "config": "ISO"}));
    assert_eq!(
        apply(Some(&json!("2024-02-29 13:45:00")), &iso),
        Some(json!("2024-02-29T13:45:00.000Z"))
    );

    let script = from_wire(json!({
        "type": "customScript",
        "config": "return source.trim().toUpperCase() + '!';"
    }));
    assert_eq!(apply(Some(&json!(" go ")), &script), Some(json!("GO!")));
}

#[test]
fn unrecognized_keywords_pass_through() {
    for wire in [
        json!({"type": "stringManipulation", "config": "reverse"}),
        json!({"type": "numberFormat", "config": "percent"}),
        json!({"type": "dateFormat"}),
        json!({"type": "lookup", "config": "not json"}),
        json!({"type": "customScript"}),
    ] {
        let t = from_wire(wire);
        assert_eq!(t.apply(Some(&json!("value"))), Some(json!("value")));
        assert_eq!(t.apply(None), None);
    }
}

#[test]
fn dates_accept_epoch_millis_and_skip_falsy() {
    let short = Transformation::DateFormat(Some(DateStyle::Short));
    assert_eq!(short.apply(Some(&json!(0))), Some(json!(0)));
    assert_eq!(short.apply(Some(&json!(1_700_000_000_000_i64))), Some(json!("11/14/2023")));
    assert_eq!(short.apply(Some(&json!(null))), Some(json!(null)));
}

#[test]
fn absent_values_stay_absent_for_every_kind() {
    for t in [
        Transformation::Direct,
        Transformation::StringManipulation(Some(StringOp::Lowercase)),
        Transformation::NumberFormat(Some(NumberStyle::Integer)),
        Transformation::DateFormat(Some(DateStyle::Iso)),
    ] {
        assert_eq!(t.apply(None), None, "{t:?}");
    }
}
