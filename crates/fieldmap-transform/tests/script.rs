use fieldmap_transform::script::{MAX_SOURCE_BYTES, Script, evaluate};
use fieldmap_transform::{ScriptError, TransformError};
use proptest::prelude::*;
use serde_json::{Value, json};

fn run(code: &str, source: Value) -> Option<Value> {
    evaluate(code, Some(&source)).expect("script evaluates")
}

#[test]
fn builtins_cover_common_cleanup() {
    assert_eq!(run("upper(trim(source))", json!("  ada ")), Some(json!("ADA")));
    assert_eq!(run("source.split('-').join('/')", json!("2024-01-15")), Some(json!("2024/01/15")));
    assert_eq!(run("source.substring(0, 3)", json!("Lovelace")), Some(json!("Lov")));
    assert_eq!(run("source.length", json!("four")), Some(json!(4)));
    assert_eq!(run("concat(source.first, ' ', source.last)", json!({"first": "Ada", "last": "L"})), Some(json!("Ada L")));
    assert_eq!(run("source.replace('x', 'y')", json!("axbx")), Some(json!("aybx")));
    assert_eq!(run("source.startsWith('SKU') ? 'sku' : 'other'", json!("SKU-1")), Some(json!("sku")));
}

#[test]
fn arithmetic_and_numbers() {
    assert_eq!(run("source * 2 + 1", json!(20)), Some(json!(41)));
    assert_eq!(run("number(source) / 4", json!("10")), Some(json!(2.5)));
    assert_eq!(run("round(source)", json!(2.5)), Some(json!(3)));
    assert_eq!(run("source.toFixed(2)", json!(1.005)), Some(json!("1.00")));
    assert_eq!(run("abs(floor(source))", json!(-1.5)), Some(json!(2)));
    assert_eq!(run("source % 3", json!(10)), Some(json!(1)));
    assert_eq!(run("1 / 0", json!(null)), Some(Value::Null));
}

#[test]
fn logic_and_comparison() {
    assert_eq!(run("source > 10 && source < 20", json!(15)), Some(json!(true)));
    assert_eq!(run("source || 'fallback'", json!("")), Some(json!("fallback")));
    assert_eq!(run("source == 1", json!("1")), Some(json!(true)));
    assert_eq!(run("source === 1", json!("1")), Some(json!(false)));
    assert_eq!(run("!source", json!(0)), Some(json!(true)));
    assert_eq!(run("default(source.nick, source.name)", json!({"name": "Ada"})), Some(json!("Ada")));
}

#[test]
fn indexing_and_missing_properties() {
    let order = json!({"items": [{"sku": "A1"}, {"sku": "B2"}]});
    assert_eq!(run("source.items[1].sku", order.clone()), Some(json!("B2")));
    assert_eq!(run("source['items'].length", order.clone()), Some(json!(2)));
    assert_eq!(run("source.missing", order), None);
}

#[test]
fn absent_source_is_undefined() {
    assert_eq!(evaluate("source", None).unwrap(), None);
    assert_eq!(evaluate("coalesce(source, 'none')", None).unwrap(), Some(json!("none")));
    assert_eq!(evaluate("source === undefined", None).unwrap(), Some(json!(true)));
}

#[test]
fn compiled_scripts_are_reusable() {
    let script = Script::compile("lower(source)").expect("compile");
    assert_eq!(script.eval(Some(&json!("A"))).unwrap(), Some(json!("a")));
    assert_eq!(script.eval(Some(&json!("B"))).unwrap(), Some(json!("b")));
}

#[test]
fn code_is_never_executed() {
    for code in [
        "process.exit(1)",
        "require('fs')",
        "globalThis",
        "source.constructor.constructor('return 1')()",
        "x = 1",
        "eval('1')",
    ] {
        assert!(evaluate(code, Some(&json!("v"))).is_err(), "{code}");
    }
}

#[test]
fn limits_are_enforced() {
    let long = format!("'{}'", "a".repeat(MAX_SOURCE_BYTES));
    assert!(matches!(
        Script::compile(&long),
        Err(ScriptError::LimitExceeded { .. })
    ));

    let chain = vec!["source"; 100].join(" + ");
    assert!(matches!(
        Script::compile(&chain),
        Err(ScriptError::LimitExceeded { .. })
    ));

    let big = "x".repeat(40 * 1024);
    assert!(matches!(
        evaluate("source + source", Some(&json!(big))),
        Err(ScriptError::LimitExceeded { .. })
    ));
}

#[test]
fn errors_convert_into_transform_errors() {
    let err: TransformError = evaluate("nope()", None).unwrap_err().into();
    assert_eq!(err.to_string(), "custom script failed: unknown function `nope`");
}

proptest! {
    #[test]
    fn arbitrary_scripts_never_panic(code in "[a-z0-9 .,()\\[\\]'+*/%<>=!&|?:-]{0,64}") {
        let _ = evaluate(&code, Some(&json!({"a": [1, "two", null], "b": "text"})));
    }

    #[test]
    fn arbitrary_sources_never_panic(text in ".{0,64}", number in any::<f64>()) {
        for code in ["source.trim().toUpperCase()", "number(source).toFixed(2)", "source.split('').slice(-3)"] {
            let _ = evaluate(code, Some(&json!(text)));
            let _ = evaluate(code, Some(&json!(number)));
        }
    }
}
