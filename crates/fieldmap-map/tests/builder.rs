use fieldmap_map::{OutputBuilder, build, build_batch, build_with_report};
use fieldmap_model::{FieldMapping, MappingConfig, NumberStyle, Transformation};
use serde_json::json;

fn config(raw: serde_json::Value) -> MappingConfig {
    serde_json::from_value(raw).expect("valid mapping config")
}

#[test]
fn direct_mapping_nests_target() {
    let output = build(&json!({"a": 1, "b": 2}), &[FieldMapping::direct("a", "x.y")]);
    assert_eq!(output, json!({"x": {"y": 1}}));
}

#[test]
fn empty_mapping_list_yields_empty_object() {
    assert_eq!(build(&json!({"a": 1}), &[]), json!({}));
}

#[test]
fn later_writes_win() {
    let mappings = vec![
        FieldMapping::direct("a", "out"),
        FieldMapping::direct("b", "out"),
    ];
    assert_eq!(build(&json!({"a": 1, "b": 2}), &mappings), json!({"out": 2}));
}

#[test]
fn missing_source_is_written_as_absent() {
    let mappings = vec![
        FieldMapping::direct("a", "out"),
        FieldMapping::direct("missing", "out"),
        FieldMapping::direct("missing", "nested.value"),
    ];
    let output = build(&json!({"a": 1}), &mappings);
    assert_eq!(output, json!({"nested": {}}));
}

#[test]
fn null_source_is_kept() {
    let output = build(&json!({"a": null}), &[FieldMapping::direct("a", "b")]);
    assert_eq!(output, json!({"b": null}));
}

#[test]
fn applies_wire_configured_transformations() {
    let config = config(json!({
        "sourceFields": [],
        "targetFields": [],
        "fieldMappings": [
            {"sourceField": "customer.name", "targetField": "client.fullName",
             "transformation": {"type": "stringManipulation", "config": "uppercase"}},
            {"sourceField": "customer.status", "targetField": "client.status",
             "transformation": {"type": "lookup", "config": {"A": "Active", "I": "Inactive"}}},
            {"sourceField": "order.total", "targetField": "invoice.amount",
             "transformation": {"type": "numberFormat", "config": "decimal2"}},
            {"sourceField": "order.placed", "targetField": "invoice.date",
             "transformation": {"type": "dateFormat", "config": "short"}},
            {"sourceField": "order.items[1].qty", "targetField": "invoice.lines[0].quantity",
             "transformation": {"type": "customScript", "config": "return source * 2;"}}
        ]
    }));
    let source = json!({
        "customer": {"name": "ada lovelace", "status": "A"},
        "order": {
            "total": 12.5,
            "placed": "2024-03-05",
            "items": [{"qty": 1}, {"qty": 4}]
        }
    });

    let output = build(&source, &config.field_mappings);

    assert_eq!(
        output,
        json!({
            "client": {"fullName": "ADA LOVELACE", "status": "Active"},
            "invoice": {
                "amount": "12.50",
                "date": "3/5/2024",
                "lines": [{"quantity": 8}]
            }
        })
    );
}

#[test]
fn output_keys_follow_first_write_order() {
    let mappings = vec![
        FieldMapping::direct("z", "zeta"),
        FieldMapping::direct("a", "alpha"),
        FieldMapping::direct("m", "zeta"),
    ];
    let output = build(&json!({"a": 1, "m": 2, "z": 3}), &mappings);
    assert_eq!(
        serde_json::to_string(&output).expect("serialize output"),
        r#"{"zeta":2,"alpha":1}"#
    );
}

#[test]
fn absent_first_write_still_fixes_key_order() {
    let mappings = vec![
        FieldMapping::direct("missing", "a"),
        FieldMapping::direct("two", "b"),
        FieldMapping::direct("one", "a"),
    ];
    let output = build(&json!({"one": 1, "two": 2}), &mappings);
    assert_eq!(
        serde_json::to_string(&output).expect("serialize output"),
        r#"{"a":1,"b":2}"#
    );
}

#[test]
fn absent_write_clears_earlier_nested_value() {
    let mappings = vec![
        FieldMapping::direct("x", "out.deep"),
        FieldMapping::direct("missing", "out"),
        FieldMapping::direct("missing", "gone"),
        FieldMapping::direct("x", "gone.inner"),
    ];
    let (output, report) = build_with_report(&json!({"x": 5}), &mappings);
    assert_eq!(output, json!({"gone": {"inner": 5}}));
    assert_eq!(report.written, 4);
    assert_eq!(report.missing_source, 2);
}

#[test]
fn failing_script_passes_value_through() {
    let mappings = vec![
        FieldMapping::direct("a", "b")
            .with_transformation(Transformation::CustomScript(Some("source.".into()))),
    ];
    assert_eq!(build(&json!({"a": "keep"}), &mappings), json!({"b": "keep"}));
}

#[test]
fn inert_transformation_passes_value_through() {
    let mappings = vec![FieldMapping::direct("a", "b").with_transformation(Transformation::NumberFormat(None))];
    let (output, report) = build_with_report(&json!({"a": "7.5"}), &mappings);
    assert_eq!(output, json!({"b": "7.5"}));
    assert_eq!(report.written, 1);
}

#[test]
fn batch_maps_each_row() {
    let mappings = vec![
        FieldMapping::direct("id", "customer.id")
            .with_transformation(Transformation::NumberFormat(Some(NumberStyle::Integer))),
        FieldMapping::direct("name", "customer.name"),
    ];
    let rows = json!([
        {"id": "1", "name": "Alice"},
        {"id": "2", "name": "Bob"}
    ]);

    let output = build_batch(&rows, &mappings);

    insta::assert_json_snapshot!(output, @r#"
    [
      {
        "customer": {
          "id": 1,
          "name": "Alice"
        }
      },
      {
        "customer": {
          "id": 2,
          "name": "Bob"
        }
      }
    ]
    "#);
}

#[test]
fn batch_maps_non_array_once() {
    let mappings = vec![FieldMapping::direct("a", "b")];
    let builder = OutputBuilder::new(&mappings);
    let (output, report) = builder.build_batch(&json!({"a": true}));
    assert_eq!(output, json!({"b": true}));
    assert_eq!(report.written, 1);
}

#[test]
fn source_document_is_not_modified() {
    let source = json!({"a": {"b": [1, 2]}});
    let before = source.clone();
    let _ = build(&source, &[FieldMapping::direct("a.b[1]", "a.b[5]")]);
    assert_eq!(source, before);
}
