use std::collections::BTreeMap;

use firestore_pipeline::firestore::model::{DatabaseId, VectorValue};
use firestore_pipeline::firestore::pipeline::{
    and, array, constant, document_id, field, map, Constant, Expression, ExpressionOps,
    IntoExpression, TimeUnit,
};
use firestore_pipeline::firestore::remote::{
    decode_expression, encode_aggregate, encode_aliased, encode_expression, encode_ordering,
};
use firestore_pipeline::firestore::JsonProtoSerializer;
use serde_json::{json, Value as JsonValue};

fn serializer() -> JsonProtoSerializer {
    JsonProtoSerializer::new(DatabaseId::default("test-project"))
}

fn encode(expression: impl IntoExpression) -> JsonValue {
    encode_expression(&serializer(), &expression.into_expression())
}

#[test]
fn constants_compare_by_value() {
    assert_eq!(Constant::new(5), Constant::new(5));
    assert_eq!(Constant::new("a"), constant("a"));
    assert_ne!(Constant::new(5), Constant::new(6));
    assert_ne!(Constant::new(true), Constant::new("true"));
}

#[test]
fn operators_leave_receiver_unchanged() {
    let price = field("price").multiply(1.1);
    let before = encode(&price);
    let _ = price.add(1);
    let _ = price.alias("adjusted");
    assert_eq!(encode(&price), before);
}

#[test]
fn literal_and_constant_operands_encode_identically() {
    assert_eq!(
        encode(field("x").add(5)),
        encode(field("x").add(Constant::new(5)))
    );
}

#[test]
fn subtract_keeps_argument_order() {
    assert_eq!(
        encode(field("a").subtract(field("b"))),
        json!({
            "functionValue": {
                "name": "subtract",
                "args": [
                    { "fieldReferenceValue": "a" },
                    { "fieldReferenceValue": "b" }
                ]
            }
        })
    );
}

#[test]
fn re_aliasing_exposes_only_last_name() {
    let expression = field("price").multiply(field("quantity"));
    let aliased = expression.alias("x").alias("y");
    assert_eq!(
        encode_aliased(&serializer(), &aliased),
        json!({
            "mapValue": { "fields": {
                "y": encode(&expression)
            } }
        })
    );
}

#[test]
fn negative_array_offset_round_trips() {
    let serializer = serializer();
    let expression: Expression = field("tags").array_get(-1).into();
    let encoded = encode_expression(&serializer, &expression);
    assert_eq!(encoded["functionValue"]["args"][1], json!({ "integerValue": "-1" }));
    assert_eq!(decode_expression(&serializer, &encoded).unwrap(), expression);
}

#[test]
fn map_merge_encodes_maps_in_call_order() {
    let mut first = BTreeMap::new();
    first.insert("a", 1_i64);
    let mut second = BTreeMap::new();
    second.insert("a", 2_i64);

    let encoded = encode(field("settings").map_merge([first, second]));
    let args = encoded["functionValue"]["args"].as_array().unwrap();
    assert_eq!(args.len(), 3);
    assert_eq!(
        args[1]["functionValue"]["args"],
        json!([{ "stringValue": "a" }, { "integerValue": "1" }])
    );
    assert_eq!(
        args[2]["functionValue"]["args"],
        json!([{ "stringValue": "a" }, { "integerValue": "2" }])
    );
}

#[test]
fn document_id_matches_sentinel_field() {
    assert_eq!(encode(document_id()), encode(field("__name__")));
    assert_eq!(encode(document_id()), json!({ "fieldReferenceValue": "__name__" }));
}

#[test]
fn total_projection() {
    let total = field("price").multiply(field("quantity")).alias("total");
    assert_eq!(
        encode_aliased(&serializer(), &total),
        json!({
            "mapValue": { "fields": {
                "total": {
                    "functionValue": {
                        "name": "multiply",
                        "args": [
                            { "fieldReferenceValue": "price" },
                            { "fieldReferenceValue": "quantity" }
                        ]
                    }
                }
            } }
        })
    );
}

#[test]
fn equal_any_lifts_list_elements() {
    let condition = field("category").equal_any(vec!["Electronics", "Books"]);
    assert_eq!(
        encode(&condition),
        json!({
            "functionValue": {
                "name": "equal_any",
                "args": [
                    { "fieldReferenceValue": "category" },
                    { "functionValue": {
                        "name": "array",
                        "args": [
                            { "stringValue": "Electronics" },
                            { "stringValue": "Books" }
                        ]
                    } }
                ]
            }
        })
    );
    assert_eq!(
        encode(field("category").equal_any(array(["Electronics", "Books"]))),
        encode(&condition)
    );
}

#[test]
fn array_contains_wraps_literal() {
    assert_eq!(
        encode(field("tags").array_contains("red")),
        json!({
            "functionValue": {
                "name": "array_contains",
                "args": [
                    { "fieldReferenceValue": "tags" },
                    { "stringValue": "red" }
                ]
            }
        })
    );
}

#[test]
fn if_error_falls_back_to_constant() {
    assert_eq!(
        encode(field("amount").if_error(Constant::new(0))),
        json!({
            "functionValue": {
                "name": "if_error",
                "args": [
                    { "fieldReferenceValue": "amount" },
                    { "integerValue": "0" }
                ]
            }
        })
    );
}

#[test]
fn descending_ordering() {
    assert_eq!(
        encode_ordering(&serializer(), &field("createdAt").descending()),
        json!({
            "mapValue": { "fields": {
                "direction": { "stringValue": "descending" },
                "expression": { "fieldReferenceValue": "createdAt" }
            } }
        })
    );
}

#[test]
fn vector_operands_encode_as_vectors() {
    let raw = encode(field("embedding").euclidean_distance(vec![1.0, 0.0]));
    let wrapped = encode(field("embedding").euclidean_distance(VectorValue::new(vec![1.0, 0.0])));
    assert_eq!(raw, wrapped);
    assert_eq!(
        raw["functionValue"]["args"][1]["mapValue"]["fields"]["__type__"],
        json!({ "stringValue": "__vector__" })
    );
}

#[test]
fn timestamp_add_encodes_unit_then_amount() {
    assert_eq!(
        encode(field("createdAt").timestamp_add(7, TimeUnit::Day)),
        json!({
            "functionValue": {
                "name": "timestamp_add",
                "args": [
                    { "fieldReferenceValue": "createdAt" },
                    { "stringValue": "day" },
                    { "integerValue": "7" }
                ]
            }
        })
    );
}

#[test]
fn unknown_time_units_are_not_checked_locally() {
    let encoded = encode(field("t").timestamp_subtract(1, "fortnight"));
    assert_eq!(encoded["functionValue"]["args"][1], json!({ "stringValue": "fortnight" }));
}

#[test]
fn aggregates_encode_as_functions() {
    assert_eq!(
        encode_aggregate(&serializer(), &field("price").sum()),
        json!({
            "functionValue": {
                "name": "sum",
                "args": [{ "fieldReferenceValue": "price" }]
            }
        })
    );
}

#[test]
fn boolean_operators_compose() {
    let cheap = field("price").less_than(10);
    let rated = field("rating").greater_than_or_equal(4.5);
    let combined = &cheap & &rated;
    assert_eq!(encode(&combined), encode(and(cheap, rated, [])));
    assert_eq!(encode(&combined)["functionValue"]["name"], "and");
}

#[test]
fn map_literals_become_map_calls() {
    let built = map([("a", 1_i64.into_expression()), ("b", field("x").into_expression())]);
    assert_eq!(
        encode(built),
        json!({
            "functionValue": {
                "name": "map",
                "args": [
                    { "stringValue": "a" },
                    { "integerValue": "1" },
                    { "stringValue": "b" },
                    { "fieldReferenceValue": "x" }
                ]
            }
        })
    );
}

#[test]
fn expressions_are_thread_safe() {
    let expression = field("a").add(1).into_expression();
    let handle = std::thread::spawn(move || expression.to_string());
    assert_eq!(handle.join().unwrap(), "add(a, 1)");
}
