use firestore_pipeline::firestore::model::{DatabaseId, VectorValue};
use firestore_pipeline::firestore::pipeline::{
    count_all, field, search_document_for, DistanceMeasure, ExpressionOps, Pipeline, SearchMode,
    Selectable,
};
use firestore_pipeline::firestore::JsonProtoSerializer;
use serde_json::{json, Value as JsonValue};

fn serializer() -> JsonProtoSerializer {
    JsonProtoSerializer::new(DatabaseId::new("test-project", "store"))
}

fn stages(pipeline: &Pipeline) -> Vec<JsonValue> {
    let request = pipeline.to_proto(&serializer()).unwrap();
    request["structuredPipeline"]["pipeline"]["stages"]
        .as_array()
        .unwrap()
        .clone()
}

#[test]
fn collection_where_sort_limit() {
    let pipeline = Pipeline::collection("books")
        .where_(field("rating").greater_than(4))
        .sort([field("rating").descending(), field("title").ascending()])
        .limit(5);

    assert_eq!(
        pipeline.to_proto(&serializer()).unwrap(),
        json!({
            "structuredPipeline": { "pipeline": { "stages": [
                {
                    "name": "collection",
                    "args": [{ "referenceValue": "/books" }]
                },
                {
                    "name": "where",
                    "args": [{ "functionValue": {
                        "name": "greater_than",
                        "args": [
                            { "fieldReferenceValue": "rating" },
                            { "integerValue": "4" }
                        ]
                    } }]
                },
                {
                    "name": "sort",
                    "args": [
                        { "mapValue": { "fields": {
                            "direction": { "stringValue": "descending" },
                            "expression": { "fieldReferenceValue": "rating" }
                        } } },
                        { "mapValue": { "fields": {
                            "direction": { "stringValue": "ascending" },
                            "expression": { "fieldReferenceValue": "title" }
                        } } }
                    ]
                },
                {
                    "name": "limit",
                    "args": [{ "integerValue": "5" }]
                }
            ] } }
        })
    );
}

#[test]
fn select_mixes_fields_and_aliases() {
    let pipeline = Pipeline::collection("orders").select([
        Selectable::from("id"),
        field("price").multiply(field("quantity")).alias("total").into(),
    ]);
    let encoded = stages(&pipeline);
    let fields = &encoded[1]["args"][0]["mapValue"]["fields"];
    assert_eq!(fields["id"], json!({ "fieldReferenceValue": "id" }));
    assert_eq!(fields["total"]["functionValue"]["name"], "multiply");
}

#[test]
fn aggregate_with_groups() {
    let pipeline = Pipeline::collection_group("reviews").aggregate_with_groups(
        [count_all().alias("count"), field("stars").average().alias("avg")],
        ["product"],
    );
    let encoded = stages(&pipeline);
    assert_eq!(
        encoded[0],
        json!({
            "name": "collection_group",
            "args": [{ "referenceValue": "" }, { "stringValue": "reviews" }]
        })
    );
    assert_eq!(
        encoded[1],
        json!({
            "name": "aggregate",
            "args": [
                { "mapValue": { "fields": {
                    "avg": { "functionValue": {
                        "name": "average",
                        "args": [{ "fieldReferenceValue": "stars" }]
                    } },
                    "count": { "functionValue": { "name": "count", "args": [] } }
                } } },
                { "mapValue": { "fields": {
                    "product": { "fieldReferenceValue": "product" }
                } } }
            ]
        })
    );
}

#[test]
fn find_nearest_carries_options() {
    let pipeline = Pipeline::collection("docs").find_nearest(
        "embedding",
        VectorValue::new(vec![0.5, 1.0]),
        DistanceMeasure::Cosine,
        Some(10),
        Some("distance"),
    );
    let encoded = stages(&pipeline);
    assert_eq!(encoded[1]["name"], "find_nearest");
    assert_eq!(encoded[1]["args"][2], json!({ "stringValue": "cosine" }));
    assert_eq!(
        encoded[1]["options"],
        json!({
            "limit": { "integerValue": "10" },
            "distance_field": { "fieldReferenceValue": "distance" }
        })
    );
}

#[test]
fn documents_source_uses_relative_references() {
    let pipeline = Pipeline::documents(["cities/sf", "cities/la"]);
    assert_eq!(
        stages(&pipeline)[0]["args"],
        json!([
            { "referenceValue": "/cities/sf" },
            { "referenceValue": "/cities/la" }
        ])
    );
}

#[test]
fn union_embeds_other_pipeline() {
    let pipeline = Pipeline::collection("a").union(Pipeline::collection("b"));
    let encoded = stages(&pipeline);
    assert_eq!(
        encoded[1]["args"][0],
        json!({
            "pipelineValue": { "stages": [
                { "name": "collection", "args": [{ "referenceValue": "/b" }] }
            ] }
        })
    );
}

#[test]
fn union_surfaces_errors_of_other_pipeline() {
    let pipeline = Pipeline::collection("a").union(Pipeline::collection("b").limit(-5));
    let err = pipeline.to_proto(&serializer()).unwrap_err();
    assert!(err.message().contains("limit"));
}

#[test]
fn unnest_with_index_field() {
    let pipeline = Pipeline::collection("posts").unnest(field("tags").alias("tag"), Some("index"));
    let encoded = stages(&pipeline);
    assert_eq!(
        encoded[1],
        json!({
            "name": "unnest",
            "args": [
                { "fieldReferenceValue": "tags" },
                { "fieldReferenceValue": "tag" }
            ],
            "options": { "index_field": { "fieldReferenceValue": "index" } }
        })
    );
}

#[test]
fn sample_and_replace_with() {
    let pipeline = Pipeline::database()
        .sample_percentage(0.5)
        .replace_with(field("profile"));
    let encoded = stages(&pipeline);
    assert_eq!(encoded[0], json!({ "name": "database", "args": [] }));
    assert_eq!(
        encoded[1]["args"],
        json!([{ "doubleValue": 0.5 }, { "stringValue": "percent" }])
    );
    assert_eq!(
        encoded[2]["args"],
        json!([{ "fieldReferenceValue": "profile" }, { "stringValue": "full_replace" }])
    );
}

#[test]
fn raw_stage_passes_params_and_options() {
    let pipeline = Pipeline::collection("books").raw_stage_with_options(
        "custom_stage",
        [field("title")],
        [("mode", "fast")],
    );
    let encoded = stages(&pipeline);
    assert_eq!(
        encoded[1],
        json!({
            "name": "custom_stage",
            "args": [{ "fieldReferenceValue": "title" }],
            "options": { "mode": { "stringValue": "fast" } }
        })
    );
}

#[test]
fn search_stage_filters_by_query() {
    let pipeline = Pipeline::collection("recipes")
        .where_(search_document_for("waffles", SearchMode::Semantic));
    let encoded = stages(&pipeline);
    assert_eq!(
        encoded[1]["args"][0]["functionValue"]["args"],
        json!([{ "stringValue": "waffles" }, { "stringValue": "semantic" }])
    );
}

#[test]
fn duplicate_aliases_fail_encoding() {
    let pipeline = Pipeline::collection("books").add_fields([
        field("a").alias("dup"),
        field("b").alias("dup"),
    ]);
    let err = pipeline.to_proto(&serializer()).unwrap_err();
    assert_eq!(err.code_str(), "firestore/invalid-argument");
    assert!(err.message().contains("dup"));
}

#[test]
fn references_expand_to_the_configured_database() {
    use firestore_pipeline::firestore::model::DocumentKey;
    use firestore_pipeline::firestore::pipeline::Constant;

    let key = DocumentKey::from_string("cities/sf").unwrap();
    let pipeline =
        Pipeline::collection("trips").where_(field("destination").equal(Constant::reference(&key)));
    let encoded = stages(&pipeline);
    assert_eq!(
        encoded[1]["args"][0]["functionValue"]["args"][1],
        json!({ "referenceValue": "projects/test-project/databases/store/documents/cities/sf" })
    );
}
