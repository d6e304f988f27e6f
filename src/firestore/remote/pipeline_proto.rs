use serde_json::{json, Map as JsonMap, Value as JsonValue};

use crate::firestore::error::{internal_error, invalid_argument, FirestoreResult};
use crate::firestore::pipeline::{
    AggregateFunction, AliasedAggregate, AliasedExpression, Constant, Expression, Field,
    FunctionExpression, Ordering, Pipeline, SampleSize, Selectable, Stage,
};
use crate::firestore::remote::serializer::JsonProtoSerializer;
use crate::firestore::value::FirestoreValue;

/// Encodes an expression tree as a Firestore `Value`.
///
/// Fields become `fieldReferenceValue`, constants their typed value and
/// function nodes a `functionValue` with recursively encoded arguments.
pub fn encode_expression(serializer: &JsonProtoSerializer, expression: &Expression) -> JsonValue {
    match expression {
        Expression::Field(field) => encode_field(field),
        Expression::Constant(constant) => serializer.encode_value(constant.value()),
        Expression::Function(function) => encode_function(serializer, function),
    }
}

fn encode_field(field: &Field) -> JsonValue {
    json!({ "fieldReferenceValue": field.field_name() })
}

fn encode_function(serializer: &JsonProtoSerializer, function: &FunctionExpression) -> JsonValue {
    encode_call(serializer, function.name(), function.args())
}

fn encode_call(serializer: &JsonProtoSerializer, name: &str, args: &[Expression]) -> JsonValue {
    let args = args
        .iter()
        .map(|arg| encode_expression(serializer, arg))
        .collect::<Vec<_>>();
    json!({
        "functionValue": {
            "name": name,
            "args": args,
        }
    })
}

pub fn encode_aggregate(serializer: &JsonProtoSerializer, aggregate: &AggregateFunction) -> JsonValue {
    encode_call(serializer, aggregate.name(), aggregate.args())
}

/// `{alias: expression}` as a map value.
pub fn encode_aliased(serializer: &JsonProtoSerializer, aliased: &AliasedExpression) -> JsonValue {
    encode_map(vec![(
        aliased.name().to_string(),
        encode_expression(serializer, aliased.expression()),
    )])
}

pub fn encode_ordering(serializer: &JsonProtoSerializer, ordering: &Ordering) -> JsonValue {
    encode_map(vec![
        (
            "direction".to_string(),
            json!({ "stringValue": ordering.direction().as_str() }),
        ),
        (
            "expression".to_string(),
            encode_expression(serializer, ordering.expression()),
        ),
    ])
}

fn encode_map(entries: Vec<(String, JsonValue)>) -> JsonValue {
    let fields: JsonMap<String, JsonValue> = entries.into_iter().collect();
    json!({ "mapValue": { "fields": fields } })
}

fn encode_selectables(serializer: &JsonProtoSerializer, selectables: &[Selectable]) -> JsonValue {
    encode_map(
        selectables
            .iter()
            .map(|selectable| {
                (
                    selectable.alias().to_string(),
                    encode_expression(serializer, selectable.expression()),
                )
            })
            .collect(),
    )
}

fn encode_accumulators(
    serializer: &JsonProtoSerializer,
    accumulators: &[AliasedAggregate],
) -> JsonValue {
    encode_map(
        accumulators
            .iter()
            .map(|accumulator| {
                (
                    accumulator.alias().to_string(),
                    encode_aggregate(serializer, accumulator.aggregate()),
                )
            })
            .collect(),
    )
}

fn encode_reference(path: &str) -> JsonValue {
    json!({ "referenceValue": format!("/{path}") })
}

fn encode_integer(value: i64) -> JsonValue {
    json!({ "integerValue": value.to_string() })
}

fn encode_string(value: &str) -> JsonValue {
    json!({ "stringValue": value })
}

/// Encodes one stage as `{name, args, options}`; `options` is omitted when
/// empty.
pub(crate) fn encode_stage(
    serializer: &JsonProtoSerializer,
    stage: &Stage,
) -> FirestoreResult<JsonValue> {
    let mut options = JsonMap::new();
    let args: Vec<JsonValue> = match stage {
        Stage::Collection { path } => vec![encode_reference(&path.canonical_string())],
        Stage::CollectionGroup { collection_id } => {
            vec![json!({ "referenceValue": "" }), encode_string(collection_id)]
        }
        Stage::Database => Vec::new(),
        Stage::Documents { keys } => keys
            .iter()
            .map(|key| encode_reference(&key.path().canonical_string()))
            .collect(),
        Stage::Where { condition } => vec![encode_expression(serializer, condition.expression())],
        Stage::Limit { limit } => vec![encode_integer(*limit)],
        Stage::Offset { offset } => vec![encode_integer(*offset)],
        Stage::AddFields { fields } => vec![encode_selectables(serializer, fields)],
        Stage::RemoveFields { fields } => fields.iter().map(encode_field).collect(),
        Stage::Select { selections } => vec![encode_selectables(serializer, selections)],
        Stage::Distinct { groups } => vec![encode_selectables(serializer, groups)],
        Stage::Aggregate {
            accumulators,
            groups,
        } => vec![
            encode_accumulators(serializer, accumulators),
            encode_selectables(serializer, groups),
        ],
        Stage::FindNearest {
            field,
            vector,
            distance_measure,
            limit,
            distance_field,
        } => {
            if let Some(limit) = limit {
                options.insert("limit".to_string(), encode_integer(*limit));
            }
            if let Some(distance_field) = distance_field {
                options.insert(
                    "distance_field".to_string(),
                    encode_field(&Field::new(distance_field.as_str())),
                );
            }
            vec![
                encode_field(field),
                serializer.encode_value(&FirestoreValue::from_vector(vector.clone())),
                encode_string(distance_measure.as_str()),
            ]
        }
        Stage::Sort { orderings } => orderings
            .iter()
            .map(|ordering| encode_ordering(serializer, ordering))
            .collect(),
        Stage::ReplaceWith { expression } => vec![
            encode_expression(serializer, expression),
            encode_string("full_replace"),
        ],
        Stage::Sample { size } => match size {
            SampleSize::Count(count) => vec![encode_integer(*count), encode_string("documents")],
            SampleSize::Percentage(percentage) => vec![
                serializer.encode_value(&FirestoreValue::from_double(*percentage)),
                encode_string("percent"),
            ],
        },
        Stage::Union { other } => {
            if let Some(err) = other.error() {
                return Err(err.clone());
            }
            vec![json!({ "pipelineValue": encode_pipeline(serializer, other)? })]
        }
        Stage::Unnest {
            selectable,
            index_field,
        } => {
            if let Some(index_field) = index_field {
                options.insert(
                    "index_field".to_string(),
                    encode_field(&Field::new(index_field.as_str())),
                );
            }
            vec![
                encode_expression(serializer, selectable.expression()),
                encode_field(&Field::new(selectable.alias())),
            ]
        }
        Stage::Raw {
            params,
            options: raw_options,
            ..
        } => {
            for (key, value) in raw_options {
                options.insert(key.clone(), encode_expression(serializer, value));
            }
            params
                .iter()
                .map(|param| encode_expression(serializer, param))
                .collect()
        }
    };

    let mut encoded = JsonMap::new();
    encoded.insert("name".to_string(), json!(stage.name()));
    encoded.insert("args".to_string(), JsonValue::Array(args));
    if !options.is_empty() {
        encoded.insert("options".to_string(), JsonValue::Object(options));
    }
    Ok(JsonValue::Object(encoded))
}

/// `{"stages": [...]}` for a pipeline without recorded errors.
pub(crate) fn encode_pipeline(
    serializer: &JsonProtoSerializer,
    pipeline: &Pipeline,
) -> FirestoreResult<JsonValue> {
    if let Some(err) = pipeline.error() {
        return Err(err.clone());
    }
    match pipeline.stages().first() {
        Some(stage) if stage.is_source() => {}
        _ => return Err(internal_error("Pipelines must start with a source stage")),
    }
    let stages = pipeline
        .stages()
        .iter()
        .map(|stage| encode_stage(serializer, stage))
        .collect::<FirestoreResult<Vec<_>>>()?;
    Ok(json!({ "stages": stages }))
}

pub(crate) fn encode_pipeline_request(
    serializer: &JsonProtoSerializer,
    pipeline: &Pipeline,
) -> FirestoreResult<JsonValue> {
    Ok(json!({
        "structuredPipeline": {
            "pipeline": encode_pipeline(serializer, pipeline)?
        }
    }))
}

/// Inverse of [`encode_expression`].
///
/// Literal arguments keep their exact encoded value, so a `-1` array offset
/// decodes back to the constant `-1`.
pub fn decode_expression(
    serializer: &JsonProtoSerializer,
    value: &JsonValue,
) -> FirestoreResult<Expression> {
    let object = value
        .as_object()
        .ok_or_else(|| invalid_argument("Expected expression object"))?;
    if let Some(field) = object.get("fieldReferenceValue") {
        let name = field
            .as_str()
            .ok_or_else(|| invalid_argument("fieldReferenceValue must be string"))?;
        return Ok(Expression::Field(Field::new(name)));
    }
    if let Some(function) = object.get("functionValue") {
        let name = function
            .get("name")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| invalid_argument("functionValue.name must be string"))?;
        let args = match function.get("args") {
            Some(JsonValue::Array(args)) => args
                .iter()
                .map(|arg| decode_expression(serializer, arg))
                .collect::<FirestoreResult<Vec<_>>>()?,
            Some(_) => return Err(invalid_argument("functionValue.args must be an array")),
            None => Vec::new(),
        };
        return Ok(Expression::Function(FunctionExpression::new(name, args)));
    }
    Ok(Expression::Constant(Constant::from(
        serializer.decode_value(value)?,
    )))
}
