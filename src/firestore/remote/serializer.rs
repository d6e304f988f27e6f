use std::collections::BTreeMap;
use std::str::FromStr;

use serde_json::{json, Value as JsonValue};

use crate::firestore::error::{invalid_argument, FirestoreResult};
use crate::firestore::model::{DatabaseId, DocumentKey, GeoPoint, Timestamp, VectorValue};
use crate::firestore::value::{BytesValue, FirestoreValue, MapValue, ValueKind};

const VECTOR_TYPE_KEY: &str = "__type__";
const VECTOR_TYPE_VALUE: &str = "__vector__";
const VECTOR_VALUES_KEY: &str = "value";

/// Encodes values into the Firestore v1 JSON mapping for one database.
///
/// Reference values are stored relative to the database and expanded to full
/// resource names on the wire.
#[derive(Clone, Debug)]
pub struct JsonProtoSerializer {
    database_id: DatabaseId,
}

impl JsonProtoSerializer {
    pub fn new(database_id: DatabaseId) -> Self {
        Self { database_id }
    }

    pub fn database_id(&self) -> &DatabaseId {
        &self.database_id
    }

    pub fn database_name(&self) -> String {
        self.database_id.database_name()
    }

    pub fn document_name(&self, key: &DocumentKey) -> String {
        self.resource_name(&key.path().canonical_string())
    }

    fn resource_name(&self, relative_path: &str) -> String {
        format!("{}/documents/{}", self.database_name(), relative_path)
    }

    /// Strips the `projects/{p}/databases/{d}/documents/` prefix from a
    /// resource name. Names of other databases are rejected.
    fn relative_path<'a>(&self, resource_name: &'a str) -> FirestoreResult<&'a str> {
        let prefix = format!("{}/documents/", self.database_name());
        if let Some(relative) = resource_name.strip_prefix(&prefix) {
            return Ok(relative);
        }
        if resource_name.starts_with("projects/") {
            return Err(invalid_argument(format!(
                "Reference '{resource_name}' does not belong to database '{}'",
                self.database_name()
            )));
        }
        Ok(resource_name.trim_start_matches('/'))
    }

    pub fn encode_value(&self, value: &FirestoreValue) -> JsonValue {
        match value.kind() {
            ValueKind::Null => json!({ "nullValue": JsonValue::Null }),
            ValueKind::Boolean(boolean) => json!({ "booleanValue": boolean }),
            ValueKind::Integer(integer) => json!({ "integerValue": integer.to_string() }),
            ValueKind::Double(double) => encode_double(*double),
            ValueKind::Timestamp(timestamp) => {
                json!({ "timestampValue": timestamp.to_rfc3339() })
            }
            ValueKind::String(string) => json!({ "stringValue": string }),
            ValueKind::Bytes(bytes) => json!({ "bytesValue": bytes.to_base64() }),
            ValueKind::Reference(path) => json!({ "referenceValue": self.resource_name(path) }),
            ValueKind::GeoPoint(point) => json!({
                "geoPointValue": {
                    "latitude": point.latitude(),
                    "longitude": point.longitude(),
                }
            }),
            ValueKind::Array(array) => {
                let values = array
                    .values()
                    .iter()
                    .map(|value| self.encode_value(value))
                    .collect::<Vec<_>>();
                json!({ "arrayValue": { "values": values } })
            }
            ValueKind::Map(map) => json!({
                "mapValue": {
                    "fields": self.encode_map_fields(map.fields())
                }
            }),
            ValueKind::Vector(vector) => self.encode_vector(vector),
        }
    }

    pub fn encode_map_fields(&self, fields: &BTreeMap<String, FirestoreValue>) -> JsonValue {
        let mut encoded = serde_json::Map::new();
        for (key, value) in fields {
            encoded.insert(key.clone(), self.encode_value(value));
        }
        JsonValue::Object(encoded)
    }

    fn encode_vector(&self, vector: &VectorValue) -> JsonValue {
        let values = vector
            .as_slice()
            .iter()
            .map(|component| encode_double(*component))
            .collect::<Vec<_>>();
        json!({
            "mapValue": {
                "fields": {
                    VECTOR_TYPE_KEY: { "stringValue": VECTOR_TYPE_VALUE },
                    VECTOR_VALUES_KEY: { "arrayValue": { "values": values } },
                }
            }
        })
    }

    pub fn decode_value(&self, value: &JsonValue) -> FirestoreResult<FirestoreValue> {
        let object = value
            .as_object()
            .ok_or_else(|| invalid_argument("Expected Firestore value object"))?;
        if let Some(null_value) = object.get("nullValue") {
            if null_value.is_null() || null_value.as_str() == Some("NULL_VALUE") {
                return Ok(FirestoreValue::null());
            }
        }
        if let Some(bool_value) = object.get("booleanValue") {
            let value = bool_value
                .as_bool()
                .ok_or_else(|| invalid_argument("booleanValue must be bool"))?;
            return Ok(FirestoreValue::from_bool(value));
        }
        if let Some(integer_value) = object.get("integerValue") {
            let parsed = match integer_value {
                JsonValue::String(value) => i64::from_str(value)
                    .map_err(|err| invalid_argument(format!("Invalid integerValue: {err}")))?,
                JsonValue::Number(number) => number
                    .as_i64()
                    .ok_or_else(|| invalid_argument("Integer out of range"))?,
                _ => return Err(invalid_argument("integerValue must be a string or number")),
            };
            return Ok(FirestoreValue::from_integer(parsed));
        }
        if let Some(double_value) = object.get("doubleValue") {
            return Ok(FirestoreValue::from_double(decode_double(double_value)?));
        }
        if let Some(timestamp_value) = object.get("timestampValue") {
            let timestamp_str = timestamp_value
                .as_str()
                .ok_or_else(|| invalid_argument("timestampValue must be string"))?;
            return Ok(FirestoreValue::from_timestamp(Timestamp::parse_rfc3339(
                timestamp_str,
            )?));
        }
        if let Some(string_value) = object.get("stringValue") {
            let str_value = string_value
                .as_str()
                .ok_or_else(|| invalid_argument("stringValue must be string"))?;
            return Ok(FirestoreValue::from_string(str_value));
        }
        if let Some(bytes_value) = object.get("bytesValue") {
            let str_value = bytes_value
                .as_str()
                .ok_or_else(|| invalid_argument("bytesValue must be base64 string"))?;
            let decoded = BytesValue::from_base64(str_value)
                .map_err(|err| invalid_argument(format!("Invalid bytesValue: {err}")))?;
            return Ok(FirestoreValue::from_bytes(decoded));
        }
        if let Some(reference_value) = object.get("referenceValue") {
            let str_value = reference_value
                .as_str()
                .ok_or_else(|| invalid_argument("referenceValue must be string"))?;
            return Ok(FirestoreValue::from_reference(self.relative_path(str_value)?));
        }
        if let Some(geo_point) = object.get("geoPointValue") {
            let geo_point = geo_point
                .as_object()
                .ok_or_else(|| invalid_argument("geoPointValue must be an object"))?;
            let latitude = decode_coordinate(geo_point.get("latitude"), "latitude")?;
            let longitude = decode_coordinate(geo_point.get("longitude"), "longitude")?;
            return Ok(FirestoreValue::from_geo_point(GeoPoint::new(
                latitude, longitude,
            )?));
        }
        if let Some(array_value) = object.get("arrayValue") {
            return Ok(FirestoreValue::from_array(self.decode_array_values(array_value)?));
        }
        if let Some(map_value) = object.get("mapValue") {
            let map = self.decode_map_value(map_value)?;
            if let Some(vector) = vector_from_map(&map) {
                return Ok(FirestoreValue::from_vector(vector));
            }
            return Ok(FirestoreValue::from_map(map.fields().clone()));
        }

        Err(invalid_argument("Unknown Firestore value type"))
    }

    fn decode_array_values(&self, array_value: &JsonValue) -> FirestoreResult<Vec<FirestoreValue>> {
        match array_value.get("values") {
            Some(values) => values
                .as_array()
                .ok_or_else(|| invalid_argument("arrayValue.values must be an array"))?
                .iter()
                .map(|entry| self.decode_value(entry))
                .collect(),
            None => Ok(Vec::new()),
        }
    }

    pub fn decode_map_value(&self, value: &JsonValue) -> FirestoreResult<MapValue> {
        let map = value
            .as_object()
            .ok_or_else(|| invalid_argument("Expected object for map value"))?;
        let fields_object = match map.get("fields") {
            Some(fields_value) => fields_value
                .as_object()
                .ok_or_else(|| invalid_argument("Expected 'fields' to be an object"))?,
            None => return Ok(MapValue::new(BTreeMap::new())),
        };

        let mut fields = BTreeMap::new();
        for (key, value) in fields_object {
            fields.insert(key.clone(), self.decode_value(value)?);
        }
        Ok(MapValue::new(fields))
    }
}

/// Non-finite doubles use the proto3 JSON string forms.
fn encode_double(value: f64) -> JsonValue {
    if value.is_nan() {
        json!({ "doubleValue": "NaN" })
    } else if value.is_infinite() {
        let text = if value > 0.0 { "Infinity" } else { "-Infinity" };
        json!({ "doubleValue": text })
    } else {
        json!({ "doubleValue": value })
    }
}

fn decode_double(value: &JsonValue) -> FirestoreResult<f64> {
    match value {
        JsonValue::Number(number) => number
            .as_f64()
            .ok_or_else(|| invalid_argument("Invalid doubleValue")),
        JsonValue::String(text) => match text.as_str() {
            "NaN" => Ok(f64::NAN),
            "Infinity" => Ok(f64::INFINITY),
            "-Infinity" => Ok(f64::NEG_INFINITY),
            other => other
                .parse::<f64>()
                .map_err(|err| invalid_argument(format!("Invalid doubleValue: {err}"))),
        },
        _ => Err(invalid_argument("doubleValue must be a number or string")),
    }
}

// Proto3 JSON omits zero-valued fields, so only a missing coordinate means 0.0.
fn decode_coordinate(value: Option<&JsonValue>, name: &str) -> FirestoreResult<f64> {
    match value {
        None => Ok(0.0),
        Some(value) => value
            .as_f64()
            .ok_or_else(|| invalid_argument(format!("geoPointValue.{name} must be a number"))),
    }
}

fn vector_from_map(map: &MapValue) -> Option<VectorValue> {
    match map.get(VECTOR_TYPE_KEY)?.kind() {
        ValueKind::String(kind) if kind == VECTOR_TYPE_VALUE => {}
        _ => return None,
    }
    let components = match map.get(VECTOR_VALUES_KEY)?.kind() {
        ValueKind::Array(array) => array
            .values()
            .iter()
            .map(|value| match value.kind() {
                ValueKind::Double(double) => Some(*double),
                ValueKind::Integer(integer) => Some(*integer as f64),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()?,
        _ => return None,
    };
    Some(VectorValue::new(components))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn serializer() -> JsonProtoSerializer {
        JsonProtoSerializer::new(DatabaseId::default("project"))
    }

    #[test]
    fn encode_decode_roundtrip() {
        let mut map = BTreeMap::new();
        map.insert("name".to_string(), FirestoreValue::from_string("Ada"));
        map.insert("age".to_string(), FirestoreValue::from_integer(42));
        map.insert(
            "born".to_string(),
            FirestoreValue::from_timestamp(Timestamp::new(-100, 5)),
        );
        let value = FirestoreValue::from_map(map);
        let serializer = serializer();
        let encoded = serializer.encode_value(&value);
        assert_eq!(encoded["mapValue"]["fields"]["age"], json!({ "integerValue": "42" }));
        assert_eq!(serializer.decode_value(&encoded).unwrap(), value);
    }

    #[test]
    fn references_use_full_resource_names() {
        let serializer = serializer();
        let key = DocumentKey::from_string("cities/sf").unwrap();
        let encoded = serializer.encode_value(&FirestoreValue::from_document_key(&key));
        assert_eq!(
            encoded,
            json!({ "referenceValue": "projects/project/databases/(default)/documents/cities/sf" })
        );
        let decoded = serializer.decode_value(&encoded).unwrap();
        assert_eq!(decoded, FirestoreValue::from_document_key(&key));
    }

    #[test]
    fn foreign_references_are_rejected() {
        let err = serializer()
            .decode_value(&json!({
                "referenceValue": "projects/other/databases/(default)/documents/a/b"
            }))
            .unwrap_err();
        assert_eq!(err.code_str(), "firestore/invalid-argument");
    }

    #[test]
    fn vectors_use_tagged_maps() {
        let serializer = serializer();
        let value = FirestoreValue::from_vector(VectorValue::new(vec![1.0, 2.5]));
        let encoded = serializer.encode_value(&value);
        assert_eq!(
            encoded,
            json!({
                "mapValue": { "fields": {
                    "__type__": { "stringValue": "__vector__" },
                    "value": { "arrayValue": { "values": [
                        { "doubleValue": 1.0 },
                        { "doubleValue": 2.5 }
                    ] } }
                } }
            })
        );
        assert_eq!(serializer.decode_value(&encoded).unwrap(), value);
    }

    #[test]
    fn non_finite_doubles() {
        let serializer = serializer();
        let encoded = serializer.encode_value(&FirestoreValue::from_double(f64::NEG_INFINITY));
        assert_eq!(encoded, json!({ "doubleValue": "-Infinity" }));
        let decoded = serializer.decode_value(&json!({ "doubleValue": "NaN" })).unwrap();
        assert!(matches!(decoded.kind(), ValueKind::Double(value) if value.is_nan()));
    }

    #[test]
    fn malformed_geo_points_are_rejected() {
        let serializer = serializer();
        let bad_latitude = json!({ "geoPointValue": { "latitude": "north", "longitude": 2.0 } });
        assert!(serializer.decode_value(&bad_latitude).is_err());
        assert!(serializer.decode_value(&json!({ "geoPointValue": 5 })).is_err());

        let omitted_zero = json!({ "geoPointValue": { "longitude": 2.0 } });
        assert_eq!(
            serializer.decode_value(&omitted_zero).unwrap(),
            FirestoreValue::from_geo_point(GeoPoint::new(0.0, 2.0).unwrap())
        );
    }

    #[test]
    fn far_future_timestamps_encode_at_upper_bound() {
        let serializer = serializer();
        let value = FirestoreValue::from_timestamp(Timestamp::new(i64::MAX / 2, 0));
        assert_eq!(
            serializer.encode_value(&value),
            json!({ "timestampValue": "9999-12-31T23:59:59.999999999Z" })
        );
    }

    #[test]
    fn bytes_are_base64() {
        let serializer = serializer();
        let value = FirestoreValue::from_bytes(BytesValue::from(vec![0_u8, 255]));
        let encoded = serializer.encode_value(&value);
        assert_eq!(encoded, json!({ "bytesValue": "AP8=" }));
        assert_eq!(serializer.decode_value(&encoded).unwrap(), value);
    }
}
