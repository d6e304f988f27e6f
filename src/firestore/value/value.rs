use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::firestore::model::{same_double, DocumentKey, GeoPoint, Timestamp, VectorValue};
use crate::firestore::value::{ArrayValue, BytesValue, MapValue};

/// A typed Firestore literal, as carried by pipeline constants.
#[derive(Clone, Debug, PartialEq)]
pub struct FirestoreValue {
    kind: ValueKind,
}

#[derive(Clone, Debug)]
pub enum ValueKind {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    Timestamp(Timestamp),
    String(String),
    Bytes(BytesValue),
    /// Document path relative to the database root, e.g. `cities/sf`.
    Reference(String),
    GeoPoint(GeoPoint),
    Array(ArrayValue),
    Map(MapValue),
    Vector(VectorValue),
}

impl PartialEq for ValueKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ValueKind::Null, ValueKind::Null) => true,
            (ValueKind::Boolean(left), ValueKind::Boolean(right)) => left == right,
            (ValueKind::Integer(left), ValueKind::Integer(right)) => left == right,
            (ValueKind::Double(left), ValueKind::Double(right)) => same_double(*left, *right),
            (ValueKind::Timestamp(left), ValueKind::Timestamp(right)) => left == right,
            (ValueKind::String(left), ValueKind::String(right)) => left == right,
            (ValueKind::Bytes(left), ValueKind::Bytes(right)) => left == right,
            (ValueKind::Reference(left), ValueKind::Reference(right)) => left == right,
            (ValueKind::GeoPoint(left), ValueKind::GeoPoint(right)) => left == right,
            (ValueKind::Array(left), ValueKind::Array(right)) => left == right,
            (ValueKind::Map(left), ValueKind::Map(right)) => left == right,
            (ValueKind::Vector(left), ValueKind::Vector(right)) => left == right,
            _ => false,
        }
    }
}

impl FirestoreValue {
    pub const fn null() -> Self {
        Self {
            kind: ValueKind::Null,
        }
    }

    pub fn from_bool(value: bool) -> Self {
        Self {
            kind: ValueKind::Boolean(value),
        }
    }

    pub fn from_integer(value: i64) -> Self {
        Self {
            kind: ValueKind::Integer(value),
        }
    }

    pub fn from_double(value: f64) -> Self {
        Self {
            kind: ValueKind::Double(value),
        }
    }

    pub fn from_timestamp(value: Timestamp) -> Self {
        Self {
            kind: ValueKind::Timestamp(value),
        }
    }

    pub fn from_string(value: impl Into<String>) -> Self {
        Self {
            kind: ValueKind::String(value.into()),
        }
    }

    pub fn from_bytes(value: BytesValue) -> Self {
        Self {
            kind: ValueKind::Bytes(value),
        }
    }

    pub fn from_reference(path: impl Into<String>) -> Self {
        Self {
            kind: ValueKind::Reference(path.into()),
        }
    }

    pub fn from_document_key(key: &DocumentKey) -> Self {
        Self::from_reference(key.path().canonical_string())
    }

    pub fn from_geo_point(value: GeoPoint) -> Self {
        Self {
            kind: ValueKind::GeoPoint(value),
        }
    }

    pub fn from_array(values: Vec<FirestoreValue>) -> Self {
        Self {
            kind: ValueKind::Array(ArrayValue::new(values)),
        }
    }

    pub fn from_map(map: BTreeMap<String, FirestoreValue>) -> Self {
        Self {
            kind: ValueKind::Map(MapValue::new(map)),
        }
    }

    pub fn from_vector(value: VectorValue) -> Self {
        Self {
            kind: ValueKind::Vector(value),
        }
    }

    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }

    pub fn is_null(&self) -> bool {
        matches!(self.kind, ValueKind::Null)
    }

    /// Lower-case type tag matching what the backend's `type()` function reports.
    pub fn type_name(&self) -> &'static str {
        match self.kind {
            ValueKind::Null => "null",
            ValueKind::Boolean(_) => "boolean",
            ValueKind::Integer(_) => "int64",
            ValueKind::Double(_) => "float64",
            ValueKind::Timestamp(_) => "timestamp",
            ValueKind::String(_) => "string",
            ValueKind::Bytes(_) => "bytes",
            ValueKind::Reference(_) => "reference",
            ValueKind::GeoPoint(_) => "geo_point",
            ValueKind::Array(_) => "array",
            ValueKind::Map(_) => "map",
            ValueKind::Vector(_) => "vector",
        }
    }
}

impl From<bool> for FirestoreValue {
    fn from(value: bool) -> Self {
        Self::from_bool(value)
    }
}

macro_rules! impl_integer_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for FirestoreValue {
                fn from(value: $ty) -> Self {
                    Self::from_integer(i64::from(value))
                }
            }
        )*
    };
}

impl_integer_value!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for FirestoreValue {
    fn from(value: f32) -> Self {
        Self::from_double(f64::from(value))
    }
}

impl From<f64> for FirestoreValue {
    fn from(value: f64) -> Self {
        Self::from_double(value)
    }
}

impl From<&str> for FirestoreValue {
    fn from(value: &str) -> Self {
        Self::from_string(value)
    }
}

impl From<String> for FirestoreValue {
    fn from(value: String) -> Self {
        Self::from_string(value)
    }
}

impl From<&String> for FirestoreValue {
    fn from(value: &String) -> Self {
        Self::from_string(value.clone())
    }
}

impl From<Timestamp> for FirestoreValue {
    fn from(value: Timestamp) -> Self {
        Self::from_timestamp(value)
    }
}

impl From<DateTime<Utc>> for FirestoreValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::from_timestamp(Timestamp::from_datetime(value))
    }
}

impl From<BytesValue> for FirestoreValue {
    fn from(value: BytesValue) -> Self {
        Self::from_bytes(value)
    }
}

impl From<GeoPoint> for FirestoreValue {
    fn from(value: GeoPoint) -> Self {
        Self::from_geo_point(value)
    }
}

impl From<VectorValue> for FirestoreValue {
    fn from(value: VectorValue) -> Self {
        Self::from_vector(value)
    }
}

impl From<&DocumentKey> for FirestoreValue {
    fn from(value: &DocumentKey) -> Self {
        Self::from_document_key(value)
    }
}

impl<T> From<Option<T>> for FirestoreValue
where
    T: Into<FirestoreValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_else(Self::null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_basic_values() {
        let v = FirestoreValue::from_string("hello");
        match v.kind() {
            ValueKind::String(value) => assert_eq!(value, "hello"),
            _ => panic!("unexpected kind"),
        }
    }

    #[test]
    fn integers_widen_to_i64() {
        assert_eq!(FirestoreValue::from(5_i32), FirestoreValue::from_integer(5));
        assert_eq!(FirestoreValue::from(0xFF_u8), FirestoreValue::from_integer(255));
    }

    #[test]
    fn none_becomes_null() {
        let value: FirestoreValue = Option::<i64>::None.into();
        assert!(value.is_null());
        assert_eq!(FirestoreValue::from(Some("a")), FirestoreValue::from_string("a"));
    }

    #[test]
    fn nan_doubles_are_equal_literals() {
        assert_eq!(FirestoreValue::from(f64::NAN), FirestoreValue::from(-f64::NAN));
        assert_ne!(FirestoreValue::from(0.0), FirestoreValue::from(-0.0));
        assert_ne!(FirestoreValue::from(1.0), FirestoreValue::from_integer(1));
    }

    #[test]
    fn type_names() {
        assert_eq!(FirestoreValue::from(1.5).type_name(), "float64");
        assert_eq!(
            FirestoreValue::from(VectorValue::from([1.0])).type_name(),
            "vector"
        );
        let key = DocumentKey::from_string("cities/sf").unwrap();
        let reference = FirestoreValue::from(&key);
        assert_eq!(reference.type_name(), "reference");
        assert_eq!(reference.kind(), &ValueKind::Reference("cities/sf".to_string()));
    }
}
