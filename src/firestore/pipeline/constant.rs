use crate::firestore::model::DocumentKey;
use crate::firestore::value::FirestoreValue;

/// Expression leaf carrying a literal value.
///
/// Construction never fails and never coerces between kinds; `Constant::new(5)`
/// stays an integer and `Constant::new(5.0)` stays a double.
#[derive(Clone, Debug, PartialEq)]
pub struct Constant {
    value: FirestoreValue,
}

impl Constant {
    pub const NULL: Constant = Constant {
        value: FirestoreValue::null(),
    };

    pub fn new(value: impl Into<FirestoreValue>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn null() -> Self {
        Self::NULL
    }

    pub fn reference(key: &DocumentKey) -> Self {
        Self::new(FirestoreValue::from_document_key(key))
    }

    pub fn value(&self) -> &FirestoreValue {
        &self.value
    }

    pub fn into_value(self) -> FirestoreValue {
        self.value
    }

    /// Whether the literal itself is null. `is_null()` from `ExpressionOps`
    /// builds the server-side check instead.
    pub fn is_null_value(&self) -> bool {
        self.value.is_null()
    }
}

impl From<FirestoreValue> for Constant {
    fn from(value: FirestoreValue) -> Self {
        Constant { value }
    }
}

pub fn constant(value: impl Into<FirestoreValue>) -> Constant {
    Constant::new(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firestore::model::{GeoPoint, Timestamp, VectorValue};

    #[test]
    fn equal_literals_compare_equal() {
        assert_eq!(Constant::new(5), Constant::new(5));
        assert_eq!(Constant::new("a"), constant(String::from("a")));
        assert_ne!(Constant::new(5), Constant::new(6));
        assert_ne!(Constant::new(5), Constant::new(5.0));
    }

    #[test]
    fn nan_literal_equals_itself() {
        assert_eq!(Constant::new(f64::NAN), Constant::new(f64::NAN));
        assert_eq!(
            Constant::new(VectorValue::new(vec![f64::NAN])),
            Constant::new(VectorValue::new(vec![f64::NAN]))
        );
    }

    #[test]
    fn is_null_builds_a_predicate() {
        use crate::firestore::pipeline::ExpressionOps;

        let check = constant(Option::<i64>::None).is_null();
        assert_eq!(check.expression().function_name(), Some("is_null"));
    }

    #[test]
    fn null_is_explicit() {
        assert!(Constant::NULL.is_null_value());
        assert_eq!(Constant::null(), Constant::new(Option::<i64>::None));
    }

    #[test]
    fn composite_literals() {
        let point = GeoPoint::new(1.0, 2.0).unwrap();
        assert_eq!(Constant::new(point), Constant::new(point));
        assert_eq!(
            Constant::new(Timestamp::new(10, 0)),
            Constant::new(Timestamp::from_unix_millis(10_000))
        );
        assert_ne!(
            Constant::new(VectorValue::new(vec![1.0])),
            Constant::new(VectorValue::new(vec![2.0]))
        );
    }

    #[test]
    fn reference_constant_holds_path() {
        let key = DocumentKey::from_string("cities/sf").unwrap();
        let constant = Constant::reference(&key);
        assert_eq!(constant.value().type_name(), "reference");
    }
}
