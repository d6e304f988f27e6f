use crate::firestore::error::FirestoreResult;
use crate::firestore::model::{FieldPath, IntoFieldPath, DOCUMENT_ID_FIELD};

/// Expression leaf naming a document field.
///
/// Dotted names address nested map entries. The stored name is the canonical
/// wire form, so `field("zip-code")` and a `FieldPath` with the same segment
/// resolve to the same field.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Field {
    field_name: String,
}

impl Field {
    /// Names containing backticks are taken as already escaped. Names that
    /// are not valid dotted paths are kept as given.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        if name.contains('`') {
            return Self { field_name: name };
        }
        match FieldPath::from_dot_separated(&name) {
            Ok(path) => Self::from_path(&path),
            Err(_) => Self { field_name: name },
        }
    }

    /// Builds a field from a validated path, escaping segments that are not
    /// plain identifiers.
    pub fn from_path(path: &FieldPath) -> Self {
        Self {
            field_name: path.canonical_string(),
        }
    }

    /// Validates a dotted path (or segment list) before building the field.
    pub fn parse(path: impl IntoFieldPath) -> FirestoreResult<Self> {
        Ok(Self::from_path(&path.into_field_path()?))
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn is_document_id(&self) -> bool {
        self.field_name == DOCUMENT_ID_FIELD
    }
}

impl From<&str> for Field {
    fn from(value: &str) -> Self {
        Field::new(value)
    }
}

impl From<String> for Field {
    fn from(value: String) -> Self {
        Field::new(value)
    }
}

impl From<&FieldPath> for Field {
    fn from(value: &FieldPath) -> Self {
        Field::from_path(value)
    }
}

impl From<FieldPath> for Field {
    fn from(value: FieldPath) -> Self {
        Field::from_path(&value)
    }
}

pub fn field(name: impl Into<String>) -> Field {
    Field::new(name)
}

/// The reserved field that resolves to a document's own identity.
pub fn document_id() -> Field {
    Field::new(DOCUMENT_ID_FIELD)
}
