mod database_id;
mod document_key;
mod field_path;
mod geo_point;
mod resource_path;
mod timestamp;
mod vector_value;

pub use database_id::{DatabaseId, DEFAULT_DATABASE_ID};
pub use document_key::DocumentKey;
pub use field_path::{FieldPath, IntoFieldPath, DOCUMENT_ID_FIELD};
pub use geo_point::GeoPoint;
pub use resource_path::ResourcePath;
pub use timestamp::Timestamp;
pub(crate) use vector_value::same_double;
pub use vector_value::VectorValue;
