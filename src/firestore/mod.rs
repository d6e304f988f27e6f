pub mod error;
pub mod model;
pub mod pipeline;
pub mod remote;
pub mod value;

pub use error::{FirestoreError, FirestoreErrorCode, FirestoreResult};
pub use model::{DatabaseId, FieldPath, Timestamp, VectorValue};
pub use pipeline::{Expression, ExpressionOps, Pipeline};
pub use remote::JsonProtoSerializer;
pub use value::FirestoreValue;
