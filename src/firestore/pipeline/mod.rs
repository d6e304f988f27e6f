//! Pipeline expression builder.
//!
//! Expressions are immutable trees of [`Field`] and [`Constant`] leaves joined
//! by [`FunctionExpression`] calls. The [`ExpressionOps`] trait supplies the
//! operator algebra for every node type, and the terminal wrappers
//! ([`AliasedExpression`], [`Ordering`], [`AggregateFunction`]) feed the stages
//! of a [`Pipeline`].
//!
//! ```
//! use firestore_pipeline::firestore::model::DatabaseId;
//! use firestore_pipeline::firestore::pipeline::{field, ExpressionOps, Pipeline};
//! use firestore_pipeline::firestore::remote::JsonProtoSerializer;
//!
//! let pipeline = Pipeline::collection("orders")
//!     .where_(field("status").equal("shipped"))
//!     .select([field("price").multiply(field("quantity")).alias("total")])
//!     .sort([field("total").descending()]);
//!
//! let serializer = JsonProtoSerializer::new(DatabaseId::default("my-project"));
//! let request = pipeline.to_proto(&serializer).unwrap();
//! assert_eq!(request["structuredPipeline"]["pipeline"]["stages"][1]["name"], "where");
//! ```

mod aggregate;
mod aliased;
mod boolean;
mod constant;
mod expression;
mod field;
mod function;
mod ops;
mod ordering;
mod pipeline;
mod search;
mod stage;
mod time;

pub use aggregate::{count_all, AggregateFunction, AliasedAggregate};
pub use aliased::{AliasedExpression, Selectable};
pub use boolean::{and, boolean_function, conditional, not, or, xor, BooleanExpression};
pub use constant::{constant, Constant};
pub use expression::{Expression, IntoExpression, IntoVectorExpression, ToExpression};
pub use field::{document_id, field, Field};
pub use function::{array, current_timestamp, function, map, rand, FunctionExpression};
pub use ops::ExpressionOps;
pub use ordering::{OrderDirection, Ordering};
pub use pipeline::Pipeline;
pub use search::{document_snippet, search_document_for, topicality_score, SearchMode};
pub use stage::{DistanceMeasure, SampleSize, Stage};
pub use time::{TimeGranularity, TimeUnit};
