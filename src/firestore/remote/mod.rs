pub mod pipeline_proto;
pub mod serializer;

pub use pipeline_proto::{
    decode_expression, encode_aggregate, encode_aliased, encode_expression, encode_ordering,
};
pub use serializer::JsonProtoSerializer;
