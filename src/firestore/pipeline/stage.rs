use std::collections::BTreeMap;

use crate::firestore::model::{DocumentKey, ResourcePath, VectorValue};

use super::aggregate::AliasedAggregate;
use super::aliased::Selectable;
use super::boolean::BooleanExpression;
use super::expression::Expression;
use super::field::Field;
use super::ordering::Ordering;
use super::pipeline::Pipeline;

/// Distance function used by the `find_nearest` stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DistanceMeasure {
    Cosine,
    Euclidean,
    DotProduct,
}

impl DistanceMeasure {
    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceMeasure::Cosine => "cosine",
            DistanceMeasure::Euclidean => "euclidean",
            DistanceMeasure::DotProduct => "dot_product",
        }
    }
}

/// How many documents the `sample` stage keeps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SampleSize {
    Count(i64),
    /// Fraction of the input between 0 and 1.
    Percentage(f64),
}

/// One step of a pipeline. The first stage is always a source.
#[derive(Clone, Debug, PartialEq)]
pub enum Stage {
    Collection {
        path: ResourcePath,
    },
    CollectionGroup {
        collection_id: String,
    },
    Database,
    Documents {
        keys: Vec<DocumentKey>,
    },
    Where {
        condition: BooleanExpression,
    },
    Limit {
        limit: i64,
    },
    Offset {
        offset: i64,
    },
    AddFields {
        fields: Vec<Selectable>,
    },
    RemoveFields {
        fields: Vec<Field>,
    },
    Select {
        selections: Vec<Selectable>,
    },
    Distinct {
        groups: Vec<Selectable>,
    },
    Aggregate {
        accumulators: Vec<AliasedAggregate>,
        groups: Vec<Selectable>,
    },
    FindNearest {
        field: Field,
        vector: VectorValue,
        distance_measure: DistanceMeasure,
        limit: Option<i64>,
        distance_field: Option<String>,
    },
    Sort {
        orderings: Vec<Ordering>,
    },
    ReplaceWith {
        expression: Expression,
    },
    Sample {
        size: SampleSize,
    },
    Union {
        other: Box<Pipeline>,
    },
    Unnest {
        selectable: Selectable,
        index_field: Option<String>,
    },
    Raw {
        name: String,
        params: Vec<Expression>,
        options: BTreeMap<String, Expression>,
    },
}

impl Stage {
    /// Stage name as sent on the wire.
    pub fn name(&self) -> &str {
        match self {
            Stage::Collection { .. } => "collection",
            Stage::CollectionGroup { .. } => "collection_group",
            Stage::Database => "database",
            Stage::Documents { .. } => "documents",
            Stage::Where { .. } => "where",
            Stage::Limit { .. } => "limit",
            Stage::Offset { .. } => "offset",
            Stage::AddFields { .. } => "add_fields",
            Stage::RemoveFields { .. } => "remove_fields",
            Stage::Select { .. } => "select",
            Stage::Distinct { .. } => "distinct",
            Stage::Aggregate { .. } => "aggregate",
            Stage::FindNearest { .. } => "find_nearest",
            Stage::Sort { .. } => "sort",
            Stage::ReplaceWith { .. } => "replace_with",
            Stage::Sample { .. } => "sample",
            Stage::Union { .. } => "union",
            Stage::Unnest { .. } => "unnest",
            Stage::Raw { name, .. } => name,
        }
    }

    pub fn is_source(&self) -> bool {
        matches!(
            self,
            Stage::Collection { .. }
                | Stage::CollectionGroup { .. }
                | Stage::Database
                | Stage::Documents { .. }
        )
    }
}
