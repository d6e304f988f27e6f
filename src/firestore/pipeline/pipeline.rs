use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use serde_json::{json, Value as JsonValue};

use crate::firestore::error::{invalid_argument, FirestoreError, FirestoreResult};
use crate::firestore::model::{DocumentKey, ResourcePath, VectorValue};
use crate::firestore::remote::pipeline_proto::encode_pipeline_request;
use crate::firestore::remote::serializer::JsonProtoSerializer;
use crate::logger::Logger;

use super::aggregate::AliasedAggregate;
use super::aliased::Selectable;
use super::boolean::BooleanExpression;
use super::expression::IntoExpression;
use super::field::Field;
use super::ordering::Ordering;
use super::stage::{DistanceMeasure, SampleSize, Stage};

static LOGGER: LazyLock<Logger> = LazyLock::new(|| Logger::new("@firebase/firestore/pipeline"));

/// An ordered list of stages, starting from a source.
///
/// Builder methods never fail. Invalid arguments (an empty selection, a
/// duplicate alias, a malformed path) are recorded and the first one is
/// returned by [`Pipeline::to_proto`], so a bad pipeline is never encoded.
#[derive(Clone, Debug, PartialEq)]
pub struct Pipeline {
    stages: Vec<Stage>,
    error: Option<FirestoreError>,
}

impl Pipeline {
    fn from_source(source: FirestoreResult<Stage>) -> Self {
        let pipeline = Self {
            stages: Vec::new(),
            error: None,
        };
        match source {
            Ok(stage) => pipeline.push(stage),
            Err(err) => pipeline.fail(err),
        }
    }

    /// All documents of the collection at `path`.
    pub fn collection(path: &str) -> Self {
        Self::from_source(ResourcePath::from_string(path).and_then(|path| {
            if path.is_empty() || path.len() % 2 == 0 {
                return Err(invalid_argument(format!(
                    "Invalid collection path '{path}': collection paths have an odd number of segments"
                )));
            }
            Ok(Stage::Collection { path })
        }))
    }

    /// All documents of every collection named `collection_id`.
    pub fn collection_group(collection_id: &str) -> Self {
        let source = if collection_id.is_empty() || collection_id.contains('/') {
            Err(invalid_argument(format!(
                "Invalid collection id '{collection_id}': ids must be non-empty and contain no '/'"
            )))
        } else {
            Ok(Stage::CollectionGroup {
                collection_id: collection_id.to_string(),
            })
        };
        Self::from_source(source)
    }

    /// Every document in the database.
    pub fn database() -> Self {
        Self::from_source(Ok(Stage::Database))
    }

    /// The given documents, by path.
    pub fn documents<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys = paths
            .into_iter()
            .map(|path| DocumentKey::from_string(path.as_ref()))
            .collect::<FirestoreResult<Vec<_>>>();
        Self::from_source(keys.and_then(|keys| {
            if keys.is_empty() {
                return Err(invalid_argument("documents requires at least one document"));
            }
            Ok(Stage::Documents { keys })
        }))
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// First argument error recorded while building, if any.
    pub fn error(&self) -> Option<&FirestoreError> {
        self.error.as_ref()
    }

    fn push(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    fn fail(mut self, err: FirestoreError) -> Self {
        LOGGER.warn_with(
            "rejected pipeline stage",
            json!({ "error": err.message(), "stages": self.stages.len() }),
        );
        if self.error.is_none() {
            self.error = Some(err);
        }
        self
    }

    fn push_checked(self, stage: FirestoreResult<Stage>) -> Self {
        match stage {
            Ok(stage) => self.push(stage),
            Err(err) => self.fail(err),
        }
    }

    /// Keeps documents matching `condition`.
    pub fn where_(self, condition: impl Into<BooleanExpression>) -> Self {
        self.push(Stage::Where {
            condition: condition.into(),
        })
    }

    pub fn limit(self, limit: i64) -> Self {
        if limit < 0 {
            return self.fail(invalid_argument(format!("limit must be non-negative, got {limit}")));
        }
        self.push(Stage::Limit { limit })
    }

    pub fn offset(self, offset: i64) -> Self {
        if offset < 0 {
            return self.fail(invalid_argument(format!(
                "offset must be non-negative, got {offset}"
            )));
        }
        self.push(Stage::Offset { offset })
    }

    /// Adds computed fields while keeping existing ones.
    pub fn add_fields<I, S>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Selectable>,
    {
        let stage = collect_selectables("add_fields", fields)
            .map(|fields| Stage::AddFields { fields });
        self.push_checked(stage)
    }

    pub fn remove_fields<I, F>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Field>,
    {
        let fields: Vec<Field> = fields.into_iter().map(Into::into).collect();
        if fields.is_empty() {
            return self.fail(invalid_argument("remove_fields requires at least one field"));
        }
        self.push(Stage::RemoveFields { fields })
    }

    /// Replaces each document with exactly the given fields.
    pub fn select<I, S>(self, selections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Selectable>,
    {
        let stage = collect_selectables("select", selections)
            .map(|selections| Stage::Select { selections });
        self.push_checked(stage)
    }

    pub fn distinct<I, S>(self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Selectable>,
    {
        let stage =
            collect_selectables("distinct", groups).map(|groups| Stage::Distinct { groups });
        self.push_checked(stage)
    }

    /// Aggregates all input documents into a single result.
    pub fn aggregate<I>(self, accumulators: I) -> Self
    where
        I: IntoIterator<Item = AliasedAggregate>,
    {
        self.aggregate_with_groups(accumulators, Vec::<Selectable>::new())
    }

    /// Aggregates per distinct combination of `groups`.
    pub fn aggregate_with_groups<I, G, S>(self, accumulators: I, groups: G) -> Self
    where
        I: IntoIterator<Item = AliasedAggregate>,
        G: IntoIterator<Item = S>,
        S: Into<Selectable>,
    {
        let accumulators: Vec<AliasedAggregate> = accumulators.into_iter().collect();
        let groups: Vec<Selectable> = groups.into_iter().map(Into::into).collect();
        let stage = check_aliases("aggregate", accumulators.iter().map(AliasedAggregate::alias))
            .and_then(|_| {
                if accumulators.is_empty() {
                    return Err(invalid_argument("aggregate requires at least one accumulator"));
                }
                check_aliases("aggregate", groups.iter().map(Selectable::alias))
            })
            .map(|_| Stage::Aggregate {
                accumulators,
                groups,
            });
        self.push_checked(stage)
    }

    /// Keeps the documents whose `field` vector is nearest to `vector`.
    pub fn find_nearest(
        self,
        field: impl Into<Field>,
        vector: impl Into<VectorValue>,
        distance_measure: DistanceMeasure,
        limit: Option<i64>,
        distance_field: Option<&str>,
    ) -> Self {
        if let Some(limit) = limit.filter(|limit| *limit <= 0) {
            return self.fail(invalid_argument(format!(
                "find_nearest limit must be positive, got {limit}"
            )));
        }
        self.push(Stage::FindNearest {
            field: field.into(),
            vector: vector.into(),
            distance_measure,
            limit,
            distance_field: distance_field.map(str::to_string),
        })
    }

    pub fn sort<I>(self, orderings: I) -> Self
    where
        I: IntoIterator<Item = Ordering>,
    {
        let orderings: Vec<Ordering> = orderings.into_iter().collect();
        if orderings.is_empty() {
            return self.fail(invalid_argument("sort requires at least one ordering"));
        }
        self.push(Stage::Sort { orderings })
    }

    /// Replaces each document with the map `expression` evaluates to.
    pub fn replace_with(self, expression: impl IntoExpression) -> Self {
        self.push(Stage::ReplaceWith {
            expression: expression.into_expression(),
        })
    }

    pub fn sample_count(self, count: i64) -> Self {
        if count < 0 {
            return self.fail(invalid_argument(format!(
                "sample count must be non-negative, got {count}"
            )));
        }
        self.push(Stage::Sample {
            size: SampleSize::Count(count),
        })
    }

    pub fn sample_percentage(self, percentage: f64) -> Self {
        if !(0.0..=1.0).contains(&percentage) {
            return self.fail(invalid_argument(format!(
                "sample percentage must be between 0 and 1, got {percentage}"
            )));
        }
        self.push(Stage::Sample {
            size: SampleSize::Percentage(percentage),
        })
    }

    /// Appends the results of `other`. Errors recorded on `other` surface
    /// when this pipeline is encoded.
    pub fn union(self, other: Pipeline) -> Self {
        self.push(Stage::Union {
            other: Box::new(other),
        })
    }

    /// Emits one document per element of an array field, binding the element
    /// to the selectable's alias.
    pub fn unnest(self, selectable: impl Into<Selectable>, index_field: Option<&str>) -> Self {
        let selectable = selectable.into();
        if selectable.alias().is_empty() {
            return self.fail(invalid_argument("unnest alias must not be empty"));
        }
        self.push(Stage::Unnest {
            selectable,
            index_field: index_field.map(str::to_string),
        })
    }

    /// A stage this builder has no dedicated method for.
    pub fn raw_stage<I, T>(self, name: &str, params: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: IntoExpression,
    {
        self.raw_stage_with_options(name, params, Vec::<(String, bool)>::new())
    }

    pub fn raw_stage_with_options<I, T, O, K, V>(self, name: &str, params: I, options: O) -> Self
    where
        I: IntoIterator<Item = T>,
        T: IntoExpression,
        O: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoExpression,
    {
        if name.is_empty() {
            return self.fail(invalid_argument("raw stage name must not be empty"));
        }
        let options: BTreeMap<String, _> = options
            .into_iter()
            .map(|(key, value)| (key.into(), value.into_expression()))
            .collect();
        self.push(Stage::Raw {
            name: name.to_string(),
            params: params.into_iter().map(IntoExpression::into_expression).collect(),
            options,
        })
    }

    /// Encodes the `ExecutePipeline` request body.
    pub fn to_proto(&self, serializer: &JsonProtoSerializer) -> FirestoreResult<JsonValue> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        let request = encode_pipeline_request(serializer, self)?;
        LOGGER.debug_with(
            "encoded pipeline",
            json!({
                "database": serializer.database_name(),
                "stages": self.stages.iter().map(Stage::name).collect::<Vec<_>>(),
            }),
        );
        Ok(request)
    }
}

fn collect_selectables<I, S>(stage: &str, selectables: I) -> FirestoreResult<Vec<Selectable>>
where
    I: IntoIterator<Item = S>,
    S: Into<Selectable>,
{
    let selectables: Vec<Selectable> = selectables.into_iter().map(Into::into).collect();
    if selectables.is_empty() {
        return Err(invalid_argument(format!(
            "{stage} requires at least one field"
        )));
    }
    check_aliases(stage, selectables.iter().map(Selectable::alias))?;
    Ok(selectables)
}

fn check_aliases<'a>(stage: &str, aliases: impl Iterator<Item = &'a str>) -> FirestoreResult<()> {
    let mut seen = BTreeSet::new();
    for alias in aliases {
        if alias.is_empty() {
            return Err(invalid_argument(format!("{stage}: alias must not be empty")));
        }
        if !seen.insert(alias) {
            return Err(invalid_argument(format!(
                "{stage}: duplicate alias or field '{alias}'"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firestore::model::DatabaseId;
    use crate::firestore::pipeline::{count_all, field, ExpressionOps};

    fn serializer() -> JsonProtoSerializer {
        JsonProtoSerializer::new(DatabaseId::default("project"))
    }

    #[test]
    fn stages_are_appended_in_order() {
        let pipeline = Pipeline::collection("books")
            .where_(field("rating").greater_than(4))
            .sort([field("rating").descending()])
            .limit(10);
        let names: Vec<_> = pipeline.stages().iter().map(Stage::name).collect();
        assert_eq!(names, ["collection", "where", "sort", "limit"]);
        assert!(pipeline.error().is_none());
    }

    #[test]
    fn invalid_collection_paths_are_recorded() {
        let pipeline = Pipeline::collection("books/b1");
        assert!(pipeline.stages().is_empty());
        let err = pipeline.to_proto(&serializer()).unwrap_err();
        assert_eq!(err.code_str(), "firestore/invalid-argument");
    }

    #[test]
    fn duplicate_aliases_are_rejected() {
        let pipeline = Pipeline::collection("books")
            .select([field("title").alias("x"), field("author").alias("x")]);
        let err = pipeline.error().unwrap();
        assert!(err.message().contains("duplicate alias"));
    }

    #[test]
    fn empty_aliases_are_rejected() {
        let pipeline = Pipeline::collection("books").add_fields([field("a").alias("")]);
        assert!(pipeline.error().unwrap().message().contains("alias must not be empty"));
    }

    #[test]
    fn empty_selections_are_rejected() {
        let pipeline = Pipeline::collection("books").select(Vec::<Selectable>::new());
        assert!(pipeline.to_proto(&serializer()).is_err());
    }

    #[test]
    fn first_error_wins() {
        let pipeline = Pipeline::collection("books")
            .limit(-1)
            .sort(Vec::new());
        assert!(pipeline.error().unwrap().message().starts_with("limit"));
    }

    #[test]
    fn aggregate_requires_accumulators() {
        let empty = Pipeline::collection("books").aggregate(Vec::new());
        assert!(empty.error().is_some());

        let grouped = Pipeline::collection("books")
            .aggregate_with_groups([count_all().alias("n")], ["genre"]);
        assert!(grouped.error().is_none());
    }

    #[test]
    fn sample_percentage_is_a_fraction() {
        assert!(Pipeline::database().sample_percentage(1.5).error().is_some());
        assert!(Pipeline::database().sample_percentage(0.25).error().is_none());
    }

    #[test]
    fn documents_require_document_paths() {
        assert!(Pipeline::documents(["books/b1", "books"]).error().is_some());
        assert!(Pipeline::documents(["books/b1"]).error().is_none());
    }
}
