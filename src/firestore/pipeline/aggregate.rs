use super::expression::Expression;

/// An accumulator such as `sum(price)`, consumed by the `aggregate` stage.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregateFunction {
    name: String,
    args: Vec<Expression>,
}

impl AggregateFunction {
    pub fn new<I>(name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = Expression>,
    {
        Self {
            name: name.into(),
            args: args.into_iter().collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[Expression] {
        &self.args
    }

    pub fn alias(&self, name: impl Into<String>) -> AliasedAggregate {
        AliasedAggregate {
            alias: name.into(),
            aggregate: self.clone(),
        }
    }
}

/// An accumulator bound to its output field name.
#[derive(Clone, Debug, PartialEq)]
pub struct AliasedAggregate {
    alias: String,
    aggregate: AggregateFunction,
}

impl AliasedAggregate {
    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn aggregate(&self) -> &AggregateFunction {
        &self.aggregate
    }
}

/// Counts every input document.
pub fn count_all() -> AggregateFunction {
    AggregateFunction::new("count", Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firestore::pipeline::{field, ExpressionOps};

    #[test]
    fn count_all_has_no_arguments() {
        let aggregate = count_all();
        assert_eq!(aggregate.name(), "count");
        assert!(aggregate.args().is_empty());
    }

    #[test]
    fn alias_binds_output_name() {
        let aliased = field("price").sum().alias("total");
        assert_eq!(aliased.alias(), "total");
        assert_eq!(aliased.aggregate().name(), "sum");
        assert_eq!(aliased.aggregate().args(), &[Expression::Field(field("price"))]);
    }
}
