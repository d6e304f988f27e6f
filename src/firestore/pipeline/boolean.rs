use std::fmt::{Display, Formatter};
use std::ops::{BitAnd, BitOr, BitXor, Not};

use super::aggregate::AggregateFunction;
use super::expression::{Expression, IntoExpression, ToExpression};
use super::function::FunctionExpression;

/// An expression known to evaluate to a boolean.
///
/// Produced by comparison, predicate and existence operators and accepted by
/// `where` stages. It shares the node representation of [`Expression`]; the
/// wrapper only marks the result type.
#[derive(Clone, Debug, PartialEq)]
pub struct BooleanExpression {
    expression: Expression,
}

impl BooleanExpression {
    /// Marks an arbitrary expression as boolean-valued. Nothing is checked
    /// locally; a non-boolean result fails at evaluation time.
    pub fn new(expression: impl IntoExpression) -> Self {
        Self {
            expression: expression.into_expression(),
        }
    }

    pub(crate) fn from_function(function: FunctionExpression) -> Self {
        Self {
            expression: Expression::Function(function),
        }
    }

    pub(crate) fn call(name: &str, args: Vec<Expression>) -> Self {
        Self::from_function(FunctionExpression::new(name, args))
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    pub fn into_inner(self) -> Expression {
        self.expression
    }

    /// `conditional(self, then, otherwise)`.
    pub fn conditional(
        &self,
        then: impl IntoExpression,
        otherwise: impl IntoExpression,
    ) -> FunctionExpression {
        conditional(self.clone(), then, otherwise)
    }

    /// Counts the documents for which this condition holds.
    pub fn count_if(&self) -> AggregateFunction {
        AggregateFunction::new("count_if", [self.expression.clone()])
    }

    pub fn and(&self, other: impl Into<BooleanExpression>) -> BooleanExpression {
        and(self.clone(), other.into(), [])
    }

    pub fn or(&self, other: impl Into<BooleanExpression>) -> BooleanExpression {
        or(self.clone(), other.into(), [])
    }

    pub fn xor(&self, other: impl Into<BooleanExpression>) -> BooleanExpression {
        xor(self.clone(), other.into(), [])
    }

    pub fn negate(&self) -> BooleanExpression {
        not(self.clone())
    }
}

impl Display for BooleanExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.expression)
    }
}

impl ToExpression for BooleanExpression {
    fn to_expression(&self) -> Expression {
        self.expression.clone()
    }
}

impl IntoExpression for BooleanExpression {
    fn into_expression(self) -> Expression {
        self.expression
    }
}

impl IntoExpression for &BooleanExpression {
    fn into_expression(self) -> Expression {
        self.expression.clone()
    }
}

impl From<BooleanExpression> for Expression {
    fn from(value: BooleanExpression) -> Self {
        value.expression
    }
}

impl From<&BooleanExpression> for BooleanExpression {
    fn from(value: &BooleanExpression) -> Self {
        value.clone()
    }
}

fn variadic(
    name: &str,
    first: BooleanExpression,
    second: BooleanExpression,
    rest: impl IntoIterator<Item = BooleanExpression>,
) -> BooleanExpression {
    let mut args = vec![first.expression, second.expression];
    args.extend(rest.into_iter().map(|condition| condition.expression));
    BooleanExpression::call(name, args)
}

/// Logical conjunction of two or more conditions.
pub fn and(
    first: BooleanExpression,
    second: BooleanExpression,
    rest: impl IntoIterator<Item = BooleanExpression>,
) -> BooleanExpression {
    variadic("and", first, second, rest)
}

/// Logical disjunction of two or more conditions.
pub fn or(
    first: BooleanExpression,
    second: BooleanExpression,
    rest: impl IntoIterator<Item = BooleanExpression>,
) -> BooleanExpression {
    variadic("or", first, second, rest)
}

/// True when an odd number of the conditions hold.
pub fn xor(
    first: BooleanExpression,
    second: BooleanExpression,
    rest: impl IntoIterator<Item = BooleanExpression>,
) -> BooleanExpression {
    variadic("xor", first, second, rest)
}

pub fn not(condition: BooleanExpression) -> BooleanExpression {
    BooleanExpression::call("not", vec![condition.expression])
}

pub fn conditional(
    condition: BooleanExpression,
    then: impl IntoExpression,
    otherwise: impl IntoExpression,
) -> FunctionExpression {
    FunctionExpression::new(
        "conditional",
        [
            condition.expression,
            then.into_expression(),
            otherwise.into_expression(),
        ],
    )
}

/// Builds a call to a boolean-valued server function by name.
pub fn boolean_function<I, T>(name: impl Into<String>, args: I) -> BooleanExpression
where
    I: IntoIterator<Item = T>,
    T: IntoExpression,
{
    BooleanExpression::from_function(super::function::function(name, args))
}

impl BitAnd for BooleanExpression {
    type Output = BooleanExpression;

    fn bitand(self, rhs: Self) -> Self::Output {
        and(self, rhs, [])
    }
}

impl BitAnd for &BooleanExpression {
    type Output = BooleanExpression;

    fn bitand(self, rhs: Self) -> Self::Output {
        and(self.clone(), rhs.clone(), [])
    }
}

impl BitOr for BooleanExpression {
    type Output = BooleanExpression;

    fn bitor(self, rhs: Self) -> Self::Output {
        or(self, rhs, [])
    }
}

impl BitOr for &BooleanExpression {
    type Output = BooleanExpression;

    fn bitor(self, rhs: Self) -> Self::Output {
        or(self.clone(), rhs.clone(), [])
    }
}

impl BitXor for BooleanExpression {
    type Output = BooleanExpression;

    fn bitxor(self, rhs: Self) -> Self::Output {
        xor(self, rhs, [])
    }
}

impl BitXor for &BooleanExpression {
    type Output = BooleanExpression;

    fn bitxor(self, rhs: Self) -> Self::Output {
        xor(self.clone(), rhs.clone(), [])
    }
}

impl Not for BooleanExpression {
    type Output = BooleanExpression;

    fn not(self) -> Self::Output {
        not(self)
    }
}

impl Not for &BooleanExpression {
    type Output = BooleanExpression;

    fn not(self) -> Self::Output {
        not(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firestore::pipeline::{field, ExpressionOps};

    #[test]
    fn operators_build_named_calls() {
        let cheap = field("price").less_than(10);
        let new = field("condition").equal("new");

        let both = &cheap & &new;
        assert_eq!(both.expression().function_name(), Some("and"));
        assert_eq!(both, and(cheap.clone(), new.clone(), []));

        assert_eq!((cheap.clone() | new.clone()).expression().function_name(), Some("or"));
        assert_eq!((cheap.clone() ^ new.clone()).expression().function_name(), Some("xor"));
        assert_eq!((!cheap.clone()).expression().function_name(), Some("not"));
    }

    #[test]
    fn variadic_and_keeps_argument_order() {
        let a = field("a").exists();
        let b = field("b").exists();
        let c = field("c").exists();
        let combined = and(a.clone(), b.clone(), [c.clone()]);
        let args = combined.expression().as_function().unwrap().args().to_vec();
        assert_eq!(args, vec![a.into_inner(), b.into_inner(), c.into_inner()]);
    }

    #[test]
    fn conditional_takes_condition_first() {
        let call = field("rating").greater_than(4).conditional("good", "bad");
        assert_eq!(call.name(), "conditional");
        assert_eq!(call.args().len(), 3);
        assert_eq!(call.args()[1], "good".into_expression());
    }

    #[test]
    fn count_if_wraps_condition() {
        let aggregate = field("rating").greater_than(4).count_if();
        assert_eq!(aggregate.name(), "count_if");
        assert_eq!(aggregate.args().len(), 1);
    }

    #[test]
    fn boolean_function_is_an_extension_point() {
        let condition = boolean_function("is_positive", [field("x")]);
        assert_eq!(condition.expression().function_name(), Some("is_positive"));
    }
}
