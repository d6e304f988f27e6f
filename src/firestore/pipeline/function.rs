use std::fmt::{Display, Formatter};

use super::constant::Constant;
use super::expression::{Expression, IntoExpression};

/// A named server-side function applied to an ordered argument list.
///
/// Argument order is significant and always matches the operator's logical
/// signature, so `subtract(a, b)` keeps `a` first.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionExpression {
    name: String,
    args: Vec<Expression>,
}

impl FunctionExpression {
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

    pub fn into_parts(self) -> (String, Vec<Expression>) {
        (self.name, self.args)
    }
}

impl Display for FunctionExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(", self.name)?;
        for (index, arg) in self.args.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(")")
    }
}

/// Builds a call to any server-side function, lifting each argument.
///
/// Operators the builder does not know about yet can be expressed through
/// this constructor without touching the node types.
pub fn function<I, T>(name: impl Into<String>, args: I) -> FunctionExpression
where
    I: IntoIterator<Item = T>,
    T: IntoExpression,
{
    FunctionExpression::new(name, args.into_iter().map(IntoExpression::into_expression))
}

/// Builds an array from the given elements, lifting literals to constants.
pub fn array<I, T>(elements: I) -> FunctionExpression
where
    I: IntoIterator<Item = T>,
    T: IntoExpression,
{
    function("array", elements)
}

/// Builds a map from key/value pairs as `map(key0, value0, key1, value1, ...)`.
pub fn map<I, K, V>(entries: I) -> FunctionExpression
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: IntoExpression,
{
    let mut args = Vec::new();
    for (key, value) in entries {
        args.push(Expression::Constant(Constant::new(key.into())));
        args.push(value.into_expression());
    }
    FunctionExpression::new("map", args)
}

pub fn current_timestamp() -> FunctionExpression {
    FunctionExpression::new("current_timestamp", Vec::<Expression>::new())
}

/// A pseudo-random double in `[0, 1)`, evaluated per document.
pub fn rand() -> FunctionExpression {
    FunctionExpression::new("rand", Vec::<Expression>::new())
}
