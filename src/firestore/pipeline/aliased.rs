use super::expression::{Expression, IntoExpression};
use super::field::Field;

/// An expression bound to an output name, used by projection stages.
///
/// Re-aliasing replaces the name and keeps the wrapped expression, so no
/// intermediate alias is ever observable.
#[derive(Clone, Debug, PartialEq)]
pub struct AliasedExpression {
    name: String,
    expression: Expression,
}

impl AliasedExpression {
    pub fn new(expression: impl IntoExpression, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expression: expression.into_expression(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    pub fn alias(&self, name: impl Into<String>) -> AliasedExpression {
        Self {
            name: name.into(),
            expression: self.expression.clone(),
        }
    }

    pub fn into_parts(self) -> (String, Expression) {
        (self.name, self.expression)
    }
}

/// An output column of `select`, `add_fields`, `distinct` and similar stages.
///
/// A bare field selects itself under its own name; an aliased expression
/// selects its expression under the alias.
#[derive(Clone, Debug, PartialEq)]
pub struct Selectable {
    alias: String,
    expression: Expression,
}

impl Selectable {
    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    pub fn into_parts(self) -> (String, Expression) {
        (self.alias, self.expression)
    }
}

impl From<Field> for Selectable {
    fn from(value: Field) -> Self {
        Self {
            alias: value.field_name().to_string(),
            expression: Expression::Field(value),
        }
    }
}

impl From<&Field> for Selectable {
    fn from(value: &Field) -> Self {
        Selectable::from(value.clone())
    }
}

impl From<&str> for Selectable {
    fn from(value: &str) -> Self {
        Selectable::from(Field::new(value))
    }
}

impl From<String> for Selectable {
    fn from(value: String) -> Self {
        Selectable::from(Field::new(value))
    }
}

impl From<AliasedExpression> for Selectable {
    fn from(value: AliasedExpression) -> Self {
        let (alias, expression) = value.into_parts();
        Self { alias, expression }
    }
}

impl From<&AliasedExpression> for Selectable {
    fn from(value: &AliasedExpression) -> Self {
        Selectable::from(value.clone())
    }
}
