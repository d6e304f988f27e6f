use std::fmt::{Display, Formatter};

use super::expression::{Expression, IntoExpression};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OrderDirection {
    Ascending,
    Descending,
}

impl OrderDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderDirection::Ascending => "ascending",
            OrderDirection::Descending => "descending",
        }
    }
}

impl Display for OrderDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sort key for the `sort` stage.
#[derive(Clone, Debug, PartialEq)]
pub struct Ordering {
    expression: Expression,
    direction: OrderDirection,
}

impl Ordering {
    pub fn new(expression: impl IntoExpression, direction: OrderDirection) -> Self {
        Self {
            expression: expression.into_expression(),
            direction,
        }
    }

    pub fn ascending(expression: impl IntoExpression) -> Self {
        Self::new(expression, OrderDirection::Ascending)
    }

    pub fn descending(expression: impl IntoExpression) -> Self {
        Self::new(expression, OrderDirection::Descending)
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    pub fn direction(&self) -> OrderDirection {
        self.direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firestore::pipeline::{field, ExpressionOps};

    #[test]
    fn descending_wraps_expression() {
        let ordering = field("createdAt").descending();
        assert_eq!(ordering.direction(), OrderDirection::Descending);
        assert_eq!(ordering.expression(), &Expression::Field(field("createdAt")));
        assert_eq!(ordering, Ordering::descending(field("createdAt")));
    }
}
