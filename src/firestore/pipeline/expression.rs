use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};

use crate::firestore::model::{DocumentKey, GeoPoint, Timestamp, VectorValue};
use crate::firestore::value::{BytesValue, FirestoreValue, ValueKind};

use super::constant::Constant;
use super::field::Field;
use super::function::{array, map, FunctionExpression};

/// A node of a pipeline expression tree.
///
/// Trees are immutable: every operator in [`ExpressionOps`](super::ExpressionOps)
/// clones its receiver into a new function node, so building `e.add(1)` leaves
/// `e` untouched. Nodes hold no shared state and are `Send + Sync`.
#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    Field(Field),
    Constant(Constant),
    Function(FunctionExpression),
}

impl Expression {
    pub fn as_field(&self) -> Option<&Field> {
        match self {
            Expression::Field(field) => Some(field),
            _ => None,
        }
    }

    pub fn as_constant(&self) -> Option<&Constant> {
        match self {
            Expression::Constant(constant) => Some(constant),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionExpression> {
        match self {
            Expression::Function(function) => Some(function),
            _ => None,
        }
    }

    /// Operator name for function nodes, `None` for leaves.
    pub fn function_name(&self) -> Option<&str> {
        self.as_function().map(FunctionExpression::name)
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Field(field) => write!(f, "{}", field.field_name()),
            Expression::Constant(constant) => write_value(f, constant.value()),
            Expression::Function(function) => write!(f, "{function}"),
        }
    }
}

fn write_value(f: &mut Formatter<'_>, value: &FirestoreValue) -> std::fmt::Result {
    match value.kind() {
        ValueKind::Null => f.write_str("null"),
        ValueKind::Boolean(flag) => write!(f, "{flag}"),
        ValueKind::Integer(integer) => write!(f, "{integer}"),
        ValueKind::Double(double) => write!(f, "{double:?}"),
        ValueKind::Timestamp(timestamp) => write!(f, "timestamp({})", timestamp.to_rfc3339()),
        ValueKind::String(string) => write!(f, "{string:?}"),
        ValueKind::Bytes(bytes) => write!(f, "bytes({})", bytes.to_base64()),
        ValueKind::Reference(path) => write!(f, "reference({path})"),
        ValueKind::GeoPoint(point) => write!(f, "{point}"),
        ValueKind::Array(values) => {
            f.write_str("[")?;
            for (index, value) in values.values().iter().enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                write_value(f, value)?;
            }
            f.write_str("]")
        }
        ValueKind::Map(fields) => {
            f.write_str("{")?;
            for (index, (key, value)) in fields.fields().iter().enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{key:?}: ")?;
                write_value(f, value)?;
            }
            f.write_str("}")
        }
        ValueKind::Vector(vector) => write!(f, "vector({:?})", vector.as_slice()),
    }
}

/// Implemented by every node type that can stand as the receiver of an
/// expression operator.
pub trait ToExpression {
    fn to_expression(&self) -> Expression;
}

impl ToExpression for Expression {
    fn to_expression(&self) -> Expression {
        self.clone()
    }
}

impl ToExpression for Field {
    fn to_expression(&self) -> Expression {
        Expression::Field(self.clone())
    }
}

impl ToExpression for Constant {
    fn to_expression(&self) -> Expression {
        Expression::Constant(self.clone())
    }
}

impl ToExpression for FunctionExpression {
    fn to_expression(&self) -> Expression {
        Expression::Function(self.clone())
    }
}

/// Lifts expression nodes and plain Rust literals into an [`Expression`].
///
/// Literal scalars become [`Constant`] leaves, `None` becomes the explicit
/// null constant, sequences become an `array(...)` call over their lifted
/// elements and string-keyed maps become a `map(key, value, ...)` call.
/// Expression nodes pass through unchanged, so `field("x").add(5)` and
/// `field("x").add(Constant::new(5))` build identical trees.
pub trait IntoExpression {
    fn into_expression(self) -> Expression;
}

impl IntoExpression for Expression {
    fn into_expression(self) -> Expression {
        self
    }
}

impl IntoExpression for &Expression {
    fn into_expression(self) -> Expression {
        self.clone()
    }
}

macro_rules! impl_node_into_expression {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl IntoExpression for $ty {
                fn into_expression(self) -> Expression {
                    Expression::$variant(self)
                }
            }

            impl IntoExpression for &$ty {
                fn into_expression(self) -> Expression {
                    Expression::$variant(self.clone())
                }
            }

            impl From<$ty> for Expression {
                fn from(value: $ty) -> Self {
                    Expression::$variant(value)
                }
            }
        )*
    };
}

impl_node_into_expression!(
    Field => Field,
    Constant => Constant,
    FunctionExpression => Function,
);

macro_rules! impl_literal_into_expression {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoExpression for $ty {
                fn into_expression(self) -> Expression {
                    Expression::Constant(Constant::new(self))
                }
            }
        )*
    };
}

impl_literal_into_expression!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    f32,
    f64,
    &str,
    String,
    &String,
    Timestamp,
    DateTime<Utc>,
    BytesValue,
    GeoPoint,
    VectorValue,
    FirestoreValue,
    &DocumentKey,
);

impl<T> IntoExpression for Option<T>
where
    T: IntoExpression,
{
    fn into_expression(self) -> Expression {
        match self {
            Some(value) => value.into_expression(),
            None => Expression::Constant(Constant::null()),
        }
    }
}

impl<T> IntoExpression for Vec<T>
where
    T: IntoExpression,
{
    fn into_expression(self) -> Expression {
        array(self).into_expression()
    }
}

impl<T, const N: usize> IntoExpression for [T; N]
where
    T: IntoExpression,
{
    fn into_expression(self) -> Expression {
        array(self).into_expression()
    }
}

impl<T> IntoExpression for &[T]
where
    T: IntoExpression + Clone,
{
    fn into_expression(self) -> Expression {
        array(self.iter().cloned()).into_expression()
    }
}

impl<K, V> IntoExpression for BTreeMap<K, V>
where
    K: Into<String>,
    V: IntoExpression,
{
    fn into_expression(self) -> Expression {
        map(self).into_expression()
    }
}

/// Right-hand operand of the vector distance operators.
///
/// Accepts any expression node, a [`VectorValue`], or raw `f64` components;
/// raw components are lifted to a vector constant rather than an array.
pub trait IntoVectorExpression {
    fn into_vector_expression(self) -> Expression;
}

impl<T> IntoVectorExpression for T
where
    T: ToExpression,
{
    fn into_vector_expression(self) -> Expression {
        self.to_expression()
    }
}

impl IntoVectorExpression for VectorValue {
    fn into_vector_expression(self) -> Expression {
        Expression::Constant(Constant::new(self))
    }
}

impl IntoVectorExpression for &VectorValue {
    fn into_vector_expression(self) -> Expression {
        Expression::Constant(Constant::new(self.clone()))
    }
}

impl IntoVectorExpression for Vec<f64> {
    fn into_vector_expression(self) -> Expression {
        VectorValue::new(self).into_vector_expression()
    }
}

impl IntoVectorExpression for &[f64] {
    fn into_vector_expression(self) -> Expression {
        VectorValue::from(self).into_vector_expression()
    }
}

impl<const N: usize> IntoVectorExpression for [f64; N] {
    fn into_vector_expression(self) -> Expression {
        VectorValue::from(self).into_vector_expression()
    }
}
