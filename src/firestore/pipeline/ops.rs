use super::aggregate::AggregateFunction;
use super::aliased::AliasedExpression;
use super::boolean::BooleanExpression;
use super::expression::{Expression, IntoExpression, IntoVectorExpression, ToExpression};
use super::function::FunctionExpression;
use super::ordering::{OrderDirection, Ordering};

fn unary(name: &str, receiver: Expression) -> FunctionExpression {
    FunctionExpression::new(name, [receiver])
}

fn binary(name: &str, receiver: Expression, other: impl IntoExpression) -> FunctionExpression {
    FunctionExpression::new(name, [receiver, other.into_expression()])
}

fn variadic<I, T>(name: &str, receiver: Expression, others: I) -> FunctionExpression
where
    I: IntoIterator<Item = T>,
    T: IntoExpression,
{
    let mut args = vec![receiver];
    args.extend(others.into_iter().map(IntoExpression::into_expression));
    FunctionExpression::new(name, args)
}

fn predicate(name: &str, args: Vec<Expression>) -> BooleanExpression {
    BooleanExpression::call(name, args)
}

/// The expression algebra.
///
/// Every operator takes the receiver by reference and returns a new node
/// whose first argument is a copy of the receiver; the receiver is never
/// modified. Operands accept anything implementing [`IntoExpression`], so
/// literals and expressions can be mixed freely:
///
/// ```
/// use firestore_pipeline::firestore::pipeline::{field, ExpressionOps};
///
/// let total = field("price").multiply(field("quantity")).add(5);
/// assert_eq!(total.to_string(), "add(multiply(price, quantity), 5)");
/// ```
///
/// Type errors such as `add` on a string are not detected here; the backend
/// reports them when the pipeline runs.
pub trait ExpressionOps: ToExpression {
    // Arithmetic

    fn add(&self, other: impl IntoExpression) -> FunctionExpression {
        binary("add", self.to_expression(), other)
    }

    fn subtract(&self, other: impl IntoExpression) -> FunctionExpression {
        binary("subtract", self.to_expression(), other)
    }

    fn multiply(&self, other: impl IntoExpression) -> FunctionExpression {
        binary("multiply", self.to_expression(), other)
    }

    /// `self / divisor`.
    fn divide(&self, divisor: impl IntoExpression) -> FunctionExpression {
        binary("divide", self.to_expression(), divisor)
    }

    /// Remainder of `self / divisor` (`mod` on the wire).
    fn modulo(&self, divisor: impl IntoExpression) -> FunctionExpression {
        binary("mod", self.to_expression(), divisor)
    }

    /// Raises `self` to `exponent`. Results that underflow evaluate to zero.
    fn pow(&self, exponent: impl IntoExpression) -> FunctionExpression {
        binary("pow", self.to_expression(), exponent)
    }

    fn sqrt(&self) -> FunctionExpression {
        unary("sqrt", self.to_expression())
    }

    fn ln(&self) -> FunctionExpression {
        unary("ln", self.to_expression())
    }

    /// `e^self`. Underflow evaluates to zero and overflow to an absent value
    /// rather than an error.
    fn exp(&self) -> FunctionExpression {
        unary("exp", self.to_expression())
    }

    fn abs(&self) -> FunctionExpression {
        unary("abs", self.to_expression())
    }

    fn round(&self) -> FunctionExpression {
        unary("round", self.to_expression())
    }

    fn floor(&self) -> FunctionExpression {
        unary("floor", self.to_expression())
    }

    fn ceil(&self) -> FunctionExpression {
        unary("ceil", self.to_expression())
    }

    // Bitwise

    fn bit_and(&self, bits: impl IntoExpression) -> FunctionExpression {
        binary("bit_and", self.to_expression(), bits)
    }

    fn bit_or(&self, bits: impl IntoExpression) -> FunctionExpression {
        binary("bit_or", self.to_expression(), bits)
    }

    fn bit_xor(&self, bits: impl IntoExpression) -> FunctionExpression {
        binary("bit_xor", self.to_expression(), bits)
    }

    fn bit_not(&self) -> FunctionExpression {
        unary("bit_not", self.to_expression())
    }

    fn bit_left_shift(&self, count: impl IntoExpression) -> FunctionExpression {
        binary("bit_left_shift", self.to_expression(), count)
    }

    fn bit_right_shift(&self, count: impl IntoExpression) -> FunctionExpression {
        binary("bit_right_shift", self.to_expression(), count)
    }

    // Comparison

    fn equal(&self, other: impl IntoExpression) -> BooleanExpression {
        predicate("equal", vec![self.to_expression(), other.into_expression()])
    }

    fn not_equal(&self, other: impl IntoExpression) -> BooleanExpression {
        predicate("not_equal", vec![self.to_expression(), other.into_expression()])
    }

    fn greater_than(&self, other: impl IntoExpression) -> BooleanExpression {
        predicate("greater_than", vec![self.to_expression(), other.into_expression()])
    }

    fn greater_than_or_equal(&self, other: impl IntoExpression) -> BooleanExpression {
        predicate(
            "greater_than_or_equal",
            vec![self.to_expression(), other.into_expression()],
        )
    }

    fn less_than(&self, other: impl IntoExpression) -> BooleanExpression {
        predicate("less_than", vec![self.to_expression(), other.into_expression()])
    }

    fn less_than_or_equal(&self, other: impl IntoExpression) -> BooleanExpression {
        predicate(
            "less_than_or_equal",
            vec![self.to_expression(), other.into_expression()],
        )
    }

    /// True when `self` equals any element of `values`.
    ///
    /// `values` may be a list of literals, a list of expressions (both lifted
    /// to an `array(...)` call) or a single array-valued expression.
    fn equal_any(&self, values: impl IntoExpression) -> BooleanExpression {
        predicate("equal_any", vec![self.to_expression(), values.into_expression()])
    }

    fn not_equal_any(&self, values: impl IntoExpression) -> BooleanExpression {
        predicate(
            "not_equal_any",
            vec![self.to_expression(), values.into_expression()],
        )
    }

    // Existence and null handling

    fn exists(&self) -> BooleanExpression {
        predicate("exists", vec![self.to_expression()])
    }

    fn is_error(&self) -> BooleanExpression {
        predicate("is_error", vec![self.to_expression()])
    }

    fn is_absent(&self) -> BooleanExpression {
        predicate("is_absent", vec![self.to_expression()])
    }

    fn is_nan(&self) -> BooleanExpression {
        predicate("is_nan", vec![self.to_expression()])
    }

    fn is_not_nan(&self) -> BooleanExpression {
        predicate("is_not_nan", vec![self.to_expression()])
    }

    fn is_null(&self) -> BooleanExpression {
        predicate("is_null", vec![self.to_expression()])
    }

    fn is_not_null(&self) -> BooleanExpression {
        predicate("is_not_null", vec![self.to_expression()])
    }

    /// Evaluates to `fallback` when `self` fails to evaluate.
    fn if_error(&self, fallback: impl IntoExpression) -> FunctionExpression {
        binary("if_error", self.to_expression(), fallback)
    }

    /// Evaluates to `default` when `self` produces no value. Errors are not
    /// caught.
    fn if_absent(&self, default: impl IntoExpression) -> FunctionExpression {
        binary("if_absent", self.to_expression(), default)
    }

    /// Largest of `self` and `others` under the cross-type value ordering.
    fn logical_maximum<I, T>(&self, others: I) -> FunctionExpression
    where
        I: IntoIterator<Item = T>,
        T: IntoExpression,
    {
        variadic("maximum", self.to_expression(), others)
    }

    fn logical_minimum<I, T>(&self, others: I) -> FunctionExpression
    where
        I: IntoIterator<Item = T>,
        T: IntoExpression,
    {
        variadic("minimum", self.to_expression(), others)
    }

    // Strings

    fn length(&self) -> FunctionExpression {
        unary("length", self.to_expression())
    }

    /// Number of Unicode code points.
    fn char_length(&self) -> FunctionExpression {
        unary("char_length", self.to_expression())
    }

    /// Length of the UTF-8 encoding in bytes.
    fn byte_length(&self) -> FunctionExpression {
        unary("byte_length", self.to_expression())
    }

    fn to_lower(&self) -> FunctionExpression {
        unary("to_lower", self.to_expression())
    }

    fn to_upper(&self) -> FunctionExpression {
        unary("to_upper", self.to_expression())
    }

    /// Strips leading and trailing whitespace.
    fn trim(&self) -> FunctionExpression {
        unary("trim", self.to_expression())
    }

    /// Strips any of the given characters from both ends.
    fn trim_characters(&self, characters: impl IntoExpression) -> FunctionExpression {
        binary("trim", self.to_expression(), characters)
    }

    /// Case-sensitive wildcard match (`%` any run, `_` one character).
    fn like(&self, pattern: impl IntoExpression) -> BooleanExpression {
        predicate("like", vec![self.to_expression(), pattern.into_expression()])
    }

    /// True when some substring matches `pattern`.
    fn regex_contains(&self, pattern: impl IntoExpression) -> BooleanExpression {
        predicate(
            "regex_contains",
            vec![self.to_expression(), pattern.into_expression()],
        )
    }

    /// True when the whole string matches `pattern`.
    fn regex_match(&self, pattern: impl IntoExpression) -> BooleanExpression {
        predicate(
            "regex_match",
            vec![self.to_expression(), pattern.into_expression()],
        )
    }

    fn string_contains(&self, substring: impl IntoExpression) -> BooleanExpression {
        predicate(
            "string_contains",
            vec![self.to_expression(), substring.into_expression()],
        )
    }

    fn starts_with(&self, prefix: impl IntoExpression) -> BooleanExpression {
        predicate("starts_with", vec![self.to_expression(), prefix.into_expression()])
    }

    fn ends_with(&self, suffix: impl IntoExpression) -> BooleanExpression {
        predicate("ends_with", vec![self.to_expression(), suffix.into_expression()])
    }

    fn string_concat<I, T>(&self, others: I) -> FunctionExpression
    where
        I: IntoIterator<Item = T>,
        T: IntoExpression,
    {
        variadic("string_concat", self.to_expression(), others)
    }

    /// Concatenates strings, arrays or bytes depending on the operand types.
    fn concat<I, T>(&self, others: I) -> FunctionExpression
    where
        I: IntoIterator<Item = T>,
        T: IntoExpression,
    {
        variadic("concat", self.to_expression(), others)
    }

    fn reverse(&self) -> FunctionExpression {
        unary("reverse", self.to_expression())
    }

    fn string_reverse(&self) -> FunctionExpression {
        unary("string_reverse", self.to_expression())
    }

    /// Substring starting at the 0-based `position` with at most `length`
    /// characters.
    fn substring(
        &self,
        position: impl IntoExpression,
        length: impl IntoExpression,
    ) -> FunctionExpression {
        FunctionExpression::new(
            "substring",
            [
                self.to_expression(),
                position.into_expression(),
                length.into_expression(),
            ],
        )
    }

    /// Substring from the 0-based `position` to the end.
    fn substring_from(&self, position: impl IntoExpression) -> FunctionExpression {
        binary("substring", self.to_expression(), position)
    }

    fn split(&self, delimiter: impl IntoExpression) -> FunctionExpression {
        binary("split", self.to_expression(), delimiter)
    }

    /// Joins the elements of an array of strings.
    fn join(&self, delimiter: impl IntoExpression) -> FunctionExpression {
        binary("join", self.to_expression(), delimiter)
    }

    fn replace_first(
        &self,
        find: impl IntoExpression,
        replacement: impl IntoExpression,
    ) -> FunctionExpression {
        FunctionExpression::new(
            "replace_first",
            [
                self.to_expression(),
                find.into_expression(),
                replacement.into_expression(),
            ],
        )
    }

    /// Replaces every occurrence of `find`.
    fn string_replace(
        &self,
        find: impl IntoExpression,
        replacement: impl IntoExpression,
    ) -> FunctionExpression {
        FunctionExpression::new(
            "string_replace",
            [
                self.to_expression(),
                find.into_expression(),
                replacement.into_expression(),
            ],
        )
    }

    // Arrays

    fn array_reverse(&self) -> FunctionExpression {
        unary("array_reverse", self.to_expression())
    }

    /// Appends each of `arrays` to `self`. Literal lists are lifted to
    /// `array(...)` calls.
    fn array_concat<I, T>(&self, arrays: I) -> FunctionExpression
    where
        I: IntoIterator<Item = T>,
        T: IntoExpression,
    {
        variadic("array_concat", self.to_expression(), arrays)
    }

    fn array_contains(&self, element: impl IntoExpression) -> BooleanExpression {
        predicate(
            "array_contains",
            vec![self.to_expression(), element.into_expression()],
        )
    }

    fn array_contains_all(&self, values: impl IntoExpression) -> BooleanExpression {
        predicate(
            "array_contains_all",
            vec![self.to_expression(), values.into_expression()],
        )
    }

    fn array_contains_any(&self, values: impl IntoExpression) -> BooleanExpression {
        predicate(
            "array_contains_any",
            vec![self.to_expression(), values.into_expression()],
        )
    }

    fn array_length(&self) -> FunctionExpression {
        unary("array_length", self.to_expression())
    }

    /// Element at `offset`. Negative offsets count from the end and the
    /// offset is sent as given; out of range offsets are evaluation errors.
    fn array_get(&self, offset: impl IntoExpression) -> FunctionExpression {
        binary("array_get", self.to_expression(), offset)
    }

    fn array_maximum(&self) -> FunctionExpression {
        unary("maximum", self.to_expression())
    }

    fn array_minimum(&self) -> FunctionExpression {
        unary("minimum", self.to_expression())
    }

    // Maps

    /// Value stored under `key`; absent when the key is missing.
    fn map_get(&self, key: impl IntoExpression) -> FunctionExpression {
        binary("map_get", self.to_expression(), key)
    }

    fn map_remove(&self, key: impl IntoExpression) -> FunctionExpression {
        binary("map_remove", self.to_expression(), key)
    }

    /// Merges `maps` into `self` left to right; later keys win.
    fn map_merge<I, T>(&self, maps: I) -> FunctionExpression
    where
        I: IntoIterator<Item = T>,
        T: IntoExpression,
    {
        variadic("map_merge", self.to_expression(), maps)
    }

    // Vectors

    fn vector_length(&self) -> FunctionExpression {
        unary("vector_length", self.to_expression())
    }

    fn cosine_distance(&self, other: impl IntoVectorExpression) -> FunctionExpression {
        FunctionExpression::new(
            "cosine_distance",
            [self.to_expression(), other.into_vector_expression()],
        )
    }

    fn dot_product(&self, other: impl IntoVectorExpression) -> FunctionExpression {
        FunctionExpression::new(
            "dot_product",
            [self.to_expression(), other.into_vector_expression()],
        )
    }

    fn euclidean_distance(&self, other: impl IntoVectorExpression) -> FunctionExpression {
        FunctionExpression::new(
            "euclidean_distance",
            [self.to_expression(), other.into_vector_expression()],
        )
    }

    fn manhattan_distance(&self, other: impl IntoVectorExpression) -> FunctionExpression {
        FunctionExpression::new(
            "manhattan_distance",
            [self.to_expression(), other.into_vector_expression()],
        )
    }

    // Timestamps

    fn unix_micros_to_timestamp(&self) -> FunctionExpression {
        unary("unix_micros_to_timestamp", self.to_expression())
    }

    fn timestamp_to_unix_micros(&self) -> FunctionExpression {
        unary("timestamp_to_unix_micros", self.to_expression())
    }

    fn unix_millis_to_timestamp(&self) -> FunctionExpression {
        unary("unix_millis_to_timestamp", self.to_expression())
    }

    fn timestamp_to_unix_millis(&self) -> FunctionExpression {
        unary("timestamp_to_unix_millis", self.to_expression())
    }

    fn unix_seconds_to_timestamp(&self) -> FunctionExpression {
        unary("unix_seconds_to_timestamp", self.to_expression())
    }

    fn timestamp_to_unix_seconds(&self) -> FunctionExpression {
        unary("timestamp_to_unix_seconds", self.to_expression())
    }

    /// Truncates to `granularity`, a [`TimeGranularity`](super::TimeGranularity)
    /// or any string-valued expression.
    fn timestamp_truncate(&self, granularity: impl IntoExpression) -> FunctionExpression {
        binary("timestamp_trunc", self.to_expression(), granularity)
    }

    /// Adds `amount` of `unit`. Encoded as `timestamp_add(self, unit, amount)`;
    /// an unknown unit string fails when the pipeline runs.
    fn timestamp_add(
        &self,
        amount: impl IntoExpression,
        unit: impl IntoExpression,
    ) -> FunctionExpression {
        FunctionExpression::new(
            "timestamp_add",
            [
                self.to_expression(),
                unit.into_expression(),
                amount.into_expression(),
            ],
        )
    }

    fn timestamp_subtract(
        &self,
        amount: impl IntoExpression,
        unit: impl IntoExpression,
    ) -> FunctionExpression {
        FunctionExpression::new(
            "timestamp_subtract",
            [
                self.to_expression(),
                unit.into_expression(),
                amount.into_expression(),
            ],
        )
    }

    // Identity and type

    /// Id of the document referenced by `self`.
    fn document_id(&self) -> FunctionExpression {
        unary("document_id", self.to_expression())
    }

    /// Id of the parent collection of the reference `self`. Root-level
    /// references have none and fail when evaluated.
    fn collection_id(&self) -> FunctionExpression {
        unary("collection_id", self.to_expression())
    }

    /// Dynamic type name of the value, e.g. `"string"` (`type` on the wire).
    fn type_of(&self) -> FunctionExpression {
        unary("type", self.to_expression())
    }

    fn as_boolean(&self) -> BooleanExpression {
        BooleanExpression::new(self.to_expression())
    }

    // Terminals

    /// Binds this expression to an output name (`as` in other SDKs).
    fn alias(&self, name: impl Into<String>) -> AliasedExpression {
        AliasedExpression::new(self.to_expression(), name)
    }

    fn ascending(&self) -> Ordering {
        Ordering::new(self.to_expression(), OrderDirection::Ascending)
    }

    fn descending(&self) -> Ordering {
        Ordering::new(self.to_expression(), OrderDirection::Descending)
    }

    fn count(&self) -> AggregateFunction {
        AggregateFunction::new("count", [self.to_expression()])
    }

    fn count_distinct(&self) -> AggregateFunction {
        AggregateFunction::new("count_distinct", [self.to_expression()])
    }

    fn sum(&self) -> AggregateFunction {
        AggregateFunction::new("sum", [self.to_expression()])
    }

    fn average(&self) -> AggregateFunction {
        AggregateFunction::new("average", [self.to_expression()])
    }

    fn minimum(&self) -> AggregateFunction {
        AggregateFunction::new("minimum", [self.to_expression()])
    }

    fn maximum(&self) -> AggregateFunction {
        AggregateFunction::new("maximum", [self.to_expression()])
    }
}

impl<T> ExpressionOps for T where T: ToExpression + ?Sized {}
