/// Dense embedding vector literal consumed by the vector distance operators
/// and `find_nearest` stages.
#[derive(Clone, Debug, Default)]
pub struct VectorValue {
    values: Vec<f64>,
}

impl VectorValue {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
        }
    }

    pub fn to_array(&self) -> Vec<f64> {
        self.values.clone()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PartialEq for VectorValue {
    fn eq(&self, other: &Self) -> bool {
        self.values.len() == other.values.len()
            && self
                .values
                .iter()
                .zip(&other.values)
                .all(|(left, right)| same_double(*left, *right))
    }
}

/// Literal equality for doubles: any NaN matches any NaN, and `0.0` differs
/// from `-0.0` since both encode differently.
pub(crate) fn same_double(left: f64, right: f64) -> bool {
    left.to_bits() == right.to_bits() || (left.is_nan() && right.is_nan())
}

impl From<Vec<f64>> for VectorValue {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

impl From<&[f64]> for VectorValue {
    fn from(values: &[f64]) -> Self {
        Self::new(values.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for VectorValue {
    fn from(values: [f64; N]) -> Self {
        Self::new(values.to_vec())
    }
}
