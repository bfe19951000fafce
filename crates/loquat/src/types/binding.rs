use std::collections::HashMap;

use time::OffsetDateTime;

use super::{Number, Value};

/// Caller-supplied arguments for one format call, keyed by variable name.
pub type Args = HashMap<String, Binding>;

/// A flat ordered sequence of values bound to one argument name.
///
/// Scalars, slices, arrays and vectors all normalize into this shape; a
/// scalar is a one-element sequence. Nested sequences cannot be constructed
/// through this API, which enforces the flat-sequence input contract at
/// compile time instead of with a runtime argument error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Binding(Vec<Value>);

impl Binding {
    /// The values in this binding, in insertion order.
    pub fn values(&self) -> &[Value] {
        &self.0
    }

    /// Whether this binding holds no values.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of values in this binding.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<T: Into<Value>> From<Vec<T>> for Binding {
    fn from(values: Vec<T>) -> Self {
        Binding(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Binding {
    fn from(values: [T; N]) -> Self {
        Binding(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value> + Clone> From<&[T]> for Binding {
    fn from(values: &[T]) -> Self {
        Binding(values.iter().cloned().map(Into::into).collect())
    }
}

macro_rules! binding_from_scalar {
    ($($t:ty),+) => {
        $(impl From<$t> for Binding {
            fn from(v: $t) -> Self {
                Binding(vec![Value::from(v)])
            }
        })+
    };
}

binding_from_scalar!(
    i8, i16, i32, i64, u8, u16, u32, u64, usize, f32, f64, String, &str
);

impl From<Value> for Binding {
    fn from(v: Value) -> Self {
        Binding(vec![v])
    }
}

impl From<Number> for Binding {
    fn from(n: Number) -> Self {
        Binding(vec![Value::Number(n)])
    }
}

impl From<OffsetDateTime> for Binding {
    fn from(t: OffsetDateTime) -> Self {
        Binding(vec![Value::Temporal(t)])
    }
}
