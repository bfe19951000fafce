use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::sync::Arc;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use super::Number;

/// A caller-defined opaque value carried through formatting.
///
/// Custom values flow through the resolver untouched; only their rendered
/// text participates in output. Implementations must be thread-safe since
/// resources and argument maps may be shared across concurrent format calls.
pub trait CustomValue: Debug + Send + Sync {
    /// Render this value for inclusion in formatted output.
    fn render(&self) -> String;
}

/// A runtime value flowing through pattern resolution.
#[derive(Debug, Clone)]
pub enum Value {
    /// A text value.
    String(String),
    /// An exact-decimal number.
    Number(Number),
    /// A date/time value.
    Temporal(OffsetDateTime),
    /// An opaque caller-defined value.
    Custom(Arc<dyn CustomValue>),
    /// A resolution failure carried as a value.
    ///
    /// The payload is the source-like form of the failed expression, e.g.
    /// `$name` or `NUMBER()`. Errors render inline as `{payload}` and
    /// propagate through formatting instead of aborting it.
    Error(String),
}

impl Value {
    /// Get this value as a string, if it is one.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get this value as a number, if it is one.
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Whether this value is an error marker.
    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }
}

/// Custom values compare by identity (same `Arc`); everything else compares
/// by content. Values of different kinds are never equal.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Temporal(a), Value::Temporal(b)) => a == b,
            (Value::Custom(a), Value::Custom(b)) => Arc::ptr_eq(a, b),
            (Value::Error(a), Value::Error(b)) => a == b,
            _ => false,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Number(n) => write!(f, "{n}"),
            Value::Temporal(t) => match t.format(&Rfc3339) {
                Ok(s) => f.write_str(&s),
                Err(_) => f.write_str("{invalid date}"),
            },
            Value::Custom(c) => f.write_str(&c.render()),
            Value::Error(marker) => write!(f, "{{{marker}}}"),
        }
    }
}

macro_rules! value_from_number {
    ($($t:ty),+) => {
        $(impl From<$t> for Value {
            fn from(n: $t) -> Self {
                Value::Number(Number::from(n))
            }
        })+
    };
}

value_from_number!(i8, i16, i32, i64, u8, u16, u32, u64, usize, f32, f64);

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<OffsetDateTime> for Value {
    fn from(t: OffsetDateTime) -> Self {
        Value::Temporal(t)
    }
}

impl From<Arc<dyn CustomValue>> for Value {
    fn from(c: Arc<dyn CustomValue>) -> Self {
        Value::Custom(c)
    }
}
