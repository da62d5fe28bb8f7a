//! Structured attributes attached to log records and handlers.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// Value carried by an [`Attr`].
#[derive(Clone)]
pub enum Value {
    /// Absent value. Attributes holding it are dropped during encoding.
    Empty,
    /// Any JSON-representable scalar or caller-supplied JSON document.
    Scalar(serde_json::Value),
    /// An error, encoded as its display message.
    Error(Arc<dyn StdError + Send + Sync>),
    /// Nested attributes, encoded as a sub-object.
    Group(Vec<Attr>),
}

impl Value {
    /// Whether the value carries nothing worth encoding.
    ///
    /// A group is empty when every child resolves to empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Empty => true,
            Value::Group(children) => children.iter().all(Attr::is_empty),
            Value::Scalar(_) | Value::Error(_) => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Empty => f.write_str("Empty"),
            Value::Scalar(v) => f.debug_tuple("Scalar").field(v).finish(),
            Value::Error(e) => f.debug_tuple("Error").field(&e.to_string()).finish(),
            Value::Group(children) => f.debug_tuple("Group").field(children).finish(),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        Value::Scalar(value)
    }
}

/// A key/value pair.
#[derive(Debug, Clone)]
pub struct Attr {
    pub key: String,
    pub value: Value,
}

impl Attr {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, Value::Scalar(serde_json::Value::String(value.into())))
    }

    pub fn int(key: impl Into<String>, value: i64) -> Self {
        Self::new(key, Value::Scalar(value.into()))
    }

    pub fn bool(key: impl Into<String>, value: bool) -> Self {
        Self::new(key, Value::Scalar(value.into()))
    }

    /// Arbitrary JSON value, as received from an inbound request.
    pub fn any(key: impl Into<String>, value: serde_json::Value) -> Self {
        Self::new(key, Value::Scalar(value))
    }

    pub fn error<E>(key: impl Into<String>, err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::new(key, Value::Error(Arc::new(err)))
    }

    pub fn group(key: impl Into<String>, children: impl IntoIterator<Item = Attr>) -> Self {
        Self::new(key, Value::Group(children.into_iter().collect()))
    }

    pub fn empty(key: impl Into<String>) -> Self {
        Self::new(key, Value::Empty)
    }

    /// Whether this attribute is dropped when encoded.
    ///
    /// Matches both an explicitly empty value and the zero attribute
    /// (no key, null value).
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
            || (self.key.is_empty() && matches!(self.value, Value::Scalar(serde_json::Value::Null)))
    }
}
