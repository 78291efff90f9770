//! Object Module - Heap Value Representation
//!
//! Every heap value is a tagged variant: a scalar integer or a pair of
//! non-owning edges to other heap values. Edges exist only for tracing;
//! they never control lifetime.

pub mod handle;

pub use handle::Handle;

use serde::Serialize;
use std::fmt;

/// Object kind tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// Integer value, no outgoing edges
    Scalar,
    /// Two edges (`first`, `second`)
    Pair,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKind::Scalar => write!(f, "scalar"),
            ObjectKind::Pair => write!(f, "pair"),
        }
    }
}

/// Payload of a heap value
///
/// Constructing a `Value` does not allocate; hand it to
/// [`Heap::allocate`](crate::Heap::allocate) to materialize it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    Scalar(i64),
    Pair { first: Handle, second: Handle },
}

impl Value {
    /// Describe a scalar
    pub fn scalar(value: i64) -> Self {
        Value::Scalar(value)
    }

    /// Describe a pair
    pub fn pair(first: Handle, second: Handle) -> Self {
        Value::Pair { first, second }
    }

    /// Kind tag of this value
    pub fn kind(&self) -> ObjectKind {
        match self {
            Value::Scalar(_) => ObjectKind::Scalar,
            Value::Pair { .. } => ObjectKind::Pair,
        }
    }

    /// Outgoing edges traced by the mark phase
    pub fn edges(&self) -> impl Iterator<Item = Handle> {
        let edges = match *self {
            Value::Scalar(_) => [None, None],
            Value::Pair { first, second } => [Some(first), Some(second)],
        };
        edges.into_iter().flatten()
    }

    /// Scalar payload, if any
    pub fn as_scalar(&self) -> Option<i64> {
        match *self {
            Value::Scalar(value) => Some(value),
            Value::Pair { .. } => None,
        }
    }

    /// Pair edges, if any
    pub fn as_pair(&self) -> Option<(Handle, Handle)> {
        match *self {
            Value::Pair { first, second } => Some((first, second)),
            Value::Scalar(_) => None,
        }
    }
}

/// A heap value as stored in the object table
///
/// `next` threads the registry through the table; `marked` is scratch
/// state owned by the collector and is false outside a collection.
#[derive(Debug)]
pub(crate) struct HeapObject {
    pub(crate) value: Value,
    pub(crate) marked: bool,
    pub(crate) next: Option<u32>,
}

impl HeapObject {
    pub(crate) fn new(value: Value, next: Option<u32>) -> Self {
        Self {
            value,
            marked: false,
            next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_has_no_edges() {
        let value = Value::scalar(42);
        assert_eq!(value.kind(), ObjectKind::Scalar);
        assert_eq!(value.edges().count(), 0);
        assert_eq!(value.as_scalar(), Some(42));
        assert_eq!(value.as_pair(), None);
    }

    #[test]
    fn test_pair_edges() {
        let a = Handle::new(0, 0);
        let b = Handle::new(1, 0);
        let value = Value::pair(a, b);

        assert_eq!(value.kind(), ObjectKind::Pair);
        assert_eq!(value.edges().collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(value.as_pair(), Some((a, b)));
    }

    #[test]
    fn test_new_object_is_unmarked() {
        let object = HeapObject::new(Value::scalar(1), None);
        assert!(!object.marked);
    }

    #[test]
    fn test_value_serializes_with_kind_tag() {
        let json = serde_json::to_string(&Value::scalar(3)).unwrap();
        assert_eq!(json, r#"{"scalar":3}"#);

        let pair = Value::pair(Handle::new(0, 1), Handle::new(2, 0));
        let json = serde_json::to_string(&pair).unwrap();
        assert!(json.starts_with(r#"{"pair":{"first":"#));
    }
}
