//! Attribute map values.
//!
//! Attributes are internal key/value data stashed on a block, e.g., by a
//! transformation pass. Unlike parameters they are never serialized by a
//! renderer, and their values are arbitrary types, not strings.
//!
//! When a tree is cloned, each attribute value is either deep-copied or
//! shared between the original and the clone. That choice is made **at
//! insertion time**, not at clone time: a value stored with
//! [`AttributeValue::owned`] carries a clone capability and is deep-copied,
//! while a value stored with [`AttributeValue::shared`] is an `Arc` and the
//! same instance is visible from both trees. This keeps the clone algorithm
//! uniform — it just calls `Clone::clone` on the map.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A value that can live in an owned attribute slot: any `'static` type that
/// is `Clone` (plus `Send + Sync` so trees can move across threads).
///
/// Implemented automatically for every eligible type.
pub trait CloneableValue: Any + Send + Sync {
    /// Clones the value behind the trait object.
    fn clone_value(&self) -> Box<dyn CloneableValue>;

    /// Upcasts to `&dyn Any` for downcasting.
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + Clone + Send + Sync> CloneableValue for T {
    fn clone_value(&self) -> Box<dyn CloneableValue> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A single attribute value, with its cloning behavior fixed at construction.
pub enum AttributeValue {
    /// A value with a clone capability; deep-copied when the tree is cloned.
    Owned(Box<dyn CloneableValue>),
    /// A shared value; the clone holds another handle to the same instance.
    Shared(Arc<dyn Any + Send + Sync>),
}

impl AttributeValue {
    /// Wraps a cloneable value; it will be deep-copied on tree clone.
    pub fn owned<T: Any + Clone + Send + Sync>(value: T) -> Self {
        Self::Owned(Box::new(value))
    }

    /// Wraps a value to be shared by reference between a tree and its clones.
    pub fn shared<T: Any + Send + Sync>(value: T) -> Self {
        Self::Shared(Arc::new(value))
    }

    /// Returns a reference to the value if it is of type `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            // Explicit deref: method lookup on `&Box<dyn CloneableValue>`
            // would otherwise hit the blanket impl on the reference itself.
            Self::Owned(value) => (**value).as_any().downcast_ref(),
            Self::Shared(value) => value.downcast_ref(),
        }
    }

    /// True when the value is deep-copied on clone.
    #[must_use]
    pub fn is_owned(&self) -> bool {
        matches!(self, Self::Owned(_))
    }
}

impl Clone for AttributeValue {
    fn clone(&self) -> Self {
        match self {
            Self::Owned(value) => Self::Owned((**value).clone_value()),
            Self::Shared(value) => Self::Shared(Arc::clone(value)),
        }
    }
}

impl fmt::Debug for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owned(_) => f.write_str("AttributeValue::Owned(..)"),
            Self::Shared(_) => f.write_str("AttributeValue::Shared(..)"),
        }
    }
}
