//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: two instances
/// with the same attributes are interchangeable. A country code or a document
/// type is a value object; a verification record (which has an `id`) is an
/// entity.
///
/// To "modify" a value object, build a new one. The bounds keep them cheap to
/// copy, comparable, and debuggable.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
