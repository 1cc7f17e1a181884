//! Value object trait: equality by value, not identity.
//!
//! Value objects are domain objects that have **no identity** - they are defined entirely
//! by their attribute values. Two value objects with the same values are considered equal.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// create a new value with the new attributes.
///
/// ## Value Object vs Entity
///
/// - **Value Object**: No identity (two value objects with same values are equal)
/// - **Entity**: Has identity (two entities with same ID are the same entity)
///
/// Example:
/// - `Money::from_cents(2500)` is a value object
/// - `Category { id: CategoryId(...), name: "..." }` is an entity
///
/// The trait requires `Clone + PartialEq + Debug`: values are cheap to copy,
/// compared attribute-by-attribute, and debuggable in logs and tests.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
