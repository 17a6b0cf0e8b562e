//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. Catalog records
/// are value objects: two records with the same name and figures are the same
/// input to the pipeline, and the pipeline never mutates them.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
