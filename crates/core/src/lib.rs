//! `stockwise-core`: shared building blocks.
//!
//! This crate contains **pure** primitives used by the catalog boundary and the
//! prediction pipeline (no IO, no model code).

pub mod error;
pub mod id;
pub mod product;
pub mod value_object;

pub use error::{DomainError, DomainResult};
pub use id::RunId;
pub use product::{ProductRecord, coerce_quantity};
pub use value_object::ValueObject;
