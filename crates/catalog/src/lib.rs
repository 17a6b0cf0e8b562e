//! `stockwise-catalog`
//!
//! **Responsibility:** the boundary to whatever supplies the product catalog.
//!
//! The prediction pipeline never fetches data itself; it is handed a
//! [`CatalogProvider`] and asks it for the whole catalog at once. A provider
//! either returns every record or fails; partial catalogs are never returned.

pub mod error;
pub mod file;
pub mod memory;
pub mod provider;

pub use error::CatalogError;
pub use file::JsonFileCatalog;
pub use memory::InMemoryCatalog;
pub use provider::CatalogProvider;
