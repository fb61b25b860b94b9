// src/catalog/mod.rs
pub mod lookup;
pub mod source;
pub mod xlsx;

pub use lookup::Catalog;
pub use source::{CatalogSource, InMemoryCatalogSource};
pub use xlsx::XlsxCatalogSource;
