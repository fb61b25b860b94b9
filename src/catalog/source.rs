// src/catalog/source.rs
use crate::catalog::lookup::Catalog;
use crate::domain::errors::{CatalogError, CatalogResult};
use crate::domain::models::CatalogEntry;
use async_trait::async_trait;

/// Where the kit catalog comes from
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Load and validate the whole catalog
    async fn load(&self) -> CatalogResult<Catalog>;

    /// Human readable origin, used in logs
    fn describe(&self) -> String;
}

/// Catalog held in memory, mostly for tests and demos
pub struct InMemoryCatalogSource {
    entries: Vec<CatalogEntry>,
}

impl InMemoryCatalogSource {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }
}

#[async_trait]
impl CatalogSource for InMemoryCatalogSource {
    async fn load(&self) -> CatalogResult<Catalog> {
        if self.entries.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Catalog::new(self.entries.clone()))
    }

    fn describe(&self) -> String {
        format!("in-memory catalog ({} kits)", self.entries.len())
    }
}
