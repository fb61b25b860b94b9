// src/catalog/lookup.rs
use crate::domain::models::CatalogEntry;

/// Read-only kit catalog, kept in storage order
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Case-insensitive substring search over kit descriptions.
    ///
    /// A blank query matches nothing: no term typed yet means no results.
    pub fn search(&self, query: &str) -> Vec<&CatalogEntry> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.entries
            .iter()
            .filter(|entry| entry.description.to_lowercase().contains(&needle))
            .collect()
    }

    /// Exact description match. With duplicate descriptions the first one wins.
    pub fn resolve(&self, description: &str) -> Option<&CatalogEntry> {
        self.entries
            .iter()
            .find(|entry| entry.description == description)
    }
}
