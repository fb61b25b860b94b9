// src/domain/mod.rs
pub mod errors;
pub mod models;

// Re-export common types for convenience
pub use errors::{
    AppError, AppResult, BannerError, BannerResult, CatalogError, CatalogResult, ExportError,
    ExportResult, SessionError, SessionResult,
};
pub use models::{CatalogEntry, PaymentMethod, PaymentSelection, QuoteResult};
