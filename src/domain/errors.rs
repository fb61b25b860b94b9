// src/domain/errors.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to open catalog: {0}")]
    Open(String),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Invalid value in row {row}, column {column}: {reason}")]
    InvalidCell {
        row: usize,
        column: String,
        reason: String,
    },

    #[error("Catalog has no kits")]
    Empty,
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("PDF rendering error: {0}")]
    Pdf(String),
}

#[derive(Error, Debug)]
pub enum BannerError {
    #[error("Failed to read banner: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to decode banner: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Banner has no pixels")]
    Blank,
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No kit selected")]
    NoKitSelected,

    #[error("Kit not in the current search results: {0}")]
    UnknownKit(String),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}

// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
pub type CatalogResult<T> = Result<T, CatalogError>;
pub type ExportResult<T> = Result<T, ExportError>;
pub type BannerResult<T> = Result<T, BannerError>;
pub type SessionResult<T> = Result<T, SessionError>;
