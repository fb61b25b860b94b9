// src/proposal/mod.rs
pub mod banner;
pub mod message;
pub mod pdf;
pub mod sanitize;

pub use banner::{load_banner, BannerImage};
pub use message::{compose_message, ComposedMessage, LinkEncoding};
pub use pdf::{ProposalExporter, ProposalRequest, PDF_MIME_TYPE};
pub use sanitize::sanitize_latin1;
