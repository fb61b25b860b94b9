// src/pricing/mod.rs
pub mod engine;
pub mod format;

pub use engine::{assembly_days, compute_quote, shipping_estimate};
pub use format::format_currency;
