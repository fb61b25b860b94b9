// src/lib.rs
// Main library module declarations

pub mod catalog;
pub mod config;
pub mod domain;
pub mod pricing;
pub mod proposal;
pub mod session;
