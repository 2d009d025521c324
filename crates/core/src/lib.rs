//! `shopfront-core` — domain primitives for the product catalog.
//!
//! This crate contains **pure domain** types (no IO, no HTTP).

pub mod error;
pub mod id;
pub mod product;

pub use error::{DomainError, DomainResult};
pub use id::ProductId;
pub use product::{Product, ProductDocument};
