//! Repository trait definitions for database operations.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`product`]: Row-level CRUD for the `products` table
//!
//! Handlers and services only ever see `Arc<dyn ProductRepository>`, so the
//! storage backend can be swapped at startup without touching them.

pub mod error;
pub mod product;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};
pub use product::ProductRepository;
