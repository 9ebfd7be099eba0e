//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections and repositories
//! - The PDF rendering service

pub mod db;
pub mod pdf;
pub mod repositories;

pub use db::{Database, Migrator};
pub use pdf::{PdfClient, PdfOptions, PdfRenderer};
pub use repositories::{ProductRepository, ProductStore, QuerySource};

#[cfg(any(test, feature = "test-utils"))]
pub use pdf::MockPdfRenderer;
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::MockProductRepository;
