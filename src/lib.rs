//! Product catalog - REST API for a product catalog with PDF receipts
//!
//! Products are listed through a generic page builder
//! ([`types::Paginator`]) that works over any countable, windowed source.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Products and receipts
//! - **services**: Application use cases and business logic
//! - **infra**: Infrastructure concerns (database, PDF service)
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared types (pagination, responses)
//! - **utils**: Concurrency helpers and the receipt template
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;
pub mod utils;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Product, ProductResponse};
pub use errors::{AppError, AppResult};
pub use types::{Page, PageOptions, PageSource, Paginator};
