//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.

pub mod product;
pub mod receipt;

pub use product::{round_price, CreateProduct, Product, ProductResponse, UpdateProduct};
pub use receipt::{Receipt, ReceiptLine, ReceiptRequest};
