//! Utility functions and helpers.

pub mod parallel;
pub mod templates;

pub use templates::ReceiptTemplate;
