//! HTTP request handlers.

pub mod health_handler;
pub mod product_handler;

pub use health_handler::health_check_routes;
pub use product_handler::product_routes;
