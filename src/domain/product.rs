//! Product domain entity and related types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Product domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub price: f64,
}

impl Product {
    pub fn new(id: i32, name: impl Into<String>, price: f64) -> Self {
        Self {
            id,
            name: name.into(),
            price: round_price(price),
        }
    }
}

/// Round a price to two decimals so divisions do not leak extra digits.
pub fn round_price(price: f64) -> f64 {
    (price * 100.0).round() / 100.0
}

/// Product creation data transfer object
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    /// Product name
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Exercise book")]
    pub name: String,
    /// Unit price, rounded to two decimals
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    #[schema(example = 450.0)]
    pub price: f64,
}

/// Product update data transfer object
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    /// New name
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    #[schema(example = "Ruled exercise book")]
    pub name: Option<String>,
    /// New unit price
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    #[schema(example = 500.0)]
    pub price: Option<f64>,
}

/// Product response (public view of a product)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    /// Auto incremented unique id
    #[schema(example = 1)]
    pub id: i32,
    /// Product name
    #[schema(example = "Exercise book")]
    pub name: String,
    /// Unit price
    #[schema(example = 450.0)]
    pub price: f64,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
        }
    }
}
