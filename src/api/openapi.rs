//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{health_handler, product_handler};
use crate::domain::{CreateProduct, ProductResponse, ReceiptRequest, UpdateProduct};
use crate::types::ProductPage;

/// OpenAPI documentation for the product catalog
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Product Catalog API",
        description = "Product catalog with paginated listing and PDF receipts",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Health check endpoints
        health_handler::greet,
        health_handler::greet_secured,
        // Product endpoints
        product_handler::list_products,
        product_handler::create_product,
        product_handler::update_product,
        product_handler::delete_product,
        product_handler::receipt,
    ),
    components(
        schemas(
            ProductResponse,
            ProductPage,
            CreateProduct,
            UpdateProduct,
            ReceiptRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health Check", description = "Liveness greetings"),
        (name = "Product", description = "Product catalog operations")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for the shared token in the Authorization header
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "token_auth",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    "Authorization",
                    "Shared API token, sent as is",
                ))),
            );
        }
    }
}
