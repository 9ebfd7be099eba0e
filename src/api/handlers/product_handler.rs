//! Product handlers.

use axum::{
    extract::{OriginalUri, Path, Query, State},
    response::Json,
    routing::{get, post, put},
    Router,
};

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{CreateProduct, ProductResponse, ReceiptRequest, UpdateProduct};
use crate::errors::AppResult;
use crate::types::{Attachment, Created, NoContent, Page, PageQuery};

/// Create product routes
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/receipt", post(receipt))
        .route("/:id", put(update_product).delete(delete_product))
}

/// Page through all products stored
///
/// Products are ordered by name.
#[utoipa::path(
    get,
    path = "/products",
    tag = "Product",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of products", body = crate::types::ProductPage)
    )
)]
pub async fn list_products(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<ProductResponse>>> {
    let options = query.into_options(uri.path());
    let page = state.product_service.list_products(options).await?;
    Ok(Json(page))
}

/// Create a product
#[utoipa::path(
    post,
    path = "/products",
    tag = "Product",
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Validation error")
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateProduct>,
) -> AppResult<Created<ProductResponse>> {
    let product = state.product_service.create_product(payload).await?;
    Ok(Created(product))
}

/// Update a product
#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "Product",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateProduct>,
) -> AppResult<Json<ProductResponse>> {
    let product = state.product_service.update_product(id, payload).await?;
    Ok(Json(product))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "Product",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<NoContent> {
    state.product_service.delete_product(id).await?;
    Ok(NoContent)
}

/// Get a PDF receipt for the given products
///
/// Repeat an id once per unit bought. Unknown ids are left off the receipt.
#[utoipa::path(
    post,
    path = "/products/receipt",
    tag = "Product",
    request_body = ReceiptRequest,
    responses(
        (status = 200, description = "PDF receipt", content_type = "application/pdf", body = Vec<u8>),
        (status = 502, description = "PDF service failed")
    )
)]
pub async fn receipt(
    State(state): State<AppState>,
    Json(payload): Json<ReceiptRequest>,
) -> AppResult<Attachment> {
    let receipt = state
        .product_service
        .generate_receipt(payload.product_ids)
        .await?;

    Ok(Attachment::pdf(receipt.filename, receipt.bytes))
}
