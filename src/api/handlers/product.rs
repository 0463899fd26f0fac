//! Product catalog handlers: create, list, get, update, delete.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    CreateProductRequest, ListProductsParams, ProductDto, ProductListResponse, SessionParams,
    UpdateProductRequest,
};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};

/// `POST /products` — Create a product.
///
/// # Errors
///
/// Returns [`GatewayError`] on an invalid draft or store failure.
#[utoipa::path(
    post,
    path = "/products",
    tag = "Products",
    summary = "Create a product",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductDto),
        (status = 400, description = "Invalid product fields", body = ErrorResponse),
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(req): Json<CreateProductRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let product = state.products.create(req.into_draft()).await?;
    Ok((StatusCode::CREATED, Json(ProductDto::from(product))))
}

/// `GET /products` — List products with pagination and optional text
/// search. A searched listing with a session id records a SEARCH
/// interaction.
///
/// # Errors
///
/// Returns [`GatewayError`] on store failure.
#[utoipa::path(
    get,
    path = "/products",
    tag = "Products",
    summary = "List products",
    params(ListProductsParams),
    responses(
        (status = 200, description = "Paginated product list", body = ProductListResponse),
    )
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ListProductsParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let listing = state
        .products
        .list(params.page, params.limit, params.search, params.session_id)
        .await?;

    Ok(Json(ProductListResponse {
        page: listing.page,
        limit: listing.limit,
        total_documents: listing.total_documents,
        total_pages: listing.total_pages,
        data: listing.data.into_iter().map(Into::into).collect(),
    }))
}

/// `GET /products/{id}` — Get product details. A session id records a
/// VIEW interaction.
///
/// # Errors
///
/// Returns [`GatewayError::ProductNotFound`] if the product does not
/// exist.
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "Products",
    summary = "Get product details",
    params(
        ("id" = uuid::Uuid, Path, description = "Product UUID"),
        SessionParams,
    ),
    responses(
        (status = 200, description = "Product details", body = ProductDto),
        (status = 404, description = "Product not found", body = ErrorResponse),
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Query(params): Query<SessionParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let product = state.products.get(id, params.session_id).await?;
    Ok(Json(ProductDto::from(product)))
}

/// `PUT /products/{id}` — Update a product.
///
/// # Errors
///
/// Returns [`GatewayError::ProductNotFound`] if the product does not
/// exist.
#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "Products",
    summary = "Update a product",
    params(
        ("id" = uuid::Uuid, Path, description = "Product UUID"),
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Updated product", body = ProductDto),
        (status = 404, description = "Product not found", body = ErrorResponse),
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let product = state.products.update(id, req.into_patch()).await?;
    Ok(Json(ProductDto::from(product)))
}

/// `DELETE /products/{id}` — Delete a product, returning it.
///
/// # Errors
///
/// Returns [`GatewayError::ProductNotFound`] if the product does not
/// exist.
#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "Products",
    summary = "Delete a product",
    params(
        ("id" = uuid::Uuid, Path, description = "Product UUID"),
    ),
    responses(
        (status = 200, description = "Deleted product", body = ProductDto),
        (status = 404, description = "Product not found", body = ErrorResponse),
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let product = state.products.delete(id).await?;
    Ok(Json(ProductDto::from(product)))
}

/// Product catalog routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", post(create_product).get(list_products))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}
