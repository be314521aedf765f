// src/handlers/inventory.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::SellerUser,
    models::inventory::{NewProduct, ProductUpdate},
    services::{
        fallback::WriteOutcome,
        inventory_service::{ProductWrite, ProductsSnapshot},
    },
};

// GET /api/products (catálogo público)
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Products",
    responses(
        (status = 200, description = "Catálogo ordenado por nome", body = ProductsSnapshot)
    )
)]
pub async fn list_products(State(app_state): State<AppState>) -> Json<ProductsSnapshot> {
    Json(app_state.inventory_service.snapshot().await)
}

// POST /api/products/refresh
#[utoipa::path(
    post,
    path = "/api/products/refresh",
    tag = "Products",
    responses(
        (status = 200, description = "Catálogo relido", body = ProductsSnapshot),
        (status = 401, description = "Token ausente ou inválido"),
        (status = 403, description = "Apenas vendedores")
    ),
    security(("api_jwt" = []))
)]
pub async fn refresh_products(
    State(app_state): State<AppState>,
    _seller: SellerUser,
) -> Json<ProductsSnapshot> {
    app_state.inventory_service.refresh().await;
    Json(app_state.inventory_service.snapshot().await)
}

// POST /api/products
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Products",
    request_body = NewProduct,
    responses(
        (status = 201, description = "Produto criado", body = ProductWrite),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Apenas vendedores")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    SellerUser(seller): SellerUser,
    Json(payload): Json<NewProduct>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let write = app_state
        .inventory_service
        .create_product(Some(&seller), payload)
        .await;

    Ok((StatusCode::CREATED, Json(write)))
}

// PATCH /api/products/{product_id}
#[utoipa::path(
    patch,
    path = "/api/products/{product_id}",
    tag = "Products",
    request_body = ProductUpdate,
    responses(
        (status = 200, description = "Alterações aplicadas", body = WriteOutcome),
        (status = 400, description = "Dados inválidos")
    ),
    params(
        ("product_id" = String, Path, description = "ID do Produto")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    _seller: SellerUser,
    Path(product_id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> Result<Json<WriteOutcome>, AppError> {
    payload.validate()?;

    let outcome = app_state
        .inventory_service
        .update_product(&product_id, payload)
        .await;
    Ok(Json(outcome))
}
