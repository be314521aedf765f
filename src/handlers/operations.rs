// src/handlers/operations.rs

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    config::AppState,
    middleware::auth::SellerUser,
    models::operations::OrderStatus,
    services::{fallback::WriteOutcome, operation_service::OrdersSnapshot},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusPayload {
    pub status: OrderStatus,
}

// GET /api/orders
#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "Orders",
    responses(
        (status = 200, description = "Pedidos mais recentes primeiro", body = OrdersSnapshot),
        (status = 403, description = "Apenas vendedores")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_orders(
    State(app_state): State<AppState>,
    _seller: SellerUser,
) -> Json<OrdersSnapshot> {
    Json(app_state.operation_service.snapshot().await)
}

// POST /api/orders/refresh
#[utoipa::path(
    post,
    path = "/api/orders/refresh",
    tag = "Orders",
    responses(
        (status = 200, description = "Pedidos relidos", body = OrdersSnapshot)
    ),
    security(("api_jwt" = []))
)]
pub async fn refresh_orders(
    State(app_state): State<AppState>,
    _seller: SellerUser,
) -> Json<OrdersSnapshot> {
    app_state.operation_service.refresh().await;
    Json(app_state.operation_service.snapshot().await)
}

// PATCH /api/orders/{order_id}/status
#[utoipa::path(
    patch,
    path = "/api/orders/{order_id}/status",
    tag = "Orders",
    request_body = UpdateOrderStatusPayload,
    responses(
        (status = 200, description = "Status aplicado (isDemo indica se foi só em memória)", body = WriteOutcome)
    ),
    params(
        ("order_id" = String, Path, description = "ID do Pedido")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_order_status(
    State(app_state): State<AppState>,
    _seller: SellerUser,
    Path(order_id): Path<String>,
    Json(payload): Json<UpdateOrderStatusPayload>,
) -> Json<WriteOutcome> {
    let outcome = app_state
        .operation_service
        .update_order_status(&order_id, payload.status)
        .await;
    Json(outcome)
}
