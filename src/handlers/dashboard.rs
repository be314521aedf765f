// src/handlers/dashboard.rs

use axum::{extract::State, Json};

use crate::{
    config::AppState,
    middleware::auth::SellerUser,
    services::dashboard_service::DashboardSnapshot,
};

// GET /api/dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Indicadores, série de vendas e recomendações", body = DashboardSnapshot),
        (status = 401, description = "Não autorizado"),
        (status = 403, description = "Apenas vendedores")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_dashboard(
    State(app_state): State<AppState>,
    _seller: SellerUser,
) -> Json<DashboardSnapshot> {
    Json(app_state.dashboard_service.snapshot().await)
}

// POST /api/dashboard/refresh
#[utoipa::path(
    post,
    path = "/api/dashboard/refresh",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Dashboard relido", body = DashboardSnapshot),
        (status = 403, description = "Apenas vendedores")
    ),
    security(("api_jwt" = []))
)]
pub async fn refresh_dashboard(
    State(app_state): State<AppState>,
    _seller: SellerUser,
) -> Json<DashboardSnapshot> {
    app_state.dashboard_service.refresh().await;
    Json(app_state.dashboard_service.snapshot().await)
}
