// src/handlers/wallet.rs

use axum::{extract::State, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::wallet::{ConnectWalletPayload, WalletStatus},
};

#[utoipa::path(
    get,
    path = "/api/wallet",
    tag = "Wallet",
    responses(
        (status = 200, description = "Carteira do usuário", body = WalletStatus)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_wallet(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Json<WalletStatus> {
    Json(app_state.wallet_service.status(&user.id).await)
}

#[utoipa::path(
    post,
    path = "/api/wallet/connect",
    tag = "Wallet",
    request_body = ConnectWalletPayload,
    responses(
        (status = 200, description = "Carteira conectada", body = WalletStatus),
        (status = 400, description = "Endereço inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn connect_wallet(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<ConnectWalletPayload>,
) -> Result<Json<WalletStatus>, AppError> {
    payload.validate()?;

    let status = app_state
        .wallet_service
        .connect(&user.id, payload.wallet_type, payload.address)
        .await;
    Ok(Json(status))
}

#[utoipa::path(
    post,
    path = "/api/wallet/disconnect",
    tag = "Wallet",
    responses(
        (status = 200, description = "Carteira desconectada", body = WalletStatus),
        (status = 409, description = "Nenhuma carteira conectada")
    ),
    security(("api_jwt" = []))
)]
pub async fn disconnect_wallet(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<WalletStatus>, AppError> {
    Ok(Json(app_state.wallet_service.disconnect(&user.id).await?))
}
