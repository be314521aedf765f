// src/handlers/pos.rs

use axum::{extract::State, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::SellerUser,
    models::payment::{CurrencyRates, PaymentConfirmation, PaymentQuote, PaymentRequest},
};

// GET /api/pos/rates
#[utoipa::path(
    get,
    path = "/api/pos/rates",
    tag = "POS",
    responses(
        (status = 200, description = "Cotações do USDC", body = CurrencyRates)
    )
)]
pub async fn get_rates(State(app_state): State<AppState>) -> Json<CurrencyRates> {
    Json(app_state.payment_service.rates())
}

// POST /api/pos/quote
#[utoipa::path(
    post,
    path = "/api/pos/quote",
    tag = "POS",
    request_body = PaymentRequest,
    responses(
        (status = 200, description = "Valores estimados, endereços e QR Code", body = PaymentQuote),
        (status = 400, description = "Total inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_quote(
    State(app_state): State<AppState>,
    _seller: SellerUser,
    Json(payload): Json<PaymentRequest>,
) -> Result<Json<PaymentQuote>, AppError> {
    payload.validate()?;
    Ok(Json(app_state.payment_service.quote(payload.total)?))
}

// POST /api/pos/confirm
#[utoipa::path(
    post,
    path = "/api/pos/confirm",
    tag = "POS",
    request_body = PaymentRequest,
    responses(
        (status = 200, description = "Pagamento confirmado", body = PaymentConfirmation),
        (status = 501, description = "Verificação on-chain indisponível")
    ),
    security(("api_jwt" = []))
)]
pub async fn confirm_payment(
    State(app_state): State<AppState>,
    _seller: SellerUser,
    Json(payload): Json<PaymentRequest>,
) -> Result<Json<PaymentConfirmation>, AppError> {
    payload.validate()?;
    Ok(Json(app_state.payment_service.confirm(payload.total).await?))
}
