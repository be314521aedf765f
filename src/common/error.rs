// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Erros que chegam até a borda HTTP.
// Falhas do armazenamento remoto NÃO aparecem aqui: elas viram modo demo (ver services/fallback.rs).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso restrito a vendedores")]
    SellerOnly,

    #[error("Conta demo desconhecida: {0}")]
    UnknownDemoAccount(String),

    #[error("Nenhuma carteira conectada")]
    WalletNotConnected,

    #[error("Valor fora do intervalo suportado: {0}")]
    InvalidAmount(String),

    #[error("Verificação on-chain de pagamento indisponível")]
    PaymentVerificationUnavailable,

    #[error("Erro ao gerar QR Code: {0}")]
    QrCodeError(#[from] qrcode::types::QrError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors.iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "One or more fields are invalid.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "Missing or invalid session token.".to_string()),
            AppError::SellerOnly => (StatusCode::FORBIDDEN, "This area is restricted to sellers.".to_string()),
            AppError::UnknownDemoAccount(email) => (StatusCode::NOT_FOUND, format!("No demo account for {}.", email)),
            AppError::WalletNotConnected => (StatusCode::CONFLICT, "No wallet is connected.".to_string()),
            AppError::InvalidAmount(amount) => (
                StatusCode::BAD_REQUEST,
                format!("The amount {} is out of the supported range.", amount),
            ),
            AppError::PaymentVerificationUnavailable => (
                StatusCode::NOT_IMPLEMENTED,
                "On-chain payment verification is not available.".to_string(),
            ),

            // Todo o resto vira 500; o `tracing` registra a mensagem detalhada.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "An unexpected error occurred.".to_string())
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
