// src/models/payment.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyRates {
    /// Quanto SOL vale 1 USDC
    #[schema(example = "0.0333")]
    pub solana_rate: Decimal,
    /// Quantas rupias vale 1 USDC
    #[schema(example = "15600")]
    pub idr_rate: Decimal,
}

fn validate_positive(val: &Decimal) -> Result<(), ValidationError> {
    if *val <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.message = Some("The total must be greater than zero.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PaymentRequest {
    #[validate(custom(function = "validate_positive"))]
    #[schema(example = "25.50")]
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentQuote {
    pub total_usd: Decimal,
    pub estimated_sol: Decimal,
    pub estimated_spt: Decimal,
    pub sol_address: String,
    pub spt_address: String,
    #[schema(example = "solana:FgSN4yxRzUvehCxVQgxs6J3BrtJLXpWqe4SBqAvPRgEF?amount=0.318750")]
    pub payment_uri: String,
    /// QR Code (SVG) do `payment_uri`
    pub qr_svg: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Confirmed,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfirmation {
    pub reference: Uuid,
    pub total_usd: Decimal,
    pub status: PaymentStatus,
    /// true quando a confirmação veio do modo de simulação (sem verificação on-chain)
    pub simulated: bool,
    pub message: String,
    pub confirmed_at: DateTime<Utc>,
}
