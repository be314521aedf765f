// src/services/payment_service.rs

use std::time::Duration;

use chrono::Utc;
use qrcode::{render::svg, QrCode};
use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::payment::{CurrencyRates, PaymentConfirmation, PaymentQuote, PaymentStatus},
};

pub const DEFAULT_SOL_ADDRESS: &str = "FgSN4yxRzUvehCxVQgxs6J3BrtJLXpWqe4SBqAvPRgEF";
pub const DEFAULT_SPT_ADDRESS: &str = "SPT6J8oFNJ1zHGiQKDUyfMJwj9Gw2G5TVwcoZ9uFPNF";

// Cotações fixas (USD por token) até existir um oráculo de preços.
const SOL_PRICE_USD: i64 = 80;
const SPT_PRICE_USD: Decimal = Decimal::from_parts(5, 0, 0, false, 2); // 0.05

/// Como o PDV confirma um pagamento.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMode {
    /// Confirma sempre, depois de `delay`. Não há verificação real.
    Simulated { delay: Duration },
    /// Reservado para a verificação da transação na rede.
    OnChain,
}

#[derive(Debug, Clone)]
pub struct PaymentService {
    mode: PaymentMode,
    sol_address: String,
    spt_address: String,
}

// Divisão que não estoura: valores enormes viram erro 400 em vez de panic.
fn estimate(total: Decimal, price: Decimal) -> Result<Decimal, AppError> {
    total
        .checked_div(price)
        .map(|value| value.round_dp_with_strategy(6, RoundingStrategy::MidpointAwayFromZero))
        .ok_or_else(|| AppError::InvalidAmount(total.to_string()))
}

impl PaymentService {
    pub fn new(mode: PaymentMode, sol_address: String, spt_address: String) -> Self {
        Self { mode, sol_address, spt_address }
    }

    pub fn rates(&self) -> CurrencyRates {
        CurrencyRates {
            solana_rate: Decimal::new(333, 4),
            idr_rate: Decimal::from(15600),
        }
    }

    pub fn quote(&self, total: Decimal) -> Result<PaymentQuote, AppError> {
        let estimated_sol = estimate(total, Decimal::from(SOL_PRICE_USD))?;
        let estimated_spt = estimate(total, SPT_PRICE_USD)?;

        let payment_uri = format!("solana:{}?amount={:.6}", self.sol_address, estimated_sol);

        let code = QrCode::new(payment_uri.as_bytes())?;
        let qr_svg = code
            .render::<svg::Color>()
            .min_dimensions(200, 200)
            .build();

        Ok(PaymentQuote {
            total_usd: total,
            estimated_sol,
            estimated_spt,
            sol_address: self.sol_address.clone(),
            spt_address: self.spt_address.clone(),
            payment_uri,
            qr_svg,
        })
    }

    pub async fn confirm(&self, total: Decimal) -> Result<PaymentConfirmation, AppError> {
        match self.mode {
            PaymentMode::Simulated { delay } => {
                tracing::info!("💸 Confirmação simulada de ${:.2} (aguardando {:?})", total, delay);
                tokio::time::sleep(delay).await;

                Ok(PaymentConfirmation {
                    reference: Uuid::new_v4(),
                    total_usd: total,
                    status: PaymentStatus::Confirmed,
                    simulated: true,
                    message: format!("Solana payment of ${:.2} was successful.", total),
                    confirmed_at: Utc::now(),
                })
            }
            PaymentMode::OnChain => Err(AppError::PaymentVerificationUnavailable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn service(mode: PaymentMode) -> PaymentService {
        PaymentService::new(mode, DEFAULT_SOL_ADDRESS.to_string(), DEFAULT_SPT_ADDRESS.to_string())
    }

    #[test]
    fn quote_estimates_tokens() {
        let quote = service(PaymentMode::OnChain).quote(Decimal::from_str("25.50").unwrap()).unwrap();

        assert_eq!(quote.estimated_sol, Decimal::from_str("0.31875").unwrap());
        assert_eq!(quote.estimated_spt, Decimal::from(510));
        assert_eq!(
            quote.payment_uri,
            format!("solana:{}?amount=0.318750", DEFAULT_SOL_ADDRESS)
        );
        assert!(quote.qr_svg.contains("<svg"));
    }

    #[test]
    fn estimates_are_rounded_to_six_places() {
        let quote = service(PaymentMode::OnChain).quote(Decimal::from_str("0.01").unwrap()).unwrap();
        assert_eq!(quote.estimated_sol, Decimal::from_str("0.000125").unwrap());

        let quote = service(PaymentMode::OnChain).quote(Decimal::from(1)).unwrap();
        assert_eq!(quote.estimated_sol, Decimal::from_str("0.0125").unwrap());
    }

    #[test]
    fn huge_totals_are_rejected_without_panicking() {
        let request = crate::models::payment::PaymentRequest { total: Decimal::MAX };
        assert!(validator::Validate::validate(&request).is_ok());

        let result = service(PaymentMode::OnChain).quote(request.total);
        assert!(matches!(result, Err(AppError::InvalidAmount(_))));
    }

    #[test]
    fn static_rates() {
        let rates = service(PaymentMode::OnChain).rates();
        assert_eq!(rates.solana_rate, Decimal::from_str("0.0333").unwrap());
        assert_eq!(rates.idr_rate, Decimal::from(15600));
    }

    #[tokio::test(start_paused = true)]
    async fn simulated_confirmation_waits_then_succeeds() {
        let payments = service(PaymentMode::Simulated { delay: Duration::from_millis(2000) });
        let started = tokio::time::Instant::now();

        let confirmation = payments.confirm(Decimal::from_str("12.5").unwrap()).await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(2000));
        assert_eq!(confirmation.status, PaymentStatus::Confirmed);
        assert!(confirmation.simulated);
        assert_eq!(confirmation.message, "Solana payment of $12.50 was successful.");
    }

    #[tokio::test]
    async fn on_chain_mode_is_not_available() {
        let result = service(PaymentMode::OnChain).confirm(Decimal::from(1)).await;
        assert!(matches!(result, Err(AppError::PaymentVerificationUnavailable)));
    }
}
