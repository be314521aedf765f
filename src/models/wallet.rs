// src/models/wallet.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

// Carteiras suportadas pelo adaptador do navegador
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum WalletType {
    Phantom,
    Solflare,
    Clover,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WalletStatus {
    pub is_connected: bool,
    pub wallet_address: Option<String>,
    #[schema(example = "100")]
    pub balance: Option<Decimal>,
    pub wallet_type: Option<WalletType>,
}

impl WalletStatus {
    pub fn disconnected() -> Self {
        Self {
            is_connected: false,
            wallet_address: None,
            balance: None,
            wallet_type: None,
        }
    }
}

// Endereços Solana são base58 de 32 a 44 caracteres.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConnectWalletPayload {
    pub wallet_type: WalletType,
    #[validate(length(min = 32, max = 44, message = "Invalid Solana address."))]
    #[schema(example = "FgSN4yxRzUvehCxVQgxs6J3BrtJLXpWqe4SBqAvPRgEF")]
    pub address: String,
}
