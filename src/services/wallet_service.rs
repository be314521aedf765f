// src/services/wallet_service.rs

use std::{collections::HashMap, sync::Arc};

use rust_decimal::Decimal;
use tokio::sync::RwLock;

use crate::{
    common::error::AppError,
    models::wallet::{WalletStatus, WalletType},
};

// Sem consulta on-chain: o saldo reportado é o saldo demo.
const DEMO_BALANCE: i64 = 100;

#[derive(Debug, Clone)]
struct WalletSession {
    wallet_type: WalletType,
    address: String,
    balance: Decimal,
}

// Sessões de carteira por usuário, só em memória.
#[derive(Clone, Default)]
pub struct WalletService {
    sessions: Arc<RwLock<HashMap<String, WalletSession>>>,
}

impl WalletService {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn status(&self, user_id: &str) -> WalletStatus {
        match self.sessions.read().await.get(user_id) {
            Some(session) => WalletStatus {
                is_connected: true,
                wallet_address: Some(session.address.clone()),
                balance: Some(session.balance),
                wallet_type: Some(session.wallet_type),
            },
            None => WalletStatus::disconnected(),
        }
    }

    /// Reconectar substitui a sessão anterior.
    pub async fn connect(&self, user_id: &str, wallet_type: WalletType, address: String) -> WalletStatus {
        tracing::info!("👛 Carteira {:?} conectada para {}", wallet_type, user_id);
        self.sessions.write().await.insert(
            user_id.to_string(),
            WalletSession { wallet_type, address, balance: Decimal::from(DEMO_BALANCE) },
        );
        self.status(user_id).await
    }

    pub async fn disconnect(&self, user_id: &str) -> Result<WalletStatus, AppError> {
        self.sessions
            .write()
            .await
            .remove(user_id)
            .ok_or(AppError::WalletNotConnected)?;

        tracing::info!("👛 Carteira desconectada para {}", user_id);
        Ok(WalletStatus::disconnected())
    }
}
