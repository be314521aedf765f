// src/models/operations.rs

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// --- Enums ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("status de pedido desconhecido: {}", other)),
        }
    }
}

// --- Pedido como a tela de pedidos enxerga ---
// `customer` e `items` são montados na leitura (join com profiles e order_items).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    #[schema(example = "ORD-001")]
    pub id: String,
    #[schema(example = "John Doe")]
    pub customer: String,
    pub date: NaiveDate,
    #[schema(example = "125.99")]
    pub total: Decimal,
    pub status: OrderStatus,
    #[schema(example = 3)]
    pub items: u32,
}

// Linha crua da tabela `orders`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderRow {
    #[serde(deserialize_with = "crate::models::id_from_any")]
    pub id: String,
    #[serde(default, deserialize_with = "crate::models::optional_id_from_any")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub total: Option<Decimal>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}
