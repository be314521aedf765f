// src/services/operation_service.rs

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::RwLock;
use utoipa::ToSchema;

use crate::{
    db::{fixtures, RemoteStore, SelectQuery},
    models::{
        operations::{Order, OrderRow, OrderStatus},
        parse_timestamp,
    },
    services::{
        fallback::{fetch_rows, fetch_with_fallback, submit_with_fallback, Fetched, Submitted, WriteOutcome, DEMO_NOTICE},
        lifecycle::Liveness,
    },
};

pub const UNKNOWN_CUSTOMER: &str = "Unknown Customer";

#[derive(Debug, Clone, PartialEq)]
struct OrdersState {
    orders: Vec<Order>,
    loading: bool,
    is_demo: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrdersSnapshot {
    pub orders: Vec<Order>,
    pub loading: bool,
    pub is_demo: bool,
    pub notice: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProfileName {
    #[serde(default)]
    name: Option<String>,
}

// O "hook" da lista de pedidos do vendedor.
pub struct OperationsService {
    store: Arc<dyn RemoteStore>,
    state: RwLock<OrdersState>,
    liveness: Liveness,
}

impl OperationsService {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self {
            store,
            state: RwLock::new(OrdersState { orders: Vec::new(), loading: true, is_demo: false }),
            liveness: Liveness::new(),
        }
    }

    pub async fn mount(&self) {
        self.refresh().await;
    }

    pub fn unmount(&self) {
        self.liveness.retire();
    }

    pub async fn snapshot(&self) -> OrdersSnapshot {
        let state = self.state.read().await;
        OrdersSnapshot {
            orders: state.orders.clone(),
            loading: state.loading,
            is_demo: state.is_demo,
            notice: state.is_demo.then(|| DEMO_NOTICE.to_string()),
        }
    }

    // Aplica `change` só se o hook ainda estiver montado.
    async fn update(&self, change: impl FnOnce(&mut OrdersState)) {
        let mut state = self.state.write().await;
        if !self.liveness.is_alive() {
            tracing::debug!("Pedidos desmontados, descartando atualização.");
            return;
        }
        change(&mut state);
    }

    pub async fn refresh(&self) {
        self.update(|state| state.loading = true).await;

        let fetched: Fetched<OrderRow, Order> = fetch_with_fallback(
            self.store.as_ref(),
            "orders",
            fixtures::demo_orders(),
            &SelectQuery::new()
                .select("id, user_id, total, status, created_at")
                .order_by("created_at", false),
        )
        .await;

        let (orders, is_demo) = match fetched {
            Fetched::Live(rows) => match self.join_orders(rows).await {
                Some(orders) => (orders, false),
                None => (fixtures::demo_orders(), true),
            },
            Fetched::Fallback(orders) => (orders, true),
        };

        self.update(|state| {
            state.orders = orders;
            state.is_demo = is_demo;
            state.loading = false;
        })
        .await;
    }

    // Um pedido sem data válida invalida a leitura inteira.
    async fn join_orders(&self, rows: Vec<OrderRow>) -> Option<Vec<Order>> {
        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            orders.push(self.join_order(row).await?);
        }
        Some(orders)
    }

    // Monta o pedido da tela: nome do cliente e quantidade de itens são "best effort".
    async fn join_order(&self, row: OrderRow) -> Option<Order> {
        let Some(created_at) = row.created_at.as_deref().and_then(parse_timestamp) else {
            tracing::warn!(
                "⚠️ Pedido {} com created_at inválido ({:?}); usando dados demo.",
                row.id,
                row.created_at
            );
            return None;
        };

        let customer = match &row.user_id {
            Some(user_id) => self.customer_name(user_id).await,
            None => UNKNOWN_CUSTOMER.to_string(),
        };
        let items = self.item_count(&row.id).await;

        let status = row
            .status
            .as_deref()
            .and_then(|status| status.parse::<OrderStatus>().ok())
            .unwrap_or(OrderStatus::Pending);

        Some(Order {
            id: row.id,
            customer,
            date: created_at.date_naive(),
            total: row.total.unwrap_or(Decimal::ZERO),
            status,
            items,
        })
    }

    async fn customer_name(&self, user_id: &str) -> String {
        let query = SelectQuery::new().select("name").eq("id", user_id);
        match fetch_rows::<ProfileName>(self.store.as_ref(), "profiles", &query).await {
            Ok(profiles) => profiles
                .into_iter()
                .next()
                .and_then(|profile| profile.name)
                .unwrap_or_else(|| UNKNOWN_CUSTOMER.to_string()),
            Err(e) => {
                tracing::debug!("Cliente {} indisponível: {}", user_id, e);
                UNKNOWN_CUSTOMER.to_string()
            }
        }
    }

    async fn item_count(&self, order_id: &str) -> u32 {
        let query = SelectQuery::new().select("id").eq("order_id", order_id);
        match fetch_rows::<Value>(self.store.as_ref(), "order_items", &query).await {
            Ok(items) => items.len() as u32,
            Err(e) => {
                tracing::debug!("Itens do pedido {} indisponíveis: {}", order_id, e);
                0
            }
        }
    }

    async fn set_local_status(&self, order_id: &str, status: OrderStatus) {
        self.update(|state| {
            state
                .orders
                .iter_mut()
                .filter(|order| order.id == order_id)
                .for_each(|order| order.status = status);
        })
        .await;
    }

    pub async fn update_order_status(&self, order_id: &str, status: OrderStatus) -> WriteOutcome {
        if self.state.read().await.is_demo {
            self.set_local_status(order_id, status).await;
            tracing::info!("Modo demo: status do pedido {} alterado só em memória.", order_id);
            return WriteOutcome::DEMO;
        }

        let submitted = submit_with_fallback(
            self.store.as_ref(),
            "orders",
            json!({ "id": order_id, "status": status.as_str() }),
        )
        .await;

        match &submitted {
            // Leitura-após-escrita: recarrega do banco em vez de confiar na cópia local.
            Submitted::Confirmed(_) => self.refresh().await,
            Submitted::Fallback => self.set_local_status(order_id, status).await,
        }

        submitted.outcome()
    }
}
