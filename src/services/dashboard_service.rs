// src/services/dashboard_service.rs

use std::{
    sync::{Arc, Weak},
    time::Duration,
};

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};
use utoipa::ToSchema;

use crate::{
    db::{fixtures, RemoteStore, SelectQuery},
    models::{
        dashboard::{DashboardStat, Recommendation, RecommendationCard, SalesPoint},
        parse_timestamp,
    },
    services::{
        fallback::{fetch_rows, fetch_with_fallback, Fetched, DEMO_NOTICE},
        lifecycle::{spawn_polling, Liveness, PollHandle},
    },
};

// Variações fixas enquanto não há histórico para comparar.
const REVENUE_CHANGE: f64 = 5.2;
const ORDERS_CHANGE: f64 = 3.8;
const CUSTOMERS_CHANGE: f64 = 7.4;

#[derive(Debug, Clone, PartialEq)]
struct DashboardState {
    stats: DashboardStat,
    sales_data: Vec<SalesPoint>,
    recommendations: Vec<Recommendation>,
    loading: bool,
    is_demo: bool,
}

impl DashboardState {
    fn initial() -> Self {
        Self {
            stats: fixtures::demo_dashboard_stats(),
            sales_data: fixtures::demo_sales_data(),
            recommendations: fixtures::demo_recommendations(),
            loading: true,
            is_demo: false,
        }
    }

    // Estatísticas demo, mantendo a série de vendas que foi lida.
    fn demo(sales_data: Vec<SalesPoint>) -> Self {
        Self {
            stats: fixtures::demo_dashboard_stats(),
            sales_data,
            recommendations: fixtures::demo_recommendations(),
            loading: false,
            is_demo: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub stats: DashboardStat,
    pub sales_data: Vec<SalesPoint>,
    pub recommendations: Vec<RecommendationCard>,
    pub loading: bool,
    pub is_demo: bool,
    pub notice: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrderMetricRow {
    #[serde(default)]
    total: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
struct ActiveProductRow {
    #[serde(default)]
    created_at: Option<String>,
}

fn non_zero(value: u64, fallback: u64) -> u64 {
    if value == 0 { fallback } else { value }
}

// O "hook" do painel do vendedor: estatísticas, gráfico de vendas e recomendações.
pub struct DashboardService {
    store: Arc<dyn RemoteStore>,
    state: RwLock<DashboardState>,
    liveness: Liveness,
    poll: Mutex<Option<PollHandle>>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self {
            store,
            state: RwLock::new(DashboardState::initial()),
            liveness: Liveness::new(),
            poll: Mutex::new(None),
        }
    }

    /// Carga inicial + atualização periódica em segundo plano.
    pub async fn mount(self: &Arc<Self>, refresh_every: Duration) {
        self.refresh().await;

        let weak: Weak<Self> = Arc::downgrade(self);
        let handle = spawn_polling(refresh_every, move || {
            let weak = weak.clone();
            async move {
                if let Some(service) = weak.upgrade() {
                    service.reload().await;
                }
            }
        });

        if let Some(previous) = self.poll.lock().await.replace(handle) {
            previous.cancel();
        }
    }

    /// Cancela o polling; respostas que ainda estiverem a caminho são descartadas.
    pub async fn unmount(&self) {
        self.liveness.retire();
        if let Some(handle) = self.poll.lock().await.take() {
            handle.cancel();
        }
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        let state = self.state.read().await;
        DashboardSnapshot {
            stats: state.stats.clone(),
            sales_data: state.sales_data.clone(),
            recommendations: state.recommendations.iter().map(RecommendationCard::from).collect(),
            loading: state.loading,
            is_demo: state.is_demo,
            notice: state.is_demo.then(|| DEMO_NOTICE.to_string()),
        }
    }

    /// Atualização pedida pelo usuário: marca `loading` e recarrega.
    pub async fn refresh(&self) {
        {
            let mut state = self.state.write().await;
            if !self.liveness.is_alive() {
                return;
            }
            state.loading = true;
        }
        self.reload().await;
    }

    // Recarga sem passar por `loading`: os dados antigos ficam até os novos chegarem.
    async fn reload(&self) {
        let next = self.load().await;

        let mut state = self.state.write().await;
        if !self.liveness.is_alive() {
            tracing::debug!("Painel desmontado, descartando atualização.");
            return;
        }
        *state = next;
    }

    async fn load(&self) -> DashboardState {
        let store = self.store.as_ref();

        // 1. Série de vendas
        let sales: Fetched<SalesPoint> = fetch_with_fallback(
            store,
            "sales_data",
            fixtures::demo_sales_data(),
            &SelectQuery::new().order_by("name", true),
        )
        .await;

        let sales_data = match sales {
            Fetched::Live(rows) => rows,
            Fetched::Fallback(rows) => return DashboardState::demo(rows),
        };

        // 2. Métricas de pedidos
        let metrics: Fetched<OrderMetricRow> = fetch_with_fallback(
            store,
            "orders",
            Vec::new(),
            &SelectQuery::new().select("id, total, created_at"),
        )
        .await;

        let orders = match metrics {
            Fetched::Live(rows) => rows,
            Fetched::Fallback(_) => return DashboardState::demo(sales_data),
        };

        let now = Utc::now();
        let total_revenue: Decimal = orders.iter().filter_map(|order| order.total).sum();

        // 3. Clientes novos (30 dias) e produtos ativos; falhas aqui só zeram a métrica
        let new_customers = fetch_rows::<Value>(
            store,
            "profiles",
            &SelectQuery::new()
                .select("id")
                .gte("created_at", (now - chrono::Duration::days(30)).to_rfc3339()),
        )
        .await
        .map(|rows| rows.len() as u64)
        .unwrap_or_else(|e| {
            tracing::debug!("Contagem de clientes indisponível: {}", e);
            0
        });

        let active_products = fetch_rows::<ActiveProductRow>(
            store,
            "products",
            &SelectQuery::new().select("id, created_at").eq("status", "active"),
        )
        .await
        .unwrap_or_else(|e| {
            tracing::debug!("Contagem de produtos indisponível: {}", e);
            Vec::new()
        });

        let week_ago = now - chrono::Duration::days(7);
        let new_products = active_products
            .iter()
            .filter_map(|product| product.created_at.as_deref().and_then(parse_timestamp))
            .filter(|created_at| *created_at > week_ago)
            .count() as u64;

        let demo = fixtures::demo_dashboard_stats();
        let stats = DashboardStat {
            total_revenue: if total_revenue.is_zero() { demo.total_revenue } else { total_revenue },
            revenue_change: REVENUE_CHANGE,
            total_orders: non_zero(orders.len() as u64, demo.total_orders),
            orders_change: ORDERS_CHANGE,
            new_customers: non_zero(new_customers, demo.new_customers),
            customers_change: CUSTOMERS_CHANGE,
            active_products: non_zero(active_products.len() as u64, demo.active_products),
            new_products: non_zero(new_products, demo.new_products),
        };

        DashboardState {
            stats,
            sales_data,
            // Ainda não existe tabela de recomendações: sempre as fixtures.
            recommendations: fixtures::demo_recommendations(),
            loading: false,
            is_demo: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, OfflineStore};
    use serde_json::json;

    async fn live_store() -> Arc<MemoryStore> {
        let now = Utc::now();
        let store = Arc::new(MemoryStore::new());
        store
            .seed("sales_data", vec![json!({"name": "Feb", "total": 300}), json!({"name": "Apr", "total": 120})])
            .await;
        store
            .seed(
                "orders",
                vec![
                    json!({"id": "o1", "total": 100, "created_at": now.to_rfc3339()}),
                    json!({"id": "o2", "total": 50, "created_at": now.to_rfc3339()}),
                ],
            )
            .await;
        store
            .seed(
                "profiles",
                vec![
                    json!({"id": "u1", "created_at": (now - chrono::Duration::days(1)).to_rfc3339()}),
                    json!({"id": "u2", "created_at": (now - chrono::Duration::days(60)).to_rfc3339()}),
                ],
            )
            .await;
        store
            .seed(
                "products",
                vec![
                    json!({"id": "p1", "status": "active", "created_at": (now - chrono::Duration::days(2)).to_rfc3339()}),
                    json!({"id": "p2", "status": "active", "created_at": (now - chrono::Duration::days(20)).to_rfc3339()}),
                    json!({"id": "p3", "status": "inactive", "created_at": now.to_rfc3339()}),
                ],
            )
            .await;
        store
    }

    #[tokio::test]
    async fn starts_loading_with_fixtures() {
        let service = DashboardService::new(Arc::new(OfflineStore));
        let snapshot = service.snapshot().await;
        assert!(snapshot.loading);
        assert!(!snapshot.is_demo);
        assert_eq!(snapshot.stats, fixtures::demo_dashboard_stats());
    }

    #[tokio::test]
    async fn offline_store_settles_in_demo_mode() {
        let service = DashboardService::new(Arc::new(OfflineStore));
        service.refresh().await;

        let snapshot = service.snapshot().await;
        assert!(!snapshot.loading);
        assert!(snapshot.is_demo);
        assert_eq!(snapshot.notice.as_deref(), Some(DEMO_NOTICE));
        assert_eq!(snapshot.stats, fixtures::demo_dashboard_stats());
        assert_eq!(snapshot.sales_data, fixtures::demo_sales_data());
        assert_eq!(snapshot.recommendations.len(), fixtures::demo_recommendations().len());
    }

    #[tokio::test]
    async fn live_store_computes_stats() {
        let service = DashboardService::new(live_store().await);
        service.refresh().await;

        let snapshot = service.snapshot().await;
        assert!(!snapshot.is_demo);
        assert!(snapshot.notice.is_none());

        let months: Vec<_> = snapshot.sales_data.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(months, ["Apr", "Feb"]);

        assert_eq!(snapshot.stats.total_revenue, Decimal::from(150));
        assert_eq!(snapshot.stats.total_orders, 2);
        assert_eq!(snapshot.stats.new_customers, 1);
        assert_eq!(snapshot.stats.active_products, 2);
        assert_eq!(snapshot.stats.new_products, 1);
        assert_eq!(snapshot.stats.revenue_change, REVENUE_CHANGE);
    }

    #[tokio::test]
    async fn zero_metrics_use_fixture_values() {
        let store = Arc::new(MemoryStore::new());
        store.seed("sales_data", vec![]).await;
        store.seed("orders", vec![]).await;
        // "profiles" e "products" não existem: as contagens falham e viram zero.

        let service = DashboardService::new(store);
        service.refresh().await;

        let snapshot = service.snapshot().await;
        let demo = fixtures::demo_dashboard_stats();
        assert!(!snapshot.is_demo);
        assert!(snapshot.sales_data.is_empty());
        assert_eq!(snapshot.stats.total_revenue, demo.total_revenue);
        assert_eq!(snapshot.stats.total_orders, demo.total_orders);
        assert_eq!(snapshot.stats.new_customers, demo.new_customers);
        assert_eq!(snapshot.stats.active_products, demo.active_products);
    }

    #[tokio::test]
    async fn missing_orders_table_makes_dashboard_demo() {
        let store = Arc::new(MemoryStore::new());
        store.seed("sales_data", vec![json!({"name": "Jan", "total": 10})]).await;

        let service = DashboardService::new(store);
        service.refresh().await;

        let snapshot = service.snapshot().await;
        assert!(snapshot.is_demo);
        assert_eq!(snapshot.stats, fixtures::demo_dashboard_stats());
        assert_eq!(snapshot.sales_data.len(), 1);
    }

    #[tokio::test]
    async fn refresh_is_idempotent() {
        let service = DashboardService::new(live_store().await);
        service.refresh().await;
        let first = service.state.read().await.clone();
        service.refresh().await;
        let second = service.state.read().await.clone();
        assert_eq!(first, second);
    }

    #[tokio::test(start_paused = true)]
    async fn polling_picks_up_new_data() {
        let store = live_store().await;
        let service = Arc::new(DashboardService::new(store.clone()));
        service.mount(Duration::from_secs(300)).await;
        assert_eq!(service.snapshot().await.sales_data.len(), 2);

        store.seed("sales_data", vec![json!({"name": "Jan", "total": 1})]).await;
        tokio::time::sleep(Duration::from_secs(301)).await;

        assert_eq!(service.snapshot().await.sales_data.len(), 1);
        service.unmount().await;
    }

    #[tokio::test(start_paused = true)]
    async fn no_updates_after_unmount() {
        let store = live_store().await;
        let service = Arc::new(DashboardService::new(store.clone()));
        service.mount(Duration::from_secs(300)).await;
        let before = service.snapshot().await;

        service.unmount().await;
        let calls = store.select_calls();
        store.seed("sales_data", vec![]).await;

        // Nem o polling nem um refresh tardio alteram o estado.
        tokio::time::sleep(Duration::from_secs(900)).await;
        assert_eq!(store.select_calls(), calls);
        service.refresh().await;

        let after = service.snapshot().await;
        assert_eq!(after.sales_data, before.sales_data);
        assert!(!after.loading);
    }
}
