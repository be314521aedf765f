// src/services/inventory_service.rs

use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use utoipa::ToSchema;

use crate::{
    db::{fixtures, RemoteStore, SelectQuery},
    models::{
        auth::User,
        inventory::{NewProduct, Product, ProductUpdate},
    },
    services::{
        fallback::{fetch_with_fallback, submit_with_fallback, FetchResult, Submitted, WriteOutcome, DEMO_NOTICE},
        lifecycle::Liveness,
    },
};

#[derive(Debug, Clone, PartialEq)]
struct ProductsState {
    products: Vec<Product>,
    loading: bool,
    is_demo: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductsSnapshot {
    pub products: Vec<Product>,
    pub loading: bool,
    pub is_demo: bool,
    pub notice: Option<String>,
}

// Resposta do `create_product`: o resultado da escrita + o produto como ficou na lista.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ProductWrite {
    #[serde(flatten)]
    pub outcome: WriteOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Product>,
}

// O "hook" do catálogo de produtos.
pub struct InventoryService {
    store: Arc<dyn RemoteStore>,
    state: RwLock<ProductsState>,
    liveness: Liveness,
    last_demo_id: AtomicI64,
}

impl InventoryService {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self {
            store,
            state: RwLock::new(ProductsState { products: Vec::new(), loading: true, is_demo: false }),
            liveness: Liveness::new(),
            last_demo_id: AtomicI64::new(0),
        }
    }

    pub async fn mount(&self) {
        self.refresh().await;
    }

    pub fn unmount(&self) {
        self.liveness.retire();
    }

    pub async fn snapshot(&self) -> ProductsSnapshot {
        let state = self.state.read().await;
        ProductsSnapshot {
            products: state.products.clone(),
            loading: state.loading,
            is_demo: state.is_demo,
            notice: state.is_demo.then(|| DEMO_NOTICE.to_string()),
        }
    }

    async fn update(&self, change: impl FnOnce(&mut ProductsState)) {
        let mut state = self.state.write().await;
        if !self.liveness.is_alive() {
            tracing::debug!("Catálogo desmontado, descartando atualização.");
            return;
        }
        change(&mut state);
    }

    pub async fn refresh(&self) {
        self.update(|state| state.loading = true).await;

        let result: FetchResult<Product> = fetch_with_fallback(
            self.store.as_ref(),
            "products",
            fixtures::demo_products(),
            &SelectQuery::new()
                .select("id, name, description, price, category, image, stock, barcode, status")
                .order_by("name", true),
        )
        .await
        .into();

        self.update(|state| {
            state.products = result.data;
            state.is_demo = result.is_demo;
            state.loading = false;
        })
        .await;
    }

    /// `demo-<milissegundos>`, estritamente crescente mesmo com duas criações no mesmo ms.
    fn next_demo_id(&self) -> String {
        let now = Utc::now().timestamp_millis();
        let previous = self
            .last_demo_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(now.max(last + 1)))
            .unwrap_or(now);
        format!("demo-{}", now.max(previous + 1))
    }

    async fn push_demo_product(&self, product: NewProduct, enter_demo: bool) -> Product {
        let created = product.into_product(self.next_demo_id());
        let pushed = created.clone();
        self.update(|state| {
            state.products.push(pushed);
            if enter_demo {
                state.is_demo = true;
            }
        })
        .await;
        created
    }

    pub async fn create_product(&self, seller: Option<&User>, product: NewProduct) -> ProductWrite {
        if self.state.read().await.is_demo {
            let created = self.push_demo_product(product, false).await;
            tracing::info!("Modo demo: produto {} criado só em memória.", created.id);
            return ProductWrite { outcome: WriteOutcome::DEMO, data: Some(created) };
        }

        let mut payload = serde_json::to_value(&product).unwrap_or_else(|_| Value::Object(Default::default()));
        if let Value::Object(fields) = &mut payload {
            fields.insert(
                "seller_id".to_string(),
                seller.map(|user| Value::String(user.id.clone())).unwrap_or(Value::Null),
            );
        }

        match submit_with_fallback(self.store.as_ref(), "products", payload).await {
            Submitted::Confirmed(row) => {
                let echoed = row.and_then(|row| match serde_json::from_value::<Product>(row) {
                    Ok(product) => Some(product),
                    Err(e) => {
                        tracing::debug!("Produto criado, mas a linha ecoada não é legível: {}", e);
                        None
                    }
                });

                match echoed {
                    Some(created) => {
                        let pushed = created.clone();
                        self.update(|state| state.products.push(pushed)).await;
                        ProductWrite { outcome: WriteOutcome::LIVE, data: Some(created) }
                    }
                    // Sem eco utilizável: a lista é relida do banco.
                    None => {
                        self.refresh().await;
                        ProductWrite { outcome: WriteOutcome::LIVE, data: None }
                    }
                }
            }
            Submitted::Fallback => {
                let created = self.push_demo_product(product, true).await;
                ProductWrite { outcome: WriteOutcome::DEMO, data: Some(created) }
            }
        }
    }

    async fn merge_local(&self, id: &str, updates: &ProductUpdate, enter_demo: bool) {
        self.update(|state| {
            state
                .products
                .iter_mut()
                .filter(|product| product.id == id)
                .for_each(|product| updates.apply_to(product));
            if enter_demo {
                state.is_demo = true;
            }
        })
        .await;
    }

    pub async fn update_product(&self, id: &str, updates: ProductUpdate) -> WriteOutcome {
        if self.state.read().await.is_demo {
            self.merge_local(id, &updates, false).await;
            return WriteOutcome::DEMO;
        }

        let mut payload = serde_json::to_value(&updates).unwrap_or_else(|_| Value::Object(Default::default()));
        if let Value::Object(fields) = &mut payload {
            fields.insert("id".to_string(), Value::String(id.to_string()));
        }

        let submitted = submit_with_fallback(self.store.as_ref(), "products", payload).await;
        // Nos dois caminhos a cópia local recebe a mudança; sem releitura.
        self.merge_local(id, &updates, matches!(submitted, Submitted::Fallback)).await;
        submitted.outcome()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{MemoryStore, OfflineStore},
        models::{auth::Role, inventory::ProductStatus},
    };
    use rust_decimal::Decimal;
    use serde_json::json;

    fn new_product(name: &str) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            description: Some("Hand-made".to_string()),
            price: Decimal::new(1999, 2),
            category: "Crafts".to_string(),
            image: None,
            stock: 4,
            barcode: None,
            status: ProductStatus::Active,
        }
    }

    fn seller() -> User {
        User {
            id: "seller-1".to_string(),
            email: "demoseller@gmail.com".to_string(),
            name: "Demo Seller".to_string(),
            role: Role::Seller,
        }
    }

    fn product_row(id: &str, name: &str) -> Value {
        json!({"id": id, "name": name, "price": 10, "category": "Misc", "stock": 1, "status": "active"})
    }

    #[tokio::test]
    async fn empty_catalog_is_not_demo() {
        let store = Arc::new(MemoryStore::new());
        store.seed("products", vec![]).await;

        let service = InventoryService::new(store);
        service.mount().await;

        let snapshot = service.snapshot().await;
        assert!(snapshot.products.is_empty());
        assert!(!snapshot.is_demo);
        assert!(!snapshot.loading);
        assert!(snapshot.notice.is_none());
    }

    #[tokio::test]
    async fn catalog_is_sorted_by_name() {
        let store = Arc::new(MemoryStore::new());
        store.seed("products", vec![product_row("1", "Watch"), product_row("2", "Coffee")]).await;

        let service = InventoryService::new(store);
        service.refresh().await;

        let names: Vec<_> = service.snapshot().await.products.into_iter().map(|p| p.name).collect();
        assert_eq!(names, ["Coffee", "Watch"]);
    }

    #[tokio::test]
    async fn demo_create_appends_one_product() {
        let service = InventoryService::new(Arc::new(OfflineStore));
        service.refresh().await;
        let before = service.snapshot().await.products.len();

        let input = new_product("Batik Scarf");
        let write = service.create_product(Some(&seller()), input.clone()).await;
        assert_eq!(write.outcome, WriteOutcome::DEMO);

        let products = service.snapshot().await.products;
        assert_eq!(products.len(), before + 1);

        let created = products.last().unwrap();
        let number = created.id.strip_prefix("demo-").unwrap();
        assert!(number.parse::<i64>().is_ok());
        assert_eq!(*created, input.into_product(created.id.clone()));
        assert_eq!(write.data.as_ref(), Some(created));
    }

    #[tokio::test]
    async fn demo_ids_are_unique() {
        let service = InventoryService::new(Arc::new(OfflineStore));
        service.refresh().await;

        let first = service.create_product(None, new_product("A")).await.data.unwrap();
        let second = service.create_product(None, new_product("B")).await.data.unwrap();
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn live_create_stamps_seller_and_appends_echo() {
        let store = Arc::new(MemoryStore::new());
        store.seed("products", vec![]).await;
        let service = InventoryService::new(store.clone());
        service.refresh().await;

        let write = service.create_product(Some(&seller()), new_product("Kopi Luwak")).await;
        assert_eq!(write.outcome, WriteOutcome::LIVE);

        let created = write.data.unwrap();
        assert_eq!(created.id, "mem-1");
        assert_eq!(service.snapshot().await.products, vec![created]);

        let rows = store.rows("products").await;
        assert_eq!(rows[0]["seller_id"], "seller-1");
    }

    #[tokio::test]
    async fn failed_create_switches_to_demo() {
        let store = Arc::new(MemoryStore::new());
        store.seed("products", vec![product_row("1", "Watch")]).await;
        let service = InventoryService::new(store.clone());
        service.refresh().await;

        store.set_available(false);
        let write = service.create_product(Some(&seller()), new_product("Tea")).await;
        assert_eq!(write.outcome, WriteOutcome::DEMO);

        let snapshot = service.snapshot().await;
        assert!(snapshot.is_demo);
        assert_eq!(snapshot.products.len(), 2);
        assert!(snapshot.products[1].id.starts_with("demo-"));
    }

    #[tokio::test]
    async fn update_merges_only_given_fields() {
        let store = Arc::new(MemoryStore::new());
        store.seed("products", vec![product_row("1", "Watch"), product_row("2", "Coffee")]).await;
        let service = InventoryService::new(store.clone());
        service.refresh().await;

        let updates = ProductUpdate { stock: Some(0), status: Some(ProductStatus::OutOfStock), ..Default::default() };
        let outcome = service.update_product("1", updates).await;
        assert_eq!(outcome, WriteOutcome::LIVE);

        let products = service.snapshot().await.products;
        let watch = products.iter().find(|p| p.id == "1").unwrap();
        assert_eq!(watch.stock, 0);
        assert_eq!(watch.status, ProductStatus::OutOfStock);
        assert_eq!(watch.name, "Watch");

        let coffee = products.iter().find(|p| p.id == "2").unwrap();
        assert_eq!(coffee.status, ProductStatus::Active);

        assert_eq!(store.rows("products").await[0]["status"], "out_of_stock");
    }

    #[tokio::test]
    async fn null_update_clears_field_in_store_and_list() {
        let store = Arc::new(MemoryStore::new());
        let mut row = product_row("1", "Watch");
        row["description"] = json!("Leather band");
        store.seed("products", vec![row]).await;
        let service = InventoryService::new(store.clone());
        service.refresh().await;

        let updates: ProductUpdate = serde_json::from_value(json!({"description": null})).unwrap();
        assert_eq!(service.update_product("1", updates).await, WriteOutcome::LIVE);

        assert_eq!(service.snapshot().await.products[0].description, None);
        assert_eq!(store.rows("products").await[0]["description"], Value::Null);
    }

    #[tokio::test]
    async fn refresh_is_idempotent() {
        let store = Arc::new(MemoryStore::new());
        store.seed("products", vec![product_row("1", "Watch"), product_row("2", "Coffee")]).await;
        let service = InventoryService::new(store);
        service.refresh().await;
        let first = service.state.read().await.clone();

        service.refresh().await;
        assert_eq!(*service.state.read().await, first);

        let offline = InventoryService::new(Arc::new(OfflineStore));
        offline.refresh().await;
        let first = offline.state.read().await.clone();

        offline.refresh().await;
        assert_eq!(*offline.state.read().await, first);
    }

    #[tokio::test]
    async fn failed_update_is_applied_locally() {
        let store = Arc::new(MemoryStore::new());
        store.seed("products", vec![product_row("1", "Watch")]).await;
        let service = InventoryService::new(store.clone());
        service.refresh().await;

        store.set_available(false);
        let updates = ProductUpdate { price: Some(Decimal::from(12)), ..Default::default() };
        assert_eq!(service.update_product("1", updates).await, WriteOutcome::DEMO);

        let snapshot = service.snapshot().await;
        assert!(snapshot.is_demo);
        assert_eq!(snapshot.products[0].price, Decimal::from(12));
    }
}
