// src/db/memory_store.rs

use std::{
    cmp::Ordering,
    collections::HashMap,
    sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering as AtomicOrdering},
};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::{
    common::db_utils::{projection_columns, quote_ident},
    db::store::{FilterOp, RemoteStore, Row, SelectQuery, StoreError},
};

// Armazenamento em memória com a mesma semântica do PgStore.
// Usado com DATABASE_URL=memory:// e como dublê nos testes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Row>>>,
    unavailable: AtomicBool,
    next_id: AtomicU64,
    select_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Substitui o conteúdo de uma coleção.
    pub async fn seed(&self, collection: &str, rows: Vec<Row>) {
        self.collections.write().await.insert(collection.to_string(), rows);
    }

    pub async fn rows(&self, collection: &str) -> Vec<Row> {
        self.collections.read().await.get(collection).cloned().unwrap_or_default()
    }

    /// Simula uma queda do banco: todas as chamadas passam a falhar.
    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, AtomicOrdering::SeqCst);
    }

    pub fn select_calls(&self) -> usize {
        self.select_calls.load(AtomicOrdering::SeqCst)
    }

    fn ensure_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(AtomicOrdering::SeqCst) {
            return Err(StoreError::Unavailable("memory store offline".to_string()));
        }
        Ok(())
    }
}

// Comparação no estilo do `::text` do Postgres, mas numérica quando os dois lados são números.
fn compare_values(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Number(a), Value::Number(b)) => {
            let a = a.as_f64().unwrap_or_default();
            let b = b.as_f64().unwrap_or_default();
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        _ => value_text(left).cmp(&value_text(right)),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn project(row: &Row, columns: &Option<Vec<String>>) -> Row {
    match (columns, row) {
        (Some(columns), Value::Object(object)) => {
            let projected: Map<String, Value> = columns
                .iter()
                .map(|column| (column.clone(), object.get(column).cloned().unwrap_or(Value::Null)))
                .collect();
            Value::Object(projected)
        }
        _ => row.clone(),
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn select(&self, collection: &str, query: &SelectQuery) -> Result<Vec<Row>, StoreError> {
        self.select_calls.fetch_add(1, AtomicOrdering::SeqCst);
        self.ensure_available()?;
        quote_ident(collection)?;

        let collections = self.collections.read().await;
        let Some(rows) = collections.get(collection) else {
            return Err(StoreError::Unavailable(format!("relation \"{}\" does not exist", collection)));
        };

        let mut rows: Vec<Row> = rows
            .iter()
            .filter(|row| match &query.filter {
                None => true,
                Some(filter) => {
                    let field = row.get(&filter.column).unwrap_or(&Value::Null);
                    match filter.op {
                        FilterOp::Eq => !field.is_null() && compare_values(field, &filter.value) == Ordering::Equal,
                        FilterOp::Gte => !field.is_null() && compare_values(field, &filter.value) != Ordering::Less,
                    }
                }
            })
            .cloned()
            .collect();

        if let Some(order) = &query.order_by {
            rows.sort_by(|a, b| {
                let a = a.get(&order.column).unwrap_or(&Value::Null);
                let b = b.get(&order.column).unwrap_or(&Value::Null);
                let ordering = compare_values(a, b);
                if order.ascending { ordering } else { ordering.reverse() }
            });
        }

        let columns = projection_columns(query.projection.as_deref());
        Ok(rows.iter().map(|row| project(row, &columns)).collect())
    }

    async fn upsert(&self, collection: &str, record: Row) -> Result<Option<Row>, StoreError> {
        self.ensure_available()?;
        quote_ident(collection)?;

        let Value::Object(mut fields) = record else {
            return Err(StoreError::NotAnObject);
        };

        let mut collections = self.collections.write().await;
        let rows = collections.entry(collection.to_string()).or_default();

        match fields.get("id").cloned().filter(|id| !id.is_null()) {
            // UPDATE: linha inexistente não é erro, apenas nada volta.
            Some(id) => {
                let existing = rows
                    .iter_mut()
                    .find(|row| row.get("id").map(|current| compare_values(current, &id) == Ordering::Equal).unwrap_or(false));

                Ok(existing.map(|row| {
                    if let Value::Object(current) = &mut *row {
                        for (key, value) in fields {
                            current.insert(key, value);
                        }
                    }
                    row.clone()
                }))
            }
            None => {
                let id = self.next_id.fetch_add(1, AtomicOrdering::SeqCst) + 1;
                fields.insert("id".to_string(), Value::String(format!("mem-{}", id)));
                let row = Value::Object(fields);
                rows.push(row.clone());
                Ok(Some(row))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .seed(
                "products",
                vec![
                    json!({"id": "p2", "name": "Watch", "price": 129, "status": "active"}),
                    json!({"id": "p1", "name": "Coffee", "price": 4, "status": "inactive"}),
                    json!({"id": "p3", "name": "Necklace", "price": 249, "status": "active"}),
                ],
            )
            .await;
        store
    }

    #[tokio::test]
    async fn orders_filters_and_projects() {
        let store = seeded().await;
        let query = SelectQuery::new().select("id, name").eq("status", "active").order_by("name", true);

        let rows = store.select("products", &query).await.unwrap();
        assert_eq!(rows, vec![json!({"id": "p3", "name": "Necklace"}), json!({"id": "p2", "name": "Watch"})]);
    }

    #[tokio::test]
    async fn sorts_numbers_numerically() {
        let store = seeded().await;
        let query = SelectQuery::new().select("id").order_by("price", false);
        let rows = store.select("products", &query).await.unwrap();
        assert_eq!(rows, vec![json!({"id": "p3"}), json!({"id": "p2"}), json!({"id": "p1"})]);

        let cheap = store.select("products", &SelectQuery::new().gte("price", 129)).await.unwrap();
        assert_eq!(cheap.len(), 2);
    }

    #[tokio::test]
    async fn unknown_collection_is_an_error() {
        let store = MemoryStore::new();
        assert!(store.select("nope", &SelectQuery::new()).await.is_err());
    }

    #[tokio::test]
    async fn empty_collection_is_not_an_error() {
        let store = MemoryStore::new();
        store.seed("products", vec![]).await;
        assert!(store.select("products", &SelectQuery::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn upsert_inserts_and_merges() {
        let store = seeded().await;

        let inserted = store.upsert("products", json!({"name": "Tea"})).await.unwrap().unwrap();
        assert_eq!(inserted["id"], json!("mem-1"));

        let updated = store
            .upsert("products", json!({"id": "p1", "status": "active"}))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated, json!({"id": "p1", "name": "Coffee", "price": 4, "status": "active"}));

        let missing = store.upsert("products", json!({"id": "zz", "status": "active"})).await.unwrap();
        assert!(missing.is_none());
        assert_eq!(store.rows("products").await.len(), 4);
    }

    #[tokio::test]
    async fn offline_toggle() {
        let store = seeded().await;
        store.set_available(false);
        assert!(store.select("products", &SelectQuery::new()).await.is_err());
        assert!(store.upsert("products", json!({"name": "x"})).await.is_err());
        store.set_available(true);
        assert!(store.select("products", &SelectQuery::new()).await.is_ok());
        assert_eq!(store.select_calls(), 2);
    }
}
