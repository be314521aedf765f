// src/db/store.rs

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Uma linha do armazenamento remoto, já em JSON.
pub type Row = Value;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Armazenamento remoto indisponível: {0}")]
    Unavailable(String),

    #[error("Identificador SQL inválido: {0}")]
    InvalidIdentifier(String),

    #[error("Registro precisa ser um objeto JSON")]
    NotAnObject,

    #[error("Erro de banco de dados: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gte,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub op: FilterOp,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub ascending: bool,
}

/// Opções de leitura: projeção, ordenação e filtro.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectQuery {
    pub projection: Option<String>,
    pub order_by: Option<OrderBy>,
    pub filter: Option<Filter>,
}

impl SelectQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(mut self, projection: &str) -> Self {
        self.projection = Some(projection.to_string());
        self
    }

    pub fn order_by(mut self, column: &str, ascending: bool) -> Self {
        self.order_by = Some(OrderBy { column: column.to_string(), ascending });
        self
    }

    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filter = Some(Filter { column: column.to_string(), op: FilterOp::Eq, value: value.into() });
        self
    }

    pub fn gte(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filter = Some(Filter { column: column.to_string(), op: FilterOp::Gte, value: value.into() });
        self
    }
}

// As duas primitivas que a camada de dados exige do armazenamento remoto.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Lê linhas de uma coleção, na ordem em que o armazenamento as devolve.
    async fn select(&self, collection: &str, query: &SelectQuery) -> Result<Vec<Row>, StoreError>;

    /// Insere (sem `id`) ou atualiza (com `id`) um registro.
    /// Devolve o registro confirmado, se o armazenamento ecoar algum.
    async fn upsert(&self, collection: &str, record: Row) -> Result<Option<Row>, StoreError>;
}

/// Usado quando nenhum DATABASE_URL foi configurado: toda chamada falha e
/// os hooks ficam em modo demo.
#[derive(Debug, Clone, Default)]
pub struct OfflineStore;

#[async_trait]
impl RemoteStore for OfflineStore {
    async fn select(&self, collection: &str, _query: &SelectQuery) -> Result<Vec<Row>, StoreError> {
        Err(StoreError::Unavailable(format!("nenhum banco configurado (leitura de '{}')", collection)))
    }

    async fn upsert(&self, collection: &str, _record: Row) -> Result<Option<Row>, StoreError> {
        Err(StoreError::Unavailable(format!("nenhum banco configurado (escrita em '{}')", collection)))
    }
}
