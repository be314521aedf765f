// src/services/fallback.rs

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::db::store::{RemoteStore, Row, SelectQuery, StoreError};

/// Aviso exibido junto de qualquer dado vindo das fixtures.
pub const DEMO_NOTICE: &str = "Currently displaying demo data. Database connection issues detected.";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Linha incompatível com o modelo: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Resultado de uma leitura com fallback.
/// `Fallback` carrega exatamente as fixtures; nunca há mistura com linhas do banco.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<L, F = L> {
    Live(Vec<L>),
    Fallback(Vec<F>),
}

// O envelope uniforme devolvido pela camada de dados
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchResult<T> {
    pub data: Vec<T>,
    pub is_demo: bool,
}

impl<T> From<Fetched<T>> for FetchResult<T> {
    fn from(fetched: Fetched<T>) -> Self {
        match fetched {
            Fetched::Live(data) => Self { data, is_demo: false },
            Fetched::Fallback(data) => Self { data, is_demo: true },
        }
    }
}

/// Leitura crua, sem fixture. Os joins e métricas secundárias usam esta
/// versão e aplicam os próprios valores padrão.
pub async fn fetch_rows<T>(store: &dyn RemoteStore, collection: &str, query: &SelectQuery) -> Result<Vec<T>, FetchError>
where
    T: DeserializeOwned,
{
    let rows = store.select(collection, query).await?;
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(FetchError::from))
        .collect()
}

/// Lê `collection`; qualquer erro (inclusive linha que não vira `L`) devolve as fixtures.
/// Nunca falha: quem chama só percebe a degradação pela variante `Fallback`.
pub async fn fetch_with_fallback<L, F>(
    store: &dyn RemoteStore,
    collection: &str,
    fixture: Vec<F>,
    query: &SelectQuery,
) -> Fetched<L, F>
where
    L: DeserializeOwned,
{
    match fetch_rows(store, collection, query).await {
        Ok(rows) => Fetched::Live(rows),
        Err(e) => {
            tracing::warn!("⚠️ Leitura de '{}' falhou, usando dados demo: {}", collection, e);
            Fetched::Fallback(fixture)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WriteOutcome {
    pub success: bool,
    pub is_demo: bool,
}

impl WriteOutcome {
    pub const LIVE: WriteOutcome = WriteOutcome { success: true, is_demo: false };
    // Mesmo no fallback a escrita "deu certo": o estado local foi atualizado.
    pub const DEMO: WriteOutcome = WriteOutcome { success: true, is_demo: true };
}

/// Resultado de uma escrita com fallback.
#[derive(Debug, Clone, PartialEq)]
pub enum Submitted {
    /// O banco confirmou; o registro ecoado pode não existir.
    Confirmed(Option<Row>),
    /// O banco falhou; quem chama aplica a mudança só em memória.
    Fallback,
}

impl Submitted {
    pub fn outcome(&self) -> WriteOutcome {
        match self {
            Submitted::Confirmed(_) => WriteOutcome::LIVE,
            Submitted::Fallback => WriteOutcome::DEMO,
        }
    }
}

pub async fn submit_with_fallback(store: &dyn RemoteStore, collection: &str, payload: Row) -> Submitted {
    match store.upsert(collection, payload).await {
        Ok(confirmed) => Submitted::Confirmed(confirmed),
        Err(e) => {
            tracing::warn!("⚠️ Escrita em '{}' falhou, aplicando só em memória: {}", collection, e);
            Submitted::Fallback
        }
    }
}
