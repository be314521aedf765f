// src/db/pg_store.rs

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::PgPool;

use crate::{
    common::db_utils::{quote_ident, quote_projection},
    db::store::{FilterOp, RemoteStore, Row, SelectQuery, StoreError},
};

// O armazenamento remoto sobre Postgres.
// Os valores nunca são interpolados: o JSON vai como parâmetro ($1) e o
// `jsonb_populate_record` converte cada campo para o tipo da coluna.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn populated(table: &str) -> String {
    format!("jsonb_populate_record(NULL::{}, $1)", table)
}

// Monta o SELECT. Devolve o SQL e, se houver filtro, o objeto a ser vinculado em $1.
pub(crate) fn build_select_sql(collection: &str, query: &SelectQuery) -> Result<(String, Option<Value>), StoreError> {
    let table = quote_ident(collection)?;
    let projection = quote_projection(query.projection.as_deref())?;

    let mut inner = format!("SELECT {} FROM {}", projection, table);
    let mut bind = None;

    if let Some(filter) = &query.filter {
        let column = quote_ident(&filter.column)?;
        let op = match filter.op {
            FilterOp::Eq => "=",
            FilterOp::Gte => ">=",
        };
        inner.push_str(&format!(" WHERE {} {} ({}).{}", column, op, populated(&table), column));

        let mut object = Map::new();
        object.insert(filter.column.clone(), filter.value.clone());
        bind = Some(Value::Object(object));
    }

    if let Some(order) = &query.order_by {
        let column = quote_ident(&order.column)?;
        let direction = if order.ascending { "ASC" } else { "DESC" };
        inner.push_str(&format!(" ORDER BY {} {}", column, direction));
    }

    Ok((format!("SELECT row_to_json(t) FROM ({}) t", inner), bind))
}

// Com `id` => UPDATE das colunas enviadas; sem `id` => INSERT.
pub(crate) fn build_upsert_sql(collection: &str, record: &Map<String, Value>) -> Result<String, StoreError> {
    let table = quote_ident(collection)?;
    let columns = record
        .keys()
        .filter(|key| key.as_str() != "id")
        .map(|key| quote_ident(key))
        .collect::<Result<Vec<_>, _>>()?
        .join(", ");

    let has_id = record.get("id").map(|id| !id.is_null()).unwrap_or(false);

    let sql = match (has_id, columns.is_empty()) {
        // Só o id: nada a atualizar, apenas devolve a linha atual.
        (true, true) => format!(
            "SELECT row_to_json(t) FROM {table} t WHERE t.\"id\" = ({pop}).\"id\"",
            table = table,
            pop = populated(&table),
        ),
        (true, false) => format!(
            "UPDATE {table} SET ({cols}) = (SELECT {cols} FROM {pop}) WHERE \"id\" = ({pop}).\"id\" RETURNING row_to_json({table})",
            table = table,
            cols = columns,
            pop = populated(&table),
        ),
        (false, true) => format!(
            "INSERT INTO {table} DEFAULT VALUES RETURNING row_to_json({table})",
            table = table,
        ),
        (false, false) => format!(
            "INSERT INTO {table} ({cols}) SELECT {cols} FROM {pop} RETURNING row_to_json({table})",
            table = table,
            cols = columns,
            pop = populated(&table),
        ),
    };

    Ok(sql)
}

#[async_trait]
impl RemoteStore for PgStore {
    async fn select(&self, collection: &str, query: &SelectQuery) -> Result<Vec<Row>, StoreError> {
        let (sql, bind) = build_select_sql(collection, query)?;

        let mut statement = sqlx::query_scalar::<_, Value>(&sql);
        if let Some(value) = bind {
            statement = statement.bind(value);
        }

        let rows = statement.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn upsert(&self, collection: &str, record: Row) -> Result<Option<Row>, StoreError> {
        let Value::Object(object) = record else {
            return Err(StoreError::NotAnObject);
        };

        let sql = build_upsert_sql(collection, &object)?;
        let confirmed = sqlx::query_scalar::<_, Value>(&sql)
            .bind(Value::Object(object))
            .fetch_optional(&self.pool)
            .await?;

        Ok(confirmed)
    }
}
