//! PostgreSQL repository
//!
//! Each entity has its own table of JSONB documents:
//! `(id TEXT PRIMARY KEY, data JSONB, created_at, updated_at)`.

use crate::errors::StoreError;
use crate::generic_store::document::{apply_changes, from_document, prepare_new};
use crate::query_builder::{QueryBuilder, SqlParam};
use crate::traits::{Entity, Repository, RepositoryFactory};
use crate::DbPool;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::postgres::Postgres;
use sqlx::query::QueryScalar;
use sqlx::types::Json;
use std::fmt::Debug;
use std::marker::PhantomData;

pub struct PgRepository<E: Entity> {
    pool: DbPool,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Clone for PgRepository<E> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Debug for PgRepository<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgRepository")
            .field("table", &E::TABLE)
            .finish()
    }
}

impl<E: Entity> PgRepository<E> {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    fn db_error(err: sqlx::Error) -> StoreError {
        StoreError::database(E::POLICY.entity, err)
    }
}

fn bind_params<'q, O>(
    mut query: QueryScalar<'q, Postgres, O, sqlx::postgres::PgArguments>,
    params: Vec<SqlParam>,
) -> QueryScalar<'q, Postgres, O, sqlx::postgres::PgArguments> {
    for param in params {
        query = match param {
            SqlParam::Json(value) => query.bind(Json(value)),
            SqlParam::Float(number) => query.bind(number),
            SqlParam::Text(text) => query.bind(text),
        };
    }
    query
}

#[async_trait]
impl<E: Entity> Repository<E> for PgRepository<E> {
    async fn find_by_id(&self, id: &str) -> Result<Option<E>, StoreError> {
        let sql = format!("SELECT data FROM {} WHERE id = $1", E::TABLE);
        let row = sqlx::query_scalar::<_, Json<Value>>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::db_error)?;

        row.map(|Json(document)| from_document::<E>(document)).transpose()
    }

    async fn find(&self, query: QueryBuilder) -> Result<Vec<E>, StoreError> {
        let (where_clause, order_clause, limit_clause, params) = query.build();
        let sql = format!(
            "SELECT data FROM {} {} {} {}",
            E::TABLE,
            where_clause,
            order_clause,
            limit_clause
        );

        let rows = bind_params(sqlx::query_scalar::<_, Json<Value>>(&sql), params)
            .fetch_all(&self.pool)
            .await
            .map_err(Self::db_error)?;

        rows.into_iter()
            .map(|Json(document)| from_document::<E>(document))
            .collect()
    }

    async fn count(&self, query: QueryBuilder) -> Result<i64, StoreError> {
        let (where_clause, params) = query.build_where_clause();
        let sql = format!("SELECT COUNT(*) FROM {} {}", E::TABLE, where_clause);

        bind_params(sqlx::query_scalar::<_, i64>(&sql), params)
            .fetch_one(&self.pool)
            .await
            .map_err(Self::db_error)
    }

    async fn create(&self, entity: E) -> Result<E, StoreError> {
        let now = Utc::now();
        let (id, document) = prepare_new(&entity, now)?;
        let sql = format!(
            "INSERT INTO {} (id, data, created_at, updated_at) VALUES ($1, $2, $3, $3) RETURNING data",
            E::TABLE
        );

        let Json(stored) = sqlx::query_scalar::<_, Json<Value>>(&sql)
            .bind(&id)
            .bind(Json(document))
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(Self::db_error)?;

        from_document(stored)
    }

    async fn update_with_previous(&self, id: &str, changes: Value) -> Result<(E, E), StoreError> {
        let mut tx = self.pool.begin().await.map_err(Self::db_error)?;

        let select_sql = format!("SELECT data FROM {} WHERE id = $1 FOR UPDATE", E::TABLE);
        let Json(current) = sqlx::query_scalar::<_, Json<Value>>(&select_sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(Self::db_error)?
            .ok_or_else(|| StoreError::not_found(E::POLICY.entity, id))?;

        let previous = from_document::<E>(current.clone())?;
        let now = Utc::now();
        let (entity, document) = apply_changes::<E>(current, id, changes, now)?;

        let update_sql = format!(
            "UPDATE {} SET data = $2, updated_at = $3 WHERE id = $1",
            E::TABLE
        );
        sqlx::query(&update_sql)
            .bind(id)
            .bind(Json(document))
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(Self::db_error)?;

        tx.commit().await.map_err(Self::db_error)?;
        Ok((previous, entity))
    }

    async fn delete(&self, id: &str) -> Result<E, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1 RETURNING data", E::TABLE);
        let Json(removed) = sqlx::query_scalar::<_, Json<Value>>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::db_error)?
            .ok_or_else(|| StoreError::not_found(E::POLICY.entity, id))?;

        from_document(removed)
    }
}

/// Factory handing out repositories over one shared pool
#[derive(Debug, Clone)]
pub struct PgRepositories {
    pool: DbPool,
}

impl PgRepositories {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl RepositoryFactory for PgRepositories {
    type Repo<E: Entity> = PgRepository<E>;

    fn repository<E: Entity>(&self) -> Self::Repo<E> {
        PgRepository::new(self.pool.clone())
    }
}

/// Statements creating the document table for `table`, safe to re-run
pub fn table_ddl(table: &str) -> [String; 2] {
    [
        format!(
            "CREATE TABLE IF NOT EXISTS {table} (\n    \
                 id TEXT PRIMARY KEY,\n    \
                 data JSONB NOT NULL,\n    \
                 created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),\n    \
                 updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()\n\
             )"
        ),
        format!("CREATE INDEX IF NOT EXISTS idx_{table}_data ON {table} USING GIN (data)"),
    ]
}
