use crate::errors::StoreError;
use crate::query_builder::QueryBuilder;
use crate::traits::Entity;
use async_trait::async_trait;
use serde_json::Value;

/// Storage operations for one entity type
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<E>, StoreError>;

    /// Records matching the query, in query order
    async fn find(&self, query: QueryBuilder) -> Result<Vec<E>, StoreError>;

    /// First record matching the query
    async fn find_one(&self, query: QueryBuilder) -> Result<Option<E>, StoreError> {
        Ok(self.find(query.limit(1)).await?.into_iter().next())
    }

    /// Number of records matching the query's conditions
    async fn count(&self, query: QueryBuilder) -> Result<i64, StoreError>;

    /// Insert a new record; an empty id is replaced by a generated one
    async fn create(&self, entity: E) -> Result<E, StoreError>;

    /// Shallow-merge `changes` (a JSON object) into the stored record,
    /// returning the record as it was before the write and after it
    async fn update_with_previous(&self, id: &str, changes: Value) -> Result<(E, E), StoreError>;

    /// Shallow-merge `changes` into the stored record
    async fn update(&self, id: &str, changes: Value) -> Result<E, StoreError> {
        let (_, updated) = self.update_with_previous(id, changes).await?;
        Ok(updated)
    }

    /// Remove a record and return it
    async fn delete(&self, id: &str) -> Result<E, StoreError>;
}

/// Hands out repositories for any entity type
pub trait RepositoryFactory: Send + Sync {
    type Repo<E: Entity>: Repository<E> + Clone + 'static;

    fn repository<E: Entity>(&self) -> Self::Repo<E>;
}
