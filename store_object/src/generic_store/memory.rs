//! In-memory repository
//!
//! Documents live in a shared `BTreeMap` behind a tokio `RwLock`; queries are
//! evaluated with the same `QueryBuilder` semantics as the SQL backend.

use crate::errors::StoreError;
use crate::generic_store::document::{apply_changes, from_document, prepare_new};
use crate::query_builder::QueryBuilder;
use crate::traits::{Entity, Repository, RepositoryFactory};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;

type Table = Arc<RwLock<BTreeMap<String, Value>>>;

pub struct InMemoryRepository<E: Entity> {
    table: Table,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Clone for InMemoryRepository<E> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Debug for InMemoryRepository<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryRepository")
            .field("table", &E::TABLE)
            .finish()
    }
}

impl<E: Entity> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> InMemoryRepository<E> {
    pub fn new() -> Self {
        Self::with_table(Table::default())
    }

    fn with_table(table: Table) -> Self {
        Self {
            table,
            _entity: PhantomData,
        }
    }

    /// Number of stored documents
    pub async fn len(&self) -> usize {
        self.table.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.table.read().await.is_empty()
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for InMemoryRepository<E> {
    async fn find_by_id(&self, id: &str) -> Result<Option<E>, StoreError> {
        let document = self.table.read().await.get(id).cloned();
        document.map(from_document::<E>).transpose()
    }

    async fn find(&self, query: QueryBuilder) -> Result<Vec<E>, StoreError> {
        let documents: Vec<Value> = self.table.read().await.values().cloned().collect();
        query.apply(documents).into_iter().map(from_document::<E>).collect()
    }

    async fn count(&self, query: QueryBuilder) -> Result<i64, StoreError> {
        let table = self.table.read().await;
        Ok(table.values().filter(|doc| query.matches(doc)).count() as i64)
    }

    async fn create(&self, entity: E) -> Result<E, StoreError> {
        let (id, document) = prepare_new(&entity, Utc::now())?;

        let mut table = self.table.write().await;
        if table.contains_key(&id) {
            return Err(StoreError::Conflict {
                entity: E::POLICY.entity,
                message: format!("id '{}' already exists", id),
            });
        }
        table.insert(id, document.clone());
        from_document(document)
    }

    async fn update_with_previous(&self, id: &str, changes: Value) -> Result<(E, E), StoreError> {
        let mut table = self.table.write().await;
        let current = table
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(E::POLICY.entity, id))?;

        let previous = from_document::<E>(current.clone())?;
        let (entity, document) = apply_changes::<E>(current, id, changes, Utc::now())?;
        table.insert(id.to_string(), document);
        Ok((previous, entity))
    }

    async fn delete(&self, id: &str) -> Result<E, StoreError> {
        let removed = self
            .table
            .write()
            .await
            .remove(id)
            .ok_or_else(|| StoreError::not_found(E::POLICY.entity, id))?;
        from_document(removed)
    }
}

/// Factory whose repositories share one table per entity type
#[derive(Clone, Default)]
pub struct InMemoryRepositories {
    tables: Arc<Mutex<HashMap<&'static str, Table>>>,
}

impl InMemoryRepositories {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self, name: &'static str) -> Table {
        // poisoning cannot leave the registry half-written
        let mut tables = match self.tables.lock() {
            Ok(tables) => tables,
            Err(poisoned) => poisoned.into_inner(),
        };
        tables.entry(name).or_default().clone()
    }
}

impl Debug for InMemoryRepositories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryRepositories").finish_non_exhaustive()
    }
}

impl RepositoryFactory for InMemoryRepositories {
    type Repo<E: Entity> = InMemoryRepository<E>;

    fn repository<E: Entity>(&self) -> Self::Repo<E> {
        InMemoryRepository::with_table(self.table(E::TABLE))
    }
}
