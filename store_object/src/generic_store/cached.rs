//! Cache-aside store
//!
//! `CachedStore` is what entity-level code talks to. Reads go through the
//! cache under the entity's policy; writes hit the repository first and
//! invalidate only once the repository reports success.

use crate::errors::StoreError;
use crate::query_builder::QueryBuilder;
use crate::traits::{Entity, Repository};
use cache_system::{CacheManager, CacheOutcome, Invalidation, TtlTier};
use serde_json::Value;
use std::fmt::Debug;
use std::marker::PhantomData;

pub struct CachedStore<E: Entity, R: Repository<E>> {
    repository: R,
    cache: CacheManager,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity, R: Repository<E> + Clone> Clone for CachedStore<E, R> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
            cache: self.cache.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity, R: Repository<E>> Debug for CachedStore<E, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedStore")
            .field("entity", &E::POLICY.entity)
            .field("cache", &self.cache)
            .finish()
    }
}

impl<E: Entity, R: Repository<E>> CachedStore<E, R> {
    pub fn new(repository: R, cache: CacheManager) -> Self {
        Self {
            repository,
            cache,
            _entity: PhantomData,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn cache(&self) -> &CacheManager {
        &self.cache
    }

    /// Single record by id, cached under `{entity}:{id}`
    pub async fn get(&self, id: &str) -> Result<Option<E>, StoreError> {
        let key = E::POLICY.record_key(id);
        self.cache
            .with_cache_optional(&key, E::POLICY.record_ttl.as_duration(), || {
                self.repository.find_by_id(id)
            })
            .await
    }

    /// Like [`get`](Self::get), with a missing record reported as `NotFound`
    pub async fn require(&self, id: &str) -> Result<E, StoreError> {
        self.get(id)
            .await?
            .ok_or_else(|| StoreError::not_found(E::POLICY.entity, id))
    }

    /// Filtered list, cached under the canonical form of `filter`
    pub async fn list(&self, filter: &E::Filter) -> Result<Vec<E>, StoreError> {
        let key = E::POLICY.list_key(filter);
        self.cache
            .with_cache(&key, E::POLICY.list_ttl.as_duration(), || {
                self.repository.find(E::query(filter))
            })
            .await
    }

    /// A specialised list view with its own query, kept under the list pattern
    pub async fn list_scoped(
        &self,
        scope: &str,
        filter: &E::Filter,
        query: QueryBuilder,
    ) -> Result<Vec<E>, StoreError> {
        let key = E::POLICY.scoped_list_key(scope, filter);
        self.cache
            .with_cache(&key, E::POLICY.list_ttl.as_duration(), || {
                self.repository.find(query)
            })
            .await
    }

    /// First match of `query`, cached at an explicit key
    ///
    /// Callers own the key; it must fall under a pattern the entity's
    /// invalidation clears.
    pub async fn find_one_cached(
        &self,
        key: &str,
        ttl: TtlTier,
        query: QueryBuilder,
    ) -> Result<Option<E>, StoreError> {
        self.cache
            .with_cache_optional(key, ttl.as_duration(), || self.repository.find_one(query))
            .await
    }

    /// Uncached count of records matching `filter`, ignoring its paging
    pub async fn count(&self, filter: &E::Filter) -> Result<i64, StoreError> {
        self.repository.count(E::query(filter).without_paging()).await
    }

    pub async fn create(&self, entity: E) -> Result<E, StoreError> {
        let created = self.repository.create(entity).await?;
        self.invalidate_record(&created).await;
        Ok(created)
    }

    /// Apply `changes`, then clear the keys of the record before and after
    /// the write; a changed secondary key must not keep serving the old value
    pub async fn update(&self, id: &str, changes: Value) -> Result<E, StoreError> {
        let (previous, updated) = self.repository.update_with_previous(id, changes).await?;
        let invalidation = previous.invalidation().merge(updated.invalidation());
        self.apply_invalidation(&updated, &invalidation).await;
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<E, StoreError> {
        let deleted = self.repository.delete(id).await?;
        self.invalidate_record(&deleted).await;
        Ok(deleted)
    }

    /// Clear every key a write to `record` can have made stale
    pub async fn invalidate_record(&self, record: &E) -> CacheOutcome {
        self.apply_invalidation(record, &record.invalidation()).await
    }

    async fn apply_invalidation(&self, record: &E, invalidation: &Invalidation) -> CacheOutcome {
        let outcome = self.cache.invalidate(invalidation).await;
        if outcome == CacheOutcome::Ignored && self.cache.is_enabled() {
            tracing::warn!(
                entity = E::POLICY.entity,
                id = record.id(),
                "cache invalidation incomplete, entries stay stale until their TTL"
            );
        }
        outcome
    }
}
