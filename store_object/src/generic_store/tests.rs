//! Repository and cached store tests

#[cfg(test)]
mod tests {
    use crate::generic_store::document::{apply_changes, prepare_new};
    use crate::generic_store::{CachedStore, InMemoryRepositories, InMemoryRepository};
    use crate::query_builder::{QueryBuilder, SortKind, SortOrder};
    use crate::traits::{Entity, Repository, RepositoryFactory};
    use crate::StoreError;
    use async_trait::async_trait;
    use cache_system::{CacheManager, EntityPolicy, TtlTier};
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Exhibit {
        #[serde(default)]
        id: String,
        name: String,
        city: String,
        priority: i32,
        #[serde(default)]
        created_at: Option<DateTime<Utc>>,
        #[serde(default)]
        updated_at: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Default, Serialize)]
    struct ExhibitFilter {
        #[serde(skip_serializing_if = "Option::is_none")]
        city: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        limit: Option<i64>,
    }

    impl Entity for Exhibit {
        const TABLE: &'static str = "exhibits";
        const POLICY: EntityPolicy =
            EntityPolicy::new("exhibit", "exhibit:", "exhibit:list:", TtlTier::Long);
        type Filter = ExhibitFilter;

        fn id(&self) -> &str {
            &self.id
        }

        fn query(filter: &ExhibitFilter) -> QueryBuilder {
            QueryBuilder::new()
                .eq_opt("city", filter.city.clone())
                .order_by("priority", SortKind::Number, SortOrder::Asc)
                .paginate(filter.limit, None)
        }
    }

    fn exhibit(id: &str, name: &str, city: &str, priority: i32) -> Exhibit {
        Exhibit {
            id: id.to_string(),
            name: name.to_string(),
            city: city.to_string(),
            priority,
            created_at: None,
            updated_at: None,
        }
    }

    /// Wraps a repository and counts reads that reach it
    #[derive(Clone)]
    struct CountingRepository {
        inner: InMemoryRepository<Exhibit>,
        reads: Arc<AtomicUsize>,
        fail_writes: bool,
    }

    impl CountingRepository {
        fn new() -> Self {
            Self {
                inner: InMemoryRepository::new(),
                reads: Arc::new(AtomicUsize::new(0)),
                fail_writes: false,
            }
        }

        fn reads(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Repository<Exhibit> for CountingRepository {
        async fn find_by_id(&self, id: &str) -> Result<Option<Exhibit>, StoreError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.find_by_id(id).await
        }
        async fn find(&self, query: QueryBuilder) -> Result<Vec<Exhibit>, StoreError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.find(query).await
        }
        async fn count(&self, query: QueryBuilder) -> Result<i64, StoreError> {
            self.inner.count(query).await
        }
        async fn create(&self, entity: Exhibit) -> Result<Exhibit, StoreError> {
            self.inner.create(entity).await
        }
        async fn update_with_previous(
            &self,
            id: &str,
            changes: Value,
        ) -> Result<(Exhibit, Exhibit), StoreError> {
            if self.fail_writes {
                return Err(StoreError::validation("write rejected"));
            }
            self.inner.update_with_previous(id, changes).await
        }
        async fn delete(&self, id: &str) -> Result<Exhibit, StoreError> {
            self.inner.delete(id).await
        }
    }

    // ========================================
    // Document Preparation
    // ========================================

    #[test]
    fn test_prepare_new_assigns_id_and_timestamps() {
        let now = Utc::now();
        let (id, document) = prepare_new(&exhibit("", "Louvre", "Paris", 1), now).unwrap();

        assert!(!id.is_empty());
        assert_eq!(document["id"], json!(id));
        assert_eq!(document["createdAt"], document["updatedAt"]);
        assert_eq!(document["createdAt"], serde_json::to_value(now).unwrap());
    }

    #[test]
    fn test_apply_changes_merges_and_protects_id() {
        let (id, document) = prepare_new(&exhibit("e1", "Prado", "Madrid", 1), Utc::now()).unwrap();

        let (updated, _) =
            apply_changes::<Exhibit>(document.clone(), &id, json!({"name": "Museo del Prado"}), Utc::now())
                .unwrap();
        assert_eq!(updated.name, "Museo del Prado");
        assert_eq!(updated.city, "Madrid");

        let err = apply_changes::<Exhibit>(document.clone(), &id, json!({"id": "other"}), Utc::now())
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        let err = apply_changes::<Exhibit>(document.clone(), &id, json!({"priority": "high"}), Utc::now())
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        let err = apply_changes::<Exhibit>(document, &id, json!(["not", "an", "object"]), Utc::now())
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    // ========================================
    // In-memory Repository
    // ========================================

    #[tokio::test]
    async fn test_memory_repository_crud() {
        let repo = InMemoryRepository::<Exhibit>::new();

        let created = repo.create(exhibit("e1", "Uffizi", "Florence", 2)).await.unwrap();
        assert!(created.created_at.is_some());
        assert!(matches!(
            repo.create(exhibit("e1", "Dup", "Florence", 2)).await,
            Err(StoreError::Conflict { .. })
        ));

        let updated = repo.update("e1", json!({"priority": 5})).await.unwrap();
        assert_eq!(updated.priority, 5);
        assert_eq!(updated.created_at, created.created_at);

        let (previous, renamed) = repo
            .update_with_previous("e1", json!({"name": "Uffizi Gallery"}))
            .await
            .unwrap();
        assert_eq!(previous.name, "Uffizi");
        assert_eq!(previous.priority, 5);
        assert_eq!(renamed.name, "Uffizi Gallery");

        assert!(repo.update("missing", json!({"priority": 1})).await.unwrap_err().is_not_found());

        let deleted = repo.delete("e1").await.unwrap();
        assert_eq!(deleted.id, "e1");
        assert!(repo.delete("e1").await.unwrap_err().is_not_found());
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_memory_repository_queries() {
        let repo = InMemoryRepository::<Exhibit>::new();
        repo.create(exhibit("a", "Colosseum", "Rome", 2)).await.unwrap();
        repo.create(exhibit("b", "Vatican", "Rome", 1)).await.unwrap();
        repo.create(exhibit("c", "Sagrada", "Barcelona", 3)).await.unwrap();

        let filter = ExhibitFilter {
            city: Some("Rome".into()),
            limit: None,
        };
        let found = repo.find(Exhibit::query(&filter)).await.unwrap();
        let names: Vec<&str> = found.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Vatican", "Colosseum"]);

        assert_eq!(repo.count(Exhibit::query(&filter)).await.unwrap(), 2);
        let first = repo.find_one(Exhibit::query(&ExhibitFilter::default())).await.unwrap();
        assert_eq!(first.map(|e| e.id), Some("b".to_string()));
    }

    #[tokio::test]
    async fn test_factory_shares_tables() {
        let factory = InMemoryRepositories::new();
        let first: InMemoryRepository<Exhibit> = factory.repository();
        let second: InMemoryRepository<Exhibit> = factory.repository();

        first.create(exhibit("x", "Reina Sofia", "Madrid", 1)).await.unwrap();
        assert!(second.find_by_id("x").await.unwrap().is_some());
    }

    // ========================================
    // Cached Store
    // ========================================

    #[tokio::test]
    async fn test_get_is_served_from_cache_after_first_read() {
        let repo = CountingRepository::new();
        let (cache, _) = CacheManager::in_memory();
        let store = CachedStore::new(repo.clone(), cache);

        store.create(exhibit("123", "A", "Rome", 1)).await.unwrap();
        for _ in 0..3 {
            let found = store.get("123").await.unwrap().unwrap();
            assert_eq!(found.name, "A");
        }
        assert_eq!(repo.reads(), 1);
    }

    #[tokio::test]
    async fn test_update_invalidates_record_and_lists() {
        let repo = CountingRepository::new();
        let (cache, backend) = CacheManager::in_memory();
        let store = CachedStore::new(repo.clone(), cache);

        store.create(exhibit("123", "A", "Rome", 1)).await.unwrap();
        let filter = ExhibitFilter {
            city: Some("Rome".into()),
            limit: None,
        };
        assert_eq!(store.get("123").await.unwrap().unwrap().name, "A");
        assert_eq!(store.list(&filter).await.unwrap()[0].name, "A");
        assert_eq!(backend.keys().await.len(), 2);

        store.update("123", json!({"name": "B"})).await.unwrap();
        assert!(backend.keys().await.is_empty());

        assert_eq!(store.get("123").await.unwrap().unwrap().name, "B");
        assert_eq!(store.list(&filter).await.unwrap()[0].name, "B");
    }

    #[tokio::test]
    async fn test_failed_write_leaves_cache_alone() {
        let mut repo = CountingRepository::new();
        repo.fail_writes = true;
        let (cache, backend) = CacheManager::in_memory();
        let store = CachedStore::new(repo.clone(), cache);

        store.create(exhibit("1", "A", "Rome", 1)).await.unwrap();
        store.get("1").await.unwrap();
        let keys_before = backend.keys().await;

        assert!(store.update("1", json!({"name": "B"})).await.is_err());
        assert_eq!(backend.keys().await, keys_before);
    }

    #[tokio::test]
    async fn test_missing_record_is_not_cached() {
        let repo = CountingRepository::new();
        let (cache, backend) = CacheManager::in_memory();
        let store = CachedStore::new(repo.clone(), cache);

        assert!(store.get("404").await.unwrap().is_none());
        assert!(store.require("404").await.unwrap_err().is_not_found());
        assert!(backend.keys().await.is_empty());

        store.create(exhibit("404", "Late", "Rome", 1)).await.unwrap();
        assert!(store.get("404").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_count_ignores_paging_and_cache() {
        let repo = CountingRepository::new();
        let (cache, backend) = CacheManager::in_memory();
        let store = CachedStore::new(repo.clone(), cache);

        for i in 0..3 {
            store.create(exhibit(&format!("e{}", i), "X", "Rome", i)).await.unwrap();
        }
        let filter = ExhibitFilter {
            city: None,
            limit: Some(1),
        };
        assert_eq!(store.count(&filter).await.unwrap(), 3);
        assert_eq!(store.list(&filter).await.unwrap().len(), 1);
        assert_eq!(backend.keys().await, vec![r#"exhibit:list:{"limit":1}"#.to_string()]);
    }

    #[tokio::test]
    async fn test_scoped_list_is_cleared_with_entity_lists() {
        let repo = CountingRepository::new();
        let (cache, backend) = CacheManager::in_memory();
        let store = CachedStore::new(repo.clone(), cache);

        store.create(exhibit("a", "A", "Rome", 1)).await.unwrap();
        let filter = ExhibitFilter::default();
        let query = QueryBuilder::new().order_by("name", SortKind::Text, SortOrder::Desc);
        store.list_scoped("by-name", &filter, query).await.unwrap();
        assert_eq!(backend.keys().await, vec!["exhibit:list:by-name:{}".to_string()]);

        store.delete("a").await.unwrap();
        assert!(backend.keys().await.is_empty());
    }
}
