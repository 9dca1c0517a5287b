//! Read-through cache behaviour seen from the entity stores

use async_trait::async_trait;
use cache_system::{
    canonical_value, CacheBackend, CacheConfig, CacheError, CacheManager, CacheOutcome, Invalidation,
};
use curio::entities::{CulturalExhibit, Ticket, TicketFilter, Tour, TourFilter};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use store_object::{CachedStore, Entity, InMemoryRepository, QueryBuilder, Repository, StoreError};

/// Repository wrapper counting reads that reach storage
#[derive(Clone)]
struct Counting<E: Entity> {
    inner: InMemoryRepository<E>,
    reads: Arc<AtomicUsize>,
}

impl<E: Entity> Counting<E> {
    fn new() -> Self {
        Self {
            inner: InMemoryRepository::new(),
            reads: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for Counting<E> {
    async fn find_by_id(&self, id: &str) -> Result<Option<E>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_id(id).await
    }
    async fn find(&self, query: QueryBuilder) -> Result<Vec<E>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.find(query).await
    }
    async fn count(&self, query: QueryBuilder) -> Result<i64, StoreError> {
        self.inner.count(query).await
    }
    async fn create(&self, entity: E) -> Result<E, StoreError> {
        self.inner.create(entity).await
    }
    async fn update_with_previous(&self, id: &str, changes: Value) -> Result<(E, E), StoreError> {
        self.inner.update_with_previous(id, changes).await
    }
    async fn delete(&self, id: &str) -> Result<E, StoreError> {
        self.inner.delete(id).await
    }
}

/// Backend whose every call fails
struct BrokenBackend;

#[async_trait]
impl CacheBackend for BrokenBackend {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err(CacheError::Connection("connection refused".into()))
    }
    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::Connection("connection refused".into()))
    }
    async fn delete(&self, _key: &str) -> Result<bool, CacheError> {
        Err(CacheError::Connection("connection refused".into()))
    }
    async fn delete_matching(&self, _pattern: &str) -> Result<u64, CacheError> {
        Err(CacheError::Connection("connection refused".into()))
    }
    async fn ping(&self) -> Result<(), CacheError> {
        Err(CacheError::Connection("connection refused".into()))
    }
    fn name(&self) -> &'static str {
        "broken"
    }
}

fn broken_cache() -> CacheManager {
    CacheManager::with_backend(Arc::new(BrokenBackend), &CacheConfig::default())
}

fn ticket(id: &str, city: &str, priority: i32) -> Ticket {
    Ticket {
        id: id.to_string(),
        city: city.to_string(),
        priority,
        price: 12.5,
        ..Default::default()
    }
}

fn rome() -> TicketFilter {
    TicketFilter {
        city: Some("Rome".to_string()),
        ..Default::default()
    }
}

// ========================================
// Key Determinism
// ========================================

#[test]
fn test_equal_filters_share_a_key() {
    let a = TicketFilter {
        city: Some("Rome".into()),
        on_offer: Some(true),
        ..Default::default()
    };
    let b = TicketFilter {
        on_offer: Some(true),
        city: Some("Rome".into()),
        limit: None,
        ..Default::default()
    };
    assert_eq!(Ticket::POLICY.list_key(&a), Ticket::POLICY.list_key(&b));
    assert_eq!(
        Ticket::POLICY.list_key(&a),
        r#"tickets:{"city":"Rome","onOffer":true}"#
    );

    let first: Value = serde_json::from_str(r#"{"limit":10,"city":"Rome","type":"MUSEUM"}"#).unwrap();
    let second: Value = serde_json::from_str(r#"{"type":"MUSEUM","city":"Rome","limit":10}"#).unwrap();
    assert_eq!(canonical_value(&first), canonical_value(&second));
}

#[test]
fn test_distinct_filters_get_distinct_keys() {
    let museum = TicketFilter {
        limit: Some(10),
        ..rome()
    };
    assert_ne!(Ticket::POLICY.list_key(&rome()), Ticket::POLICY.list_key(&museum));
    assert_ne!(
        Ticket::POLICY.list_key(&TicketFilter::default()),
        Tour::POLICY.list_key(&TourFilter::default())
    );
}

#[tokio::test]
async fn test_absent_limit_is_a_cache_hit() {
    let repo = Counting::<Ticket>::new();
    let (cache, _) = CacheManager::in_memory();
    let store = CachedStore::new(repo.clone(), cache);
    store.create(ticket("t1", "Rome", 1)).await.unwrap();

    store.list(&rome()).await.unwrap();
    let with_absent_limit = TicketFilter { limit: None, ..rome() };
    store.list(&with_absent_limit).await.unwrap();

    assert_eq!(repo.reads(), 1);
}

// ========================================
// Fail-open
// ========================================

#[tokio::test]
async fn test_failing_cache_always_runs_producer() {
    let cache = broken_cache();
    let calls = AtomicUsize::new(0);

    for _ in 0..3 {
        let value: Result<u32, StoreError> = cache
            .with_cache("tickets:{}", Duration::from_secs(600), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(7)
            })
            .await;
        assert_eq!(value.unwrap(), 7);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_failing_cache_keeps_store_working() {
    let repo = Counting::<Ticket>::new();
    let store = CachedStore::new(repo.clone(), broken_cache());

    store.create(ticket("t1", "Rome", 1)).await.unwrap();
    assert_eq!(store.get("t1").await.unwrap().unwrap().city, "Rome");
    assert_eq!(store.list(&rome()).await.unwrap().len(), 1);

    let updated = store.update("t1", json!({"city": "Milan"})).await.unwrap();
    assert_eq!(updated.city, "Milan");
    assert_eq!(store.get("t1").await.unwrap().unwrap().city, "Milan");
    assert_eq!(store.invalidate_record(&updated).await, CacheOutcome::Ignored);

    store.delete("t1").await.unwrap();
    assert!(store.get("t1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_producer_errors_pass_through() {
    let (cache, backend) = CacheManager::in_memory();
    let store = CachedStore::new(Counting::<Ticket>::new(), cache);

    let err = store.require("missing").await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound { entity: "ticket", .. }));
    assert!(backend.keys().await.is_empty());
}

// ========================================
// Hits and Expiry
// ========================================

#[tokio::test(start_paused = true)]
async fn test_hit_until_ttl_then_refetch() {
    let repo = Counting::<Ticket>::new();
    let (cache, backend) = CacheManager::in_memory();
    let store = CachedStore::new(repo.clone(), cache);
    store.create(ticket("t1", "Rome", 1)).await.unwrap();

    store.get("t1").await.unwrap();
    store.get("t1").await.unwrap();
    assert_eq!(repo.reads(), 1);
    assert_eq!(backend.ttl("ticket:t1").await, Some(Duration::from_secs(600)));

    tokio::time::advance(Duration::from_secs(599)).await;
    store.get("t1").await.unwrap();
    assert_eq!(repo.reads(), 1);

    tokio::time::advance(Duration::from_secs(2)).await;
    store.get("t1").await.unwrap();
    assert_eq!(repo.reads(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_list_ttl_follows_entity_tier() {
    let (cache, backend) = CacheManager::in_memory();
    let tours = CachedStore::new(InMemoryRepository::<Tour>::new(), cache.clone());
    let tickets = CachedStore::new(InMemoryRepository::<Ticket>::new(), cache);

    tours.list(&TourFilter::default()).await.unwrap();
    tickets.list(&TicketFilter::default()).await.unwrap();

    assert_eq!(backend.ttl("tours:{}").await, Some(Duration::from_secs(300)));
    assert_eq!(backend.ttl("tickets:{}").await, Some(Duration::from_secs(600)));
}

// ========================================
// Invalidation
// ========================================

#[tokio::test(start_paused = true)]
async fn test_update_is_visible_on_next_read() {
    let (cache, backend) = CacheManager::in_memory();
    let store = CachedStore::new(InMemoryRepository::<CulturalExhibit>::new(), cache);

    let mut exhibit = CulturalExhibit {
        id: "123".to_string(),
        city: "Rome".to_string(),
        ..Default::default()
    };
    exhibit.name.insert("en".to_string(), "A".to_string());
    store.create(exhibit).await.unwrap();

    assert_eq!(store.get("123").await.unwrap().unwrap().name["en"], "A");
    assert!(backend.keys().await.contains(&"cultural-exhibit:123".to_string()));
    assert_eq!(backend.ttl("cultural-exhibit:123").await, Some(Duration::from_secs(3600)));

    store.update("123", json!({"name": {"en": "B"}})).await.unwrap();
    assert_eq!(store.get("123").await.unwrap().unwrap().name["en"], "B");
}

#[tokio::test]
async fn test_every_write_kind_clears_record_and_lists() {
    let repo = Counting::<Ticket>::new();
    let (cache, _) = CacheManager::in_memory();
    let store = CachedStore::new(repo.clone(), cache);

    store.create(ticket("a", "Rome", 2)).await.unwrap();
    assert_eq!(store.list(&rome()).await.unwrap().len(), 1);

    store.create(ticket("b", "Rome", 1)).await.unwrap();
    let ids: Vec<String> = store.list(&rome()).await.unwrap().into_iter().map(|t| t.id).collect();
    assert_eq!(ids, vec!["b", "a"]);

    store.get("a").await.unwrap();
    store.update("a", json!({"priority": 0})).await.unwrap();
    let ids: Vec<String> = store.list(&rome()).await.unwrap().into_iter().map(|t| t.id).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(store.get("a").await.unwrap().unwrap().priority, 0);

    store.delete("a").await.unwrap();
    assert!(store.get("a").await.unwrap().is_none());
    assert_eq!(store.list(&rome()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_ticket_pattern_leaves_tours_alone() {
    let (cache, backend) = CacheManager::in_memory();
    let ttl = Duration::from_secs(60);
    cache.set("tickets:{}", &json!([]), ttl).await;
    cache.set(r#"tickets:{"city":"Rome"}"#, &json!([]), ttl).await;
    cache.set("tours:{}", &json!([]), ttl).await;
    cache.set("tour:1", &json!({}), ttl).await;
    cache.set("ticket:1", &json!({}), ttl).await;

    cache
        .invalidate(&Invalidation::new().pattern("tickets:*"))
        .await;

    assert_eq!(
        backend.keys().await,
        vec!["ticket:1".to_string(), "tour:1".to_string(), "tours:{}".to_string()]
    );
}

#[tokio::test]
async fn test_write_to_one_entity_keeps_other_entities_cached() {
    let (cache, backend) = CacheManager::in_memory();
    let tickets = CachedStore::new(InMemoryRepository::<Ticket>::new(), cache.clone());
    let tours = CachedStore::new(InMemoryRepository::<Tour>::new(), cache);

    tours.list(&TourFilter::default()).await.unwrap();
    tickets.create(ticket("t1", "Rome", 1)).await.unwrap();

    assert_eq!(backend.keys().await, vec!["tours:{}".to_string()]);
}
