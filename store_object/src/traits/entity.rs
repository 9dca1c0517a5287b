use crate::query_builder::QueryBuilder;
use cache_system::{EntityPolicy, Invalidation};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// A stored document type together with its cache policy
///
/// Documents are serialized with their `id`, `createdAt` and `updatedAt`
/// members at the top level.
pub trait Entity: Clone + Debug + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Table holding the documents
    const TABLE: &'static str;

    /// Key shapes, TTLs and invalidation rules
    const POLICY: EntityPolicy;

    /// Typed list filter; its canonical JSON is the list cache key
    type Filter: Serialize + Debug + Default + Send + Sync;

    fn id(&self) -> &str;

    /// Query selecting the records a filter describes
    fn query(filter: &Self::Filter) -> QueryBuilder;

    /// Every single-record key this record can be cached under
    fn cache_keys(&self) -> Vec<String> {
        vec![Self::POLICY.record_key(self.id())]
    }

    /// What a successful write to this record must clear
    fn invalidation(&self) -> Invalidation {
        Self::POLICY.invalidation(self.cache_keys())
    }
}
