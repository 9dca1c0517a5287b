//! Active chat model lookup and the settings singleton

use async_trait::async_trait;
use cache_system::TtlTier;
use serde_json::Value;
use store_object::{CachedStore, QueryBuilder, QueryFilter, Repository, SortKind, SortOrder, StoreError};

use crate::entities::{GeneralSettings, LlmModel, ACTIVE_MODEL_KEY, SETTINGS_ID, SETTINGS_KEY};

const EMBEDDED_MODEL_FIELD: &str = "activeLLMModel";

#[async_trait]
pub trait LlmQueries {
    /// Newest active model, cached at `llm:active-model`
    async fn active_model(&self) -> Result<Option<LlmModel>, StoreError>;
}

#[async_trait]
impl<R: Repository<LlmModel>> LlmQueries for CachedStore<LlmModel, R> {
    async fn active_model(&self) -> Result<Option<LlmModel>, StoreError> {
        let query = QueryBuilder::new()
            .filter(QueryFilter::eq("isActive", true))
            .order_by("createdAt", SortKind::Timestamp, SortOrder::Desc);
        self.find_one_cached(ACTIVE_MODEL_KEY, TtlTier::Static, query)
            .await
    }
}

/// Reads and writes of the single settings record
///
/// The cached value carries the referenced model, so model writes clear it
/// through their `settings:*` cascade.
pub struct SettingsService<S, M>
where
    S: Repository<GeneralSettings>,
    M: Repository<LlmModel>,
{
    settings: CachedStore<GeneralSettings, S>,
    models: CachedStore<LlmModel, M>,
}

impl<S, M> SettingsService<S, M>
where
    S: Repository<GeneralSettings>,
    M: Repository<LlmModel>,
{
    pub fn new(settings: CachedStore<GeneralSettings, S>, models: CachedStore<LlmModel, M>) -> Self {
        Self { settings, models }
    }

    pub async fn get(&self) -> Result<Option<GeneralSettings>, StoreError> {
        self.settings
            .cache()
            .with_cache_optional(SETTINGS_KEY, TtlTier::Static.as_duration(), || async {
                match self.settings.repository().find_by_id(SETTINGS_ID).await? {
                    Some(settings) => self.with_active_model(settings).await.map(Some),
                    None => Ok(None),
                }
            })
            .await
    }

    /// Apply `changes` to the settings record; the embedded model is ignored
    pub async fn update(&self, mut changes: Value) -> Result<GeneralSettings, StoreError> {
        if let Some(object) = changes.as_object_mut() {
            object.remove(EMBEDDED_MODEL_FIELD);
        }
        let updated = self.settings.update(SETTINGS_ID, changes).await?;
        self.with_active_model(updated).await
    }

    /// Create the settings record; fails with `Conflict` once it exists
    pub async fn init(&self, mut settings: GeneralSettings) -> Result<GeneralSettings, StoreError> {
        settings.id = SETTINGS_ID.to_string();
        settings.active_llm_model = None;
        let created = self.settings.create(settings).await?;
        self.with_active_model(created).await
    }

    async fn with_active_model(&self, mut settings: GeneralSettings) -> Result<GeneralSettings, StoreError> {
        settings.active_llm_model = match &settings.active_llm_model_id {
            Some(id) => self.models.repository().find_by_id(id).await?,
            None => None,
        };
        Ok(settings)
    }
}
