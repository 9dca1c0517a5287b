//! Chat model configuration and the global settings that point at it
//!
//! Both are read on almost every tour request and referenced from each
//! other, so a write to either clears every `llm:` and `settings:` key.

use cache_system::{EntityPolicy, TtlTier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use store_object::{Entity, QueryBuilder, QueryFilter, SortKind, SortOrder};

use super::fields::CREATED_AT;
use super::LocalizedText;

/// Key of the cached active model
pub const ACTIVE_MODEL_KEY: &str = "llm:active-model";

/// Id of the single settings record
pub const SETTINGS_ID: &str = "1";

/// Key of the cached settings record
pub const SETTINGS_KEY: &str = "settings:general";

const LLM_CASCADES: &[&str] = &["llm:*", "settings:*"];
const SETTINGS_CASCADES: &[&str] = &["settings:*", "llm:*"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LlmModel {
    pub id: String,
    pub name: String,
    pub provider: String,
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub is_active: bool,
    pub is_backup: bool,
    pub health_status: Option<String>,
    /// Provider-specific request parameters
    pub config: Value,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmModelFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_backup: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
}

impl Entity for LlmModel {
    const TABLE: &'static str = "llm_models";
    const POLICY: EntityPolicy =
        EntityPolicy::new("llm-model", "llm:model:", "llm:models:", TtlTier::Static).with_cascades(LLM_CASCADES);
    type Filter = LlmModelFilter;

    fn id(&self) -> &str {
        &self.id
    }

    fn query(filter: &LlmModelFilter) -> QueryBuilder {
        let mut query = QueryBuilder::new()
            .eq_opt("isActive", filter.is_active)
            .eq_opt("isBackup", filter.is_backup)
            .eq_opt("healthStatus", filter.health_status.clone());
        if let Some(provider) = &filter.provider {
            query = query.filter(QueryFilter::contains_insensitive("provider", provider));
        }
        if let Some(name) = &filter.name {
            query = query.filter(QueryFilter::contains_insensitive("name", name));
        }
        query
            .order_by("isActive", SortKind::Bool, SortOrder::Desc)
            .order_by(CREATED_AT, SortKind::Timestamp, SortOrder::Desc)
            .paginate(filter.limit, filter.offset)
    }
}

/// Application-wide switches, stored as a single record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneralSettings {
    pub id: String,
    #[serde(rename = "activeLLMModelId")]
    pub active_llm_model_id: Option<String>,
    /// Resolved on read, never persisted
    #[serde(rename = "activeLLMModel", skip_serializing_if = "Option::is_none")]
    pub active_llm_model: Option<LlmModel>,
    pub important_notice: LocalizedText,
    pub help_bot_enabled: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for GeneralSettings {
    const TABLE: &'static str = "general_settings";
    const POLICY: EntityPolicy =
        EntityPolicy::new("settings", "settings:", "settings:", TtlTier::Static).with_cascades(SETTINGS_CASCADES);
    type Filter = ();

    fn id(&self) -> &str {
        &self.id
    }

    fn query(_filter: &()) -> QueryBuilder {
        QueryBuilder::new()
    }

    fn cache_keys(&self) -> Vec<String> {
        vec![SETTINGS_KEY.to_string()]
    }
}
