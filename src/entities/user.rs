use cache_system::{EntityPolicy, TtlTier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use store_object::{Entity, QueryBuilder, SortKind, SortOrder};

use super::fields::CREATED_AT;

/// Prefix of the secondary key used on the authentication path
pub const FIREBASE_KEY_PREFIX: &str = "user:firebase:";

/// Page size when a user listing names no limit
pub const DEFAULT_USER_LIMIT: i64 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    User,
    Superadmin,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::User, Role::Superadmin];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Superadmin => "SUPERADMIN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Others,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
            Gender::Others => "OTHERS",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
    Ca,
    Pt,
    Fr,
    De,
    It,
}

impl Language {
    pub const ALL: [Language; 7] = [
        Language::En,
        Language::Es,
        Language::Ca,
        Language::Pt,
        Language::Fr,
        Language::De,
        Language::It,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Ca => "ca",
            Language::Pt => "pt",
            Language::Fr => "fr",
            Language::De => "de",
            Language::It => "it",
        }
    }
}

/// Local account linked to an identity-provider user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub id: String,
    pub firebase_uid: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub gender: Option<Gender>,
    pub year_of_birth: Option<i32>,
    pub language: Language,
    pub role: Role,
    pub ambient_music: bool,
    pub communication_enabled: bool,
    pub is_privacy_policy_enabled: bool,
    pub device_model: Option<String>,
    pub device_type: Option<String>,
    pub ip_address: Option<String>,
    pub notification_count: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_privacy_policy_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ambient_music: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub communication_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
}

impl User {
    pub fn firebase_key(firebase_uid: &str) -> String {
        format!("{FIREBASE_KEY_PREFIX}{firebase_uid}")
    }
}

impl Entity for User {
    const TABLE: &'static str = "users";
    const POLICY: EntityPolicy =
        EntityPolicy::new("user", "user:id:", "users:list:", TtlTier::Standard).with_list_ttl(TtlTier::Moderate);
    type Filter = UserFilter;

    fn id(&self) -> &str {
        &self.id
    }

    fn query(filter: &UserFilter) -> QueryBuilder {
        QueryBuilder::new()
            .eq_opt("role", filter.role.map(Role::as_str))
            .eq_opt("language", filter.language.map(Language::as_str))
            .eq_opt("gender", filter.gender.map(Gender::as_str))
            .eq_opt("isPrivacyPolicyEnabled", filter.is_privacy_policy_enabled)
            .eq_opt("ambientMusic", filter.ambient_music)
            .eq_opt("communicationEnabled", filter.communication_enabled)
            .order_by(CREATED_AT, SortKind::Timestamp, SortOrder::Desc)
            .paginate(Some(filter.limit.unwrap_or(DEFAULT_USER_LIMIT)), filter.offset)
    }

    /// The id key plus the firebase key, both derived from this record
    fn cache_keys(&self) -> Vec<String> {
        let mut keys = vec![Self::POLICY.record_key(&self.id)];
        if !self.firebase_uid.is_empty() {
            keys.push(Self::firebase_key(&self.firebase_uid));
        }
        keys
    }
}
