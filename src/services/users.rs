//! User lookups keyed by identity-provider uid, counters and statistics

use async_trait::async_trait;
use cache_system::TtlTier;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use store_object::{CachedStore, Entity, QueryBuilder, QueryFilter, Repository, StoreError};

use crate::entities::{Language, Role, User, UserFilter};
use crate::errors::AuthError;
use crate::identity::IdentityProvider;

const FIREBASE_UID_FIELD: &str = "firebaseUid";
const EMAIL_FIELD: &str = "email";

/// Aggregate counts over all users, always computed from the store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_users: i64,
    /// Users who accept communications
    pub active_users: i64,
    pub users_by_role: BTreeMap<String, i64>,
    pub users_by_language: BTreeMap<String, i64>,
}

#[async_trait]
pub trait UserQueries {
    /// Cached under `user:firebase:{uid}`; this runs on every authenticated request
    async fn by_firebase_uid(&self, firebase_uid: &str) -> Result<Option<User>, StoreError>;

    async fn update_by_firebase_uid(&self, firebase_uid: &str, changes: Value) -> Result<User, StoreError>;

    async fn delete_by_firebase_uid(&self, firebase_uid: &str) -> Result<User, StoreError>;

    /// Uncached; email is not part of any user key
    async fn by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn increment_notification_count(&self, firebase_uid: &str) -> Result<User, StoreError>;

    async fn reset_notification_count(&self, firebase_uid: &str) -> Result<User, StoreError>;

    /// Create or refresh the local user from the provider's profile
    async fn sync_from_identity(&self, provider: &dyn IdentityProvider, firebase_uid: &str)
    -> Result<User, AuthError>;

    async fn stats(&self) -> Result<UserStats, StoreError>;
}

/// Current record straight from the repository, bypassing the cache
async fn load_by_firebase_uid<R: Repository<User>>(
    store: &CachedStore<User, R>,
    firebase_uid: &str,
) -> Result<User, StoreError> {
    store
        .repository()
        .find_one(QueryBuilder::new().filter(QueryFilter::eq(FIREBASE_UID_FIELD, firebase_uid)))
        .await?
        .ok_or_else(|| StoreError::not_found(User::POLICY.entity, firebase_uid))
}

#[async_trait]
impl<R: Repository<User>> UserQueries for CachedStore<User, R> {
    async fn by_firebase_uid(&self, firebase_uid: &str) -> Result<Option<User>, StoreError> {
        let query = QueryBuilder::new().filter(QueryFilter::eq(FIREBASE_UID_FIELD, firebase_uid));
        self.find_one_cached(&User::firebase_key(firebase_uid), TtlTier::Long, query)
            .await
    }

    async fn update_by_firebase_uid(&self, firebase_uid: &str, changes: Value) -> Result<User, StoreError> {
        let current = load_by_firebase_uid(self, firebase_uid).await?;
        self.update(&current.id, changes).await
    }

    async fn by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.repository()
            .find_one(QueryBuilder::new().filter(QueryFilter::eq(EMAIL_FIELD, email)))
            .await
    }

    async fn delete_by_firebase_uid(&self, firebase_uid: &str) -> Result<User, StoreError> {
        let current = load_by_firebase_uid(self, firebase_uid).await?;
        self.delete(&current.id).await
    }

    async fn increment_notification_count(&self, firebase_uid: &str) -> Result<User, StoreError> {
        let current = load_by_firebase_uid(self, firebase_uid).await?;
        self.update(
            &current.id,
            json!({ "notificationCount": current.notification_count + 1 }),
        )
        .await
    }

    async fn reset_notification_count(&self, firebase_uid: &str) -> Result<User, StoreError> {
        let current = load_by_firebase_uid(self, firebase_uid).await?;
        self.update(&current.id, json!({ "notificationCount": 0 })).await
    }

    async fn sync_from_identity(
        &self,
        provider: &dyn IdentityProvider,
        firebase_uid: &str,
    ) -> Result<User, AuthError> {
        let profile = provider.get_user(firebase_uid).await?;

        match load_by_firebase_uid(self, firebase_uid).await {
            Ok(existing) => {
                let changes = json!({
                    "email": profile.email.or(existing.email),
                    "name": profile.display_name.or(existing.name),
                });
                let user = self.update(&existing.id, changes).await?;
                tracing::info!(firebase_uid, "user synced from identity provider");
                Ok(user)
            }
            Err(err) if err.is_not_found() => {
                let user = self
                    .create(User {
                        id: firebase_uid.to_string(),
                        firebase_uid: firebase_uid.to_string(),
                        email: profile.email,
                        name: profile.display_name,
                        ambient_music: true,
                        communication_enabled: true,
                        ..Default::default()
                    })
                    .await?;
                tracing::info!(firebase_uid, "user created from identity provider");
                Ok(user)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn stats(&self) -> Result<UserStats, StoreError> {
        let total_users = self.count(&UserFilter::default()).await?;
        let active_users = self
            .count(&UserFilter {
                communication_enabled: Some(true),
                ..Default::default()
            })
            .await?;

        let mut users_by_role = BTreeMap::new();
        for role in Role::ALL {
            let count = self
                .count(&UserFilter {
                    role: Some(role),
                    ..Default::default()
                })
                .await?;
            if count > 0 {
                users_by_role.insert(role.as_str().to_string(), count);
            }
        }

        let mut users_by_language = BTreeMap::new();
        for language in Language::ALL {
            let count = self
                .count(&UserFilter {
                    language: Some(language),
                    ..Default::default()
                })
                .await?;
            if count > 0 {
                users_by_language.insert(language.as_str().to_string(), count);
            }
        }

        Ok(UserStats {
            total_users,
            active_users,
            users_by_role,
            users_by_language,
        })
    }
}
