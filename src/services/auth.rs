//! Bearer-token authentication against the identity provider and local users

use std::sync::Arc;

use serde_json::Value;
use store_object::{CachedStore, Repository};

use crate::entities::User;
use crate::errors::AuthError;
use crate::identity::{IdentityProvider, VerifiedIdentity};
use crate::services::users::UserQueries;

const ROLES_CLAIM: &str = "roles";

/// A verified token together with the local account it belongs to
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub identity: VerifiedIdentity,
    pub user: User,
}

impl AuthenticatedUser {
    /// Fails with `Forbidden` unless the token's `roles` claim lists `role`
    pub fn require_role(&self, role: &str) -> Result<(), AuthError> {
        let granted = self
            .identity
            .claims
            .get(ROLES_CLAIM)
            .and_then(Value::as_array)
            .is_some_and(|roles| roles.iter().any(|r| r.as_str() == Some(role)));
        if granted {
            Ok(())
        } else {
            Err(AuthError::Forbidden(role.to_string()))
        }
    }
}

/// Token from an `Authorization: Bearer <token>` header value
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    header
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingToken)
}

pub struct Authenticator<R: Repository<User>> {
    provider: Arc<dyn IdentityProvider>,
    users: CachedStore<User, R>,
}

impl<R: Repository<User>> Authenticator<R> {
    pub fn new(provider: Arc<dyn IdentityProvider>, users: CachedStore<User, R>) -> Self {
        Self { provider, users }
    }

    /// Verify `token` and resolve its subject through the cached uid lookup
    pub async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let identity = match self.provider.verify_token(token).await {
            Ok(identity) => identity,
            Err(err) => {
                tracing::warn!(error = %err, "token verification failed");
                return Err(err.into());
            }
        };
        crate::trace_log!(uid = %identity.uid, "token verified, resolving local user");

        let user = self
            .users
            .by_firebase_uid(&identity.uid)
            .await?
            .ok_or_else(|| AuthError::UserNotFound(identity.uid.clone()))?;

        tracing::debug!(uid = %identity.uid, user_id = %user.id, "user authenticated");
        Ok(AuthenticatedUser { identity, user })
    }
}
