//! External identity provider interface
//!
//! Token verification and profile lookup are delegated to an outside
//! service. `StaticIdentityProvider` serves fixed tokens and profiles for
//! tests and local runs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("token expired")]
    Expired,

    #[error("token revoked")]
    Revoked,

    #[error("invalid token: {0}")]
    Invalid(String),

    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

/// Claims carried by a verified bearer token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifiedIdentity {
    pub uid: String,
    pub email: Option<String>,
    pub email_verified: bool,
    pub name: Option<String>,
    #[serde(default)]
    pub claims: Map<String, Value>,
}

/// Profile record held by the provider for a user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentityProfile {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify_token(&self, token: &str) -> Result<VerifiedIdentity, IdentityError>;

    async fn get_user(&self, uid: &str) -> Result<IdentityProfile, IdentityError>;
}

/// Provider answering from fixed tables
#[derive(Debug, Clone, Default)]
pub struct StaticIdentityProvider {
    tokens: HashMap<String, Result<VerifiedIdentity, IdentityError>>,
    profiles: HashMap<String, IdentityProfile>,
}

impl StaticIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `token` as `identity`
    pub fn with_token(mut self, token: &str, identity: VerifiedIdentity) -> Self {
        self.tokens.insert(token.to_string(), Ok(identity));
        self
    }

    /// Reject `token` with `error`
    pub fn with_rejected_token(mut self, token: &str, error: IdentityError) -> Self {
        self.tokens.insert(token.to_string(), Err(error));
        self
    }

    pub fn with_profile(mut self, profile: IdentityProfile) -> Self {
        self.profiles.insert(profile.uid.clone(), profile);
        self
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn verify_token(&self, token: &str) -> Result<VerifiedIdentity, IdentityError> {
        self.tokens
            .get(token)
            .cloned()
            .unwrap_or_else(|| Err(IdentityError::Invalid("unknown token".to_string())))
    }

    async fn get_user(&self, uid: &str) -> Result<IdentityProfile, IdentityError> {
        self.profiles
            .get(uid)
            .cloned()
            .ok_or_else(|| IdentityError::Invalid(format!("unknown user '{uid}'")))
    }
}
