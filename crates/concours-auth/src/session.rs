//! Signed, client-held session tokens (JWT handling)

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::role::Role;

/// Absolute session lifetime in hours; expiry is fixed at issuance, not sliding
pub const SESSION_TTL_HOURS: i64 = 24;

/// Session claims: the minimal principal snapshot carried by the client
///
/// The role is the typed [`Role`] enum, so a token carrying an unknown role
/// string fails deserialization and the whole token resolves to nothing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionClaims {
    /// Subject (user UUID as string)
    pub sub: String,
    /// Login handle
    pub username: String,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Avatar asset URL, if the user has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Account role
    pub role: Role,
    /// Issued at (timestamp)
    pub iat: i64,
    /// Expiration time (timestamp)
    pub exp: i64,
}

impl SessionClaims {
    /// Build a session snapshot expiring [`SESSION_TTL_HOURS`] from now
    pub fn new(
        sub: String,
        username: String,
        name: String,
        email: String,
        role: Role,
    ) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(SESSION_TTL_HOURS);

        Self {
            sub,
            username,
            name,
            email,
            avatar: None,
            role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }

    /// Override the validity window (testing and tooling)
    pub fn with_validity(mut self, validity: Duration) -> Self {
        let now = Utc::now();
        self.iat = now.timestamp();
        self.exp = (now + validity).timestamp();
        self
    }

    pub fn with_avatar(mut self, avatar: Option<String>) -> Self {
        self.avatar = avatar;
        self
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// Produce the patched snapshot for re-signing after a profile edit
    ///
    /// Identity (`sub`, `username`), role, and the original expiry are
    /// preserved; only display fields change. The caller signs the result
    /// into a fresh token, so the live session reflects the edit without
    /// re-authentication and without extending its lifetime.
    pub fn patched(&self, patch: SessionPatch) -> Self {
        let mut next = self.clone();
        if let Some(name) = patch.name {
            next.name = name;
        }
        if let Some(email) = patch.email {
            next.email = email;
        }
        if let Some(avatar) = patch.avatar {
            next.avatar = avatar;
        }
        next
    }
}

/// Partial update applied to a live session after a self-service edit
#[derive(Debug, Clone, Default)]
pub struct SessionPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    /// `Some(None)` clears the avatar, `Some(Some(url))` replaces it
    pub avatar: Option<Option<String>>,
}

/// Session token errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session encoding error: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),
}

/// Process-wide signing key set
///
/// Tokens are always issued with the current key. Verification accepts the
/// current key and every configured previous key, so in-flight sessions
/// survive a secret rotation. Read-only after startup.
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: Vec<DecodingKey>,
    validation: Validation,
}

impl SessionKeys {
    /// Create a key set from the current secret and any prior secrets
    pub fn new(current: &str, previous: &[String]) -> Self {
        let mut decoding = vec![DecodingKey::from_secret(current.as_bytes())];
        decoding.extend(
            previous
                .iter()
                .map(|secret| DecodingKey::from_secret(secret.as_bytes())),
        );

        let mut validation = Validation::new(Algorithm::HS256);
        // Only signature and expiration matter for session tokens
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.validate_nbf = false;

        Self {
            encoding: EncodingKey::from_secret(current.as_bytes()),
            decoding,
            validation,
        }
    }

    /// Sign a claims snapshot into a session token
    pub fn issue(&self, claims: &SessionClaims) -> Result<String, SessionError> {
        let header = Header::new(Algorithm::HS256);
        Ok(encode(&header, claims, &self.encoding)?)
    }

    /// Verify a token and return its claims
    ///
    /// Any failure collapses to `None`: unknown signing key, expired token,
    /// malformed or tampered payload, unknown role string. Callers cannot
    /// distinguish these cases, matching the "not logged in" surface.
    pub fn resolve(&self, token: &str) -> Option<SessionClaims> {
        for key in &self.decoding {
            if let Ok(data) = decode::<SessionClaims>(token, key, &self.validation) {
                if data.claims.is_expired() {
                    return None;
                }
                return Some(data.claims);
            }
        }
        None
    }

    /// Re-sign a live session with patched display fields
    pub fn patch(
        &self,
        claims: &SessionClaims,
        patch: SessionPatch,
    ) -> Result<String, SessionError> {
        self.issue(&claims.patched(patch))
    }
}
