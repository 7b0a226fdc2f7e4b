//! Caller identity.
//!
//! Requests carry `Authorization: Bearer <jwt>`. The token is HS256-signed
//! with the configured secret; its `sub` claim is the owner id every todo
//! operation is scoped to. Unauthenticated requests are rejected here and
//! never reach the service.

use crate::error::AppError;
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use todo_core::OwnerId;

/// Why a request could not be attributed to a user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// No `Authorization` header.
    #[error("Missing authorization header")]
    MissingHeader,

    /// Header present but not `Bearer <token>`.
    #[error("Invalid authorization format. Expected 'Bearer <token>'")]
    InvalidScheme,

    /// Signature, expiry or shape check failed.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// Token verified but names no user.
    #[error("Token has no subject")]
    MissingSubject,
}

/// Claims the service reads from a token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Owner id
    pub sub: String,
    /// Expiry (seconds since the epoch)
    pub exp: u64,
}

/// Verifies bearer tokens and yields the caller's [`OwnerId`].
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    /// Verifier for HS256 tokens signed with `secret`, tolerating
    /// `leeway_secs` of clock skew on `exp`.
    #[must_use]
    pub fn new(secret: &[u8], leeway_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway_secs;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Verify `token` and return its owner.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidToken`] on a bad signature, expired or
    /// malformed token, and [`IdentityError::MissingSubject`] on an empty `sub`.
    pub fn verify(&self, token: &str) -> Result<OwnerId, IdentityError> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            IdentityError::InvalidToken
        })?;

        if data.claims.sub.trim().is_empty() {
            return Err(IdentityError::MissingSubject);
        }

        Ok(OwnerId::new(data.claims.sub))
    }
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtVerifier")
            .field("leeway", &self.validation.leeway)
            .finish_non_exhaustive()
    }
}

/// Bearer token extracted from `Authorization: Bearer <token>` header.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(IdentityError::MissingHeader)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(IdentityError::InvalidScheme)?;

        Ok(Self(token.to_string()))
    }
}

/// The verified caller.
///
/// Use as a handler parameter to require authentication.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub OwnerId);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<JwtVerifier>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state).await?;
        let verifier = Arc::<JwtVerifier>::from_ref(state);

        Ok(Self(verifier.verify(&token)?))
    }
}
