use std::time::Duration;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, warn};

use crate::{
    config::JwtConfig,
    error::{ApiError, TokenError},
    state::AppState,
};

/// Token type used to distinguish Access and Refresh JWTs.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT payload. Access tokens additionally carry the user's email.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: i64,
    pub iat: usize,
    pub exp: usize,
    pub kind: TokenKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Holds JWT signing and verification keys with the configured lifetimes.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig {
            secret,
            access_minutes,
            refresh_days,
        } = state.config.jwt.clone();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl: Duration::from_secs((access_minutes as u64) * 60),
            refresh_ttl: Duration::from_secs((refresh_days as u64) * 24 * 60 * 60),
        }
    }
}

impl JwtKeys {
    fn sign_with_kind(
        &self,
        user_id: i64,
        kind: TokenKind,
        email: Option<String>,
    ) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let exp = now + TimeDuration::seconds(ttl.as_secs() as i64);
        let claims = Claims {
            sub: user_id,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            kind,
            email,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id, kind = ?kind, "jwt signed");
        Ok(token)
    }

    pub fn sign_access(&self, user_id: i64, email: &str) -> anyhow::Result<String> {
        self.sign_with_kind(user_id, TokenKind::Access, Some(email.to_string()))
    }

    pub fn sign_refresh(&self, user_id: i64) -> anyhow::Result<String> {
        self.sign_with_kind(user_id, TokenKind::Refresh, None)
    }

    /// Validate signature, expiry and token kind. Expiry gets its own error
    /// so clients can distinguish a stale token from a forged one; everything
    /// else, including a kind mismatch, is just invalid.
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, TokenError> {
        let validation = Validation::default();
        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;
        if data.claims.kind != expected {
            return Err(TokenError::Invalid);
        }
        debug!(user_id = data.claims.sub, kind = ?data.claims.kind, "jwt verified");
        Ok(data.claims)
    }
}

fn bearer_claims(
    parts: &Parts,
    keys: &JwtKeys,
    expected: TokenKind,
) -> Result<Claims, TokenError> {
    let auth_header = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(TokenError::Missing)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(TokenError::Invalid)?;

    keys.verify(token, expected)
}

/// Validates an access token and injects the subject user id.
pub struct AccessUser(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for AccessUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let claims = bearer_claims(parts, &keys, TokenKind::Access).map_err(|e| {
            warn!(error = %e, "access token rejected");
            ApiError::from(e)
        })?;
        Ok(AccessUser(claims.sub))
    }
}

/// Validates a refresh token and injects the subject user id.
pub struct RefreshUser(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for RefreshUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let claims = bearer_claims(parts, &keys, TokenKind::Refresh).map_err(|e| {
            warn!(error = %e, "refresh token rejected");
            ApiError::from(e)
        })?;
        Ok(RefreshUser(claims.sub))
    }
}
