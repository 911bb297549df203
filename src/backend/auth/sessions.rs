/**
 * Session Management and JWT Tokens
 *
 * A session is a pair of tokens:
 *
 * - an **access token** (short-lived) sent as `Authorization: Bearer ...`
 * - a **refresh token** (long-lived) exchanged for a new pair at
 *   `POST /users/refreshToken`
 *
 * Both are HS256 JWTs signed with separate secrets. Refresh tokens are also
 * stored per user; a refresh token is only honoured while it is stored, which
 * is what makes logout and refresh-token rotation work.
 */

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::backend::auth::users;
use crate::backend::error::BackendResult;
use crate::backend::server::config::AuthConfig;

/// Lifetime of the `state` parameter of the Facebook login dialog
const OAUTH_STATE_TTL: Duration = Duration::from_secs(10 * 60);

/// Subject of OAuth state tokens
const OAUTH_STATE_SUBJECT: &str = "facebook-login";

/// What a token may be used for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
    OauthState,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    pub kind: TokenKind,
    /// Unique token id, so two tokens issued in the same second differ
    pub jti: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

/// Access/refresh token pair returned to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Tokens {
    pub token: String,
    pub refresh_token: String,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

fn sign(subject: String, kind: TokenKind, ttl: Duration, secret: &str) -> BackendResult<String> {
    let now = now_secs();
    let claims = Claims {
        sub: subject,
        kind,
        jti: Uuid::new_v4().to_string(),
        exp: now + ttl.as_secs(),
        iat: now,
    };
    let key = EncodingKey::from_secret(secret.as_bytes());
    Ok(encode(&Header::default(), &claims, &key)?)
}

fn verify(token: &str, kind: TokenKind, secret: &str) -> BackendResult<Claims> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let claims = decode::<Claims>(token, &key, &Validation::default())?.claims;
    if claims.kind != kind {
        return Err(jsonwebtoken::errors::Error::from(
            jsonwebtoken::errors::ErrorKind::InvalidToken,
        )
        .into());
    }
    Ok(claims)
}

/// Create an access token for a user
pub fn create_token(auth: &AuthConfig, user_id: Uuid) -> BackendResult<String> {
    sign(user_id.to_string(), TokenKind::Access, auth.access_ttl, &auth.access_secret)
}

/// Create a refresh token for a user (not stored)
pub fn create_refresh_token(auth: &AuthConfig, user_id: Uuid) -> BackendResult<String> {
    sign(user_id.to_string(), TokenKind::Refresh, auth.refresh_ttl, &auth.refresh_secret)
}

/// Verify an access token and return the user id it was issued to
pub fn verify_token(auth: &AuthConfig, token: &str) -> BackendResult<Uuid> {
    let claims = verify(token, TokenKind::Access, &auth.access_secret)?;
    parse_subject(&claims)
}

/// Verify a refresh token's signature and expiry (not its storage)
pub fn verify_refresh_token(auth: &AuthConfig, token: &str) -> BackendResult<Uuid> {
    let claims = verify(token, TokenKind::Refresh, &auth.refresh_secret)?;
    parse_subject(&claims)
}

/// Create the `state` value for the Facebook login dialog
pub fn create_state_token(auth: &AuthConfig) -> BackendResult<String> {
    sign(
        OAUTH_STATE_SUBJECT.to_string(),
        TokenKind::OauthState,
        OAUTH_STATE_TTL,
        &auth.access_secret,
    )
}

/// Check a `state` value coming back from the Facebook login dialog
pub fn verify_state_token(auth: &AuthConfig, token: &str) -> BackendResult<()> {
    let claims = verify(token, TokenKind::OauthState, &auth.access_secret)?;
    if claims.sub != OAUTH_STATE_SUBJECT {
        return Err(jsonwebtoken::errors::Error::from(
            jsonwebtoken::errors::ErrorKind::InvalidSubject,
        )
        .into());
    }
    Ok(())
}

fn parse_subject(claims: &Claims) -> BackendResult<Uuid> {
    Uuid::parse_str(&claims.sub).map_err(|_| {
        jsonwebtoken::errors::Error::from(jsonwebtoken::errors::ErrorKind::InvalidSubject).into()
    })
}

/// Issue a token pair and store the refresh token
pub async fn authenticate(pool: &SqlitePool, auth: &AuthConfig, user_id: Uuid) -> BackendResult<Tokens> {
    let token = create_token(auth, user_id)?;
    let refresh_token = create_refresh_token(auth, user_id)?;
    users::add_refresh_token(pool, user_id, &refresh_token).await?;
    Ok(Tokens {
        token,
        refresh_token,
    })
}

/// Exchange a stored refresh token for a new pair
///
/// Returns `None` when the token does not verify or is no longer stored
/// (already used, or revoked by a logout). The old token is consumed.
pub async fn rotate_refresh_token(
    pool: &SqlitePool,
    auth: &AuthConfig,
    old_refresh_token: &str,
) -> BackendResult<Option<Tokens>> {
    let user_id = match verify_refresh_token(auth, old_refresh_token) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("Refresh token rejected: {}", e);
            return Ok(None);
        }
    };

    let removed = users::remove_refresh_token(pool, user_id, old_refresh_token).await?;
    if !removed {
        tracing::warn!("Refresh token for {} is not stored", user_id);
        return Ok(None);
    }

    authenticate(pool, auth, user_id).await.map(Some)
}
