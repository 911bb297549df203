/**
 * Authentication Handler Types
 *
 * Request and response bodies of the `/users` authentication endpoints.
 * Field names follow the JSON the frontend sends (`refreshToken`,
 * `oldPassword`, ...).
 */

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::auth::sessions::Tokens;

/// Registration request
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct RegisterRequest {
    /// 3-30 chars of letters, digits, `_` and `.`
    pub username: String,
    pub email: String,
    /// At least 8 chars; hashed before storage
    pub password: String,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub gender: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct RegisterResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
}

/// Login request
///
/// Either `email` or `username` identifies the account.
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: String,
}

/// Returned by login and token refresh
#[derive(Serialize, Deserialize, Debug)]
pub struct TokenResponse {
    pub ok: bool,
    pub tokens: Tokens,
}

/// Body of `refreshToken` and `logOut`
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

/// Query string Facebook sends back to the redirect URI
#[derive(Deserialize, Debug, Default)]
pub struct FacebookCallback {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set when the user declined the dialog
    pub error: Option<String>,
}
