/**
 * Facebook Login
 *
 * Server-side OAuth 2.0 code flow against the Facebook Graph API:
 *
 * 1. `GET /users/facebookLogin` redirects the browser to the login dialog
 * 2. Facebook redirects back to `/users/facebookRedirect?code=...&state=...`
 * 3. The code is exchanged for a user access token
 * 4. The token is used to read the profile from `/me`
 *
 * The handler then finds or creates the local account; see
 * `handlers::facebook`.
 */

use serde::Deserialize;
use thiserror::Error;

use crate::backend::server::config::FacebookConfig;

/// Profile fields requested from `/me`
pub const PROFILE_FIELDS: &str = "id,email,first_name,last_name,gender,name";

/// Permissions requested in the login dialog
pub const SCOPES: &str = "public_profile,email";

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("Facebook request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Facebook returned an error ({status}): {message}")]
    Provider { status: u16, message: String },

    #[error("Invalid Facebook endpoint: {0}")]
    Url(#[from] url::ParseError),
}

/// Profile returned by the Graph API
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FacebookProfile {
    pub id: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    /// Display name
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct GraphErrorResponse {
    error: GraphError,
}

#[derive(Debug, Deserialize)]
struct GraphError {
    message: String,
}

/// Graph API client for the configured Facebook app
#[derive(Debug, Clone)]
pub struct FacebookClient {
    config: FacebookConfig,
    http: reqwest::Client,
}

impl FacebookClient {
    pub fn new(config: FacebookConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// URL of the login dialog carrying the given anti-forgery `state`
    pub fn authorization_url(&self, state: &str) -> Result<String, OAuthError> {
        let url = url::Url::parse_with_params(
            &self.config.dialog_url,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("scope", SCOPES),
                ("response_type", "code"),
                ("state", state),
            ],
        )?;
        Ok(url.into())
    }

    fn graph_url(&self, path: &str) -> String {
        format!("{}/{}", self.config.graph_url.trim_end_matches('/'), path)
    }

    /// Exchange an authorization code for a user access token
    pub async fn exchange_code(&self, code: &str) -> Result<String, OAuthError> {
        let response = self
            .http
            .get(self.graph_url("oauth/access_token"))
            .query(&[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("code", code),
            ])
            .send()
            .await?;

        let body: AccessTokenResponse = read_json(response).await?;
        Ok(body.access_token)
    }

    pub async fn fetch_profile(&self, access_token: &str) -> Result<FacebookProfile, OAuthError> {
        let response = self
            .http
            .get(self.graph_url("me"))
            .query(&[("fields", PROFILE_FIELDS), ("access_token", access_token)])
            .send()
            .await?;

        read_json(response).await
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T, OAuthError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let message = response
        .json::<GraphErrorResponse>()
        .await
        .map(|e| e.error.message)
        .unwrap_or_else(|_| "unknown error".to_string());
    tracing::warn!("Facebook Graph API error ({}): {}", status, message);
    Err(OAuthError::Provider {
        status: status.as_u16(),
        message,
    })
}
