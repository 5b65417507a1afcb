//! Email/password sign-in against a Supabase-compatible auth endpoint.
//!
//! Treated as an opaque collaborator: it either yields a session or an
//! error whose message is shown to the user as-is.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Rejected(String),
    #[error("Sign-in is not configured. Set SUPABASE_URL and SUPABASE_ANON_KEY.")]
    NotConfigured,
    #[error("Could not reach the sign-in service: {0}")]
    Network(#[source] reqwest::Error),
    #[error("The sign-in service sent an unexpected response.")]
    MalformedResponse(#[source] reqwest::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub email: String,
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    user: Option<TokenUser>,
}

#[derive(Deserialize)]
struct TokenUser {
    #[serde(default)]
    email: Option<String>,
}

#[derive(Clone)]
pub struct AuthClient {
    client: Client,
    base_url: Option<String>,
    anon_key: Option<String>,
}

impl AuthClient {
    pub fn new(base_url: Option<&str>, anon_key: Option<&str>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.map(|u| u.trim_end_matches('/').to_string()),
            anon_key: anon_key.map(str::to_string),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some() && self.anon_key.is_some()
    }

    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let (Some(base_url), Some(anon_key)) = (&self.base_url, &self.anon_key) else {
            return Err(AuthError::NotConfigured);
        };

        let url = format!("{}/auth/v1/token", base_url);
        let response = self
            .client
            .post(&url)
            .query(&[("grant_type", "password")])
            .header("apikey", anon_key)
            .json(&PasswordGrant { email, password })
            .send()
            .await
            .map_err(AuthError::Network)?;

        let status = response.status();
        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let message = error_message(&body).unwrap_or_else(|| format!("Sign-in failed ({})", status));
            tracing::warn!(%status, %message, "sign-in rejected");
            return Err(AuthError::Rejected(message));
        }

        let token: TokenResponse = response.json().await.map_err(|err| {
            tracing::warn!(%err, "sign-in response did not decode");
            AuthError::MalformedResponse(err)
        })?;
        let email = token
            .user
            .and_then(|u| u.email)
            .unwrap_or_else(|| email.to_string());
        tracing::info!(%email, "signed in");

        Ok(Session {
            access_token: token.access_token,
            email,
        })
    }
}

/// The auth service has used several keys for its message over time.
fn error_message(body: &Value) -> Option<String> {
    ["msg", "error_description", "message"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}
