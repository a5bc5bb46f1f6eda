//! Google ID-token verification.
//!
//! Tokens are checked against Google's `tokeninfo` endpoint, which validates
//! the signature and expiry server-side and returns the claims as JSON.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::errors::AppError;

const TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";
const ALLOWED_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

/// Verified identity extracted from an ID token.
#[derive(Debug, Clone, PartialEq)]
pub struct GoogleIdentity {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub picture: String,
}

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, id_token: &str) -> Result<GoogleIdentity, AppError>;
}

/// Claims as returned by tokeninfo. Booleans and numbers arrive as strings.
#[derive(Deserialize, Debug)]
pub struct TokenInfo {
    pub sub: String,
    #[serde(default)]
    pub aud: String,
    #[serde(default)]
    pub iss: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub email_verified: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

pub struct GoogleTokenVerifier {
    http: reqwest::Client,
    endpoint: String,
    client_id: Option<String>,
}

impl GoogleTokenVerifier {
    pub fn new(client_id: Option<String>) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(GoogleTokenVerifier {
            http,
            endpoint: TOKENINFO_URL.to_string(),
            client_id,
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl IdentityVerifier for GoogleTokenVerifier {
    async fn verify(&self, id_token: &str) -> Result<GoogleIdentity, AppError> {
        // The token goes in the form body; error texts carry the URL and end up in logs.
        let resp = self
            .http
            .post(&self.endpoint)
            .form(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|e| {
                AppError::Identity(format!(
                    "Token verification request failed: {}",
                    e.without_url()
                ))
            })?;

        if !resp.status().is_success() {
            return Err(AppError::Identity(format!(
                "Token rejected by Google (HTTP {})",
                resp.status()
            )));
        }

        let info: TokenInfo = resp
            .json()
            .await
            .map_err(|e| AppError::Identity(format!("Unreadable token info: {}", e.without_url())))?;

        check_claims(info, self.client_id.as_deref())
    }
}

/// Validate tokeninfo claims and turn them into an identity.
pub fn check_claims(info: TokenInfo, client_id: Option<&str>) -> Result<GoogleIdentity, AppError> {
    if info.sub.trim().is_empty() {
        return Err(AppError::Identity("Token has no subject".to_string()));
    }
    if !info.iss.is_empty() && !ALLOWED_ISSUERS.contains(&info.iss.as_str()) {
        return Err(AppError::Identity(format!("Unexpected issuer '{}'", info.iss)));
    }
    if let Some(expected) = client_id {
        if info.aud != expected {
            return Err(AppError::Identity("Token audience mismatch".to_string()));
        }
    }
    if info.email_verified.as_deref() == Some("false") {
        return Err(AppError::Identity("Email address is not verified".to_string()));
    }

    let name = info
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| info.email.split('@').next().unwrap_or_default().to_string());

    Ok(GoogleIdentity {
        sub: info.sub,
        email: info.email,
        name,
        picture: info.picture.unwrap_or_default(),
    })
}
