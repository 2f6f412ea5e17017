//! Google service account credentials and OAuth access tokens
//!
//! Access tokens are obtained with the JWT bearer grant: a short-lived assertion
//! signed with the account's RSA key is exchanged at the account's `token_uri`.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use base64::prelude::*;
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// OAuth scope granting full Drive access
pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// The fields of a service account key file that token minting needs
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    /// Decode a base64-encoded service account JSON document
    pub fn from_base64(encoded: &str) -> Result<Self, TokenError> {
        let bytes = BASE64_STANDARD
            .decode(encoded.trim())
            .map_err(|e| TokenError::InvalidCredential(format!("not valid base64: {}", e)))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| TokenError::InvalidCredential(format!("not a service account: {}", e)))
    }
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("private_key", &"<redacted>")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

/// Response from the Google token endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
    #[serde(rename = "token_type")]
    pub _token_type: String,
}

/// Cached token with expiration tracking
struct TokenCache {
    token: TokenResponse,
    fetched_at: Instant,
}

/// Mints and caches access tokens for one service account
pub struct ServiceAccountTokenManager {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    scope: String,
    client: reqwest::Client,
    cache: Arc<RwLock<Option<TokenCache>>>,
    /// Refresh token this many seconds before expiration
    refresh_margin: Duration,
}

impl ServiceAccountTokenManager {
    pub fn new(
        key: ServiceAccountKey,
        scope: &str,
        client: reqwest::Client,
    ) -> Result<Self, TokenError> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| TokenError::InvalidCredential(format!("bad private key: {}", e)))?;

        Ok(Self {
            key,
            encoding_key,
            scope: scope.to_string(),
            client,
            cache: Arc::new(RwLock::new(None)),
            refresh_margin: Duration::from_secs(60),
        })
    }

    /// Get a valid access token, fetching a new one if necessary
    pub async fn get_access_token(&self) -> Result<String, TokenError> {
        {
            let cache = self.cache.read().await;
            if let Some(ref cached) = *cache {
                let elapsed = cached.fetched_at.elapsed();
                let expires_in = Duration::from_secs(cached.token.expires_in);

                if elapsed + self.refresh_margin < expires_in {
                    tracing::debug!(
                        "Using cached service account token (expires in {} seconds)",
                        (expires_in - elapsed).as_secs()
                    );
                    return Ok(cached.token.access_token.clone());
                }
            }
        }

        self.fetch_token().await
    }

    fn sign_assertion(&self) -> Result<String, TokenError> {
        let iat = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: &self.scope,
            aud: &self.key.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();

        jsonwebtoken::encode(&header, &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    async fn fetch_token(&self) -> Result<String, TokenError> {
        tracing::debug!(
            "Fetching new access token for {} from {}",
            self.key.client_email,
            self.key.token_uri
        );

        let assertion = self.sign_assertion()?;

        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| TokenError::FetchError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TokenError::FetchError(format!(
                "Token request failed: HTTP {} - {}",
                status, body
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| TokenError::ParseError(e.to_string()))?;

        tracing::info!(
            "Fetched new service account token, expires in {} seconds",
            token_response.expires_in
        );

        let access_token = token_response.access_token.clone();
        let mut cache = self.cache.write().await;
        *cache = Some(TokenCache {
            token: token_response,
            fetched_at: Instant::now(),
        });

        Ok(access_token)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Invalid service account credential: {0}")]
    InvalidCredential(String),

    #[error("Failed to sign token assertion: {0}")]
    Signing(String),

    #[error("Failed to fetch token: {0}")]
    FetchError(String),

    #[error("Failed to parse token response: {0}")]
    ParseError(String),
}
