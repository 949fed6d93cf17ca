//! Google service-account credentials
//!
//! Signs an RS256 JWT assertion with the account's private key and trades it
//! at the OAuth token endpoint for a short-lived access token. The token is
//! reused until shortly before it expires.

use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::logger::LogContext;
use crate::{log_debug, log_warn};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const SHEETS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
/// Google rejects assertions valid for longer than an hour
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Refresh this long before the token expires
const EXPIRY_MARGIN_SECS: i64 = 60;
const MAX_TOKEN_LIFETIME_SECS: i64 = 86_400;

/// Claims of the signed assertion sent to the token endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl AssertionClaims {
    pub fn new(email: &str, token_url: &str, issued_at: DateTime<Utc>) -> Self {
        let iat = issued_at.timestamp();
        Self {
            iss: email.to_string(),
            scope: SHEETS_READONLY_SCOPE.to_string(),
            aud: token_url.to_string(),
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + ChronoDuration::seconds(EXPIRY_MARGIN_SECS) < self.expires_at
    }
}

pub struct ServiceAccountAuth {
    email: String,
    key: EncodingKey,
    token_url: String,
    client: Client,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountAuth {
    pub fn new(email: &str, private_key: &str, token_url: &str) -> AppResult<Self> {
        let pem = normalize_private_key(private_key);
        let key = EncodingKey::from_rsa_pem(pem.as_bytes()).map_err(|e| {
            AppError::InvalidInput(format!("Invalid service account private key: {}", e))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("alumni-portal/0.1")
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            email: email.to_string(),
            key,
            token_url: token_url.to_string(),
            client,
            cached: Mutex::new(None),
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Signed JWT for the `jwt-bearer` grant
    pub fn assertion(&self, now: DateTime<Utc>) -> AppResult<String> {
        let claims = AssertionClaims::new(&self.email, &self.token_url, now);
        encode(&Header::new(Algorithm::RS256), &claims, &self.key).map_err(|e| {
            AppError::InternalError(format!("Failed to sign service account assertion: {}", e))
        })
    }

    /// Cached access token; exchanged anew when missing or about to expire
    pub async fn access_token(&self) -> AppResult<String> {
        // Held across the exchange so concurrent callers share one refresh
        let mut cached = self.cached.lock().await;
        let now = Utc::now();

        if let Some(token) = cached.as_ref().filter(|token| token.is_fresh(now)) {
            return Ok(token.value.clone());
        }

        let token = self.exchange(now).await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    async fn exchange(&self, now: DateTime<Utc>) -> AppResult<CachedToken> {
        let start = Instant::now();
        let assertion = self.assertion(now)?;
        let params = [("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())];

        let response = self
            .client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Token request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            log_warn!("Token exchange for {} rejected: HTTP {}", self.email, status);
            return Err(AppError::ExternalServiceError(format!(
                "Token endpoint returned HTTP {}",
                status
            )));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::SerializationError(format!("Invalid token response: {}", e)))?;

        LogContext::api_call("GoogleOAuth", "token", "ok", start.elapsed().as_millis() as u64);

        let lifetime = body.expires_in.clamp(0, MAX_TOKEN_LIFETIME_SECS);
        log_debug!("Access token for {} valid for {}s", self.email, lifetime);

        Ok(CachedToken {
            value: body.access_token,
            expires_at: now + ChronoDuration::seconds(lifetime),
        })
    }
}

/// `.env` files usually carry the PEM on one line with literal `\n` escapes
pub fn normalize_private_key(raw: &str) -> String {
    raw.replace("\\n", "\n")
}
