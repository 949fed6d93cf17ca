use std::{env, fmt, fmt::Display, str::FromStr, time::Duration};

use crate::shared::errors::{AppError, AppResult};
use crate::{log_debug, log_warn};

/// Spreadsheet connection settings.
///
/// Credentials in order of preference: service account, static bearer
/// token, API key. Only a service account can read a private sheet for
/// longer than one token lifetime.
#[derive(Clone, Default)]
pub struct SheetsConfig {
    pub spreadsheet_id: Option<String>,
    pub range: String,
    pub api_key: Option<String>,
    pub access_token: Option<String>,
    pub service_account_email: Option<String>,
    /// PEM; literal `\n` escapes are accepted
    pub private_key: Option<String>,
    /// OAuth token endpoint, Google's when unset
    pub token_url: Option<String>,
}

impl SheetsConfig {
    pub fn has_service_account(&self) -> bool {
        self.service_account_email.is_some() && self.private_key.is_some()
    }

    /// A spreadsheet id and at least one credential are required.
    pub fn is_configured(&self) -> bool {
        self.spreadsheet_id.is_some()
            && (self.has_service_account() || self.api_key.is_some() || self.access_token.is_some())
    }
}

impl fmt::Debug for SheetsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted = |secret: &Option<String>| secret.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("SheetsConfig")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("range", &self.range)
            .field("api_key", &redacted(&self.api_key))
            .field("access_token", &redacted(&self.access_token))
            .field("service_account_email", &self.service_account_email)
            .field("private_key", &redacted(&self.private_key))
            .field("token_url", &self.token_url)
            .finish()
    }
}

/// Process configuration, loaded from `.env` and the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: Option<String>,
    pub sheets: SheetsConfig,
    /// Year before the first cohort graduated; generation N graduates in `base_year + N`.
    pub base_year: i32,
    pub progress_retention: Duration,
    pub history_ttl: Duration,
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            port: try_load("PORT", "8080")?,
            database_url: optional("DATABASE_URL"),
            sheets: SheetsConfig {
                spreadsheet_id: optional("ALUMNI_SPREADSHEET_ID"),
                range: optional("ALUMNI_SHEET_RANGE").unwrap_or_else(|| "A:L".to_string()),
                api_key: optional("GOOGLE_SHEETS_API_KEY"),
                access_token: optional("GOOGLE_SHEETS_ACCESS_TOKEN"),
                service_account_email: optional("GOOGLE_SERVICE_ACCOUNT_EMAIL"),
                private_key: optional("GOOGLE_PRIVATE_KEY"),
                token_url: optional("GOOGLE_TOKEN_URL"),
            },
            base_year: try_load("ALUMNI_BASE_YEAR", "1984")?,
            progress_retention: Duration::from_secs(try_load(
                "SYNC_PROGRESS_RETENTION_SECS",
                "3",
            )?),
            history_ttl: Duration::from_secs(try_load("SYNC_HISTORY_TTL_SECS", "3600")?),
        })
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn try_load<T: FromStr>(key: &str, default: &str) -> AppResult<T>
where
    T::Err: Display,
{
    let raw = optional(key).unwrap_or_else(|| {
        log_debug!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse().map_err(|e| {
        log_warn!("Invalid {key} value: {e}");
        AppError::InvalidInput(format!("Environment variable {key} is invalid: {e}"))
    })
}
