use super::http_client::{RetryPolicy, SheetsHttpClient};
use super::service_account::{ServiceAccountAuth, GOOGLE_TOKEN_URL};
use crate::modules::sheets::domain::{SheetRow, SpreadsheetSource};
use crate::shared::config::SheetsConfig;
use crate::shared::errors::{AppError, AppResult};
use crate::{log_debug, log_error, log_info};
use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::Deserialize;
use serde_json::Value;

const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMetadata {
    properties: Option<SpreadsheetProperties>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetProperties {
    title: Option<String>,
}

/// Credential attached to one request
#[derive(Debug, Clone, PartialEq, Eq)]
enum Credential {
    Bearer(String),
    ApiKey(String),
}

/// Read-only Google Sheets v4 client for one spreadsheet range
pub struct GoogleSheetsClient {
    http: SheetsHttpClient,
    config: SheetsConfig,
    base_url: String,
    service_account: Option<ServiceAccountAuth>,
}

impl GoogleSheetsClient {
    pub fn new(config: SheetsConfig) -> AppResult<Self> {
        Self::with_base_url(config, DEFAULT_BASE_URL, RetryPolicy::sheets())
    }

    pub fn with_base_url(
        config: SheetsConfig,
        base_url: &str,
        retry_policy: RetryPolicy,
    ) -> AppResult<Self> {
        let service_account = Self::service_account(&config);

        Ok(Self {
            http: SheetsHttpClient::new(retry_policy)?,
            config,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_account,
        })
    }

    /// A bad key is logged and leaves the client without service-account auth
    fn service_account(config: &SheetsConfig) -> Option<ServiceAccountAuth> {
        let (Some(email), Some(key)) = (&config.service_account_email, &config.private_key) else {
            return None;
        };
        let token_url = config.token_url.as_deref().unwrap_or(GOOGLE_TOKEN_URL);

        match ServiceAccountAuth::new(email, key, token_url) {
            Ok(auth) => {
                log_info!("Google Sheets authenticates as service account {}", auth.email());
                Some(auth)
            }
            Err(e) => {
                log_error!("Service account {} unusable: {}", email, e);
                None
            }
        }
    }

    fn spreadsheet_id(&self) -> AppResult<&str> {
        if !self.config.is_configured() {
            return Err(AppError::SourceUnavailable(
                "Spreadsheet id or Google credentials are not configured".to_string(),
            ));
        }

        self.config
            .spreadsheet_id
            .as_deref()
            .ok_or_else(|| AppError::SourceUnavailable("Spreadsheet id is not configured".to_string()))
    }

    fn values_url(&self, spreadsheet_id: &str) -> String {
        format!(
            "{}/{}/values/{}",
            self.base_url,
            urlencoding::encode(spreadsheet_id),
            urlencoding::encode(&self.config.range)
        )
    }

    fn metadata_url(&self, spreadsheet_id: &str) -> String {
        format!(
            "{}/{}?fields=properties.title",
            self.base_url,
            urlencoding::encode(spreadsheet_id)
        )
    }

    /// Service account, then static bearer token, then API key
    async fn credential(&self) -> AppResult<Credential> {
        if let Some(auth) = &self.service_account {
            return auth.access_token().await.map(Credential::Bearer);
        }

        match (&self.config.access_token, &self.config.api_key) {
            (Some(token), _) => Ok(Credential::Bearer(token.clone())),
            (None, Some(key)) => Ok(Credential::ApiKey(key.clone())),
            (None, None) => Err(AppError::SourceUnavailable(
                "No usable Google credential configured".to_string(),
            )),
        }
    }

    fn authorize(request: RequestBuilder, credential: &Credential) -> RequestBuilder {
        match credential {
            Credential::Bearer(token) => request.bearer_auth(token),
            Credential::ApiKey(key) => request.query(&[("key", key.as_str())]),
        }
    }

    fn cell_to_string(cell: &Value) -> String {
        match cell {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            other => other.to_string(),
        }
    }
}

#[async_trait]
impl SpreadsheetSource for GoogleSheetsClient {
    async fn check_connection(&self) -> AppResult<String> {
        let spreadsheet_id = self.spreadsheet_id()?;
        let url = self.metadata_url(spreadsheet_id);
        let credential = self.credential().await.map_err(into_unavailable)?;

        let metadata: SpreadsheetMetadata = self
            .http
            .get_json(&url, "spreadsheets.get", |req| Self::authorize(req, &credential))
            .await
            .map_err(into_unavailable)?;

        let title = metadata
            .properties
            .and_then(|p| p.title)
            .unwrap_or_else(|| spreadsheet_id.to_string());

        log_info!("Connected to spreadsheet '{}'", title);
        Ok(title)
    }

    async fn fetch_rows(&self) -> AppResult<Vec<SheetRow>> {
        let spreadsheet_id = self.spreadsheet_id()?;
        let url = self.values_url(spreadsheet_id);
        let credential = self.credential().await.map_err(into_unavailable)?;

        let range: ValueRange = self
            .http
            .get_json(&url, "values.get", |req| Self::authorize(req, &credential))
            .await
            .map_err(into_unavailable)?;

        let rows: Vec<SheetRow> = range
            .values
            .iter()
            .map(|row| row.iter().map(Self::cell_to_string).collect())
            .collect();

        log_debug!("Fetched {} rows from range {}", rows.len(), self.config.range);
        Ok(rows)
    }
}

/// Every remote failure, rate limits included, means the source is unavailable to callers
fn into_unavailable(error: AppError) -> AppError {
    match error {
        AppError::SourceUnavailable(_) => error,
        other => AppError::SourceUnavailable(other.to_string()),
    }
}
