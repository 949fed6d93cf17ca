pub mod client;
pub mod http_client;
pub mod service_account;

pub use client::GoogleSheetsClient;
pub use http_client::{RetryPolicy, SheetsHttpClient};
pub use service_account::{ServiceAccountAuth, GOOGLE_TOKEN_URL};
