// Shared kernel: errors, configuration, logging and infrastructure used by every module.

pub mod config;
pub mod errors;
pub mod infrastructure;
pub mod utils;

pub use config::{AppConfig, SheetsConfig};
pub use infrastructure::database::Database;
