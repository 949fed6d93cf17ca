/// Test helper functions and service builders
use super::fakes::{InMemoryAlumniRepository, StaticSheet};
use alumni_lib::shared::{AppConfig, SheetsConfig};
use alumni_lib::state::AppState;
use std::sync::Arc;
use std::time::Duration;

pub fn test_config() -> AppConfig {
    AppConfig {
        port: 0,
        database_url: None,
        sheets: SheetsConfig {
            range: "A:L".to_string(),
            ..SheetsConfig::default()
        },
        base_year: 1984,
        progress_retention: Duration::from_secs(3),
        history_ttl: Duration::from_secs(3600),
    }
}

pub struct TestApp {
    pub state: Arc<AppState>,
    pub repository: Arc<InMemoryAlumniRepository>,
    pub sheet: Arc<StaticSheet>,
}

/// App state over in-memory fakes, no database
pub fn build_test_app(sheet: StaticSheet) -> TestApp {
    let repository = Arc::new(InMemoryAlumniRepository::new());
    let sheet = Arc::new(sheet);

    let state = AppState::new(test_config(), None, repository.clone(), sheet.clone())
        .expect("Failed to build app state");

    TestApp {
        state,
        repository,
        sheet,
    }
}
