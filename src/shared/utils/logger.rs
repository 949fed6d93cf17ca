use log::{debug, error, info};
use std::sync::Once;
use std::time::Instant;

static INIT: Once = Once::new();

/// Install env_logger once; `RUST_LOG` overrides the defaults below
pub fn init_logger() {
    INIT.call_once(|| {
        let result = env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .filter_module("alumni_lib", log::LevelFilter::Debug)
            .filter_module("diesel", log::LevelFilter::Warn)
            .filter_module("reqwest", log::LevelFilter::Warn)
            .filter_module("hyper", log::LevelFilter::Warn)
            .filter_module("tower_http", log::LevelFilter::Info)
            .format_timestamp_secs()
            .format_module_path(false)
            .try_init();

        match result {
            Ok(()) => info!("Alumni service logging ready"),
            Err(e) => eprintln!("Logger already installed: {}", e),
        }
    });
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        log::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        log::debug!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        log::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        log::error!($($arg)*)
    };
}

/// Log lines shared by the storage, sheets and sync layers
pub struct LogContext;

impl LogContext {
    pub fn db_operation(operation: &str, table: &str, duration_ms: u64) {
        debug!("DB: {} on {} took {}ms", operation, table, duration_ms);
    }

    pub fn api_call(service: &str, endpoint: &str, status: &str, duration_ms: u64) {
        info!("API: {} {} {} in {}ms", service, endpoint, status, duration_ms);
    }

    /// One line per reconciled record
    pub fn sync_progress(current: usize, total: usize, name: &str, generation: &str) {
        debug!(
            "Sync: [{}/{}] Processing '{}' ({}기)",
            current, total, name, generation
        );
    }

    pub fn error_with_context(error: &dyn std::error::Error, context: &str) {
        error!("{}: {}", context, error);
    }

    pub fn performance_metric(operation: &str, duration_ms: u64, detail: &str) {
        info!("Performance: {} took {}ms ({})", operation, duration_ms, detail);
    }
}

/// Wall-clock timer for a named operation
pub struct TimedOperation {
    start: Instant,
    operation: String,
}

impl TimedOperation {
    pub fn new(operation: &str) -> Self {
        debug!("Starting: {}", operation);
        Self {
            start: Instant::now(),
            operation: operation.to_string(),
        }
    }

    /// Log the elapsed time with a summary and return it in milliseconds
    pub fn finish_with_info(self, info: &str) -> u64 {
        let duration = self.start.elapsed().as_millis() as u64;
        LogContext::performance_metric(&self.operation, duration, info);
        duration
    }
}
