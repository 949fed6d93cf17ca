pub mod service;

pub use service::AlumniSyncService;
