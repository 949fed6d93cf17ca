pub mod service;

pub use service::AlumniDirectoryService;
