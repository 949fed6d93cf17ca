pub mod entities;
pub mod repository;

pub use entities::{AlumniRecord, NewAlumniRecord};
pub use repository::AlumniRepository;
