pub mod alumni;
pub mod alumni_sync;
pub mod jobs;
pub mod sheets;
