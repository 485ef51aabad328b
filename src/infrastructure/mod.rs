pub mod log_queue;
pub mod sqlite_repo;
