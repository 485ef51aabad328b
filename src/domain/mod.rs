pub mod error;
pub mod notification;
pub mod repository;
pub mod task;
