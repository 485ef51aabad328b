pub mod error;
pub mod notification;
pub mod use_cases;

#[cfg(test)]
mod use_cases_tests;
