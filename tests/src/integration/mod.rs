//! Cross-crate integration scenarios.

pub mod concurrency;
pub mod persistence;
pub mod scenarios;
