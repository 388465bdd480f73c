//! Shared helpers for the warehouse integration tests.

pub mod fixtures;
pub mod setup;
