//! Outbound adapters (driven side).

pub mod file;
pub mod listing;
pub mod publisher;
#[cfg(feature = "telegram")]
pub mod telegram;
pub mod webhook;
