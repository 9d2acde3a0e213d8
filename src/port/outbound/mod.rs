//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe infrastructure dependencies such as the upstream
//! listing, the downstream aggregator, webhooks, the chat sink, and storage.

pub mod listing;
pub mod notifier;
pub mod publisher;
pub mod snapshot;
pub mod store;
