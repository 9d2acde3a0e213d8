//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters through
//! ports. Every long-running loop here is a spawned task that stops when the
//! shared shutdown signal flips to `true`.

pub mod detection;
pub mod fetcher;
pub mod poll;
pub mod pool;
pub mod shutdown;
pub mod snapshot;
pub mod stats;
