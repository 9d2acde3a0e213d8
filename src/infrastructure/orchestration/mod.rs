//! Application orchestration.
//!
//! Runtime wiring and lifecycle management for the background loops and the
//! HTTP front-end.

mod runtime;

pub use runtime::Orchestrator;
