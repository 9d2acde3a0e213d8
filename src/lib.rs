//! Jobwatch - server-list poller and detection alert router.
//!
//! The crate has two halves that share one process:
//!
//! - **Pool refresh**: a paginated, proxy-rotating fetch of a game's public
//!   server listing, filtered by player count, persisted, and pushed to a
//!   downstream aggregator on a fixed cadence.
//! - **Detection intake**: externally reported detections are classified by
//!   their generation rate, routed to a tiered alert channel (the low tier
//!   alternates between two channels), counted, and summarized in a stats
//!   message that is edited in place.
//!
//! # Modules
//!
//! - [`domain`] - Pure types and rules: proxies, player filter, generation
//!   parsing, channel routing, stats state
//! - [`port`] - Traits for the listing, publisher, notifier, snapshot sink and
//!   durable store
//! - [`application`] - Fetcher, poll cycle, stats store, detection handling and
//!   the snapshot publisher
//! - [`adapter`] - HTTP, webhook, Telegram and JSON-file implementations, plus
//!   the HTTP front-end and CLI
//! - [`infrastructure`] - Configuration, wiring and runtime lifecycle
//! - [`error`] - Error types for the crate
//!
//! # Features
//!
//! - `telegram` (default) - stats snapshot and commands over a Telegram bot

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;
