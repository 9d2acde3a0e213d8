//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points in the hexagonal architecture.
//! Adapters implement them to talk to the outside world; the application
//! layer depends on the traits only.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!     ┌──────────────┤  poll · stats · alerts  ├──────────────┐
//!     │              └─────────────────────────┘              │
//!     ▼                         ▼                             ▼
//! ┌─────────┐            ┌─────────────┐              ┌───────────┐
//! │ Listing │            │ State store │              │ Notifier  │
//! │ Adapter │            │   Adapter   │              │ / Snapshot│
//! └─────────┘            └─────────────┘              └───────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`ServerListing`] - One page of the upstream server listing
//! - [`PoolPublisher`] - Downstream push of the filtered pool
//! - [`Notifier`] - Per-channel detection alerts
//! - [`SnapshotSink`] - Publish / edit-in-place of the stats report
//! - [`StateStore`] - Durable pool and stats snapshots

pub mod outbound;

pub use outbound::listing::{ListingError, ServerListing, ServerPage};
pub use outbound::notifier::{Alert, LogNotifier, Notifier};
pub use outbound::publisher::{PoolPublisher, PublishReceipt};
pub use outbound::snapshot::{SinkError, SnapshotSink};
pub use outbound::store::StateStore;
