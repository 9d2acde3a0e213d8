//! Infrastructure configuration modules.

pub mod alert;
pub mod env;
pub mod listing;
pub mod logging;
pub mod pool;
pub mod server;
pub mod settings;
pub mod stats;
pub mod telegram;
