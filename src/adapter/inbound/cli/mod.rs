//! Command-line entry points.

pub mod check;
pub mod command;
pub mod run;

pub use command::{Cli, Commands};
