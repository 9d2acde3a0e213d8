//! HTTP adapter for the upstream server listing.

mod client;
mod dto;

pub use client::{listing_url, HttpServerListing};
