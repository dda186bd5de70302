//! Data models for the demo server.

pub mod api;

pub use api::*;
