//! HTTP request handlers for the demo server.

pub mod health;
pub mod index;

pub use health::*;
pub use index::*;
