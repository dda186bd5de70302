//! Configuration structures and loading utilities.
//!
//! This module contains the top-level helmet options, the static capability
//! table they are validated against, and environment loading.

pub mod capability;
pub mod security;

pub use capability::*;
pub use security::*;
