//! Custom middleware implementations.
//!
//! This module contains the helmet middleware that applies the composed
//! security headers, and the per-request CSP nonce middleware.

pub mod nonce;
pub mod security;

pub use nonce::*;
pub use security::*;
