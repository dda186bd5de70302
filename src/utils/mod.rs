//! Utility functions and helper modules.

pub mod case;

pub use case::*;
