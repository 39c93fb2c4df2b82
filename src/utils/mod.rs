//! Utilities
//!
//! Common utilities used throughout the analyzer.

pub mod error;

pub use error::*;
