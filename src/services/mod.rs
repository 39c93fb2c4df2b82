//! Services
//!
//! Business logic services for the analyzer.

pub mod analysis;
