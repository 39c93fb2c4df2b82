//! Data Models
//!
//! Configuration and view structures shared by the analysis services.

pub mod analysis;
pub mod settings;

pub use analysis::*;
pub use settings::*;
