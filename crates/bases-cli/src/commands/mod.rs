//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `advice` - Recommendation and alert commands
//! - `analysis` - Indicators, projection and scenario commands
//! - `common` - Shared utilities (config, JSON input/output, advisor wiring)
//! - `decisions` - Decision history commands (record, history)
//! - `simulate` - Simulation contract and metrics commands
//! - `store` - File-backed history collaborator

pub mod advice;
pub mod analysis;
pub mod common;
pub mod decisions;
pub mod simulate;
pub mod store;

// Re-export command functions for main.rs
pub use advice::*;
pub use analysis::*;
pub use common::*;
pub use decisions::*;
pub use simulate::*;
