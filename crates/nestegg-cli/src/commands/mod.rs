//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Core commands (init, averages, status) and shared utilities (open_db)
//! - `import` - Transaction history CSV import
//! - `serve` - Web server command
//! - `train` - Model training command

pub mod core;
pub mod import;
pub mod serve;
pub mod train;

// Re-export command functions for main.rs
pub use core::*;
pub use import::*;
pub use serve::*;
pub use train::*;
