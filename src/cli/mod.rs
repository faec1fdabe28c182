//! CLI interface
//!
//! This module holds the `argot` binary's application layer: loading a
//! program definition, dispatching the command line through it, and
//! logging setup.

pub mod app;
pub mod logging;

// Re-export main types
pub use app::*;
pub use logging::*;
