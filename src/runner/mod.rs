//! External subcommand execution
//!
//! This module resolves `<program>-<subcommand>` executables and runs them
//! with inherited stdio, forwarding signals and propagating exit codes.

pub mod command;
pub mod external;
#[cfg(unix)]
pub mod signals;

// Re-export main types
pub use command::*;
pub use external::*;
