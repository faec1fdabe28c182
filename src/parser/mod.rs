//! Command-line parsing
//!
//! Raw tokens are normalized, matched against the options of the command
//! being parsed, and the remainder is resolved to a handler.

pub mod dispatch;
pub mod matcher;
pub mod process;
pub mod tokenize;

// Re-export main types
pub use dispatch::*;
pub use matcher::*;
pub use process::*;
pub use tokenize::*;
