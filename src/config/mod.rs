//! Program definitions
//!
//! This module handles parsing of argot.yml definition files, their
//! validation, and building a command tree from them.

pub mod build;
pub mod parse;
pub mod schema;
pub mod types;

// Re-export main types
pub use build::*;
pub use parse::*;
pub use schema::*;
pub use types::*;
