//! Shell autocompletion
//!
//! Completion rules are declared per command; candidates are computed from
//! the words typed so far and answered through a small shell protocol.

pub mod candidates;
pub mod rules;
pub mod shell;

pub use candidates::*;
pub use rules::*;
pub use shell::*;
