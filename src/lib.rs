//! Argot - command-line option parsing and git-style subcommand dispatch
//!
//! A program is described as a tree of [`Command`]s carrying options,
//! positional argument slots and handlers. Handlers either run in process
//! or delegate to a separate `<program>-<subcommand>` executable. Shell
//! autocompletion is answered from per-command completion rules.
//!
//! ```no_run
//! use argot::Command;
//!
//! let mut program = Command::new("pizza");
//! program
//!     .version("0.0.1", None)
//!     .option("-p, --peppers", "Add peppers")
//!     .option_default("-c, --cheese [type]", "Add cheese", "marble");
//! program.parse();
//!
//! println!("cheese: {}", program.get("cheese").unwrap());
//! ```

// Public modules
pub mod cli;
pub mod command;
pub mod complete;
pub mod config;
pub mod error;
pub mod parser;
pub mod runner;

// Re-export commonly used types
pub use command::{ArgValue, Coercion, Command, SubcommandOptions, Value};
pub use complete::{CompletionRules, Reply};
pub use error::{Error, Result};
pub use parser::Outcome;

/// Current version of Argot
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
