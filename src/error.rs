//! Error types for Argot

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Argot operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Argot
///
/// The `Display` output of every variant is a single line suitable for
/// printing after an `error:` prefix.
#[derive(Error, Debug)]
pub enum Error {
    /// Command-line parsing errors
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Program definition errors
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    /// Subcommand execution errors
    #[error(transparent)]
    Execution(#[from] ExecutionError),

    /// Lookup of an option value that was never recorded
    #[error("Option \"{0}\" does not exist")]
    OptionNotFound(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        1
    }

    /// Whether the front end should follow the diagnostic with the help text
    pub fn wants_help(&self) -> bool {
        matches!(self, Error::Parse(ParseError::UnknownCommand(_)))
    }
}

/// Errors raised while matching tokens against a command
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("option `{0}` argument missing")]
    MissingOptionArgument(String),

    #[error("missing required argument `{0}`")]
    MissingRequiredArgument(String),

    #[error("variadic arguments must be last `{0}`")]
    VariadicNotLast(String),

    #[error("unknown option `{0}`")]
    UnknownOption(String),

    #[error("unknown command {0}")]
    UnknownCommand(String),

    #[error("invalid value for option `{flags}`: {error}")]
    InvalidOptionValue { flags: String, error: String },
}

/// Errors in how a program or its definition file is declared
#[derive(Error, Debug)]
pub enum DefinitionError {
    #[error("Failed to find definition file (searched: {0})")]
    NotFound(String),

    #[error("Failed to read definition file '{path}': {error}")]
    Unreadable { path: PathBuf, error: String },

    #[error("Invalid definition: {0}")]
    Invalid(String),

    #[error("Command alias can't be the same as its name")]
    AliasCollision,

    #[error("Command '{0}' is declared more than once")]
    DuplicateCommand(String),

    #[error("Invalid pattern for option '{flags}': {error}")]
    InvalidPattern { flags: String, error: String },
}

/// Errors raised while running a subcommand
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("{0}(1) does not exist, try --help")]
    NotFound(String),

    #[error("{0}(1) not executable. try chmod or run with root")]
    NotExecutable(String),

    #[error("Failed to spawn '{name}': {error}")]
    Spawn { name: String, error: String },

    #[error("{0:#}")]
    Action(anyhow::Error),
}

/// Specialized result type for parse operations
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Specialized result type for definition operations
pub type DefinitionResult<T> = std::result::Result<T, DefinitionError>;

/// Specialized result type for execution operations
pub type ExecutionResult<T> = std::result::Result<T, ExecutionError>;
