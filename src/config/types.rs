//! Program definition types
//!
//! This module defines the data structures that represent an argot.yml
//! program definition.

use crate::command::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level definition of a program
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Definition {
    /// Program name; external subcommands are looked up as `<name>-<command>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Flags for the version option (defaults to "-V, --version")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_flags: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Replaces the generated usage line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,

    /// Positional arguments, e.g. "<file> [rest...]"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<String>,

    #[serde(default)]
    pub allow_unknown_option: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionDef>,

    /// External subcommands, in help order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<CommandDef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complete: Option<CompletionDef>,
}

/// An option declaration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OptionDef {
    /// Flag declaration, e.g. "-c, --cheese <type>"
    pub flags: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Accepted values; a non-matching value falls back to the default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// An external subcommand declaration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CommandDef {
    /// Name followed by positional arguments, e.g. "install [name...]"
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    /// Run this command when no subcommand is given
    #[serde(default)]
    pub default: bool,

    /// Leave out of the help listing
    #[serde(default)]
    pub hidden: bool,

    /// Options listed in help and offered by completion
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionDef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complete: Option<CompletionDef>,
}

impl CommandDef {
    /// The bare command name, without positional arguments
    pub fn command_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or_default()
    }
}

/// Static completion candidates
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CompletionDef {
    /// Candidates keyed by option flag
    #[serde(default)]
    pub options: BTreeMap<String, Vec<String>>,

    /// Candidates keyed by positional argument name
    #[serde(default, alias = "args")]
    pub arguments: BTreeMap<String, Vec<String>>,
}

impl CompletionDef {
    pub fn is_empty(&self) -> bool {
        self.options.is_empty() && self.arguments.is_empty()
    }
}
