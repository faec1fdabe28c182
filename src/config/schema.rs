//! Definition validation
//!
//! This module rejects definitions that cannot be turned into a command tree.

use crate::config::types::{CommandDef, Definition, OptionDef};
use crate::error::{DefinitionError, DefinitionResult};
use regex::Regex;
use std::collections::HashSet;

/// Validate a complete definition
pub fn validate_definition(definition: &Definition) -> DefinitionResult<()> {
    for option in &definition.options {
        validate_option(option)?;
    }

    let mut seen = HashSet::new();
    for command in &definition.commands {
        validate_command(command)?;

        let names = std::iter::once(command.command_name()).chain(command.alias.as_deref());
        for name in names {
            if !seen.insert(name.to_string()) {
                return Err(DefinitionError::DuplicateCommand(name.to_string()));
            }
        }
    }

    let defaults: Vec<&str> = definition
        .commands
        .iter()
        .filter(|c| c.default)
        .map(CommandDef::command_name)
        .collect();
    if defaults.len() > 1 {
        return Err(DefinitionError::Invalid(format!(
            "Only one default command is allowed, found: {}",
            defaults.join(", ")
        )));
    }

    Ok(())
}

/// Validate a single command
pub fn validate_command(command: &CommandDef) -> DefinitionResult<()> {
    let name = command.command_name();
    if name.is_empty() {
        return Err(DefinitionError::Invalid("Command name cannot be empty".to_string()));
    }
    if name == "*" {
        return Err(DefinitionError::Invalid(
            "Wildcard commands cannot be external".to_string(),
        ));
    }
    if command.alias.as_deref() == Some(name) {
        return Err(DefinitionError::AliasCollision);
    }
    for option in &command.options {
        validate_option(option)?;
    }
    Ok(())
}

/// Validate an option declaration
pub fn validate_option(option: &OptionDef) -> DefinitionResult<()> {
    if option.flags.trim().is_empty() {
        return Err(DefinitionError::Invalid("Option flags cannot be empty".to_string()));
    }
    if let Some(pattern) = &option.pattern {
        Regex::new(pattern).map_err(|e| DefinitionError::InvalidPattern {
            flags: option.flags.clone(),
            error: e.to_string(),
        })?;
    }
    Ok(())
}
