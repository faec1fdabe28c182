//! Turning a definition into a command tree

use crate::command::{Coercion, Command, SubcommandOptions};
use crate::complete::CompletionRules;
use crate::config::types::{CompletionDef, Definition, OptionDef};
use crate::error::{DefinitionError, DefinitionResult};
use regex::Regex;

/// Build the root command; every declared command becomes an external subcommand
pub fn build_command(definition: &Definition) -> DefinitionResult<Command> {
    let mut root = Command::new(definition.name.clone().unwrap_or_default());

    if let Some(version) = &definition.version {
        root.version(version, definition.version_flags.as_deref());
    }
    if let Some(description) = &definition.description {
        root.description(description);
    }
    if let Some(usage) = &definition.usage {
        root.usage(usage);
    }
    if let Some(arguments) = &definition.arguments {
        root.arguments(arguments);
    }
    root.allow_unknown_option(definition.allow_unknown_option);

    for option in &definition.options {
        add_option(&mut root, option)?;
    }

    for command in &definition.commands {
        let opts = SubcommandOptions {
            is_default: command.default,
            hidden: command.hidden,
        };
        let child = root.executable_with(&command.name, &command.description, opts);
        if let Some(alias) = &command.alias {
            child.alias(alias)?;
        }
        for option in &command.options {
            add_option(child, option)?;
        }
        if let Some(complete) = &command.complete {
            child.complete(completion_rules(complete));
        }
    }

    if let Some(complete) = &definition.complete {
        root.complete(completion_rules(complete));
    }
    Ok(root)
}

fn add_option(cmd: &mut Command, option: &OptionDef) -> DefinitionResult<()> {
    let coercion = match &option.pattern {
        Some(pattern) => Coercion::pattern(Regex::new(pattern).map_err(|e| DefinitionError::InvalidPattern {
            flags: option.flags.clone(),
            error: e.to_string(),
        })?),
        None => Coercion::None,
    };
    cmd.option_with(&option.flags, &option.description, coercion, option.default.clone());
    Ok(())
}

fn completion_rules(complete: &CompletionDef) -> CompletionRules {
    let rules = complete
        .options
        .iter()
        .fold(CompletionRules::new(), |rules, (flag, values)| rules.option(flag, values.clone()));
    complete
        .arguments
        .iter()
        .fold(rules, |rules, (name, values)| rules.argument(name, values.clone()))
}
