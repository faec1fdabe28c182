//! The command tree
//!
//! A [`Command`] owns its declared options, positional slots, child
//! commands, recorded option values and the positional arguments left over
//! from the most recent parse.

use crate::command::help::HelpHooks;
use crate::command::{parse_expected_args, ArgValue, ArgumentSlot, Coercion, OptionDescriptor, Value, ValueStore};
use crate::complete::CompletionRules;
use crate::error::{DefinitionError, DefinitionResult, Error, ParseError, ParseResult, Result};
use std::fmt;
use tracing::trace;

/// In-process handler: receives bound positional arguments and the command that owns it
pub type Action = Box<dyn FnMut(&[ArgValue], &Command) -> anyhow::Result<()>>;

/// What happens when a command is selected
#[derive(Default)]
pub enum Handler {
    /// Nothing registered
    #[default]
    Unset,
    /// Run a closure in this process
    InProcess(Action),
    /// Delegate to a separate executable named `<program>-<command>`
    External { is_default: bool },
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Unset => f.write_str("Unset"),
            Handler::InProcess(_) => f.write_str("InProcess(..)"),
            Handler::External { is_default } => f.debug_struct("External").field("is_default", is_default).finish(),
        }
    }
}

/// Extra settings for a declared subcommand
#[derive(Debug, Clone, Copy, Default)]
pub struct SubcommandOptions {
    /// Use this external subcommand when no subcommand is typed
    pub is_default: bool,
    /// Leave it out of the help listing
    pub hidden: bool,
}

/// The version flag registered by [`Command::version`]
#[derive(Debug, Clone)]
pub(crate) struct VersionFlag {
    pub text: String,
    pub key: String,
    pub option_index: usize,
}

/// A command, either the program root or a subcommand
#[derive(Debug, Default)]
pub struct Command {
    pub(crate) name: String,
    pub(crate) alias: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) args_description: Vec<(String, String)>,
    pub(crate) usage: Option<String>,
    pub(crate) slots: Vec<ArgumentSlot>,
    pub(crate) options: Vec<OptionDescriptor>,
    pub(crate) commands: Vec<Command>,
    pub(crate) handler: Handler,
    pub(crate) hidden: bool,
    pub(crate) allow_unknown_option: bool,
    pub(crate) version: Option<VersionFlag>,
    pub(crate) values: ValueStore,
    pub(crate) args: Vec<ArgValue>,
    pub(crate) completion: CompletionRules,
    pub(crate) implicit_help: bool,
    pub(crate) help_hooks: HelpHooks,
}

impl Command {
    /// Create a root command. An empty name is replaced at parse time by
    /// the stem of the program path.
    pub fn new(name: impl Into<String>) -> Self {
        Command {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Build a child from a `"name <arg> [arg...]"` declaration
    fn from_spec(spec: &str) -> Self {
        let mut words = spec.split_whitespace();
        let mut cmd = Command::new(words.next().unwrap_or_default());
        let rest: Vec<&str> = words.collect();
        cmd.slots = parse_expected_args(&rest);
        cmd
    }

    /// Declare an in-process subcommand and return it for configuration
    pub fn command(&mut self, spec: &str) -> &mut Command {
        self.command_with(spec, SubcommandOptions::default())
    }

    pub fn command_with(&mut self, spec: &str, opts: SubcommandOptions) -> &mut Command {
        let mut cmd = Command::from_spec(spec);
        cmd.hidden = opts.hidden;
        self.push_command(cmd)
    }

    /// Declare a subcommand implemented by the executable `<program>-<name>`
    pub fn executable(&mut self, spec: &str, description: &str) -> &mut Command {
        self.executable_with(spec, description, SubcommandOptions::default())
    }

    pub fn executable_with(&mut self, spec: &str, description: &str, opts: SubcommandOptions) -> &mut Command {
        let mut cmd = Command::from_spec(spec);
        cmd.description = Some(description.to_string());
        cmd.hidden = opts.hidden;
        cmd.handler = Handler::External {
            is_default: opts.is_default,
        };
        self.push_command(cmd)
    }

    fn push_command(&mut self, cmd: Command) -> &mut Command {
        trace!(parent = %self.name, command = %cmd.name, "declared subcommand");
        self.commands.push(cmd);
        let last = self.commands.len() - 1;
        &mut self.commands[last]
    }

    /// Declare the positional slots of this command, e.g. `"<file> [rest...]"`
    pub fn arguments(&mut self, spec: &str) -> &mut Self {
        let tokens: Vec<&str> = spec.split_whitespace().collect();
        self.slots = parse_expected_args(&tokens);
        self
    }

    /// Declare an option without coercion or default
    pub fn option(&mut self, flags: &str, description: &str) -> &mut Self {
        self.option_with(flags, description, Coercion::None, None)
    }

    pub fn option_default(&mut self, flags: &str, description: &str, default: impl Into<Value>) -> &mut Self {
        self.option_with(flags, description, Coercion::None, Some(default.into()))
    }

    /// Declare an option with a coercion strategy and an optional default
    ///
    /// Negated `--no-*` options always default to `true`. The default is
    /// recorded immediately for negated and value-taking options.
    pub fn option_with(
        &mut self,
        flags: &str,
        description: &str,
        coercion: Coercion,
        default: Option<Value>,
    ) -> &mut Self {
        let mut option = OptionDescriptor::parse(flags, description).with_coercion(coercion);
        let mut default = default;
        if option.preassigns_default() {
            if !option.bool {
                default = Some(Value::Bool(true));
            }
            if let Some(value) = &default {
                self.values.set(&option.attribute_name(), value.clone());
            }
        }
        option = option.with_default(default);
        self.options.push(option);
        self
    }

    /// Register a version flag, `-V, --version` unless `flags` is given
    pub fn version(&mut self, text: &str, flags: Option<&str>) -> &mut Self {
        let option = OptionDescriptor::parse(flags.unwrap_or("-V, --version"), "output the version number");
        let key = match option.long.strip_prefix("--") {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => "version".to_string(),
        };
        self.version = Some(VersionFlag {
            text: text.to_string(),
            key,
            option_index: self.options.len(),
        });
        self.options.push(option);
        self
    }

    /// Register the in-process handler
    pub fn action<F>(&mut self, f: F) -> &mut Self
    where
        F: FnMut(&[ArgValue], &Command) -> anyhow::Result<()> + 'static,
    {
        self.handler = Handler::InProcess(Box::new(f));
        self
    }

    pub fn alias(&mut self, alias: &str) -> DefinitionResult<&mut Self> {
        if alias == self.name {
            return Err(DefinitionError::AliasCollision);
        }
        self.alias = Some(alias.to_string());
        Ok(self)
    }

    pub fn name(&mut self, name: &str) -> &mut Self {
        self.name = name.to_string();
        self
    }

    pub fn description(&mut self, text: &str) -> &mut Self {
        self.description = Some(text.to_string());
        self
    }

    /// Describe positional arguments for the help `Arguments:` block
    pub fn args_description<I, K, V>(&mut self, descriptions: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.args_description = descriptions.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self
    }

    /// Replace the generated usage line
    pub fn usage(&mut self, text: &str) -> &mut Self {
        self.usage = Some(text.to_string());
        self
    }

    pub fn allow_unknown_option(&mut self, allow: bool) -> &mut Self {
        self.allow_unknown_option = allow;
        self
    }

    /// Attach autocompletion rules
    pub fn complete(&mut self, rules: CompletionRules) -> &mut Self {
        self.completion = rules;
        self
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn get_description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_external(&self) -> bool {
        matches!(self.handler, Handler::External { .. })
    }

    pub fn has_action(&self) -> bool {
        matches!(self.handler, Handler::InProcess(_))
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn options(&self) -> &[OptionDescriptor] {
        &self.options
    }

    pub fn slots(&self) -> &[ArgumentSlot] {
        &self.slots
    }

    pub fn completion_rules(&self) -> &CompletionRules {
        &self.completion
    }

    /// Positional arguments from the last parse
    ///
    /// After an in-process subcommand ran, this holds the bound values
    /// followed by the subcommand marker.
    pub fn args(&self) -> &[ArgValue] {
        &self.args
    }

    /// Child whose name or alias equals `name`
    pub fn find_command(&self, name: &str) -> Option<&Command> {
        self.position_of(name).map(|index| &self.commands[index])
    }

    pub fn find_command_mut(&mut self, name: &str) -> Option<&mut Command> {
        self.position_of(name).map(move |index| &mut self.commands[index])
    }

    pub(crate) fn position_of(&self, name: &str) -> Option<usize> {
        self.commands
            .iter()
            .position(|cmd| cmd.name == name || cmd.alias.as_deref() == Some(name))
    }

    /// Whether any child is an external subcommand
    pub fn has_executables(&self) -> bool {
        self.commands.iter().any(Command::is_external)
    }

    /// Name of the external subcommand used when none is typed
    pub fn default_executable(&self) -> Option<&str> {
        self.commands.iter().find_map(|cmd| match cmd.handler {
            Handler::External { is_default: true } => Some(cmd.name.as_str()),
            _ => None,
        })
    }

    /// Recorded value of an option, by attribute key
    pub fn get(&self, key: &str) -> Result<&Value> {
        self.values
            .get(key)
            .ok_or_else(|| Error::OptionNotFound(key.to_string()))
    }

    /// Snapshot of all option values, with the version text under the version key
    pub fn opts(&self) -> ValueStore {
        let mut out = ValueStore::new();
        for option in &self.options {
            let key = option.attribute_name();
            match &self.version {
                Some(version) if version.key == key => out.set(&key, Value::Str(version.text.clone())),
                _ => {
                    if let Some(value) = self.values.get(&key) {
                        out.set(&key, value.clone());
                    }
                }
            }
        }
        out
    }

    pub(crate) fn version_text(&self) -> Option<&str> {
        self.version.as_ref().map(|v| v.text.as_str())
    }

    pub(crate) fn is_version_option(&self, index: usize) -> bool {
        self.version.as_ref().is_some_and(|v| v.option_index == index)
    }

    /// Record one occurrence of the option at `index`
    pub(crate) fn record_option(&mut self, index: usize, raw: Option<&str>) -> ParseResult<()> {
        let option = &self.options[index];
        let key = option.attribute_name();
        let resolved = option
            .resolve(raw, self.values.get(&key))
            .map_err(|e| ParseError::InvalidOptionValue {
                flags: option.flags.clone(),
                error: format!("{:#}", e),
            })?;
        if let Some(value) = resolved {
            trace!(command = %self.name, key = %key, value = %value, "recorded option");
            self.values.set(&key, value);
        }
        Ok(())
    }

    /// Add the external `help [cmd]` subcommand once
    pub(crate) fn add_implicit_help_command(&mut self) {
        if self.implicit_help || self.position_of("help").is_some() {
            return;
        }
        self.implicit_help = true;
        self.executable("help [cmd]", "display help for [cmd]");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_spec_parses_slots() {
        let mut program = Command::new("test");
        let cmd = program.command("mycommand <id> [variadicArg...]");
        assert_eq!(cmd.get_name(), "mycommand");
        assert_eq!(cmd.slots().len(), 2);
        assert!(cmd.slots()[1].variadic);
        assert!(!cmd.is_external());
    }

    #[test]
    fn test_executable_flags() {
        let mut program = Command::new("pm");
        program.executable("install [name]", "install one or more packages");
        program.executable_with(
            "default",
            "default command",
            SubcommandOptions { is_default: true, hidden: true },
        );
        assert!(program.has_executables());
        assert_eq!(program.default_executable(), Some("default"));
        assert!(program.find_command("default").unwrap().is_hidden());
    }

    #[test]
    fn test_alias_collision() {
        let mut program = Command::new("test");
        let err = program.command("exec").alias("exec").unwrap_err();
        assert_eq!(err.to_string(), "Command alias can't be the same as its name");
    }

    #[test]
    fn test_find_by_alias() {
        let mut program = Command::new("test");
        program.command("exec <cmd>").alias("ex").unwrap();
        assert_eq!(program.find_command("ex").unwrap().get_name(), "exec");
    }

    #[test]
    fn test_default_preassignment() {
        let mut program = Command::new("test");
        program
            .option("-p, --pepper", "add pepper")
            .option("-c, --no-cheese", "remove cheese")
            .option_default("-s, --sauce <type>", "sauce", "tomato")
            .option_default("-l, --loud", "loud", false);

        assert!(program.get("pepper").is_err());
        assert_eq!(program.get("cheese").unwrap(), &Value::Bool(true));
        assert_eq!(program.get("sauce").unwrap(), &Value::from("tomato"));
        assert!(program.get("loud").is_err());
    }

    #[test]
    fn test_opts_reports_version() {
        let mut program = Command::new("test");
        program.version("0.0.1", None).option("-f, --foo", "add some foo");
        program.values.set("foo", Value::Bool(true));

        let opts = program.opts();
        assert_eq!(opts.get("version"), Some(&Value::from("0.0.1")));
        assert_eq!(opts.get("foo"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_custom_version_flags() {
        let mut program = Command::new("test");
        program.version("1.2.3", Some("-v, --vers"));
        assert_eq!(program.opts().get("vers"), Some(&Value::from("1.2.3")));
    }

    #[test]
    fn test_implicit_help_added_once() {
        let mut program = Command::new("pm");
        program.executable("install", "install");
        program.add_implicit_help_command();
        program.add_implicit_help_command();
        assert_eq!(program.commands().iter().filter(|c| c.get_name() == "help").count(), 1);
    }
}
