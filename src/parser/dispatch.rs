//! Command resolution and dispatch
//!
//! After a command's own options are matched, the first positional token
//! selects what runs, first match wins:
//!
//! 1. a child (by name or alias) with an in-process action
//! 2. a child implemented by an external executable
//! 3. a child without an action that has children of its own, which
//!    repeats this resolution one level down
//! 4. the default external subcommand, receiving every positional token
//! 5. the wildcard action, receiving every positional token
//!
//! Without a positional token, help and unknown options are checked
//! before the default external subcommand or the wildcard action run.

use crate::command::{bind_arguments, ArgValue, Command, Handler};
use crate::complete::{completion_script, ShellRequest};
use crate::error::{ExecutionError, ParseError, Result};
use crate::parser::matcher::wants_help;
use crate::parser::{match_options, normalize};
use crate::runner::{ExternalInvocation, ExternalResolver};
use std::mem;
use std::path::Path;
use tracing::debug;

/// The result of a successful parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Options were recorded; no handler was selected
    Parsed,
    /// The in-process action of the named command ran
    Dispatched(String),
    /// Help was requested; the rendered text
    Help(String),
    /// The version flag was given; the version text
    Version(String),
    /// Control belongs to an external executable
    External(ExternalInvocation),
    /// Completion candidates for the shell
    Completion(Vec<String>),
    /// A shell init script
    CompletionScript(String),
}

enum Wildcard {
    Child(usize),
    Own,
}

/// File stem of the program path, used as the default command name
pub(crate) fn program_stem(program: &str) -> String {
    Path::new(program)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl Command {
    /// Parse an argument vector whose first element is the program path
    ///
    /// Option values are recorded on the commands they belong to and an
    /// in-process action may run. Nothing is printed and the process is
    /// never exited; see [`Command::parse_from`] for that.
    pub fn try_parse_from<I, T>(&mut self, argv: I) -> Result<Outcome>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut argv = argv.into_iter().map(Into::into);
        let program: String = argv.next().unwrap_or_default();
        let mut user_args: Vec<String> = argv.collect();
        self.clear_help_requests();

        if self.has_completion_rules() {
            if let Some(request) = ShellRequest::detect(&user_args) {
                debug!(request = ?request, "completion request");
                return Ok(match request {
                    ShellRequest::Script(shell) => Outcome::CompletionScript(completion_script(shell, &program_stem(&program))),
                    ShellRequest::Complete(event) => Outcome::Completion(self.handle_completion_event(&event)),
                });
            }
        }

        if self.has_executables() {
            self.add_implicit_help_command();
        }
        if self.name.is_empty() {
            self.name = program_stem(&program);
        }
        if self.has_executables() && user_args.is_empty() && self.default_executable().is_none() {
            user_args.push("--help".to_string());
        }

        let tokens = normalize(&user_args, &self.options);
        let matched = match_options(self, &tokens)?;
        if matched.version_requested {
            return Ok(Outcome::Version(self.version_text().unwrap_or_default().to_string()));
        }

        self.args = matched.args.iter().cloned().map(ArgValue::Value).collect();
        let resolver = ExternalResolver::from_program(&program);
        self.resolve(&resolver, "", matched.args, matched.unknown)
    }

    /// Pick the handler for `args`; `prefix` names the enclosing subcommands
    fn resolve(&mut self, resolver: &ExternalResolver, prefix: &str, args: Vec<String>, unknown: Vec<String>) -> Result<Outcome> {
        let Some(first) = args.first().cloned() else {
            return self.resolve_without_positionals(resolver, prefix, unknown);
        };
        let rest = args[1..].to_vec();

        if let Some(index) = self.position_of(&first) {
            let child = &mut self.commands[index];
            debug!(token = %first, command = %child.name, handler = ?child.handler, "matched subcommand");
            match child.handler {
                Handler::InProcess(_) => {
                    let outcome = invoke_action(child, rest, unknown)?;
                    self.args = self.commands[index].args.clone();
                    return Ok(outcome);
                }
                Handler::External { .. } => {
                    let name = child.name.clone();
                    return self.delegate(resolver, prefix, &name, rest, unknown);
                }
                Handler::Unset if !child.commands.is_empty() => {
                    let matched = match_options(child, &unknown)?;
                    let mut child_args = matched.args;
                    child_args.extend(rest);
                    let scope = scoped(prefix, &child.name);
                    return child.resolve(resolver, &scope, child_args, matched.unknown);
                }
                Handler::Unset => {}
            }
        }

        if let Some(default) = self.default_executable().map(str::to_string) {
            debug!(token = %first, default = %default, "no subcommand matched, using default");
            return self.delegate(resolver, prefix, &default, args, unknown);
        }

        match self.wildcard() {
            Some(Wildcard::Child(index)) => {
                let outcome = invoke_action(&mut self.commands[index], args, unknown)?;
                self.args = self.commands[index].args.clone();
                Ok(outcome)
            }
            Some(Wildcard::Own) => invoke_action(self, args, unknown),
            None if !self.commands.is_empty() => Err(ParseError::UnknownCommand(first).into()),
            None => self.check_leftovers(&unknown),
        }
    }

    fn resolve_without_positionals(&mut self, resolver: &ExternalResolver, prefix: &str, unknown: Vec<String>) -> Result<Outcome> {
        if let outcome @ Outcome::Help(_) = self.check_leftovers(&unknown)? {
            return Ok(outcome);
        }

        if let Some(default) = self.default_executable().map(str::to_string) {
            return self.delegate(resolver, prefix, &default, Vec::new(), unknown);
        }

        let slots_satisfied = !self.slots.iter().any(|slot| slot.required);
        if self.commands.is_empty() && slots_satisfied && self.has_action() {
            return invoke_action(self, Vec::new(), unknown);
        }
        Ok(Outcome::Parsed)
    }

    /// Help request or unknown-option error for tokens nothing else will consume
    fn check_leftovers(&mut self, unknown: &[String]) -> Result<Outcome> {
        if wants_help(unknown) {
            return Ok(Outcome::Help(self.take_help_request()));
        }
        match unknown.first() {
            Some(flag) if !self.allow_unknown_option => Err(ParseError::UnknownOption(flag.clone()).into()),
            _ => Ok(Outcome::Parsed),
        }
    }

    fn wildcard(&self) -> Option<Wildcard> {
        self.commands
            .iter()
            .position(|cmd| cmd.name == "*" && cmd.has_action())
            .map(Wildcard::Child)
            .or_else(|| self.has_action().then_some(Wildcard::Own))
    }

    /// Hand the rest of the line to `<program>-<name>`
    ///
    /// `help` alone renders this command's help; `help <sub>` becomes
    /// `<sub> --help`.
    fn delegate(
        &mut self,
        resolver: &ExternalResolver,
        prefix: &str,
        name: &str,
        args: Vec<String>,
        unknown: Vec<String>,
    ) -> Result<Outcome> {
        let mut line = vec![name.to_string()];
        line.extend(args);
        line.extend(unknown);

        if line[0] == "help" {
            if line.len() == 1 {
                return Ok(Outcome::Help(self.take_help_request()));
            }
            line.swap(0, 1);
            line[1] = "--help".to_string();
        }

        let subcommand = line.remove(0);
        let invocation = resolver.resolve(&scoped(prefix, &subcommand), line);
        Ok(Outcome::External(invocation))
    }
}

fn scoped(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}-{}", prefix, name)
    }
}

/// Match `cmd`'s options in `unknown`, bind positionals and run its action
fn invoke_action(cmd: &mut Command, args: Vec<String>, unknown: Vec<String>) -> Result<Outcome> {
    let matched = match_options(cmd, &unknown)?;
    if matched.wants_help() {
        return Ok(Outcome::Help(cmd.take_help_request()));
    }
    if let Some(flag) = matched.unknown.first() {
        if !cmd.allow_unknown_option {
            return Err(ParseError::UnknownOption(flag.clone()).into());
        }
    }

    let mut tokens = matched.args;
    tokens.extend(args);
    let bound = bind_arguments(&cmd.slots, tokens, &cmd.name)?;
    cmd.args = bound.clone();

    debug!(command = %cmd.name, args = ?bound, "invoking action");
    let mut handler = mem::take(&mut cmd.handler);
    let result = match &mut handler {
        Handler::InProcess(action) => action(&bound, cmd),
        _ => Ok(()),
    };
    cmd.handler = handler;
    result.map_err(ExecutionError::Action)?;

    Ok(Outcome::Dispatched(cmd.name.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Value;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_program_stem() {
        assert_eq!(program_stem("/usr/bin/pm.js"), "pm");
        assert_eq!(program_stem("pm"), "pm");
        assert_eq!(program_stem(""), "");
    }

    #[test]
    fn test_name_guessed_from_program() {
        let mut program = Command::new("");
        program.try_parse_from(["/tmp/bin/tool.exe"]).unwrap();
        assert_eq!(program.get_name(), "tool");
    }

    #[test]
    fn test_subcommand_options_from_unknown() {
        let seen = Rc::new(RefCell::new(None));
        let mut program = Command::new("test");
        program.option("-c, --config <path>", "config");
        {
            let seen = seen.clone();
            program
                .command("setup [env]")
                .option("-s, --setup_mode [mode]", "mode")
                .action(move |args, _| {
                    *seen.borrow_mut() = args[0].as_str().map(str::to_string);
                    Ok(())
                });
        }

        let outcome = program
            .try_parse_from(["test", "--config", "conf1", "setup", "--setup_mode", "mode2", "env1"])
            .unwrap();
        assert_eq!(outcome, Outcome::Dispatched("setup".to_string()));
        assert_eq!(program.get("config").unwrap(), &Value::from("conf1"));
        assert_eq!(program.find_command("setup").unwrap().get("setup_mode").unwrap(), &Value::from("mode2"));
        assert_eq!(seen.borrow().as_deref(), Some("env1"));
    }

    #[test]
    fn test_action_error_propagates() {
        let mut program = Command::new("test");
        program.command("fail").action(|_, _| anyhow::bail!("boom"));
        let err = program.try_parse_from(["test", "fail"]).unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert!(program.find_command("fail").unwrap().has_action());
    }

    #[test]
    fn test_help_subcommand_rewrites() {
        let mut program = Command::new("pm");
        program.executable("install [name]", "install");

        match program.try_parse_from(["/opt/pm", "help", "install"]).unwrap() {
            Outcome::External(invocation) => {
                assert_eq!(invocation.name, "pm-install");
                assert_eq!(invocation.args, vec!["--help"]);
            }
            other => panic!("unexpected outcome {:?}", other),
        }

        assert!(matches!(program.try_parse_from(["/opt/pm", "help"]).unwrap(), Outcome::Help(_)));
    }

    #[test]
    fn test_nested_resolution() {
        let mut program = Command::new("pm");
        program.command("cache").executable("clear", "clear the cache");

        match program.try_parse_from(["/opt/pm", "cache", "clear", "--all"]).unwrap() {
            Outcome::External(invocation) => {
                assert_eq!(invocation.name, "pm-cache-clear");
                assert_eq!(invocation.args, vec!["--all"]);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }
}
