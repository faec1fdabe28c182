//! Process front end: printing, spawning and exiting

use crate::command::Command;
use crate::error::Error;
use crate::parser::Outcome;
use crate::runner::execute_external;
use colored::Colorize;
use std::ffi::OsString;
use std::process;
use tracing::warn;

/// Print a one-line diagnostic to stderr
pub fn report_error(err: &Error) {
    eprintln!("{} {}", "error:".red().bold(), err);
}

impl Outcome {
    /// Carry out the outcome's side effects
    ///
    /// Returns the exit code when the process should end now, `None` when
    /// the program should carry on.
    pub fn finish(self) -> Option<i32> {
        match self {
            Outcome::Parsed | Outcome::Dispatched(_) => None,
            Outcome::Help(text) | Outcome::CompletionScript(text) => {
                print!("{}", text);
                Some(0)
            }
            Outcome::Version(text) => {
                println!("{}", text);
                Some(0)
            }
            Outcome::Completion(candidates) => {
                for candidate in candidates {
                    println!("{}", candidate);
                }
                Some(0)
            }
            Outcome::External(invocation) => match execute_external(&invocation) {
                Ok(code) => Some(code),
                Err(e) => {
                    let err = Error::from(e);
                    report_error(&err);
                    Some(err.exit_code())
                }
            },
        }
    }
}

/// Convert process arguments to strings, replacing invalid UTF-8
pub fn lossy_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| match arg.into_string() {
            Ok(arg) => arg,
            Err(raw) => {
                let arg = raw.to_string_lossy().into_owned();
                warn!(argument = %arg, "argument is not valid UTF-8");
                arg
            }
        })
        .collect()
}

impl Command {
    /// Parse the current process arguments; see [`Command::parse_from`]
    pub fn parse(&mut self) -> &mut Self {
        self.parse_from(lossy_args(std::env::args_os()))
    }

    /// Carry out `outcome` and notify the help listener of the command
    /// whose help was printed
    pub fn finish(&mut self, outcome: Outcome) -> Option<i32> {
        let help = matches!(outcome, Outcome::Help(_));
        let code = outcome.finish();
        if help {
            self.notify_requested_help();
        }
        code
    }

    /// Parse `argv` and act on the outcome like a finished program would
    ///
    /// Help, version and completion output go to stdout and exit 0. An
    /// external subcommand runs in the foreground and its exit code is
    /// propagated. Errors print `error: <message>` to stderr and exit 1.
    /// Returns only when parsing finished without any of those.
    pub fn parse_from<I, T>(&mut self, argv: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        match self.try_parse_from(argv) {
            Ok(outcome) => {
                if let Some(code) = self.finish(outcome) {
                    process::exit(code);
                }
                self
            }
            Err(err) => {
                report_error(&err);
                if err.wants_help() {
                    self.output_help();
                }
                process::exit(err.exit_code());
            }
        }
    }
}
