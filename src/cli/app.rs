//! Main CLI application
//!
//! `argot` turns a YAML program definition into a git-style dispatcher:
//! declared commands run as `<name>-<command>` executables found next to
//! the definition file or on `PATH`. A definition without commands prints
//! the parsed options and arguments as YAML.

use crate::command::{ArgValue, Command};
use crate::config::{build_command, parse_definition_auto, parse_definition_file, validate_definition, Definition};
use crate::error::Error;
use crate::parser::{lossy_args, report_error};
use serde_yaml::{Mapping, Value as YamlValue};
use std::path::{Path, PathBuf};
use tracing::debug;

/// CLI application
pub struct App {
    /// The command tree built from the definition
    command: Command,
    /// Path handed to the parser as the program; its directory holds local executables
    program: PathBuf,
}

impl App {
    /// Create a new app from the discovered definition file
    pub fn new() -> Result<Self, Error> {
        let (definition, path) = parse_definition_auto()?;
        Self::from_definition(definition, &path)
    }

    /// Create app with a specific definition file
    pub fn with_definition_file(path: PathBuf) -> Result<Self, Error> {
        let definition = parse_definition_file(&path)?;
        Self::from_definition(definition, &path)
    }

    /// Create app from an already parsed definition located at `path`
    pub fn from_definition(definition: Definition, path: &Path) -> Result<Self, Error> {
        validate_definition(&definition)?;
        let mut command = build_command(&definition)?;

        if definition.commands.is_empty() {
            command.action(|args, cmd| {
                print!("{}", render_report(args, cmd)?);
                Ok(())
            });
        }

        let name = definition.name.as_deref().unwrap_or("argot");
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let program = dir.join(name);
        debug!(definition = %path.display(), program = %program.display(), "loaded definition");

        Ok(App { command, program })
    }

    pub fn command(&self) -> &Command {
        &self.command
    }

    /// Run with user arguments (program name excluded) and return the exit code
    pub fn run(mut self, args: Vec<String>) -> Result<i32, Error> {
        let mut argv = vec![self.program.display().to_string()];
        argv.extend(args);

        match self.command.try_parse_from(argv) {
            Ok(outcome) => Ok(self.command.finish(outcome).unwrap_or(0)),
            Err(err) if err.wants_help() => {
                report_error(&err);
                self.command.output_help();
                Ok(err.exit_code())
            }
            Err(err) => Err(err),
        }
    }
}

/// Parsed options and positional arguments as a YAML document
fn render_report(args: &[ArgValue], cmd: &Command) -> anyhow::Result<String> {
    let mut options = Mapping::new();
    for (key, value) in cmd.opts().iter() {
        options.insert(YamlValue::from(key), serde_yaml::to_value(value)?);
    }

    let positional: Vec<&ArgValue> = args.iter().filter(|a| !matches!(a, ArgValue::Command(_))).collect();

    let mut report = Mapping::new();
    report.insert(YamlValue::from("options"), YamlValue::Mapping(options));
    report.insert(YamlValue::from("args"), serde_yaml::to_value(positional)?);
    Ok(serde_yaml::to_string(&report)?)
}

/// Run the CLI application with the process arguments
pub fn run() -> Result<i32, Error> {
    let args: Vec<String> = lossy_args(std::env::args_os().skip(1));
    let (file_path, rest) = extract_file_arg(args);

    let app = match file_path {
        Some(path) => App::with_definition_file(path)?,
        None => App::new()?,
    };

    app.run(rest)
}

/// Split a leading `--file <path>` / `-f <path>` / `--file=<path>` from the
/// user arguments
fn extract_file_arg(mut args: Vec<String>) -> (Option<PathBuf>, Vec<String>) {
    match args.first().map(String::as_str) {
        Some("--file") | Some("-f") if args.len() > 1 => {
            let rest = args.split_off(2);
            (Some(PathBuf::from(&args[1])), rest)
        }
        Some(first) if first.starts_with("--file=") => {
            let path = PathBuf::from(&first["--file=".len()..]);
            (Some(path), args.split_off(1))
        }
        _ => (None, args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_definition;

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_extract_file_arg() {
        let (path, rest) = extract_file_arg(strings(&["--file", "test.yml", "install", "x"]));
        assert_eq!(path, Some(PathBuf::from("test.yml")));
        assert_eq!(rest, strings(&["install", "x"]));
    }

    #[test]
    fn test_extract_file_arg_short_and_equals() {
        let (path, rest) = extract_file_arg(strings(&["-f", "test.yml"]));
        assert_eq!(path, Some(PathBuf::from("test.yml")));
        assert!(rest.is_empty());

        let (path, rest) = extract_file_arg(strings(&["--file=a/b.yml", "-x"]));
        assert_eq!(path, Some(PathBuf::from("a/b.yml")));
        assert_eq!(rest, strings(&["-x"]));
    }

    #[test]
    fn test_extract_file_arg_only_leading() {
        let (path, rest) = extract_file_arg(strings(&["install", "-f", "x"]));
        assert_eq!(path, None);
        assert_eq!(rest.len(), 3);
    }

    #[test]
    fn test_program_path_next_to_definition() {
        let definition = parse_definition("name: pm\ncommands:\n  - name: install\n").unwrap();
        let app = App::from_definition(definition, Path::new("/opt/tools/argot.yml")).unwrap();
        assert_eq!(app.program, PathBuf::from("/opt/tools/pm"));
        assert!(!app.command().has_action());
    }

    #[test]
    fn test_report_lists_options_and_args() {
        let definition = parse_definition(
            "name: order\narguments: \"<item> [extras...]\"\noptions:\n  - flags: \"-s, --size <size>\"\n    default: medium\n",
        )
        .unwrap();
        let mut app = App::from_definition(definition, Path::new("argot.yml")).unwrap();
        app.command.try_parse_from(["order", "pizza", "olives", "basil"]).unwrap();

        let args = app.command.args().to_vec();
        let report = render_report(&args, &app.command).unwrap();
        let parsed: YamlValue = serde_yaml::from_str(&report).unwrap();
        assert_eq!(parsed["options"]["size"], YamlValue::from("medium"));
        assert_eq!(parsed["args"][0], YamlValue::from("pizza"));
        assert_eq!(parsed["args"][1][1], YamlValue::from("basil"));
    }
}
