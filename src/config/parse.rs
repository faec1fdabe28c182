//! Definition file parsing and discovery

use crate::config::types::Definition;
use crate::error::{DefinitionError, DefinitionResult, Error};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Definition file names to search for
const DEFINITION_FILE_NAMES: &[&str] = &["argot.yml", "argot.yaml"];

/// Find the definition file by searching current and parent directories
pub fn find_definition_file() -> DefinitionResult<PathBuf> {
    find_definition_file_from(env::current_dir().map_err(|e| {
        DefinitionError::Invalid(format!("Failed to get current directory: {}", e))
    })?)
}

/// Find the definition file starting from a specific directory
pub fn find_definition_file_from(start_dir: PathBuf) -> DefinitionResult<PathBuf> {
    let mut current_dir = start_dir;
    let mut searched_paths = Vec::new();

    loop {
        for file_name in DEFINITION_FILE_NAMES {
            let path = current_dir.join(file_name);
            searched_paths.push(path.display().to_string());

            if path.is_file() {
                debug!(path = %path.display(), "found definition file");
                return Ok(path);
            }
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => return Err(DefinitionError::NotFound(searched_paths.join(", "))),
        }
    }
}

/// Parse a definition file from a path
pub fn parse_definition_file(path: &Path) -> Result<Definition, Error> {
    let contents = fs::read_to_string(path).map_err(|e| DefinitionError::Unreadable {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;

    parse_definition(&contents)
}

/// Parse a definition from a string
pub fn parse_definition(yaml: &str) -> Result<Definition, Error> {
    let definition: Definition = serde_yaml::from_str(yaml)?;
    Ok(definition)
}

/// Parse a definition with automatic file discovery
pub fn parse_definition_auto() -> Result<(Definition, PathBuf), Error> {
    let path = find_definition_file()?;
    let definition = parse_definition_file(&path)?;
    Ok((definition, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Value;
    use tempfile::TempDir;

    #[test]
    fn test_parse_simple_definition() {
        let yaml = r#"
name: pm
version: 0.0.1
options:
  - flags: "-c, --cheese [type]"
    description: add cheese
    default: mozzarella
commands:
  - name: install [name...]
    description: install one or more packages
    alias: i
"#;
        let definition = parse_definition(yaml).unwrap();
        assert_eq!(definition.name.as_deref(), Some("pm"));
        assert_eq!(definition.options[0].default, Some(Value::from("mozzarella")));
        assert_eq!(definition.commands[0].command_name(), "install");
        assert_eq!(definition.commands[0].alias.as_deref(), Some("i"));
        assert!(!definition.commands[0].default);
    }

    #[test]
    fn test_parse_completion_args_alias() {
        let yaml = r#"
complete:
  options:
    --output: [file1, file2]
  args:
    filename: [file1.c]
"#;
        let definition = parse_definition(yaml).unwrap();
        let complete = definition.complete.unwrap();
        assert_eq!(complete.options["--output"], vec!["file1", "file2"]);
        assert_eq!(complete.arguments["filename"], vec!["file1.c"]);
    }

    #[test]
    fn test_find_definition_in_current_dir() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("argot.yml");
        fs::write(&path, "name: pm\n").unwrap();

        let found = find_definition_file_from(temp_dir.path().to_path_buf()).unwrap();
        assert_eq!(found, path);
    }

    #[test]
    fn test_find_definition_in_parent_dir() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("argot.yaml");
        let sub_dir = temp_dir.path().join("a").join("b");
        fs::write(&path, "name: pm\n").unwrap();
        fs::create_dir_all(&sub_dir).unwrap();

        let found = find_definition_file_from(sub_dir).unwrap();
        assert_eq!(found, path);
    }

    #[test]
    fn test_invalid_yaml() {
        let err = parse_definition("commands: [name: }").unwrap_err();
        assert!(err.to_string().starts_with("YAML parsing error"));
    }
}
