//! Locating the executable behind an external subcommand
//!
//! `<program> install` runs `<program>-install`. The executable is looked
//! up next to the program (following one level of symlink) and falls back
//! to the bare name on `PATH`.

use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where an external subcommand lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Executable {
    /// A script run through an interpreter
    Script { interpreter: String, path: PathBuf },
    /// A file next to the program
    Local(PathBuf),
    /// A bare name resolved through `PATH` at spawn time
    OnPath(String),
}

/// The path that is run, or the bare name for a `PATH` lookup
impl fmt::Display for Executable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Executable::Script { path, .. } | Executable::Local(path) => write!(f, "{}", path.display()),
            Executable::OnPath(name) => f.write_str(name),
        }
    }
}

/// A fully resolved external subcommand call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalInvocation {
    /// `<program>-<subcommand>`
    pub name: String,
    pub executable: Executable,
    pub args: Vec<String>,
}

/// Resolves subcommand executables relative to a program path
#[derive(Debug, Clone)]
pub struct ExternalResolver {
    program: PathBuf,
    /// Extension and interpreter, in lookup order
    script_runners: Vec<(String, String)>,
}

impl ExternalResolver {
    pub fn from_program(program: impl Into<PathBuf>) -> Self {
        ExternalResolver {
            program: program.into(),
            script_runners: vec![
                ("js".to_string(), "node".to_string()),
                ("ts".to_string(), "node".to_string()),
            ],
        }
    }

    /// Replace the script extension table
    pub fn with_script_runners<I, E, R>(mut self, runners: I) -> Self
    where
        I: IntoIterator<Item = (E, R)>,
        E: Into<String>,
        R: Into<String>,
    {
        self.script_runners = runners.into_iter().map(|(e, r)| (e.into(), r.into())).collect();
        self
    }

    /// `<program stem>-<subcommand>`
    pub fn executable_name(&self, subcommand: &str) -> String {
        let stem = self
            .program
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("{}-{}", stem, subcommand)
    }

    /// Directory searched for local executables
    pub fn base_dir(&self) -> PathBuf {
        let target = match fs::symlink_metadata(&self.program) {
            Ok(meta) if meta.file_type().is_symlink() => match fs::read_link(&self.program) {
                Ok(link) if link.is_relative() => parent_of(&self.program).join(link),
                Ok(link) => link,
                Err(_) => self.program.clone(),
            },
            _ => self.program.clone(),
        };
        parent_of(&target)
    }

    /// Resolve `subcommand` and attach its arguments
    pub fn resolve(&self, subcommand: &str, args: Vec<String>) -> ExternalInvocation {
        let name = self.executable_name(subcommand);
        let local = self.base_dir().join(&name);

        let executable = self
            .script_runners
            .iter()
            .find_map(|(ext, interpreter)| {
                let path = with_extension_appended(&local, ext);
                path.is_file().then(|| Executable::Script {
                    interpreter: interpreter.clone(),
                    path,
                })
            })
            .unwrap_or_else(|| {
                if local.exists() {
                    Executable::Local(local)
                } else {
                    Executable::OnPath(name.clone())
                }
            });

        debug!(subcommand, executable = ?executable, "resolved external subcommand");
        ExternalInvocation { name, executable, args }
    }
}

fn parent_of(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// `dir/name` becomes `dir/name.ext`, even when `name` already has a dot
fn with_extension_appended(path: &Path, ext: &str) -> PathBuf {
    let mut os: OsString = path.as_os_str().to_owned();
    os.push(".");
    os.push(ext);
    PathBuf::from(os)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_executable_name_uses_stem() {
        let resolver = ExternalResolver::from_program("/usr/local/bin/pm.js");
        assert_eq!(resolver.executable_name("install"), "pm-install");
    }

    #[test]
    fn test_resolve_prefers_script_then_local_then_path() {
        let temp_dir = TempDir::new().unwrap();
        let program = temp_dir.path().join("pm");
        fs::write(&program, "").unwrap();
        let resolver = ExternalResolver::from_program(&program);

        let invocation = resolver.resolve("list", vec![]);
        assert_eq!(invocation.executable, Executable::OnPath("pm-list".to_string()));

        fs::write(temp_dir.path().join("pm-list"), "").unwrap();
        let invocation = resolver.resolve("list", vec![]);
        assert_eq!(invocation.executable, Executable::Local(temp_dir.path().join("pm-list")));

        fs::write(temp_dir.path().join("pm-list.ts"), "").unwrap();
        let invocation = resolver.resolve("list", vec!["-a".to_string()]);
        assert_eq!(
            invocation.executable,
            Executable::Script {
                interpreter: "node".to_string(),
                path: temp_dir.path().join("pm-list.ts"),
            }
        );
        assert_eq!(invocation.args, vec!["-a"]);
    }

    #[test]
    fn test_bare_program_uses_current_dir() {
        let resolver = ExternalResolver::from_program("pm");
        assert_eq!(resolver.base_dir(), PathBuf::from("."));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_program_resolves_target_dir() {
        let temp_dir = TempDir::new().unwrap();
        let real_dir = temp_dir.path().join("lib");
        let bin_dir = temp_dir.path().join("bin");
        fs::create_dir_all(&real_dir).unwrap();
        fs::create_dir_all(&bin_dir).unwrap();
        fs::write(real_dir.join("pm"), "").unwrap();
        std::os::unix::fs::symlink("../lib/pm", bin_dir.join("pm")).unwrap();

        let resolver = ExternalResolver::from_program(bin_dir.join("pm"));
        assert_eq!(resolver.base_dir(), bin_dir.join("../lib"));
    }
}
