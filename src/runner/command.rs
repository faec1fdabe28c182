//! External subcommand execution
//!
//! The child inherits stdio. Termination signals received while it runs are
//! forwarded to it, and its exit status becomes ours.

use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::{Executable, ExternalInvocation};
use std::io;
use std::process::{Child, Command as StdCommand, ExitStatus, Stdio};
use tracing::debug;

impl ExternalInvocation {
    /// The process to start
    pub fn to_command(&self) -> StdCommand {
        let mut command = match &self.executable {
            Executable::Script { interpreter, path } => {
                let mut command = StdCommand::new(interpreter);
                command.arg(path);
                command
            }
            Executable::Local(path) => StdCommand::new(path),
            Executable::OnPath(name) => StdCommand::new(name),
        };
        command.args(&self.args);

        command.stdin(Stdio::inherit());
        command.stdout(Stdio::inherit());
        command.stderr(Stdio::inherit());
        command
    }
}

/// Run the subcommand to completion and return the exit code to propagate
pub fn execute_external(invocation: &ExternalInvocation) -> ExecutionResult<i32> {
    debug!(name = %invocation.name, args = ?invocation.args, "spawning external subcommand");

    let mut child = invocation
        .to_command()
        .spawn()
        .map_err(|e| spawn_error(&invocation.executable, e))?;

    let status = wait_forwarding_signals(&mut child).map_err(|e| ExecutionError::Spawn {
        name: invocation.name.clone(),
        error: e.to_string(),
    })?;

    let code = exit_code(status);
    debug!(name = %invocation.name, code, "external subcommand exited");
    Ok(code)
}

/// Diagnostics name the executable that was actually tried
fn spawn_error(executable: &Executable, err: io::Error) -> ExecutionError {
    let name = executable.to_string();
    match err.kind() {
        io::ErrorKind::NotFound => ExecutionError::NotFound(name),
        io::ErrorKind::PermissionDenied => ExecutionError::NotExecutable(name),
        _ => ExecutionError::Spawn {
            name,
            error: err.to_string(),
        },
    }
}

#[cfg(unix)]
fn wait_forwarding_signals(child: &mut Child) -> io::Result<ExitStatus> {
    use crate::runner::signals::Forwarder;

    let _forwarder = Forwarder::install(child.id());
    child.wait()
}

#[cfg(not(unix))]
fn wait_forwarding_signals(child: &mut Child) -> io::Result<ExitStatus> {
    child.wait()
}

/// Exit code of the child; a signal-terminated child maps to 128 + signal
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
