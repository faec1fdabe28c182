//! Shell integration
//!
//! `--completion` and `--completion-fish` print an init script for the
//! user's shell. The script calls back into the program as
//! `<prog> --compbash|--compzsh|--compfish <fragment> <line...>` and the
//! program answers with one candidate per line.

use crate::command::Command;
use crate::complete::candidates;

/// First tokens that switch a program into completion mode
pub const RESERVED_TOKENS: [&str; 5] = ["--completion", "--completion-fish", "--compzsh", "--compbash", "--compfish"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    /// The bash script also registers itself with zsh's `compdef`
    Bash,
    Fish,
}

/// A completion request from the shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionEvent {
    /// Index of the word under the cursor, the program name being 0
    pub fragment: usize,
    /// The command line as typed
    pub line: String,
}

/// What a reserved first token asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellRequest {
    Script(Shell),
    Complete(CompletionEvent),
}

impl ShellRequest {
    /// Recognize a completion request from the user arguments
    pub fn detect(args: &[String]) -> Option<Self> {
        match args.first()?.as_str() {
            "--completion" => Some(ShellRequest::Script(Shell::Bash)),
            "--completion-fish" => Some(ShellRequest::Script(Shell::Fish)),
            "--compbash" | "--compzsh" | "--compfish" => Some(ShellRequest::Complete(CompletionEvent {
                fragment: args.get(1).and_then(|f| f.trim().parse().ok()).unwrap_or(0),
                line: args.get(2..).map(|rest| rest.join(" ")).unwrap_or_default(),
            })),
            _ => None,
        }
    }
}

impl Command {
    /// Whether this command or any direct child declared completion rules
    pub fn has_completion_rules(&self) -> bool {
        !self.completion.is_empty() || self.commands.iter().any(|cmd| !cmd.completion.is_empty())
    }

    /// Candidates for a completion event
    ///
    /// With subcommands, the first word completes to subcommand names and
    /// later words complete against the named subcommand. Otherwise the
    /// words after the program name complete against this command.
    pub fn handle_completion_event(&self, event: &CompletionEvent) -> Vec<String> {
        let words: Vec<String> = event.line.split(' ').map(str::to_string).collect();

        if !self.commands.is_empty() {
            if event.fragment == 1 {
                let mut names: Vec<String> = self.commands.iter().map(|c| c.name.clone()).collect();
                names.push("--help".to_string());
                return names;
            }
            let Some(name) = words.get(1) else {
                return Vec::new();
            };
            return match self.commands.iter().find(|c| &c.name == name) {
                Some(cmd) => candidates(cmd, slice(&words, 2, event.fragment)),
                None => Vec::new(),
            };
        }

        let mut out = candidates(self, slice(&words, 1, event.fragment));
        if event.fragment == 1 {
            out.push("--help".to_string());
        }
        out
    }
}

/// `words[start..end]` clamped to the available range
fn slice(words: &[String], start: usize, end: usize) -> &[String] {
    let end = end.min(words.len());
    if start >= end {
        &[]
    } else {
        &words[start..end]
    }
}

fn function_name(program: &str) -> String {
    program
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Init script for `shell` that completes `program`
pub fn completion_script(shell: Shell, program: &str) -> String {
    let func = function_name(program);
    match shell {
        Shell::Bash => format!(
            r#"### {program} completion - begin ###
if type compdef &>/dev/null; then
  _{func}_completion() {{
    compadd -- $({program} --compzsh $((CURRENT - 1)) "$BUFFER")
  }}
  compdef _{func}_completion {program}
elif type complete &>/dev/null; then
  _{func}_completion() {{
    local cur="${{COMP_WORDS[COMP_CWORD]}}"
    COMPREPLY=( $(compgen -W "$({program} --compbash "$COMP_CWORD" "$COMP_LINE")" -- "$cur") )
  }}
  complete -F _{func}_completion {program}
fi
### {program} completion - end ###
"#
        ),
        Shell::Fish => format!(
            r#"### {program} completion - begin ###
function _{func}_completion
    set -l words (commandline -opc)
    {program} --compfish (count $words) (commandline -cp)
end
complete -f -c {program} -a '(_{func}_completion)'
### {program} completion - end ###
"#
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complete::CompletionRules;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_detect_requests() {
        assert_eq!(ShellRequest::detect(&words(&["--completion"])), Some(ShellRequest::Script(Shell::Bash)));
        assert_eq!(
            ShellRequest::detect(&words(&["--compbash", "2", "git", "clone"])),
            Some(ShellRequest::Complete(CompletionEvent {
                fragment: 2,
                line: "git clone".to_string(),
            }))
        );
        assert_eq!(ShellRequest::detect(&words(&["clone"])), None);
        assert_eq!(ShellRequest::detect(&[]), None);
    }

    #[test]
    fn test_single_command_event() {
        let mut cmd = Command::new("git");
        cmd.option("--verbose", "verbose")
            .complete(CompletionRules::new().option("--verbose", Vec::<String>::new()));
        let event = CompletionEvent {
            fragment: 1,
            line: "git ".to_string(),
        };
        assert_eq!(cmd.handle_completion_event(&event), words(&["--verbose", "--help"]));
    }

    #[test]
    fn test_unknown_subcommand_event() {
        let mut cmd = Command::new("git");
        cmd.command("clone <url>");
        let event = CompletionEvent {
            fragment: 2,
            line: "git pull ".to_string(),
        };
        assert!(cmd.handle_completion_event(&event).is_empty());
    }

    #[test]
    fn test_scripts_call_back() {
        let script = completion_script(Shell::Bash, "my-tool");
        assert!(script.contains("my-tool --compbash \"$COMP_CWORD\" \"$COMP_LINE\""));
        assert!(script.contains("compdef _my_tool_completion my-tool"));
        let script = completion_script(Shell::Fish, "my-tool");
        assert!(script.contains("my-tool --compfish (count $words) (commandline -cp)"));
    }
}
