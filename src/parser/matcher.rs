//! Option matching
//!
//! Walks normalized tokens, records values for recognized options on the
//! command and separates positional arguments from unrecognized flags.

use crate::command::Command;
use crate::error::{ParseError, ParseResult};
use tracing::debug;

/// Tokens left over after matching a command's options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matched {
    /// Positional tokens, in order
    pub args: Vec<String>,
    /// Unrecognized flags, each possibly followed by the token it may own
    pub unknown: Vec<String>,
    /// The version flag was seen; matching stopped there
    pub version_requested: bool,
}

impl Matched {
    /// Whether `-h` or `--help` is among the unrecognized tokens
    pub fn wants_help(&self) -> bool {
        wants_help(&self.unknown)
    }
}

pub(crate) fn wants_help(tokens: &[String]) -> bool {
    tokens.iter().any(|t| t == "--help" || t == "-h")
}

fn looks_like_flag(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-')
}

/// Match `tokens` against the options of `cmd`, recording values on it
pub fn match_options(cmd: &mut Command, tokens: &[String]) -> ParseResult<Matched> {
    let mut matched = Matched::default();
    let mut literal = false;
    let mut i = 0;

    while i < tokens.len() {
        let token = &tokens[i];

        if literal {
            matched.args.push(token.clone());
            i += 1;
            continue;
        }
        if token == "--" {
            literal = true;
            i += 1;
            continue;
        }

        if let Some(index) = cmd.options.iter().position(|opt| opt.matches(token)) {
            if cmd.is_version_option(index) {
                debug!(command = %cmd.name, "version requested");
                matched.version_requested = true;
                return Ok(matched);
            }

            let option = &cmd.options[index];
            let raw = if option.required {
                match tokens.get(i + 1) {
                    Some(value) => {
                        i += 1;
                        Some(value.as_str())
                    }
                    None => return Err(ParseError::MissingOptionArgument(option.flags.clone())),
                }
            } else if option.optional {
                match tokens.get(i + 1) {
                    Some(value) if !value.starts_with('-') || value == "-" => {
                        i += 1;
                        Some(value.as_str())
                    }
                    _ => None,
                }
            } else {
                None
            };

            cmd.record_option(index, raw)?;
            i += 1;
            continue;
        }

        if looks_like_flag(token) {
            matched.unknown.push(token.clone());
            if let Some(next) = tokens.get(i + 1) {
                if !next.starts_with('-') {
                    matched.unknown.push(next.clone());
                    i += 1;
                }
            }
            i += 1;
            continue;
        }

        matched.args.push(token.clone());
        i += 1;
    }

    debug!(command = %cmd.name, args = ?matched.args, unknown = ?matched.unknown, "matched options");
    Ok(matched)
}
