//! Completion rules declared on a command

use crate::command::Command;
use std::fmt;
use std::rc::Rc;

/// Candidate values for an option value or a positional argument
#[derive(Clone)]
pub enum Reply {
    Static(Vec<String>),
    /// Computed from the words typed so far
    Dynamic(Rc<dyn Fn(&[String]) -> Vec<String>>),
}

impl Reply {
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&[String]) -> Vec<String> + 'static,
    {
        Reply::Dynamic(Rc::new(f))
    }

    pub fn evaluate(&self, typed: &[String]) -> Vec<String> {
        match self {
            Reply::Static(values) => values.clone(),
            Reply::Dynamic(f) => f(typed),
        }
    }

    pub fn empty() -> Self {
        Reply::Static(Vec::new())
    }
}

impl fmt::Debug for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Static(values) => f.debug_tuple("Static").field(values).finish(),
            Reply::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl<S: Into<String>> From<Vec<S>> for Reply {
    fn from(values: Vec<S>) -> Self {
        Reply::Static(values.into_iter().map(Into::into).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Reply {
    fn from(values: [&str; N]) -> Self {
        Reply::Static(values.iter().map(|v| v.to_string()).collect())
    }
}

/// Replies keyed by option flag and by positional argument name
#[derive(Debug, Clone, Default)]
pub struct CompletionRules {
    options: Vec<(String, Reply)>,
    arguments: Vec<(String, Reply)>,
}

impl CompletionRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply for the value of the option spelled `flag` (short or long)
    pub fn option(mut self, flag: &str, reply: impl Into<Reply>) -> Self {
        self.options.push((flag.to_string(), reply.into()));
        self
    }

    /// Reply for the positional argument named `name`
    pub fn argument(mut self, name: &str, reply: impl Into<Reply>) -> Self {
        self.arguments.push((name.to_string(), reply.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty() && self.arguments.is_empty()
    }

    pub fn option_reply(&self, flag: &str) -> Option<&Reply> {
        self.options.iter().find(|(k, _)| k == flag).map(|(_, r)| r)
    }

    pub fn argument_reply(&self, name: &str) -> Option<&Reply> {
        self.arguments.iter().find(|(k, _)| k == name).map(|(_, r)| r)
    }
}

/// Per-flag entry of the normalized table
#[derive(Debug, Clone)]
pub struct OptionRule {
    pub arity: usize,
    /// The other spelling of the same option, if it has one
    pub sibling: Option<String>,
    pub reply: Reply,
}

/// Completion rules joined with the command's declared options and slots
#[derive(Debug, Clone, Default)]
pub struct NormalizedRules {
    /// Every flag spelling in declaration order, short form first
    pub options: Vec<(String, OptionRule)>,
    /// One reply per positional slot, in slot order
    pub args: Vec<Reply>,
}

impl NormalizedRules {
    pub fn option(&self, flag: &str) -> Option<&OptionRule> {
        self.options.iter().find(|(k, _)| k == flag).map(|(_, r)| r)
    }

    fn insert(&mut self, flag: &str, rule: OptionRule) {
        match self.options.iter_mut().find(|(k, _)| k == flag) {
            Some((_, slot)) => *slot = rule,
            None => self.options.push((flag.to_string(), rule)),
        }
    }
}

/// Build the normalized table for `cmd`
///
/// An option's reply is looked up by long flag first, then short flag,
/// and defaults to no candidates.
pub fn normalize_rules(cmd: &Command) -> NormalizedRules {
    let raw = cmd.completion_rules();
    let mut rules = NormalizedRules::default();

    for option in cmd.options() {
        let arity = option.arity();
        match &option.short {
            Some(short) => {
                let reply = raw
                    .option_reply(&option.long)
                    .or_else(|| raw.option_reply(short))
                    .cloned()
                    .unwrap_or_else(Reply::empty);
                rules.insert(
                    short,
                    OptionRule {
                        arity,
                        sibling: Some(option.long.clone()),
                        reply: reply.clone(),
                    },
                );
                rules.insert(
                    &option.long,
                    OptionRule {
                        arity,
                        sibling: Some(short.clone()),
                        reply,
                    },
                );
            }
            None => {
                let reply = raw.option_reply(&option.long).cloned().unwrap_or_else(Reply::empty);
                rules.insert(&option.long, OptionRule { arity, sibling: None, reply });
            }
        }
    }

    rules.args = cmd
        .slots()
        .iter()
        .map(|slot| raw.argument_reply(&slot.name).cloned().unwrap_or_else(Reply::empty))
        .collect();
    rules
}
