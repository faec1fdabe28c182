//! Candidate selection for a partially typed command line

use crate::command::Command;
use crate::complete::{normalize_rules, NormalizedRules, OptionRule, Reply};

/// The option whose value is being typed, if the last word is a value-taking flag
fn active_option<'a>(rules: &'a NormalizedRules, typed: &[String]) -> Option<&'a OptionRule> {
    let last = typed.last()?;
    rules.option(last).filter(|rule| rule.arity > 0)
}

/// The positional slot being typed, counting words that are not flags or flag values
fn active_arg<'a>(rules: &'a NormalizedRules, typed: &[String]) -> Option<&'a Reply> {
    if rules.args.is_empty() {
        return None;
    }
    let mut count = 0;
    let mut curr = 0;
    while curr < typed.len() {
        match rules.option(&typed[curr]) {
            Some(rule) => curr += rule.arity + 1,
            None => {
                count += 1;
                curr += 1;
            }
        }
    }
    rules.args.get(count)
}

/// Completion candidates for `cmd` given the words typed after its name
///
/// While an option value is being typed only that option's reply is
/// offered. Otherwise the unused flags come first (a flag is used once
/// either of its spellings was typed), followed by the reply for the next
/// positional slot.
pub fn candidates(cmd: &Command, typed: &[String]) -> Vec<String> {
    let rules = normalize_rules(cmd);

    if let Some(rule) = active_option(&rules, typed) {
        return rule.reply.evaluate(typed);
    }

    let used = |flag: &str| typed.iter().any(|t| t == flag);
    let mut out: Vec<String> = rules
        .options
        .iter()
        .filter(|(flag, rule)| !used(flag.as_str()) && !rule.sibling.as_deref().is_some_and(used))
        .map(|(flag, _)| flag.clone())
        .collect();

    if let Some(reply) = active_arg(&rules, typed) {
        out.extend(reply.evaluate(typed));
    }
    out
}
