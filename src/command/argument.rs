//! Positional argument slots

use crate::command::ArgValue;
use crate::error::{ParseError, ParseResult};

/// A declared positional slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentSlot {
    pub name: String,
    pub required: bool,
    pub variadic: bool,
}

impl ArgumentSlot {
    /// `<name>`, `[name]` or their variadic `...` forms, for usage lines
    pub fn human_readable(&self) -> String {
        let name = if self.variadic {
            format!("{}...", self.name)
        } else {
            self.name.clone()
        };
        if self.required {
            format!("<{}>", name)
        } else {
            format!("[{}]", name)
        }
    }
}

/// Parse tokens such as `<id>` or `[files...]` into slots
///
/// Tokens that are neither bracketed form, or whose name turns out empty,
/// are skipped.
pub fn parse_expected_args<S: AsRef<str>>(tokens: &[S]) -> Vec<ArgumentSlot> {
    let mut slots = Vec::new();
    for token in tokens {
        let token = token.as_ref();
        let required = match token.chars().next() {
            Some('<') => true,
            Some('[') => false,
            _ => continue,
        };

        let inner = strip_brackets(token);
        let (name, variadic) = match inner.strip_suffix("...") {
            Some(stem) if inner.len() > 3 => (stem, true),
            _ => (inner, false),
        };

        if !name.is_empty() {
            slots.push(ArgumentSlot {
                name: name.to_string(),
                required,
                variadic,
            });
        }
    }
    slots
}

/// Drop the first and last character
fn strip_brackets(token: &str) -> &str {
    let mut chars = token.chars();
    chars.next();
    chars.next_back();
    chars.as_str()
}

/// Bind positional tokens to slots
///
/// The result holds one entry per slot (a variadic slot swallows every
/// remaining token) followed by `ArgValue::Command(owner)`. Without slots,
/// all tokens are passed through before the owner marker.
pub fn bind_arguments(slots: &[ArgumentSlot], tokens: Vec<String>, owner: &str) -> ParseResult<Vec<ArgValue>> {
    let mut values: Vec<ArgValue> = tokens.into_iter().map(ArgValue::Value).collect();

    for (index, slot) in slots.iter().enumerate() {
        let present = values.get(index).is_some_and(|v| !v.is_missing());
        if slot.required && !present {
            return Err(ParseError::MissingRequiredArgument(slot.name.clone()));
        }
        if slot.variadic {
            if index != slots.len() - 1 {
                return Err(ParseError::VariadicNotLast(slot.name.clone()));
            }
            let rest: Vec<String> = if index < values.len() {
                values.drain(index..).flat_map(ArgValue::into_tokens).collect()
            } else {
                Vec::new()
            };
            values.resize(index, ArgValue::Missing);
            values.push(ArgValue::Variadic(rest));
        }
    }

    if !slots.is_empty() {
        values.resize(slots.len(), ArgValue::Missing);
    }
    values.push(ArgValue::Command(owner.to_string()));
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_required_optional_variadic() {
        let slots = parse_expected_args(&["<id>", "[files...]"]);
        assert_eq!(
            slots,
            vec![
                ArgumentSlot { name: "id".into(), required: true, variadic: false },
                ArgumentSlot { name: "files".into(), required: false, variadic: true },
            ]
        );
    }

    #[test]
    fn test_parse_edge_cases() {
        assert!(parse_expected_args(&["<>", "[]", "plain"]).is_empty());
        // exactly "..." is not long enough to be variadic
        let slots = parse_expected_args(&["[...]"]);
        assert_eq!(slots[0].name, "...");
        assert!(!slots[0].variadic);
    }

    #[test]
    fn test_human_readable() {
        let slots = parse_expected_args(&["<id>", "[rest...]"]);
        assert_eq!(slots[0].human_readable(), "<id>");
        assert_eq!(slots[1].human_readable(), "[rest...]");
    }

    #[test]
    fn test_bind_variadic_tail() {
        let slots = parse_expected_args(&["<id>", "[variadicArg...]"]);
        let bound = bind_arguments(&slots, tokens(&["arg0", "arg1", "arg2", "arg3"]), "mycommand").unwrap();
        assert_eq!(bound.len(), 3);
        assert_eq!(bound[0], ArgValue::Value("arg0".into()));
        assert_eq!(bound[1], ArgValue::Variadic(tokens(&["arg1", "arg2", "arg3"])));
        assert_eq!(bound[2], ArgValue::Command("mycommand".into()));
    }

    #[test]
    fn test_bind_variadic_not_last() {
        let slots = parse_expected_args(&["<variadicArg...>", "[optionalArg]"]);
        let err = bind_arguments(&slots, tokens(&["a", "b"]), "cmd").unwrap_err();
        assert_eq!(err.to_string(), "variadic arguments must be last `variadicArg`");
    }

    #[test]
    fn test_bind_missing_required() {
        let slots = parse_expected_args(&["<cmd>"]);
        let err = bind_arguments(&slots, Vec::new(), "exec").unwrap_err();
        assert_eq!(err.to_string(), "missing required argument `cmd`");
    }

    #[test]
    fn test_bind_pads_optional_slots() {
        let slots = parse_expected_args(&["[env]", "[rest...]"]);
        let bound = bind_arguments(&slots, Vec::new(), "setup").unwrap();
        assert_eq!(
            bound,
            vec![ArgValue::Missing, ArgValue::Variadic(vec![]), ArgValue::Command("setup".into())]
        );
    }

    #[test]
    fn test_bind_without_slots_passes_tokens() {
        let bound = bind_arguments(&[], tokens(&["x", "y"]), "root").unwrap();
        assert_eq!(bound.len(), 3);
        assert_eq!(bound[2], ArgValue::Command("root".into()));
    }
}
