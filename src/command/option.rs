//! Option descriptors
//!
//! A descriptor is parsed from a human-written flag declaration such as
//! `"-c, --cheese <type>"` and knows how to turn raw tokens into recorded
//! values.

use crate::command::Value;
use regex::Regex;
use std::fmt;

/// User-supplied coercion: receives the raw token and the current (or default) value
pub type TransformFn = dyn Fn(&str, Option<&Value>) -> anyhow::Result<Value>;

/// How a raw option token becomes a recorded value
#[derive(Default)]
pub enum Coercion {
    /// Record the raw token as a string
    #[default]
    None,
    /// Run a user function
    Transform(Box<TransformFn>),
    /// Keep the first full match, otherwise fall back to the current or default value
    Pattern(Regex),
}

impl Coercion {
    pub fn transform<F>(f: F) -> Self
    where
        F: Fn(&str, Option<&Value>) -> anyhow::Result<Value> + 'static,
    {
        Coercion::Transform(Box::new(f))
    }

    pub fn pattern(regex: Regex) -> Self {
        Coercion::Pattern(regex)
    }

    /// Apply the coercion. `Ok(None)` means the token produced no value.
    pub fn apply(&self, raw: &str, fallback: Option<&Value>) -> anyhow::Result<Option<Value>> {
        match self {
            Coercion::None => Ok(Some(Value::Str(raw.to_string()))),
            Coercion::Transform(f) => f(raw, fallback).map(Some),
            Coercion::Pattern(regex) => Ok(match regex.find(raw) {
                Some(m) => Some(Value::Str(m.as_str().to_string())),
                None => fallback.cloned(),
            }),
        }
    }
}

impl fmt::Debug for Coercion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coercion::None => f.write_str("None"),
            Coercion::Transform(_) => f.write_str("Transform(..)"),
            Coercion::Pattern(regex) => f.debug_tuple("Pattern").field(&regex.as_str()).finish(),
        }
    }
}

/// A declared option
#[derive(Debug)]
pub struct OptionDescriptor {
    /// The declaration exactly as written
    pub flags: String,
    pub short: Option<String>,
    pub long: String,
    pub description: String,
    /// Takes a mandatory value (`<...>` in the flags)
    pub required: bool,
    /// Takes an optional value (`[...]` in the flags)
    pub optional: bool,
    /// False only for negated `--no-*` forms
    pub bool: bool,
    pub default: Option<Value>,
    pub coercion: Coercion,
}

impl OptionDescriptor {
    /// Parse a flag declaration
    pub fn parse(flags: &str, description: &str) -> Self {
        let mut parts: Vec<&str> = flags
            .split(|c| matches!(c, ' ' | ',' | '|'))
            .filter(|part| !part.is_empty())
            .collect();

        let short = if parts.len() > 1 && !parts[1].starts_with(['[', '<']) {
            Some(parts.remove(0).to_string())
        } else {
            None
        };
        let long = if parts.is_empty() {
            String::new()
        } else {
            parts.remove(0).to_string()
        };

        OptionDescriptor {
            flags: flags.to_string(),
            short,
            long,
            description: description.to_string(),
            required: flags.contains('<'),
            optional: flags.contains('['),
            bool: !flags.contains("-no-"),
            default: None,
            coercion: Coercion::None,
        }
    }

    pub fn with_default(mut self, default: Option<Value>) -> Self {
        self.default = default;
        self
    }

    pub fn with_coercion(mut self, coercion: Coercion) -> Self {
        self.coercion = coercion;
        self
    }

    /// Long flag without its `--` and without a `no-` prefix
    pub fn name(&self) -> &str {
        let name = self.long.strip_prefix("--").unwrap_or(&self.long);
        name.strip_prefix("no-").unwrap_or(name)
    }

    /// Key under which values are recorded
    pub fn attribute_name(&self) -> String {
        camelcase(self.name())
    }

    /// Number of value tokens the option consumes
    pub fn arity(&self) -> usize {
        if self.required || self.optional {
            1
        } else {
            0
        }
    }

    /// Whether `token` spells this option's short or long flag
    pub fn matches(&self, token: &str) -> bool {
        self.short.as_deref() == Some(token) || self.long == token
    }

    /// Whether registering this option pre-assigns its default
    pub fn preassigns_default(&self) -> bool {
        !self.bool || self.optional || self.required
    }

    /// Compute the value to record for one occurrence of this option
    ///
    /// `raw` is `None` when the option appeared without a value. Returns
    /// `Ok(None)` when the stored value must be left untouched.
    pub fn resolve(&self, raw: Option<&str>, current: Option<&Value>) -> anyhow::Result<Option<Value>> {
        let value = match raw {
            Some(raw) => self.coercion.apply(raw, current.or(self.default.as_ref()))?,
            None => None,
        };

        let unset_or_bool = current.map_or(true, Value::is_bool);
        if !unset_or_bool {
            return Ok(value);
        }

        Ok(Some(match value {
            Some(value) => value,
            None if self.bool => match &self.default {
                Some(default) if default.is_truthy() => default.clone(),
                _ => Value::Bool(true),
            },
            None => Value::Bool(false),
        }))
    }
}

/// Camel-case a hyphenated name: words after the first get an upper-cased
/// first character, the rest of every word is kept as written
pub fn camelcase(name: &str) -> String {
    let mut words = name.split('-');
    let mut out = words.next().unwrap_or_default().to_string();
    for word in words {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_option() {
        let opt = OptionDescriptor::parse("-p, --peppers", "to include peppers or not");
        assert_eq!(opt.name(), "peppers");
        assert_eq!(opt.short.as_deref(), Some("-p"));
        assert_eq!(opt.description, "to include peppers or not");
        assert!(opt.bool);
        assert!(!opt.optional);
        assert!(!opt.required);
        assert_eq!(opt.arity(), 0);
    }

    #[test]
    fn test_parse_value_options() {
        let opt = OptionDescriptor::parse("-p, --peppers [type]", "");
        assert!(opt.optional && !opt.required);
        assert_eq!(opt.arity(), 1);

        let opt = OptionDescriptor::parse("-p, --peppers <type>", "");
        assert!(opt.required && !opt.optional);
        assert_eq!(opt.long, "--peppers");
    }

    #[test]
    fn test_parse_long_only_and_separators() {
        let opt = OptionDescriptor::parse("--longflag [value]", "");
        assert_eq!(opt.short, None);
        assert_eq!(opt.long, "--longflag");

        let opt = OptionDescriptor::parse("-c|--no-cheese", "");
        assert_eq!(opt.short.as_deref(), Some("-c"));
        assert_eq!(opt.name(), "cheese");
        assert!(!opt.bool);

        let opt = OptionDescriptor::parse("-m <mode>", "");
        assert_eq!(opt.short, None);
        assert_eq!(opt.long, "-m");
        assert!(opt.matches("-m"));
    }

    #[test]
    fn test_camelcase() {
        assert_eq!(camelcase("my-fLOAT"), "myFLOAT");
        assert_eq!(camelcase("my-URL-count"), "myURLCount");
        assert_eq!(camelcase("my-very-long-float"), "myVeryLongFloat");
        assert_eq!(camelcase("setup_mode"), "setup_mode");
    }

    #[test]
    fn test_attribute_name() {
        let opt = OptionDescriptor::parse("-u, --my-URL-count <n>", "");
        assert_eq!(opt.attribute_name(), "myURLCount");
    }

    #[test]
    fn test_resolve_bool_and_negated() {
        let opt = OptionDescriptor::parse("-p, --pepper", "");
        assert_eq!(opt.resolve(None, None).unwrap(), Some(Value::Bool(true)));

        let opt = OptionDescriptor::parse("--no-cheese", "").with_default(Some(Value::Bool(true)));
        assert_eq!(
            opt.resolve(None, Some(&Value::Bool(true))).unwrap(),
            Some(Value::Bool(false))
        );
    }

    #[test]
    fn test_resolve_overwrites_only_with_value() {
        let opt = OptionDescriptor::parse("-c, --cheese [type]", "");
        let current = Value::from("brie");
        assert_eq!(opt.resolve(None, Some(&current)).unwrap(), None);
        assert_eq!(
            opt.resolve(Some("feta"), Some(&current)).unwrap(),
            Some(Value::from("feta"))
        );
    }

    #[test]
    fn test_pattern_coercion_falls_back() {
        let regex = Regex::new("(?i)^(large|medium|small)$").unwrap();
        let opt = OptionDescriptor::parse("-s, --size <size>", "")
            .with_coercion(Coercion::pattern(regex))
            .with_default(Some(Value::from("medium")));
        let current = Value::from("medium");
        assert_eq!(
            opt.resolve(Some("big"), Some(&current)).unwrap(),
            Some(Value::from("medium"))
        );
        assert_eq!(
            opt.resolve(Some("LARGE"), Some(&current)).unwrap(),
            Some(Value::from("LARGE"))
        );

        let regex = Regex::new("(?i)^(Coke|Pepsi|Izze)$").unwrap();
        let opt = OptionDescriptor::parse("-d, --drink [drink]", "").with_coercion(Coercion::pattern(regex));
        assert_eq!(opt.resolve(Some("water"), None).unwrap(), Some(Value::Bool(true)));
    }

    #[test]
    fn test_transform_sees_default() {
        let opt = OptionDescriptor::parse("-v, --verbose <n>", "")
            .with_default(Some(Value::Int(10)))
            .with_coercion(Coercion::transform(|raw, total| {
                let base = total.and_then(Value::as_i64).unwrap_or(0);
                Ok(Value::Int(base + raw.parse::<i64>()?))
            }));
        assert_eq!(opt.resolve(Some("5"), None).unwrap(), Some(Value::Int(15)));
        assert!(opt.resolve(Some("x"), None).is_err());
    }
}
