//! Token normalization
//!
//! Expands combined short flags (`-abc` to `-a -b -c`) and splits
//! `--flag=value` so the matcher only ever sees one flag per token.

use crate::command::OptionDescriptor;
use tracing::trace;

fn option_for<'a>(options: &'a [OptionDescriptor], token: &str) -> Option<&'a OptionDescriptor> {
    options.iter().find(|opt| opt.matches(token))
}

/// Normalize raw tokens against the declared options
///
/// Everything after a literal `--` is copied unchanged, as is any token
/// that follows an option requiring a value.
pub fn normalize<S: AsRef<str>>(tokens: &[S], options: &[OptionDescriptor]) -> Vec<String> {
    let mut out = Vec::with_capacity(tokens.len());

    for (i, token) in tokens.iter().enumerate() {
        let token = token.as_ref();
        let value_expected = i > 0
            && option_for(options, tokens[i - 1].as_ref()).is_some_and(|opt| opt.required);

        if token == "--" {
            out.extend(tokens[i..].iter().map(|t| t.as_ref().to_string()));
            break;
        }

        if value_expected {
            out.push(token.to_string());
        } else if token.len() > 1 && token.starts_with('-') && !token[1..].starts_with('-') {
            out.extend(token.chars().skip(1).map(|c| format!("-{}", c)));
        } else if let (true, Some(eq)) = (token.starts_with("--"), token.find('=')) {
            out.push(token[..eq].to_string());
            out.push(token[eq + 1..].to_string());
        } else {
            out.push(token.to_string());
        }
    }

    trace!(tokens = ?out, "normalized");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(specs: &[&str]) -> Vec<OptionDescriptor> {
        specs.iter().map(|s| OptionDescriptor::parse(s, "")).collect()
    }

    #[test]
    fn test_combined_short_flags() {
        let opts = options(&["-p, --pepper", "-c, --no-cheese"]);
        assert_eq!(normalize(&["-pc"], &opts), vec!["-p", "-c"]);
    }

    #[test]
    fn test_long_equals_split() {
        assert_eq!(normalize(&["--charlie=-"], &[]), vec!["--charlie", "-"]);
        assert_eq!(normalize(&["--a=b=c"], &[]), vec!["--a", "b=c"]);
    }

    #[test]
    fn test_value_after_required_option_passes_through() {
        let opts = options(&["-c, --cflags <cflags>", "-o, --other", "-x", "-y", "-z"]);
        assert_eq!(
            normalize(&["--cflags", "-DDEBUG", "-o", "-xyz"], &opts),
            vec!["--cflags", "-DDEBUG", "-o", "-x", "-y", "-z"]
        );
    }

    #[test]
    fn test_literal_terminator() {
        assert_eq!(normalize(&["-ab", "--", "-cd", "--x=y"], &[]), vec!["-a", "-b", "--", "-cd", "--x=y"]);
    }

    #[test]
    fn test_hyphen_values() {
        let opts = options(&["-a, --alpha <a>", "-b, --bravo <b>", "-c, --charlie <c>"]);
        let tokens = ["-a", "-", "--bravo", "-", "--charlie=-", "-", "--", "-", "-t1"];
        assert_eq!(
            normalize(&tokens, &opts),
            vec!["-a", "-", "--bravo", "-", "--charlie", "-", "-", "--", "-", "-t1"]
        );
    }
}
