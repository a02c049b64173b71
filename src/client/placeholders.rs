//! Resource template resolution.

use crate::errors::ClientError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([-_a-zA-Z0-9\[\]]+)\}").expect("Invalid placeholder regex"));

/// Substitute `{name}` tokens in `template`.
///
/// Configuration placeholders win over `extra` for the same name. Values are
/// inserted as-is, without percent-encoding.
pub fn resolve(
    template: &str,
    configured: &HashMap<String, String>,
    extra: &HashMap<String, String>,
) -> Result<String, ClientError> {
    let mut path = String::with_capacity(template.len());
    let mut last = 0;

    for captures in PLACEHOLDER_RE.captures_iter(template) {
        let (Some(token), Some(name)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        let name = name.as_str();

        let value = configured
            .get(name)
            .or_else(|| extra.get(name))
            .ok_or_else(|| ClientError::required(format!("{} is a required placeholder", name)))?;

        path.push_str(&template[last..token.start()]);
        path.push_str(value);
        last = token.end();
    }

    path.push_str(&template[last..]);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_resolves_extras() {
        let path = resolve("/a/{x}/{y}", &HashMap::new(), &map(&[("x", "1"), ("y", "2")])).unwrap();
        assert_eq!(path, "/a/1/2");
    }

    #[test]
    fn test_configured_wins() {
        let configured = map(&[("orgId", "b001e4aa-7ac9-4d15-8ddc-b0c58f6982dd")]);
        let path = resolve("/a/{orgId}", &configured, &map(&[("orgId", "spoofed")])).unwrap();
        assert_eq!(path, "/a/b001e4aa-7ac9-4d15-8ddc-b0c58f6982dd");
    }

    #[test]
    fn test_unresolved_token_names_it() {
        let err = resolve("/a/{x}/{missing-one}", &HashMap::new(), &map(&[("x", "1")])).unwrap_err();
        assert!(err.is_required());
        assert_eq!(err.message(), "missing-one is a required placeholder");
    }

    #[test]
    fn test_no_tokens_and_no_encoding() {
        let empty = HashMap::new();
        assert_eq!(resolve("/plain/path", &empty, &empty).unwrap(), "/plain/path");

        let path = resolve("/u/{name}", &empty, &map(&[("name", "a b/c")])).unwrap();
        assert_eq!(path, "/u/a b/c");
    }

    #[test]
    fn test_bracket_and_underscore_names() {
        let extra = map(&[("ids[0]", "7"), ("user_id", "u1")]);
        let path = resolve("/x/{ids[0]}/{user_id}", &HashMap::new(), &extra).unwrap();
        assert_eq!(path, "/x/7/u1");
    }

    #[test]
    fn test_braces_with_other_chars_are_literal() {
        let empty = HashMap::new();
        assert_eq!(resolve("/x/{a.b}", &empty, &empty).unwrap(), "/x/{a.b}");
    }
}
