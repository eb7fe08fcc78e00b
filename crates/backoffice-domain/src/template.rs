//! `{{placeholder}}` substitution for email templates.

use std::collections::HashMap;

/// Replace every `{{name}}` in `source` with `vars[name]`.
///
/// Whitespace inside the braces is ignored (`{{ name }}`). Placeholders with no
/// matching variable, and unterminated `{{`, are copied through unchanged.
pub fn render(source: &str, vars: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        let Some(end) = after_open.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = after_open[..end].trim();
        match vars.get(key) {
            Some(value) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after_open[end + 2..];
    }
    out.push_str(rest);
    out
}

/// Distinct placeholder names in order of first appearance.
pub fn placeholders(source: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut rest = source;
    while let Some(start) = rest.find("{{") {
        let after_open = &rest[start + 2..];
        let Some(end) = after_open.find("}}") else {
            break;
        };
        let key = after_open[..end].trim();
        if !key.is_empty() && !names.iter().any(|n| n == key) {
            names.push(key.to_owned());
        }
        rest = &after_open[end + 2..];
    }
    names
}
