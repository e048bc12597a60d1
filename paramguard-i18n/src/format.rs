//! Template substitution
//!
//! Templates use `{name}` placeholders. Substitution is a single left-to-right
//! pass, so braces inside substituted values are never expanded again.

/// Replace every `{key}` in `template` with its value from `args`.
///
/// Placeholders without a matching argument are kept verbatim.
///
/// ```
/// use paramguard_i18n::substitute;
///
/// let text = substitute("{name} is too short (min. {minsize})", &[("name", "'Token'"), ("minsize", "8")]);
/// assert_eq!(text, "'Token' is too short (min. 8)");
/// ```
pub fn substitute(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        match after.find('}') {
            Some(close) if is_placeholder_name(&after[..close]) => {
                let key = &after[..close];
                match args.iter().find(|(name, _)| *name == key) {
                    Some((_, value)) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

fn is_placeholder_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Uppercase the first character, leaving the rest untouched.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Trim surrounding whitespace and capitalize the result.
pub fn finish_sentence(s: &str) -> String {
    capitalize_first(s.trim())
}
