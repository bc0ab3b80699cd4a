//! Prompt templating with `{name}` placeholders.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(\w+)\}").expect("placeholder pattern is valid"));

/// Substitutes every `{name}` in `template` in a single pass.
///
/// Substituted values are never re-scanned, so a value that itself contains
/// `{name}` comes through verbatim. Unknown placeholders are left as they are.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            let name = &caps[1];
            match values.iter().find(|(key, _)| *key == name) {
                Some((_, value)) => Cow::Owned(value.to_string()),
                None => Cow::Owned(caps[0].to_string()),
            }
        })
        .into_owned()
}
