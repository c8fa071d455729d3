//! HTML entity unescaping for formula sources.
//!
//! The markup generator entity-escapes document text before these
//! transforms run, so a formula span reads e.g. `a &amp; b`. The
//! typesetting process expects the raw source; this module undoes the
//! escaping. Unknown entities pass through untouched.

use std::sync::LazyLock;

use regex::Regex;

/// Pattern matching named and numeric entity references.
static ENTITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z][a-zA-Z0-9]*);").expect("invalid entity regex")
});

/// Replace entity references with the characters they encode.
pub(crate) fn unescape_entities(text: &str) -> String {
    ENTITY_PATTERN
        .replace_all(text, |caps: &regex::Captures| {
            resolve_entity(&caps[1]).unwrap_or_else(|| caps[0].to_owned())
        })
        .into_owned()
}

/// Resolve one entity reference body to its character value.
fn resolve_entity(body: &str) -> Option<String> {
    if let Some(digits) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
        return u32::from_str_radix(digits, 16)
            .ok()
            .and_then(char::from_u32)
            .map(String::from);
    }
    if let Some(digits) = body.strip_prefix('#') {
        return digits
            .parse::<u32>()
            .ok()
            .and_then(char::from_u32)
            .map(String::from);
    }

    let ch = match body {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        // Entities that plausibly occur inside formula source
        "nbsp" => "\u{00a0}",
        "middot" => "\u{00b7}",
        "times" => "\u{00d7}",
        "divide" => "\u{00f7}",
        "plusmn" => "\u{00b1}",
        "minus" => "\u{2212}",
        "le" => "\u{2264}",
        "ge" => "\u{2265}",
        "ne" => "\u{2260}",
        _ => return None,
    };
    Some(ch.to_owned())
}
