//! Entity reference decoding for the event parser.
//!
//! The event reader reports every `&...;` reference as-is; this module maps
//! the reference body to its character value. XML's own five entities,
//! numeric character references, and the named HTML entities the markup
//! generator emits are decoded to Unicode; anything unknown is preserved
//! literally so the round trip does not corrupt it.

/// Decode an entity reference body (the `nbsp` in `&nbsp;`).
pub(crate) fn decode_entity(entity: &str) -> String {
    match entity {
        "lt" => "<".to_owned(),
        "gt" => ">".to_owned(),
        "amp" => "&".to_owned(),
        "apos" => "'".to_owned(),
        "quot" => "\"".to_owned(),
        // Numeric character references
        s if s.starts_with('#') => {
            let code = if s.starts_with("#x") || s.starts_with("#X") {
                u32::from_str_radix(&s[2..], 16).ok()
            } else {
                s[1..].parse::<u32>().ok()
            };
            code.and_then(char::from_u32)
                .map_or_else(|| format!("&{entity};"), |c| c.to_string())
        }
        s => named_entity(s).map_or_else(|| format!("&{entity};"), str::to_owned),
    }
}

/// Map a named HTML entity to its Unicode value.
fn named_entity(name: &str) -> Option<&'static str> {
    Some(match name {
        // Typographic entities common in generated prose
        "nbsp" => "\u{00a0}",
        "ensp" => "\u{2002}",
        "emsp" => "\u{2003}",
        "thinsp" => "\u{2009}",
        "mdash" => "\u{2014}",
        "ndash" => "\u{2013}",
        "ldquo" => "\u{201c}",
        "rdquo" => "\u{201d}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "laquo" => "\u{00ab}",
        "raquo" => "\u{00bb}",
        "bull" => "\u{2022}",
        "hellip" => "\u{2026}",
        "dagger" => "\u{2020}",
        "Dagger" => "\u{2021}",
        "sect" => "\u{00a7}",
        "para" => "\u{00b6}",
        "middot" => "\u{00b7}",

        // Arrows (footnote back-references use larrhk/hookleftarrow forms)
        "larr" => "\u{2190}",
        "rarr" => "\u{2192}",
        "uarr" => "\u{2191}",
        "darr" => "\u{2193}",
        "harr" => "\u{2194}",
        "hookleftarrow" => "\u{21a9}",

        // Math and units
        "times" => "\u{00d7}",
        "divide" => "\u{00f7}",
        "plusmn" => "\u{00b1}",
        "minus" => "\u{2212}",
        "le" => "\u{2264}",
        "ge" => "\u{2265}",
        "ne" => "\u{2260}",
        "deg" => "\u{00b0}",
        "micro" => "\u{00b5}",

        // Legal and currency
        "copy" => "\u{00a9}",
        "reg" => "\u{00ae}",
        "trade" => "\u{2122}",
        "euro" => "\u{20ac}",
        "pound" => "\u{00a3}",
        "yen" => "\u{00a5}",
        "cent" => "\u{00a2}",

        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_xml_entities() {
        assert_eq!(decode_entity("amp"), "&");
        assert_eq!(decode_entity("lt"), "<");
        assert_eq!(decode_entity("gt"), ">");
        assert_eq!(decode_entity("quot"), "\"");
        assert_eq!(decode_entity("apos"), "'");
    }

    #[test]
    fn test_decode_named_entities() {
        assert_eq!(decode_entity("nbsp"), "\u{00a0}");
        assert_eq!(decode_entity("mdash"), "\u{2014}");
        assert_eq!(decode_entity("hookleftarrow"), "\u{21a9}");
    }

    #[test]
    fn test_decode_decimal_reference() {
        assert_eq!(decode_entity("#8617"), "\u{21a9}");
    }

    #[test]
    fn test_decode_hex_reference() {
        assert_eq!(decode_entity("#x21a9"), "\u{21a9}");
        assert_eq!(decode_entity("#X21A9"), "\u{21a9}");
    }

    #[test]
    fn test_unknown_entity_preserved() {
        assert_eq!(decode_entity("unknown"), "&unknown;");
    }

    #[test]
    fn test_invalid_numeric_reference_preserved() {
        assert_eq!(decode_entity("#x110000"), "&#x110000;");
        assert_eq!(decode_entity("#notanumber"), "&#notanumber;");
    }
}
