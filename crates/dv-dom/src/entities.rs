//! Named HTML entity conversion.
//!
//! The tokenizer only understands the five XML entities, so named HTML
//! entities (`&nbsp;`, `&mdash;`, ...) are rewritten to their characters
//! before tokenizing. The XML entities are left for the tokenizer.

use std::sync::LazyLock;

use regex::Regex;

static ENTITY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&([a-zA-Z][a-zA-Z0-9]*);").expect("invalid entity regex"));

/// Replace named HTML entities with Unicode characters.
///
/// Unknown entities and the XML entities (`amp`, `lt`, `gt`, `quot`, `apos`)
/// are kept verbatim.
pub fn convert_html_entities(html: &str) -> String {
    if !html.contains('&') {
        return html.to_owned();
    }
    ENTITY_PATTERN
        .replace_all(html, |caps: &regex::Captures| {
            named_entity(&caps[1]).map_or_else(|| caps[0].to_owned(), String::from)
        })
        .into_owned()
}

fn named_entity(name: &str) -> Option<&'static str> {
    Some(match name {
        // Spacing
        "nbsp" => "\u{00a0}",
        "ensp" => "\u{2002}",
        "emsp" => "\u{2003}",
        "thinsp" => "\u{2009}",
        "shy" => "\u{00ad}",
        "zwj" => "\u{200d}",
        "zwnj" => "\u{200c}",

        // Punctuation
        "mdash" => "\u{2014}",
        "ndash" => "\u{2013}",
        "hellip" => "\u{2026}",
        "bull" => "\u{2022}",
        "middot" => "\u{00b7}",
        "laquo" => "\u{00ab}",
        "raquo" => "\u{00bb}",
        "lsaquo" => "\u{2039}",
        "rsaquo" => "\u{203a}",
        "ldquo" => "\u{201c}",
        "rdquo" => "\u{201d}",
        "bdquo" => "\u{201e}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "sbquo" => "\u{201a}",
        "iexcl" => "\u{00a1}",
        "iquest" => "\u{00bf}",
        "para" => "\u{00b6}",
        "sect" => "\u{00a7}",
        "dagger" => "\u{2020}",
        "Dagger" => "\u{2021}",

        // Arrows
        "larr" => "\u{2190}",
        "uarr" => "\u{2191}",
        "rarr" => "\u{2192}",
        "darr" => "\u{2193}",
        "harr" => "\u{2194}",
        "lArr" => "\u{21d0}",
        "rArr" => "\u{21d2}",

        // Math
        "le" => "\u{2264}",
        "ge" => "\u{2265}",
        "ne" => "\u{2260}",
        "asymp" => "\u{2248}",
        "plusmn" => "\u{00b1}",
        "times" => "\u{00d7}",
        "divide" => "\u{00f7}",
        "minus" => "\u{2212}",
        "infin" => "\u{221e}",
        "deg" => "\u{00b0}",
        "micro" => "\u{00b5}",
        "frac14" => "\u{00bc}",
        "frac12" => "\u{00bd}",
        "frac34" => "\u{00be}",
        "sup1" => "\u{00b9}",
        "sup2" => "\u{00b2}",
        "sup3" => "\u{00b3}",

        // Symbols
        "copy" => "\u{00a9}",
        "reg" => "\u{00ae}",
        "trade" => "\u{2122}",
        "euro" => "\u{20ac}",
        "pound" => "\u{00a3}",
        "yen" => "\u{00a5}",
        "cent" => "\u{00a2}",
        "numero" => "\u{2116}",

        _ => return None,
    })
}

/// Decode an entity reference reported by the tokenizer (`lt`, `#160`, `#x2014`).
pub(crate) fn decode_reference(entity: &str) -> String {
    match entity {
        "lt" => "<".to_owned(),
        "gt" => ">".to_owned(),
        "amp" => "&".to_owned(),
        "apos" => "'".to_owned(),
        "quot" => "\"".to_owned(),
        s if s.starts_with('#') => {
            let code = if s.starts_with("#x") || s.starts_with("#X") {
                u32::from_str_radix(&s[2..], 16).ok()
            } else {
                s[1..].parse::<u32>().ok()
            };
            code.and_then(char::from_u32)
                .map_or_else(|| format!("&{entity};"), |c| c.to_string())
        }
        other => named_entity(other).map_or_else(|| format!("&{entity};"), String::from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_nbsp() {
        assert_eq!(convert_html_entities("a&nbsp;b"), "a\u{00a0}b");
    }

    #[test]
    fn test_convert_several() {
        assert_eq!(
            convert_html_entities("&laquo;Docs&raquo; &mdash; v2"),
            "\u{00ab}Docs\u{00bb} \u{2014} v2"
        );
    }

    #[test]
    fn test_xml_entities_untouched() {
        assert_eq!(convert_html_entities("&amp;&lt;&gt;&quot;"), "&amp;&lt;&gt;&quot;");
    }

    #[test]
    fn test_unknown_entity_untouched() {
        assert_eq!(convert_html_entities("&bogus;"), "&bogus;");
    }

    #[test]
    fn test_decode_numeric_reference() {
        assert_eq!(decode_reference("#160"), "\u{00a0}");
        assert_eq!(decode_reference("#x2014"), "\u{2014}");
        assert_eq!(decode_reference("#xZZ"), "&#xZZ;");
    }

    #[test]
    fn test_decode_xml_reference() {
        assert_eq!(decode_reference("amp"), "&");
        assert_eq!(decode_reference("lt"), "<");
    }
}
