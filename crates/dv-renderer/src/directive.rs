//! Textual directives recognized in paragraph text.
//!
//! - Component embed: `[uic:button-group]` anywhere in a paragraph replaces
//!   the paragraph with a placeholder for component `button-group`.
//! - Accordion: a paragraph starting with `:::accordion Title` opens a
//!   collapsible section; a paragraph holding only `:::` closes it.

use regex::Regex;

/// Paragraph text that closes an accordion.
pub const ACCORDION_CLOSE: &str = ":::";

/// Finds component-embed markers for one prefix.
#[derive(Debug, Clone)]
pub struct ComponentMatcher {
    pattern: Regex,
}

impl ComponentMatcher {
    /// Matcher for `[<prefix>:<identifier>]`.
    ///
    /// Identifiers are lowercase ASCII letters, digits and hyphens.
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        let pattern = format!(r"\[{}:([a-z0-9-]+)\]", regex::escape(prefix));
        Self {
            pattern: Regex::new(&pattern).expect("escaped prefix forms a valid pattern"),
        }
    }

    /// Identifier of the first marker in `text`.
    #[must_use]
    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

/// Whether `text` starts with the accordion `marker`.
#[must_use]
pub fn is_accordion_opener(text: &str, marker: &str) -> bool {
    text.trim().starts_with(marker)
}

/// Title of an accordion opener: the marker, whitespace, then a title.
///
/// `":::accordion  Details "` yields `"Details"`. Returns `None` without a
/// title or when the marker runs into other text (`":::accordionX"`).
#[must_use]
pub fn accordion_title<'t>(text: &'t str, marker: &str) -> Option<&'t str> {
    let rest = text.trim().strip_prefix(marker)?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let title = rest.trim();
    (!title.is_empty()).then_some(title)
}

/// Whether `text` closes an accordion.
#[must_use]
pub fn is_accordion_close(text: &str) -> bool {
    text.trim() == ACCORDION_CLOSE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_marker() {
        let matcher = ComponentMatcher::new("uic");
        assert_eq!(matcher.find("See [uic:button-group] here"), Some("button-group"));
        assert_eq!(matcher.find("[uic:Button]"), None);
        assert_eq!(matcher.find("[ui:button]"), None);
        assert_eq!(matcher.find("no marker"), None);
    }

    #[test]
    fn test_component_prefix_is_literal() {
        let matcher = ComponentMatcher::new("a.b");
        assert_eq!(matcher.find("[a.b:x]"), Some("x"));
        assert_eq!(matcher.find("[axb:x]"), None);
    }

    #[test]
    fn test_accordion_title() {
        assert_eq!(accordion_title(":::accordion  Details ", ":::accordion"), Some("Details"));
        assert_eq!(accordion_title(" :::accordion Two words", ":::accordion"), Some("Two words"));
        assert_eq!(accordion_title(":::accordion", ":::accordion"), None);
        assert_eq!(accordion_title(":::accordionX", ":::accordion"), None);
        assert_eq!(accordion_title("text", ":::accordion"), None);
    }

    #[test]
    fn test_accordion_close() {
        assert!(is_accordion_close(" ::: "));
        assert!(!is_accordion_close(":::accordion A"));
        assert!(is_accordion_opener(":::accordion A", ":::accordion"));
    }
}
