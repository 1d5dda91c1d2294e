//! Alert (admonition) kinds.

/// Kind of an alert block, taken from `data-alert-type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AlertKind {
    Note,
    Tip,
    Important,
    Warning,
    Caution,
}

impl AlertKind {
    /// Parse a marker value, ignoring ASCII case and surrounding whitespace.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "note" => Some(Self::Note),
            "tip" => Some(Self::Tip),
            "important" => Some(Self::Important),
            "warning" => Some(Self::Warning),
            "caution" => Some(Self::Caution),
            _ => None,
        }
    }

    /// Marker value, also usable as a CSS class suffix.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Tip => "tip",
            Self::Important => "important",
            Self::Warning => "warning",
            Self::Caution => "caution",
        }
    }

    /// Heading shown above the alert body.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Note => "Примечание",
            Self::Tip => "Совет",
            Self::Important => "Важно",
            Self::Warning => "Предупреждение",
            Self::Caution => "Осторожно",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(AlertKind::parse("warning"), Some(AlertKind::Warning));
        assert_eq!(AlertKind::parse(" TIP "), Some(AlertKind::Tip));
        assert_eq!(AlertKind::parse("danger"), None);
    }

    #[test]
    fn test_title_and_class() {
        assert_eq!(AlertKind::Note.title(), "Примечание");
        assert_eq!(AlertKind::Tip.title(), "Совет");
        assert_eq!(AlertKind::Important.title(), "Важно");
        assert_eq!(AlertKind::Warning.title(), "Предупреждение");
        assert_eq!(AlertKind::Caution.title(), "Осторожно");
        assert_eq!(AlertKind::Important.as_str(), "important");
    }
}
