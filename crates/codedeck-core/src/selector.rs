#![forbid(unsafe_code)]

//! Compound block selectors.
//!
//! A selector names which blocks of a deck are editable: an optional tag
//! plus zero or more required classes, written `tag.class1.class2`,
//! `.class`, or a bare `tag`. Blocks sit directly under slides, so there
//! is no descendant axis; combinators are rejected at parse time.

use std::str::FromStr;

use crate::block::CodeBlock;

/// A parsed compound selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    classes: Vec<String>,
}

impl Selector {
    /// Parse a selector string.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(SelectorError::Empty);
        }
        if input.chars().any(char::is_whitespace) || input.contains('>') {
            return Err(SelectorError::Combinator(input.to_string()));
        }

        let mut segments = input.split('.');
        let head = segments.next().unwrap_or("");
        let tag = if head.is_empty() {
            None
        } else {
            Self::validate_segment(head, input)?;
            Some(head.to_string())
        };

        let mut classes = Vec::new();
        for segment in segments {
            Self::validate_segment(segment, input)?;
            classes.push(segment.to_string());
        }

        if tag.is_none() && classes.is_empty() {
            return Err(SelectorError::Empty);
        }
        Ok(Self { tag, classes })
    }

    fn validate_segment(segment: &str, whole: &str) -> Result<(), SelectorError> {
        let valid = !segment.is_empty()
            && segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(())
        } else {
            Err(SelectorError::InvalidCompound(whole.to_string()))
        }
    }

    /// Whether a block matches: tag equality (when a tag is named) and
    /// every listed class present.
    #[must_use]
    pub fn matches(&self, block: &CodeBlock) -> bool {
        if let Some(tag) = &self.tag
            && block.tag() != tag
        {
            return false;
        }
        self.classes.iter().all(|class| block.has_class(class))
    }

    /// Tag constraint, if any.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Required classes.
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Error parsing a [`Selector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// The selector was empty.
    Empty,
    /// The selector used a combinator; only single compounds are supported.
    Combinator(String),
    /// A tag or class segment was empty or held invalid characters.
    InvalidCompound(String),
}

impl std::fmt::Display for SelectorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty selector"),
            Self::Combinator(s) => {
                write!(f, "combinators are not supported in `{s}`")
            }
            Self::InvalidCompound(s) => write!(f, "invalid selector compound in `{s}`"),
        }
    }
}

impl std::error::Error for SelectorError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tag_and_classes() {
        let sel = Selector::parse("code.monaco.live").expect("valid selector");
        assert_eq!(sel.tag(), Some("code"));
        assert_eq!(sel.classes(), ["monaco".to_string(), "live".to_string()]);
    }

    #[test]
    fn parses_class_only_and_tag_only() {
        let class_only = Selector::parse(".monaco").expect("valid selector");
        assert_eq!(class_only.tag(), None);
        assert_eq!(class_only.classes(), ["monaco".to_string()]);

        let tag_only = Selector::parse("pre").expect("valid selector");
        assert_eq!(tag_only.tag(), Some("pre"));
        assert!(tag_only.classes().is_empty());
    }

    #[test]
    fn rejects_empty_and_combinators() {
        assert_eq!(Selector::parse(""), Err(SelectorError::Empty));
        assert_eq!(Selector::parse("   "), Err(SelectorError::Empty));
        assert!(matches!(
            Selector::parse("pre code.monaco"),
            Err(SelectorError::Combinator(_))
        ));
        assert!(matches!(
            Selector::parse("pre>code"),
            Err(SelectorError::Combinator(_))
        ));
    }

    #[test]
    fn rejects_malformed_compounds() {
        assert!(matches!(
            Selector::parse("code..monaco"),
            Err(SelectorError::InvalidCompound(_))
        ));
        assert!(matches!(
            Selector::parse("code.mon aco"),
            Err(SelectorError::Combinator(_))
        ));
        assert!(matches!(
            Selector::parse("code."),
            Err(SelectorError::InvalidCompound(_))
        ));
    }

    #[test]
    fn matches_requires_tag_and_all_classes() {
        let sel = Selector::parse("code.monaco").expect("valid selector");
        let hit = CodeBlock::new("code").class("monaco").class("extra");
        let wrong_tag = CodeBlock::new("pre").class("monaco");
        let missing_class = CodeBlock::new("code");
        assert!(sel.matches(&hit));
        assert!(!sel.matches(&wrong_tag));
        assert!(!sel.matches(&missing_class));
    }

    #[test]
    fn display_messages() {
        assert_eq!(SelectorError::Empty.to_string(), "empty selector");
        assert!(
            SelectorError::Combinator("a b".into())
                .to_string()
                .contains("a b")
        );
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn valid_compounds_parse_and_match(
                tag in "[a-z][a-z0-9]{0,6}",
                class in "[a-z][a-z0-9_-]{0,6}",
            ) {
                let sel = Selector::parse(&format!("{tag}.{class}")).expect("valid compound");
                prop_assert_eq!(sel.tag(), Some(tag.as_str()));

                let hit = CodeBlock::new(tag.as_str()).class(class.as_str());
                let miss = CodeBlock::new(tag.as_str());
                prop_assert!(sel.matches(&hit));
                prop_assert!(!sel.matches(&miss));
            }
        }
    }
}
