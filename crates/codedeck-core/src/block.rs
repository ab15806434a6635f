#![forbid(unsafe_code)]

//! Slide and block handles, and the editable code block itself.
//!
//! Handles are opaque ids allocated by [`DeckDocument`](crate::DeckDocument).
//! They are the portable replacement for node identity: everything that
//! needs to refer to a block holds a [`BlockId`], never a reference into
//! the document.

use ahash::AHashMap;

/// Opaque handle to a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlideId(u32);

impl SlideId {
    /// Create a slide id from a raw value.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw value (for logging and hit-data style encodings).
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Opaque handle to an editable code block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockId(u64);

impl BlockId {
    /// Create a block id from a raw value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw value (for logging and hit-data style encodings).
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// An editable code block: a markup region configured to host one editor.
///
/// The block keeps two texts: the `content` visible in the markup, and an
/// optional `template` holding the last-saved text (the *stored
/// representation*). When an editor is torn down its buffer is written to
/// the template; when one is created the template wins over the content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeBlock {
    tag: String,
    classes: Vec<String>,
    attributes: AHashMap<String, String>,
    content: String,
    template: Option<String>,
}

impl CodeBlock {
    /// Create a block with a markup tag, e.g. `"code"`.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Add a class.
    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Set an attribute.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set the visible content text.
    #[must_use]
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Set the stored template text.
    #[must_use]
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Markup tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Class list, in insertion order.
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Whether the block carries the given class.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Attribute lookup.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Explicit language override: `language`, else `data-language`.
    #[must_use]
    pub fn language_attribute(&self) -> Option<&str> {
        self.attribute("language")
            .or_else(|| self.attribute("data-language"))
    }

    /// Visible content text.
    #[must_use]
    pub fn visible_content(&self) -> &str {
        &self.content
    }

    /// Stored template text, if any.
    #[must_use]
    pub fn stored_template(&self) -> Option<&str> {
        self.template.as_deref()
    }

    /// Text an editor should be seeded from: the stored template when one
    /// exists, otherwise the visible content. Untrimmed.
    #[must_use]
    pub fn source_text(&self) -> &str {
        self.template.as_deref().unwrap_or(&self.content)
    }

    /// Overwrite the stored template (teardown writes the captured editor
    /// text here, replacing whatever was stored before).
    pub fn set_template(&mut self, template: impl Into<String>) {
        self.template = Some(template.into());
    }

    /// Blank the visible content (the editor takes over the region).
    pub fn clear_content(&mut self) {
        self.content.clear();
    }
}
