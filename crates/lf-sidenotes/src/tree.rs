//! Tree node representation for parsed HTML documents.

use indexmap::IndexMap;

/// Identifier prefix on footnote reference markers.
pub(crate) const REF_ID_PREFIX: &str = "fnref-";

/// Identifier prefix on footnote definition items.
pub(crate) const DEFINITION_ID_PREFIX: &str = "fn-";

/// Class of the container holding the footnote definition list.
pub(crate) const FOOTNOTE_CONTAINER_CLASS: &str = "footnote";

/// Class of back-reference links inside definitions.
pub(crate) const BACKREF_CLASS: &str = "footnote-backref";

/// Node in a parsed HTML tree.
///
/// Text placement follows the XML convention: `text` is the content before
/// the first child, `tail` is the content following this node's end tag
/// inside the parent. Attributes keep their source order so serialization
/// is stable.
#[derive(Debug, Clone, Default)]
pub struct TreeNode {
    /// Element tag name.
    pub tag: String,
    /// Direct text content.
    pub text: String,
    /// Text after this element (XML tail).
    pub tail: String,
    /// Element attributes, in source order.
    pub attrs: IndexMap<String, String>,
    /// Child nodes.
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Create a new tree node with the given tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Set text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set tail content.
    #[must_use]
    pub fn with_tail(mut self, tail: impl Into<String>) -> Self {
        self.tail = tail.into();
        self
    }

    /// Add an attribute.
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Set children.
    #[must_use]
    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }

    /// Get an attribute value.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// The element's `id` attribute.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    /// Whether the element's `class` attribute contains `class`.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|value| value.split_ascii_whitespace().any(|c| c == class))
    }

    /// The footnote name of a reference marker (`fnref-<name>`), if this is
    /// one.
    #[must_use]
    pub fn reference_name(&self) -> Option<&str> {
        self.id().and_then(|id| id.strip_prefix(REF_ID_PREFIX))
    }

    /// The footnote name of a definition item (`fn-<name>`), if this is one.
    #[must_use]
    pub fn definition_name(&self) -> Option<&str> {
        self.id().and_then(|id| id.strip_prefix(DEFINITION_ID_PREFIX))
    }

    /// Whether this is a back-reference link inside a definition body.
    #[must_use]
    pub fn is_backref(&self) -> bool {
        self.tag == "a" && self.has_class(BACKREF_CLASS)
    }

    /// Visible text of this element: its own text and every descendant's,
    /// whitespace-normalized. The element's own tail is not part of it.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut parts = Vec::new();
        self.collect_text(&mut parts);
        parts.join(" ")
    }

    fn collect_text(&self, parts: &mut Vec<String>) {
        let text = self.text.trim();
        if !text.is_empty() {
            parts.push(text.to_owned());
        }
        for child in &self.children {
            child.collect_text(parts);
            let tail = child.tail.trim();
            if !tail.is_empty() {
                parts.push(tail.to_owned());
            }
        }
    }
}
