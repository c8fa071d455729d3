//! Serializer from [`TreeNode`] trees back to HTML text.

#![allow(clippy::unused_self)] // Unit struct methods have &self for API consistency

use std::fmt::Write;

use crate::tree::TreeNode;

/// Serialize a [`TreeNode`] tree back to HTML text.
///
/// The synthetic root wrapper is not emitted; its text and children are.
/// Text and attribute values are XML-escaped, so entity references decoded
/// during parsing round-trip as valid markup. Elements without content
/// serialize self-closed, as the upstream XHTML generator writes them.
pub struct HtmlSerializer;

impl HtmlSerializer {
    /// Create a new serializer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Serialize a tree to HTML text.
    #[must_use]
    pub fn serialize(&self, tree: &TreeNode) -> String {
        let mut out = String::with_capacity(4096);

        // The root is a wrapper: emit its content, not the element itself.
        out.push_str(&escape_text(&tree.text));
        for child in &tree.children {
            serialize_node(child, &mut out);
        }

        out
    }
}

impl Default for HtmlSerializer {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialize a single node recursively.
fn serialize_node(node: &TreeNode, out: &mut String) {
    // Opening tag
    out.push('<');
    out.push_str(&node.tag);

    // Attributes
    for (key, value) in &node.attrs {
        write!(out, r#" {}="{}""#, key, escape_attr(value)).unwrap();
    }

    if node.children.is_empty() && node.text.is_empty() {
        // Self-closing tag
        out.push_str(" />");
    } else {
        out.push('>');

        // Text content
        if !node.text.is_empty() {
            out.push_str(&escape_text(&node.text));
        }

        // Children
        for child in &node.children {
            serialize_node(child, out);
        }

        // Closing tag
        write!(out, "</{}>", node.tag).unwrap();
    }

    // Tail text
    if !node.tail.is_empty() {
        out.push_str(&escape_text(&node.tail));
    }
}

/// Escape text for element content.
fn escape_text(text: &str) -> String {
    escape_xml(text, false)
}

/// Escape text for attribute values.
fn escape_attr(text: &str) -> String {
    escape_xml(text, true)
}

/// Escape XML special characters.
fn escape_xml(text: &str, escape_quotes: bool) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' if escape_quotes => result.push_str("&quot;"),
            '\'' if escape_quotes => result.push_str("&apos;"),
            _ => result.push(ch),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::parser::HtmlParser;

    #[test]
    fn test_serialize_simple_element() {
        let tree = TreeNode::new("root").with_children(vec![TreeNode::new("p").with_text("Hello")]);

        let html = HtmlSerializer::new().serialize(&tree);
        assert_eq!(html, "<p>Hello</p>");
    }

    #[test]
    fn test_serialize_with_children_and_tail() {
        let strong = TreeNode::new("strong").with_text("Bold").with_tail(" text");
        let p = TreeNode::new("p").with_children(vec![strong]);
        let tree = TreeNode::new("root").with_children(vec![p]);

        let html = HtmlSerializer::new().serialize(&tree);
        assert_eq!(html, "<p><strong>Bold</strong> text</p>");
    }

    #[test]
    fn test_serialize_self_closing() {
        let br = TreeNode::new("br").with_tail("After");
        let p = TreeNode::new("p").with_text("Before").with_children(vec![br]);
        let tree = TreeNode::new("root").with_children(vec![p]);

        let html = HtmlSerializer::new().serialize(&tree);
        assert_eq!(html, "<p>Before<br />After</p>");
    }

    #[test]
    fn test_serialize_attributes_in_order() {
        let aside = TreeNode::new("aside")
            .with_attr("role", "note")
            .with_attr("aria-hidden", "true")
            .with_attr("class", "lf-sidenote");
        let tree = TreeNode::new("root").with_children(vec![aside]);

        let html = HtmlSerializer::new().serialize(&tree);
        assert_eq!(
            html,
            r#"<aside role="note" aria-hidden="true" class="lf-sidenote" />"#
        );
    }

    #[test]
    fn test_escape_special_chars() {
        let p = TreeNode::new("p").with_text("a < b & c > d");
        let tree = TreeNode::new("root").with_children(vec![p]);

        let html = HtmlSerializer::new().serialize(&tree);
        assert_eq!(html, "<p>a &lt; b &amp; c &gt; d</p>");
    }

    #[test]
    fn test_escape_attribute_quotes() {
        let a = TreeNode::new("a").with_attr("title", r#"say "hi" & go"#);
        let tree = TreeNode::new("root").with_children(vec![a]);

        let html = HtmlSerializer::new().serialize(&tree);
        assert_eq!(html, r#"<a title="say &quot;hi&quot; &amp; go" />"#);
    }

    #[test]
    fn test_round_trip_preserves_structure() {
        let html = r#"<p>See<sup id="fnref-1">1</sup> for a &amp; b.</p>"#;
        let tree = HtmlParser::new().parse(html).unwrap();

        assert_eq!(HtmlSerializer::new().serialize(&tree), html);
    }

    #[test]
    fn test_serialize_root_text() {
        let tree = TreeNode::new("root")
            .with_text("leading ")
            .with_children(vec![TreeNode::new("em").with_text("x").with_tail(" trailing")]);

        let html = HtmlSerializer::new().serialize(&tree);
        assert_eq!(html, "leading <em>x</em> trailing");
    }
}
