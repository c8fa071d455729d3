//! HTML parser producing [`TreeNode`] trees.

#![allow(clippy::unused_self)] // Unit struct methods have &self for API consistency

use std::io::BufRead;

use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::entities::decode_entity;
use crate::error::SidenoteError;
use crate::tree::TreeNode;

/// Tag of the synthetic wrapper element enclosing the parsed document.
const ROOT_TAG: &str = "root";

/// Parse generated HTML into a [`TreeNode`] tree.
///
/// The input is the well-formed XHTML a markup generator emits; it is
/// wrapped in a synthetic root element so fragments with multiple top-level
/// nodes (or none) parse uniformly. Comments, processing instructions and
/// doctype declarations are dropped; entity references are decoded to
/// Unicode where known and preserved literally otherwise.
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new parser.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse an HTML string into a tree rooted at a synthetic wrapper node.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be parsed as well-formed markup.
    pub fn parse(&self, html: &str) -> Result<TreeNode, SidenoteError> {
        let wrapped = format!("<{ROOT_TAG}>{html}</{ROOT_TAG}>");

        let mut reader = Reader::from_str(&wrapped);
        reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) if e.name().as_ref() == ROOT_TAG.as_bytes() => {
                    let mut root = self.parse_children(&mut reader, ROOT_TAG)?;
                    root.tag = ROOT_TAG.to_owned();
                    return Ok(root);
                }
                Event::Eof => return Ok(TreeNode::new(ROOT_TAG)),
                _ => {}
            }
            buf.clear();
        }
    }

    fn parse_children<R: BufRead>(
        &self,
        reader: &mut Reader<R>,
        parent_tag: &str,
    ) -> Result<TreeNode, SidenoteError> {
        let mut buf = Vec::new();
        let mut node = TreeNode::default();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    let child_tag = self.decode_tag(reader, &e);
                    let child_attrs = self.decode_attrs(reader, &e);
                    let mut child = self.parse_children(reader, &child_tag)?;
                    child.tag = child_tag;
                    child.attrs = child_attrs;
                    node.children.push(child);
                }
                Event::Empty(e) => {
                    // Self-closing child element
                    let child = TreeNode {
                        tag: self.decode_tag(reader, &e),
                        attrs: self.decode_attrs(reader, &e),
                        ..Default::default()
                    };
                    node.children.push(child);
                }
                Event::Text(e) => {
                    let text = reader.decoder().decode(&e)?.into_owned();
                    append_text(&mut node, &text);
                }
                Event::GeneralRef(e) => {
                    let entity = reader.decoder().decode(&e)?.into_owned();
                    append_text(&mut node, &decode_entity(&entity));
                }
                Event::CData(e) => {
                    let text = String::from_utf8_lossy(&e).into_owned();
                    append_text(&mut node, &text);
                }
                Event::End(e) => {
                    let end_tag = self.decode_tag_from_bytes(reader, e.name().as_ref());
                    if end_tag == parent_tag {
                        return Ok(node);
                    }
                    // Mismatched end tag - continue
                }
                Event::Eof => {
                    return Ok(node);
                }
                Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
            }
            buf.clear();
        }
    }

    fn decode_tag<R: BufRead>(&self, reader: &Reader<R>, e: &BytesStart) -> String {
        self.decode_tag_from_bytes(reader, e.name().as_ref())
    }

    fn decode_tag_from_bytes<R: BufRead>(&self, reader: &Reader<R>, name: &[u8]) -> String {
        reader.decoder().decode(name).map_or_else(
            |_| String::from_utf8_lossy(name).into_owned(),
            std::borrow::Cow::into_owned,
        )
    }

    fn decode_attrs<R: BufRead>(
        &self,
        reader: &Reader<R>,
        e: &BytesStart,
    ) -> IndexMap<String, String> {
        let mut attrs = IndexMap::new();
        for attr in e.attributes().flatten() {
            let key = reader.decoder().decode(attr.key.as_ref()).map_or_else(
                |_| String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
                std::borrow::Cow::into_owned,
            );

            let value = attr.unescape_value().map_or_else(
                |_| String::from_utf8_lossy(&attr.value).into_owned(),
                std::borrow::Cow::into_owned,
            );

            attrs.insert(key, value);
        }
        attrs
    }
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Append text to node's text or last child's tail.
fn append_text(node: &mut TreeNode, text: &str) {
    if let Some(last_child) = node.children.last_mut() {
        last_child.tail.push_str(text);
    } else {
        node.text.push_str(text);
    }
}
