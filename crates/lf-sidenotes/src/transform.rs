//! The footnote-to-sidenote transform.

use std::collections::HashMap;

use crate::error::SidenoteError;
use crate::parser::HtmlParser;
use crate::serializer::HtmlSerializer;
use crate::tree::{FOOTNOTE_CONTAINER_CLASS, TreeNode};

/// Id of the ancestor element marking the readable text column.
const TEXT_CONTAINER_ID: &str = "lf-text";

/// Role carried by generated sidenote elements.
const SIDENOTE_ROLE: &str = "note";

/// Class of generated sidenote elements.
const SIDENOTE_CLASS: &str = "lf-sidenote";

/// Class of the marker copy at the head of a sidenote.
const REFMARK_CLASS: &str = "lf-refmark";

/// Copy every footnote into a sidenote next to its reference point.
///
/// For each `fnref-*` reference in document order, the matching `fn-*`
/// definition body is duplicated into an `<aside role="note">` that is
/// spliced in immediately before the parent of the reference's `lf-text`
/// ancestor. Back-reference links are stripped from the copies; the
/// original footnote list is left in place.
///
/// Not idempotent: a second run duplicates the sidenotes, so the transform
/// must be applied exactly once per generated document.
///
/// # Errors
///
/// [`SidenoteError::MissingDefinition`] if a reference has no definition,
/// [`SidenoteError::MissingAnchor`] if a reference has no usable `lf-text`
/// ancestor, or a parse error for ill-formed markup. Any error aborts the
/// whole document; no partial output is produced.
pub fn insert_sidenotes(html: &str) -> Result<String, SidenoteError> {
    let mut tree = HtmlParser::new().parse(html)?;
    let definitions = collect_definitions(&tree);

    // References are re-located freshly on every iteration: each splice
    // shifts sibling indices near the anchor, so a path computed up front
    // would go stale. Inserted sidenotes carry no ids and are never picked
    // up as references themselves.
    let mut count = 0;
    while let Some(reference) = nth_reference(&tree, count) {
        let definition =
            definitions
                .get(&reference.name)
                .ok_or_else(|| SidenoteError::MissingDefinition {
                    name: reference.name.clone(),
                })?;

        let sidenote = build_sidenote(&reference.marker, definition);
        splice_before_anchor(&mut tree, &reference, sidenote)?;
        count += 1;
    }

    if count > 0 {
        tracing::debug!(count, "Inserted sidenotes");
    }

    Ok(HtmlSerializer::new().serialize(&tree))
}

/// A located footnote reference.
struct Reference {
    /// Footnote name (id without the `fnref-` prefix).
    name: String,
    /// Visible marker text of the reference element.
    marker: String,
    /// Child-index path from the root to the reference element.
    path: Vec<usize>,
}

/// Collect definition items keyed by footnote name.
///
/// Definitions live as `<li id="fn-*">` items of the ordered list under the
/// first element of class `footnote`. Documents without footnotes simply
/// yield an empty map.
fn collect_definitions(tree: &TreeNode) -> HashMap<String, TreeNode> {
    let mut definitions = HashMap::new();

    let Some(container) = find_footnote_container(tree) else {
        return definitions;
    };
    let Some(list) = find_ordered_list(container) else {
        tracing::warn!("Footnote container has no ordered list");
        return definitions;
    };

    for item in &list.children {
        if item.tag == "li" {
            if let Some(name) = item.definition_name() {
                definitions.insert(name.to_owned(), item.clone());
            }
        }
    }

    definitions
}

fn find_footnote_container(node: &TreeNode) -> Option<&TreeNode> {
    if node.has_class(FOOTNOTE_CONTAINER_CLASS) {
        return Some(node);
    }
    node.children.iter().find_map(find_footnote_container)
}

fn find_ordered_list(node: &TreeNode) -> Option<&TreeNode> {
    node.children
        .iter()
        .find_map(|child| if child.tag == "ol" { Some(child) } else { find_ordered_list(child) })
}

/// Locate the `n`-th footnote reference in document order.
fn nth_reference(tree: &TreeNode, n: usize) -> Option<Reference> {
    let mut seen = 0;
    let mut path = Vec::new();
    find_nth_reference(tree, n, &mut seen, &mut path)
}

fn find_nth_reference(
    node: &TreeNode,
    n: usize,
    seen: &mut usize,
    path: &mut Vec<usize>,
) -> Option<Reference> {
    if let Some(name) = node.reference_name() {
        if *seen == n {
            return Some(Reference {
                name: name.to_owned(),
                marker: node.text_content(),
                path: path.clone(),
            });
        }
        *seen += 1;
    }
    for (i, child) in node.children.iter().enumerate() {
        path.push(i);
        if let Some(found) = find_nth_reference(child, n, seen, path) {
            return Some(found);
        }
        path.pop();
    }
    None
}

/// Build the sidenote for one reference: the marker copy followed by the
/// definition body, with back-reference links stripped.
fn build_sidenote(marker: &str, definition: &TreeNode) -> TreeNode {
    // The refmark's tail carries the definition's leading text, so the
    // aside's content reads "<sup>MARKER</sup>" + definition body.
    let refmark = TreeNode::new("sup")
        .with_attr("class", REFMARK_CLASS)
        .with_text(marker)
        .with_tail(definition.text.clone());

    let mut children = vec![refmark];
    children.extend(definition.children.iter().cloned());

    let mut sidenote = TreeNode::new("aside")
        .with_attr("role", SIDENOTE_ROLE)
        .with_attr("aria-hidden", "true")
        .with_attr("class", SIDENOTE_CLASS)
        .with_children(children);

    remove_backrefs(&mut sidenote);
    sidenote
}

/// Remove back-reference links from a copied definition body.
///
/// A removed link's tail re-attaches to its preceding sibling (or the
/// parent's text), so surrounding prose survives the removal.
fn remove_backrefs(node: &mut TreeNode) {
    let mut i = 0;
    while i < node.children.len() {
        if node.children[i].is_backref() {
            let removed = node.children.remove(i);
            if !removed.tail.is_empty() {
                if i == 0 {
                    node.text.push_str(&removed.tail);
                } else {
                    node.children[i - 1].tail.push_str(&removed.tail);
                }
            }
        } else {
            remove_backrefs(&mut node.children[i]);
            i += 1;
        }
    }
}

/// Splice a sidenote in immediately before the reference's anchor.
///
/// The ancestor chain is walked outward from the reference; the nearest
/// ancestor with id `lf-text` is the text-container marker and the anchor is
/// that marker's immediate parent. The sidenote becomes the anchor's
/// immediately preceding sibling.
fn splice_before_anchor(
    tree: &mut TreeNode,
    reference: &Reference,
    sidenote: TreeNode,
) -> Result<(), SidenoteError> {
    let path = &reference.path;

    // path[..d] addresses the ancestor d steps down from the root; the
    // reference itself sits at depth path.len().
    for d in (0..path.len()).rev() {
        if node_at(tree, &path[..d]).id() != Some(TEXT_CONTAINER_ID) {
            continue;
        }
        // The anchor is the marker's parent (depth d - 1); the sidenote goes
        // into the anchor's own parent, just before the anchor.
        if d < 2 {
            break;
        }
        let anchor_index = path[d - 2];
        let receiver = node_at_mut(tree, &path[..d - 2]);
        receiver.children.insert(anchor_index, sidenote);
        tracing::debug!(name = %reference.name, depth = d, "Spliced sidenote");
        return Ok(());
    }

    Err(SidenoteError::MissingAnchor {
        name: reference.name.clone(),
    })
}

fn node_at<'a>(tree: &'a TreeNode, path: &[usize]) -> &'a TreeNode {
    let mut node = tree;
    for &i in path {
        node = &node.children[i];
    }
    node
}

fn node_at_mut<'a>(tree: &'a mut TreeNode, path: &[usize]) -> &'a mut TreeNode {
    let mut node = tree;
    for &i in path {
        node = &mut node.children[i];
    }
    node
}
