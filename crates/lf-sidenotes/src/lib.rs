//! Footnote-to-sidenote rewriting for generated HTML.
//!
//! Markdown footnote output puts the note bodies in a list at the end of the
//! document, linked from superscript markers in the text. A margin-note
//! reading layout wants each note duplicated next to its reference point
//! instead. [`insert_sidenotes`] performs that rewrite as a pure
//! text-to-text transform:
//!
//! 1. the document is parsed into a mutable element tree,
//! 2. every `fnref-*` reference marker is matched to its `fn-*` definition,
//! 3. an `<aside>` sidenote carrying the marker and the note body is spliced
//!    in next to the reference's text container,
//! 4. the tree is serialized back to text.
//!
//! The transform is fail-fast: a reference without a definition aborts the
//! whole document with [`SidenoteError::MissingDefinition`], and a reference
//! without the expected `lf-text` ancestor aborts with
//! [`SidenoteError::MissingAnchor`]. It is not idempotent; running it twice
//! duplicates the sidenotes, so it must run exactly once per generated
//! document.

mod entities;
mod error;
mod parser;
mod serializer;
mod transform;
mod tree;

pub use error::SidenoteError;
pub use parser::HtmlParser;
pub use serializer::HtmlSerializer;
pub use transform::insert_sidenotes;
pub use tree::TreeNode;
