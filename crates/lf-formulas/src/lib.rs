//! Formula span rendering for generated HTML.
//!
//! Document text may embed typesetting source between `·` (middle dot)
//! delimiters; `\·` escapes a literal delimiter. [`FormulaRenderer`]
//! replaces every well-formed span with markup produced by an external
//! typesetting process, leaving all other text byte-for-byte intact.
//!
//! The external process (by default `node` running KaTeX) is spawned
//! lazily on the first span of a run and reused for every later one; see
//! [`RenderChannel`] for the NUL-framed request/response protocol. A
//! renderer crash mid-response is a fatal error for the document being
//! transformed, with no retry and no restart.

mod channel;
mod entities;
mod error;
mod extract;
mod renderer;

pub use channel::{RenderChannel, RendererCommand};
pub use error::FormulaError;
pub use renderer::FormulaRenderer;
