//! The formula-to-markup text transform.

use std::sync::Mutex;

use crate::channel::{RenderChannel, RendererCommand};
use crate::entities::unescape_entities;
use crate::error::FormulaError;
use crate::extract::find_spans;

/// Replaces `·`-delimited formula spans with externally rendered markup.
///
/// One renderer is meant to live for a whole build run: its external
/// process is spawned on the first span encountered and reused for every
/// later one, across documents. Requests go out strictly one at a time
/// under an internal mutex; the framing protocol has no request
/// identifiers, so ordering is the only correlation.
pub struct FormulaRenderer {
    channel: Mutex<RenderChannel>,
}

impl FormulaRenderer {
    /// Renderer using the default KaTeX-over-node command.
    #[must_use]
    pub fn new() -> Self {
        Self::with_command(RendererCommand::katex())
    }

    /// Renderer using a custom command (stubs, other typesetters).
    #[must_use]
    pub fn with_command(command: RendererCommand) -> Self {
        Self {
            channel: Mutex::new(RenderChannel::new(command)),
        }
    }

    /// Replace every well-formed formula span in `text`; text outside spans
    /// is preserved byte for byte (escaped delimiters keep their backslash).
    ///
    /// Each span's source is HTML-entity-unescaped before rendering,
    /// undoing the escaping the upstream markup generator applied.
    ///
    /// # Errors
    ///
    /// Fails on the first span whose render round trip fails; no partial
    /// output is produced for the document.
    ///
    /// # Panics
    ///
    /// Panics if the internal channel mutex is poisoned.
    pub fn rewrite(&self, text: &str) -> Result<String, FormulaError> {
        let spans = find_spans(text);
        if spans.is_empty() {
            return Ok(text.to_owned());
        }

        let mut channel = self.channel.lock().unwrap();
        let mut out = String::with_capacity(text.len());
        let mut cursor = 0;

        for span in &spans {
            out.push_str(&text[cursor..span.start]);
            let source = unescape_entities(span.source);
            let markup = channel.request(&source)?;
            out.push_str(&markup);
            cursor = span.end;
        }
        out.push_str(&text[cursor..]);

        tracing::debug!(count = spans.len(), "Rendered formula spans");
        Ok(out)
    }

    /// Whether the renderer process has been spawned in this run.
    ///
    /// # Panics
    ///
    /// Panics if the internal channel mutex is poisoned.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.channel.lock().unwrap().is_started()
    }
}

impl Default for FormulaRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    /// Renderer backed by `cat`: every span renders to its own source.
    fn echo_renderer() -> FormulaRenderer {
        FormulaRenderer::with_command(RendererCommand::new("cat"))
    }

    /// Renderer backed by a stub that wraps each request in `<math>` tags.
    fn math_stub_renderer() -> FormulaRenderer {
        let script = concat!(
            "import sys\n",
            "buf = bytearray()\n",
            "while True:\n",
            "    b = sys.stdin.buffer.read(1)\n",
            "    if not b:\n",
            "        break\n",
            "    if b == b'\\0':\n",
            "        sys.stdout.buffer.write(b'<math>' + bytes(buf) + b'</math>\\0')\n",
            "        sys.stdout.flush()\n",
            "        buf.clear()\n",
            "    else:\n",
            "        buf += b\n",
        );
        FormulaRenderer::with_command(RendererCommand::new("python3").arg("-c").arg(script))
    }

    #[test]
    fn test_text_without_spans_untouched() {
        let renderer = echo_renderer();
        assert_eq!(renderer.rewrite("no formulas here").unwrap(), "no formulas here");
        // No span, no process.
        assert!(!renderer.is_started());
    }

    #[test]
    fn test_span_replaced_by_rendered_markup() {
        let renderer = math_stub_renderer();
        assert_eq!(
            renderer.rewrite("Compute ·a+b· now.").unwrap(),
            "Compute <math>a+b</math> now."
        );
    }

    #[test]
    fn test_surrounding_text_preserved_byte_for_byte() {
        let renderer = echo_renderer();
        assert_eq!(
            renderer.rewrite("keep <em>this</em> ·x· & that").unwrap(),
            "keep <em>this</em> x & that"
        );
    }

    #[test]
    fn test_source_entity_unescaped_before_rendering() {
        let renderer = echo_renderer();
        assert_eq!(renderer.rewrite("·x &amp; y·").unwrap(), "x & y");
    }

    #[test]
    fn test_escaped_delimiter_outside_span_kept() {
        let renderer = echo_renderer();
        assert_eq!(
            renderer.rewrite(r"literal \· stays, ·z· renders").unwrap(),
            r"literal \· stays, z renders"
        );
    }

    #[test]
    fn test_one_process_for_many_spans() {
        let renderer = echo_renderer();
        assert_eq!(renderer.rewrite("·a· and ·b·").unwrap(), "a and b");
        assert_eq!(renderer.rewrite("·c·").unwrap(), "c");
        assert!(renderer.is_started());
    }

    #[test]
    fn test_renderer_crash_aborts_document() {
        let renderer = FormulaRenderer::with_command(
            RendererCommand::new("sh").arg("-c").arg("head -c 2 >/dev/null"),
        );

        let err = renderer.rewrite("·x·").unwrap_err();
        assert!(matches!(err, FormulaError::UnexpectedEof));
    }

    #[test]
    fn test_multiline_span_rendered() {
        let renderer = math_stub_renderer();
        assert_eq!(
            renderer.rewrite("·a\n+b· end").unwrap(),
            "<math>a\n+b</math> end"
        );
    }
}
