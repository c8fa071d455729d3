//! Formula span extraction.

/// Delimiter marking formula span boundaries.
const DELIMITER: char = '·';

/// Escape character suppressing a delimiter.
const ESCAPE: char = '\\';

/// A delimited formula span within document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FormulaSpan<'a> {
    /// Byte offset of the opening delimiter.
    pub start: usize,
    /// Byte offset one past the closing delimiter.
    pub end: usize,
    /// Raw source between the delimiters.
    pub source: &'a str,
}

/// Find every well-formed formula span, left to right.
///
/// Unescaped delimiters pair up in order; a delimiter immediately preceded
/// by the escape character neither opens nor closes a span, so `\·` inside
/// a span does not terminate it. Spans may contain newlines. A trailing
/// unpaired delimiter leaves the rest of the text unmatched.
pub(crate) fn find_spans(text: &str) -> Vec<FormulaSpan<'_>> {
    let mut spans = Vec::new();
    let mut open = None;
    let mut prev = None;

    for (i, ch) in text.char_indices() {
        if ch == DELIMITER && prev != Some(ESCAPE) {
            match open.take() {
                None => open = Some(i),
                Some(start) => spans.push(FormulaSpan {
                    start,
                    end: i + DELIMITER.len_utf8(),
                    source: &text[start + DELIMITER.len_utf8()..i],
                }),
            }
        }
        prev = Some(ch);
    }

    spans
}
