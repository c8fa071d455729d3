//! Error types for formula rendering.

/// Error during formula rendering.
///
/// Every variant aborts the current document's transform; there are no
/// retries and the renderer process is not restarted.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum FormulaError {
    /// Spawn or pipe I/O failure.
    #[error("renderer I/O error")]
    Io(#[from] std::io::Error),

    /// The renderer's output stream ended before a frame terminator.
    #[error("unexpected end of renderer stream")]
    UnexpectedEof,

    /// A response frame was not valid UTF-8.
    #[error("renderer response is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}
