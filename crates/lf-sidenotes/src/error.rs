//! Error types for sidenote rewriting.

/// Error during the footnote-to-sidenote transform.
///
/// All variants abort the whole document transform; there is no partial
/// output. The structural variants ([`MissingDefinition`], [`MissingAnchor`])
/// signal a malformed source document and are meant to fail the build for
/// that document.
///
/// [`MissingDefinition`]: SidenoteError::MissingDefinition
/// [`MissingAnchor`]: SidenoteError::MissingAnchor
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SidenoteError {
    /// Markup parsing error.
    #[error("HTML parse error")]
    Parse(#[from] quick_xml::Error),

    /// Encoding error during parsing.
    #[error("encoding error")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    /// A footnote reference has no definition with the matching name.
    #[error("footnote reference '{name}' has no matching definition")]
    MissingDefinition {
        /// Footnote name (the id without its `fnref-` prefix).
        name: String,
    },

    /// A footnote reference has no `lf-text` ancestor with an insertable
    /// parent, so no sidenote position exists.
    #[error("footnote reference '{name}' has no sidenote anchor")]
    MissingAnchor {
        /// Footnote name (the id without its `fnref-` prefix).
        name: String,
    },
}
