//! Per-document dispatch for the post-processing transforms.
//!
//! A build hands every generated document to [`Pipeline::process`] with its
//! [`DocumentKind`]. HTML documents run through the enabled transforms in a
//! fixed order (sidenotes, then formulas); every other kind passes through
//! untouched. The pipeline owns the formula renderer, so one external
//! typesetting process serves the whole run.

use std::path::Path;

use lf_config::Config;
use lf_formulas::{FormulaRenderer, RendererCommand};
use lf_sidenotes::insert_sidenotes;

/// Kind of a document handed to the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Generated HTML; the transforms apply.
    Html,
    /// Anything else; passed through untouched.
    Other,
}

impl DocumentKind {
    /// Recognize the kind from a file path's extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm") => {
                Self::Html
            }
            _ => Self::Other,
        }
    }
}

/// Error from either document transform.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Sidenote rewriting failed.
    #[error("{0}")]
    Sidenotes(#[from] lf_sidenotes::SidenoteError),

    /// Formula rendering failed.
    #[error("{0}")]
    Formulas(#[from] lf_formulas::FormulaError),
}

/// Post-processing pipeline for one build run.
pub struct Pipeline {
    sidenotes_enabled: bool,
    formulas: Option<FormulaRenderer>,
}

impl Pipeline {
    /// Build a pipeline from configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let formulas = config.formulas.enabled.then(|| {
            config
                .formulas
                .command
                .as_deref()
                .and_then(RendererCommand::from_argv)
                .map_or_else(FormulaRenderer::new, FormulaRenderer::with_command)
        });

        Self {
            sidenotes_enabled: config.sidenotes.enabled,
            formulas,
        }
    }

    /// Apply the enabled transforms to one document.
    ///
    /// Returns `Ok(None)` when the kind is not recognized markup; the
    /// caller keeps the original text. An error from either transform
    /// aborts the document with no partial output.
    ///
    /// # Errors
    ///
    /// Propagates [`PipelineError::Sidenotes`] and
    /// [`PipelineError::Formulas`] unchanged.
    pub fn process(&self, kind: DocumentKind, text: &str) -> Result<Option<String>, PipelineError> {
        if kind != DocumentKind::Html {
            tracing::debug!(?kind, "Document kind not transformed");
            return Ok(None);
        }

        let mut current = text.to_owned();
        if self.sidenotes_enabled {
            current = insert_sidenotes(&current)?;
        }
        if let Some(renderer) = &self.formulas {
            current = renderer.rewrite(&current)?;
        }
        Ok(Some(current))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sidenotes_only_config() -> Config {
        let mut config = Config::default();
        config.formulas.enabled = false;
        config
    }

    /// Config using `cat` as the formula renderer: spans render to their
    /// own (entity-unescaped) source.
    fn echo_formulas_config() -> Config {
        let mut config = Config::default();
        config.sidenotes.enabled = false;
        config.formulas.command = Some(vec!["cat".to_owned()]);
        config
    }

    #[test]
    fn test_kind_from_path() {
        assert_eq!(
            DocumentKind::from_path(Path::new("out/post.html")),
            DocumentKind::Html
        );
        assert_eq!(
            DocumentKind::from_path(Path::new("out/post.HTM")),
            DocumentKind::Html
        );
        assert_eq!(
            DocumentKind::from_path(Path::new("media/style.css")),
            DocumentKind::Other
        );
        assert_eq!(
            DocumentKind::from_path(Path::new("Makefile")),
            DocumentKind::Other
        );
    }

    #[test]
    fn test_non_html_passes_through() {
        let pipeline = Pipeline::new(&sidenotes_only_config());
        let result = pipeline.process(DocumentKind::Other, "·x· and footnotes").unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn test_html_gets_sidenotes() {
        let pipeline = Pipeline::new(&sidenotes_only_config());
        let html = concat!(
            r#"<article><div id="lf-text"><p>See<sup id="fnref-1">1</sup></p></div></article>"#,
            r#"<div class="footnote"><ol><li id="fn-1"><p>Note.</p></li></ol></div>"#,
        );

        let result = pipeline.process(DocumentKind::Html, html).unwrap().unwrap();
        assert!(result.contains(r#"<aside role="note""#));
    }

    #[test]
    fn test_html_gets_formulas() {
        let pipeline = Pipeline::new(&echo_formulas_config());

        let result = pipeline
            .process(DocumentKind::Html, "<p>Compute ·a+b· now.</p>")
            .unwrap()
            .unwrap();
        assert_eq!(result, "<p>Compute a+b now.</p>");
    }

    #[test]
    fn test_transform_error_propagates() {
        let pipeline = Pipeline::new(&sidenotes_only_config());
        // A reference with no definition list at all.
        let html = r#"<div id="lf-text"><p><sup id="fnref-1">1</sup></p></div>"#;

        let err = pipeline.process(DocumentKind::Html, html).unwrap_err();
        assert!(matches!(err, PipelineError::Sidenotes(_)));
    }

    #[test]
    fn test_everything_disabled_returns_input() {
        let mut config = Config::default();
        config.sidenotes.enabled = false;
        config.formulas.enabled = false;
        let pipeline = Pipeline::new(&config);

        let result = pipeline.process(DocumentKind::Html, "<p>as-is</p>").unwrap();
        assert_eq!(result.as_deref(), Some("<p>as-is</p>"));
    }
}
