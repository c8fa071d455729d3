//! The `process` command: run the pipeline over generated HTML files.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use lf_config::Config;
use lf_pipeline::{DocumentKind, Pipeline};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for `lf process`.
#[derive(Args)]
pub(crate) struct ProcessArgs {
    /// Files or directories to process; directories expand to **/*.html.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Explicit config file (default: discover lf.toml upward from the
    /// working directory).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the processed document to stdout instead of rewriting the file
    /// (single input file only).
    #[arg(long)]
    pub stdout: bool,

    /// Enable info-level logging.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ProcessArgs {
    pub(crate) fn execute(&self, output: &Output) -> Result<(), CliError> {
        let config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::discover(&std::env::current_dir()?)?,
        };
        let pipeline = Pipeline::new(&config);

        let files = collect_files(&self.paths)?;
        if files.is_empty() {
            return Err(CliError::Validation("no input files matched".to_owned()));
        }
        if self.stdout && files.len() > 1 {
            return Err(CliError::Validation(
                "--stdout accepts a single input file".to_owned(),
            ));
        }

        let mut rewritten = 0_usize;
        for file in &files {
            let kind = DocumentKind::from_path(file);
            let text = fs::read_to_string(file)?;

            match pipeline.process(kind, &text)? {
                Some(processed) if self.stdout => {
                    std::io::stdout().write_all(processed.as_bytes())?;
                }
                Some(processed) => {
                    if processed != text {
                        fs::write(file, &processed)?;
                        rewritten += 1;
                        tracing::info!(file = %file.display(), "Rewrote document");
                    }
                }
                None => {
                    tracing::info!(file = %file.display(), "Skipped non-HTML document");
                }
            }
        }

        if !self.stdout {
            output.success(&format!(
                "Processed {} file(s), rewrote {rewritten}",
                files.len()
            ));
        }
        Ok(())
    }
}

/// Expand files and directories into the list of files to process.
fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>, CliError> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let pattern = path.join("**").join("*.html");
            for entry in glob::glob(&pattern.to_string_lossy())? {
                files.push(entry?);
            }
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}
