//! Configuration for the post-processing pipeline.
//!
//! Parses `lf.toml` files with serde and provides auto-discovery of the
//! config file in the working directory or any parent. Every section is
//! optional; the defaults enable both transforms with the built-in
//! renderer command.
//!
//! ```toml
//! [sidenotes]
//! enabled = true
//!
//! [formulas]
//! enabled = true
//! command = ["node", "-e", "..."]   # optional renderer override
//! ```

use std::path::Path;

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "lf.toml";

/// Pipeline configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sidenote transform settings.
    pub sidenotes: SidenotesConfig,
    /// Formula transform settings.
    pub formulas: FormulasConfig,
}

/// Sidenote transform settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SidenotesConfig {
    /// Whether footnotes are rewritten into sidenotes.
    pub enabled: bool,
}

impl Default for SidenotesConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Formula transform settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FormulasConfig {
    /// Whether formula spans are rendered.
    pub enabled: bool,
    /// Renderer command line, program first. When absent, the built-in
    /// KaTeX-over-node command is used.
    pub command: Option<Vec<String>>,
}

impl Default for FormulasConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: None,
        }
    }
}

/// Configuration loading error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
}

impl Config {
    /// Load configuration from an explicit file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Discover `lf.toml` in `start_dir` or any parent and load it.
    ///
    /// Returns the default configuration when no file is found.
    ///
    /// # Errors
    ///
    /// Returns an error if a discovered file cannot be read or parsed.
    pub fn discover(start_dir: &Path) -> Result<Self, ConfigError> {
        for dir in start_dir.ancestors() {
            let candidate = dir.join(CONFIG_FILENAME);
            if candidate.is_file() {
                return Self::load(&candidate);
            }
        }
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.sidenotes.enabled);
        assert!(config.formulas.enabled);
        assert_eq!(config.formulas.command, None);
    }

    #[test]
    fn test_empty_toml_is_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.sidenotes.enabled);
        assert!(config.formulas.enabled);
    }

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
            [sidenotes]
            enabled = false

            [formulas]
            enabled = true
            command = ["node", "-e", "script"]
            "#,
        )
        .unwrap();

        assert!(!config.sidenotes.enabled);
        assert!(config.formulas.enabled);
        assert_eq!(
            config.formulas.command.as_deref(),
            Some(&["node".to_owned(), "-e".to_owned(), "script".to_owned()][..])
        );
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: Config = toml::from_str("[formulas]\nenabled = false\n").unwrap();
        assert!(config.sidenotes.enabled);
        assert!(!config.formulas.enabled);
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lf.toml");
        std::fs::write(&path, "[formulas\nenabled = what").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_discover_in_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("lf.toml"), "[sidenotes]\nenabled = false\n").unwrap();
        let nested = dir.path().join("out").join("posts");
        std::fs::create_dir_all(&nested).unwrap();

        let config = Config::discover(&nested).unwrap();
        assert!(!config.sidenotes.enabled);
    }

    #[test]
    fn test_discover_without_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::discover(dir.path()).unwrap();
        assert!(config.sidenotes.enabled);
        assert!(config.formulas.enabled);
    }
}
