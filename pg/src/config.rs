//! Configuration types and loading

use eyre::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::bindings::Bindings;
use crate::generator::{DEFAULT_OUTPUT_PATH, DEFAULT_TEMPLATE_PATH, Generator};
use crate::render::RenderOptions;

/// Project-local config file name
pub const LOCAL_CONFIG_FILE: &str = ".phasegen.yml";

/// Main configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Template to render
    pub template: PathBuf,

    /// Where the rendered text is written
    pub output: PathBuf,

    /// Keep the template's final newline
    #[serde(rename = "keep-trailing-newline")]
    pub keep_trailing_newline: bool,

    /// Fail on undefined template variables
    #[serde(rename = "strict-undefined")]
    pub strict_undefined: bool,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Extra or overriding template variables, laid over `n: 5`
    pub vars: Bindings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            template: PathBuf::from(DEFAULT_TEMPLATE_PATH),
            output: PathBuf::from(DEFAULT_OUTPUT_PATH),
            keep_trailing_newline: false,
            strict_undefined: false,
            log_level: None,
            vars: Bindings::empty(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    ///
    /// 1. explicit path (must load)
    /// 2. `./.phasegen.yml`
    /// 3. `~/.config/phasegen/phasegen.yml`
    /// 4. defaults
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        if let Some(config) = Self::load_first(&Self::implicit_paths()) {
            return Ok(config);
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is set up
    ///
    /// Walks the same chain as `load`; `load` reports failures once logging works.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let config = match config_path {
            Some(path) => Self::load_from_file(path).ok(),
            None => Self::load_first(&Self::implicit_paths()),
        };
        config.and_then(|config| config.log_level)
    }

    /// First candidate that exists and parses; broken files are warned about and skipped
    fn load_first(candidates: &[PathBuf]) -> Option<Self> {
        for candidate in candidates {
            if candidate.exists() {
                match Self::load_from_file(candidate) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {:#}", candidate.display(), e);
                    }
                }
            }
        }
        None
    }

    fn implicit_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("phasegen").join("phasegen.yml"));
        }
        paths
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            keep_trailing_newline: self.keep_trailing_newline,
            strict_undefined: self.strict_undefined,
        }
    }

    /// Default bindings with `vars` laid over them
    pub fn bindings(&self) -> Bindings {
        let mut bindings = Bindings::default();
        bindings.merge(self.vars.clone());
        bindings
    }

    pub fn generator(&self) -> Generator {
        Generator::new(&self.template, &self.output)
            .with_bindings(self.bindings())
            .with_options(self.render_options())
    }
}
