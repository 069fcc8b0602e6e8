//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

use crate::bindings::NODE_COUNT_VAR;
use crate::config::Config;

/// Render the PhaseQueen devmode liveness test definition
///
/// With no arguments, reads `phasequeen.jinja.yaml`, renders it with `n=5`
/// and writes `test_devmode_engine_liveness.yaml` in the current directory.
#[derive(Debug, Parser)]
#[command(name = "pg", author, version)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Template to render
    #[arg(short, long, value_name = "PATH")]
    pub template: Option<PathBuf>,

    /// File to write
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Node count (shorthand for --set n=N)
    #[arg(short = 'n', value_name = "N")]
    pub nodes: Option<u64>,

    /// Set a template variable (repeatable)
    #[arg(short, long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// Keep the template's final newline
    #[arg(long)]
    pub keep_trailing_newline: bool,

    /// Fail on undefined template variables
    #[arg(long)]
    pub strict: bool,

    /// Print the rendered text instead of writing the output file
    #[arg(long, conflicts_with = "check")]
    pub stdout: bool,

    /// Exit non-zero if the output file is missing or out of date
    #[arg(long)]
    pub check: bool,
}

impl Cli {
    /// Lay command-line overrides over a loaded config
    ///
    /// `-n` lands in `vars` here; `--set` is applied later so it can fail
    /// with a proper binding error.
    pub fn apply_to(&self, config: &mut Config) {
        debug!(?self, "Cli::apply_to: called");
        if let Some(template) = &self.template {
            config.template = template.clone();
        }
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(n) = self.nodes {
            config.vars.set(NODE_COUNT_VAR, n);
        }
        if self.keep_trailing_newline {
            config.keep_trailing_newline = true;
        }
        if self.strict {
            config.strict_undefined = true;
        }
        if self.log_level.is_some() {
            config.log_level = self.log_level.clone();
        }
    }
}
