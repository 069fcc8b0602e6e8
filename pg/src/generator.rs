//! Generator
//!
//! The whole pipeline: read the template, render it, write the result.
//! Reading and rendering always finish before the output path is touched,
//! so a missing template or a syntax error never clobbers an existing file.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::bindings::Bindings;
use crate::error::{GenerateError, GenerateResult};
use crate::output::write_atomic;
use crate::render::{RenderOptions, Renderer};

/// Template read when nothing else is configured
pub const DEFAULT_TEMPLATE_PATH: &str = "phasequeen.jinja.yaml";

/// File written when nothing else is configured
pub const DEFAULT_OUTPUT_PATH: &str = "test_devmode_engine_liveness.yaml";

/// Outcome of a successful `generate`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateReport {
    pub output_path: PathBuf,
    pub bytes_written: usize,
}

/// Outcome of `check`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    /// Output file matches a fresh render
    UpToDate,
    /// Output file exists but differs
    Stale,
    /// No output file
    Missing,
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UpToDate => write!(f, "up to date"),
            Self::Stale => write!(f, "stale"),
            Self::Missing => write!(f, "missing"),
        }
    }
}

/// Renders one template into one output file
#[derive(Debug, Clone)]
pub struct Generator {
    template_path: PathBuf,
    output_path: PathBuf,
    bindings: Bindings,
    renderer: Renderer,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE_PATH, DEFAULT_OUTPUT_PATH)
    }
}

impl Generator {
    /// Generator with the default `n = 5` binding and default render options
    pub fn new(template_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            template_path: template_path.into(),
            output_path: output_path.into(),
            bindings: Bindings::default(),
            renderer: Renderer::default(),
        }
    }

    pub fn with_bindings(mut self, bindings: Bindings) -> Self {
        self.bindings = bindings;
        self
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.renderer = Renderer::new(options);
        self
    }

    pub fn template_path(&self) -> &Path {
        &self.template_path
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Read and render the template without touching the output path
    pub fn render(&self) -> GenerateResult<String> {
        debug!(template = ?self.template_path, "Generator::render: called");
        let source = fs::read_to_string(&self.template_path).map_err(|source| GenerateError::TemplateRead {
            path: self.template_path.clone(),
            source,
        })?;

        let name = self.template_path.display().to_string();
        self.renderer.render(&name, &source, &self.bindings)
    }

    /// Render the template and write it to the output path
    pub fn generate(&self) -> GenerateResult<GenerateReport> {
        debug!(template = ?self.template_path, output = ?self.output_path, "Generator::generate: called");
        let rendered = self.render()?;
        write_atomic(&self.output_path, &rendered)?;

        info!(
            "Generated {} from {} ({} bytes)",
            self.output_path.display(),
            self.template_path.display(),
            rendered.len()
        );
        Ok(GenerateReport {
            output_path: self.output_path.clone(),
            bytes_written: rendered.len(),
        })
    }

    /// Compare a fresh render with what is on disk
    pub fn check(&self) -> GenerateResult<CheckStatus> {
        debug!(output = ?self.output_path, "Generator::check: called");
        let rendered = self.render()?;

        let status = match fs::read(&self.output_path) {
            Ok(existing) if existing == rendered.as_bytes() => CheckStatus::UpToDate,
            Ok(_) => CheckStatus::Stale,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => CheckStatus::Missing,
            Err(source) => {
                return Err(GenerateError::OutputRead {
                    path: self.output_path.clone(),
                    source,
                });
            }
        };

        info!("{} is {}", self.output_path.display(), status);
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Value;
    use tempfile::TempDir;

    const ITEM_LOOP: &str = "{% for i in range(n) %}item-{{ i }}\n{% endfor %}";

    fn setup(template: &str) -> (TempDir, Generator) {
        let temp = TempDir::new().unwrap();
        let template_path = temp.path().join(DEFAULT_TEMPLATE_PATH);
        fs::write(&template_path, template).unwrap();
        let generator = Generator::new(template_path, temp.path().join(DEFAULT_OUTPUT_PATH));
        (temp, generator)
    }

    #[test]
    fn test_default_paths() {
        let generator = Generator::default();
        assert_eq!(generator.template_path(), Path::new("phasequeen.jinja.yaml"));
        assert_eq!(generator.output_path(), Path::new("test_devmode_engine_liveness.yaml"));
        assert_eq!(generator.bindings(), &Bindings::default());
    }

    #[test]
    fn test_generate_writes_five_items() {
        let (_temp, generator) = setup(ITEM_LOOP);
        let report = generator.generate().unwrap();

        let written = fs::read_to_string(generator.output_path()).unwrap();
        assert_eq!(written, "item-0\nitem-1\nitem-2\nitem-3\nitem-4\n");
        assert_eq!(report.bytes_written, written.len());
        assert_eq!(report.output_path, generator.output_path());
    }

    #[test]
    fn test_generate_twice_is_identical() {
        let (_temp, generator) = setup(ITEM_LOOP);
        generator.generate().unwrap();
        let first = fs::read(generator.output_path()).unwrap();
        generator.generate().unwrap();
        let second = fs::read(generator.output_path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_template_creates_nothing() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join(DEFAULT_OUTPUT_PATH);
        let generator = Generator::new(temp.path().join("absent.jinja.yaml"), &output);

        let err = generator.generate().unwrap_err();
        assert!(matches!(err, GenerateError::TemplateRead { .. }));
        assert!(!output.exists());
    }

    #[test]
    fn test_missing_template_leaves_existing_output_alone() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join(DEFAULT_OUTPUT_PATH);
        fs::write(&output, "previous").unwrap();
        let generator = Generator::new(temp.path().join("absent.jinja.yaml"), &output);

        assert!(generator.generate().is_err());
        assert_eq!(fs::read_to_string(&output).unwrap(), "previous");
    }

    #[test]
    fn test_syntax_error_leaves_existing_output_alone() {
        let (_temp, generator) = setup("{% for i in range(n) %}");
        fs::write(generator.output_path(), "previous").unwrap();

        let err = generator.generate().unwrap_err();
        assert!(matches!(err, GenerateError::TemplateSyntax { .. }));
        assert_eq!(fs::read_to_string(generator.output_path()).unwrap(), "previous");
    }

    #[test]
    fn test_unwritable_output_fails() {
        let temp = TempDir::new().unwrap();
        let template = temp.path().join(DEFAULT_TEMPLATE_PATH);
        fs::write(&template, ITEM_LOOP).unwrap();
        let generator = Generator::new(&template, temp.path().join("missing-dir").join("out.yaml"));

        let err = generator.generate().unwrap_err();
        assert!(matches!(err, GenerateError::OutputWrite { .. }));
    }

    #[test]
    fn test_custom_bindings() {
        let (_temp, generator) = setup(ITEM_LOOP);
        let generator = generator.with_bindings([("n", Value::from(2u64))].into_iter().collect());
        assert_eq!(generator.render().unwrap(), "item-0\nitem-1\n");
    }

    #[test]
    fn test_render_does_not_write() {
        let (_temp, generator) = setup(ITEM_LOOP);
        generator.render().unwrap();
        assert!(!generator.output_path().exists());
    }

    #[test]
    fn test_check_statuses() {
        let (_temp, generator) = setup(ITEM_LOOP);
        assert_eq!(generator.check().unwrap(), CheckStatus::Missing);

        generator.generate().unwrap();
        assert_eq!(generator.check().unwrap(), CheckStatus::UpToDate);

        fs::write(generator.output_path(), "edited by hand").unwrap();
        assert_eq!(generator.check().unwrap(), CheckStatus::Stale);
        assert_eq!(
            fs::read_to_string(generator.output_path()).unwrap(),
            "edited by hand"
        );
    }

    #[test]
    fn test_options_flow_to_renderer() {
        let (_temp, generator) = setup("{{ n }}\n");
        let generator = generator.with_options(RenderOptions {
            keep_trailing_newline: true,
            ..Default::default()
        });
        assert_eq!(generator.render().unwrap(), "5\n");
    }

    #[test]
    fn test_check_non_utf8_output_is_stale() {
        let (_temp, generator) = setup(ITEM_LOOP);
        fs::write(generator.output_path(), [0xff, 0xfe, b'\n']).unwrap();
        assert_eq!(generator.check().unwrap(), CheckStatus::Stale);
    }
}
