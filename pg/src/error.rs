//! Errors from the read → render → write pipeline

use std::path::PathBuf;

use thiserror::Error;

/// Errors from generation operations
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Failed to read template {}", path.display())]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Template syntax error in {name}")]
    TemplateSyntax {
        name: String,
        #[source]
        source: minijinja::Error,
    },

    #[error("Failed to render template {name}")]
    Render {
        name: String,
        #[source]
        source: minijinja::Error,
    },

    #[error("Failed to write output {}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read existing output {}", path.display())]
    OutputRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid binding '{0}': expected KEY=VALUE with KEY an identifier")]
    InvalidBinding(String),
}

/// Result alias for generation operations
pub type GenerateResult<T> = Result<T, GenerateError>;
