//! PhaseGen - PhaseQueen liveness test generator
//!
//! Renders the Jinja template `phasequeen.jinja.yaml` with `n = 5` and writes
//! the result to `test_devmode_engine_liveness.yaml`. The pipeline is strictly
//! read → render → write; nothing is written unless the first two succeed.
//!
//! # Modules
//!
//! - [`generator`] - The read/render/write pipeline and up-to-date checks
//! - [`render`] - Jinja rendering via minijinja
//! - [`bindings`] - Template variables and `KEY=VALUE` parsing
//! - [`output`] - Atomic output file writes
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface
//!
//! # Example
//!
//! ```no_run
//! use phasegen::Generator;
//!
//! let report = Generator::default().generate()?;
//! println!("wrote {} bytes", report.bytes_written);
//! # Ok::<(), phasegen::GenerateError>(())
//! ```

pub mod bindings;
pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod output;
pub mod render;

pub use bindings::{Bindings, DEFAULT_NODE_COUNT, NODE_COUNT_VAR, parse_assignment};
pub use config::Config;
pub use error::{GenerateError, GenerateResult};
pub use generator::{CheckStatus, DEFAULT_OUTPUT_PATH, DEFAULT_TEMPLATE_PATH, GenerateReport, Generator};
pub use output::write_atomic;
pub use render::{RenderOptions, Renderer};
