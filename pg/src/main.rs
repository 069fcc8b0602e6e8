//! PhaseGen - CLI entry point
//!
//! Read → render → write, with optional `--stdout` and `--check` modes.

use std::io::{IsTerminal, Write};
use std::process::ExitCode;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use phasegen::cli::Cli;
use phasegen::config::Config;
use phasegen::{CheckStatus, Generator};

fn parse_level(level: Option<&str>) -> tracing::Level {
    match level.map(|s| s.to_uppercase()) {
        None => tracing::Level::WARN,
        Some(s) => match s.as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to WARN", s);
                tracing::Level::WARN
            }
        },
    }
}

fn build_filter(level_str: Option<&str>) -> EnvFilter {
    match level_str {
        // An explicit level wins over a global RUST_LOG level; target directives still apply
        Some(_) => EnvFilter::from_default_env().add_directive(parse_level(level_str).into()),
        // Otherwise RUST_LOG decides, WARN when it is unset or unusable
        None => EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .from_env_lossy(),
    }
}

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Priority: CLI --log-level > config file > RUST_LOG > WARN
    let filter = build_filter(cli_log_level.or(config_log_level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| eyre::eyre!("{}", e))?;

    debug!("Logging initialized");
    Ok(())
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    cli.apply_to(&mut config);

    let mut bindings = config.bindings();
    bindings.apply_assignments(cli.set.as_slice())?;

    let generator = config.generator().with_bindings(bindings);
    info!(
        "pg: {} -> {}",
        generator.template_path().display(),
        generator.output_path().display()
    );

    if cli.stdout {
        debug!("main: rendering to stdout");
        return cmd_stdout(&generator);
    }
    if cli.check {
        debug!("main: checking output");
        return cmd_check(&generator);
    }
    cmd_generate(&generator)
}

fn cmd_generate(generator: &Generator) -> Result<ExitCode> {
    let report = generator.generate()?;
    println!(
        "{} Wrote {} ({} bytes)",
        "✓".green(),
        report.output_path.display().to_string().cyan(),
        report.bytes_written
    );
    Ok(ExitCode::SUCCESS)
}

fn cmd_stdout(generator: &Generator) -> Result<ExitCode> {
    let rendered = generator.render()?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(rendered.as_bytes()).context("Failed to write to stdout")?;
    stdout.flush().context("Failed to flush stdout")?;
    Ok(ExitCode::SUCCESS)
}

fn cmd_check(generator: &Generator) -> Result<ExitCode> {
    let status = generator.check()?;
    let path = generator.output_path().display().to_string();
    match status {
        CheckStatus::UpToDate => {
            println!("{} {} is up to date", "✓".green(), path.cyan());
            Ok(ExitCode::SUCCESS)
        }
        CheckStatus::Stale | CheckStatus::Missing => {
            println!("{} {} is {}", "✗".red(), path.cyan(), status);
            Ok(ExitCode::FAILURE)
        }
    }
}
