//! CLI for `openapi-postman`.
//!
//! Reads `config.json` from the working directory (or `--config`), fetches
//! the spec, and writes a Postman collection plus environments.
//!
//! ```text
//! openapi-postman
//! openapi-postman --config api/postman.yaml
//! RUST_LOG=openapi_postman=debug openapi-postman
//! ```

#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use openapi_postman::{
    convert, document_output_dir, load_spec, write_outputs, ConvertConfig, ProjectConfig, Report,
    Step, DEFAULT_CONFIG_FILE,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Convert an `OpenAPI` specification into a Postman collection and environments.
#[derive(Parser)]
#[command(name = "openapi-postman", version, about)]
struct Cli {
    /// Path to the JSON or YAML configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            tracing::error!("failed to start runtime: {err}");
            return ExitCode::FAILURE;
        }
    };

    let code = runtime.block_on(async move {
        let pipeline = tokio::task::spawn_blocking(move || run(&cli));
        tokio::select! {
            joined = pipeline => match joined {
                Ok(Ok(report)) => {
                    tracing::info!("done, {} files written", report.written_files().count());
                    ExitCode::SUCCESS
                }
                Ok(Err(err)) => {
                    tracing::error!("{err:#}");
                    ExitCode::FAILURE
                }
                Err(err) => {
                    tracing::error!("conversion task failed: {err}");
                    ExitCode::FAILURE
                }
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::warn!("interrupted");
                ExitCode::FAILURE
            }
        }
    });
    // An interrupted pipeline may still be blocked on I/O.
    runtime.shutdown_background();
    code
}

fn run(cli: &Cli) -> anyhow::Result<Report> {
    let mut report = Report::new();

    let project = ProjectConfig::load(&cli.config)
        .with_context(|| format!("Failed to load config: {}", cli.config.display()))?;
    project
        .validate()
        .with_context(|| format!("Invalid config: {}", cli.config.display()))?;
    report.record(Step::ConfigLoaded {
        path: cli.config.clone(),
    });

    let source = project.openapi_url()?;
    let doc = load_spec(source).with_context(|| format!("Failed to load spec: {source}"))?;
    report.record(Step::SpecLoaded {
        source: source.to_string(),
        title: doc.title().to_string(),
        version: doc.version().to_string(),
    });

    let exported_at = chrono::Utc::now().to_rfc3339();
    let config = ConvertConfig::new(project.base_url()?)
        .with_project_config(&project)
        .exported_at(&exported_at);
    let conversion = convert(&doc, &config);
    report.record(Step::Converted {
        endpoints: conversion.endpoint_count(),
        groups: conversion.group_count(),
    });
    report.record(Step::EnvironmentsGenerated {
        names: conversion
            .environments
            .iter()
            .map(|generated| generated.environment.name.clone())
            .collect(),
    });

    let dir = document_output_dir(&project, &doc);
    let written = write_outputs(&conversion, &dir, &project)
        .with_context(|| format!("Failed to write outputs to {}", dir.display()))?;
    for path in written {
        report.record(Step::FileWritten { path });
    }

    Ok(report)
}
