//! Software package lifecycle sample.
//!
//! Finds or creates a `Software Package` record and records a release
//! cycle against it as registry events:
//!
//! ```text
//! plan --> accepted --> release 1.0 --> disclosure --> private patch
//!      --> patch --> vulnerability update --> release 1.1 --> deprecation
//! ```
//!
//! Files in `sbom.attachments_dir` are uploaded first and attached to the
//! 1.0 release. The run talks to an in-process registry; every event is
//! appended with confirmation before the next is issued.

mod error;
mod scenario;

use std::process::ExitCode;

use tracing::{error, info};

use evidence_core::config::SamplesConfig;
use evidence_core::logging;
use evidence_registry::MemoryRegistry;

use crate::error::SbomError;

/// Application entry point.
///
/// Loads configuration, initializes logging, and runs the scenario. Any
/// failure is logged and turned into a non-zero exit status.
#[tokio::main]
async fn main() -> ExitCode {
    let loaded = SamplesConfig::load();
    let logging_config = loaded
        .as_ref()
        .map(|(config, _)| config.logging.clone())
        .unwrap_or_default();
    if let Err(e) = logging::init(&logging_config) {
        let err = SbomError::Logging {
            message: e.to_string(),
        };
        // No subscriber is installed, so this can only go to stderr.
        eprintln!("evidence-sbom: {err}");
        return ExitCode::FAILURE;
    }

    info!(version = env!("CARGO_PKG_VERSION"), "evidence-sbom starting");

    match run(loaded).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "evidence-sbom failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(
    loaded: Result<(SamplesConfig, Option<std::path::PathBuf>), evidence_core::ConfigError>,
) -> Result<(), SbomError> {
    let (config, path) = loaded?;
    match &path {
        Some(path) => info!(path = %path.display(), "Configuration loaded"),
        None => info!("Config file not found, using defaults"),
    }
    info!(
        package = config.sbom.package_name,
        namespace = config.registry.namespace.as_deref().unwrap_or_default(),
        attachments_dir = config
            .sbom
            .attachments_dir
            .as_ref()
            .map(|dir| dir.display().to_string())
            .unwrap_or_default(),
        "Scenario configuration"
    );

    let registry = MemoryRegistry::new();
    let report = scenario::run(&registry, &config).await?;

    info!(
        record = %report.record,
        existed = report.existed,
        events = report.events,
        version = report.version.as_deref().unwrap_or_default(),
        "Done"
    );
    Ok(())
}
