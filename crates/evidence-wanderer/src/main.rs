//! Shipping crate journey sample.
//!
//! Walks a smart shipping crate from Synsation's Flint plant to its
//! Stuttgart finishing plant, appending one `Location Update` event per
//! stop:
//!
//! ```text
//! Flint --> Chicago --> Newark --> Heathrow T4 --> Munich --> Stuttgart Hub --> plant
//! ```
//!
//! Each update is declared by the crate's smart tag at accelerated
//! "time warp" time and moves the crate record's coordinates. The process
//! exits non-zero if no crate can be found.

mod error;
mod voyage;

use std::process::ExitCode;

use tracing::{error, info};

use evidence_core::config::SamplesConfig;
use evidence_core::logging;
use evidence_registry::MemoryRegistry;

use crate::error::WandererError;

/// Application entry point.
///
/// Loads configuration, initializes logging, resolves the crate, and runs
/// the journey. Any failure is logged and turned into a non-zero exit
/// status.
#[tokio::main]
async fn main() -> ExitCode {
    let loaded = SamplesConfig::load();
    let logging_config = loaded
        .as_ref()
        .map(|(config, _)| config.logging.clone())
        .unwrap_or_default();
    if let Err(e) = logging::init(&logging_config) {
        let err = WandererError::Logging {
            message: e.to_string(),
        };
        // No subscriber is installed, so this can only go to stderr.
        eprintln!("evidence-wanderer: {err}");
        return ExitCode::FAILURE;
    }

    info!(version = env!("CARGO_PKG_VERSION"), "evidence-wanderer starting");

    match run(loaded).await {
        Ok(()) => {
            info!("Done");
            ExitCode::SUCCESS
        }
        Err(WandererError::NoCrate { name }) => {
            error!(name = name.as_deref().unwrap_or_default(), "Could not find target crate, aborting");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!(error = %e, "evidence-wanderer failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(
    loaded: Result<(SamplesConfig, Option<std::path::PathBuf>), evidence_core::ConfigError>,
) -> Result<(), WandererError> {
    let (config, path) = loaded?;
    match &path {
        Some(path) => info!(path = %path.display(), "Configuration loaded"),
        None => info!("Config file not found, using defaults"),
    }
    info!(
        crate_name = config.journey.crate_name.as_deref().unwrap_or_default(),
        display_type = config.journey.crate_display_type,
        namespace = config.registry.namespace.as_deref().unwrap_or_default(),
        delay_ms = config.journey.delay_ms,
        units = config.journey.units,
        "Journey configuration"
    );

    let registry = MemoryRegistry::new();
    let record = voyage::find_crate(&registry, &config).await?;
    let events = voyage::sail(&registry, &record, &config.journey).await?;

    info!(
        record = %record.identity,
        name = record.display_name().unwrap_or_default(),
        events = events.len(),
        "Journey recorded"
    );
    Ok(())
}
