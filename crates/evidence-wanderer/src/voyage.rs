//! Finding the crate and walking it along its route.

use futures::TryStreamExt;
use tracing::info;

use evidence_core::config::{JourneyConfig, SamplesConfig};
use evidence_core::mobile_asset::tracker;
use evidence_core::{
    EvidenceError, Journey, JourneySimulator, MobileAsset, RecordLocator, TimeWarp,
};
use evidence_registry::Registry;
use evidence_types::{Attributes, Event, Record};

use crate::error::WandererError;

/// Crate created when seeding is on and no crate is named.
pub const SEED_CRATE_NAME: &str = "Synsation Crate 1944";

fn crate_description(journey: &JourneyConfig) -> String {
    format!(
        "Smart shipping crate carrying {} widgets, tracked by {}",
        journey.units, journey.issuer
    )
}

/// Resolve the crate to move.
///
/// A named crate is looked up by name, and created first when
/// `journey.seed_crate` is set. Without a name the first crate of the
/// configured display type is used; with seeding on and no crate at all,
/// [`SEED_CRATE_NAME`] is created.
///
/// # Errors
///
/// [`WandererError::NoCrate`] if nothing matches, otherwise any evidence
/// failure.
pub async fn find_crate<R: Registry>(
    registry: &R,
    config: &SamplesConfig,
) -> Result<Record, WandererError> {
    let journey = &config.journey;
    let locator = RecordLocator::new(registry, journey.crate_display_type.as_str())
        .with_namespace(config.registry.namespace.clone());

    if let Some(name) = journey.crate_name.as_deref() {
        info!(name, "Looking for smart shipping crate");
        if journey.seed_crate {
            let located = locator
                .create_or_find(name, &crate_description(journey), None, &[])
                .await?;
            return Ok(located.record);
        }
        return match locator.read_by_signature(&locator.signature(name)).await {
            Ok(record) => Ok(record),
            Err(e) if e.is_not_found() => Err(WandererError::NoCrate {
                name: Some(name.to_owned()),
            }),
            Err(e) => Err(e.into()),
        };
    }

    info!("No crate specified, searching for one");
    let mut crates = locator.list(&Attributes::new());
    if let Some(found) = crates.try_next().await? {
        info!(name = found.display_name().unwrap_or_default(), "Using crate");
        return Ok(found);
    }

    if journey.seed_crate {
        let located = locator
            .create_or_find(SEED_CRATE_NAME, &crate_description(journey), None, &[])
            .await?;
        return Ok(located.record);
    }
    Err(WandererError::NoCrate { name: None })
}

/// Move `record` along the configured route.
///
/// # Errors
///
/// Stops at the first failed location update.
pub async fn sail<R: Registry>(
    registry: &R,
    record: &Record,
    journey: &JourneyConfig,
) -> Result<Vec<Event>, EvidenceError> {
    info!(
        start_days_ago = journey.start_days_ago,
        fast_forward = journey.fast_forward,
        "Creating time warp"
    );
    let clock = TimeWarp::starting_days_ago(journey.start_days_ago, journey.fast_forward);
    let subject = record.display_name().unwrap_or_default();
    let asset = MobileAsset::new(
        registry,
        record.identity,
        clock,
        tracker(&journey.issuer, subject),
    );

    info!("Beginning journey simulation");
    JourneySimulator::new(&asset, Journey::synsation(journey.units), journey.delay())
        .run()
        .await
}
