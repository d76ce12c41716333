//! Location updates for mobile assets.

use evidence_registry::{NewEvent, Registry};
use evidence_types::{Attributes, Event, EventProps, Principal, RecordId};

use crate::composer::{compose, EventOptions};
use crate::error::EvidenceError;
use crate::payload::{EventPayload, Movement};
use crate::time_warp::TimeWarp;

/// The tracker principal for a crate: the crate's own smart tag under
/// `issuer`.
pub fn tracker(issuer: &str, crate_name: &str) -> Principal {
    Principal {
        issuer: issuer.to_owned(),
        subject: crate_name.to_owned(),
        display_name: format!("Tracker for {crate_name}"),
    }
}

/// A record that moves, such as a shipping crate.
///
/// Each [`move_to`](Self::move_to) appends a `Location Update` event
/// declared at the asset's [`TimeWarp`] time on behalf of its tracker
/// principal, and moves the record's `arc_gis_*` attributes.
#[derive(Debug)]
pub struct MobileAsset<'r, R> {
    registry: &'r R,
    record: RecordId,
    clock: TimeWarp,
    principal: Principal,
}

impl<'r, R: Registry> MobileAsset<'r, R> {
    /// Bind to `record`, declaring events as `principal`.
    pub const fn new(registry: &'r R, record: RecordId, clock: TimeWarp, principal: Principal) -> Self {
        Self {
            registry,
            record,
            clock,
            principal,
        }
    }

    /// The bound record.
    pub const fn record(&self) -> RecordId {
        self.record
    }

    /// Report a new position.
    ///
    /// # Errors
    ///
    /// [`EvidenceError::InvalidField`] for an out-of-range coordinate,
    /// [`EvidenceError::MissingField`] for a blank description, otherwise
    /// any registry failure.
    pub async fn move_to(
        &self,
        movement: &Movement,
        custom_attrs: Option<&Attributes>,
    ) -> Result<Event, EvidenceError> {
        let options = EventOptions {
            custom_attrs: custom_attrs.cloned(),
            ..EventOptions::default()
        };
        let attributes = compose(movement, &options)?;
        let props = EventProps {
            timestamp_declared: Some(self.clock.now()),
            principal_declared: Some(self.principal.clone()),
            ..EventProps::record_evidence()
        };

        let event = self
            .registry
            .create_event(NewEvent {
                record: self.record,
                props,
                attributes,
                asset_attributes: Some(movement.asset_attributes()),
                confirm: true,
            })
            .await?;
        tracing::info!(
            record = %self.record,
            event = %event.identity,
            kind = %movement.kind(),
            latitude = %movement.latitude_text(),
            longitude = %movement.longitude_text(),
            "Location update appended"
        );
        Ok(event)
    }
}
