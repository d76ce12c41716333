//! Software package lifecycle events.
//!
//! A [`SoftwarePackage`] is bound to exactly one `Software Package` record.
//! It can only be obtained from [`SoftwarePackage::create`],
//! [`SoftwarePackage::read`] or [`SoftwarePackage::read_by_signature`], so
//! there is no way to append an event without a record.
//!
//! Each event operation composes the payload's attributes, appends one
//! event with `confirm = true` and returns it. A blank field fails with
//! [`EvidenceError::MissingField`] before the registry is called.

use evidence_registry::{NewEvent, Registry};
use evidence_types::{keys, Attachment, Attributes, Event, EventProps, Record, RecordId};

use crate::composer::{compose, EventOptions};
use crate::error::EvidenceError;
use crate::locator::RecordLocator;
use crate::payload::{
    Deprecation, EventPayload, PrivatePatch, ReleaseAccepted, ReleasePlan, Sbom, SbomEvent,
    SbomPatch, Vulnerability, VulnerabilityStage,
};

/// Display type of software package records.
pub const SOFTWARE_PACKAGE_TYPE: &str = "Software Package";

/// Options for [`SoftwarePackage::release`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseOptions {
    /// Attachments and custom event attributes.
    pub event: EventOptions,
    /// The release the record should describe afterwards, if not the one
    /// being published (backdated or corrective releases).
    pub latest: Option<Sbom>,
    /// Custom attributes applied to the record after the release fields.
    pub custom_asset_attrs: Option<Attributes>,
}

/// A software package record and the events that can be appended to it.
#[derive(Debug)]
pub struct SoftwarePackage<'r, R> {
    registry: &'r R,
    record: Record,
    existed: bool,
}

impl<'r, R: Registry> SoftwarePackage<'r, R> {
    /// Find the package named `name`, creating it if absent.
    ///
    /// # Errors
    ///
    /// As [`RecordLocator::create_or_find`].
    pub async fn create(
        locator: &RecordLocator<'r, R>,
        name: &str,
        description: &str,
        base_attrs: Option<&Attributes>,
        attachments: &[Attachment],
    ) -> Result<Self, EvidenceError> {
        let located = locator
            .create_or_find(name, description, base_attrs, attachments)
            .await?;
        Ok(Self {
            registry: locator.registry(),
            record: located.record,
            existed: located.existed,
        })
    }

    /// Bind to an existing package by identity.
    ///
    /// # Errors
    ///
    /// `NotFound` if the identity is absent.
    pub async fn read(
        locator: &RecordLocator<'r, R>,
        identity: RecordId,
    ) -> Result<Self, EvidenceError> {
        let record = locator.read(identity).await?;
        Ok(Self::bound(locator.registry(), record))
    }

    /// Bind to the single package matching `attrs`.
    ///
    /// # Errors
    ///
    /// `NotFound` on zero matches, `DuplicateResult` on more than one.
    pub async fn read_by_signature(
        locator: &RecordLocator<'r, R>,
        attrs: &Attributes,
    ) -> Result<Self, EvidenceError> {
        let record = locator.read_by_signature(attrs).await?;
        Ok(Self::bound(locator.registry(), record))
    }

    const fn bound(registry: &'r R, record: Record) -> Self {
        Self {
            registry,
            record,
            existed: true,
        }
    }

    /// The bound record as last read.
    pub const fn record(&self) -> &Record {
        &self.record
    }

    /// Whether the record existed before this package was bound.
    pub const fn existed(&self) -> bool {
        self.existed
    }

    /// Re-read the bound record, picking up asset attribute changes.
    ///
    /// # Errors
    ///
    /// Any registry failure.
    pub async fn refresh(&mut self) -> Result<&Record, EvidenceError> {
        self.record = self.registry.read_record(self.record.identity).await?;
        Ok(&self.record)
    }

    /// Publish a release. The record's `sbom_*` fields are updated to
    /// `options.latest`, or to `sbom` when no latest is given.
    ///
    /// The record keeps the name it is found by: `arc_display_name` is
    /// written back as the bound record's name, whatever the release or the
    /// custom asset attributes call the component, and `arc_display_type`
    /// is never sent.
    ///
    /// # Errors
    ///
    /// [`EvidenceError::MissingField`] for a blank field in `sbom` or
    /// `latest`, otherwise any registry failure.
    pub async fn release(&self, sbom: &Sbom, options: &ReleaseOptions) -> Result<Event, EvidenceError> {
        let attributes = compose(sbom, &options.event)?;
        let mut asset = options
            .latest
            .as_ref()
            .unwrap_or(sbom)
            .asset_attributes(options.custom_asset_attrs.as_ref())?;
        asset.remove(keys::ARC_DISPLAY_TYPE);
        if let Some(name) = self.record.display_name() {
            asset.insert(keys::ARC_DISPLAY_NAME.to_owned(), name.into());
        }
        self.append(sbom, attributes, Some(asset)).await
    }

    /// Record a release plan.
    ///
    /// # Errors
    ///
    /// [`EvidenceError::MissingField`] or any registry failure.
    pub async fn release_plan(
        &self,
        plan: &ReleasePlan,
        options: &EventOptions,
    ) -> Result<Event, EvidenceError> {
        self.emit(plan, options).await
    }

    /// Record a release acceptance.
    ///
    /// # Errors
    ///
    /// [`EvidenceError::MissingField`] or any registry failure.
    pub async fn release_accepted(
        &self,
        accepted: &ReleaseAccepted,
        options: &EventOptions,
    ) -> Result<Event, EvidenceError> {
        self.emit(accepted, options).await
    }

    /// Record a public patch.
    ///
    /// # Errors
    ///
    /// [`EvidenceError::MissingField`] or any registry failure.
    pub async fn patch(&self, patch: &SbomPatch, options: &EventOptions) -> Result<Event, EvidenceError> {
        self.emit(patch, options).await
    }

    /// Record a private patch, labelled `<private_id>_Patch`.
    ///
    /// # Errors
    ///
    /// [`EvidenceError::InvalidField`] for an unusable `private_id`,
    /// [`EvidenceError::MissingField`] or any registry failure.
    pub async fn private_patch(
        &self,
        patch: &PrivatePatch,
        options: &EventOptions,
    ) -> Result<Event, EvidenceError> {
        self.emit(patch, options).await
    }

    /// Disclose a vulnerability. The payload's stage is ignored.
    ///
    /// # Errors
    ///
    /// [`EvidenceError::MissingField`] or any registry failure.
    pub async fn vuln_disclosure(
        &self,
        vulnerability: &Vulnerability,
        options: &EventOptions,
    ) -> Result<Event, EvidenceError> {
        let disclosure = Vulnerability {
            stage: VulnerabilityStage::Disclosure,
            ..vulnerability.clone()
        };
        self.emit(&disclosure, options).await
    }

    /// Update a disclosed vulnerability. The payload's stage is ignored.
    ///
    /// # Errors
    ///
    /// [`EvidenceError::MissingField`] or any registry failure.
    pub async fn vuln_update(
        &self,
        vulnerability: &Vulnerability,
        options: &EventOptions,
    ) -> Result<Event, EvidenceError> {
        let update = Vulnerability {
            stage: VulnerabilityStage::Update,
            ..vulnerability.clone()
        };
        self.emit(&update, options).await
    }

    /// Record an end-of-life notice.
    ///
    /// # Errors
    ///
    /// [`EvidenceError::MissingField`] or any registry failure.
    pub async fn deprecation(
        &self,
        deprecation: &Deprecation,
        options: &EventOptions,
    ) -> Result<Event, EvidenceError> {
        self.emit(deprecation, options).await
    }

    /// Append any tagged event. Releases go through [`release`](Self::release)
    /// with no latest override.
    ///
    /// # Errors
    ///
    /// As the operation for the event's kind.
    pub async fn apply(&self, event: &SbomEvent, options: &EventOptions) -> Result<Event, EvidenceError> {
        match event {
            SbomEvent::Release(sbom) => {
                let release = ReleaseOptions {
                    event: options.clone(),
                    ..ReleaseOptions::default()
                };
                self.release(sbom, &release).await
            }
            other => self.emit(other.payload(), options).await,
        }
    }

    async fn emit<P: EventPayload + ?Sized>(
        &self,
        payload: &P,
        options: &EventOptions,
    ) -> Result<Event, EvidenceError> {
        let attributes = compose(payload, options)?;
        self.append(payload, attributes, None).await
    }

    async fn append<P: EventPayload + ?Sized>(
        &self,
        payload: &P,
        attributes: Attributes,
        asset_attributes: Option<Attributes>,
    ) -> Result<Event, EvidenceError> {
        let event = self
            .registry
            .create_event(NewEvent {
                record: self.record.identity,
                props: EventProps::record_evidence(),
                attributes,
                asset_attributes,
                confirm: true,
            })
            .await?;
        tracing::info!(
            record = %self.record.identity,
            event = %event.identity,
            kind = %payload.kind(),
            label = event.display_type().unwrap_or_default(),
            "Software package event appended"
        );
        Ok(event)
    }
}
