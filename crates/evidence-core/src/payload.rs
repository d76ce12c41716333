//! Typed payloads, one per event kind.
//!
//! Every field of a payload struct is required. A payload writes its
//! fields into an [`AttributeBuilder`] under the fixed keys of its kind;
//! [`compose`](crate::composer::compose) adds the shared description,
//! label, attachments, and overlay around them.
//!
//! | Payload | Kind | Label |
//! |---------|------|-------|
//! | [`Sbom`] | `Release` | `Release` |
//! | [`ReleasePlan`] | `ReleasePlan` | `Release Plan` |
//! | [`ReleaseAccepted`] | `ReleaseAccepted` | `Release Accepted` |
//! | [`SbomPatch`] | `Patch` | `Patch` |
//! | [`PrivatePatch`] | `PrivatePatch` | `<private_id>_Patch` |
//! | [`Vulnerability`] | disclosure or update | `Vulnerability Disclosure` / `Vulnerability Update` |
//! | [`Deprecation`] | `Deprecation` | `Deprecation` |
//! | [`Movement`] | `LocationUpdate` | `Location Update` |

use serde::{Deserialize, Serialize};

use evidence_types::{keys, Attributes, EventKind, PRIVATE_PATCH_SUFFIX};

use crate::composer::AttributeBuilder;
use crate::error::EvidenceError;

/// A payload that can be composed into an event.
pub trait EventPayload: Send + Sync {
    /// The event kind this payload produces.
    fn kind(&self) -> EventKind;

    /// The free-text description (`arc_description`).
    fn description(&self) -> &str;

    /// The `arc_evidence` / `arc_display_type` label.
    fn label(&self) -> Result<String, EvidenceError> {
        self.kind()
            .fixed_label()
            .map(ToOwned::to_owned)
            .ok_or_else(|| EvidenceError::InvalidField {
                field: "kind",
                reason: format!("{} has no fixed label", self.kind()),
            })
    }

    /// Write the kind-specific required fields.
    fn write_fields(&self, builder: AttributeBuilder) -> Result<AttributeBuilder, EvidenceError>;
}

// ---------------------------------------------------------------------------
// Releases
// ---------------------------------------------------------------------------

/// A software release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sbom {
    /// Component name.
    pub name: String,
    /// Release description.
    pub description: String,
    /// Artifact hash.
    pub hash: String,
    /// Released version.
    pub version: String,
    /// Release author.
    pub author: String,
    /// Supplier of the component.
    pub supplier: String,
    /// Release UUID.
    pub uuid: String,
}

impl EventPayload for Sbom {
    fn kind(&self) -> EventKind {
        EventKind::Release
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn write_fields(&self, builder: AttributeBuilder) -> Result<AttributeBuilder, EvidenceError> {
        Ok(builder
            .required(keys::SBOM_COMPONENT, "name", &self.name)
            .required(keys::SBOM_HASH, "hash", &self.hash)
            .required(keys::SBOM_VERSION, "version", &self.version)
            .required(keys::SBOM_AUTHOR, "author", &self.author)
            .required(keys::SBOM_SUPPLIER, "supplier", &self.supplier)
            .required(keys::SBOM_UUID, "uuid", &self.uuid))
    }
}

impl Sbom {
    /// The record-level attributes a release refreshes.
    ///
    /// # Errors
    ///
    /// Returns [`EvidenceError::MissingField`] if a field is blank.
    pub fn asset_attributes(&self, custom: Option<&Attributes>) -> Result<Attributes, EvidenceError> {
        AttributeBuilder::new()
            .required(keys::ARC_DISPLAY_NAME, "name", &self.name)
            .required(keys::SBOM_COMPONENT, "name", &self.name)
            .required(keys::SBOM_HASH, "hash", &self.hash)
            .required(keys::SBOM_VERSION, "version", &self.version)
            .required(keys::SBOM_AUTHOR, "author", &self.author)
            .required(keys::SBOM_SUPPLIER, "supplier", &self.supplier)
            .required(keys::SBOM_UUID, "uuid", &self.uuid)
            .overlay(custom)
            .build()
    }
}

/// A planned release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleasePlan {
    /// Plan description.
    pub description: String,
    /// Planned date.
    pub date: String,
    /// Release captain.
    pub captain: String,
    /// Component name.
    pub name: String,
    /// Planned version.
    pub version: String,
    /// Planning reference (ticket, document).
    pub reference: String,
}

impl EventPayload for ReleasePlan {
    fn kind(&self) -> EventKind {
        EventKind::ReleasePlan
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn write_fields(&self, builder: AttributeBuilder) -> Result<AttributeBuilder, EvidenceError> {
        Ok(builder
            .required(keys::SBOM_PLANNED_DATE, "date", &self.date)
            .required(keys::SBOM_PLANNED_CAPTAIN, "captain", &self.captain)
            .required(keys::SBOM_PLANNED_COMPONENT, "name", &self.name)
            .required(keys::SBOM_PLANNED_VERSION, "version", &self.version)
            .required(keys::SBOM_PLANNED_REFERENCE, "reference", &self.reference))
    }
}

/// A release that passed acceptance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseAccepted {
    /// Acceptance description.
    pub description: String,
    /// Acceptance date.
    pub date: String,
    /// Release captain.
    pub captain: String,
    /// Component name.
    pub name: String,
    /// Accepted version.
    pub version: String,
    /// Who approved the release.
    pub approver: String,
    /// Vulnerability review reference.
    pub reference: String,
}

impl EventPayload for ReleaseAccepted {
    fn kind(&self) -> EventKind {
        EventKind::ReleaseAccepted
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn write_fields(&self, builder: AttributeBuilder) -> Result<AttributeBuilder, EvidenceError> {
        Ok(builder
            .required(keys::SBOM_ACCEPTED_DATE, "date", &self.date)
            .required(keys::SBOM_ACCEPTED_CAPTAIN, "captain", &self.captain)
            .required(keys::SBOM_ACCEPTED_COMPONENT, "name", &self.name)
            .required(keys::SBOM_ACCEPTED_VERSION, "version", &self.version)
            .required(keys::SBOM_ACCEPTED_APPROVER, "approver", &self.approver)
            .required(keys::SBOM_ACCEPTED_VULN_REFERENCE, "reference", &self.reference))
    }
}

// ---------------------------------------------------------------------------
// Patches
// ---------------------------------------------------------------------------

/// A public patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SbomPatch {
    /// Patch description.
    pub description: String,
    /// Patched component.
    pub target_component: String,
    /// Patch artifact hash.
    pub hash: String,
    /// Version the patch applies to.
    pub target_version: String,
    /// Patch author.
    pub author: String,
    /// Patch supplier.
    pub supplier: String,
    /// Patch UUID.
    pub uuid: String,
}

impl EventPayload for SbomPatch {
    fn kind(&self) -> EventKind {
        EventKind::Patch
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn write_fields(&self, builder: AttributeBuilder) -> Result<AttributeBuilder, EvidenceError> {
        Ok(builder
            .required(keys::SBOM_PATCH_COMPONENT, "target_component", &self.target_component)
            .required(keys::SBOM_PATCH_HASH, "hash", &self.hash)
            .required(keys::SBOM_PATCH_TARGET_VERSION, "target_version", &self.target_version)
            .required(keys::SBOM_PATCH_AUTHOR, "author", &self.author)
            .required(keys::SBOM_PATCH_SUPPLIER, "supplier", &self.supplier)
            .required(keys::SBOM_PATCH_UUID, "uuid", &self.uuid))
    }
}

/// A patch distributed privately, labelled `<private_id>_Patch`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivatePatch {
    /// Identifier of the private distribution (customer, programme).
    pub private_id: String,
    /// Patch description.
    pub description: String,
    /// Patched component.
    pub target_component: String,
    /// Patch artifact hash.
    pub hash: String,
    /// Version the patch applies to.
    pub target_version: String,
    /// Patch author.
    pub author: String,
    /// Patch supplier.
    pub supplier: String,
    /// Patch UUID.
    pub uuid: String,
    /// Vulnerability the patch fixes.
    pub reference: String,
}

impl EventPayload for PrivatePatch {
    fn kind(&self) -> EventKind {
        EventKind::PrivatePatch
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn label(&self) -> Result<String, EvidenceError> {
        let id = self.private_id.trim();
        if id.is_empty() {
            return Err(EvidenceError::MissingField("private_id"));
        }
        if let Some(bad) = id
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(EvidenceError::InvalidField {
                field: "private_id",
                reason: format!("unexpected character {bad:?}"),
            });
        }
        Ok(format!("{id}{PRIVATE_PATCH_SUFFIX}"))
    }

    fn write_fields(&self, builder: AttributeBuilder) -> Result<AttributeBuilder, EvidenceError> {
        Ok(builder
            .required(keys::SBOM_PATCH_COMPONENT, "target_component", &self.target_component)
            .required(keys::SBOM_PATCH_HASH, "hash", &self.hash)
            .required(keys::SBOM_PATCH_VERSION, "target_version", &self.target_version)
            .required(keys::SBOM_PATCH_AUTHOR, "author", &self.author)
            .required(keys::SBOM_PATCH_SUPPLIER, "supplier", &self.supplier)
            .required(keys::SBOM_PATCH_UUID, "uuid", &self.uuid)
            .required(keys::SBOM_PATCH_VULN_REFERENCE, "reference", &self.reference))
    }
}

// ---------------------------------------------------------------------------
// Vulnerabilities
// ---------------------------------------------------------------------------

/// Whether a vulnerability event discloses or updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VulnerabilityStage {
    /// First disclosure.
    Disclosure,
    /// Follow-up on a disclosed vulnerability.
    Update,
}

/// A vulnerability report against a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vulnerability {
    /// Disclosure or update.
    pub stage: VulnerabilityStage,
    /// Report description.
    pub description: String,
    /// Vulnerability name.
    pub name: String,
    /// External reference.
    pub reference: String,
    /// Vulnerability identifier (e.g. a CVE).
    pub id: String,
    /// Category.
    pub category: String,
    /// Severity.
    pub severity: String,
    /// Current status.
    pub status: String,
    /// Reporter.
    pub author: String,
    /// Affected component.
    pub target_component: String,
    /// Affected version.
    pub target_version: String,
}

impl EventPayload for Vulnerability {
    fn kind(&self) -> EventKind {
        match self.stage {
            VulnerabilityStage::Disclosure => EventKind::VulnerabilityDisclosure,
            VulnerabilityStage::Update => EventKind::VulnerabilityUpdate,
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn write_fields(&self, builder: AttributeBuilder) -> Result<AttributeBuilder, EvidenceError> {
        Ok(builder
            .required(keys::VULN_NAME, "name", &self.name)
            .required(keys::VULN_REFERENCE, "reference", &self.reference)
            .required(keys::VULN_ID, "id", &self.id)
            .required(keys::VULN_CATEGORY, "category", &self.category)
            .required(keys::VULN_SEVERITY, "severity", &self.severity)
            .required(keys::VULN_STATUS, "status", &self.status)
            .required(keys::VULN_AUTHOR, "author", &self.author)
            .required(keys::VULN_TARGET_COMPONENT, "target_component", &self.target_component)
            .required(keys::VULN_TARGET_VERSION, "target_version", &self.target_version))
    }
}

// ---------------------------------------------------------------------------
// Deprecation
// ---------------------------------------------------------------------------

/// End-of-life notice for a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deprecation {
    /// Notice description.
    pub description: String,
    /// Deprecated component.
    pub target_component: String,
    /// Deprecated version.
    pub target_version: String,
    /// UUID of the deprecated release.
    pub target_uuid: String,
    /// End-of-life date.
    pub target_date: String,
}

impl EventPayload for Deprecation {
    fn kind(&self) -> EventKind {
        EventKind::Deprecation
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn write_fields(&self, builder: AttributeBuilder) -> Result<AttributeBuilder, EvidenceError> {
        Ok(builder
            .required(keys::SBOM_EOL_TARGET_COMPONENT, "target_component", &self.target_component)
            .required(keys::SBOM_EOL_TARGET_VERSION, "target_version", &self.target_version)
            .required(keys::SBOM_EOL_TARGET_UUID, "target_uuid", &self.target_uuid)
            .required(keys::SBOM_EOL_TARGET_DATE, "target_date", &self.target_date))
    }
}

// ---------------------------------------------------------------------------
// Location updates
// ---------------------------------------------------------------------------

/// A mobile asset's reported position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    /// Narrative of what happened at this position.
    pub description: String,
    /// Latitude in degrees, `-90..=90`.
    pub latitude: f64,
    /// Longitude in degrees, `-180..=180`.
    pub longitude: f64,
}

impl Movement {
    /// Latitude as written to `arc_gis_lat` (six decimal places).
    pub fn latitude_text(&self) -> String {
        format!("{:.6}", self.latitude)
    }

    /// Longitude as written to `arc_gis_lng` (six decimal places).
    pub fn longitude_text(&self) -> String {
        format!("{:.6}", self.longitude)
    }

    /// The record-level position attributes this movement refreshes.
    pub fn asset_attributes(&self) -> Attributes {
        AttributeBuilder::new()
            .text(keys::ARC_GIS_LAT, self.latitude_text())
            .text(keys::ARC_GIS_LNG, self.longitude_text())
            .build()
            .unwrap_or_default()
    }
}

fn check_coordinate(field: &'static str, value: f64, bound: f64) -> Result<(), EvidenceError> {
    if value.is_finite() && value.abs() <= bound {
        Ok(())
    } else {
        Err(EvidenceError::InvalidField {
            field,
            reason: format!("{value} is outside -{bound}..={bound}"),
        })
    }
}

impl EventPayload for Movement {
    fn kind(&self) -> EventKind {
        EventKind::LocationUpdate
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn write_fields(&self, builder: AttributeBuilder) -> Result<AttributeBuilder, EvidenceError> {
        check_coordinate("latitude", self.latitude, 90.0)?;
        check_coordinate("longitude", self.longitude, 180.0)?;
        Ok(builder
            .text(keys::ARC_GIS_LAT, self.latitude_text())
            .text(keys::ARC_GIS_LNG, self.longitude_text()))
    }
}

// ---------------------------------------------------------------------------
// Tagged software-package events
// ---------------------------------------------------------------------------

/// Any software-package event, tagged by kind.
///
/// Deserializes from maps of the form `{kind: release, name: ..., ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SbomEvent {
    /// A release.
    Release(Sbom),
    /// A planned release.
    ReleasePlan(ReleasePlan),
    /// An accepted release.
    ReleaseAccepted(ReleaseAccepted),
    /// A public patch.
    Patch(SbomPatch),
    /// A private patch.
    PrivatePatch(PrivatePatch),
    /// A vulnerability disclosure or update.
    Vulnerability(Vulnerability),
    /// An end-of-life notice.
    Deprecation(Deprecation),
}

impl SbomEvent {
    /// The wrapped payload.
    pub fn payload(&self) -> &dyn EventPayload {
        match self {
            Self::Release(p) => p,
            Self::ReleasePlan(p) => p,
            Self::ReleaseAccepted(p) => p,
            Self::Patch(p) => p,
            Self::PrivatePatch(p) => p,
            Self::Vulnerability(p) => p,
            Self::Deprecation(p) => p,
        }
    }
}
