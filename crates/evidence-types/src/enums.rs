//! Enumeration types for records and events.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Event kinds
// ---------------------------------------------------------------------------

/// Suffix appended to a caller-supplied private identifier to label a
/// private patch event.
pub const PRIVATE_PATCH_SUFFIX: &str = "_Patch";

/// The kind of an appended event.
///
/// Each kind has a fixed attribute schema. All kinds except
/// [`EventKind::PrivatePatch`] also have a fixed display label; the
/// private patch label is derived from the payload's private identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A software release.
    Release,
    /// A planned release.
    ReleasePlan,
    /// A release that passed acceptance.
    ReleaseAccepted,
    /// A public patch.
    Patch,
    /// A patch distributed privately to one customer.
    PrivatePatch,
    /// First disclosure of a vulnerability.
    VulnerabilityDisclosure,
    /// A status change on a disclosed vulnerability.
    VulnerabilityUpdate,
    /// End-of-life notice for a release.
    Deprecation,
    /// A mobile asset reported a new position.
    LocationUpdate,
}

impl EventKind {
    /// Every event kind, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Release,
        Self::ReleasePlan,
        Self::ReleaseAccepted,
        Self::Patch,
        Self::PrivatePatch,
        Self::VulnerabilityDisclosure,
        Self::VulnerabilityUpdate,
        Self::Deprecation,
        Self::LocationUpdate,
    ];

    /// The fixed `arc_display_type` / `arc_evidence` label, if the kind
    /// has one.
    pub const fn fixed_label(self) -> Option<&'static str> {
        match self {
            Self::Release => Some("Release"),
            Self::ReleasePlan => Some("Release Plan"),
            Self::ReleaseAccepted => Some("Release Accepted"),
            Self::Patch => Some("Patch"),
            Self::PrivatePatch => None,
            Self::VulnerabilityDisclosure => Some("Vulnerability Disclosure"),
            Self::VulnerabilityUpdate => Some("Vulnerability Update"),
            Self::Deprecation => Some("Deprecation"),
            Self::LocationUpdate => Some("Location Update"),
        }
    }

    /// Short snake-case name for logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Release => "release",
            Self::ReleasePlan => "release_plan",
            Self::ReleaseAccepted => "release_accepted",
            Self::Patch => "patch",
            Self::PrivatePatch => "private_patch",
            Self::VulnerabilityDisclosure => "vuln_disclosure",
            Self::VulnerabilityUpdate => "vuln_update",
            Self::Deprecation => "deprecation",
            Self::LocationUpdate => "location_update",
        }
    }
}

impl core::fmt::Display for EventKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Event props
// ---------------------------------------------------------------------------

/// Event operation classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// Record a piece of evidence.
    Record,
}

/// Behaviour a record supports, or that an event exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Behaviour {
    /// Evidence may be recorded against the record.
    RecordEvidence,
    /// Attachments may be referenced from the record's events.
    Attachments,
}

/// Whether the registry has durably recorded a record or event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfirmationStatus {
    /// Accepted but not yet durable.
    Pending,
    /// Durably recorded.
    Confirmed,
}

/// Content hash algorithm used for attachments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
    /// SHA-256, hex encoded.
    #[serde(rename = "SHA256")]
    Sha256,
}

impl HashAlgorithm {
    /// Wire name of the algorithm (the `arc_hash_alg` value).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sha256 => "SHA256",
        }
    }
}

impl core::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
