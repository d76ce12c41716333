//! Attribute maps: the only externally meaningful contract of a record or
//! event.
//!
//! Registry consumers read attributes by exact key, so every key this
//! workspace writes is declared once in [`keys`]. Values are either text or
//! a list of text maps (the shape used by `arc_attachments`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// An open attribute mapping, ordered by key.
pub type Attributes = BTreeMap<String, AttributeValue>;

/// A single attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// A scalar text value.
    Text(String),
    /// A list of text maps (e.g. attachment references).
    List(Vec<BTreeMap<String, String>>),
}

impl AttributeValue {
    /// Return the text value, if this is a scalar.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::List(_) => None,
        }
    }

    /// Return the list entries, if this is a list.
    pub fn as_list(&self) -> Option<&[BTreeMap<String, String>]> {
        match self {
            Self::Text(_) => None,
            Self::List(entries) => Some(entries),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for AttributeValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<BTreeMap<String, String>>> for AttributeValue {
    fn from(entries: Vec<BTreeMap<String, String>>) -> Self {
        Self::List(entries)
    }
}

/// Build an [`Attributes`] map from text key/value pairs.
pub fn text_attributes<I, K, V>(pairs: I) -> Attributes
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(key, value)| (key.into(), AttributeValue::Text(value.into())))
        .collect()
}

/// Look up a text attribute by key.
pub fn text_attribute<'a>(attributes: &'a Attributes, key: &str) -> Option<&'a str> {
    attributes.get(key).and_then(AttributeValue::as_text)
}

/// Attribute keys shared with every other consumer of the registry's data.
pub mod keys {
    // --- Common ---
    /// Free-text description.
    pub const ARC_DESCRIPTION: &str = "arc_description";
    /// Display type tag of a record or event.
    pub const ARC_DISPLAY_TYPE: &str = "arc_display_type";
    /// Human-readable name of a record, or of an attachment entry.
    pub const ARC_DISPLAY_NAME: &str = "arc_display_name";
    /// Evidence label of an event.
    pub const ARC_EVIDENCE: &str = "arc_evidence";
    /// List of attachment references.
    pub const ARC_ATTACHMENTS: &str = "arc_attachments";

    // --- Attachment entries ---
    /// Attachment identity inside an `arc_attachments` entry.
    pub const ARC_ATTACHMENT_IDENTITY: &str = "arc_attachment_identity";
    /// Hash algorithm inside an `arc_attachments` entry.
    pub const ARC_HASH_ALG: &str = "arc_hash_alg";
    /// Hash value inside an `arc_attachments` entry.
    pub const ARC_HASH_VALUE: &str = "arc_hash_value";

    // --- Location ---
    /// Latitude of a mobile asset.
    pub const ARC_GIS_LAT: &str = "arc_gis_lat";
    /// Longitude of a mobile asset.
    pub const ARC_GIS_LNG: &str = "arc_gis_lng";

    // --- Release ---
    /// Released component name.
    pub const SBOM_COMPONENT: &str = "sbom_component";
    /// Released artifact hash.
    pub const SBOM_HASH: &str = "sbom_hash";
    /// Released version.
    pub const SBOM_VERSION: &str = "sbom_version";
    /// Release author.
    pub const SBOM_AUTHOR: &str = "sbom_author";
    /// Release supplier.
    pub const SBOM_SUPPLIER: &str = "sbom_supplier";
    /// Release UUID.
    pub const SBOM_UUID: &str = "sbom_uuid";

    // --- Release plan ---
    /// Planned release date.
    pub const SBOM_PLANNED_DATE: &str = "sbom_planned_date";
    /// Planned release captain.
    pub const SBOM_PLANNED_CAPTAIN: &str = "sbom_planned_captain";
    /// Planned component name.
    pub const SBOM_PLANNED_COMPONENT: &str = "sbom_planned_component";
    /// Planned version.
    pub const SBOM_PLANNED_VERSION: &str = "sbom_planned_version";
    /// Planning reference.
    pub const SBOM_PLANNED_REFERENCE: &str = "sbom_planned_reference";

    // --- Release accepted ---
    /// Acceptance date.
    pub const SBOM_ACCEPTED_DATE: &str = "sbom_accepted_date";
    /// Acceptance captain.
    pub const SBOM_ACCEPTED_CAPTAIN: &str = "sbom_accepted_captain";
    /// Accepted component name.
    pub const SBOM_ACCEPTED_COMPONENT: &str = "sbom_accepted_component";
    /// Accepted version.
    pub const SBOM_ACCEPTED_VERSION: &str = "sbom_accepted_version";
    /// Approver of the release.
    pub const SBOM_ACCEPTED_APPROVER: &str = "sbom_accepted_approver";
    /// Vulnerability reference reviewed at acceptance.
    pub const SBOM_ACCEPTED_VULN_REFERENCE: &str = "sbom_accepted_vuln_reference";

    // --- Patches ---
    /// Patched component.
    pub const SBOM_PATCH_COMPONENT: &str = "sbom_patch_component";
    /// Patch artifact hash.
    pub const SBOM_PATCH_HASH: &str = "sbom_patch_hash";
    /// Version targeted by a public patch.
    pub const SBOM_PATCH_TARGET_VERSION: &str = "sbom_patch_target_version";
    /// Version targeted by a private patch.
    pub const SBOM_PATCH_VERSION: &str = "sbom_patch_version";
    /// Patch author.
    pub const SBOM_PATCH_AUTHOR: &str = "sbom_patch_author";
    /// Patch supplier.
    pub const SBOM_PATCH_SUPPLIER: &str = "sbom_patch_supplier";
    /// Patch UUID.
    pub const SBOM_PATCH_UUID: &str = "sbom_patch_uuid";
    /// Vulnerability fixed by a private patch.
    pub const SBOM_PATCH_VULN_REFERENCE: &str = "sbom_patch_vuln_reference";

    // --- Vulnerabilities ---
    /// Vulnerability name.
    pub const VULN_NAME: &str = "vuln_name";
    /// Vulnerability reference.
    pub const VULN_REFERENCE: &str = "vuln_reference";
    /// Vulnerability identifier (e.g. a CVE).
    pub const VULN_ID: &str = "vuln_id";
    /// Vulnerability category.
    pub const VULN_CATEGORY: &str = "vuln_category";
    /// Vulnerability severity.
    pub const VULN_SEVERITY: &str = "vuln_severity";
    /// Vulnerability status.
    pub const VULN_STATUS: &str = "vuln_status";
    /// Vulnerability author.
    pub const VULN_AUTHOR: &str = "vuln_author";
    /// Affected component.
    pub const VULN_TARGET_COMPONENT: &str = "vuln_target_component";
    /// Affected version.
    pub const VULN_TARGET_VERSION: &str = "vuln_target_version";

    // --- Deprecation ---
    /// Deprecated component.
    pub const SBOM_EOL_TARGET_COMPONENT: &str = "sbom_eol_target_component";
    /// Deprecated version.
    pub const SBOM_EOL_TARGET_VERSION: &str = "sbom_eol_target_version";
    /// UUID of the deprecated release.
    pub const SBOM_EOL_TARGET_UUID: &str = "sbom_eol_target_uuid";
    /// End-of-life date.
    pub const SBOM_EOL_TARGET_DATE: &str = "sbom_eol_target_date";
}
