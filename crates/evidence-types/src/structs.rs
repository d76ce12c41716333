//! Core entity structs: records, events, and attachments.
//!
//! These are the fully populated values the registry hands back. Nothing
//! here is constructed by callers except [`EventProps`], [`Principal`] and
//! [`Attachment`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::attributes::{keys, text_attribute, AttributeValue, Attributes};
use crate::enums::{Behaviour, ConfirmationStatus, HashAlgorithm, Operation};
use crate::ids::{AttachmentId, EventId, RecordId};

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// A logical entity tracked in the registry (software package, shipping
/// crate).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Registry-assigned identity.
    pub identity: RecordId,
    /// Behaviours enabled on the record.
    pub behaviours: Vec<Behaviour>,
    /// Current attribute state, including every asset-attribute overlay
    /// applied by events since creation.
    pub attributes: Attributes,
    /// Durability of the record.
    pub confirmation_status: ConfirmationStatus,
    /// When the registry accepted the record.
    pub created_at: DateTime<Utc>,
}

impl Record {
    /// The `arc_display_name` attribute.
    pub fn display_name(&self) -> Option<&str> {
        self.attribute(keys::ARC_DISPLAY_NAME)
    }

    /// The `arc_display_type` attribute.
    pub fn display_type(&self) -> Option<&str> {
        self.attribute(keys::ARC_DISPLAY_TYPE)
    }

    /// The `arc_description` attribute.
    pub fn description(&self) -> Option<&str> {
        self.attribute(keys::ARC_DESCRIPTION)
    }

    /// Look up a text attribute.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        text_attribute(&self.attributes, key)
    }
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// The identity an event is declared on behalf of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Issuing authority (e.g. a device fleet domain).
    pub issuer: String,
    /// Subject within the issuer.
    pub subject: String,
    /// Human-readable name.
    pub display_name: String,
}

/// Classification props of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventProps {
    /// What the event does.
    pub operation: Operation,
    /// Which record behaviour it exercises.
    pub behaviour: Behaviour,
    /// Caller-declared time of the event, if different from acceptance.
    pub timestamp_declared: Option<DateTime<Utc>>,
    /// Caller-declared principal, if any.
    pub principal_declared: Option<Principal>,
}

impl EventProps {
    /// `Record` / `RecordEvidence` props with nothing declared.
    pub const fn record_evidence() -> Self {
        Self {
            operation: Operation::Record,
            behaviour: Behaviour::RecordEvidence,
            timestamp_declared: None,
            principal_declared: None,
        }
    }
}

impl Default for EventProps {
    fn default() -> Self {
        Self::record_evidence()
    }
}

/// An immutable entry appended to a record's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Registry-assigned identity.
    pub identity: EventId,
    /// The record this event belongs to.
    pub record: RecordId,
    /// Registry-wide append sequence number, starting at 1.
    pub sequence: u64,
    /// Classification props.
    pub props: EventProps,
    /// Event attributes.
    pub attributes: Attributes,
    /// Attributes applied to the parent record by this event.
    pub asset_attributes: Attributes,
    /// Durability of the event as reported to the caller.
    pub confirmation_status: ConfirmationStatus,
    /// When the registry accepted the event.
    pub timestamp_accepted: DateTime<Utc>,
}

impl Event {
    /// The `arc_display_type` attribute.
    pub fn display_type(&self) -> Option<&str> {
        self.attribute(keys::ARC_DISPLAY_TYPE)
    }

    /// Look up a text attribute.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        text_attribute(&self.attributes, key)
    }

    /// The `arc_attachments` entries, empty if the event has none.
    pub fn attachment_entries(&self) -> &[BTreeMap<String, String>] {
        self.attributes
            .get(keys::ARC_ATTACHMENTS)
            .and_then(AttributeValue::as_list)
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Attachments
// ---------------------------------------------------------------------------

/// Content hash of an uploaded blob.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash {
    /// Hash algorithm.
    pub alg: HashAlgorithm,
    /// Hex-encoded digest.
    pub value: String,
}

/// Reference to an uploaded blob, as returned by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentRef {
    /// Registry-assigned identity.
    pub identity: AttachmentId,
    /// Content hash computed by the registry.
    pub hash: ContentHash,
    /// Payload size in bytes.
    pub size: u64,
    /// MIME type declared at upload.
    pub mime_type: String,
}

/// An uploaded blob paired with the name it is shown under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// The uploaded blob.
    pub reference: AttachmentRef,
    /// Display name within the referencing event or record.
    pub display_name: String,
}

impl Attachment {
    /// The `arc_attachments` entry for this attachment.
    pub fn to_entry(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (
                keys::ARC_ATTACHMENT_IDENTITY.to_owned(),
                self.reference.identity.to_string(),
            ),
            (
                keys::ARC_HASH_ALG.to_owned(),
                self.reference.hash.alg.as_str().to_owned(),
            ),
            (
                keys::ARC_HASH_VALUE.to_owned(),
                self.reference.hash.value.clone(),
            ),
            (keys::ARC_DISPLAY_NAME.to_owned(), self.display_name.clone()),
        ])
    }
}

/// Build the `arc_attachments` value for a set of attachments.
pub fn attachments_value(attachments: &[Attachment]) -> AttributeValue {
    AttributeValue::List(attachments.iter().map(Attachment::to_entry).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attachment(name: &str) -> Attachment {
        Attachment {
            reference: AttachmentRef {
                identity: AttachmentId::new(),
                hash: ContentHash {
                    alg: HashAlgorithm::Sha256,
                    value: "abc123".to_owned(),
                },
                size: 3,
                mime_type: "text/plain".to_owned(),
            },
            display_name: name.to_owned(),
        }
    }

    #[test]
    fn attachment_entry_has_four_keys() {
        let entry = attachment("sbom.xml").to_entry();
        assert_eq!(entry.len(), 4);
        assert_eq!(entry.get(keys::ARC_HASH_ALG).map(String::as_str), Some("SHA256"));
        assert_eq!(entry.get(keys::ARC_HASH_VALUE).map(String::as_str), Some("abc123"));
        assert_eq!(
            entry.get(keys::ARC_DISPLAY_NAME).map(String::as_str),
            Some("sbom.xml")
        );
        assert!(entry.contains_key(keys::ARC_ATTACHMENT_IDENTITY));
    }

    #[test]
    fn attachments_value_keeps_order() {
        let value = attachments_value(&[attachment("a"), attachment("b")]);
        let names: Vec<&str> = value
            .as_list()
            .unwrap_or_default()
            .iter()
            .filter_map(|entry| entry.get(keys::ARC_DISPLAY_NAME).map(String::as_str))
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
