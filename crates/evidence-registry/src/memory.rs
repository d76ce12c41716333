//! In-process registry: an append-only store behind the [`Registry`] trait.
//!
//! [`MemoryRegistry`] holds records, events, and attachment references for
//! the lifetime of the process. It behaves the way the remote registry
//! does:
//!
//! - **Identity**: every record, event, and attachment gets a UUID v7.
//! - **Append-only**: events are never modified or deleted.
//! - **Ordering**: each event gets the next registry-wide sequence number.
//! - **Asset attributes**: an event's asset attributes are merged into its
//!   parent record's attributes when the event is appended.
//! - **Content addressing**: uploads are hashed with SHA-256 as they stream.
//! - **Signature uniqueness**: a creation carrying a unique signature is
//!   checked and applied under one write lock.
//!
//! It is used by the sample binaries and by tests. Calling
//! [`MemoryRegistry::set_available`] with `false` makes every call fail with
//! [`RegistryError::Unavailable`].

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use futures::stream::{self, BoxStream, StreamExt};
use sha2::{Digest, Sha256};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::RwLock;

use evidence_types::{
    AttachmentId, AttachmentRef, Attributes, ConfirmationStatus, ContentHash, Event, EventId,
    HashAlgorithm, Record, RecordId,
};

use crate::client::{NewEvent, NewRecord, Registry};
use crate::digest::{hex_encode, CHUNK_SIZE};
use crate::RegistryError;

/// Registry contents.
#[derive(Debug, Default)]
struct State {
    /// Records in creation order.
    records: Vec<Record>,
    /// Events in append order.
    events: Vec<Event>,
    /// Uploaded attachment references.
    attachments: BTreeMap<AttachmentId, AttachmentRef>,
    /// Sequence number of the last appended event.
    sequence: u64,
}

/// An in-process registry.
#[derive(Debug)]
pub struct MemoryRegistry {
    state: RwLock<State>,
    available: AtomicBool,
}

impl Default for MemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRegistry {
    /// Create an empty, available registry.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State::default()),
            available: AtomicBool::new(true),
        }
    }

    /// Make every subsequent call succeed (`true`) or fail with
    /// [`RegistryError::Unavailable`] (`false`).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of records held.
    pub async fn record_count(&self) -> usize {
        self.state.read().await.records.len()
    }

    /// Number of events appended.
    pub async fn event_count(&self) -> usize {
        self.state.read().await.events.len()
    }

    /// Number of attachments uploaded.
    pub async fn attachment_count(&self) -> usize {
        self.state.read().await.attachments.len()
    }

    fn ensure_available(&self) -> Result<(), RegistryError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(RegistryError::Unavailable(
                "in-process registry is switched off".to_owned(),
            ))
        }
    }

    async fn matching_records(&self, filter: &Attributes) -> Vec<Result<Record, RegistryError>> {
        if let Err(e) = self.ensure_available() {
            return vec![Err(e)];
        }
        self.state
            .read()
            .await
            .records
            .iter()
            .filter(|record| matches_signature(record, filter))
            .cloned()
            .map(Ok)
            .collect()
    }

    async fn record_events(&self, record: RecordId) -> Vec<Result<Event, RegistryError>> {
        if let Err(e) = self.ensure_available() {
            return vec![Err(e)];
        }
        let state = self.state.read().await;
        if !state.records.iter().any(|r| r.identity == record) {
            return vec![Err(RegistryError::NotFound {
                kind: "record",
                key: record.to_string(),
            })];
        }
        state
            .events
            .iter()
            .filter(|event| event.record == record)
            .cloned()
            .map(Ok)
            .collect()
    }
}

/// Whether every entry of `signature` is present, with an equal value, in
/// the record's attributes.
fn matches_signature(record: &Record, signature: &Attributes) -> bool {
    signature
        .iter()
        .all(|(key, value)| record.attributes.get(key) == Some(value))
}

/// Render a signature for error messages.
fn describe_signature(signature: &Attributes) -> String {
    signature
        .iter()
        .map(|(key, value)| match value.as_text() {
            Some(text) => format!("{key}={text}"),
            None => format!("{key}=[..]"),
        })
        .collect::<Vec<_>>()
        .join(",")
}

impl Registry for MemoryRegistry {
    async fn create_record(&self, record: NewRecord) -> Result<Record, RegistryError> {
        self.ensure_available()?;
        let mut state = self.state.write().await;
        if let Some(signature) = &record.unique_signature {
            if state
                .records
                .iter()
                .any(|existing| matches_signature(existing, signature))
            {
                return Err(RegistryError::AlreadyExists {
                    key: describe_signature(signature),
                });
            }
        }
        let created = Record {
            identity: RecordId::new(),
            behaviours: record.behaviours,
            attributes: record.attributes,
            confirmation_status: ConfirmationStatus::Confirmed,
            created_at: Utc::now(),
        };
        state.records.push(created.clone());
        drop(state);
        tracing::debug!(record = %created.identity, "Record created");
        Ok(created)
    }

    async fn read_record(&self, identity: RecordId) -> Result<Record, RegistryError> {
        self.ensure_available()?;
        self.state
            .read()
            .await
            .records
            .iter()
            .find(|record| record.identity == identity)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound {
                kind: "record",
                key: identity.to_string(),
            })
    }

    async fn read_record_by_signature(
        &self,
        signature: &Attributes,
    ) -> Result<Record, RegistryError> {
        self.ensure_available()?;
        let state = self.state.read().await;
        let mut matches = state
            .records
            .iter()
            .filter(|record| matches_signature(record, signature));

        match (matches.next(), matches.next()) {
            (None, _) => Err(RegistryError::NotFound {
                kind: "record",
                key: describe_signature(signature),
            }),
            (Some(record), None) => Ok(record.clone()),
            (Some(_), Some(_)) => Err(RegistryError::DuplicateResult {
                count: matches.count().saturating_add(2),
            }),
        }
    }

    fn list_records(&self, filter: &Attributes) -> BoxStream<'_, Result<Record, RegistryError>> {
        let filter = filter.clone();
        stream::once(async move { self.matching_records(&filter).await })
            .flat_map(stream::iter)
            .boxed()
    }

    async fn create_event(&self, event: NewEvent) -> Result<Event, RegistryError> {
        self.ensure_available()?;
        let mut state = self.state.write().await;

        let sequence = state
            .sequence
            .checked_add(1)
            .ok_or(RegistryError::Overflow)?;

        let record = state
            .records
            .iter_mut()
            .find(|record| record.identity == event.record)
            .ok_or_else(|| RegistryError::NotFound {
                kind: "record",
                key: event.record.to_string(),
            })?;

        let asset_attributes = event.asset_attributes.unwrap_or_default();
        record
            .attributes
            .extend(asset_attributes.iter().map(|(k, v)| (k.clone(), v.clone())));

        let appended = Event {
            identity: EventId::new(),
            record: event.record,
            sequence,
            props: event.props,
            attributes: event.attributes,
            asset_attributes,
            confirmation_status: ConfirmationStatus::Confirmed,
            timestamp_accepted: Utc::now(),
        };
        state.sequence = sequence;
        state.events.push(appended.clone());

        tracing::debug!(
            record = %appended.record,
            event = %appended.identity,
            sequence,
            "Event appended"
        );

        let mut returned = appended;
        if !event.confirm {
            returned.confirmation_status = ConfirmationStatus::Pending;
        }
        Ok(returned)
    }

    async fn read_event(&self, identity: EventId) -> Result<Event, RegistryError> {
        self.ensure_available()?;
        self.state
            .read()
            .await
            .events
            .iter()
            .find(|event| event.identity == identity)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound {
                kind: "event",
                key: identity.to_string(),
            })
    }

    fn list_events(&self, record: RecordId) -> BoxStream<'_, Result<Event, RegistryError>> {
        stream::once(async move { self.record_events(record).await })
            .flat_map(stream::iter)
            .boxed()
    }

    async fn upload_attachment<S>(
        &self,
        mut source: S,
        mime_type: &str,
    ) -> Result<AttachmentRef, RegistryError>
    where
        S: AsyncRead + Unpin + Send,
    {
        self.ensure_available()?;

        let mut hasher = Sha256::new();
        let mut buf = vec![0u8; CHUNK_SIZE];
        let mut size: u64 = 0;
        loop {
            let n = source
                .read(&mut buf)
                .await
                .map_err(|e| RegistryError::UploadFailure {
                    reason: e.to_string(),
                })?;
            if n == 0 {
                break;
            }
            let chunk = buf.get(..n).ok_or_else(|| RegistryError::UploadFailure {
                reason: format!("reader reported {n} bytes for a {CHUNK_SIZE}-byte buffer"),
            })?;
            hasher.update(chunk);
            let read = u64::try_from(n).map_err(|_err| RegistryError::Overflow)?;
            size = size.checked_add(read).ok_or(RegistryError::Overflow)?;
        }

        let reference = AttachmentRef {
            identity: AttachmentId::new(),
            hash: ContentHash {
                alg: HashAlgorithm::Sha256,
                value: hex_encode(&hasher.finalize()),
            },
            size,
            mime_type: mime_type.to_owned(),
        };
        self.state
            .write()
            .await
            .attachments
            .insert(reference.identity, reference.clone());

        tracing::debug!(
            attachment = %reference.identity,
            size,
            hash = reference.hash.value,
            "Attachment uploaded"
        );
        Ok(reference)
    }
}
