//! The registry client contract.
//!
//! [`Registry`] is the capability every record and event operation in this
//! workspace is written against. The registry owns identity assignment,
//! event ordering, durability, and attachment storage; implementations of
//! this trait only carry calls to it.
//!
//! All methods are awaited one at a time by callers. Events for the same
//! record are appended in the order the calls are issued.

use std::future::Future;

use futures::stream::BoxStream;
use tokio::io::AsyncRead;

use evidence_types::{AttachmentRef, Attributes, Behaviour, Event, EventId, EventProps, Record, RecordId};

use crate::RegistryError;

/// A record creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    /// Behaviours to enable on the record.
    pub behaviours: Vec<Behaviour>,
    /// Initial attributes.
    pub attributes: Attributes,
    /// Refuse creation if a record already matches this signature.
    pub unique_signature: Option<Attributes>,
}

impl NewRecord {
    /// A request with the default evidence behaviours.
    pub fn with_attributes(attributes: Attributes) -> Self {
        Self {
            behaviours: vec![Behaviour::RecordEvidence, Behaviour::Attachments],
            attributes,
            unique_signature: None,
        }
    }

    /// Make the creation conditional on no record matching `signature`.
    #[must_use]
    pub fn unique_on(mut self, signature: Attributes) -> Self {
        self.unique_signature = Some(signature);
        self
    }
}

/// An event append request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    /// The record the event is appended to.
    pub record: RecordId,
    /// Classification props.
    pub props: EventProps,
    /// Event attributes.
    pub attributes: Attributes,
    /// Attributes to apply to the parent record, if any.
    pub asset_attributes: Option<Attributes>,
    /// Block until the registry reports the event durable.
    pub confirm: bool,
}

/// Calls against the external evidence registry.
pub trait Registry: Send + Sync {
    /// Create a record.
    ///
    /// When the request carries a unique signature, the check and the
    /// creation are one step: of several callers racing on the same
    /// signature, one creates and the rest get
    /// [`RegistryError::AlreadyExists`].
    fn create_record(
        &self,
        record: NewRecord,
    ) -> impl Future<Output = Result<Record, RegistryError>> + Send;

    /// Read a record by identity.
    ///
    /// Fails with [`RegistryError::NotFound`] if the identity is absent.
    fn read_record(
        &self,
        identity: RecordId,
    ) -> impl Future<Output = Result<Record, RegistryError>> + Send;

    /// Read the single record whose attributes contain every entry of
    /// `signature`.
    ///
    /// Fails with [`RegistryError::NotFound`] on zero matches and
    /// [`RegistryError::DuplicateResult`] on more than one.
    fn read_record_by_signature(
        &self,
        signature: &Attributes,
    ) -> impl Future<Output = Result<Record, RegistryError>> + Send;

    /// Stream every record whose attributes contain every entry of
    /// `filter`. The stream is finite and can be consumed once.
    fn list_records(&self, filter: &Attributes) -> BoxStream<'_, Result<Record, RegistryError>>;

    /// Append an event to a record.
    fn create_event(
        &self,
        event: NewEvent,
    ) -> impl Future<Output = Result<Event, RegistryError>> + Send;

    /// Read an event by identity.
    fn read_event(
        &self,
        identity: EventId,
    ) -> impl Future<Output = Result<Event, RegistryError>> + Send;

    /// Stream a record's events in append order.
    fn list_events(&self, record: RecordId) -> BoxStream<'_, Result<Event, RegistryError>>;

    /// Stream a blob to the registry and return its content reference.
    fn upload_attachment<S>(
        &self,
        source: S,
        mime_type: &str,
    ) -> impl Future<Output = Result<AttachmentRef, RegistryError>> + Send
    where
        S: AsyncRead + Unpin + Send;
}
