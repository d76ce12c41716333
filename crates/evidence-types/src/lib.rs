//! Shared type definitions for the evidence registry samples.
//!
//! This crate is the single source of truth for the values exchanged with
//! the registry: identities, attribute maps, records, events, and
//! attachment references.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for registry identities
//! - [`attributes`] -- Attribute values, maps, and the shared key constants
//! - [`enums`] -- Event kinds, props classifications, hash algorithms
//! - [`structs`] -- Records, events, attachment references

pub mod attributes;
pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use attributes::{keys, text_attribute, text_attributes, AttributeValue, Attributes};
pub use enums::{
    Behaviour, ConfirmationStatus, EventKind, HashAlgorithm, Operation, PRIVATE_PATCH_SUFFIX,
};
pub use ids::{AttachmentId, EventId, RecordId};
pub use structs::{
    attachments_value, Attachment, AttachmentRef, ContentHash, Event, EventProps, Principal,
    Record,
};
