//! Error types for record and event composition.
//!
//! Payload problems ([`EvidenceError::MissingField`],
//! [`EvidenceError::InvalidField`]) are detected before any registry call.
//! Registry failures pass through unchanged; nothing here retries.

use std::path::PathBuf;

use evidence_registry::RegistryError;

/// Errors that can occur while locating records or appending events.
#[derive(Debug, thiserror::Error)]
pub enum EvidenceError {
    /// A required payload field is blank.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A payload field has a value the event schema cannot carry.
    #[error("invalid field {field}: {reason}")]
    InvalidField {
        /// The offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The registry rejected or failed the call.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// An attachment source file could not be opened.
    #[error("cannot open attachment {path}: {source}")]
    AttachmentSource {
        /// The file that could not be opened.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

impl EvidenceError {
    /// Whether this error means a registry lookup matched nothing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Registry(e) if e.is_not_found())
    }
}
