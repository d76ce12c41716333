//! Error types for registry calls.
//!
//! Every registry call either returns a fully populated value or one of
//! these errors. Nothing in this workspace retries; the error goes back to
//! the immediate caller.

/// Errors a registry can report.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A lookup by identity or signature matched nothing.
    #[error("{kind} not found: {key}")]
    NotFound {
        /// What was looked up ("record", "event").
        kind: &'static str,
        /// The identity or signature that matched nothing.
        key: String,
    },

    /// A signature lookup matched more than one record.
    #[error("signature is ambiguous: matched {count} records")]
    DuplicateResult {
        /// Number of matching records.
        count: usize,
    },

    /// A conditional creation found a record already carrying the signature.
    #[error("record already exists: {key}")]
    AlreadyExists {
        /// The signature that already matched.
        key: String,
    },

    /// An attachment transfer did not complete.
    #[error("attachment upload failed: {reason}")]
    UploadFailure {
        /// Why the transfer stopped.
        reason: String,
    },

    /// The registry could not be reached.
    #[error("registry unavailable: {0}")]
    Unavailable(String),

    /// A registry counter would overflow.
    #[error("registry counter overflow")]
    Overflow,
}

impl RegistryError {
    /// Whether this error means the lookup matched nothing.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
