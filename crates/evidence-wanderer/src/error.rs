//! Error types for the journey sample.

/// Top-level error for the `evidence-wanderer` binary.
#[derive(Debug, thiserror::Error)]
pub enum WandererError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: evidence_core::ConfigError,
    },

    /// A record or event operation failed.
    #[error("evidence error: {source}")]
    Evidence {
        /// The underlying evidence error.
        #[from]
        source: evidence_core::EvidenceError,
    },

    /// No crate record to move.
    #[error("could not find target crate{}", .name.as_ref().map(|n| format!(" '{n}'")).unwrap_or_default())]
    NoCrate {
        /// The crate asked for, if one was named.
        name: Option<String>,
    },

    /// The global log subscriber could not be installed.
    #[error("logging setup failed: {message}")]
    Logging {
        /// Description of the failure.
        message: String,
    },
}
