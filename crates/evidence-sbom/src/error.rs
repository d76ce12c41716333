//! Error types for the software package sample.

use std::path::PathBuf;

/// Top-level error for the `evidence-sbom` binary.
#[derive(Debug, thiserror::Error)]
pub enum SbomError {
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

    /// The attachments directory could not be listed.
    #[error("cannot list attachments in {path}: {source}")]
    AttachmentsDir {
        /// The configured directory.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The global log subscriber could not be installed.
    #[error("logging setup failed: {message}")]
    Logging {
        /// Description of the failure.
        message: String,
    },
}
