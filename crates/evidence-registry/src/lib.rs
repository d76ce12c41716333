//! Registry client contract and in-process registry.
//!
//! The registry is the external evidence service that owns identity,
//! ordering, durability, and attachment storage. Everything else in the
//! workspace talks to it only through the [`Registry`] trait.
//!
//! # Modules
//!
//! - [`client`] -- The [`Registry`] trait and its request types
//! - [`memory`] -- [`MemoryRegistry`], an in-process implementation
//! - [`digest`] -- SHA-256 content digests for attachments
//! - [`error`] -- [`RegistryError`]
//!
//! # Usage
//!
//! ```
//! use evidence_registry::{MemoryRegistry, NewRecord, Registry, RegistryError};
//! use evidence_types::text_attributes;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), RegistryError> {
//! let registry = MemoryRegistry::new();
//! let signature = text_attributes([("arc_display_name", "pkg-A")]);
//!
//! // Nothing matches yet.
//! let missing = registry.read_record_by_signature(&signature).await;
//! assert!(matches!(missing, Err(RegistryError::NotFound { .. })));
//!
//! let created = registry
//!     .create_record(NewRecord::with_attributes(signature.clone()))
//!     .await?;
//! let found = registry.read_record_by_signature(&signature).await?;
//! assert_eq!(found.identity, created.identity);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod digest;
pub mod error;
pub mod memory;

// Re-export primary types at crate root.
pub use client::{NewEvent, NewRecord, Registry};
pub use error::RegistryError;
pub use memory::MemoryRegistry;
