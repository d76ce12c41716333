//! Record and event helpers for the evidence registry samples.
//!
//! Everything here talks to the registry through
//! [`evidence_registry::Registry`] and awaits each call before issuing the
//! next. Payloads are validated locally, so an incomplete event never
//! reaches the registry.
//!
//! # Modules
//!
//! - [`locator`] -- Find-or-create records by name and display type
//! - [`payload`] -- Typed payloads, one per event kind
//! - [`composer`] -- Attribute assembly shared by every event kind
//! - [`attachment`] -- Blob uploads ahead of the referencing event
//! - [`software_package`] -- Release, patch, vulnerability, deprecation events
//! - [`mobile_asset`] -- Location updates with declared time and principal
//! - [`time_warp`] -- Accelerated declared-time clock
//! - [`journey`] -- Route tables and the journey simulator
//! - [`config`] -- YAML configuration with environment overrides
//! - [`logging`] -- `tracing` subscriber setup
//! - [`error`] -- [`EvidenceError`]

pub mod attachment;
pub mod composer;
pub mod config;
pub mod error;
pub mod journey;
pub mod locator;
pub mod logging;
pub mod mobile_asset;
pub mod payload;
pub mod software_package;
pub mod time_warp;

pub use attachment::AttachmentUploader;
pub use composer::{compose, AttributeBuilder, EventOptions};
pub use config::{ConfigError, SamplesConfig};
pub use error::EvidenceError;
pub use journey::{Journey, JourneySimulator, Waypoint};
pub use locator::{Located, RecordLocator};
pub use mobile_asset::MobileAsset;
pub use payload::{
    Deprecation, EventPayload, Movement, PrivatePatch, ReleaseAccepted, ReleasePlan, Sbom,
    SbomEvent, SbomPatch, Vulnerability, VulnerabilityStage,
};
pub use software_package::{ReleaseOptions, SoftwarePackage, SOFTWARE_PACKAGE_TYPE};
pub use time_warp::TimeWarp;
