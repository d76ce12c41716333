//! Event attribute assembly.
//!
//! Provides an [`AttributeBuilder`] that enforces the composition order
//! every event kind shares:
//!
//! 1. Required fields, each checked for blankness.
//! 2. `arc_attachments`, when the event carries attachments.
//! 3. The caller's custom overlay, which wins on key collisions.
//!
//! [`compose`] drives the builder for any [`EventPayload`]; the result is a
//! complete attribute map or a [`EvidenceError::MissingField`] raised
//! before anything reaches the registry.

use evidence_types::{attachments_value, keys, Attachment, AttributeValue, Attributes};

use crate::error::EvidenceError;
use crate::payload::EventPayload;

// ---------------------------------------------------------------------------
// Per-call options
// ---------------------------------------------------------------------------

/// Optional inputs shared by every event operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventOptions {
    /// Uploaded attachments to reference from the event.
    pub attachments: Vec<Attachment>,
    /// Custom attributes applied after the required ones.
    pub custom_attrs: Option<Attributes>,
}

impl EventOptions {
    /// Reference the given attachments.
    #[must_use]
    pub fn with_attachments(mut self, attachments: Vec<Attachment>) -> Self {
        self.attachments = attachments;
        self
    }

    /// Overlay the given custom attributes.
    #[must_use]
    pub fn with_custom_attrs(mut self, custom_attrs: Attributes) -> Self {
        self.custom_attrs = Some(custom_attrs);
        self
    }
}

// ---------------------------------------------------------------------------
// Attribute builder
// ---------------------------------------------------------------------------

/// Builder for an event's attribute map.
///
/// # Examples
///
/// ```
/// use evidence_core::composer::AttributeBuilder;
/// use evidence_core::EvidenceError;
///
/// let attrs = AttributeBuilder::new()
///     .required("sbom_version", "version", "1.0")
///     .build();
/// assert!(attrs.is_ok());
///
/// let blank = AttributeBuilder::new()
///     .required("sbom_version", "version", "  ")
///     .build();
/// assert!(matches!(blank, Err(EvidenceError::MissingField("version"))));
/// ```
#[derive(Debug, Default)]
pub struct AttributeBuilder {
    attributes: Attributes,
    missing: Option<&'static str>,
}

impl AttributeBuilder {
    /// Start an empty attribute map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a required text attribute. A blank value records `field` as
    /// missing; the first missing field is reported by [`build`].
    ///
    /// [`build`]: AttributeBuilder::build
    #[must_use]
    pub fn required(mut self, key: &str, field: &'static str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.missing.get_or_insert(field);
        } else {
            self.attributes
                .insert(key.to_owned(), AttributeValue::Text(value.to_owned()));
        }
        self
    }

    /// Set a text attribute unconditionally.
    #[must_use]
    pub fn text(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attributes
            .insert(key.to_owned(), AttributeValue::Text(value.into()));
        self
    }

    /// Add `arc_attachments` when there is at least one attachment.
    #[must_use]
    pub fn attachments(mut self, attachments: &[Attachment]) -> Self {
        if !attachments.is_empty() {
            self.attributes
                .insert(keys::ARC_ATTACHMENTS.to_owned(), attachments_value(attachments));
        }
        self
    }

    /// Apply a custom overlay. Overlay values replace existing keys.
    #[must_use]
    pub fn overlay(mut self, custom: Option<&Attributes>) -> Self {
        if let Some(custom) = custom {
            self.attributes
                .extend(custom.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        self
    }

    /// Produce the attribute map.
    ///
    /// # Errors
    ///
    /// Returns [`EvidenceError::MissingField`] naming the first blank
    /// required field.
    pub fn build(self) -> Result<Attributes, EvidenceError> {
        match self.missing {
            Some(field) => Err(EvidenceError::MissingField(field)),
            None => Ok(self.attributes),
        }
    }
}

/// Compose the full attribute map for an event payload.
///
/// Sets `arc_description`, `arc_evidence` and `arc_display_type`, then the
/// payload's own fields, then attachments, then the custom overlay.
///
/// # Errors
///
/// Returns [`EvidenceError::MissingField`] or
/// [`EvidenceError::InvalidField`] if the payload is incomplete.
pub fn compose<P: EventPayload + ?Sized>(
    payload: &P,
    options: &EventOptions,
) -> Result<Attributes, EvidenceError> {
    let label = payload.label()?;
    let builder = AttributeBuilder::new()
        .required(keys::ARC_DESCRIPTION, "description", payload.description())
        .text(keys::ARC_EVIDENCE, label.clone())
        .text(keys::ARC_DISPLAY_TYPE, label);

    let attributes = payload
        .write_fields(builder)?
        .attachments(&options.attachments)
        .overlay(options.custom_attrs.as_ref())
        .build()?;

    tracing::debug!(
        kind = %payload.kind(),
        attribute_count = attributes.len(),
        attachment_count = options.attachments.len(),
        "Event attributes composed"
    );
    Ok(attributes)
}
