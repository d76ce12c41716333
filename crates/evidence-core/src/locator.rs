//! Record lookup and idempotent creation.
//!
//! A [`RecordLocator`] is bound to one display type (`Software Package`,
//! `Widget shipping crate`). Every lookup it performs has that type wired
//! into the signature, so two locators for different types never see each
//! other's records.

use futures::stream::{BoxStream, StreamExt};

use evidence_registry::{NewRecord, Registry, RegistryError};
use evidence_types::{keys, Attachment, AttributeValue, Attributes, Record, RecordId};

use crate::composer::AttributeBuilder;
use crate::error::EvidenceError;

/// The outcome of [`RecordLocator::create_or_find`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    /// The found or newly created record.
    pub record: Record,
    /// `true` if the record already existed.
    pub existed: bool,
}

/// Finds records of one display type, creating them on first use.
#[derive(Debug)]
pub struct RecordLocator<'r, R> {
    registry: &'r R,
    display_type: String,
    namespace: Option<String>,
}

impl<'r, R: Registry> RecordLocator<'r, R> {
    /// A locator for records of `display_type`.
    pub fn new(registry: &'r R, display_type: impl Into<String>) -> Self {
        Self {
            registry,
            display_type: display_type.into(),
            namespace: None,
        }
    }

    /// Suffix every record name with `namespace`, so that parallel runs
    /// against one registry keep separate records.
    #[must_use]
    pub fn with_namespace(mut self, namespace: Option<String>) -> Self {
        self.namespace = namespace.filter(|ns| !ns.trim().is_empty());
        self
    }

    /// The display type this locator is bound to.
    pub fn display_type(&self) -> &str {
        &self.display_type
    }

    /// The registry this locator reads from.
    pub const fn registry(&self) -> &'r R {
        self.registry
    }

    /// The stored name for `name`: `"<name> <namespace>"` when namespaced.
    pub fn qualified_name(&self, name: &str) -> String {
        match &self.namespace {
            Some(namespace) => format!("{name} {namespace}"),
            None => name.to_owned(),
        }
    }

    /// The identity signature for `name`.
    pub fn signature(&self, name: &str) -> Attributes {
        let mut signature = Attributes::new();
        signature.insert(
            keys::ARC_DISPLAY_NAME.to_owned(),
            AttributeValue::Text(self.qualified_name(name)),
        );
        signature.insert(
            keys::ARC_DISPLAY_TYPE.to_owned(),
            AttributeValue::Text(self.display_type.clone()),
        );
        signature
    }

    /// Return the record named `name`, creating it if absent.
    ///
    /// A found record is returned untouched: `description`, `base_attrs`
    /// and `attachments` only apply on creation. Base attributes cannot
    /// override the name or display type.
    ///
    /// # Errors
    ///
    /// - [`EvidenceError::MissingField`] if `name` or `description` is blank.
    /// - [`EvidenceError::Registry`] with [`RegistryError::DuplicateResult`]
    ///   if more than one record already carries the signature.
    /// - Any other registry failure.
    ///
    /// Creation is conditional on the signature, so concurrent callers with
    /// the same name end up with one record; the losers report `existed`.
    pub async fn create_or_find(
        &self,
        name: &str,
        description: &str,
        base_attrs: Option<&Attributes>,
        attachments: &[Attachment],
    ) -> Result<Located, EvidenceError> {
        let attributes = AttributeBuilder::new()
            .overlay(base_attrs)
            .required(keys::ARC_DISPLAY_NAME, "name", name)
            .required(keys::ARC_DESCRIPTION, "description", description)
            .attachments(attachments)
            .build()?;
        let signature = self.signature(name);

        match self.registry.read_record_by_signature(&signature).await {
            Ok(record) => Ok(self.found(record)),
            Err(RegistryError::NotFound { .. }) => {
                let mut attributes = attributes;
                attributes.extend(signature.clone());
                let request = NewRecord::with_attributes(attributes).unique_on(signature.clone());
                match self.registry.create_record(request).await {
                    Ok(record) => {
                        tracing::info!(
                            record = %record.identity,
                            name = %self.qualified_name(name),
                            display_type = %self.display_type,
                            "Record created"
                        );
                        Ok(Located {
                            record,
                            existed: false,
                        })
                    }
                    // Another caller created it between the lookup and the create.
                    Err(RegistryError::AlreadyExists { .. }) => {
                        let record = self.registry.read_record_by_signature(&signature).await?;
                        Ok(self.found(record))
                    }
                    Err(e) => Err(e.into()),
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    fn found(&self, record: Record) -> Located {
        tracing::info!(
            record = %record.identity,
            name = record.display_name().unwrap_or_default(),
            display_type = %self.display_type,
            "Record found"
        );
        Located {
            record,
            existed: true,
        }
    }

    /// Read a record by identity.
    ///
    /// # Errors
    ///
    /// Returns a `NotFound` registry error if the identity is absent.
    pub async fn read(&self, identity: RecordId) -> Result<Record, EvidenceError> {
        Ok(self.registry.read_record(identity).await?)
    }

    /// Read the single record of this display type matching `attrs`.
    ///
    /// # Errors
    ///
    /// `NotFound` on zero matches, `DuplicateResult` on more than one.
    pub async fn read_by_signature(&self, attrs: &Attributes) -> Result<Record, EvidenceError> {
        let signature = self.typed_filter(attrs);
        Ok(self.registry.read_record_by_signature(&signature).await?)
    }

    /// Stream every record of this display type matching `filter`.
    pub fn list(&self, filter: &Attributes) -> BoxStream<'r, Result<Record, EvidenceError>> {
        let filter = self.typed_filter(filter);
        self.registry
            .list_records(&filter)
            .map(|item| item.map_err(EvidenceError::from))
            .boxed()
    }

    fn typed_filter(&self, attrs: &Attributes) -> Attributes {
        let mut filter = attrs.clone();
        filter.insert(
            keys::ARC_DISPLAY_TYPE.to_owned(),
            AttributeValue::Text(self.display_type.clone()),
        );
        filter
    }
}
