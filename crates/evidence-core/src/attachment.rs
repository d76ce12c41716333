//! Attachment uploads.
//!
//! Uploads happen before the event that references them is composed: the
//! returned [`Attachment`] is what goes into
//! [`EventOptions::attachments`](crate::composer::EventOptions).

use std::path::Path;

use tokio::io::AsyncRead;

use evidence_registry::Registry;
use evidence_types::Attachment;

use crate::error::EvidenceError;

/// MIME type used when the extension is not recognised.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Guess a MIME type from a file extension.
pub fn mime_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("json") => "application/json",
        Some("xml") => "application/xml",
        Some("txt") => "text/plain",
        _ => DEFAULT_MIME_TYPE,
    }
}

/// Streams blobs to the registry.
#[derive(Debug, Clone, Copy)]
pub struct AttachmentUploader<'r, R> {
    registry: &'r R,
}

impl<'r, R: Registry> AttachmentUploader<'r, R> {
    /// An uploader writing to `registry`.
    pub const fn new(registry: &'r R) -> Self {
        Self { registry }
    }

    /// Upload everything `source` yields.
    ///
    /// # Errors
    ///
    /// Returns the registry's error (`UploadFailure` if the transfer
    /// breaks).
    pub async fn upload<S>(
        &self,
        source: S,
        display_name: &str,
        mime_type: &str,
    ) -> Result<Attachment, EvidenceError>
    where
        S: AsyncRead + Unpin + Send,
    {
        let reference = self.registry.upload_attachment(source, mime_type).await?;
        tracing::debug!(
            attachment = %reference.identity,
            display_name,
            mime_type,
            size = reference.size,
            hash = %reference.hash.value,
            "Attachment uploaded"
        );
        Ok(Attachment {
            reference,
            display_name: display_name.to_owned(),
        })
    }

    /// Upload a file. The display name defaults to the file name.
    ///
    /// # Errors
    ///
    /// Returns [`EvidenceError::AttachmentSource`] if the file cannot be
    /// opened, otherwise as [`upload`](Self::upload).
    pub async fn upload_file(
        &self,
        path: &Path,
        display_name: Option<&str>,
    ) -> Result<Attachment, EvidenceError> {
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|source| EvidenceError::AttachmentSource {
                path: path.to_path_buf(),
                source,
            })?;
        let default_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = display_name.unwrap_or(&default_name);
        self.upload(file, name, mime_type_for(path)).await
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use std::path::PathBuf;

    use evidence_registry::digest::bytes_digest;
    use evidence_registry::MemoryRegistry;

    use super::*;

    #[test]
    fn mime_types_follow_extension() {
        assert_eq!(mime_type_for(Path::new("sbom.json")), "application/json");
        assert_eq!(mime_type_for(Path::new("SBOM.XML")), "application/xml");
        assert_eq!(mime_type_for(Path::new("notes.txt")), "text/plain");
        assert_eq!(mime_type_for(Path::new("image.png")), DEFAULT_MIME_TYPE);
        assert_eq!(mime_type_for(Path::new("README")), DEFAULT_MIME_TYPE);
    }

    #[tokio::test]
    async fn upload_file_defaults_name_and_mime() {
        let dir = std::env::temp_dir().join(format!("evidence-upload-{}", uuid_suffix()));
        std::fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join("sbom.json");
        std::fs::write(&path, b"{\"bom\":1}").expect("write");

        let registry = MemoryRegistry::new();
        let attachment = AttachmentUploader::new(&registry)
            .upload_file(&path, None)
            .await
            .expect("upload");
        assert_eq!(attachment.display_name, "sbom.json");
        assert_eq!(attachment.reference.mime_type, "application/json");
        assert_eq!(attachment.reference.hash.value, bytes_digest(b"{\"bom\":1}"));

        std::fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[tokio::test]
    async fn missing_file_is_a_source_error() {
        let registry = MemoryRegistry::new();
        let path = PathBuf::from("/nonexistent/evidence/attachment.txt");
        let err = AttachmentUploader::new(&registry)
            .upload_file(&path, Some("notes"))
            .await
            .expect_err("missing file");
        assert!(matches!(err, EvidenceError::AttachmentSource { .. }));
        assert_eq!(registry.attachment_count().await, 0);
    }

    fn uuid_suffix() -> String {
        evidence_types::AttachmentId::new().to_string()
    }
}
