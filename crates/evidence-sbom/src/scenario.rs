//! The software package lifecycle scenario.
//!
//! One package goes through a full release cycle: a plan, acceptance, the
//! 1.0 release (with any configured attachments), a vulnerability
//! disclosure, a private hotfix, a public patch, the vulnerability update,
//! the 1.1 release, and finally the deprecation of 1.0.

use std::path::{Path, PathBuf};

use tracing::info;

use evidence_core::config::SamplesConfig;
use evidence_core::{
    AttachmentUploader, Deprecation, EventOptions, PrivatePatch, RecordLocator, ReleaseAccepted,
    ReleasePlan, Sbom, SbomEvent, SbomPatch, SoftwarePackage, Vulnerability, VulnerabilityStage,
    SOFTWARE_PACKAGE_TYPE,
};
use evidence_registry::Registry;
use evidence_types::{keys, Attachment, RecordId};

use crate::error::SbomError;

const SUPPLIER: &str = "Synsation Industries";
const AUTHOR: &str = "Synsation firmware team";
const CAPTAIN: &str = "Release captain";
const CVE: &str = "CVE-2026-1944";

/// What the scenario left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioReport {
    /// The package record.
    pub record: RecordId,
    /// Whether the package existed before the run.
    pub existed: bool,
    /// Number of events appended.
    pub events: usize,
    /// The record's `sbom_version` after the run.
    pub version: Option<String>,
}

fn release(name: &str, version: &str) -> Sbom {
    Sbom {
        name: name.to_owned(),
        description: format!("{name} {version} general availability"),
        hash: format!("sha256-{name}-{version}"),
        version: version.to_owned(),
        author: AUTHOR.to_owned(),
        supplier: SUPPLIER.to_owned(),
        uuid: format!("{name}-{version}"),
    }
}

fn vulnerability(name: &str, stage: VulnerabilityStage, status: &str) -> Vulnerability {
    Vulnerability {
        stage,
        description: format!("Heap overflow in {name} update parser"),
        name: "update parser overflow".to_owned(),
        reference: format!("https://security.synsation.io/advisories/{CVE}"),
        id: CVE.to_owned(),
        category: "memory safety".to_owned(),
        severity: "HIGH".to_owned(),
        status: status.to_owned(),
        author: "Synsation PSIRT".to_owned(),
        target_component: name.to_owned(),
        target_version: "1.0".to_owned(),
    }
}

/// The lifecycle events for `name`, in order.
pub fn timeline(name: &str) -> Vec<SbomEvent> {
    vec![
        SbomEvent::ReleasePlan(ReleasePlan {
            description: format!("Plan for {name} 1.0"),
            date: "2026-03-01".to_owned(),
            captain: CAPTAIN.to_owned(),
            name: name.to_owned(),
            version: "1.0".to_owned(),
            reference: "PLAN-1.0".to_owned(),
        }),
        SbomEvent::ReleaseAccepted(ReleaseAccepted {
            description: format!("{name} 1.0 passed acceptance"),
            date: "2026-03-20".to_owned(),
            captain: CAPTAIN.to_owned(),
            name: name.to_owned(),
            version: "1.0".to_owned(),
            approver: "Head of product security".to_owned(),
            reference: "VR-1.0".to_owned(),
        }),
        SbomEvent::Release(release(name, "1.0")),
        SbomEvent::Vulnerability(vulnerability(name, VulnerabilityStage::Disclosure, "open")),
        SbomEvent::PrivatePatch(PrivatePatch {
            private_id: "SynsationFleet".to_owned(),
            description: format!("Hotfix for {CVE} for fleet customers"),
            target_component: name.to_owned(),
            hash: format!("sha256-{name}-1.0-hotfix"),
            target_version: "1.0".to_owned(),
            author: AUTHOR.to_owned(),
            supplier: SUPPLIER.to_owned(),
            uuid: format!("{name}-1.0-hotfix"),
            reference: CVE.to_owned(),
        }),
        SbomEvent::Patch(SbomPatch {
            description: format!("Public patch for {CVE}"),
            target_component: name.to_owned(),
            hash: format!("sha256-{name}-1.0.1"),
            target_version: "1.0".to_owned(),
            author: AUTHOR.to_owned(),
            supplier: SUPPLIER.to_owned(),
            uuid: format!("{name}-1.0.1"),
        }),
        SbomEvent::Vulnerability(vulnerability(name, VulnerabilityStage::Update, "fixed")),
        SbomEvent::Release(release(name, "1.1")),
        SbomEvent::Deprecation(Deprecation {
            description: format!("{name} 1.0 reaches end of life"),
            target_component: name.to_owned(),
            target_version: "1.0".to_owned(),
            target_uuid: format!("{name}-1.0"),
            target_date: "2026-12-31".to_owned(),
        }),
    ]
}

/// Regular files in `dir`, sorted by name.
async fn attachment_files(dir: &Path) -> Result<Vec<PathBuf>, SbomError> {
    let list_error = |source| SbomError::AttachmentsDir {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries = tokio::fs::read_dir(dir).await.map_err(list_error)?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(list_error)? {
        if entry.file_type().await.map_err(list_error)?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

async fn upload_attachments<R: Registry>(
    registry: &R,
    dir: Option<&Path>,
) -> Result<Vec<Attachment>, SbomError> {
    let Some(dir) = dir else {
        return Ok(Vec::new());
    };
    let uploader = AttachmentUploader::new(registry);
    let mut attachments = Vec::new();
    for path in attachment_files(dir).await? {
        attachments.push(uploader.upload_file(&path, None).await?);
    }
    info!(dir = %dir.display(), count = attachments.len(), "Release attachments uploaded");
    Ok(attachments)
}

/// Run the scenario against `registry`.
///
/// # Errors
///
/// Returns the first failure; events appended before it stay appended.
pub async fn run<R: Registry>(registry: &R, config: &SamplesConfig) -> Result<ScenarioReport, SbomError> {
    let locator = RecordLocator::new(registry, SOFTWARE_PACKAGE_TYPE)
        .with_namespace(config.registry.namespace.clone());
    let name = locator.qualified_name(&config.sbom.package_name);

    let mut package = SoftwarePackage::create(
        &locator,
        &config.sbom.package_name,
        &config.sbom.description,
        None,
        &[],
    )
    .await?;
    info!(
        record = %package.record().identity,
        existed = package.existed(),
        name = %name,
        "Software package ready"
    );

    let mut attachments =
        upload_attachments(registry, config.sbom.attachments_dir.as_deref()).await?;

    let mut events = 0usize;
    for event in timeline(&config.sbom.package_name) {
        let options = match &event {
            SbomEvent::Release(_) => {
                EventOptions::default().with_attachments(std::mem::take(&mut attachments))
            }
            _ => EventOptions::default(),
        };
        let appended = package.apply(&event, &options).await?;
        events = events.saturating_add(1);
        info!(
            event = %appended.identity,
            label = appended.display_type().unwrap_or_default(),
            attachments = appended.attachment_entries().len(),
            "Lifecycle step recorded"
        );
    }

    let existed = package.existed();
    let record = package.refresh().await?;
    Ok(ScenarioReport {
        record: record.identity,
        existed,
        events,
        version: record.attribute(keys::SBOM_VERSION).map(ToOwned::to_owned),
    })
}
