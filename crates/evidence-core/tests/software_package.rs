//! Software package scenarios against the in-process registry.
//!
//! Covers idempotent package creation, the attribute layout of every event
//! kind, custom overlays, attachments, and failure paths that must leave
//! the registry untouched.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic,
    clippy::arithmetic_side_effects
)]

use std::sync::Arc;

use evidence_core::{
    AttachmentUploader, Deprecation, EventOptions, EvidenceError, PrivatePatch, RecordLocator,
    ReleaseAccepted, ReleaseOptions, ReleasePlan, Sbom, SbomEvent, SbomPatch, SoftwarePackage,
    Vulnerability, VulnerabilityStage, SOFTWARE_PACKAGE_TYPE,
};
use evidence_registry::{MemoryRegistry, Registry, RegistryError};
use evidence_types::{keys, text_attributes, Attachment, Event, EventKind};

fn sbom(version: &str) -> Sbom {
    Sbom {
        name: "pkg-A".to_owned(),
        description: format!("release {version}"),
        hash: format!("h-{version}"),
        version: version.to_owned(),
        author: "x".to_owned(),
        supplier: "y".to_owned(),
        uuid: format!("u-{version}"),
    }
}

fn vulnerability() -> Vulnerability {
    Vulnerability {
        stage: VulnerabilityStage::Disclosure,
        description: "buffer overflow".to_owned(),
        name: "overflow".to_owned(),
        reference: "https://example.invalid/v/1".to_owned(),
        id: "CVE-2026-0001".to_owned(),
        category: "memory".to_owned(),
        severity: "HIGH".to_owned(),
        status: "open".to_owned(),
        author: "researcher".to_owned(),
        target_component: "pkg-A".to_owned(),
        target_version: "1.0".to_owned(),
    }
}

/// One payload of every software-package kind.
fn every_event() -> Vec<SbomEvent> {
    vec![
        SbomEvent::Release(sbom("1.0")),
        SbomEvent::ReleasePlan(ReleasePlan {
            description: "plan".to_owned(),
            date: "2026-11-01".to_owned(),
            captain: "cap".to_owned(),
            name: "pkg-A".to_owned(),
            version: "1.1".to_owned(),
            reference: "PLAN-1".to_owned(),
        }),
        SbomEvent::ReleaseAccepted(ReleaseAccepted {
            description: "accepted".to_owned(),
            date: "2026-11-02".to_owned(),
            captain: "cap".to_owned(),
            name: "pkg-A".to_owned(),
            version: "1.1".to_owned(),
            approver: "boss".to_owned(),
            reference: "VR-1".to_owned(),
        }),
        SbomEvent::Patch(SbomPatch {
            description: "patch".to_owned(),
            target_component: "pkg-A".to_owned(),
            hash: "ph".to_owned(),
            target_version: "1.0".to_owned(),
            author: "x".to_owned(),
            supplier: "y".to_owned(),
            uuid: "pu".to_owned(),
        }),
        SbomEvent::PrivatePatch(PrivatePatch {
            private_id: "ACME".to_owned(),
            description: "hotfix".to_owned(),
            target_component: "pkg-A".to_owned(),
            hash: "abc".to_owned(),
            target_version: "1.0".to_owned(),
            author: "x".to_owned(),
            supplier: "y".to_owned(),
            uuid: "u2".to_owned(),
            reference: "CVE-1".to_owned(),
        }),
        SbomEvent::Vulnerability(vulnerability()),
        SbomEvent::Vulnerability(Vulnerability {
            stage: VulnerabilityStage::Update,
            status: "fixed".to_owned(),
            ..vulnerability()
        }),
        SbomEvent::Deprecation(Deprecation {
            description: "end of life".to_owned(),
            target_component: "pkg-A".to_owned(),
            target_version: "1.0".to_owned(),
            target_uuid: "u-1.0".to_owned(),
            target_date: "2027-01-01".to_owned(),
        }),
    ]
}

#[tokio::test]
async fn create_twice_finds_the_first_record() {
    let registry = MemoryRegistry::new();
    let locator = RecordLocator::new(&registry, SOFTWARE_PACKAGE_TYPE);

    let first = SoftwarePackage::create(&locator, "pkg-A", "first", None, &[])
        .await
        .expect("create");
    assert!(!first.existed());

    let second = SoftwarePackage::create(&locator, "pkg-A", "second description", None, &[])
        .await
        .expect("find");
    assert!(second.existed());
    assert_eq!(second.record().identity, first.record().identity);
    assert_eq!(second.record().description(), Some("first"));
    assert_eq!(registry.record_count().await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_share_one_record() {
    let registry = Arc::new(MemoryRegistry::new());
    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move {
                RecordLocator::new(registry.as_ref(), SOFTWARE_PACKAGE_TYPE)
                    .create_or_find("pkg-A", &format!("caller {i}"), None, &[])
                    .await
                    .expect("create or find")
            })
        })
        .collect();

    let mut located = Vec::new();
    for task in tasks {
        located.push(task.await.expect("join"));
    }
    assert_eq!(registry.record_count().await, 1);
    assert_eq!(located.iter().filter(|l| !l.existed).count(), 1);
    let identity = located[0].record.identity;
    assert!(located.iter().all(|l| l.record.identity == identity));
}

#[tokio::test]
async fn duplicate_records_surface_as_duplicate_result() {
    let registry = MemoryRegistry::new();
    let locator = RecordLocator::new(&registry, SOFTWARE_PACKAGE_TYPE);
    let signature = locator.signature("pkg-A");
    for _ in 0..2 {
        registry
            .create_record(evidence_registry::NewRecord::with_attributes(signature.clone()))
            .await
            .expect("seed duplicate");
    }

    let err = SoftwarePackage::create(&locator, "pkg-A", "d", None, &[])
        .await
        .expect_err("duplicate");
    assert!(matches!(
        err,
        EvidenceError::Registry(RegistryError::DuplicateResult { count: 2 })
    ));
}

#[tokio::test]
async fn release_updates_the_record() {
    let registry = MemoryRegistry::new();
    let locator = RecordLocator::new(&registry, SOFTWARE_PACKAGE_TYPE);
    let mut package = SoftwarePackage::create(&locator, "pkg-A", "d", None, &[])
        .await
        .expect("create");

    let event = package
        .release(&sbom("1.0"), &ReleaseOptions::default())
        .await
        .expect("release");
    assert_eq!(event.display_type(), Some("Release"));
    assert_eq!(event.attribute(keys::ARC_EVIDENCE), Some("Release"));
    assert_eq!(event.attribute(keys::SBOM_VERSION), Some("1.0"));

    let record = package.refresh().await.expect("refresh");
    assert_eq!(record.attribute(keys::SBOM_VERSION), Some("1.0"));
    assert_eq!(record.attribute(keys::SBOM_UUID), Some("u-1.0"));
    assert_eq!(registry.event_count().await, 1);
}

#[tokio::test]
async fn backdated_release_keeps_latest_on_the_record() {
    let registry = MemoryRegistry::new();
    let locator = RecordLocator::new(&registry, SOFTWARE_PACKAGE_TYPE);
    let mut package = SoftwarePackage::create(&locator, "pkg-A", "d", None, &[])
        .await
        .expect("create");

    let options = ReleaseOptions {
        latest: Some(sbom("2.0")),
        custom_asset_attrs: Some(text_attributes([("release_channel", "stable")])),
        ..ReleaseOptions::default()
    };
    let event = package.release(&sbom("1.5"), &options).await.expect("release");
    assert_eq!(event.attribute(keys::SBOM_VERSION), Some("1.5"));

    let record = package.refresh().await.expect("refresh");
    assert_eq!(record.attribute(keys::SBOM_VERSION), Some("2.0"));
    assert_eq!(record.attribute(keys::SBOM_HASH), Some("h-2.0"));
    assert_eq!(record.attribute("release_channel"), Some("stable"));
}

#[tokio::test]
async fn namespaced_release_keeps_the_record_findable() {
    let registry = MemoryRegistry::new();
    let locator = RecordLocator::new(&registry, SOFTWARE_PACKAGE_TYPE)
        .with_namespace(Some("ns".to_owned()));
    let mut package = SoftwarePackage::create(&locator, "pkg-A", "d", None, &[])
        .await
        .expect("create");

    let options = ReleaseOptions {
        custom_asset_attrs: Some(text_attributes([
            (keys::ARC_DISPLAY_NAME, "renamed"),
            (keys::ARC_DISPLAY_TYPE, "Other"),
        ])),
        ..ReleaseOptions::default()
    };
    package.release(&sbom("1.0"), &options).await.expect("release");

    let record = package.refresh().await.expect("refresh");
    assert_eq!(record.display_name(), Some("pkg-A ns"));
    assert_eq!(record.display_type(), Some(SOFTWARE_PACKAGE_TYPE));
    assert_eq!(record.attribute(keys::SBOM_COMPONENT), Some("pkg-A"));
    let identity = record.identity;

    let again = SoftwarePackage::create(&locator, "pkg-A", "d", None, &[])
        .await
        .expect("find");
    assert!(again.existed());
    assert_eq!(again.record().identity, identity);
    assert_eq!(registry.record_count().await, 1);
}

#[tokio::test]
async fn every_kind_carries_its_label_and_description() {
    let registry = MemoryRegistry::new();
    let locator = RecordLocator::new(&registry, SOFTWARE_PACKAGE_TYPE);
    let package = SoftwarePackage::create(&locator, "pkg-A", "d", None, &[])
        .await
        .expect("create");

    let mut labels = Vec::new();
    for event in every_event() {
        let appended = package
            .apply(&event, &EventOptions::default())
            .await
            .expect("append");
        assert_eq!(
            appended.attribute(keys::ARC_DESCRIPTION),
            Some(event.payload().description())
        );
        assert_eq!(
            appended.attribute(keys::ARC_EVIDENCE),
            appended.display_type()
        );
        labels.push(appended.display_type().unwrap_or_default().to_owned());
    }
    assert_eq!(
        labels,
        vec![
            "Release",
            "Release Plan",
            "Release Accepted",
            "Patch",
            "ACME_Patch",
            "Vulnerability Disclosure",
            "Vulnerability Update",
            "Deprecation",
        ]
    );
}

#[tokio::test]
async fn overlay_wins_for_every_kind() {
    let registry = MemoryRegistry::new();
    let locator = RecordLocator::new(&registry, SOFTWARE_PACKAGE_TYPE);
    let package = SoftwarePackage::create(&locator, "pkg-A", "d", None, &[])
        .await
        .expect("create");

    for event in every_event() {
        let overlay = text_attributes([
            (keys::ARC_DESCRIPTION, "overridden"),
            ("ticket", "OPS-7"),
        ]);
        let options = EventOptions::default().with_custom_attrs(overlay);
        let appended = package.apply(&event, &options).await.expect("append");
        assert_eq!(appended.attribute(keys::ARC_DESCRIPTION), Some("overridden"));
        assert_eq!(appended.attribute("ticket"), Some("OPS-7"));
    }
}

#[tokio::test]
async fn private_patch_layout() {
    let registry = MemoryRegistry::new();
    let locator = RecordLocator::new(&registry, SOFTWARE_PACKAGE_TYPE);
    let package = SoftwarePackage::create(&locator, "pkg-A", "d", None, &[])
        .await
        .expect("create");
    let SbomEvent::PrivatePatch(patch) = &every_event()[4] else {
        panic!("fixture order changed");
    };

    let event = package
        .private_patch(patch, &EventOptions::default())
        .await
        .expect("private patch");
    assert_eq!(event.display_type(), Some("ACME_Patch"));
    assert_eq!(event.attribute(keys::SBOM_PATCH_VULN_REFERENCE), Some("CVE-1"));
    assert_eq!(event.attribute(keys::SBOM_PATCH_VERSION), Some("1.0"));
    assert_eq!(event.attribute(keys::SBOM_PATCH_TARGET_VERSION), None);
}

#[tokio::test]
async fn vulnerability_operations_ignore_payload_stage() {
    let registry = MemoryRegistry::new();
    let locator = RecordLocator::new(&registry, SOFTWARE_PACKAGE_TYPE);
    let package = SoftwarePackage::create(&locator, "pkg-A", "d", None, &[])
        .await
        .expect("create");

    let event = package
        .vuln_update(&vulnerability(), &EventOptions::default())
        .await
        .expect("update");
    assert_eq!(event.display_type(), EventKind::VulnerabilityUpdate.fixed_label());
    assert_eq!(event.attribute(keys::VULN_ID), Some("CVE-2026-0001"));
}

#[tokio::test]
async fn blank_field_appends_nothing() {
    let registry = MemoryRegistry::new();
    let locator = RecordLocator::new(&registry, SOFTWARE_PACKAGE_TYPE);
    let package = SoftwarePackage::create(&locator, "pkg-A", "d", None, &[])
        .await
        .expect("create");

    let mut incomplete = sbom("1.0");
    incomplete.hash = String::new();
    let err = package
        .release(&incomplete, &ReleaseOptions::default())
        .await
        .expect_err("blank hash");
    assert!(matches!(err, EvidenceError::MissingField("hash")));

    let err = package
        .deprecation(
            &Deprecation {
                description: "eol".to_owned(),
                target_component: "pkg-A".to_owned(),
                target_version: "1.0".to_owned(),
                target_uuid: "  ".to_owned(),
                target_date: "2027-01-01".to_owned(),
            },
            &EventOptions::default(),
        )
        .await
        .expect_err("blank uuid");
    assert!(matches!(err, EvidenceError::MissingField("target_uuid")));
    assert_eq!(registry.event_count().await, 0);
}

#[tokio::test]
async fn unavailable_registry_appends_nothing() {
    let registry = MemoryRegistry::new();
    let locator = RecordLocator::new(&registry, SOFTWARE_PACKAGE_TYPE);
    let package = SoftwarePackage::create(&locator, "pkg-A", "d", None, &[])
        .await
        .expect("create");

    registry.set_available(false);
    let err = package
        .release(&sbom("1.0"), &ReleaseOptions::default())
        .await
        .expect_err("unavailable");
    assert!(matches!(
        err,
        EvidenceError::Registry(RegistryError::Unavailable(_))
    ));
    registry.set_available(true);
    assert_eq!(registry.event_count().await, 0);
}

async fn upload(registry: &MemoryRegistry, body: &'static [u8], name: &str) -> Attachment {
    AttachmentUploader::new(registry)
        .upload(body, name, "application/json")
        .await
        .expect("upload")
}

#[tokio::test]
async fn attachments_are_referenced_and_read_back() {
    let registry = MemoryRegistry::new();
    let locator = RecordLocator::new(&registry, SOFTWARE_PACKAGE_TYPE);
    let package = SoftwarePackage::create(&locator, "pkg-A", "d", None, &[])
        .await
        .expect("create");

    let attachments = vec![
        upload(&registry, b"{\"bom\":1}", "sbom.json").await,
        upload(&registry, b"{\"vex\":1}", "vex.json").await,
    ];
    let options = ReleaseOptions {
        event: EventOptions::default().with_attachments(attachments.clone()),
        ..ReleaseOptions::default()
    };
    let event = package.release(&sbom("1.0"), &options).await.expect("release");

    let read_back: Event = registry.read_event(event.identity).await.expect("read");
    let entries = read_back.attachment_entries();
    assert_eq!(entries.len(), 2);
    for (entry, attachment) in entries.iter().zip(&attachments) {
        assert_eq!(entry.len(), 4);
        assert_eq!(
            entry.get(keys::ARC_HASH_VALUE),
            Some(&attachment.reference.hash.value)
        );
        assert_eq!(entry.get(keys::ARC_HASH_ALG).map(String::as_str), Some("SHA256"));
        assert_eq!(
            entry.get(keys::ARC_ATTACHMENT_IDENTITY),
            Some(&attachment.reference.identity.to_string())
        );
        assert_eq!(entry.get(keys::ARC_DISPLAY_NAME), Some(&attachment.display_name));
    }
}

#[tokio::test]
async fn package_created_with_attachments_lists_them() {
    let registry = MemoryRegistry::new();
    let locator = RecordLocator::new(&registry, SOFTWARE_PACKAGE_TYPE);
    let attachment = upload(&registry, b"{}", "manifest.json").await;

    let package = SoftwarePackage::create(&locator, "pkg-B", "d", None, &[attachment])
        .await
        .expect("create");
    let listed = package
        .record()
        .attributes
        .get(keys::ARC_ATTACHMENTS)
        .and_then(|value| value.as_list())
        .map(<[_]>::len);
    assert_eq!(listed, Some(1));
}
