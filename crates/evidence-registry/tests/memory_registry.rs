//! Behavioural tests for the in-process registry.
//!
//! These exercise the contract every `Registry` implementation must honour:
//! signature lookups resolve to exactly one record, events append in order
//! and refresh their record's asset attributes, and uploads are
//! content-addressed.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]

use evidence_registry::digest::bytes_digest;
use evidence_registry::{MemoryRegistry, NewEvent, NewRecord, Registry, RegistryError};
use evidence_types::{
    keys, text_attributes, Attributes, ConfirmationStatus, EventProps, HashAlgorithm, RecordId,
};
use futures::TryStreamExt;

fn crate_record(name: &str) -> NewRecord {
    NewRecord::with_attributes(text_attributes([
        (keys::ARC_DISPLAY_NAME, name),
        (keys::ARC_DISPLAY_TYPE, "Widget shipping crate"),
    ]))
}

fn event_on(record: RecordId, description: &str) -> NewEvent {
    NewEvent {
        record,
        props: EventProps::record_evidence(),
        attributes: text_attributes([(keys::ARC_DESCRIPTION, description)]),
        asset_attributes: None,
        confirm: true,
    }
}

#[tokio::test]
async fn read_by_signature_not_found_then_duplicate() {
    let registry = MemoryRegistry::new();
    let signature = text_attributes([(keys::ARC_DISPLAY_TYPE, "Widget shipping crate")]);

    let err = registry.read_record_by_signature(&signature).await.unwrap_err();
    assert!(matches!(err, RegistryError::NotFound { kind: "record", .. }));

    registry.create_record(crate_record("crate-1")).await.expect("create 1");
    let one = registry
        .read_record_by_signature(&signature)
        .await
        .expect("exactly one match");
    assert_eq!(one.display_name(), Some("crate-1"));

    registry.create_record(crate_record("crate-2")).await.expect("create 2");
    registry.create_record(crate_record("crate-3")).await.expect("create 3");
    let err = registry.read_record_by_signature(&signature).await.unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateResult { count: 3 }));
}

#[tokio::test]
async fn read_unknown_identity_is_not_found() {
    let registry = MemoryRegistry::new();
    let err = registry.read_record(RecordId::new()).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn list_records_streams_matches_in_creation_order() {
    let registry = MemoryRegistry::new();
    registry.create_record(crate_record("a")).await.expect("a");
    registry
        .create_record(NewRecord::with_attributes(text_attributes([(
            keys::ARC_DISPLAY_TYPE,
            "Software Package",
        )])))
        .await
        .expect("package");
    registry.create_record(crate_record("b")).await.expect("b");

    let filter = text_attributes([(keys::ARC_DISPLAY_TYPE, "Widget shipping crate")]);
    let names: Vec<String> = registry
        .list_records(&filter)
        .map_ok(|record| record.display_name().unwrap_or_default().to_owned())
        .try_collect()
        .await
        .expect("list");
    assert_eq!(names, vec!["a", "b"]);
}

#[tokio::test]
async fn event_asset_attributes_refresh_the_record() {
    let registry = MemoryRegistry::new();
    let record = registry.create_record(crate_record("c")).await.expect("create");

    let mut event = event_on(record.identity, "moved");
    event.asset_attributes = Some(text_attributes([(keys::ARC_GIS_LAT, "43.018889")]));
    let appended = registry.create_event(event).await.expect("append");

    assert_eq!(appended.confirmation_status, ConfirmationStatus::Confirmed);
    assert_eq!(
        appended.asset_attributes,
        text_attributes([(keys::ARC_GIS_LAT, "43.018889")])
    );

    let reread = registry.read_record(record.identity).await.expect("read");
    assert_eq!(reread.attribute(keys::ARC_GIS_LAT), Some("43.018889"));
    assert_eq!(reread.display_name(), Some("c"));
}

#[tokio::test]
async fn unconfirmed_append_reports_pending() {
    let registry = MemoryRegistry::new();
    let record = registry.create_record(crate_record("p")).await.expect("create");

    let mut event = event_on(record.identity, "fire and forget");
    event.confirm = false;
    let appended = registry.create_event(event).await.expect("append");
    assert_eq!(appended.confirmation_status, ConfirmationStatus::Pending);
}

#[tokio::test]
async fn append_to_unknown_record_fails_without_side_effects() {
    let registry = MemoryRegistry::new();
    let err = registry
        .create_event(event_on(RecordId::new(), "orphan"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(registry.event_count().await, 0);
}

#[tokio::test]
async fn events_list_in_append_order() {
    let registry = MemoryRegistry::new();
    let record = registry.create_record(crate_record("o")).await.expect("create");
    let other = registry.create_record(crate_record("x")).await.expect("create");

    for description in ["first", "second", "third"] {
        registry
            .create_event(event_on(record.identity, description))
            .await
            .expect("append");
        registry
            .create_event(event_on(other.identity, "noise"))
            .await
            .expect("append other");
    }

    let events: Vec<_> = registry
        .list_events(record.identity)
        .try_collect()
        .await
        .expect("list");
    let descriptions: Vec<&str> = events
        .iter()
        .filter_map(|event| event.attribute(keys::ARC_DESCRIPTION))
        .collect();
    assert_eq!(descriptions, vec!["first", "second", "third"]);
    assert!(events.windows(2).all(|w| w[0].sequence < w[1].sequence));

    let read_back = registry.read_event(events[1].identity).await.expect("read");
    assert_eq!(read_back, events[1]);
}

#[tokio::test]
async fn upload_is_content_addressed() {
    let registry = MemoryRegistry::new();
    let payload = b"hello world".to_vec();

    let reference = registry
        .upload_attachment(payload.as_slice(), "text/plain")
        .await
        .expect("upload");
    assert_eq!(reference.hash.alg, HashAlgorithm::Sha256);
    assert_eq!(reference.hash.value, bytes_digest(&payload));
    assert_eq!(reference.size, 11);
    assert_eq!(reference.mime_type, "text/plain");

    let again = registry
        .upload_attachment(payload.as_slice(), "text/plain")
        .await
        .expect("upload again");
    assert_eq!(again.hash, reference.hash);
    assert_ne!(again.identity, reference.identity);
    assert_eq!(registry.attachment_count().await, 2);
}

#[tokio::test]
async fn large_upload_spans_many_chunks() {
    let registry = MemoryRegistry::new();
    let payload = vec![7u8; 3 * evidence_registry::digest::CHUNK_SIZE + 17];

    let reference = registry
        .upload_attachment(payload.as_slice(), "application/octet-stream")
        .await
        .expect("upload");
    assert_eq!(reference.size, u64::try_from(payload.len()).expect("fits"));
    assert_eq!(reference.hash.value, bytes_digest(&payload));
}

#[tokio::test]
async fn unavailable_registry_rejects_every_call() {
    let registry = MemoryRegistry::new();
    let record = registry.create_record(crate_record("u")).await.expect("create");
    registry.set_available(false);

    assert!(matches!(
        registry.create_record(crate_record("v")).await,
        Err(RegistryError::Unavailable(_))
    ));
    assert!(matches!(
        registry.create_event(event_on(record.identity, "lost")).await,
        Err(RegistryError::Unavailable(_))
    ));
    assert!(matches!(
        registry.upload_attachment(&b"x"[..], "text/plain").await,
        Err(RegistryError::Unavailable(_))
    ));
    let listed: Result<Vec<_>, _> = registry.list_records(&Attributes::new()).try_collect().await;
    assert!(matches!(listed, Err(RegistryError::Unavailable(_))));

    registry.set_available(true);
    assert_eq!(registry.event_count().await, 0);
    assert_eq!(registry.record_count().await, 1);
}

#[tokio::test]
async fn conditional_create_refuses_a_taken_signature() {
    let registry = MemoryRegistry::new();
    let signature = text_attributes([
        (keys::ARC_DISPLAY_NAME, "crate-1"),
        (keys::ARC_DISPLAY_TYPE, "Widget shipping crate"),
    ]);

    let first = registry
        .create_record(crate_record("crate-1").unique_on(signature.clone()))
        .await
        .expect("first create");
    let err = registry
        .create_record(crate_record("crate-1").unique_on(signature.clone()))
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::AlreadyExists { .. }));
    assert_eq!(registry.record_count().await, 1);

    let found = registry
        .read_record_by_signature(&signature)
        .await
        .expect("still unique");
    assert_eq!(found.identity, first.identity);
}
