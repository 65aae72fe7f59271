//! End-to-end workflow tests against mocked records-service and storage
//! endpoints.

use std::path::PathBuf;
use std::time::Duration;

use medialink_client::UploadWorkflow;
use medialink_core::{ClientConfig, Environment, UploadError, UploadResult, UploadTarget};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FMO_URL_PREFIX: &str = "https://fmo-file-cdn.s3.us-east-2.amazonaws.com/";

fn test_config(records_url: &str, storage_url: Option<&str>) -> ClientConfig {
    let mut config = ClientConfig::new(records_url, "test-key", "user-1", "biz-1");
    config.access_key_id = Some("AKIATEST".to_string());
    config.request_timeout = Duration::from_secs(5);
    config.storage_endpoint = storage_url.map(|url| url.to_string());
    config
}

fn audio_fixture(dir: &tempfile::TempDir) -> PathBuf {
    let file_path = dir.path().join("hello.mp3");
    std::fs::write(&file_path, b"0123456789").unwrap();
    file_path
}

fn fmo_target(file_path: PathBuf) -> UploadTarget {
    UploadTarget {
        file_path,
        content_type: "audio/mpeg".to_string(),
        environment: Environment::Fmo,
        source: "zoom".to_string(),
    }
}

async fn mount_signature_ok(records: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/s3/signature"))
        .and(header("X-API-Key", "test-key"))
        .and(header("X-User-Id", "user-1"))
        .and(header("X-Business-Id", "biz-1"))
        .and(body_string_contains("aws4_request"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "policy": "cG9saWN5", "signature": "c2ln" })),
        )
        .expect(1)
        .mount(records)
        .await;
}

async fn mount_storage_ok(storage: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).insert_header("ETag", "\"etag-1\""))
        .expect(1)
        .mount(storage)
        .await;
}

#[tokio::test]
async fn upload_workflow_returns_public_url_and_size() {
    let records = MockServer::start().await;
    let storage = MockServer::start().await;

    mount_signature_ok(&records).await;
    mount_storage_ok(&storage).await;

    Mock::given(method("POST"))
        .and(path("/s3/success"))
        .and(query_param("source", "zoom"))
        .and(body_string_contains("bucket=fmo-file-cdn"))
        .and(body_string_contains("name=hello.mp3"))
        .and(body_string_contains("is_public=False"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "id": "file-1", "key": "remote-key.mp3" })),
        )
        .expect(1)
        .mount(&records)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let workflow =
        UploadWorkflow::new(&test_config(&records.uri(), Some(&storage.uri()))).unwrap();
    let result = workflow.run(&fmo_target(audio_fixture(&dir))).await.unwrap();

    assert_eq!(result.id, "file-1");
    assert_eq!(result.key, "remote-key.mp3");
    assert_eq!(result.size_bytes, 10);
    assert!(result.url.starts_with(FMO_URL_PREFIX), "{}", result.url);
    assert!(result.url.ends_with(".mp3"), "{}", result.url);

    // The storage POST replays the policy fields next to the binary content.
    let storage_requests = storage.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&storage_requests[0].body);
    assert!(body.contains("cG9saWN5"));
    assert!(body.contains("c2ln"));
    assert!(body.contains("x-amz-signature"));
    assert!(body.contains("hello.mp3"));
    assert!(body.contains("0123456789"));
}

#[tokio::test]
async fn storage_failure_aborts_before_registration() {
    let records = MockServer::start().await;
    let storage = MockServer::start().await;

    mount_signature_ok(&records).await;

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .expect(1)
        .mount(&storage)
        .await;

    Mock::given(method("POST"))
        .and(path("/s3/success"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&records)
        .await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&records)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let workflow =
        UploadWorkflow::new(&test_config(&records.uri(), Some(&storage.uri()))).unwrap();
    let err = workflow
        .run(&fmo_target(audio_fixture(&dir)))
        .await
        .unwrap_err();

    match err {
        UploadError::Service { status, body, .. } => {
            assert_eq!(status, 500);
            assert_eq!(body, "internal error");
        }
        other => panic!("expected Service error, got {other:?}"),
    }
}

#[tokio::test]
async fn registration_failure_reports_inconsistent_state() {
    let records = MockServer::start().await;
    let storage = MockServer::start().await;

    mount_signature_ok(&records).await;
    mount_storage_ok(&storage).await;

    Mock::given(method("POST"))
        .and(path("/s3/success"))
        .respond_with(ResponseTemplate::new(500).set_body_string("registration down"))
        .expect(1)
        .mount(&records)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let workflow =
        UploadWorkflow::new(&test_config(&records.uri(), Some(&storage.uri()))).unwrap();
    let err = workflow
        .run(&fmo_target(audio_fixture(&dir)))
        .await
        .unwrap_err();

    match err {
        UploadError::InconsistentState {
            stage, key, url, ..
        } => {
            assert_eq!(stage, "registration");
            // The object's URL stays deterministically computable even
            // though registration never happened.
            assert_eq!(url, format!("{FMO_URL_PREFIX}{key}"));
            assert!(key.ends_with(".mp3"));
        }
        other => panic!("expected InconsistentState, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_file_fails_without_network_calls() {
    let records = MockServer::start().await;

    let workflow = UploadWorkflow::new(&test_config(&records.uri(), None)).unwrap();
    let err = workflow
        .run(&fmo_target(PathBuf::from("/nonexistent/hello.mp3")))
        .await
        .unwrap_err();

    assert!(matches!(err, UploadError::FileNotFound(_)));
    assert!(records.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_access_key_fails_before_signature_request() {
    let records = MockServer::start().await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(&records.uri(), None);
    config.access_key_id = None;

    let workflow = UploadWorkflow::new(&config).unwrap();
    let err = workflow
        .run(&fmo_target(audio_fixture(&dir)))
        .await
        .unwrap_err();

    assert!(matches!(err, UploadError::CredentialMissing));
    assert!(records.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn connectivity_probe_reports_success_without_raising() {
    let records = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/client/v2"))
        .and(body_string_contains("page_size"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .expect(1)
        .mount(&records)
        .await;

    let workflow = UploadWorkflow::new(&test_config(&records.uri(), None)).unwrap();
    assert!(workflow.records().check_connection().await);
}

#[tokio::test]
async fn connectivity_probe_is_false_on_error_status() {
    let records = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/client/v2"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(1)
        .mount(&records)
        .await;

    let workflow = UploadWorkflow::new(&test_config(&records.uri(), None)).unwrap();
    assert!(!workflow.records().check_connection().await);
}

#[tokio::test]
async fn connectivity_probe_is_false_on_transport_error() {
    // Nothing listens here; the probe swallows the connection failure.
    let workflow = UploadWorkflow::new(&test_config("http://127.0.0.1:1", None)).unwrap();
    assert!(!workflow.records().check_connection().await);
}

#[tokio::test]
async fn record_update_patches_link_and_file_fields() {
    let records = MockServer::start().await;

    let expected_body = json!({
        "fields": [
            { "name": "call_recording_link", "value": format!("{FMO_URL_PREFIX}abc.mp3") },
            { "name": "call_recording", "value": ["file-1"] },
        ]
    });
    Mock::given(method("PUT"))
        .and(path("/records/type-1/rec-1"))
        .and(header("X-API-Key", "test-key"))
        .and(wiremock::matchers::body_json(&expected_body))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "rec-1" })))
        .expect(1)
        .mount(&records)
        .await;

    let result = UploadResult {
        id: "file-1".to_string(),
        key: "abc.mp3".to_string(),
        url: format!("{FMO_URL_PREFIX}abc.mp3"),
        size_bytes: 10,
    };

    let workflow = UploadWorkflow::new(&test_config(&records.uri(), None)).unwrap();
    let updated = workflow
        .attach_to_record("type-1", "rec-1", &result, "call_recording_link", "call_recording")
        .await
        .unwrap();
    assert_eq!(updated["id"], "rec-1");
}

#[tokio::test]
async fn record_update_failure_reports_inconsistent_state() {
    let records = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/records/type-1/rec-1"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such record"))
        .expect(1)
        .mount(&records)
        .await;

    let result = UploadResult {
        id: "file-1".to_string(),
        key: "abc.mp3".to_string(),
        url: format!("{FMO_URL_PREFIX}abc.mp3"),
        size_bytes: 10,
    };

    let workflow = UploadWorkflow::new(&test_config(&records.uri(), None)).unwrap();
    let err = workflow
        .attach_to_record("type-1", "rec-1", &result, "call_recording_link", "call_recording")
        .await
        .unwrap_err();

    match err {
        UploadError::InconsistentState { stage, source, .. } => {
            assert_eq!(stage, "record update");
            assert!(matches!(*source, UploadError::Service { status: 404, .. }));
        }
        other => panic!("expected InconsistentState, got {other:?}"),
    }
}
