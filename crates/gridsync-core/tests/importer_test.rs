#![allow(clippy::unwrap_used)]
// End-to-end tests for `Importer` against a wiremock grid.

use std::io::Write;
use std::time::Duration;

use serde_json::json;
use tempfile::NamedTempFile;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gridsync_core::{ImportOptions, Importer, SourceKind};
use gridsync_wapi::{TlsMode, WapiClient, WapiConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn importer_for(server: &MockServer, options: ImportOptions) -> Importer {
    let config = WapiConfig {
        url: server.uri().parse().unwrap(),
        username: "admin".into(),
        password: secrecy::SecretString::from("infoblox".to_string()),
        wapi_version: "2.13.1".into(),
        tls: TlsMode::System,
        timeout: Duration::from_secs(5),
    };
    Importer::new(WapiClient::new(&config).unwrap(), options)
}

fn wapi_path(object: &str) -> String {
    format!("/wapi/v2.13.1/{object}")
}

fn csv_file(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

async fn mount_networks(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(wapi_path("network")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

// ── Preview ─────────────────────────────────────────────────────────

#[tokio::test]
async fn preview_classifies_against_empty_grid() {
    let server = MockServer::start().await;
    mount_networks(&server, json!([])).await;

    let file = csv_file(
        "AccountId,Region,VpcId,Name,CidrBlock,IsDefault,State,Tags\n\
         111,us-east-1,vpc-1,core,10.0.0.0/16,FALSE,available,\n",
    );
    let importer = importer_for(&server, ImportOptions::default()).await;
    let preview = importer.preview(file.path(), SourceKind::Aws).await.unwrap();

    assert_eq!(preview.summary.new, 1);
    assert_eq!(preview.summary.total, 1);
    let item = &preview.preview.new_networks[0];
    assert_eq!(item.network.address.to_string(), "10.0.0.0/16");
}

#[tokio::test]
async fn preview_buckets_update_overlap_and_error_rows() {
    let server = MockServer::start().await;
    mount_networks(
        &server,
        json!([
            {
                "_ref": "network/ref-a:10.0.0.0%2F16/default",
                "network": "10.0.0.0/16",
                "network_view": "default",
                "comment": "existing",
                "extattrs": {}
            },
            {
                "_ref": "network/ref-b:172.16.0.0%2F12/default",
                "network": "172.16.0.0/12",
                "network_view": "default",
                "comment": "",
                "extattrs": {}
            }
        ]),
    )
    .await;

    // Row 1: exact match with a changed comment → update.
    // Row 2: inside 172.16/12 → overlap skip.
    // Row 3: malformed → row error.
    // Row 4: fresh → create.
    let file = csv_file(
        "Network,Name,Owner\n\
         10.0.0.0/16,corp,netops\n\
         172.16.5.0/24,lab,netops\n\
         not-a-cidr,broken,netops\n\
         192.168.0.0/24,branch,netops\n",
    );
    let importer = importer_for(&server, ImportOptions::default()).await;
    let preview = importer
        .preview(file.path(), SourceKind::Properties)
        .await
        .unwrap();

    assert_eq!(preview.summary.updated, 1);
    assert_eq!(preview.summary.overlapping, 1);
    assert_eq!(preview.summary.errors, 1);
    assert_eq!(preview.summary.new, 1);
    assert_eq!(preview.summary.total, 4);

    assert_eq!(
        preview.preview.overlapping_networks[0].reason,
        "overlaps with 172.16.0.0/12"
    );
    assert_eq!(preview.preview.errors[0].row_index, 2);
    assert_eq!(preview.preview.errors[0].raw_value, "not-a-cidr");
}

#[tokio::test]
async fn preview_without_mapping_file_passes_tags_through() {
    let server = MockServer::start().await;
    mount_networks(&server, json!([])).await;

    let file = csv_file("Network,Name,Owner,Env\n10.0.0.0/24,a,netops,prod\n");
    let importer = importer_for(&server, ImportOptions::default()).await;
    let preview = importer
        .preview(file.path(), SourceKind::Properties)
        .await
        .unwrap();

    let item = &preview.preview.new_networks[0];
    assert_eq!(item.mapping.extended_attributes, item.network.tags);
}

#[tokio::test]
async fn preview_applies_mapping_document() {
    let server = MockServer::start().await;
    mount_networks(&server, json!([])).await;

    let mut mapping_file = tempfile::NamedTempFile::new().unwrap();
    mapping_file
        .write_all(
            br#"{
                "description": "uppercase the environment",
                "mappings": [
                    {"source_tag": "Env", "target_ea": "Environment", "transform": "uppercase"}
                ]
            }"#,
        )
        .unwrap();

    let file = csv_file("Network,Name,Env\n10.0.0.0/24,a,prod\n");
    let options = ImportOptions {
        mapping_file: Some(mapping_file.path().to_path_buf()),
        ..ImportOptions::default()
    };
    let importer = importer_for(&server, options).await;
    let preview = importer
        .preview(file.path(), SourceKind::Properties)
        .await
        .unwrap();

    let attrs = &preview.preview.new_networks[0].mapping.extended_attributes;
    assert_eq!(attrs.get("Environment").unwrap(), "PROD");
    assert!(!attrs.contains_key("Env"));
}

#[tokio::test]
async fn preview_respects_requested_view() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(wapi_path("network")))
        .and(query_param("network_view", "lab"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let file = csv_file("Network\n10.0.0.0/24\n");
    let options = ImportOptions {
        network_view: "lab".into(),
        ..ImportOptions::default()
    };
    let importer = importer_for(&server, options).await;
    let preview = importer
        .preview(file.path(), SourceKind::Properties)
        .await
        .unwrap();

    assert_eq!(preview.network_view, "lab");
    assert_eq!(preview.preview.new_networks[0].network.network_view, "lab");
}

// ── Execute ─────────────────────────────────────────────────────────

#[tokio::test]
async fn execute_creates_and_counts_failures_independently() {
    let server = MockServer::start().await;
    mount_networks(&server, json!([])).await;

    // EA definition probes: nothing exists, creation succeeds.
    Mock::given(method("GET"))
        .and(path(wapi_path("extensibleattributedef")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(wapi_path("extensibleattributedef")))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!("extensibleattributedef/x")))
        .mount(&server)
        .await;

    // First create succeeds, second conflicts.
    Mock::given(method("POST"))
        .and(path(wapi_path("network")))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!("network/ref-new")))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(wapi_path("network")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "Error": "AdmConDataError",
            "code": "Client.Ibap.Data.Conflict",
            "text": "The network exists."
        })))
        .mount(&server)
        .await;

    let file = csv_file("Network,Owner\n10.0.0.0/24,netops\n10.1.0.0/24,netops\n");
    let importer = importer_for(&server, ImportOptions::default()).await;
    let preview = importer
        .preview(file.path(), SourceKind::Properties)
        .await
        .unwrap();
    assert_eq!(preview.summary.new, 2);

    let mut events = Vec::new();
    let outcome = importer
        .execute(&preview, |event| events.push(event.clone()))
        .await
        .unwrap();

    assert_eq!(outcome.created, 1);
    assert_eq!(outcome.failed, 1);
    assert_eq!(outcome.updated, 0);
    assert_eq!(events.len(), 2);
}

#[tokio::test]
async fn execute_updates_by_reference() {
    let server = MockServer::start().await;
    mount_networks(
        &server,
        json!([{
            "_ref": "network/ref-a:10.0.0.0%2F16/default",
            "network": "10.0.0.0/16",
            "network_view": "default",
            "comment": "old",
            "extattrs": {}
        }]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path(wapi_path("extensibleattributedef")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_ref": "extensibleattributedef/x", "name": "any", "type": "STRING" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(wapi_path("network/ref-a:10.0.0.0%2F16/default")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("network/ref-a")))
        .mount(&server)
        .await;

    let file = csv_file("Network,Name,Owner\n10.0.0.0/16,corp,netops\n");
    let importer = importer_for(&server, ImportOptions::default()).await;
    let preview = importer
        .preview(file.path(), SourceKind::Properties)
        .await
        .unwrap();
    assert_eq!(preview.summary.updated, 1);

    let outcome = importer.execute(&preview, |_| {}).await.unwrap();
    assert_eq!(outcome.updated, 1);
    assert_eq!(outcome.failed, 0);
}

#[tokio::test]
async fn execute_skips_overlaps_and_unchanged() {
    let server = MockServer::start().await;
    mount_networks(
        &server,
        json!([{
            "_ref": "network/ref-a:10.0.0.0%2F16/default",
            "network": "10.0.0.0/16",
            "network_view": "default",
            "comment": "",
            "extattrs": {}
        }]),
    )
    .await;
    // No POST/PUT mocks mounted: any apply call would 404 and fail the
    // counts below.

    let file = csv_file("Network\n10.0.5.0/24\n");
    let importer = importer_for(&server, ImportOptions::default()).await;
    let preview = importer
        .preview(file.path(), SourceKind::Properties)
        .await
        .unwrap();
    assert_eq!(preview.summary.overlapping, 1);

    let outcome = importer.execute(&preview, |_| {}).await.unwrap();
    assert_eq!(outcome, gridsync_core::ApplyOutcome::default());
}
