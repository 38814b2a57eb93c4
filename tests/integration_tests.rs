//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: config → paged HTTP requests → strict
//! decoding → records (complete or partial)

use serde_json::{json, Value};
use skope_client::cli::{write_records, OutputFormat};
use skope_client::pagination::StatusPolicy;
use skope_client::{ClientConfig, EndpointRecord, Error, Protocol, SkopeClient};
use std::fs;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Fixtures
// ============================================================================

fn endpoint_attributes(n: usize) -> Value {
    json!({
        "_id": format!("ep-{n}"),
        "device_id": format!("DEV-{n:04}"),
        "client_install_time": 1_690_000_000 + n,
        "client_version": "95.0.0.900",
        "host_info": {
            "device_make": "Dell Inc.",
            "device_model": "Latitude 7420",
            "hostname": format!("wks-{n}"),
            "managementID": "",
            "os": "Windows",
            "os_version": "10.0.19045",
            "nsdeviceuid": format!("uid-{n}")
        },
        "last_event": {
            "actor": "System",
            "event": "Tunnel Up",
            "npa_status": "Steering Disabled",
            "status": "Enabled",
            "timestamp": 1_700_000_000 + n
        },
        "users": [{
            "_id": format!("user-{n}"),
            "device_classification_status": "managed",
            "organization_unit": "",
            "user_added_time": 1_650_000_000,
            "user_groups": ["eng", "vpn"],
            "user_source": "Manual",
            "userkey": format!("key-{n}"),
            "username": format!("user{n}@example.com"),
            "last_event": {
                "actor": "Admin",
                "event": "Installed",
                "npa_status": "",
                "status": "Enabled",
                "timestamp": 1_650_000_100
            }
        }]
    })
}

fn page_body(range: std::ops::Range<usize>) -> Value {
    let data: Vec<_> = range
        .map(|n| json!({ "attributes": endpoint_attributes(n) }))
        .collect();
    json!({ "success": "success", "msg": "", "data": data })
}

async fn mount_page(server: &MockServer, skip: u64, body: Value) {
    Mock::given(method("GET"))
        .and(path("/api/v1/clients"))
        .and(query_param("token", "it-token"))
        .and(query_param("skip", skip.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

fn config_for(server: &MockServer, page_size: u32) -> ClientConfig {
    let addr = server.address();
    ClientConfig {
        token: Some("it-token".to_string()),
        tenant_name: Some("acme".to_string()),
        host: Some(addr.ip().to_string()),
        port: Some(addr.port()),
        protocol: Some(Protocol::Http),
        page_size: Some(page_size),
        ..Default::default()
    }
}

fn ids(records: &[EndpointRecord]) -> Vec<String> {
    records.iter().filter_map(|r| r.id.clone()).collect()
}

// ============================================================================
// Pagination Flow
// ============================================================================

#[tokio::test]
async fn test_fetch_all_pages() {
    let server = MockServer::start().await;
    mount_page(&server, 0, page_body(0..3)).await;
    mount_page(&server, 3, page_body(3..6)).await;
    mount_page(&server, 6, page_body(6..7)).await;

    let client = SkopeClient::from_config(&config_for(&server, 3)).unwrap();
    let result = client.get_client_endpoints(None).await;

    assert!(result.is_complete(), "unexpected error: {:?}", result.error);
    assert_eq!(
        ids(&result.records),
        vec!["ep-0", "ep-1", "ep-2", "ep-3", "ep-4", "ep-5", "ep-6"]
    );

    let first = &result.records[0];
    assert_eq!(first.users[0].groups, vec!["eng", "vpn"]);
    assert_eq!(
        first.users[0].last_event.as_ref().unwrap().name.as_deref(),
        Some("Installed")
    );
    assert_eq!(
        first.last_event.as_ref().unwrap().name.as_deref(),
        Some("Tunnel Up")
    );
    assert_eq!(
        first.host_info.as_ref().unwrap().device_uid.as_deref(),
        Some("uid-0")
    );
}

#[tokio::test]
async fn test_exact_multiple_ends_on_empty_page() {
    let server = MockServer::start().await;
    mount_page(&server, 0, page_body(0..2)).await;
    mount_page(&server, 2, page_body(2..4)).await;
    mount_page(&server, 4, page_body(0..0)).await;

    let client = SkopeClient::from_config(&config_for(&server, 2)).unwrap();
    let result = client.get_client_endpoints(None).await;

    assert!(result.is_complete());
    assert_eq!(result.len(), 4);
}

#[tokio::test]
async fn test_page_size_argument_overrides_config() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/clients"))
        .and(query_param("limit", "5"))
        .and(query_param("skip", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(0..1)))
        .expect(1)
        .mount(&server)
        .await;

    let client = SkopeClient::from_config(&config_for(&server, 1000)).unwrap();
    let result = client.get_client_endpoints(Some(5)).await;

    assert!(result.is_complete());
    assert_eq!(result.len(), 1);
}

// ============================================================================
// Failure Handling
// ============================================================================

#[tokio::test]
async fn test_unknown_attribute_returns_partial_records() {
    let server = MockServer::start().await;
    mount_page(&server, 0, page_body(0..2)).await;

    let mut bad = endpoint_attributes(2);
    bad["host_info"]["cpu_arch"] = json!("arm64");
    mount_page(
        &server,
        2,
        json!({
            "success": "success",
            "data": [
                { "attributes": endpoint_attributes(2) },
                { "attributes": bad }
            ]
        }),
    )
    .await;

    let client = SkopeClient::from_config(&config_for(&server, 2)).unwrap();
    let (records, error) = client.get_client_endpoints(None).await.into_parts();

    assert_eq!(ids(&records), vec!["ep-0", "ep-1"]);
    let error = error.unwrap();
    assert!(error.is_schema_error());
    let message = error.to_string();
    assert!(message.contains("data[1]"), "{message}");
    assert!(
        matches!(error.root_cause(), Error::UnsupportedAttribute { key, .. } if key == "cpu_arch")
    );
}

#[tokio::test]
async fn test_http_failure_mid_run() {
    let server = MockServer::start().await;
    mount_page(&server, 0, page_body(0..2)).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/clients"))
        .and(query_param("skip", "2"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .expect(1)
        .mount(&server)
        .await;

    let client = SkopeClient::from_config(&config_for(&server, 2)).unwrap();
    let result = client.get_client_endpoints(None).await;

    assert_eq!(result.len(), 2);
    match result.error {
        Some(Error::HttpStatus { status, body }) => {
            assert_eq!(status, 429);
            assert_eq!(body, "rate limited");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = SkopeClient::from_config(&config_for(&server, 10)).unwrap();
    let result = client.get_client_endpoints(None).await;

    assert!(result.is_empty());
    assert!(matches!(result.error, Some(Error::Decode { .. })));
}

#[tokio::test]
async fn test_require_success_and_max_pages() {
    let server = MockServer::start().await;
    mount_page(&server, 0, page_body(0..2)).await;
    mount_page(&server, 2, page_body(2..4)).await;

    let mut config = config_for(&server, 2);
    config.max_pages = Some(2);
    config.require_success = Some(true);

    let client = SkopeClient::from_config(&config).unwrap();
    assert_eq!(
        client.pagination().status_policy,
        StatusPolicy::RequireSuccess
    );

    let result = client.get_client_endpoints(None).await;
    assert_eq!(result.len(), 4);
    assert!(matches!(
        result.error,
        Some(Error::MaxPagesExceeded { max_pages: 2 })
    ));
}

// ============================================================================
// Config File and Output
// ============================================================================

#[tokio::test]
async fn test_config_file_to_json_lines() {
    let server = MockServer::start().await;
    mount_page(&server, 0, page_body(0..2)).await;

    let addr = server.address();
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("skopecli.yaml");
    fs::write(
        &config_path,
        format!(
            "token: it-token\ntenant_name: acme\nhost: {}\nport: {}\nprotocol: http\npage_size: 10\n",
            addr.ip(),
            addr.port()
        ),
    )
    .unwrap();

    let config = ClientConfig::from_file(&config_path).unwrap();
    config.validate().unwrap();
    let client = SkopeClient::from_config(&config).unwrap();
    let records = client
        .get_client_endpoints(None)
        .await
        .into_result()
        .unwrap();

    let mut out = Vec::new();
    write_records(&mut out, &records, OutputFormat::Json).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 2);

    // Every printed line decodes back to the same record
    for (line, record) in lines.iter().zip(&records) {
        let value: Value = serde_json::from_str(line).unwrap();
        let decoded = EndpointRecord::from_value(&json!({ "attributes": value })).unwrap();
        assert_eq!(&decoded, record);
    }
}
