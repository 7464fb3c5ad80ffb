use bgptriage::clients::alertmanager::quarantine_matchers;
use bgptriage::clients::loki::bgp_logql;
use bgptriage::clients::prometheus::BgpQueries;
use bgptriage::clients::{
    AlertmanagerClient, AuditSink, ClientError, IntentSource, Labels, LogSource, LokiClient,
    NautobotClient, PrometheusClient, SilenceSink, TelemetrySource,
};
use bgptriage::models::SessionKey;
use httpmock::prelude::*;
use serde_json::json;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

fn key() -> SessionKey {
    SessionKey::new("r1", "10.0.0.2")
}

fn vector(value: &str) -> serde_json::Value {
    json!({
        "status": "success",
        "data": {
            "resultType": "vector",
            "result": [{"metric": {"device": "r1"}, "value": [1700000000.0, value]}]
        }
    })
}

fn empty_vector() -> serde_json::Value {
    json!({"status": "success", "data": {"resultType": "vector", "result": []}})
}

// =============================================================================
// Prometheus
// =============================================================================

#[tokio::test]
async fn test_prometheus_snapshot() {
    let server = MockServer::start_async().await;
    let queries = BgpQueries::for_session(&key());

    let answers = [
        (&queries.admin_state, vector("1")),
        (&queries.oper_state, vector("4")),
        (&queries.received_routes, vector("12")),
        (&queries.sent_routes, vector("3")),
        (&queries.suppressed_routes, empty_vector()),
        (&queries.active_routes, vector("0")),
    ];

    let mut mocks = Vec::new();
    for (query, body) in answers {
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/query").query_param("query", query.as_str());
                then.status(200).json_body(body);
            })
            .await;
        mocks.push(mock);
    }

    // trailing slash is trimmed from the base URL
    let client = PrometheusClient::new(&format!("{}/", server.base_url()), TIMEOUT).unwrap();
    let snapshot = client.snapshot(&key()).await.unwrap();

    assert_eq!(snapshot.admin_state, Some(1.0));
    assert_eq!(snapshot.oper_state, Some(4.0));
    assert_eq!(snapshot.received_routes, 12);
    assert_eq!(snapshot.sent_routes, 3);
    assert_eq!(snapshot.suppressed_routes, 0);
    assert_eq!(snapshot.active_routes, 0);

    for mock in &mocks {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_prometheus_missing_series_are_absent() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/query");
            then.status(200).json_body(empty_vector());
        })
        .await;

    let client = PrometheusClient::new(&server.base_url(), TIMEOUT).unwrap();
    let snapshot = client.snapshot(&key()).await.unwrap();

    assert_eq!(snapshot.admin_state, None);
    assert_eq!(snapshot.oper_state, None);
    assert_eq!(snapshot.admin_code(), -1);
    assert_eq!(snapshot.received_routes, 0);
}

#[tokio::test]
async fn test_prometheus_error_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/query");
            then.status(503);
        })
        .await;

    let client = PrometheusClient::new(&server.base_url(), TIMEOUT).unwrap();
    let err = client.instant("up").await.unwrap_err();
    assert!(matches!(err, ClientError::Status { service: "prometheus", .. }));
}

// =============================================================================
// Loki
// =============================================================================

#[tokio::test]
async fn test_loki_logs_flatten_and_limit() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/loki/api/v1/query_range")
                .query_param("query", bgp_logql("r1", "10.0.0.2"))
                .query_param("direction", "BACKWARD")
                .query_param("limit", "3")
                .query_param_exists("start")
                .query_param_exists("end");
            then.status(200).json_body(json!({
                "status": "success",
                "data": {"resultType": "streams", "result": [
                    {"stream": {"device": "r1"}, "values": [["3", "c"], ["2", "b"]]},
                    {"stream": {"device": "r1"}, "values": [["1", "a"], ["0", "z"]]}
                ]}
            }));
        })
        .await;

    let client = LokiClient::new(&server.base_url(), TIMEOUT).unwrap();
    let lines = client.logs("r1", "10.0.0.2", 30, 3).await.unwrap();

    assert_eq!(lines, vec!["c", "b", "a"]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_loki_annotate_pushes_stream() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/loki/api/v1/push")
                .body_contains("\"decision\":\"proceed\"")
                .body_contains("mismatch between intent and reality");
            then.status(204);
        })
        .await;

    let client = LokiClient::new(&server.base_url(), TIMEOUT).unwrap();
    let labels = Labels::from([
        ("source".to_string(), "bgptriage".to_string()),
        ("decision".to_string(), "proceed".to_string()),
    ]);
    client
        .annotate(&labels, "mismatch between intent and reality")
        .await
        .unwrap();

    mock.assert_async().await;
}

// =============================================================================
// Alertmanager
// =============================================================================

#[tokio::test]
async fn test_alertmanager_create_silence() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v2/silences")
                .body_contains("\"createdBy\":\"bgptriage\"")
                .body_contains("\"isRegex\":false")
                .body_contains("\"value\":\"BgpSessionNotUp\"")
                .body_contains("\"startsAt\"");
            then.status(200).json_body(json!({"silenceID": "abc-123"}));
        })
        .await;

    let client = AlertmanagerClient::new(&server.base_url(), TIMEOUT).unwrap();
    let id = client.create_suppression("r1", "10.0.0.2", 20).await.unwrap();

    assert_eq!(id, "abc-123");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_alertmanager_missing_id_is_empty() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v2/silences");
            then.status(200).json_body(json!({}));
        })
        .await;

    let client = AlertmanagerClient::new(&server.base_url(), TIMEOUT)
        .unwrap()
        .with_author("oncall", "testing");
    let id = client
        .create_silence(&quarantine_matchers("r1", "10.0.0.2"), 5)
        .await
        .unwrap();
    assert_eq!(id, "");
}

// =============================================================================
// Nautobot
// =============================================================================

#[tokio::test]
async fn test_nautobot_intent_record() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/dcim/devices/")
                .query_param("name", "r1")
                .header("authorization", "Token secret");
            then.status(200).json_body(json!({
                "count": 1,
                "results": [{
                    "name": "r1",
                    "site": {"name": "lab-1"},
                    "device_role": {"name": "edge"},
                    "_custom_field_data": {"maintenance": false},
                    "local_config_context_data": {"observability_intent": {"bgp": {
                        "afi_safi": "ipv4-unicast",
                        "intended_peers": [{"peer_ip": "10.0.0.2", "expected_state": "established"}]
                    }}}
                }]
            }));
        })
        .await;

    let client = NautobotClient::new(&server.base_url(), Some("secret".to_string()), TIMEOUT).unwrap();
    let record = client.intent_record(&key()).await.unwrap();

    assert!(record.found);
    assert!(!record.maintenance);
    assert!(record.intended_peer);
    assert_eq!(record.expected_state.as_deref(), Some("established"));
    assert_eq!(record.site.as_deref(), Some("lab-1"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_nautobot_unknown_device() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/dcim/devices/");
            then.status(200).json_body(json!({"count": 0, "results": []}));
        })
        .await;

    let client = NautobotClient::new(&server.base_url(), Some("secret".to_string()), TIMEOUT).unwrap();
    let record = client.intent_record(&key()).await.unwrap();

    assert!(!record.found);
    assert_eq!(record.reason.as_deref(), Some("device not found in Nautobot"));
}

#[tokio::test]
async fn test_nautobot_missing_token() {
    let client = NautobotClient::new("http://127.0.0.1:9", None, TIMEOUT).unwrap();
    let err = client.intent_record(&key()).await.unwrap_err();
    assert!(matches!(err, ClientError::MissingToken("nautobot")));
}
