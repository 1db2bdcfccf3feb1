use apiprobe_config::ScannerSettings;
use apiprobe_scan::{Risk, ScanError, SecurityScan, ZapClient};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TARGET: &str = "https://reqres.in/api";

fn settings(report_dir: &std::path::Path) -> ScannerSettings {
    ScannerSettings {
        poll_interval: Duration::from_millis(10),
        max_polls: 5,
        report_path: report_dir.join("zap_api_report.html").display().to_string(),
        seed_paths: vec!["/users".to_string(), "/users/2".to_string()],
        ..ScannerSettings::default()
    }
}

async fn mount_json(server: &MockServer, endpoint: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn zap_up(server: &MockServer) {
    mount_json(server, "/JSON/core/view/version/", json!({"version": "2.14.0"})).await;
    Mock::given(method("GET"))
        .and(path("/JSON/core/action/accessUrl/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"accessUrl": []})))
        .expect(2)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_scan_writes_report_and_summarises_alerts() {
    let server = MockServer::start().await;
    zap_up(&server).await;

    Mock::given(method("GET"))
        .and(path("/JSON/ascan/action/scan/"))
        .and(query_param("url", TARGET))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"scan": "7"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/JSON/ascan/view/status/"))
        .and(query_param("scanId", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "40"})))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    mount_json(&server, "/JSON/ascan/view/status/", json!({"status": "100"})).await;
    mount_json(
        &server,
        "/JSON/core/view/alerts/",
        json!({"alerts": [
            {"alert": "Content Security Policy (CSP) Header Not Set", "risk": "Medium",
             "url": "https://reqres.in/api/users", "solution": "Set the header", "pluginId": "10038"},
            {"alert": "Strict-Transport-Security Header Not Set", "risk": "Low",
             "url": "https://reqres.in/api/users/2", "solution": "Enable HSTS"}
        ]}),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/OTHER/core/other/htmlreport/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>report</html>"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let scan = SecurityScan::new(ZapClient::new(server.uri()).unwrap(), TARGET, settings(dir.path()));

    let outcome = scan.run().await.unwrap();
    assert_eq!(outcome.scan_id, "7");
    assert_eq!(outcome.alerts.total(), 2);
    assert!(!outcome.alerts.has_high_risk());
    assert_eq!(outcome.alerts.with_risk(Risk::Medium).len(), 1);
    assert_eq!(
        std::fs::read_to_string(&outcome.report_path).unwrap(),
        "<html>report</html>"
    );
}

#[tokio::test]
async fn test_scanner_down_is_unavailable() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let dir = tempfile::tempdir().unwrap();
    let scan = SecurityScan::new(
        ZapClient::new(format!("http://{}", addr)).unwrap(),
        TARGET,
        settings(dir.path()),
    );
    assert!(matches!(scan.run().await, Err(ScanError::Unavailable { .. })));
}

#[tokio::test]
async fn test_unknown_target_does_not_start() {
    let server = MockServer::start().await;
    zap_up(&server).await;
    Mock::given(method("GET"))
        .and(path("/JSON/ascan/action/scan/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": "does_not_exist",
            "message": "Does Not Exist"
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let scan = SecurityScan::new(ZapClient::new(server.uri()).unwrap(), TARGET, settings(dir.path()));
    assert!(matches!(scan.run().await, Err(ScanError::ScanNotStarted { .. })));
}

#[tokio::test]
async fn test_scan_that_never_finishes_times_out() {
    let server = MockServer::start().await;
    zap_up(&server).await;
    mount_json(&server, "/JSON/ascan/action/scan/", json!({"scan": "0"})).await;
    mount_json(&server, "/JSON/ascan/view/status/", json!({"status": "12"})).await;

    let dir = tempfile::tempdir().unwrap();
    let scan = SecurityScan::new(ZapClient::new(server.uri()).unwrap(), TARGET, settings(dir.path()));

    match scan.run().await {
        Err(ScanError::Timeout { polls, progress }) => {
            assert_eq!(polls, 5);
            assert_eq!(progress, 12);
        }
        other => panic!("expected timeout, got {:?}", other),
    }
}

#[tokio::test]
async fn test_api_key_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/JSON/core/view/version/"))
        .and(query_param("apikey", "s3cr3t"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"version": "2.15.0"})))
        .mount(&server)
        .await;

    let client = ZapClient::new(server.uri()).unwrap().with_api_key("s3cr3t");
    assert_eq!(client.version().await.unwrap(), "2.15.0");
}
