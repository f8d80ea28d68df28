//! End-to-end batch rename: CSV file in, Dashboard updates out.
//!
//! Drives the real source parser and batch applier against a mock
//! Dashboard server and checks the exact payloads on the wire.

use portsync_batch::{read_rows, BatchApplier, BatchOptions, RowStatus, Verbosity};
use portsync_core::config::DashboardConfig;
use portsync_dashboard::DashboardClient;
use std::io::Write;
use std::path::PathBuf;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_source(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "portsync-e2e-{}-{name}.csv",
        std::process::id()
    ));
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

async fn client_for(server: &MockServer) -> DashboardClient {
    let config = DashboardConfig::new("test-key", "987654")
        .unwrap()
        .with_base_url(server.uri())
        .unwrap()
        .with_max_retries(0);
    DashboardClient::from_config(&config).unwrap()
}

fn quiet() -> BatchOptions {
    BatchOptions {
        verbosity: Verbosity::Quiet,
        run_deadline: None,
    }
}

#[tokio::test]
async fn two_row_file_renames_both_ports() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/devices/Q2XX-0000-0001/switchPorts/1"))
        .and(header("X-Cisco-Meraki-API-Key", "test-key"))
        .and(body_json(serde_json::json!({"name": "Uplink-A"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"number": 1, "name": "Uplink-A"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/devices/Q2XX-0000-0001/switchPorts/2"))
        .and(body_json(serde_json::json!({"name": "Desk-12"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"number": 2, "name": "Desk-12"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let source = write_source(
        "two-rows",
        "PortNumber,PortName,Switch SerialNumber\n\
         1,Uplink-A,Q2XX-0000-0001\n\
         2,Desk-12,Q2XX-0000-0001\n",
    );
    let rows = read_rows(&source).unwrap();
    let client = client_for(&server).await;

    let report = BatchApplier::new(client, quiet()).run(rows).await;

    assert_eq!(report.len(), 2);
    assert!(report.all_applied());
    assert_eq!(report.to_string(), "2 applied, 0 failed of 2 rows");
    server.verify().await;
}

#[tokio::test]
async fn remote_failure_on_one_row_leaves_the_rest_applied() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/devices/Q2XX-0000-0001/switchPorts/1"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such port"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/devices/Q2XX-0000-0001/switchPorts/2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"number": 2, "name": "Desk-12"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let source = write_source(
        "one-bad-port",
        "PortNumber,PortName,Switch SerialNumber\n\
         1,Uplink-A,Q2XX-0000-0001\n\
         2,Desk-12,Q2XX-0000-0001\n",
    );
    let rows = read_rows(&source).unwrap();
    let client = client_for(&server).await;

    let report = BatchApplier::new(client, quiet()).run(rows).await;

    assert_eq!(report.outcomes()[0].status, RowStatus::RemoteError);
    assert!(report.outcomes()[0]
        .detail
        .as_deref()
        .unwrap()
        .contains("no such port"));
    assert_eq!(report.outcomes()[1].status, RowStatus::Applied);
    server.verify().await;
}

#[tokio::test]
async fn malformed_row_never_reaches_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/devices/Q2XX-0000-0001/switchPorts/2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"number": 2, "name": "Desk-12"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let source = write_source(
        "malformed",
        "PortNumber,PortName,Switch SerialNumber\n\
         1,MissingSerial\n\
         2,Desk-12,Q2XX-0000-0001\n",
    );
    let rows = read_rows(&source).unwrap();
    let client = client_for(&server).await;

    let report = BatchApplier::new(client, quiet()).run(rows).await;

    assert_eq!(report.outcomes()[0].status, RowStatus::MalformedRow);
    assert_eq!(report.outcomes()[1].status, RowStatus::Applied);
    // Only the well-formed row produced a request.
    server.verify().await;
}

#[tokio::test]
async fn name_with_quotes_survives_serialization() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/devices/Q2XX-0000-0001/switchPorts/1"))
        .and(body_json(
            serde_json::json!({"name": "Bob's \"lab\" port"}),
        ))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"number": 1, "name": "Bob's \"lab\" port"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let source = write_source(
        "quoted-name",
        "PortNumber,PortName,Switch SerialNumber\n\
         1,\"Bob's \"\"lab\"\" port\",Q2XX-0000-0001\n",
    );
    let rows = read_rows(&source).unwrap();
    let client = client_for(&server).await;

    let report = BatchApplier::new(client, quiet()).run(rows).await;

    assert!(report.all_applied());
    server.verify().await;
}
