//! End-to-end test: extract a SQLite document and share it over HTTP.
//!
//! The mock server only answers requests whose bodies match byte for byte,
//! so this pins the exact wire format of both share calls.

#![cfg(feature = "sqlite")]
#![allow(clippy::unwrap_used)]
#![allow(clippy::uninlined_format_args)]

use schemaviz_core::{Dialect, ShareConfig, extract::ExtractOptions, extract, share};
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_string, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DEV_URL: &str = "sqlite3://file?mode=memory&cache=shared&_fk=1";

const VISUALIZE_BODY: &str = r##"{"query":"mutation VisualizeMutation($text: String!, $driver: Driver!) {\n  visualize(input: { text: $text, type: HCL, driver: $driver }) {\n    node {\n      extID\n    }\n  }\n}\n","variables":{"driver":"SQLITE","text":"table \"users\" {\n  schema = schema.main\n  column \"id\" {\n    null           = false\n    type           = integer\n    auto_increment = true\n  }\n  column \"name\" {\n    null = false\n    type = text\n  }\n  primary_key {\n    columns = [column.id]\n  }\n}\nschema \"main\" {\n}\n"}}"##;

const SHARE_BODY: &str = r##"{"query":"mutation ShareVisualizationMutation($extID: String!) {\n  shareVisualization(input: { fromID: $extID }) {\n    success\n  }\n}\n","variables":{"extID":"23098224"}}"##;

fn users() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("testdata")
        .join("users")
}

#[tokio::test]
async fn test_extract_then_share_users() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/query"))
        .and(body_string(VISUALIZE_BODY))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"data":{"visualize":{"node":{"extID":"23098224"}}}}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/query"))
        .and(body_string(SHARE_BODY))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"data":{"shareVisualization":{"success":true}}}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    let options = ExtractOptions::new(users(), Dialect::SQLite, DEV_URL);
    let document = extract(&options, &cancel).await.unwrap();

    let config = ShareConfig::default()
        .with_endpoint(format!("{}/api/query", server.uri()))
        .with_timeout(Duration::from_secs(5));
    let link = share(&document, Dialect::SQLite.driver_tag(), &config, &cancel)
        .await
        .unwrap();

    assert_eq!(link, format!("{}/explore/23098224", server.uri()));
}
