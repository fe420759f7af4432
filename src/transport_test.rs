use super::*;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::post;
use serde_json::json;

// =========================================================================
// Test server
// =========================================================================

#[derive(Debug, Clone)]
struct Captured {
    authorization: Option<String>,
    content_type: Option<String>,
    body: Value,
}

type Seen = Arc<Mutex<Vec<Captured>>>;

async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/api_jsonrpc.php")
}

async fn echo_handler(State(seen): State<Seen>, headers: HeaderMap, body: String) -> impl IntoResponse {
    let body: Value = serde_json::from_str(&body).unwrap();
    let header_str = |name: header::HeaderName| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_owned);
    seen.lock().unwrap().push(Captured {
        authorization: header_str(header::AUTHORIZATION),
        content_type: header_str(header::CONTENT_TYPE),
        body: body.clone(),
    });
    axum::Json(json!({ "jsonrpc": "2.0", "result": { "echo": body["method"] }, "id": body["id"] }))
}

async fn echo_server() -> (String, Seen) {
    let seen: Seen = Arc::default();
    let router = Router::new()
        .route("/api_jsonrpc.php", post(echo_handler))
        .with_state(seen.clone());
    (spawn_server(router).await, seen)
}

fn transport(url: &str, credential: Credential, timeout: Duration) -> HttpTransport {
    HttpTransport::new(TransportConfig {
        url: url.to_owned(),
        credential,
        timeout,
        connect_timeout: Duration::from_secs(2),
        verify_tls: true,
    })
    .unwrap()
}

// =========================================================================
// Envelope and headers
// =========================================================================

#[tokio::test]
async fn send_posts_jsonrpc_envelope_with_bearer() {
    let (url, seen) = echo_server().await;
    let t = transport(&url, Credential::Token("tok-123".into()), Duration::from_secs(5));

    let response = t
        .send("host.get", crate::params!({ "hostid": "10105" }), false)
        .await
        .unwrap();
    assert_eq!(response, json!({ "jsonrpc": "2.0", "result": { "echo": "host.get" }, "id": 1 }));

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].authorization.as_deref(), Some("Bearer tok-123"));
    assert_eq!(seen[0].content_type.as_deref(), Some("application/json"));
    assert_eq!(
        seen[0].body,
        json!({ "jsonrpc": "2.0", "method": "host.get", "params": { "hostid": "10105" }, "id": 1 })
    );
}

#[tokio::test]
async fn skip_auth_omits_authorization_header() {
    let (url, seen) = echo_server().await;
    let t = transport(&url, Credential::Token("tok-123".into()), Duration::from_secs(5));

    t.send("apiinfo.version", Params::new(), true).await.unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].authorization, None);
    assert_eq!(seen[0].body["params"], json!({}));
}

#[tokio::test]
async fn session_credential_is_sent_as_bearer() {
    let (url, seen) = echo_server().await;
    let t = transport(&url, Credential::Session("sess-9".into()), Duration::from_secs(5));

    t.send("user.get", Params::new(), false).await.unwrap();

    assert_eq!(seen.lock().unwrap()[0].authorization.as_deref(), Some("Bearer sess-9"));
}

#[tokio::test]
async fn no_credential_sends_no_authorization() {
    let (url, seen) = echo_server().await;
    let t = transport(&url, Credential::None, Duration::from_secs(5));

    t.send("user.login", crate::params!({ "username": "Admin" }), false)
        .await
        .unwrap();

    assert_eq!(seen.lock().unwrap()[0].authorization, None);
}

#[tokio::test]
async fn remote_error_payload_is_returned_unchanged() {
    let payload = json!({
        "jsonrpc": "2.0",
        "error": { "code": -32500, "message": "Application error.", "data": "No permissions." },
        "id": 1
    });
    let body = payload.clone();
    let router = Router::new().route("/api_jsonrpc.php", post(move || async move { axum::Json(body) }));
    let url = spawn_server(router).await;
    let t = transport(&url, Credential::Token("t".into()), Duration::from_secs(5));

    let response = t.send("host.delete", Params::new(), false).await.unwrap();
    assert_eq!(response, payload);
}

// =========================================================================
// Failures
// =========================================================================

#[tokio::test]
async fn empty_method_is_rejected_before_io() {
    let t = transport("http://127.0.0.1:9/api_jsonrpc.php", Credential::None, Duration::from_secs(1));
    let err = t.send("", Params::new(), false).await.unwrap_err();
    assert!(matches!(err, ZabbixError::EmptyMethod));
}

#[tokio::test]
async fn non_json_body_is_parse_error() {
    let router = Router::new().route("/api_jsonrpc.php", post(|| async { "<html>maintenance</html>" }));
    let url = spawn_server(router).await;
    let t = transport(&url, Credential::None, Duration::from_secs(5));

    let err = t.send("host.get", Params::new(), false).await.unwrap_err();
    assert!(matches!(err, ZabbixError::ApiParse(_)));
}

#[tokio::test]
async fn non_success_status_is_http_status_error() {
    let router = Router::new().route(
        "/api_jsonrpc.php",
        post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
    );
    let url = spawn_server(router).await;
    let t = transport(&url, Credential::None, Duration::from_secs(5));

    let err = t.send("host.get", Params::new(), false).await.unwrap_err();
    assert!(matches!(&err, ZabbixError::HttpStatus { status: 502, body } if body == "upstream down"));
}

#[tokio::test]
async fn slow_server_times_out_without_retry() {
    let hits: Arc<Mutex<u32>> = Arc::default();
    let counter = hits.clone();
    let router = Router::new().route(
        "/api_jsonrpc.php",
        post(move || {
            let counter = counter.clone();
            async move {
                *counter.lock().unwrap() += 1;
                tokio::time::sleep(Duration::from_secs(3)).await;
                axum::Json(json!({ "jsonrpc": "2.0", "result": [], "id": 1 }))
            }
        }),
    );
    let url = spawn_server(router).await;
    let t = transport(&url, Credential::None, Duration::from_millis(200));

    let err = t.send("host.get", Params::new(), false).await.unwrap_err();
    assert!(matches!(err, ZabbixError::Timeout { .. }));
    assert_eq!(*hits.lock().unwrap(), 1);
}

#[tokio::test]
async fn timeout_error_names_the_elapsed_limit() {
    let t = transport("http://127.0.0.1:9/api_jsonrpc.php", Credential::None, Duration::from_secs(5));

    let err = t.timeout_error(true);
    assert!(matches!(err, ZabbixError::Timeout { secs } if (secs - 2.0).abs() < f64::EPSILON));
    assert_eq!(err.to_string(), "API request timed out after 2.0s");

    let err = t.timeout_error(false);
    assert!(matches!(err, ZabbixError::Timeout { secs } if (secs - 5.0).abs() < f64::EPSILON));
}

#[tokio::test]
async fn refused_connection_is_request_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let url = format!("http://127.0.0.1:{port}/api_jsonrpc.php");
    let t = transport(&url, Credential::None, Duration::from_secs(2));

    let err = t.send("host.get", Params::new(), false).await.unwrap_err();
    assert!(matches!(err, ZabbixError::Request(_)));
}

#[tokio::test]
async fn debug_output_redacts_credentials() {
    let t = transport("http://127.0.0.1:9/api_jsonrpc.php", Credential::Token("s3cr3t".into()), Duration::from_secs(1));
    let rendered = format!("{t:?}");
    assert!(!rendered.contains("s3cr3t"));
    assert!(rendered.contains("Token(<redacted>)"));
}
