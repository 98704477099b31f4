use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use codelens_client::{
    AnalysisClient, AnalyzeResult, ClientError, ClientOptions, DEFAULT_UPLOAD_MESSAGE,
    NO_RESPONSE_MESSAGE,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
struct UploadedPart {
    field: String,
    file_name: Option<String>,
    bytes: Vec<u8>,
}

#[derive(Clone, Default)]
struct ServiceState {
    uploads: Arc<Mutex<Vec<UploadedPart>>>,
    queries: Arc<Mutex<Vec<Value>>>,
    upload_reply: Arc<Mutex<Option<(StatusCode, String)>>>,
    analyze_reply: Arc<Mutex<Option<(StatusCode, String)>>>,
}

impl ServiceState {
    async fn set_upload_reply(&self, status: StatusCode, body: &str) {
        *self.upload_reply.lock().await = Some((status, body.to_string()));
    }

    async fn set_analyze_reply(&self, status: StatusCode, body: &str) {
        *self.analyze_reply.lock().await = Some((status, body.to_string()));
    }
}

fn raw_reply(reply: Option<(StatusCode, String)>) -> axum::response::Response {
    let (status, body) = reply.unwrap_or((StatusCode::OK, "{}".to_string()));
    (
        status,
        [(axum::http::header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}

async fn handle_upload(
    State(state): State<ServiceState>,
    mut multipart: Multipart,
) -> axum::response::Response {
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        state.uploads.lock().await.push(UploadedPart {
            field: name,
            file_name,
            bytes,
        });
    }
    raw_reply(state.upload_reply.lock().await.clone())
}

async fn handle_analyze(
    State(state): State<ServiceState>,
    Json(payload): Json<Value>,
) -> axum::response::Response {
    state.queries.lock().await.push(payload);
    raw_reply(state.analyze_reply.lock().await.clone())
}

async fn handle_list_chunks(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let limit: usize = params
        .get("limit")
        .and_then(|l| l.parse().ok())
        .unwrap_or(10);
    let chunks: Vec<Value> = (0..limit.min(2))
        .map(|i| json!({ "file": "app/main.py", "chunk_id": i, "snippet": "def main():" }))
        .collect();
    Json(json!({ "total_chunks": 42, "chunks": chunks }))
}

async fn handle_root() -> Json<Value> {
    Json(json!({ "message": "Welcome to the Code Analysis AI Agent" }))
}

async fn spawn_service() -> (String, ServiceState) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let state = ServiceState::default();
    let app = Router::new()
        .route("/", get(handle_root))
        .route("/upload/", post(handle_upload))
        .route("/analyze/query", post(handle_analyze))
        .route("/analyze/list_chunks", get(handle_list_chunks))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), state)
}

async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}

fn client(base_url: &str, top_k: Option<u32>) -> AnalysisClient {
    AnalysisClient::new(&ClientOptions {
        base_url: base_url.to_string(),
        top_k,
        ..ClientOptions::default()
    })
    .expect("client")
}

#[tokio::test]
async fn upload_sends_file_under_file_field() {
    let (base_url, state) = spawn_service().await;
    state
        .set_upload_reply(StatusCode::OK, r#"{"message": "Stored project.zip"}"#)
        .await;

    let mut file = tempfile::Builder::new()
        .suffix(".zip")
        .tempfile()
        .expect("temp file");
    file.write_all(b"PK\x03\x04 fake zip").expect("write");

    let receipt = client(&base_url, None)
        .upload_file(file.path())
        .await
        .expect("upload");

    assert_eq!(receipt.message, "Stored project.zip");
    let uploads = state.uploads.lock().await;
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].field, "file");
    assert_eq!(
        uploads[0].file_name.as_deref(),
        file.path().file_name().and_then(|n| n.to_str())
    );
    assert_eq!(uploads[0].bytes, b"PK\x03\x04 fake zip");
}

#[tokio::test]
async fn upload_without_message_uses_default() {
    let (base_url, state) = spawn_service().await;
    state
        .set_upload_reply(StatusCode::OK, r#"{"extract_path": "temp/project"}"#)
        .await;

    let receipt = client(&base_url, None)
        .upload_bytes("project.zip".to_string(), b"zip".to_vec())
        .await
        .expect("upload");

    assert_eq!(receipt.message, DEFAULT_UPLOAD_MESSAGE);
    assert_eq!(receipt.extract_path.as_deref(), Some("temp/project"));
}

#[tokio::test]
async fn upload_error_status_is_reported() {
    let (base_url, state) = spawn_service().await;
    state
        .set_upload_reply(StatusCode::INTERNAL_SERVER_ERROR, r#"{"detail": "boom"}"#)
        .await;

    let err = client(&base_url, None)
        .upload_bytes("project.zip".to_string(), b"zip".to_vec())
        .await
        .expect_err("server error");

    match &err {
        ClientError::Status { status, .. } => assert_eq!(status.as_u16(), 500),
        other => panic!("expected status error, got {other:?}"),
    }
    assert_eq!(err.user_message(), "Error uploading file.");
}

#[tokio::test]
async fn upload_to_unreachable_service_is_network_error() {
    let base_url = unreachable_base_url().await;

    let err = client(&base_url, None)
        .upload_bytes("project.zip".to_string(), b"zip".to_vec())
        .await
        .expect_err("connection refused");

    assert!(matches!(
        err,
        ClientError::Network {
            endpoint: "upload/",
            ..
        }
    ));
    assert!(err.is_transient());
    assert_eq!(err.user_message(), "Error uploading file.");
}

#[tokio::test]
async fn analyze_against_unreachable_service_reports_server_error() {
    let base_url = unreachable_base_url().await;

    let err = client(&base_url, None)
        .analyze("anything")
        .await
        .expect_err("connection refused");

    assert!(matches!(
        err,
        ClientError::Network {
            endpoint: "analyze/query",
            ..
        }
    ));
    assert_eq!(err.user_message(), "Error contacting server.");
}

#[tokio::test]
async fn upload_of_missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("nope.zip");

    let err = client("http://127.0.0.1:9", None)
        .upload_file(&missing)
        .await
        .expect_err("missing file");

    assert!(matches!(err, ClientError::Io { .. }));
}

#[tokio::test]
async fn analyze_posts_query_json() {
    let (base_url, state) = spawn_service().await;
    state
        .set_analyze_reply(StatusCode::OK, r#"{"response": "main() starts the server"}"#)
        .await;

    let reply = client(&base_url, None)
        .analyze("what does main do?")
        .await
        .expect("analyze");

    assert_eq!(
        reply.result,
        AnalyzeResult::Text("main() starts the server".to_string())
    );
    let queries = state.queries.lock().await;
    assert_eq!(queries.as_slice(), &[json!({ "query": "what does main do?" })]);
}

#[tokio::test]
async fn analyze_sends_configured_top_k() {
    let (base_url, state) = spawn_service().await;

    client(&base_url, Some(3))
        .analyze("list the routes")
        .await
        .expect("analyze");

    let queries = state.queries.lock().await;
    assert_eq!(queries[0], json!({ "query": "list the routes", "top_k": 3 }));
}

#[tokio::test]
async fn analyze_structured_response_keeps_shape() {
    let (base_url, state) = spawn_service().await;
    state
        .set_analyze_reply(
            StatusCode::OK,
            r#"{"response": {"summary": "two routes", "routes": ["/upload", "/analyze"]},
                "retrieved_docs": [{"file": "app/main.py", "chunk_id": 0}]}"#,
        )
        .await;

    let reply = client(&base_url, None)
        .analyze("list the routes")
        .await
        .expect("analyze");

    assert_eq!(
        reply.result.display_text(),
        "{\n  \"summary\": \"two routes\",\n  \"routes\": [\n    \"/upload\",\n    \"/analyze\"\n  ]\n}"
    );
    assert_eq!(reply.sources.len(), 1);
    assert_eq!(reply.sources[0].label(), "app/main.py#0");
}

#[tokio::test]
async fn analyze_without_response_field_uses_placeholder() {
    let (base_url, state) = spawn_service().await;
    state
        .set_analyze_reply(StatusCode::OK, r#"{"retrieved_docs": []}"#)
        .await;

    let reply = client(&base_url, None)
        .analyze("anything")
        .await
        .expect("analyze");

    assert_eq!(
        reply.result,
        AnalyzeResult::Text(NO_RESPONSE_MESSAGE.to_string())
    );
}

#[tokio::test]
async fn analyze_malformed_body_is_parse_error() {
    let (base_url, state) = spawn_service().await;
    state.set_analyze_reply(StatusCode::OK, "<html>oops</html>").await;

    let err = client(&base_url, None)
        .analyze("anything")
        .await
        .expect_err("parse failure");

    assert!(matches!(err, ClientError::Parse { .. }));
    assert_eq!(err.user_message(), "Error contacting server.");
}

#[tokio::test]
async fn list_chunks_passes_limit() {
    let (base_url, _state) = spawn_service().await;

    let listing = client(&base_url, None)
        .list_chunks(1)
        .await
        .expect("list chunks");

    assert_eq!(listing.total_chunks, 42);
    assert_eq!(listing.chunks.len(), 1);
    assert_eq!(listing.chunks[0].file.as_deref(), Some("app/main.py"));
}

#[tokio::test]
async fn health_check_returns_welcome_message() {
    let (base_url, _state) = spawn_service().await;

    let message = client(&base_url, None)
        .health_check()
        .await
        .expect("health");

    assert_eq!(message, "Welcome to the Code Analysis AI Agent");
}
