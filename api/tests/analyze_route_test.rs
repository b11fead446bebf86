//! End-to-end tests for the HTTP surface against a mocked model endpoint.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use ai_llm_service::{
    config::{llm_model_config::LlmModelConfig, model_variant::ModelVariant},
    service_profiles::LlmServiceProfiles,
};
use api::{core::app_state::AppState, router};
use axum::{
    Json, Router,
    body::{Body, Bytes, to_bytes},
    extract::State,
    http::{HeaderValue, Method, Request, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use futures_util::stream;
use serde_json::{Value, json};
use tower::ServiceExt;

/// What the mocked provider answers with.
#[derive(Clone)]
enum Reply {
    Content(String),
    Status(StatusCode, &'static str),
}

#[derive(Clone)]
struct Upstream {
    reply: Reply,
    hits: Arc<AtomicUsize>,
    last_body: Arc<Mutex<Option<Value>>>,
}

async fn completions(State(up): State<Upstream>, Json(body): Json<Value>) -> Response {
    up.hits.fetch_add(1, Ordering::SeqCst);
    *up.last_body.lock().unwrap() = Some(body);
    match up.reply {
        Reply::Content(content) => Json(json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        }))
        .into_response(),
        Reply::Status(status, text) => (status, text).into_response(),
    }
}

struct Harness {
    app: Router,
    hits: Arc<AtomicUsize>,
    last_body: Arc<Mutex<Option<Value>>>,
}

impl Harness {
    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    fn sent(&self) -> Value {
        self.last_body.lock().unwrap().clone().expect("no upstream call")
    }
}

fn profile(variant: ModelVariant, endpoint: &str, api_key: Option<&str>) -> LlmModelConfig {
    LlmModelConfig {
        variant,
        model: format!("mock-{}", variant.as_str()),
        endpoint: endpoint.to_string(),
        api_key: api_key.map(str::to_string),
        max_tokens: Some(1000),
        temperature: Some(0.2),
        top_p: None,
        timeout_secs: Some(5),
    }
}

async fn harness(reply: Reply, api_key: Option<&str>) -> Harness {
    let hits = Arc::new(AtomicUsize::new(0));
    let last_body = Arc::new(Mutex::new(None));
    let upstream = Upstream {
        reply,
        hits: hits.clone(),
        last_body: last_body.clone(),
    };

    let mock = Router::new()
        .route("/v1/chat/completions", post(completions))
        .with_state(upstream);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, mock).await.unwrap();
    });

    let endpoint = format!("http://{addr}/v1");
    let llm = Arc::new(LlmServiceProfiles::new(
        profile(ModelVariant::Vision, &endpoint, api_key),
        profile(ModelVariant::Text, &endpoint, api_key),
    ));

    Harness {
        app: router(Arc::new(AppState::new(llm))),
        hits,
        last_body,
    }
}

async fn content_harness(content: &str) -> Harness {
    harness(Reply::Content(content.to_string()), Some("test-key")).await
}

fn post_json(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Response<Body>) {
    let res = app.clone().oneshot(req).await.unwrap();
    (res.status(), res)
}

async fn json_body(res: Response<Body>) -> Value {
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn error_message(v: &Value) -> &str {
    v["error"].as_str().expect("error field")
}

const RICE_REPLY: &str = "Sure! {\"items\":[{\"name\":\"米饭\",\"protein\":2,\"carbs\":45,\"fat\":0.3}],\"notes\":\"一碗\"}";

#[tokio::test]
async fn text_request_returns_normalized_result() {
    let h = content_harness(RICE_REPLY).await;

    let (status, res) = send(&h.app, post_json(r#"{"text":"一碗米饭"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(res.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

    let body = json_body(res).await;
    assert_eq!(
        body,
        json!({
            "items": [{ "name": "米饭", "protein": 2.0, "fat": 0.3, "carbs": 45.0, "kcal": 191 }],
            "totals": { "kcal": 191, "protein": 2.0, "fat": 0.3, "carbs": 45.0 },
            "notes": "一碗"
        })
    );
    assert_eq!(h.hits(), 1);

    let sent = h.sent();
    assert_eq!(sent["model"], "mock-text");
    assert!(sent["messages"][1]["content"].as_str().unwrap().contains("一碗米饭"));
}

#[tokio::test]
async fn image_request_uses_vision_model_and_multimodal_content() {
    let h = content_harness(r#"{"items":[],"notes":"no food"}"#).await;

    let (status, res) = send(&h.app, post_json(r#"{"image":"QUJD"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(res).await["notes"], "no food");

    let sent = h.sent();
    assert_eq!(sent["model"], "mock-vision");
    let parts = sent["messages"][1]["content"].as_array().unwrap();
    assert!(parts.iter().any(|p| {
        p["type"] == "image_url" && p["image_url"]["url"] == "data:image/jpeg;base64,QUJD"
    }));
}

#[tokio::test]
async fn revise_request_embeds_previous_result() {
    let h = content_harness(r#"{"items":[{"name":"noodles","protein":8,"fat":2,"carbs":50}]}"#).await;

    let req = json!({
        "text": "replace rice with noodles",
        "mode": "revise",
        "prevJSON": { "items": [{ "name": "rice" }] }
    });
    let (status, res) = send(&h.app, post_json(req.to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(res).await["totals"]["kcal"], 250);

    let prompt = h.sent()["messages"][1]["content"].as_str().unwrap().to_string();
    assert!(prompt.contains(r#"{"items":[{"name":"rice"}]}"#));
    assert!(prompt.contains("replace rice with noodles"));
}

#[tokio::test]
async fn oversized_body_is_rejected_before_any_model_call() {
    let h = content_harness(RICE_REPLY).await;

    // No Content-Length header here, so the capped read is what trips.
    let text = "a".repeat(6 * 1024 * 1024);
    let (status, res) = send(&h.app, post_json(json!({ "text": text }).to_string())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(res).await;
    assert!(error_message(&body).contains("too large"), "{body}");
    assert_eq!(h.hits(), 0);
}

#[tokio::test]
async fn declared_content_length_over_limit_is_rejected() {
    let h = content_harness(RICE_REPLY).await;

    let mut req = post_json(r#"{"text":"rice"}"#);
    req.headers_mut().insert(
        header::CONTENT_LENGTH,
        HeaderValue::from(6 * 1024 * 1024_usize),
    );
    let (status, res) = send(&h.app, req).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(error_message(&json_body(res).await).contains("Request body is too large"));
    assert_eq!(h.hits(), 0);
}

#[tokio::test]
async fn oversized_image_is_rejected_with_guidance() {
    let h = content_harness(RICE_REPLY).await;

    let image = "A".repeat(4 * 1024 * 1024 + 1);
    let (status, res) = send(&h.app, post_json(json!({ "image": image }).to_string())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(res).await;
    let msg = error_message(&body);
    assert!(msg.starts_with("Image is too large"), "{msg}");
    assert!(msg.contains("compress or resize"), "{msg}");
    assert_eq!(h.hits(), 0);
}

#[tokio::test]
async fn missing_credential_fails_without_calling_the_model() {
    let h = harness(Reply::Content(RICE_REPLY.into()), None).await;

    let (status, res) = send(&h.app, post_json(r#"{"text":"rice"}"#)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(error_message(&json_body(res).await).contains("API key is not set"));
    assert_eq!(h.hits(), 0);
}

#[tokio::test]
async fn unparseable_reply_is_a_server_error() {
    let h = content_harness("not json at all").await;

    let (status, res) = send(&h.app, post_json(r#"{"text":"rice"}"#)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(res).await;
    assert!(error_message(&body).contains("could not be parsed"), "{body}");
    assert!(body.get("items").is_none());
    assert_eq!(h.hits(), 1);
}

#[tokio::test]
async fn upstream_failure_is_reported_generically() {
    let h = harness(
        Reply::Status(StatusCode::SERVICE_UNAVAILABLE, "internal provider trace id=42"),
        Some("test-key"),
    )
    .await;

    let (status, res) = send(&h.app, post_json(r#"{"text":"rice"}"#)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(res).await;
    let msg = error_message(&body);
    assert!(msg.contains("503"), "{msg}");
    assert!(!msg.contains("trace id"), "{msg}");
}

#[tokio::test]
async fn malformed_json_body_is_a_server_error() {
    let h = content_harness(RICE_REPLY).await;

    let (status, res) = send(&h.app, post_json("{not json")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(error_message(&json_body(res).await).starts_with("Invalid request"));
    assert_eq!(h.hits(), 0);
}

#[tokio::test]
async fn empty_request_uses_default_identify_prompt() {
    let h = content_harness(r#"{"items":[],"notes":"nothing to analyze"}"#).await;

    let (status, res) = send(&h.app, post_json("{}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(res).await["notes"], "nothing to analyze");
    assert_eq!(h.hits(), 1);

    let sent = h.sent();
    assert_eq!(sent["model"], "mock-text");
    assert!(
        sent["messages"][1]["content"]
            .as_str()
            .unwrap()
            .starts_with("Identify every food")
    );
}

#[tokio::test]
async fn broken_body_stream_is_not_reported_as_too_large() {
    let h = content_harness(RICE_REPLY).await;

    let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
        Ok(Bytes::from_static(br#"{"text":"#)),
        Err(std::io::Error::other("connection reset by peer")),
    ];
    let (status, res) = send(&h.app, post_json(Body::from_stream(stream::iter(chunks)))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(res).await;
    assert_eq!(error_message(&body), "Failed to read the request body");
    assert_eq!(h.hits(), 0);
}

#[tokio::test]
async fn other_methods_are_not_allowed() {
    let h = content_harness(RICE_REPLY).await;

    for method in [Method::GET, Method::PUT, Method::DELETE] {
        let req = Request::builder()
            .method(method.clone())
            .uri("/api/analyze")
            .body(Body::empty())
            .unwrap();
        let (status, res) = send(&h.app, req).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method}");
        assert_eq!(res.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(json_body(res).await, json!({ "error": "Method not allowed" }));
    }
    assert_eq!(h.hits(), 0);
}

#[tokio::test]
async fn preflight_carries_cors_headers() {
    let h = content_harness(RICE_REPLY).await;

    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/analyze")
        .header(header::ORIGIN, "https://meals.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let (status, res) = send(&h.app, req).await;

    assert_eq!(status, StatusCode::OK);
    let headers = res.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "POST, OPTIONS");
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
        "Content-Type, Authorization"
    );
    assert_eq!(h.hits(), 0);
}

#[tokio::test]
async fn health_is_ok_without_credentials() {
    let h = harness(Reply::Content(String::new()), None).await;

    let req = Request::builder()
        .uri("/healthz")
        .body(Body::empty())
        .unwrap();
    let (status, res) = send(&h.app, req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(res).await, json!({ "status": "ok" }));
}
