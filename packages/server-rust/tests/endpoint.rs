//! End-to-end tests: HTTP requests through the full router.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use team_events_core::samples;
use team_events_server::{
    default_registry, EndpointConfig, JobCatalog, JobDefinition, JobTrigger, NetworkConfig,
    NetworkModule,
};
use tower::ServiceExt;

const REPO: &str = "https://fabrikam-fiber-inc.visualstudio.com/DefaultCollection/_git/Fabrikam-Fiber-Git";

fn router() -> Router {
    let catalog = JobCatalog::new(vec![
        JobDefinition {
            name: "fabrikam-ci".to_string(),
            repository_url: REPO.to_string(),
            branches: vec!["master".to_string()],
            trigger: JobTrigger::Poll,
        },
        JobDefinition {
            name: "fabrikam-deploy".to_string(),
            repository_url: format!("{REPO}.git"),
            branches: vec![],
            trigger: JobTrigger::Build,
        },
    ])
    .unwrap();
    let registry = Arc::new(default_registry(Arc::new(catalog)));
    NetworkModule::new(
        NetworkConfig::default(),
        EndpointConfig::default(),
        registry,
    )
    .build_router()
}

async fn send(method: Method, uri: &str, body: &str) -> (StatusCode, String, String) {
    send_bytes(method, uri, body.as_bytes().to_vec()).await
}

async fn send_bytes(method: Method, uri: &str, body: Vec<u8>) -> (StatusCode, String, String) {
    let response = router()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string())
        .unwrap_or_default();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn post(uri: &str, body: &str) -> (StatusCode, String, String) {
    send(Method::POST, uri, body).await
}

#[tokio::test]
async fn ping_echoes_body() {
    let (status, content_type, body) = post("/team-events/ping", samples::PING).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "application/json; charset=utf-8");
    let doc: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(doc, json!({"message": "Hello, world!"}));
}

#[tokio::test]
async fn event_names_ignore_case() {
    let (status, _, _) = post("/team-events/PING", "{}").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn code_pushed_schedules_matching_jobs() {
    let (status, _, body) = post("/team-events/gitCodePushed", samples::GIT_CODE_PUSHED).await;

    assert_eq!(status, StatusCode::OK, "{body}");
    let doc: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(doc["eventName"], "gitCodePushed");
    assert_eq!(
        doc["messages"],
        json!(["Scheduled polling of fabrikam-ci", "Scheduled fabrikam-deploy"])
    );
}

#[tokio::test]
async fn pull_request_merge_commit_builds_jobs() {
    let (status, _, body) = post(
        "/team-events/pullRequestMergeCommitCreated",
        samples::PULL_REQUEST_MERGE_COMMIT_CREATED,
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    let doc: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(doc["pullRequestId"], 1);
    assert_eq!(
        doc["messages"],
        json!(["Scheduled fabrikam-ci", "Scheduled fabrikam-deploy"])
    );
}

#[tokio::test]
async fn unknown_and_missing_events_are_rejected() {
    for uri in ["/team-events/nope", "/team-events/", "/team-events/%20"] {
        let (status, content_type, body) = post(uri, "{}").await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(content_type, "text/plain; charset=utf-8");
        assert_eq!(body, "Invalid event");
    }
}

#[tokio::test]
async fn unknown_event_with_non_utf8_body_is_invalid_event() {
    let (status, _, body) = send_bytes(Method::POST, "/team-events/bogusEvent", vec![0xff]).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Invalid event");
}

#[tokio::test]
async fn non_utf8_body_is_malformed_payload() {
    let (status, _, body) =
        send_bytes(Method::POST, "/team-events/ping", b"{\xff}".to_vec()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.starts_with("malformed JSON payload"), "{body}");
}

#[tokio::test]
async fn percent_encoded_event_name_resolves() {
    let (status, _, body) = post("/team-events/p%69ng", "{}").await;
    assert_eq!(status, StatusCode::OK, "{body}");
}

#[tokio::test]
async fn trailing_segments_are_ignored() {
    let (status, _, _) = post("/team-events/ping/extra/segments", "{}").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn malformed_json_is_400() {
    let (status, content_type, body) = post("/team-events/ping", "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(content_type, "text/plain; charset=utf-8");
    assert!(body.starts_with("malformed JSON payload"), "{body}");
}

#[tokio::test]
async fn validation_failure_is_400_not_500() {
    let (status, _, body) = post("/team-events/gitPush", r#"{"collectionUri": "x"}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("repoUri"), "{body}");
}

#[tokio::test]
async fn get_on_event_path_is_405() {
    let (status, _, _) = send(Method::GET, "/team-events/ping", "").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn index_page_documents_events() {
    for uri in ["/team-events", "/team-events/"] {
        let (status, content_type, body) = send(Method::GET, uri, "").await;

        assert_eq!(status, StatusCode::OK, "{uri}");
        assert!(content_type.starts_with("text/html"));
        assert!(body.contains("<td valign='top'>/team-events/gitCodePushed</td>"));
        assert!(body.contains("&lt;a href="));
    }
}

#[tokio::test]
async fn liveness_route_is_up() {
    let (status, _, _) = send(Method::GET, "/health/live", "").await;
    assert_eq!(status, StatusCode::OK);
}
