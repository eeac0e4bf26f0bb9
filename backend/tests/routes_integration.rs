//! HTTP-level tests driving the router with `tower::ServiceExt::oneshot`.

#![cfg(feature = "http-server")]

mod support;

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use tokio::task::JoinSet;
use waitlist_resolver::db::models::CourseRecord;
use waitlist_resolver::db::{FullRepository, LocalRepository};
use waitlist_resolver::engine::{EngineConfig, StudentIssuePolicy, WaitlistEngine};
use waitlist_resolver::http::{create_router, AppState};
use waitlist_resolver::models::{Component, CourseKey};
use waitlist_resolver::services::{resolve_waitlist, WaitlistRequest};

use support::{ids, subj_101_repo, two_slot_config};

fn app_with(repo: LocalRepository, config: EngineConfig) -> Router {
    let repo: Arc<dyn FullRepository> = Arc::new(repo);
    create_router(AppState::new(repo, WaitlistEngine::new(config)))
}

fn app() -> Router {
    app_with(subj_101_repo(), two_slot_config())
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn as_json(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}

// ==================== Resolve ====================

#[tokio::test]
async fn test_resolve_example_course() {
    let (status, body) = send(
        app(),
        post_json(
            "/v1/waitlist/resolve",
            json!({"subject": "SUBJ", "catalog": "101", "students": [1, 2, 3]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        as_json(&body),
        json!({"results": [
            {"day": "Tuesday", "time": "09:00-10:00", "students": [1, 2, 3]},
            {"day": "Monday", "time": "10:00-11:00", "students": [2, 3]}
        ]})
    );
}

#[tokio::test]
async fn test_resolve_empty_students_is_bare_success() {
    let (status, body) = send(
        app(),
        post_json(
            "/v1/waitlist/resolve",
            json!({"subject": "SUBJ", "catalog": "101", "students": []}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, br#"{"results":[]}"#.to_vec());
}

#[tokio::test]
async fn test_resolve_is_byte_deterministic() {
    let payload = json!({"subject": "SUBJ", "catalog": "101", "students": [3, 2, 1, 2]});
    let (_, first) = send(app(), post_json("/v1/waitlist/resolve", payload.clone())).await;
    let (_, second) = send(app(), post_json("/v1/waitlist/resolve", payload)).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_resolve_warns_about_unknown_student() {
    let (status, body) = send(
        app(),
        post_json(
            "/v1/waitlist/resolve",
            json!({"subject": "SUBJ", "catalog": "101", "students": [3, 99]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let body = as_json(&body);
    assert_eq!(body["results"][0]["students"], json!([3]));
    assert_eq!(body["warnings"][0]["student"], json!(99));
    assert_eq!(body["warnings"][0]["code"], json!("unknown_student"));
}

#[tokio::test]
async fn test_resolve_abort_policy_is_422() {
    let mut config = two_slot_config();
    config.student_issue_policy = StudentIssuePolicy::Abort;
    let (status, body) = send(
        app_with(subj_101_repo(), config),
        post_json(
            "/v1/waitlist/resolve",
            json!({"subject": "SUBJ", "catalog": "101", "students": [3, 99]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let body = as_json(&body);
    assert!(body["error"].as_str().unwrap().contains("99"));
    assert_eq!(body["details"], "unknown_student");
}

#[tokio::test]
async fn test_resolve_validation_errors() {
    let cases = [
        (
            json!({"subject": "", "catalog": "101", "students": [1]}),
            StatusCode::BAD_REQUEST,
        ),
        (
            json!({"catalog": "101", "students": [1]}),
            StatusCode::BAD_REQUEST,
        ),
        (
            json!({"subject": "SUBJ", "catalog": "101", "students": "x"}),
            StatusCode::BAD_REQUEST,
        ),
        (
            json!({"subject": "NOPE", "catalog": "1", "students": [1]}),
            StatusCode::NOT_FOUND,
        ),
    ];
    for (payload, expected) in cases {
        let (status, body) = send(app(), post_json("/v1/waitlist/resolve", payload)).await;
        assert_eq!(status, expected);
        assert!(as_json(&body)["error"].is_string());
    }
}

#[tokio::test]
async fn test_resolve_timeout_is_504() {
    let mut config = two_slot_config();
    config.timeout_ms = 0;
    let (status, body) = send(
        app_with(subj_101_repo(), config),
        post_json(
            "/v1/waitlist/resolve",
            json!({"subject": "SUBJ", "catalog": "101", "students": [1, 2, 3]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(as_json(&body)["code"], json!("TIMEOUT"));
}

#[tokio::test]
async fn test_resolve_request_blackouts() {
    let (status, body) = send(
        app(),
        post_json(
            "/v1/waitlist/resolve",
            json!({
                "subject": "SUBJ", "catalog": "101", "students": [1, 2, 3],
                "blackouts": [{"day": "Tue", "start": "09:00", "end": "10:00"}]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        as_json(&body)["results"],
        json!([{"day": "Monday", "time": "10:00-11:00", "students": [2, 3]}])
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_resolutions_share_state_safely() {
    let repo = subj_101_repo();
    let mut second = CourseRecord::new(CourseKey::new("SUBJ", "102").unwrap(), Component::Lab);
    second.waitlist = ids(&[1, 2]);
    repo.insert_course(second).unwrap();
    let repo: Arc<dyn FullRepository> = Arc::new(repo);
    let state = AppState::new(repo, WaitlistEngine::new(two_slot_config()));

    let mut tasks = JoinSet::new();
    for i in 0..16 {
        let state = state.clone();
        let catalog = if i % 2 == 0 { "101" } else { "102" };
        tasks.spawn(async move {
            let request = WaitlistRequest::new("SUBJ", catalog, ids(&[3, 2, 1]));
            resolve_waitlist(
                state.repository.as_ref(),
                state.engine.clone(),
                &state.proposals,
                request,
            )
            .await
            .unwrap()
        });
    }

    let mut outcomes = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        outcomes.push(joined.unwrap());
    }
    assert_eq!(outcomes.len(), 16);
    let first = &outcomes[0].resolution;
    assert!(!first.proposals.is_empty());
    assert!(outcomes.iter().all(|o| &o.resolution == first));

    assert_eq!(state.proposals.len(), 2);
    for catalog in ["101", "102"] {
        let key = CourseKey::new("SUBJ", catalog).unwrap();
        let stored = state.proposals.get(&key).unwrap();
        assert_eq!(stored.proposals, first.proposals);
    }
}

// ==================== Support queries ====================

#[tokio::test]
async fn test_course_waitlist_route() {
    let (status, body) = send(app(), get("/v1/courses/subj/101/waitlist")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        as_json(&body),
        json!({"subject": "SUBJ", "catalog": "101", "students": [1, 2, 3]})
    );

    let (status, _) = send(app(), get("/v1/courses/SUBJ/999/waitlist")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_export_after_resolve() {
    let app = app();
    let (status, _) = send(app.clone(), get("/v1/courses/SUBJ/101/proposals/export")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        app.clone(),
        post_json(
            "/v1/waitlist/resolve",
            json!({"subject": "SUBJ", "catalog": "101", "students": [1, 2, 3]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let response = app
        .oneshot(get("/v1/courses/SUBJ/101/proposals/export"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.starts_with("subject,catalog,classstarttime,classendtime,mondays"));
    assert_eq!(text.lines().count(), 3);
}

#[tokio::test]
async fn test_health_reports_repository() {
    let repo = subj_101_repo();
    repo.set_healthy(false);
    let (status, body) = send(app_with(repo, two_slot_config()), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    let body = as_json(&body);
    assert_eq!(body["status"], json!("ok"));
    assert_eq!(body["repository"], json!("disconnected"));
}
