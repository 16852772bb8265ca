//! Gateway and session behaviour against an in-process mock of the
//! production API.

use axum::extract::{Form, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use karat_client::{
    Access, ApiClient, ClientError, FileStorage, Navigator, Route, SessionStore, access,
};
use karat_core::{JobStatus, NewJob};
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// =============================================================================
// Mock API
// =============================================================================

#[derive(Default)]
struct Mock {
    /// `Authorization` header of every request after login, in order.
    seen_auth: Mutex<Vec<Option<String>>>,
    fail_material: AtomicBool,
}

type Shared = Arc<Mock>;

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

fn owner_profile() -> Value {
    json!({
        "id": 1,
        "username": "owner1",
        "email": "owner@example.com",
        "full_name": "Olive Owner",
        "role": "owner",
        "is_active": true,
        "created_at": "2024-01-01T00:00:00"
    })
}

fn polisher_profile() -> Value {
    json!({
        "id": 4,
        "username": "polisher1",
        "email": "polisher@example.com",
        "full_name": "Paz Polisher",
        "role": "polisher",
        "is_active": true,
        "created_at": "2024-01-02T00:00:00"
    })
}

fn job(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "design_no": format!("D-{id:03}"),
        "item_category": "ring",
        "initial_weight": 12.5,
        "total_loss": 0.25,
        "loss_percentage": 2.0,
        "status": status,
        "current_stage": null,
        "current_worker_id": null,
        "created_at": "2024-02-01T10:00:00"
    })
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Profile for a known token, or `None` for an unknown or missing one.
fn profile_for(headers: &HeaderMap) -> Option<Value> {
    match bearer(headers).as_deref() {
        Some("Bearer tok123") => Some(owner_profile()),
        Some("Bearer tokpol") => Some(polisher_profile()),
        _ => None,
    }
}

async fn login(Form(form): Form<LoginForm>) -> Response {
    match (form.username.as_str(), form.password.as_str()) {
        ("owner1", "validpass") => {
            Json(json!({ "access_token": "tok123", "token_type": "bearer" })).into_response()
        }
        ("polisher1", "validpass") => Json(json!({ "access_token": "tokpol" })).into_response(),
        ("ghost", _) => Json(json!({ "access_token": "tokghost" })).into_response(),
        _ => detail(StatusCode::UNAUTHORIZED, "Incorrect username or password"),
    }
}

async fn me(headers: HeaderMap) -> Response {
    if bearer(&headers).as_deref() == Some("Bearer tokghost") {
        return detail(StatusCode::INTERNAL_SERVER_ERROR, "profile store unavailable");
    }
    match profile_for(&headers) {
        Some(profile) => Json(profile).into_response(),
        None => detail(StatusCode::UNAUTHORIZED, "Could not validate credentials"),
    }
}

async fn users(State(mock): State<Shared>, headers: HeaderMap) -> Response {
    mock.seen_auth.lock().unwrap().push(bearer(&headers));
    if profile_for(&headers).is_none() {
        return detail(StatusCode::UNAUTHORIZED, "Not authenticated");
    }
    Json(json!([owner_profile(), polisher_profile()])).into_response()
}

async fn jobs(
    State(mock): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    mock.seen_auth.lock().unwrap().push(bearer(&headers));
    if profile_for(&headers).is_none() {
        return detail(StatusCode::UNAUTHORIZED, "Not authenticated");
    }
    let all = vec![job(1, "created"), job(2, "in_progress"), job(3, "completed")];
    let filtered: Vec<Value> = match query.get("status") {
        Some(status) => all.into_iter().filter(|j| j["status"] == *status).collect(),
        None => all,
    };
    Json(filtered).into_response()
}

async fn create_job(
    State(mock): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    mock.seen_auth.lock().unwrap().push(bearer(&headers));
    if body["design_no"] == "DUP" {
        return detail(StatusCode::BAD_REQUEST, "Design number already exists");
    }
    if body.get("initial_weight").is_none() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "detail": [{ "loc": ["body", "initial_weight"], "msg": "field required" }]
            })),
        )
            .into_response();
    }
    (StatusCode::CREATED, Json(job(9, "created"))).into_response()
}

async fn job_summary(State(mock): State<Shared>, headers: HeaderMap) -> Response {
    mock.seen_auth.lock().unwrap().push(bearer(&headers));
    Json(json!({
        "total_jobs": 3,
        "completed_jobs": 1,
        "in_progress_jobs": 1,
        "pending_jobs": 1,
        "total_initial_weight": 37.5,
        "total_loss": 0.75,
        "average_loss_percentage": 2.0
    }))
    .into_response()
}

async fn worker_performance() -> Response {
    Json(json!([{
        "worker_id": 4,
        "worker_name": "Paz Polisher",
        "role": "polisher",
        "total_jobs": 2,
        "total_loss": 0.5,
        "average_loss_percentage": 1.25
    }]))
    .into_response()
}

async fn material_consumption(State(mock): State<Shared>) -> Response {
    if mock.fail_material.load(Ordering::SeqCst) {
        return detail(StatusCode::INTERNAL_SERVER_ERROR, "report failed");
    }
    Json(json!([{
        "item_category": "ring",
        "total_jobs": 3,
        "total_initial_weight": 37.5,
        "total_loss": 0.75,
        "loss_percentage": 2.0
    }]))
    .into_response()
}

async fn expired() -> Response {
    detail(StatusCode::UNAUTHORIZED, "Token has expired")
}

async fn spawn_mock() -> (String, Shared) {
    let mock: Shared = Arc::new(Mock::default());
    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(me))
        .route("/api/users", get(users))
        .route("/api/jobs", get(jobs).post(create_job))
        .route("/api/reports/job-summary", get(job_summary))
        .route("/api/reports/worker-performance", get(worker_performance))
        .route("/api/reports/material-consumption", get(material_consumption))
        .route("/api/expired", get(expired))
        .with_state(mock.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), mock)
}

#[derive(Default)]
struct CountingNavigator(AtomicUsize);

impl Navigator for CountingNavigator {
    fn to_login(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

async fn client() -> (ApiClient, Shared, Arc<CountingNavigator>) {
    let (base, mock) = spawn_mock().await;
    let nav = Arc::new(CountingNavigator::default());
    let session = SessionStore::in_memory().with_navigator(nav.clone());
    (ApiClient::new(&base, session).unwrap(), mock, nav)
}

// =============================================================================
// Session lifecycle
// =============================================================================

#[tokio::test]
async fn test_login_then_logout() {
    let (client, _mock, nav) = client().await;
    let session = client.session().clone();
    assert!(!session.is_authenticated());

    client.login("owner1", "validpass").await.unwrap();
    assert!(session.is_authenticated());

    session.logout().unwrap();
    assert!(!session.is_authenticated());
    assert!(session.current_user().is_none());
    assert_eq!(nav.0.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_login_stores_exact_token_and_profile() {
    let (client, _mock, _nav) = client().await;
    let user = client.login("owner1", "validpass").await.unwrap();

    let session = client.session();
    assert!(session.is_authenticated());
    assert_eq!(session.token().as_deref(), Some("tok123"));

    let expected: karat_core::User = serde_json::from_value(owner_profile()).unwrap();
    assert_eq!(session.current_user(), Some(expected.clone()));
    assert_eq!(user, expected);
}

#[tokio::test]
async fn test_login_with_bad_credentials_leaves_no_session() {
    let (client, _mock, nav) = client().await;
    let err = client.login("owner1", "wrong").await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(err.user_message("Login failed"), "Login failed");
    assert!(!client.session().is_authenticated());
    assert!(client.session().current_user().is_none());
    // Refused credentials are not an expired session.
    assert_eq!(nav.0.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_refused_relogin_clears_previous_session() {
    let (client, _mock, nav) = client().await;
    client.login("owner1", "validpass").await.unwrap();

    let err = client.login("polisher1", "wrong").await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(client.session().token().is_none());
    assert!(client.session().current_user().is_none());
    assert_eq!(nav.0.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_login_rolls_back_token_when_profile_fetch_fails() {
    let (client, _mock, _nav) = client().await;
    let err = client.login("ghost", "whatever").await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert!(!client.session().is_authenticated());
    assert!(client.session().current_user().is_none());
}

#[tokio::test]
async fn test_failed_relogin_does_not_keep_previous_profile() {
    let (client, _mock, _nav) = client().await;
    client.login("owner1", "validpass").await.unwrap();
    assert_eq!(client.session().current_user().unwrap().username, "owner1");

    let err = client.login("ghost", "whatever").await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert!(client.session().token().is_none());
    assert!(client.session().current_user().is_none());
}

// =============================================================================
// Bearer token and 401 handling
// =============================================================================

#[tokio::test]
async fn test_every_request_carries_the_stored_token() {
    let (client, mock, _nav) = client().await;

    // Anonymous requests go out without a credential.
    let err = client.list_jobs(None).await.unwrap_err();
    assert!(err.is_unauthorized());

    client.login("owner1", "validpass").await.unwrap();
    client.list_jobs(None).await.unwrap();
    client.list_users().await.unwrap();
    client.job_summary().await.unwrap();

    let seen = mock.seen_auth.lock().unwrap().clone();
    assert_eq!(seen[0], None);
    assert_eq!(seen.len(), 4);
    for header in &seen[1..] {
        assert_eq!(header.as_deref(), Some("Bearer tok123"));
    }
}

#[tokio::test]
async fn test_unauthorized_response_clears_session() {
    let (client, _mock, nav) = client().await;
    client.login("owner1", "validpass").await.unwrap();
    assert!(client.session().is_authenticated());

    let err = client.get::<Value>("/api/expired").await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized));
    assert!(!client.session().is_authenticated());
    assert!(client.session().current_user().is_none());
    assert_eq!(nav.0.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unauthorized_response_clears_session_file() {
    let (base, _mock) = spawn_mock().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let session = SessionStore::new(Arc::new(FileStorage::new(&path)));
    let client = ApiClient::new(&base, session).unwrap();
    client.login("owner1", "validpass").await.unwrap();

    // A second process sharing the file sees the session.
    let other = SessionStore::new(Arc::new(FileStorage::new(&path)));
    assert!(other.is_authenticated());

    let _ = client.get::<Value>("/api/expired").await;
    assert!(!other.is_authenticated());
    assert!(other.current_user().is_none());
}

// =============================================================================
// Endpoints
// =============================================================================

#[tokio::test]
async fn test_list_jobs_status_filter() {
    let (client, _mock, _nav) = client().await;
    client.login("owner1", "validpass").await.unwrap();

    assert_eq!(client.list_jobs(None).await.unwrap().len(), 3);
    let in_progress = client.list_jobs(Some(JobStatus::InProgress)).await.unwrap();
    assert_eq!(in_progress.len(), 1);
    assert_eq!(in_progress[0].status, "in_progress");
}

#[tokio::test]
async fn test_list_workers_excludes_owners() {
    let (client, _mock, _nav) = client().await;
    client.login("owner1", "validpass").await.unwrap();

    let workers = client.list_workers().await.unwrap();
    assert_eq!(workers.len(), 1);
    assert_eq!(workers[0].username, "polisher1");
}

#[tokio::test]
async fn test_server_detail_is_propagated() {
    let (client, _mock, _nav) = client().await;
    client.login("owner1", "validpass").await.unwrap();

    let dup = NewJob {
        design_no: "DUP".to_string(),
        item_category: "ring".to_string(),
        initial_weight: 10.0,
        description: None,
    };
    let err = client.create_job(&dup).await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.user_message("Failed to create job"), "Design number already exists");
    // Business errors do not end the session.
    assert!(client.session().is_authenticated());

    let ok = NewJob {
        design_no: "D-100".to_string(),
        ..dup
    };
    client.create_job(&ok).await.unwrap();
}

#[tokio::test]
async fn test_validation_detail_is_joined() {
    let (client, _mock, _nav) = client().await;
    client.login("owner1", "validpass").await.unwrap();

    let err = client
        .post_json::<Value, _>("/api/jobs", &json!({ "design_no": "D-1" }))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(422));
    assert_eq!(err.user_message("Failed to create job"), "field required");
}

#[tokio::test]
async fn test_reports_overview_joins_both_reports() {
    let (client, _mock, _nav) = client().await;
    client.login("owner1", "validpass").await.unwrap();

    let overview = client.reports_overview().await.unwrap();
    assert_eq!(overview.worker_performance.len(), 1);
    assert_eq!(overview.material_consumption.len(), 1);
}

#[tokio::test]
async fn test_reports_overview_fails_when_either_report_fails() {
    let (client, mock, _nav) = client().await;
    client.login("owner1", "validpass").await.unwrap();
    mock.fail_material.store(true, Ordering::SeqCst);

    let err = client.reports_overview().await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.user_message("Failed to load reports"), "report failed");
}

#[tokio::test]
async fn test_transport_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::new(&format!("http://{addr}"), SessionStore::in_memory()).unwrap();
    let err = client.job_summary().await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
}

// =============================================================================
// Gating after a real login
// =============================================================================

#[tokio::test]
async fn test_owner_gate_after_login() {
    let (client, _mock, _nav) = client().await;

    client.login("polisher1", "validpass").await.unwrap();
    let denied = access::authorize(client.session(), Access::Owner).unwrap_err();
    assert_eq!(denied.redirect, Route::Login);
    assert_eq!(access::landing(client.session()), Route::WorkerTasks);

    client.session().logout().unwrap();
    client.login("owner1", "validpass").await.unwrap();
    assert!(access::authorize(client.session(), Access::Owner).is_ok());
    assert_eq!(access::landing(client.session()), Route::Dashboard);
}
