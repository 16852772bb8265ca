//! Request handlers for the dashboard.

use crate::error::DashboardError;
use crate::pages;
use crate::state::AppState;
use axum::{
    Form, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use karat_client::{Access, ClientError, access};
use karat_core::{AssignJob, CompleteTask, JobStatus, NewJob, NewUser, Role, Stage, User};
use serde::Deserialize;
use serde_json::{Value, json};

// =============================================================================
// Helpers
// =============================================================================

fn require(state: &AppState, access: Access) -> Result<User, DashboardError> {
    Ok(access::authorize(state.session(), access)?)
}

/// Keep the page for any failure except an expired session, which
/// propagates and ends in a redirect to the login page.
fn in_page<T>(
    result: Result<T, ClientError>,
    fallback: &str,
) -> Result<Result<T, String>, DashboardError> {
    match result {
        Ok(value) => Ok(Ok(value)),
        Err(ClientError::Unauthorized) => Err(DashboardError::Unauthorized),
        Err(e) => {
            tracing::warn!(error = %e, context = fallback, "API call failed");
            Ok(Err(e.user_message(fallback)))
        }
    }
}

/// A missing job gets its own page; everything else is an error.
fn job_load_error(user: &User, err: ClientError) -> Result<Response, DashboardError> {
    match err {
        ClientError::Api { status: 404, .. } => Ok((
            StatusCode::NOT_FOUND,
            Html(pages::job_not_found_page(user)),
        )
            .into_response()),
        other => Err(other.into()),
    }
}

fn parse_weight(raw: &str, message: &'static str) -> Result<f64, &'static str> {
    match raw.trim().parse::<f64>() {
        Ok(w) if w.is_finite() && w > 0.0 => Ok(w),
        _ => Err(message),
    }
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// =============================================================================
// Forms and queries
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct JobsQuery {
    pub status: Option<String>,
}

impl JobsQuery {
    /// Unknown or empty values mean "all".
    pub fn filter(&self) -> Option<JobStatus> {
        self.status.as_deref().and_then(|s| s.parse().ok())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct NoticeQuery {
    pub error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct JobForm {
    pub design_no: String,
    pub item_category: String,
    pub initial_weight: String,
    pub description: String,
}

impl JobForm {
    pub fn to_new_job(&self) -> Result<NewJob, &'static str> {
        let design_no = non_empty(&self.design_no).ok_or("Design number is required")?;
        let item_category = non_empty(&self.item_category).ok_or("Item category is required")?;
        let initial_weight = parse_weight(
            &self.initial_weight,
            "Initial weight must be a positive number",
        )?;
        Ok(NewJob {
            design_no,
            item_category,
            initial_weight,
            description: non_empty(&self.description),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AssignForm {
    pub worker_id: String,
    pub stage: String,
    pub issued_weight: String,
}

impl AssignForm {
    pub fn to_assignment(&self) -> Result<AssignJob, &'static str> {
        let worker_id = self
            .worker_id
            .trim()
            .parse::<i64>()
            .map_err(|_| "Please select a worker")?;
        let stage = self
            .stage
            .parse::<Stage>()
            .map_err(|_| "Please select a stage")?;
        let issued_weight = parse_weight(
            &self.issued_weight,
            "Issued weight must be a positive number",
        )?;
        Ok(AssignJob {
            worker_id,
            stage,
            issued_weight,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserForm {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub role: String,
}

impl UserForm {
    pub fn to_new_user(&self) -> Result<NewUser, &'static str> {
        let username = non_empty(&self.username).ok_or("Username is required")?;
        let email = non_empty(&self.email).ok_or("Email is required")?;
        let full_name = non_empty(&self.full_name).ok_or("Full name is required")?;
        if self.password.is_empty() {
            return Err("Password is required");
        }
        let role = Role::from(self.role.trim().to_string());
        if !Role::ASSIGNABLE.contains(&role) {
            return Err("Please select a role");
        }
        Ok(NewUser {
            username,
            email,
            full_name,
            password: self.password.clone(),
            role,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CompleteForm {
    pub returned_weight: String,
    pub notes: String,
}

impl CompleteForm {
    pub fn to_completion(&self, transaction_id: i64) -> Result<CompleteTask, &'static str> {
        let returned_weight = match self.returned_weight.trim().parse::<f64>() {
            Ok(w) if w.is_finite() && w >= 0.0 => w,
            _ => return Err("Returned weight must be a number"),
        };
        Ok(CompleteTask {
            transaction_id,
            returned_weight,
            notes: non_empty(&self.notes),
        })
    }
}

// =============================================================================
// Landing and health
// =============================================================================

pub async fn home(State(state): State<AppState>) -> Redirect {
    Redirect::to(access::landing(state.session()).path())
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

// =============================================================================
// Owner pages
// =============================================================================

pub async fn dashboard(State(state): State<AppState>) -> Result<Html<String>, DashboardError> {
    let user = require(&state, Access::Owner)?;
    let summary = in_page(
        state.client().job_summary().await,
        "Failed to load job summary",
    )?;
    Ok(Html(pages::dashboard_page(
        &user,
        summary.as_ref().map_err(String::as_str),
    )))
}

pub async fn jobs_list(
    State(state): State<AppState>,
    Query(query): Query<JobsQuery>,
) -> Result<Html<String>, DashboardError> {
    let user = require(&state, Access::Owner)?;
    let filter = query.filter();
    let jobs = in_page(state.client().list_jobs(filter).await, "Failed to load jobs")?;
    Ok(Html(pages::jobs_page(
        &user,
        filter,
        jobs.as_deref().map_err(String::as_str),
    )))
}

pub async fn job_new(State(state): State<AppState>) -> Result<Html<String>, DashboardError> {
    let user = require(&state, Access::Owner)?;
    Ok(Html(pages::job_form_page(&user, &JobForm::default(), None)))
}

pub async fn job_create(
    State(state): State<AppState>,
    Form(form): Form<JobForm>,
) -> Result<Response, DashboardError> {
    let user = require(&state, Access::Owner)?;
    let outcome = match form.to_new_job() {
        Ok(job) => in_page(state.client().create_job(&job).await, "Failed to create job")?,
        Err(message) => Err(message.to_string()),
    };
    match outcome {
        Ok(()) => Ok(Redirect::to("/jobs").into_response()),
        Err(message) => {
            Ok(Html(pages::job_form_page(&user, &form, Some(&message))).into_response())
        }
    }
}

pub async fn job_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, DashboardError> {
    let user = require(&state, Access::Owner)?;
    match state.client().get_job(id).await {
        Ok(detail) => Ok(Html(pages::job_detail_page(&user, &detail)).into_response()),
        Err(e) => job_load_error(&user, e),
    }
}

async fn render_assign(
    state: &AppState,
    user: &User,
    id: i64,
    values: Option<&AssignForm>,
    error: Option<&str>,
) -> Result<Response, DashboardError> {
    let client = state.client();
    let (detail, workers) = match tokio::try_join!(client.get_job(id), client.list_workers()) {
        Ok(loaded) => loaded,
        Err(e) => return job_load_error(user, e),
    };
    let prefilled;
    let values = match values {
        Some(values) => values,
        None => {
            prefilled = AssignForm {
                issued_weight: detail.job.initial_weight.to_string(),
                ..AssignForm::default()
            };
            &prefilled
        }
    };
    Ok(Html(pages::assign_page(user, &detail, &workers, values, error)).into_response())
}

pub async fn job_assign_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, DashboardError> {
    let user = require(&state, Access::Owner)?;
    render_assign(&state, &user, id, None, None).await
}

pub async fn job_assign_submit(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<AssignForm>,
) -> Result<Response, DashboardError> {
    let user = require(&state, Access::Owner)?;
    let outcome = match form.to_assignment() {
        Ok(assignment) => in_page(
            state.client().assign_job(id, &assignment).await,
            "Failed to assign job",
        )?,
        Err(message) => Err(message.to_string()),
    };
    match outcome {
        Ok(()) => Ok(Redirect::to(&format!("/jobs/{id}")).into_response()),
        Err(message) => render_assign(&state, &user, id, Some(&form), Some(&message)).await,
    }
}

pub async fn users_list(
    State(state): State<AppState>,
    Query(notice): Query<NoticeQuery>,
) -> Result<Html<String>, DashboardError> {
    let user = require(&state, Access::Owner)?;
    let users = in_page(state.client().list_users().await, "Failed to load users")?;
    Ok(Html(pages::users_page(
        &user,
        users.as_deref().map_err(String::as_str),
        notice.error.as_deref(),
    )))
}

pub async fn user_delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Redirect, DashboardError> {
    require(&state, Access::Owner)?;
    match in_page(state.client().delete_user(id).await, "Failed to delete user")? {
        Ok(()) => Ok(Redirect::to("/users")),
        Err(message) => Ok(Redirect::to(&format!(
            "/users?error={}",
            urlencoding::encode(&message)
        ))),
    }
}

pub async fn user_new(State(state): State<AppState>) -> Result<Html<String>, DashboardError> {
    let user = require(&state, Access::Owner)?;
    Ok(Html(pages::user_form_page(&user, &UserForm::default(), None)))
}

pub async fn user_create(
    State(state): State<AppState>,
    Form(form): Form<UserForm>,
) -> Result<Response, DashboardError> {
    let user = require(&state, Access::Owner)?;
    let outcome = match form.to_new_user() {
        Ok(new_user) => in_page(state.client().register(&new_user).await, "Failed to create user")?,
        Err(message) => Err(message.to_string()),
    };
    match outcome {
        Ok(()) => Ok(Redirect::to("/users").into_response()),
        Err(message) => {
            Ok(Html(pages::user_form_page(&user, &form, Some(&message))).into_response())
        }
    }
}

pub async fn reports(State(state): State<AppState>) -> Result<Html<String>, DashboardError> {
    let user = require(&state, Access::Owner)?;
    let overview = in_page(
        state.client().reports_overview().await,
        "Failed to load reports",
    )?;
    Ok(Html(pages::reports_page(
        &user,
        overview.as_ref().map_err(String::as_str),
    )))
}

// =============================================================================
// Worker pages
// =============================================================================

async fn render_tasks(
    state: &AppState,
    user: &User,
    values: Option<(i64, &CompleteForm)>,
    error: Option<&str>,
) -> Result<Html<String>, DashboardError> {
    let tasks = in_page(state.client().worker_tasks().await, "Failed to load tasks")?;
    Ok(Html(pages::tasks_page(
        user,
        tasks.as_deref().map_err(String::as_str),
        values,
        error,
    )))
}

pub async fn worker_tasks(State(state): State<AppState>) -> Result<Html<String>, DashboardError> {
    let user = require(&state, Access::Worker)?;
    render_tasks(&state, &user, None, None).await
}

pub async fn task_complete(
    State(state): State<AppState>,
    Path(transaction_id): Path<i64>,
    Form(form): Form<CompleteForm>,
) -> Result<Response, DashboardError> {
    let user = require(&state, Access::Worker)?;
    let outcome = match form.to_completion(transaction_id) {
        Ok(completion) => in_page(
            state.client().complete_task(&completion).await,
            "Failed to complete task",
        )?,
        Err(message) => Err(message.to_string()),
    };
    match outcome {
        Ok(()) => Ok(Redirect::to("/worker/tasks").into_response()),
        Err(message) => {
            let failed = Some((transaction_id, &form));
            Ok(render_tasks(&state, &user, failed, Some(&message))
                .await?
                .into_response())
        }
    }
}
