//! Records exchanged with the production API.
//!
//! Field names match the API's JSON. Timestamps are kept as the strings the
//! server sent so that cached profiles round-trip unchanged; use
//! [`display_date`] to render them.

use crate::role::{Role, Stage};
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

// =============================================================================
// Users
// =============================================================================

/// A console user as returned by `/api/auth/me` and `/api/users`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub full_name: String,
    pub role: Role,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: String,
}

/// Registration payload for `/api/auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub role: Role,
}

/// Body of a successful `/api/auth/login` exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

// =============================================================================
// Jobs
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    pub design_no: String,
    pub item_category: String,
    pub initial_weight: f64,
    #[serde(default)]
    pub total_loss: f64,
    #[serde(default)]
    pub loss_percentage: f64,
    pub status: String,
    #[serde(default)]
    pub current_stage: Option<String>,
    #[serde(default)]
    pub current_worker_id: Option<i64>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub created_by: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
}

/// One issue/return cycle of a job at a stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub job_id: i64,
    pub worker_id: i64,
    pub stage: String,
    pub issued_weight: f64,
    #[serde(default)]
    pub returned_weight: Option<f64>,
    #[serde(default)]
    pub loss: Option<f64>,
    #[serde(default)]
    pub loss_percentage: Option<f64>,
    #[serde(default)]
    pub issued_at: String,
    #[serde(default)]
    pub returned_at: Option<String>,
    pub status: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A job together with its transaction history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDetail {
    #[serde(flatten)]
    pub job: Job,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

/// Payload for `POST /api/jobs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewJob {
    pub design_no: String,
    pub item_category: String,
    pub initial_weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Payload for `POST /api/jobs/{id}/assign`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignJob {
    pub worker_id: i64,
    pub stage: Stage,
    pub issued_weight: f64,
}

// =============================================================================
// Worker tasks
// =============================================================================

/// An open transaction issued to the current worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerTask {
    pub transaction_id: i64,
    pub job_id: i64,
    pub design_no: String,
    pub item_category: String,
    pub stage: String,
    pub issued_weight: f64,
    #[serde(default)]
    pub issued_at: String,
}

/// Payload for `POST /api/worker/complete-task`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteTask {
    pub transaction_id: i64,
    pub returned_weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// =============================================================================
// Reports
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    pub total_jobs: i64,
    pub completed_jobs: i64,
    pub in_progress_jobs: i64,
    pub pending_jobs: i64,
    pub total_initial_weight: f64,
    pub total_loss: f64,
    pub average_loss_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerPerformance {
    pub worker_id: i64,
    pub worker_name: String,
    pub role: String,
    pub total_jobs: i64,
    pub total_loss: f64,
    pub average_loss_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialConsumption {
    pub item_category: String,
    pub total_jobs: i64,
    pub total_initial_weight: f64,
    pub total_loss: f64,
    pub loss_percentage: f64,
}

/// The two report queries rendered together on the reports page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportsOverview {
    pub worker_performance: Vec<WorkerPerformance>,
    pub material_consumption: Vec<MaterialConsumption>,
}

// =============================================================================
// Formatting
// =============================================================================

/// Format a weight in grams with three decimals.
pub fn grams(value: f64) -> String {
    format!("{value:.3}g")
}

/// Format a percentage with two decimals.
pub fn percent(value: f64) -> String {
    format!("{value:.2}%")
}

/// Render a server timestamp as a calendar date.
///
/// Accepts RFC 3339 and naive ISO 8601 timestamps. Anything else is returned
/// unchanged.
pub fn display_date(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%Y-%m-%d").to_string();
    }
    raw.to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_job_detail_flattens_job_fields() {
        let detail: JobDetail = serde_json::from_value(json!({
            "id": 7,
            "design_no": "R-102",
            "item_category": "ring",
            "initial_weight": 12.5,
            "total_loss": 0.25,
            "loss_percentage": 2.0,
            "status": "in_progress",
            "current_stage": "filing",
            "current_worker_id": 3,
            "created_at": "2024-05-01T09:30:00",
            "created_by": 1,
            "description": null,
            "transactions": [{
                "id": 1,
                "job_id": 7,
                "worker_id": 3,
                "stage": "casting",
                "issued_weight": 12.5,
                "returned_weight": 12.25,
                "loss": 0.25,
                "loss_percentage": 2.0,
                "issued_at": "2024-05-01T10:00:00",
                "returned_at": "2024-05-02T10:00:00",
                "status": "completed",
                "notes": null
            }]
        }))
        .unwrap();

        assert_eq!(detail.job.design_no, "R-102");
        assert_eq!(detail.job.current_stage.as_deref(), Some("filing"));
        assert_eq!(detail.transactions.len(), 1);
        assert_eq!(detail.transactions[0].returned_weight, Some(12.25));
    }

    #[test]
    fn test_complete_task_omits_empty_notes() {
        let body = serde_json::to_value(CompleteTask {
            transaction_id: 4,
            returned_weight: 9.875,
            notes: None,
        })
        .unwrap();
        assert_eq!(body, json!({ "transaction_id": 4, "returned_weight": 9.875 }));
    }

    #[test]
    fn test_assign_job_serializes_stage_lowercase() {
        let body = serde_json::to_value(AssignJob {
            worker_id: 2,
            stage: Stage::Setting,
            issued_weight: 10.0,
        })
        .unwrap();
        assert_eq!(body["stage"], "setting");
    }

    #[test]
    fn test_formatting_helpers() {
        assert_eq!(grams(12.5), "12.500g");
        assert_eq!(percent(2.0), "2.00%");
        assert_eq!(display_date("2024-05-01T09:30:00.123456"), "2024-05-01");
        assert_eq!(display_date("2024-05-01T09:30:00Z"), "2024-05-01");
        assert_eq!(display_date("yesterday"), "yesterday");
    }
}
