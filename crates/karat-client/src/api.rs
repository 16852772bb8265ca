//! Typed wrappers for the production API endpoints.

use crate::error::ClientError;
use crate::gateway::ApiClient;
use karat_core::{
    AssignJob, CompleteTask, Job, JobDetail, JobStatus, JobSummary, MaterialConsumption, NewJob,
    ReportsOverview, User, WorkerPerformance, WorkerTask,
};
use serde::de::IgnoredAny;

impl ApiClient {
    // -------------------------------------------------------------------------
    // Users
    // -------------------------------------------------------------------------

    pub async fn list_users(&self) -> Result<Vec<User>, ClientError> {
        self.get("/api/users").await
    }

    /// Users that can be assigned work: everyone except owners.
    pub async fn list_workers(&self) -> Result<Vec<User>, ClientError> {
        let users = self.list_users().await?;
        Ok(users.into_iter().filter(|u| !u.role.is_owner()).collect())
    }

    pub async fn delete_user(&self, user_id: i64) -> Result<(), ClientError> {
        let _: IgnoredAny = self.delete(&format!("/api/users/{user_id}")).await?;
        tracing::info!(user_id, "Deleted user");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Jobs
    // -------------------------------------------------------------------------

    pub async fn list_jobs(&self, status: Option<JobStatus>) -> Result<Vec<Job>, ClientError> {
        match status {
            Some(status) => {
                self.get_query("/api/jobs", &[("status", status.as_str())])
                    .await
            }
            None => self.get("/api/jobs").await,
        }
    }

    pub async fn get_job(&self, job_id: i64) -> Result<JobDetail, ClientError> {
        self.get(&format!("/api/jobs/{job_id}")).await
    }

    pub async fn create_job(&self, job: &NewJob) -> Result<(), ClientError> {
        let _: IgnoredAny = self.post_json("/api/jobs", job).await?;
        tracing::info!(design_no = %job.design_no, "Created job");
        Ok(())
    }

    pub async fn assign_job(&self, job_id: i64, assignment: &AssignJob) -> Result<(), ClientError> {
        let _: IgnoredAny = self
            .post_json(&format!("/api/jobs/{job_id}/assign"), assignment)
            .await?;
        tracing::info!(
            job_id,
            worker_id = assignment.worker_id,
            stage = assignment.stage.as_str(),
            "Assigned job"
        );
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Worker tasks
    // -------------------------------------------------------------------------

    /// Open tasks of the signed-in worker.
    pub async fn worker_tasks(&self) -> Result<Vec<WorkerTask>, ClientError> {
        self.get("/api/worker/tasks").await
    }

    pub async fn complete_task(&self, completion: &CompleteTask) -> Result<(), ClientError> {
        let _: IgnoredAny = self
            .post_json("/api/worker/complete-task", completion)
            .await?;
        tracing::info!(transaction_id = completion.transaction_id, "Completed task");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Reports
    // -------------------------------------------------------------------------

    pub async fn job_summary(&self) -> Result<JobSummary, ClientError> {
        self.get("/api/reports/job-summary").await
    }

    pub async fn worker_performance(&self) -> Result<Vec<WorkerPerformance>, ClientError> {
        self.get("/api/reports/worker-performance").await
    }

    pub async fn material_consumption(&self) -> Result<Vec<MaterialConsumption>, ClientError> {
        self.get("/api/reports/material-consumption").await
    }

    /// Both report tables, fetched concurrently. Either failure fails the
    /// whole result.
    pub async fn reports_overview(&self) -> Result<ReportsOverview, ClientError> {
        let (worker_performance, material_consumption) =
            tokio::try_join!(self.worker_performance(), self.material_consumption())?;
        Ok(ReportsOverview {
            worker_performance,
            material_consumption,
        })
    }
}
