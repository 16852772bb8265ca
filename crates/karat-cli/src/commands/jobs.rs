//! Job commands (owner only).
//!
//! `karat jobs list|show|create|assign`.

use super::output::{emit, or_dash, render_table};
use super::{Context, action_error};
use karat_client::Access;
use karat_core::model::{display_date, grams, percent};
use karat_core::{AssignJob, Job, JobDetail, JobStatus, NewJob, Stage};

pub async fn list(ctx: &Context, status: Option<JobStatus>) -> anyhow::Result<()> {
    ctx.require(Access::Owner)?;
    let jobs = ctx
        .client
        .list_jobs(status)
        .await
        .map_err(|e| action_error(e, "Failed to load jobs"))?;
    emit(ctx.output, &jobs, || jobs_table(&jobs))
}

fn jobs_table(jobs: &[Job]) -> String {
    if jobs.is_empty() {
        return "No jobs found.\n".to_string();
    }
    let rows: Vec<Vec<String>> = jobs
        .iter()
        .map(|job| {
            vec![
                job.id.to_string(),
                job.design_no.clone(),
                job.item_category.clone(),
                grams(job.initial_weight),
                grams(job.total_loss),
                percent(job.loss_percentage),
                job.status.clone(),
                or_dash(job.current_stage.as_deref()),
            ]
        })
        .collect();
    render_table(
        &["ID", "Design No", "Category", "Initial", "Loss", "Loss %", "Status", "Stage"],
        &rows,
    )
}

pub async fn show(ctx: &Context, id: i64) -> anyhow::Result<()> {
    ctx.require(Access::Owner)?;
    let detail = ctx
        .client
        .get_job(id)
        .await
        .map_err(|e| match e.status() {
            Some(404) => anyhow::anyhow!("Job not found"),
            _ => action_error(e, "Failed to load job"),
        })?;
    emit(ctx.output, &detail, || job_detail_text(&detail))
}

fn job_detail_text(detail: &JobDetail) -> String {
    let job = &detail.job;
    let mut out = format!(
        "Job {} (#{})\n  \
         category:     {}\n  \
         initial:      {}\n  \
         total loss:   {} ({})\n  \
         status:       {}\n  \
         stage:        {}\n  \
         created:      {}\n  \
         description:  {}\n\n",
        job.design_no,
        job.id,
        job.item_category,
        grams(job.initial_weight),
        grams(job.total_loss),
        percent(job.loss_percentage),
        job.status,
        or_dash(job.current_stage.as_deref()),
        display_date(&job.created_at),
        or_dash(job.description.as_deref()),
    );

    if detail.transactions.is_empty() {
        out.push_str("No transactions.\n");
        return out;
    }
    let rows: Vec<Vec<String>> = detail
        .transactions
        .iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                t.stage.clone(),
                t.worker_id.to_string(),
                grams(t.issued_weight),
                t.returned_weight.map(grams).unwrap_or_else(|| "-".to_string()),
                t.loss.map(grams).unwrap_or_else(|| "-".to_string()),
                t.loss_percentage.map(percent).unwrap_or_else(|| "-".to_string()),
                t.status.clone(),
            ]
        })
        .collect();
    out.push_str(&render_table(
        &["ID", "Stage", "Worker", "Issued", "Returned", "Loss", "Loss %", "Status"],
        &rows,
    ));
    out
}

pub async fn create(
    ctx: &Context,
    design_no: String,
    item_category: String,
    initial_weight: f64,
    description: Option<String>,
) -> anyhow::Result<()> {
    ctx.require(Access::Owner)?;
    if !(initial_weight.is_finite() && initial_weight > 0.0) {
        anyhow::bail!("initial weight must be a positive number");
    }
    let job = NewJob {
        design_no,
        item_category,
        initial_weight,
        description: description.filter(|d| !d.trim().is_empty()),
    };
    ctx.client
        .create_job(&job)
        .await
        .map_err(|e| action_error(e, "Failed to create job"))?;
    println!("✔ Created job {}", job.design_no);
    Ok(())
}

pub async fn assign(
    ctx: &Context,
    id: i64,
    worker_id: i64,
    stage: Stage,
    weight: Option<f64>,
) -> anyhow::Result<()> {
    ctx.require(Access::Owner)?;
    let issued_weight = match weight {
        Some(weight) => weight,
        None => {
            let detail = ctx
                .client
                .get_job(id)
                .await
                .map_err(|e| action_error(e, "Failed to load job"))?;
            detail.job.initial_weight
        }
    };
    if !(issued_weight.is_finite() && issued_weight > 0.0) {
        anyhow::bail!("issued weight must be a positive number");
    }

    let assignment = AssignJob {
        worker_id,
        stage,
        issued_weight,
    };
    ctx.client
        .assign_job(id, &assignment)
        .await
        .map_err(|e| action_error(e, "Failed to assign job"))?;
    println!(
        "✔ Assigned job #{id} to worker #{worker_id} for {} ({})",
        stage.label(),
        grams(issued_weight)
    );
    Ok(())
}
