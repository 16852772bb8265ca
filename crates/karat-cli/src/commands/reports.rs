//! Production reports (owner only).

use super::output::{emit, render_table};
use super::{Context, action_error};
use karat_client::Access;
use karat_core::model::{grams, percent};
use karat_core::{JobSummary, ReportsOverview};

pub async fn summary(ctx: &Context) -> anyhow::Result<()> {
    ctx.require(Access::Owner)?;
    let summary = ctx
        .client
        .job_summary()
        .await
        .map_err(|e| action_error(e, "Failed to load summary"))?;
    emit(ctx.output, &summary, || summary_text(&summary))
}

fn summary_text(s: &JobSummary) -> String {
    format!(
        "Jobs:          {} total, {} completed, {} in progress, {} pending\n\
         Initial gold:  {}\n\
         Total loss:    {}\n\
         Average loss:  {}\n",
        s.total_jobs,
        s.completed_jobs,
        s.in_progress_jobs,
        s.pending_jobs,
        grams(s.total_initial_weight),
        grams(s.total_loss),
        percent(s.average_loss_percentage),
    )
}

/// Worker performance and material consumption. Either failing fails both.
pub async fn overview(ctx: &Context) -> anyhow::Result<()> {
    ctx.require(Access::Owner)?;
    let overview = ctx
        .client
        .reports_overview()
        .await
        .map_err(|e| action_error(e, "Failed to load reports"))?;
    emit(ctx.output, &overview, || overview_text(&overview))
}

fn overview_text(overview: &ReportsOverview) -> String {
    let workers: Vec<Vec<String>> = overview
        .worker_performance
        .iter()
        .map(|w| {
            vec![
                w.worker_id.to_string(),
                w.worker_name.clone(),
                w.role.clone(),
                w.total_jobs.to_string(),
                grams(w.total_loss),
                percent(w.average_loss_percentage),
            ]
        })
        .collect();
    let materials: Vec<Vec<String>> = overview
        .material_consumption
        .iter()
        .map(|m| {
            vec![
                m.item_category.clone(),
                m.total_jobs.to_string(),
                grams(m.total_initial_weight),
                grams(m.total_loss),
                percent(m.loss_percentage),
            ]
        })
        .collect();

    let mut out = String::from("Worker Performance\n\n");
    out.push_str(&render_table(
        &["ID", "Worker", "Role", "Jobs", "Total Loss", "Avg Loss %"],
        &workers,
    ));
    out.push_str("\nMaterial Consumption by Category\n\n");
    out.push_str(&render_table(
        &["Category", "Jobs", "Initial", "Loss", "Loss %"],
        &materials,
    ));
    out
}
